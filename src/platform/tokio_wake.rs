//! In-process wake scheduler backed by tokio timers.
//!
//! Keeps a lookup table from wake identity to the last-scheduled task
//! handle; scheduling on an identity that is already pending replaces it.
//! Fired payloads are handed to a delivery channel the application routes
//! from. The `exact` and `allow_while_idle` flags are accepted for
//! interface parity with the real OS facility; an in-process timer is
//! always "exact".

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::error::PlatformError;
use super::traits::WakeScheduler;
use super::types::{now_ms, InstantMs, WakeIdentity, WakePayload};

/// A fired wake as handed to the delivery channel
#[derive(Debug)]
pub struct WakeDelivery {
    pub identity: WakeIdentity,
    pub payload: WakePayload,
}

/// One pending fire. The generation ties a table entry to the task that
/// owns it: `abort()` cannot stop a task that is already in its final
/// poll, so a superseded task may still run to completion, and only the
/// generation tells it that its entry now belongs to a replacement.
struct PendingWake {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct TokioWakeScheduler {
    pending: Arc<DashMap<WakeIdentity, PendingWake>>,
    generation: Arc<AtomicU64>,
    deliveries: mpsc::UnboundedSender<WakeDelivery>,
}

impl TokioWakeScheduler {
    /// Create a scheduler and the receiving end of its delivery channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WakeDelivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = TokioWakeScheduler {
            pending: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
            deliveries: tx,
        };
        (scheduler, rx)
    }

    /// Number of identities with a pending fire
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Abort all pending fires (service shutdown)
    pub fn cancel_all(&self) {
        for entry in self.pending.iter() {
            entry.value().handle.abort();
        }
        self.pending.clear();
    }
}

#[async_trait]
impl WakeScheduler for TokioWakeScheduler {
    async fn schedule_once(
        &self,
        identity: WakeIdentity,
        at_ms: InstantMs,
        _exact: bool,
        _allow_while_idle: bool,
        payload: WakePayload,
    ) -> Result<(), PlatformError> {
        // Replace any pending fire for this identity
        if let Some((_, previous)) = self.pending.remove(&identity) {
            previous.handle.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let delay_ms = (at_ms - now_ms()).max(0) as u64;
        let pending = self.pending.clone();
        let deliveries = self.deliveries.clone();
        let task_identity = identity.clone();

        // The task must not run (and remove itself) before its handle is
        // in the pending table
        let (armed_tx, armed_rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let _ = armed_rx.await;
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            // Remove only our own entry. If the generation no longer
            // matches, a replacement (or a cancel) won the race while
            // this task was past its last await point; the fire is
            // stale and must not be delivered.
            let owned = pending
                .remove_if(&task_identity, |_, p| p.generation == generation)
                .is_some();
            if !owned {
                debug!("Wake for {task_identity:?} superseded before delivery");
                return;
            }
            if deliveries
                .send(WakeDelivery {
                    identity: task_identity,
                    payload,
                })
                .is_err()
            {
                warn!("Wake fired but delivery channel is closed");
            }
        });

        self.pending
            .insert(identity.clone(), PendingWake { generation, handle });
        let _ = armed_tx.send(());
        debug!("Wake armed for {identity:?} in {delay_ms} ms");
        Ok(())
    }

    async fn cancel(&self, identity: &WakeIdentity) {
        if let Some((_, pending)) = self.pending.remove(identity) {
            pending.handle.abort();
            debug!("Wake canceled for {identity:?}");
        }
    }
}
