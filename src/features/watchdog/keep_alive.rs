//! Self-chaining keep-alive checks.
//!
//! The OS wake primitive is one-shot, so each fire re-arms the next one.
//! Cancellation always precedes scheduling on the shared `KeepAlive`
//! identity; duplicate deliveries of one fire therefore collapse to a
//! single pending chain link.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::platform::{
    InstantMs, PlatformError, ProcessRegistrar, WakeIdentity, WakePayload, WakeScheduler,
};

/// Period of the keep-alive chain
pub const KEEP_ALIVE_INTERVAL_MS: i64 = 5 * 60 * 1000;

/// Holds no mutable state: every fire re-derives everything it needs, so
/// it can run in an OS-dispatched context with nothing shared with the
/// host process.
pub struct ProcessWatchdog {
    registrar: Arc<dyn ProcessRegistrar>,
    scheduler: Arc<dyn WakeScheduler>,
    process_name: String,
}

impl ProcessWatchdog {
    pub fn new(
        registrar: Arc<dyn ProcessRegistrar>,
        scheduler: Arc<dyn WakeScheduler>,
        process_name: impl Into<String>,
    ) -> Self {
        ProcessWatchdog {
            registrar,
            scheduler,
            process_name: process_name.into(),
        }
    }

    /// Arm the first chain link (called once at service start)
    pub async fn start(&self, now_ms: InstantMs) {
        self.arm_next(now_ms).await;
    }

    /// One keep-alive fire: restart the process if it is gone, then
    /// unconditionally re-arm the chain.
    pub async fn on_fire(&self, now_ms: InstantMs) {
        if self.registrar.is_process_registered(&self.process_name).await {
            debug!("Monitor process alive, no restart needed");
        } else {
            warn!("Monitor process not registered, requesting restart");
            if let Err(e) = self.registrar.start_process(&self.process_name).await {
                error!("Failed to restart monitor process: {e}");
            }
        }
        self.arm_next(now_ms).await;
    }

    async fn arm_next(&self, now_ms: InstantMs) {
        self.scheduler.cancel(&WakeIdentity::KeepAlive).await;

        let at_ms = now_ms + KEEP_ALIVE_INTERVAL_MS;
        match self
            .scheduler
            .schedule_once(
                WakeIdentity::KeepAlive,
                at_ms,
                true,
                true,
                WakePayload::KeepAliveCheck,
            )
            .await
        {
            Ok(()) => debug!("Next keep-alive check armed in {KEEP_ALIVE_INTERVAL_MS} ms"),
            Err(PlatformError::ExactWakeDenied) => {
                warn!("Exact wake denied for keep-alive, arming inexact");
                if let Err(e) = self
                    .scheduler
                    .schedule_once(
                        WakeIdentity::KeepAlive,
                        at_ms,
                        false,
                        false,
                        WakePayload::KeepAliveCheck,
                    )
                    .await
                {
                    error!("Failed to arm keep-alive chain: {e}");
                }
            }
            Err(e) => error!("Failed to arm keep-alive chain: {e}"),
        }
    }
}
