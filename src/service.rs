//! # Monitor Service
//!
//! Service lifecycle for the delivery core: the two-phase startup, the
//! cooperative timer loop that serializes the scanner and guardian ticks,
//! and routing of fired wake payloads back into the right component.
//!
//! Startup is split because foreground registration is deadline-bound:
//! the OS kills a process that does not register within a few seconds of
//! creation. Phase 1 does only that. Everything else (wake lock, dedup
//! store, timer loop, watchdog chain) happens on a worker task behind a
//! oneshot barrier, so a slow phase 2 can never delay phase 1.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};

use crate::core::Config;
use crate::features::dispatch::AlertDispatcher;
use crate::features::liveness::{LivenessGuardian, LIVENESS_INTERVAL};
use crate::features::scanner::{EventScanner, SCAN_INTERVAL};
use crate::features::watchdog::ProcessWatchdog;
use crate::platform::{
    now_ms, AlertPresenter, EventSource, IndicatorContent, InstantMs, ProcessRegistrar,
    WakePayload, WakeScheduler,
};

/// Identifier of the persistent status indicator
pub const INDICATOR_ID: u32 = 1;

/// Reminder alerts use their own indicator id space so they never clash
/// with the persistent indicator
pub const REMINDER_INDICATOR_BASE: u32 = 1000;

/// Foreground registration must complete within this budget or the OS
/// may kill the process for unresponsiveness
const STARTUP_DEADLINE: Duration = Duration::from_secs(5);

const WAKE_LOCK_TAG: &str = "wakewatch::service";

/// Messages fed into the timer loop from outside contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Fallback wake fired: run one liveness check now
    ForceLivenessCheck,
    /// OS delivered the explicit "indicator dismissed" signal
    IndicatorDismissed,
    Shutdown,
}

pub struct MonitorService;

impl MonitorService {
    /// Start the monitor. Returns once phase 1 (foreground registration)
    /// has been attempted; phase 2 runs on a worker task and signals the
    /// handle's readiness barrier when the timer loop is about to start.
    ///
    /// A phase-1 registration failure is logged, not fatal: the liveness
    /// guardian re-registers on its first tick.
    pub async fn start(
        source: Arc<dyn EventSource>,
        scheduler: Arc<dyn WakeScheduler>,
        registrar: Arc<dyn ProcessRegistrar>,
        config: &Config,
    ) -> MonitorHandle {
        // Phase 1: deadline-bound foreground registration
        let started = std::time::Instant::now();
        let content = config.indicator_content();
        match registrar.start_foreground(INDICATOR_ID, &content).await {
            Ok(()) => {
                let elapsed = started.elapsed();
                if elapsed > STARTUP_DEADLINE {
                    warn!(
                        "Foreground registration took {} ms, over the {} ms budget",
                        elapsed.as_millis(),
                        STARTUP_DEADLINE.as_millis()
                    );
                } else {
                    debug!(
                        "Foreground registration completed in {} ms",
                        elapsed.as_millis()
                    );
                }
            }
            Err(e) => error!("Foreground registration failed at startup: {e}"),
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let watchdog = Arc::new(ProcessWatchdog::new(
            registrar.clone(),
            scheduler.clone(),
            config.process_name.clone(),
        ));

        // Phase 2: best-effort initialization on a worker task. Nothing
        // below is reachable from outside before the barrier signals.
        let task_watchdog = watchdog.clone();
        tokio::spawn(async move {
            if let Err(e) = registrar.acquire_wake_lock(WAKE_LOCK_TAG).await {
                warn!("Failed to acquire wake lock: {e}");
            }

            let dispatcher = AlertDispatcher::new(scheduler.clone());
            let scanner = EventScanner::new(source, dispatcher);
            let guardian = LivenessGuardian::new(
                registrar.clone(),
                scheduler.clone(),
                INDICATOR_ID,
                content,
            );
            task_watchdog.start(now_ms()).await;

            if ready_tx.send(()).is_err() {
                debug!("Readiness barrier dropped before phase 2 completed");
            }
            info!("Monitor service started (phase 2 complete)");

            run_timer_loop(scanner, guardian, control_rx, SCAN_INTERVAL, LIVENESS_INTERVAL)
                .await;

            registrar.release_wake_lock().await;
            info!("Monitor service stopped");
        });

        MonitorHandle {
            control: control_tx,
            watchdog,
            ready: Some(ready_rx),
        }
    }
}

/// Handle to a running monitor service
pub struct MonitorHandle {
    control: mpsc::UnboundedSender<ControlMessage>,
    watchdog: Arc<ProcessWatchdog>,
    ready: Option<oneshot::Receiver<()>>,
}

impl MonitorHandle {
    /// Wait for the phase-2 barrier. Returns immediately on later calls.
    pub async fn ready(&mut self) {
        if let Some(rx) = self.ready.take() {
            let _ = rx.await;
        }
    }

    /// Feed the explicit "indicator dismissed" OS signal into the loop
    pub fn notify_dismissed(&self) {
        let _ = self.control.send(ControlMessage::IndicatorDismissed);
    }

    /// Force one liveness check outside the periodic cadence
    pub fn force_liveness_check(&self) {
        let _ = self.control.send(ControlMessage::ForceLivenessCheck);
    }

    pub fn shutdown(&self) {
        let _ = self.control.send(ControlMessage::Shutdown);
    }

    /// Build the router that turns fired wake payloads into actions
    pub fn wake_router(&self, presenter: Arc<dyn AlertPresenter>) -> WakeRouter {
        WakeRouter {
            control: self.control.clone(),
            presenter,
            watchdog: self.watchdog.clone(),
        }
    }
}

/// The cooperative timer loop. One task exclusively owns the scanner
/// (and its dedup store) and the guardian, so the two ticks never run
/// concurrently and need no locking. Each periodic arm re-arms only
/// after its tick completes.
async fn run_timer_loop(
    mut scanner: EventScanner,
    mut guardian: LivenessGuardian,
    mut control: mpsc::UnboundedReceiver<ControlMessage>,
    scan_interval: Duration,
    liveness_interval: Duration,
) {
    let mut next_scan = Instant::now();
    let mut next_liveness = Instant::now();

    loop {
        tokio::select! {
            _ = sleep_until(next_scan) => {
                scanner.tick(now_ms()).await;
                next_scan = Instant::now() + scan_interval;
            }
            _ = sleep_until(next_liveness) => {
                guardian.tick(now_ms()).await;
                next_liveness = Instant::now() + liveness_interval;
            }
            msg = control.recv() => match msg {
                Some(ControlMessage::ForceLivenessCheck) => {
                    guardian.tick(now_ms()).await;
                }
                Some(ControlMessage::IndicatorDismissed) => {
                    guardian.on_dismissed(now_ms()).await;
                }
                Some(ControlMessage::Shutdown) | None => {
                    guardian.teardown().await;
                    break;
                }
            }
        }
    }
}

/// Routes fired wake payloads. Reminder presentation and keep-alive
/// checks run in the delivering context; liveness checks are forwarded
/// into the timer loop, which owns the guardian state.
pub struct WakeRouter {
    control: mpsc::UnboundedSender<ControlMessage>,
    presenter: Arc<dyn AlertPresenter>,
    watchdog: Arc<ProcessWatchdog>,
}

impl WakeRouter {
    pub async fn route(&self, payload: WakePayload) {
        match payload {
            WakePayload::Reminder {
                event_id,
                title,
                start_ms,
                ..
            } => {
                let indicator_id =
                    REMINDER_INDICATOR_BASE.wrapping_add(event_id.rem_euclid(i64::from(u32::MAX)) as u32);
                let content = reminder_content(&title, start_ms);
                info!("Presenting reminder for event {event_id}: {title}");
                if let Err(e) = self.presenter.show(indicator_id, &content).await {
                    warn!("Reminder presentation failed: {e}");
                }
            }
            WakePayload::ForceLivenessCheck => {
                let _ = self.control.send(ControlMessage::ForceLivenessCheck);
            }
            WakePayload::KeepAliveCheck => {
                self.watchdog.on_fire(now_ms()).await;
            }
        }
    }
}

fn reminder_content(title: &str, start_ms: InstantMs) -> IndicatorContent {
    let starts = chrono::DateTime::from_timestamp_millis(start_ms)
        .map(|dt| dt.format("%H:%M UTC").to_string())
        .unwrap_or_else(|| "soon".to_string());
    IndicatorContent {
        title: title.to_string(),
        body: format!("Starts at {starts}"),
        icon: "ic_alert".to_string(),
        tap_target: "reminder".to_string(),
    }
}
