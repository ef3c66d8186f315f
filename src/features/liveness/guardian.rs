//! Persistent-indicator liveness checks.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::platform::{
    IndicatorContent, InstantMs, PlatformError, ProcessRegistrar, WakeIdentity, WakePayload,
    WakeScheduler,
};

/// Period of the normal liveness tick
pub const LIVENESS_INTERVAL: Duration = Duration::from_secs(5);

/// Delay of the fallback wake armed after a recreate. It forces one more
/// liveness check even if the timer loop itself has been suspended.
pub const FALLBACK_DELAY_MS: i64 = 5_000;

/// Observed state of the persistent indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// No check has run yet
    Unconfirmed,
    /// Last check saw the indicator
    Visible,
    /// Last check did not see it and recreation has not been confirmed
    Missing,
    /// Recreation issued, fallback check armed
    FallbackArmed,
}

/// Owns the indicator state; exclusively driven by the timer loop task.
pub struct LivenessGuardian {
    registrar: Arc<dyn ProcessRegistrar>,
    scheduler: Arc<dyn WakeScheduler>,
    indicator_id: u32,
    content: IndicatorContent,
    state: IndicatorState,
}

impl LivenessGuardian {
    pub fn new(
        registrar: Arc<dyn ProcessRegistrar>,
        scheduler: Arc<dyn WakeScheduler>,
        indicator_id: u32,
        content: IndicatorContent,
    ) -> Self {
        LivenessGuardian {
            registrar,
            scheduler,
            indicator_id,
            content,
            state: IndicatorState::Unconfirmed,
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Periodic (or fallback-forced) liveness check
    pub async fn tick(&mut self, now_ms: InstantMs) {
        match self.registrar.is_indicator_present(self.indicator_id).await {
            Ok(true) => {
                debug!("Persistent indicator still present");
                self.state = IndicatorState::Visible;
                self.scheduler.cancel(&WakeIdentity::LivenessFallback).await;
            }
            Ok(false) => {
                warn!("Missing persistent indicator detected, recreating");
                self.recreate_and_arm_fallback(now_ms).await;
            }
            Err(e) => {
                // A failed presence query is treated as missing: recreating
                // a visible indicator is harmless, the reverse is not
                warn!("Indicator presence query failed: {e}");
                self.recreate_and_arm_fallback(now_ms).await;
            }
        }
    }

    /// Explicit "indicator dismissed" signal from the OS; runs the
    /// recreate path immediately, without waiting for the next tick.
    pub async fn on_dismissed(&mut self, now_ms: InstantMs) {
        info!("Persistent indicator dismissed, recreating immediately");
        self.recreate_and_arm_fallback(now_ms).await;
    }

    /// Cancel any armed fallback (service shutdown)
    pub async fn teardown(&mut self) {
        self.scheduler.cancel(&WakeIdentity::LivenessFallback).await;
        self.state = IndicatorState::Unconfirmed;
    }

    async fn recreate_and_arm_fallback(&mut self, now_ms: InstantMs) {
        self.state = IndicatorState::Missing;

        // Re-register rather than update content: registration is what
        // restores the elevated scheduling priority
        match self
            .registrar
            .start_foreground(self.indicator_id, &self.content)
            .await
        {
            Ok(()) => info!("Persistent indicator recreated"),
            Err(e) => warn!("Indicator recreation failed, will retry: {e}"),
        }

        self.scheduler.cancel(&WakeIdentity::LivenessFallback).await;
        let armed = match self
            .scheduler
            .schedule_once(
                WakeIdentity::LivenessFallback,
                now_ms + FALLBACK_DELAY_MS,
                true,
                true,
                WakePayload::ForceLivenessCheck,
            )
            .await
        {
            Ok(()) => true,
            Err(PlatformError::ExactWakeDenied) => {
                warn!("Exact wake denied for liveness fallback, arming inexact");
                self.scheduler
                    .schedule_once(
                        WakeIdentity::LivenessFallback,
                        now_ms + FALLBACK_DELAY_MS,
                        false,
                        false,
                        WakePayload::ForceLivenessCheck,
                    )
                    .await
                    .is_ok()
            }
            Err(e) => {
                warn!("Failed to arm liveness fallback: {e}");
                false
            }
        };

        if armed {
            self.state = IndicatorState::FallbackArmed;
        }
    }
}
