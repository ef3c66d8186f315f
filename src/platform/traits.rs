//! Trait seams for the four host-OS facilities the delivery core consumes.

use async_trait::async_trait;

use super::error::PlatformError;
use super::types::{
    CalendarEvent, IndicatorContent, InstantMs, ReminderRule, WakeIdentity, WakePayload,
};

/// External calendar event source.
///
/// Queried fresh on every scanner tick; results are never cached here or
/// by callers. `events_between` returns events ordered by start instant.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn events_between(
        &self,
        start_ms: InstantMs,
        end_ms: InstantMs,
    ) -> Result<Vec<CalendarEvent>, PlatformError>;

    /// Alert-type reminder rules for one event
    async fn alert_rules(&self, event_id: i64) -> Result<Vec<ReminderRule>, PlatformError>;
}

/// One-shot OS wake scheduler.
///
/// `schedule_once` with an identity that already has a pending fire
/// replaces it, but callers still cancel explicitly first: the
/// cancel-before-schedule discipline is what keeps duplicate future
/// firings from accumulating even across process restarts, where the
/// in-memory pending table is gone but the OS-side registration is not.
#[async_trait]
pub trait WakeScheduler: Send + Sync {
    /// Arm a single future fire. `exact` requests precise delivery;
    /// `allow_while_idle` requests bypass of low-power deferral.
    /// Fails with `ExactWakeDenied` when the exact permission is missing.
    async fn schedule_once(
        &self,
        identity: WakeIdentity,
        at_ms: InstantMs,
        exact: bool,
        allow_while_idle: bool,
        payload: WakePayload,
    ) -> Result<(), PlatformError>;

    /// Cancel any pending fire for this identity. Idempotent.
    async fn cancel(&self, identity: &WakeIdentity);
}

/// OS process registrar: foreground registration, liveness queries,
/// restarts, and the wake lock that keeps the CPU from sleeping under us.
#[async_trait]
pub trait ProcessRegistrar: Send + Sync {
    /// Register the process as foreground with a persistent indicator.
    /// Registration (not a plain content update) is what restores the
    /// elevated scheduling priority after the indicator was dismissed.
    async fn start_foreground(
        &self,
        indicator_id: u32,
        content: &IndicatorContent,
    ) -> Result<(), PlatformError>;

    /// Whether the persistent indicator is currently shown
    async fn is_indicator_present(&self, indicator_id: u32) -> Result<bool, PlatformError>;

    /// Whether the long-running monitor process is currently registered
    async fn is_process_registered(&self, name: &str) -> bool;

    /// Ask the OS to start the monitor process
    async fn start_process(&self, name: &str) -> Result<(), PlatformError>;

    /// Hold a partial wake lock for the lifetime of the service
    async fn acquire_wake_lock(&self, tag: &str) -> Result<(), PlatformError>;

    async fn release_wake_lock(&self);
}

/// OS alert presentation. Content is inert data; no logic lives behind
/// this seam.
#[async_trait]
pub trait AlertPresenter: Send + Sync {
    async fn show(&self, indicator_id: u32, content: &IndicatorContent)
        -> Result<(), PlatformError>;
}
