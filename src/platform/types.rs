//! Shared platform data types.
//!
//! Instants are epoch milliseconds (`InstantMs`). Pure logic always takes
//! `now_ms` as a parameter; only the edges of the system read the clock.

use serde::{Deserialize, Serialize};

/// Epoch milliseconds
pub type InstantMs = i64;

/// Current wall-clock instant in epoch milliseconds
pub fn now_ms() -> InstantMs {
    chrono::Utc::now().timestamp_millis()
}

/// A calendar event as returned by the event source.
///
/// Read fresh on every scan and never cached across scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub start_ms: InstantMs,
}

/// An alert-type reminder rule attached to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRule {
    pub event_id: i64,
    pub lead_minutes: i64,
}

/// A reminder rule whose fire instant falls inside the near-term window.
///
/// Ephemeral: derived each tick, consumed by dispatch, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueReminder {
    pub event_id: i64,
    pub lead_minutes: i64,
    pub fire_at_ms: InstantMs,
}

impl DueReminder {
    /// Compute the fire instant for a rule against an event start
    pub fn fire_at(start_ms: InstantMs, lead_minutes: i64) -> InstantMs {
        start_ms - lead_minutes * 60_000
    }
}

/// Identity of a re-armable wake callback.
///
/// Re-arming is always cancel-then-schedule on the same identity, so two
/// in-flight requests for the same event/rule can never collide and
/// duplicate future firings cannot accumulate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WakeIdentity {
    /// Per-rule reminder wake, keyed by (event, lead minutes)
    Reminder { event_id: i64, lead_minutes: i64 },
    /// The liveness guardian's one-shot fallback check
    LivenessFallback,
    /// The watchdog's self-chaining keep-alive link
    KeepAlive,
}

/// Payload delivered when a scheduled wake fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakePayload {
    /// Present the reminder alert for this event/rule
    Reminder {
        event_id: i64,
        title: String,
        start_ms: InstantMs,
        fire_at_ms: InstantMs,
        lead_minutes: i64,
    },
    /// Force one liveness check even if the timer loop is suspended
    ForceLivenessCheck,
    /// Watchdog chain link: verify the monitor process and re-arm
    KeepAliveCheck,
}

/// Inert presentation data for a system-level indicator.
///
/// No logic lives here; the presenter renders it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorContent {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub tap_target: String,
}
