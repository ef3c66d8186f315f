//! Wake-hop dispatch for due reminders.
//!
//! The host platform forbids a background process from directly
//! presenting a full-screen interruptive alert. Scheduling a ~1 second
//! exact wake addressed to an OS-dispatched handler makes the resulting
//! presentation externally initiated, which is exempt from that
//! restriction.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::platform::{
    CalendarEvent, DueReminder, InstantMs, PlatformError, WakeIdentity, WakePayload, WakeScheduler,
};

/// Delay before the wake hop fires
pub const WAKE_DELAY_MS: i64 = 1_000;

pub struct AlertDispatcher {
    scheduler: Arc<dyn WakeScheduler>,
}

impl AlertDispatcher {
    pub fn new(scheduler: Arc<dyn WakeScheduler>) -> Self {
        AlertDispatcher { scheduler }
    }

    /// Arm the wake hop for one due reminder.
    ///
    /// The wake identity is (event, lead minutes), so two in-flight
    /// requests for the same rule cannot collide; any prior request with
    /// this identity is canceled first. Never returns an error: a denied
    /// exact-wake permission degrades to inexact scheduling.
    pub async fn dispatch(&self, event: &CalendarEvent, due: &DueReminder, now_ms: InstantMs) {
        let identity = WakeIdentity::Reminder {
            event_id: due.event_id,
            lead_minutes: due.lead_minutes,
        };
        let payload = WakePayload::Reminder {
            event_id: due.event_id,
            title: event.title.clone(),
            start_ms: event.start_ms,
            fire_at_ms: due.fire_at_ms,
            lead_minutes: due.lead_minutes,
        };
        let at_ms = now_ms + WAKE_DELAY_MS;

        self.scheduler.cancel(&identity).await;
        match self
            .scheduler
            .schedule_once(identity.clone(), at_ms, true, true, payload.clone())
            .await
        {
            Ok(()) => {
                debug!(
                    "Reminder wake armed for event {} ({} min lead)",
                    due.event_id, due.lead_minutes
                );
            }
            Err(PlatformError::ExactWakeDenied) => {
                warn!("Exact wake denied, falling back to inexact scheduling");
                if let Err(e) = self
                    .scheduler
                    .schedule_once(identity, at_ms, false, false, payload)
                    .await
                {
                    error!("Failed to arm inexact reminder wake: {e}");
                }
            }
            Err(e) => {
                error!("Failed to arm reminder wake: {e}");
            }
        }
    }
}
