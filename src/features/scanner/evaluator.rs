//! Pure reminder evaluation.
//!
//! Maps (event, rules, now) to the set of currently-due reminders.
//! No clock reads, no I/O; everything the scanner needs to decide
//! "due right now" lives here.

use crate::platform::{CalendarEvent, DueReminder, InstantMs, ReminderRule};

/// Lookahead for the calendar query: events starting within 5 minutes
pub const SCAN_WINDOW_MS: i64 = 5 * 60 * 1000;

/// A rule is due iff its fire instant lies within this many ms of now,
/// matched to the scanner period so every due rule is observed in at
/// least one tick before its moment passes.
pub const DUE_WINDOW_MS: i64 = 30_000;

/// Evaluate every rule on one event against the near-term window.
///
/// Rules are evaluated independently; one event with several due rules
/// yields several reminders. Fire instants already in the past fall out
/// of the window check, no special casing.
pub fn due_reminders(
    event: &CalendarEvent,
    rules: &[ReminderRule],
    now_ms: InstantMs,
) -> Vec<DueReminder> {
    rules
        .iter()
        .filter_map(|rule| {
            let fire_at_ms = DueReminder::fire_at(event.start_ms, rule.lead_minutes);
            let delta = fire_at_ms - now_ms;
            if (0..=DUE_WINDOW_MS).contains(&delta) {
                Some(DueReminder {
                    event_id: event.id,
                    lead_minutes: rule.lead_minutes,
                    fire_at_ms,
                })
            } else {
                None
            }
        })
        .collect()
}
