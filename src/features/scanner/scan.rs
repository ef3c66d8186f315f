//! The periodic calendar scan.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::features::dedup::{FiredKey, FiredSet};
use crate::features::dispatch::AlertDispatcher;
use crate::platform::{EventSource, InstantMs};

use super::evaluator::{due_reminders, SCAN_WINDOW_MS};

/// Fixed scan period. The next tick is armed only after the current one
/// completes, never at a wall-clock cadence that could overlap.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Owns the dedup store and drives one scan per tick.
///
/// Exclusively owned by the timer loop task, so no locking is needed
/// around the fired set.
pub struct EventScanner {
    source: Arc<dyn EventSource>,
    dispatcher: AlertDispatcher,
    fired: FiredSet,
}

impl EventScanner {
    pub fn new(source: Arc<dyn EventSource>, dispatcher: AlertDispatcher) -> Self {
        EventScanner {
            source,
            dispatcher,
            fired: FiredSet::new(),
        }
    }

    /// One scan: query the 5-minute lookahead, evaluate rules, dispatch
    /// anything due that has not already fired.
    ///
    /// An event-list query failure ends the tick with zero rules
    /// evaluated; the next tick retries with no backoff. A rule-fetch
    /// failure skips only that event.
    pub async fn tick(&mut self, now_ms: InstantMs) {
        let events = match self
            .source
            .events_between(now_ms, now_ms + SCAN_WINDOW_MS)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                warn!("Calendar query failed, skipping this scan: {e}");
                return;
            }
        };

        debug!("Scan found {} upcoming event(s)", events.len());

        for event in events {
            let rules = match self.source.alert_rules(event.id).await {
                Ok(rules) => rules,
                Err(e) => {
                    warn!("Rule query failed for event {}, skipping it: {e}", event.id);
                    continue;
                }
            };

            for due in due_reminders(&event, &rules, now_ms) {
                let key = FiredKey::from(&due);
                if self.fired.contains(&key) {
                    continue;
                }
                self.fired.add(key);
                self.dispatcher.dispatch(&event, &due, now_ms).await;
            }
        }
    }

    /// Number of fired keys currently remembered
    pub fn fired_len(&self) -> usize {
        self.fired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{MockSource, RecordingScheduler};
    use crate::platform::{WakeIdentity, WakeScheduler};

    const T: InstantMs = 1_700_000_000_000;

    fn scanner_with(
        source: Arc<MockSource>,
    ) -> (EventScanner, Arc<RecordingScheduler>) {
        let scheduler = Arc::new(RecordingScheduler::new());
        let dispatcher = AlertDispatcher::new(scheduler.clone());
        (EventScanner::new(source, dispatcher), scheduler)
    }

    #[tokio::test]
    async fn test_five_minute_lead_scenario() {
        // Event starts at T+300000 with a 5-minute lead: fire instant T.
        // One dispatch on the tick at T, none on the tick at T+2000.
        let source = Arc::new(MockSource::new());
        source.add_event(1, "Standup", T + 300_000, &[5]);
        let (mut scanner, scheduler) = scanner_with(source);

        scanner.tick(T).await;
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scanner.fired_len(), 1);

        scheduler
            .cancel(&WakeIdentity::Reminder { event_id: 1, lead_minutes: 5 })
            .await;
        scanner.tick(T + 2_000).await;
        assert_eq!(scheduler.pending_count(), 0, "no second dispatch");
        assert_eq!(scanner.fired_len(), 1);
    }

    #[tokio::test]
    async fn test_fired_key_suppresses_rule_still_in_window() {
        // Fire instant T+30000 stays inside the due window across both
        // ticks; only the store keeps the second tick from re-dispatching
        let source = Arc::new(MockSource::new());
        source.add_event(1, "Standup", T + 90_000, &[1]);
        let (mut scanner, scheduler) = scanner_with(source);

        scanner.tick(T).await;
        assert_eq!(scheduler.pending_count(), 1);

        scheduler
            .cancel(&WakeIdentity::Reminder { event_id: 1, lead_minutes: 1 })
            .await;
        scanner.tick(T + 2_000).await;
        assert_eq!(scheduler.pending_count(), 0, "suppressed by the fired key");
        assert_eq!(scanner.fired_len(), 1);
    }

    #[tokio::test]
    async fn test_each_rule_dispatched_exactly_once_across_ticks() {
        // Two rules with distinct fire instants: lead 10 fires at T,
        // lead 5 fires at T+300000.
        let source = Arc::new(MockSource::new());
        source.add_event(1, "Review", T + 600_000, &[10, 5]);
        let (mut scanner, scheduler) = scanner_with(source);

        scanner.tick(T).await;
        assert!(scheduler
            .pending_for(&WakeIdentity::Reminder { event_id: 1, lead_minutes: 10 })
            .is_some());
        assert!(scheduler
            .pending_for(&WakeIdentity::Reminder { event_id: 1, lead_minutes: 5 })
            .is_none());

        scanner.tick(T + 300_000).await;
        assert!(scheduler
            .pending_for(&WakeIdentity::Reminder { event_id: 1, lead_minutes: 5 })
            .is_some());
        assert_eq!(scanner.fired_len(), 2);
    }

    #[tokio::test]
    async fn test_query_failure_skips_tick_and_recovers() {
        let source = Arc::new(MockSource::new());
        source.add_event(1, "Standup", T + 300_000, &[5]);
        source.fail_events();
        let (mut scanner, scheduler) = scanner_with(source);

        scanner.tick(T).await;
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scanner.fired_len(), 0);
    }

    #[tokio::test]
    async fn test_rule_failure_skips_only_that_event() {
        let source = Arc::new(MockSource::new());
        source.add_event(1, "Broken", T + 300_000, &[5]);
        source.add_event(2, "Working", T + 300_000, &[5]);
        source.fail_rules_for(1);
        let (mut scanner, scheduler) = scanner_with(source);

        scanner.tick(T).await;
        assert!(scheduler
            .pending_for(&WakeIdentity::Reminder { event_id: 2, lead_minutes: 5 })
            .is_some());
        assert!(scheduler
            .pending_for(&WakeIdentity::Reminder { event_id: 1, lead_minutes: 5 })
            .is_none());
        assert_eq!(scanner.fired_len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_lead_rules_share_one_fired_key() {
        // Two identical rules produce the same key; only one dispatch
        let source = Arc::new(MockSource::new());
        source.add_event(1, "Standup", T + 300_000, &[5, 5]);
        let (mut scanner, scheduler) = scanner_with(source);

        scanner.tick(T).await;
        assert_eq!(scanner.fired_len(), 1);
        assert_eq!(scheduler.pending_count(), 1);
    }
}
