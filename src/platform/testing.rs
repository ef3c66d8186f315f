//! Mock platform implementations shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::PlatformError;
use super::traits::{AlertPresenter, EventSource, ProcessRegistrar, WakeScheduler};
use super::types::{
    CalendarEvent, IndicatorContent, InstantMs, ReminderRule, WakeIdentity, WakePayload,
};

/// One recorded `schedule_once` call
#[derive(Debug, Clone)]
pub struct ScheduledWake {
    pub at_ms: InstantMs,
    pub exact: bool,
    pub allow_while_idle: bool,
    pub payload: WakePayload,
}

/// Ordered log of scheduler operations, for asserting cancel-before-schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerOp {
    Cancel(WakeIdentity),
    Schedule(WakeIdentity),
}

/// Scheduler mock that records pending fires per identity instead of
/// actually firing them.
#[derive(Default)]
pub struct RecordingScheduler {
    deny_exact: AtomicBool,
    pending: Mutex<HashMap<WakeIdentity, ScheduledWake>>,
    ops: Mutex<Vec<SchedulerOp>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make exact scheduling fail with `ExactWakeDenied`
    pub fn deny_exact(&self) {
        self.deny_exact.store(true, Ordering::SeqCst);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn pending_for(&self, identity: &WakeIdentity) -> Option<ScheduledWake> {
        self.pending.lock().unwrap().get(identity).cloned()
    }

    pub fn ops(&self) -> Vec<SchedulerOp> {
        self.ops.lock().unwrap().clone()
    }
}

#[async_trait]
impl WakeScheduler for RecordingScheduler {
    async fn schedule_once(
        &self,
        identity: WakeIdentity,
        at_ms: InstantMs,
        exact: bool,
        allow_while_idle: bool,
        payload: WakePayload,
    ) -> Result<(), PlatformError> {
        if exact && self.deny_exact.load(Ordering::SeqCst) {
            return Err(PlatformError::ExactWakeDenied);
        }
        self.ops
            .lock()
            .unwrap()
            .push(SchedulerOp::Schedule(identity.clone()));
        self.pending.lock().unwrap().insert(
            identity,
            ScheduledWake {
                at_ms,
                exact,
                allow_while_idle,
                payload,
            },
        );
        Ok(())
    }

    async fn cancel(&self, identity: &WakeIdentity) {
        self.ops
            .lock()
            .unwrap()
            .push(SchedulerOp::Cancel(identity.clone()));
        self.pending.lock().unwrap().remove(identity);
    }
}

/// Event source mock with per-query failure switches
#[derive(Default)]
pub struct MockSource {
    events: Mutex<Vec<CalendarEvent>>,
    rules: Mutex<HashMap<i64, Vec<ReminderRule>>>,
    fail_events: AtomicBool,
    fail_rules_for: Mutex<HashSet<i64>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&self, id: i64, title: &str, start_ms: InstantMs, lead_minutes: &[i64]) {
        self.events.lock().unwrap().push(CalendarEvent {
            id,
            title: title.to_string(),
            start_ms,
        });
        self.rules.lock().unwrap().insert(
            id,
            lead_minutes
                .iter()
                .map(|&lead_minutes| ReminderRule {
                    event_id: id,
                    lead_minutes,
                })
                .collect(),
        );
    }

    pub fn fail_events(&self) {
        self.fail_events.store(true, Ordering::SeqCst);
    }

    pub fn fail_rules_for(&self, event_id: i64) {
        self.fail_rules_for.lock().unwrap().insert(event_id);
    }
}

#[async_trait]
impl EventSource for MockSource {
    async fn events_between(
        &self,
        start_ms: InstantMs,
        end_ms: InstantMs,
    ) -> Result<Vec<CalendarEvent>, PlatformError> {
        if self.fail_events.load(Ordering::SeqCst) {
            return Err(PlatformError::SourceUnavailable("mock outage".to_string()));
        }
        let mut events: Vec<CalendarEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.start_ms >= start_ms && e.start_ms <= end_ms)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_ms);
        Ok(events)
    }

    async fn alert_rules(&self, event_id: i64) -> Result<Vec<ReminderRule>, PlatformError> {
        if self.fail_rules_for.lock().unwrap().contains(&event_id) {
            return Err(PlatformError::SourceUnavailable(format!(
                "mock rule outage for event {event_id}"
            )));
        }
        Ok(self
            .rules
            .lock()
            .unwrap()
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Registrar mock tracking indicator visibility and restart requests
#[derive(Default)]
pub struct MockRegistrar {
    indicator_present: AtomicBool,
    presence_query_fails: AtomicBool,
    foreground_failures_left: AtomicUsize,
    pub foreground_calls: AtomicUsize,
    process_registered: AtomicBool,
    pub start_process_calls: AtomicUsize,
    pub wake_lock_held: AtomicBool,
}

impl MockRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_indicator_present(&self, present: bool) {
        self.indicator_present.store(present, Ordering::SeqCst);
    }

    pub fn fail_presence_query(&self, fail: bool) {
        self.presence_query_fails.store(fail, Ordering::SeqCst);
    }

    /// Make the next `n` foreground registrations fail
    pub fn fail_next_foreground(&self, n: usize) {
        self.foreground_failures_left.store(n, Ordering::SeqCst);
    }

    pub fn set_process_registered(&self, registered: bool) {
        self.process_registered.store(registered, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProcessRegistrar for MockRegistrar {
    async fn start_foreground(
        &self,
        _indicator_id: u32,
        _content: &IndicatorContent,
    ) -> Result<(), PlatformError> {
        self.foreground_calls.fetch_add(1, Ordering::SeqCst);
        let left = self.foreground_failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.foreground_failures_left.store(left - 1, Ordering::SeqCst);
            return Err(PlatformError::Presentation("mock failure".to_string()));
        }
        self.indicator_present.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_indicator_present(&self, _indicator_id: u32) -> Result<bool, PlatformError> {
        if self.presence_query_fails.load(Ordering::SeqCst) {
            return Err(PlatformError::Presentation("mock query failure".to_string()));
        }
        Ok(self.indicator_present.load(Ordering::SeqCst))
    }

    async fn is_process_registered(&self, _name: &str) -> bool {
        self.process_registered.load(Ordering::SeqCst)
    }

    async fn start_process(&self, _name: &str) -> Result<(), PlatformError> {
        self.start_process_calls.fetch_add(1, Ordering::SeqCst);
        self.process_registered.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn acquire_wake_lock(&self, _tag: &str) -> Result<(), PlatformError> {
        self.wake_lock_held.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn release_wake_lock(&self) {
        self.wake_lock_held.store(false, Ordering::SeqCst);
    }
}

/// Presenter mock recording every shown alert
#[derive(Default)]
pub struct MockPresenter {
    shown: Mutex<Vec<(u32, IndicatorContent)>>,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<(u32, IndicatorContent)> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertPresenter for MockPresenter {
    async fn show(
        &self,
        indicator_id: u32,
        content: &IndicatorContent,
    ) -> Result<(), PlatformError> {
        self.shown.lock().unwrap().push((indicator_id, content.clone()));
        Ok(())
    }
}
