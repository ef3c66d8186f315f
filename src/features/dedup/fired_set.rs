//! Fired-reminder key set with a wholesale-clear capacity bound.

use std::collections::HashSet;

use log::debug;

use crate::platform::{DueReminder, InstantMs};

/// Size bound on the fired set. The add that would exceed this clears the
/// whole set first, so the next key starts a fresh set of size 1. A key
/// dropped by that clear can re-fire if its window is still open; this
/// behavior is kept as-is.
pub const FIRED_SET_CAPACITY: usize = 100;

/// Identity of one fired reminder: event, rule, and the fire instant
/// rounded down to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiredKey {
    event_id: i64,
    lead_minutes: i64,
    fire_at_secs: i64,
}

impl FiredKey {
    pub fn new(event_id: i64, lead_minutes: i64, fire_at_ms: InstantMs) -> Self {
        FiredKey {
            event_id,
            lead_minutes,
            fire_at_secs: fire_at_ms.div_euclid(1000),
        }
    }
}

impl From<&DueReminder> for FiredKey {
    fn from(due: &DueReminder) -> Self {
        FiredKey::new(due.event_id, due.lead_minutes, due.fire_at_ms)
    }
}

/// In-memory set of fired-reminder keys, bounded by `FIRED_SET_CAPACITY`
#[derive(Debug, Default)]
pub struct FiredSet {
    keys: HashSet<FiredKey>,
}

impl FiredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &FiredKey) -> bool {
        self.keys.contains(key)
    }

    /// Record a fired key. Re-adding a contained key is a no-op and never
    /// triggers the capacity clear.
    pub fn add(&mut self, key: FiredKey) {
        if !self.keys.contains(&key) && self.keys.len() >= FIRED_SET_CAPACITY {
            debug!("Fired set at capacity ({FIRED_SET_CAPACITY}), clearing");
            self.keys.clear();
        }
        self.keys.insert(key);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
