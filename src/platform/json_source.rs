//! JSON-file backed event source for the demo binary.
//!
//! The file is re-read on every query so edits show up on the next
//! scanner tick, mirroring how the real calendar provider is queried
//! fresh each scan.
//!
//! File shape:
//!
//! ```json
//! {
//!   "events": [
//!     { "id": 1, "title": "Standup", "start_ms": 1756100000000, "lead_minutes": [5, 1] }
//!   ]
//! }
//! ```

use async_trait::async_trait;
use serde::Deserialize;

use super::error::PlatformError;
use super::traits::EventSource;
use super::types::{CalendarEvent, InstantMs, ReminderRule};

#[derive(Debug, Deserialize)]
struct EventRecord {
    id: i64,
    title: String,
    start_ms: InstantMs,
    #[serde(default)]
    lead_minutes: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct EventFile {
    events: Vec<EventRecord>,
}

pub struct JsonEventSource {
    path: String,
}

impl JsonEventSource {
    pub fn new(path: impl Into<String>) -> Self {
        JsonEventSource { path: path.into() }
    }

    async fn load(&self) -> Result<EventFile, PlatformError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| PlatformError::SourceUnavailable(format!("{}: {e}", self.path)))?;
        serde_json::from_str(&raw)
            .map_err(|e| PlatformError::SourceUnavailable(format!("{}: {e}", self.path)))
    }
}

#[async_trait]
impl EventSource for JsonEventSource {
    async fn events_between(
        &self,
        start_ms: InstantMs,
        end_ms: InstantMs,
    ) -> Result<Vec<CalendarEvent>, PlatformError> {
        let file = self.load().await?;
        let mut events: Vec<CalendarEvent> = file
            .events
            .into_iter()
            .filter(|e| e.start_ms >= start_ms && e.start_ms <= end_ms)
            .map(|e| CalendarEvent {
                id: e.id,
                title: e.title,
                start_ms: e.start_ms,
            })
            .collect();
        events.sort_by_key(|e| e.start_ms);
        Ok(events)
    }

    async fn alert_rules(&self, event_id: i64) -> Result<Vec<ReminderRule>, PlatformError> {
        let file = self.load().await?;
        Ok(file
            .events
            .into_iter()
            .filter(|e| e.id == event_id)
            .flat_map(|e| {
                e.lead_minutes
                    .into_iter()
                    .map(move |lead_minutes| ReminderRule {
                        event_id,
                        lead_minutes,
                    })
            })
            .collect())
    }
}
