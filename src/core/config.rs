//! Environment-driven configuration.
//!
//! All values have working defaults so the monitor can start from a bare
//! shell; a `.env` file is honored when present (loaded by the binary).

use anyhow::Result;

use crate::platform::IndicatorContent;

/// Runtime configuration for the monitor process
#[derive(Debug, Clone)]
pub struct Config {
    /// Log filter passed to env_logger (`LOG_LEVEL`, default "info")
    pub log_level: String,
    /// Path to the JSON event file read by the demo event source
    /// (`EVENTS_PATH`, default "events.json")
    pub events_path: String,
    /// Process name the watchdog checks and restarts
    /// (`MONITOR_PROCESS_NAME`, default "wakewatch-monitor")
    pub process_name: String,
    /// Title shown on the persistent indicator (`INDICATOR_TITLE`)
    pub indicator_title: String,
    /// Body text shown on the persistent indicator (`INDICATOR_TEXT`)
    pub indicator_text: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            events_path: std::env::var("EVENTS_PATH").unwrap_or_else(|_| "events.json".to_string()),
            process_name: std::env::var("MONITOR_PROCESS_NAME")
                .unwrap_or_else(|_| "wakewatch-monitor".to_string()),
            indicator_title: std::env::var("INDICATOR_TITLE")
                .unwrap_or_else(|_| "Wake Up".to_string()),
            indicator_text: std::env::var("INDICATOR_TEXT")
                .unwrap_or_else(|_| "Calendar monitoring active".to_string()),
        })
    }

    /// Content for the persistent status indicator this process must keep shown
    pub fn indicator_content(&self) -> IndicatorContent {
        IndicatorContent {
            title: self.indicator_title.clone(),
            body: self.indicator_text.clone(),
            icon: "ic_clock".to_string(),
            tap_target: "main".to_string(),
        }
    }
}
