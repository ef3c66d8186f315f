//! # Features Layer
//!
//! The delivery-core components, one directory per feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod dedup;
pub mod dispatch;
pub mod liveness;
pub mod scanner;
pub mod watchdog;

// Re-exports
pub use dedup::{FiredKey, FiredSet};
pub use dispatch::AlertDispatcher;
pub use liveness::{IndicatorState, LivenessGuardian};
pub use scanner::{due_reminders, EventScanner};
pub use watchdog::ProcessWatchdog;

/// Static description of one feature, for startup logging
pub struct FeatureInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub toggleable: bool,
}

/// Crate version from Cargo metadata
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// All registered features with their module versions
pub fn get_features() -> Vec<FeatureInfo> {
    vec![
        FeatureInfo {
            name: "Dedup Store",
            version: "1.0.0",
            toggleable: false,
        },
        FeatureInfo {
            name: "Event Scanner",
            version: "1.1.0",
            toggleable: false,
        },
        FeatureInfo {
            name: "Alert Dispatch",
            version: "1.0.0",
            toggleable: false,
        },
        FeatureInfo {
            name: "Liveness Guardian",
            version: "1.2.0",
            toggleable: false,
        },
        FeatureInfo {
            name: "Process Watchdog",
            version: "1.0.0",
            toggleable: true,
        },
    ]
}
