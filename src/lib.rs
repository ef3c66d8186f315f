// Core layer - shared configuration
pub mod core;

// Platform layer - host OS facade (event source, wake scheduler, registrar)
pub mod platform;

// Features layer - delivery-core feature modules
pub mod features;

// Application layer - service lifecycle and timer loop
pub mod service;

// Re-export core config for convenience
pub use crate::core::Config;

// Re-export feature items
pub use features::{
    // Dedup store
    FiredKey, FiredSet,
    // Scanner + evaluator
    due_reminders, EventScanner,
    // Alert dispatch
    AlertDispatcher,
    // Liveness guardian
    IndicatorState, LivenessGuardian,
    // Process watchdog
    ProcessWatchdog,
};

// Re-export service items
pub use service::{ControlMessage, MonitorHandle, MonitorService, WakeRouter};
