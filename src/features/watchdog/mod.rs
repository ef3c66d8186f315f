//! # Feature: Process Watchdog
//!
//! Externally OS-scheduled, self-rescheduling check that restarts the
//! monitor process if the OS has killed it. Runs fully outside the host
//! process's own timer loop, so it survives the process it watches.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true

pub mod keep_alive;

pub use keep_alive::{ProcessWatchdog, KEEP_ALIVE_INTERVAL_MS};
