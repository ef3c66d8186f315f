//! # Feature: Event Scanner
//!
//! Periodic calendar scan driving the reminder evaluator, the dedup
//! store, and alert dispatch. The timer loop re-arms the next tick only
//! after the current one completes, so ticks never overlap.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Rule-fetch failures skip only the affected event instead of
//!   ending the whole tick
//! - 1.0.0: Initial release with 30s scan period, 5min lookahead, and
//!   independent evaluation of every rule on an event

pub mod evaluator;
pub mod scan;

pub use evaluator::{due_reminders, DUE_WINDOW_MS, SCAN_WINDOW_MS};
pub use scan::{EventScanner, SCAN_INTERVAL};
