//! # Feature: Alert Dispatch
//!
//! Routes a due reminder through a near-immediate wake hop so the alert
//! can be presented even under UI-launch restrictions.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod alarm;

pub use alarm::{AlertDispatcher, WAKE_DELAY_MS};
