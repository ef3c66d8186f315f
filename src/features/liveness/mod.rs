//! # Feature: Liveness Guardian
//!
//! Keeps the persistent status indicator shown. The indicator is what
//! grants this process its elevated scheduling priority; a user can
//! dismiss it at any time, and some OS builds drop it silently.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Arm the fallback wake on every recreate, not only on the
//!   dismissed signal
//! - 1.1.0: React to the explicit dismissed signal without waiting for
//!   the periodic tick
//! - 1.0.0: Initial 5s periodic presence check

pub mod guardian;

pub use guardian::{IndicatorState, LivenessGuardian, FALLBACK_DELAY_MS, LIVENESS_INTERVAL};
