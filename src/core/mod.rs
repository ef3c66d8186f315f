//! # Core Module
//!
//! Shared configuration for the wakewatch monitor.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod config;

// Re-export commonly used items
pub use config::Config;
