//! # Feature: Dedup Store
//!
//! Bounded in-memory set of fired-reminder keys. A key in the set
//! suppresses repeat delivery of the same reminder; the set lives for the
//! process lifetime and is intentionally lost on restart.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod fired_set;

pub use fired_set::{FiredKey, FiredSet, FIRED_SET_CAPACITY};
