//! # Platform Module
//!
//! Facade over the host OS facilities the delivery core consumes: the
//! calendar event source, the one-shot wake scheduler, the process
//! registrar (foreground registration, liveness queries, restarts), and
//! alert presentation. Every facility is a trait so the core runs against
//! mocks in tests and against in-process implementations in the demo
//! binary.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod error;
pub mod json_source;
pub mod tokio_wake;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod testing;

// Re-export commonly used items
pub use error::PlatformError;
pub use json_source::JsonEventSource;
pub use tokio_wake::{TokioWakeScheduler, WakeDelivery};
pub use traits::{AlertPresenter, EventSource, ProcessRegistrar, WakeScheduler};
pub use types::{
    now_ms, CalendarEvent, DueReminder, IndicatorContent, InstantMs, ReminderRule, WakeIdentity,
    WakePayload,
};
