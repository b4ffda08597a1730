//! Observability for modelguard
//!
//! Structured JSON logging of typed events. Engine-internal
//! inconsistencies (registration collisions, hook contract violations)
//! are reported here and never raised to callers.
//!
//! # Usage
//!
//! ```ignore
//! use modelguard::observability::{log_event_with_fields, Event, Severity};
//!
//! log_event_with_fields(Severity::Info, Event::HooksInstalled, &[("type", "Person")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a typed event
pub fn log_event(severity: Severity, event: Event) {
    Logger::log(severity, event.as_str(), &[]);
}

/// Log a typed event with fields
pub fn log_event_with_fields(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity, event.as_str(), fields);
}
