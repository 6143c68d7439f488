//! Observability subsystem for recordkit
//!
//! This module provides:
//! - Structured logging (JSON lines on stderr)
//! - Validation counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. A failed log write never fails validation
//! 3. No async or background threads
//!
//! # Usage
//!
//! ```ignore
//! use recordkit::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::SchemasLoaded, &[("count", "3")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_validated();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
