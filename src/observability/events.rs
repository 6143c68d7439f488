//! Observable events for recordkit
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Schema files loaded into the registry
    SchemasLoaded,
    /// Schema written to disk
    SchemaExported,

    // Validation
    /// Record passed validation
    RecordValidated,
    /// Record rejected with violations
    RecordRejected,
    /// Batch of records finished
    BatchComplete,

    // Commands
    /// Command failed before completing
    CommandFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaExported => "SCHEMA_EXPORTED",
            Event::RecordValidated => "RECORD_VALIDATED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::BatchComplete => "BATCH_COMPLETE",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Returns the severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RecordValidated => Severity::Trace,
            Event::RecordRejected => Severity::Warn,
            Event::CommandFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
