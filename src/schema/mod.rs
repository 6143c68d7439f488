//! Schema Validator subsystem for recordkit
//!
//! Schemas are ordered field tables consulted by one generic validation
//! routine. Raw input is coerced field by field into a typed [`Record`],
//! or rejected with every violation listed.
//!
//! # Design Principles
//!
//! - All-or-nothing: a record is never partially populated
//! - Every violation is reported, not just the first
//! - Absence is explicit, never a zero value
//! - Validation is pure and deterministic
//!
//! [`Record`]: crate::record::Record

pub mod builtin;
mod coerce;
mod errors;
mod registry;
mod types;
mod validator;

pub use coerce::{coerce, parse_timestamp};
pub use errors::{
    FieldViolation, SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationError,
    ViolationKind,
};
pub use registry::SchemaRegistry;
pub use types::{Constraint, FieldDef, FieldType, Schema};
pub use validator::{validate, validate_as, ExtraFieldPolicy, SchemaValidator};
