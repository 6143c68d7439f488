//! recordkit - Schema validation for User, Product and Lead records
//!
//! Raw field maps are checked against a declared schema: values are coerced
//! to their declared types, bounds are enforced, defaults fill missing
//! optional fields and every violation is collected before a record is
//! accepted or rejected.

pub mod cli;
pub mod observability;
pub mod record;
pub mod schema;

pub use record::{collection_name, Lead, Product, Record, RecordKind, User};
pub use schema::{validate, validate_as, SchemaError, ValidationError};
