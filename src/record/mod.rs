//! Validated records for recordkit
//!
//! A [`Record`] is the generic output of schema validation: every declared
//! field in order, each holding a typed [`FieldValue`] or nothing. The
//! built-in kinds also have typed structs ([`User`], [`Product`], [`Lead`]).

mod kind;
mod models;
mod value;

pub use kind::{collection_name, RecordKind};
pub use models::{Lead, Product, RecordError, RecordResult, SchemaRecord, User};
pub use value::{FieldValue, Record};
