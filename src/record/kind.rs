//! Built-in record kinds and collection naming

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::schema::{builtin, Schema, SchemaError};

/// Kinds whose collection name is not the lowercased kind name.
const IRREGULAR_COLLECTIONS: &[(&str, &str)] = &[("BlogPost", "blogs")];

/// Derives the storage collection name for a record kind.
///
/// The rule is the lowercase form of the kind name, except for the entries
/// in the irregular table, which match the kind name exactly.
pub fn collection_name(kind: &str) -> String {
    IRREGULAR_COLLECTIONS
        .iter()
        .find(|(irregular, _)| *irregular == kind)
        .map_or_else(|| kind.to_lowercase(), |(_, collection)| (*collection).to_string())
}

/// The record kinds that ship with the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    User,
    Product,
    Lead,
}

impl RecordKind {
    /// All built-in kinds, in registration order
    pub const ALL: [RecordKind; 3] = [RecordKind::User, RecordKind::Product, RecordKind::Lead];

    /// Returns the kind name as used in schemas
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::User => "User",
            RecordKind::Product => "Product",
            RecordKind::Lead => "Lead",
        }
    }

    /// Returns the static schema for this kind
    pub fn schema(&self) -> &'static Schema {
        builtin::schema_for(*self)
    }

    /// Returns the storage collection for this kind
    pub fn collection_name(&self) -> String {
        collection_name(self.name())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordKind {
    type Err = SchemaError;

    /// Parses a kind name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SchemaError::unknown_kind(s))
    }
}
