//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - timestamp: UTC instant (ISO 8601 on the wire)
//!
//! A schema is an ordered table of field definitions. Declaration order is
//! the order in which fields are checked and in which violations are reported.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use super::coerce::coerce;
use crate::record::collection_name;

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Point in time, normalized to UTC
    Timestamp,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
        }
    }

    /// Returns true for types that numeric constraints apply to
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Numeric bound on an int or float field.
///
/// Serialized as a single-key object, e.g. `{"ge": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constraint {
    /// value >= bound
    Ge(f64),
    /// value <= bound
    Le(f64),
    /// value > bound
    Gt(f64),
    /// value < bound
    Lt(f64),
}

impl Constraint {
    /// Checks a numeric value against this bound
    pub fn is_satisfied_by(&self, value: f64) -> bool {
        match *self {
            Constraint::Ge(bound) => value >= bound,
            Constraint::Le(bound) => value <= bound,
            Constraint::Gt(bound) => value > bound,
            Constraint::Lt(bound) => value < bound,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Ge(bound) => write!(f, "ge {}", bound),
            Constraint::Le(bound) => write!(f, "le {}", bound),
            Constraint::Gt(bound) => write!(f, "gt {}", bound),
            Constraint::Lt(bound) => write!(f, "lt {}", bound),
        }
    }
}

/// Field definition.
///
/// A field that is neither required nor carries a static default is
/// nullable: an explicit `null` is accepted and stored as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as it appears in raw input
    pub name: String,
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present
    #[serde(default)]
    pub required: bool,
    /// Static default used when the field is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Numeric bounds, checked after coercion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    fn new(name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            required,
            default: None,
            constraints: Vec::new(),
            description: None,
        }
    }

    /// Create a required field
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, field_type, true)
    }

    /// Create an optional field that is absent when not supplied
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, field_type, false)
    }

    /// Create an optional field with a static default
    pub fn with_default(name: impl Into<String>, field_type: FieldType, default: Value) -> Self {
        Self {
            default: Some(default),
            ..Self::new(name, field_type, false)
        }
    }

    /// Adds a numeric bound
    pub fn constrained(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the description
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if an explicit `null` counts as "not provided"
    pub fn is_nullable(&self) -> bool {
        !self.required && self.default.is_none()
    }
}

/// Complete schema definition for one record kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Record kind name, e.g. "User"
    pub kind: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit collection name, overriding the derived one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Field definitions in declaration order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(kind: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            kind: kind.into(),
            description: None,
            collection: None,
            fields,
        }
    }

    /// Sets the description
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Gets a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the storage collection for records of this schema
    pub fn collection_name(&self) -> String {
        match &self.collection {
            Some(name) => name.clone(),
            None => collection_name(&self.kind),
        }
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.kind.trim().is_empty() {
            return Err("Schema kind must not be empty".into());
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(format!("Schema '{}' has a field with an empty name", self.kind));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("Field '{}' is declared twice", field.name));
            }
            if field.required && field.default.is_some() {
                return Err(format!("Required field '{}' must not declare a default", field.name));
            }
            if !field.constraints.is_empty() && !field.field_type.is_numeric() {
                return Err(format!(
                    "Field '{}' of type {} cannot carry numeric constraints",
                    field.name, field.field_type
                ));
            }

            if let Some(default) = &field.default {
                let value = coerce(default, field.field_type).ok_or_else(|| {
                    format!("Default for '{}' is not a valid {}", field.name, field.field_type)
                })?;
                if let Some(n) = value.as_number() {
                    if let Some(c) = field.constraints.iter().find(|c| !c.is_satisfied_by(n)) {
                        return Err(format!("Default for '{}' violates {}", field.name, c));
                    }
                }
            }
        }

        Ok(())
    }
}
