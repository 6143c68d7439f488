//! Typed field values and validated records

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::schema::FieldType;

/// A coerced, typed field value.
///
/// Absence is never a `FieldValue`; records hold `Option<FieldValue>`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Returns the schema type this value belongs to
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::String(_) => FieldType::String,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Timestamp(_) => FieldType::Timestamp,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Numeric view used for constraint checks
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Converts to the JSON representation stored in documents
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Timestamp(ts) => {
                Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{:?}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Timestamp(ts) => {
                write!(f, "{}", ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

/// A validated record.
///
/// Holds every declared field of its schema in declaration order, with
/// `None` marking a field that was not provided. Records are only built by
/// the validator and are read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: String,
    collection: String,
    fields: Vec<(String, Option<FieldValue>)>,
}

impl Record {
    pub(crate) fn new(
        kind: impl Into<String>,
        collection: impl Into<String>,
        fields: Vec<(String, Option<FieldValue>)>,
    ) -> Self {
        Self {
            kind: kind.into(),
            collection: collection.into(),
            fields,
        }
    }

    /// Record kind name
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Storage collection this record belongs in
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the value of a field, or `None` if absent or undeclared
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Returns true if the schema declares this field
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    /// Returns true if the field is declared but holds no value
    pub fn is_absent(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|(field, value)| field == name && value.is_none())
    }

    /// Iterates fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the record as a JSON document; absent fields become `null`
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        for (name, value) in &self.fields {
            let json = value.as_ref().map_or(Value::Null, FieldValue::to_json);
            doc.insert(name.clone(), json);
        }
        Value::Object(doc)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
