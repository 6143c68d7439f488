//! Strongly-typed views of the built-in record kinds
//!
//! Each struct is built from a validated [`Record`] of its kind. Optional
//! fields without a static default are `Option`s; `None` means the caller
//! did not provide a value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kind::RecordKind;
use super::value::{FieldValue, Record};

/// Errors converting a generic record into a typed struct
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Record belongs to a different kind
    #[error("expected a {expected} record, got '{actual}'")]
    WrongKind { expected: RecordKind, actual: String },

    /// Field not declared by the record's schema
    #[error("field '{0}' is not part of the record")]
    UndeclaredField(String),

    /// Required field holds no value
    #[error("field '{0}' has no value")]
    MissingValue(String),

    /// Field holds a value of another type
    #[error("field '{field}' holds a {actual}, expected {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Value does not fit the typed field
    #[error("field '{0}' is out of range")]
    OutOfRange(String),
}

/// Result type for record conversions
pub type RecordResult<T> = Result<T, RecordError>;

/// A typed struct bound to one record kind
pub trait SchemaRecord: Sized {
    /// The kind whose schema produces this struct
    const KIND: RecordKind;

    /// Builds the struct from a validated record of [`Self::KIND`]
    fn from_record(record: &Record) -> RecordResult<Self>;
}

/// Typed field access over a record of a known kind
struct Fields<'a> {
    record: &'a Record,
}

impl<'a> Fields<'a> {
    fn of(record: &'a Record, expected: RecordKind) -> RecordResult<Self> {
        if record.kind() != expected.name() {
            return Err(RecordError::WrongKind {
                expected,
                actual: record.kind().to_string(),
            });
        }
        Ok(Self { record })
    }

    fn value(&self, name: &str) -> RecordResult<Option<&'a FieldValue>> {
        if !self.record.has_field(name) {
            return Err(RecordError::UndeclaredField(name.to_string()));
        }
        Ok(self.record.get(name))
    }

    fn typed<T>(
        &self,
        name: &str,
        expected: &'static str,
        extract: impl Fn(&FieldValue) -> Option<T>,
    ) -> RecordResult<Option<T>> {
        match self.value(name)? {
            None => Ok(None),
            Some(value) => extract(value).map(Some).ok_or_else(|| RecordError::WrongType {
                field: name.to_string(),
                expected,
                actual: value.field_type().type_name(),
            }),
        }
    }

    fn require<T>(&self, name: &str, value: Option<T>) -> RecordResult<T> {
        value.ok_or_else(|| RecordError::MissingValue(name.to_string()))
    }

    fn opt_string(&self, name: &str) -> RecordResult<Option<String>> {
        self.typed(name, "string", |v| v.as_str().map(str::to_string))
    }

    fn string(&self, name: &str) -> RecordResult<String> {
        let value = self.opt_string(name)?;
        self.require(name, value)
    }

    fn opt_float(&self, name: &str) -> RecordResult<Option<f64>> {
        self.typed(name, "float", FieldValue::as_float)
    }

    fn float(&self, name: &str) -> RecordResult<f64> {
        let value = self.opt_float(name)?;
        self.require(name, value)
    }

    fn opt_int(&self, name: &str) -> RecordResult<Option<i64>> {
        self.typed(name, "int", FieldValue::as_int)
    }

    fn bool(&self, name: &str) -> RecordResult<bool> {
        let value = self.typed(name, "bool", FieldValue::as_bool)?;
        self.require(name, value)
    }

    fn opt_timestamp(&self, name: &str) -> RecordResult<Option<DateTime<Utc>>> {
        self.typed(name, "timestamp", FieldValue::as_timestamp)
    }
}

/// Users collection record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Address
    pub address: String,
    /// Age in years
    pub age: Option<u8>,
    /// Whether user is active
    pub is_active: bool,
}

impl SchemaRecord for User {
    const KIND: RecordKind = RecordKind::User;

    fn from_record(record: &Record) -> RecordResult<Self> {
        let fields = Fields::of(record, Self::KIND)?;
        let age = fields
            .opt_int("age")?
            .map(|age| u8::try_from(age).map_err(|_| RecordError::OutOfRange("age".into())))
            .transpose()?;

        Ok(Self {
            name: fields.string("name")?,
            email: fields.string("email")?,
            address: fields.string("address")?,
            age,
            is_active: fields.bool("is_active")?,
        })
    }
}

/// Products collection record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: Option<String>,
    /// Price in dollars
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl SchemaRecord for Product {
    const KIND: RecordKind = RecordKind::Product;

    fn from_record(record: &Record) -> RecordResult<Self> {
        let fields = Fields::of(record, Self::KIND)?;
        Ok(Self {
            title: fields.string("title")?,
            description: fields.opt_string("description")?,
            price: fields.float("price")?,
            category: fields.string("category")?,
            in_stock: fields.bool("in_stock")?,
        })
    }
}

/// Lead generated from the website or chatbot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Customer full name
    pub name: String,
    /// Customer email
    pub email: String,
    pub phone: Option<String>,
    /// Customer message or requirements
    pub message: Option<String>,
    /// Requested meeting time
    pub preferred_datetime: Option<DateTime<Utc>>,
    /// Buy/Sell/Rent and type (penthouse, villa, etc.)
    pub property_type: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    /// Where the lead originated (website/chatbot/form)
    pub source: String,
    pub status: String,
}

impl SchemaRecord for Lead {
    const KIND: RecordKind = RecordKind::Lead;

    fn from_record(record: &Record) -> RecordResult<Self> {
        let fields = Fields::of(record, Self::KIND)?;
        Ok(Self {
            name: fields.string("name")?,
            email: fields.string("email")?,
            phone: fields.opt_string("phone")?,
            message: fields.opt_string("message")?,
            preferred_datetime: fields.opt_timestamp("preferred_datetime")?,
            property_type: fields.opt_string("property_type")?,
            budget_min: fields.opt_float("budget_min")?,
            budget_max: fields.opt_float("budget_max")?,
            source: fields.string("source")?,
            status: fields.string("status")?,
        })
    }
}

macro_rules! impl_try_from_record {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<&Record> for $ty {
                type Error = RecordError;

                fn try_from(record: &Record) -> RecordResult<Self> {
                    <$ty as SchemaRecord>::from_record(record)
                }
            }
        )*
    };
}

impl_try_from_record!(User, Product, Lead);
