//! Schema and validation error types
//!
//! Field-level violation codes:
//! - REC_MISSING_REQUIRED_FIELD
//! - REC_TYPE_MISMATCH
//! - REC_CONSTRAINT_VIOLATION
//! - REC_UNKNOWN_FIELD (only when undeclared fields are forbidden)
//!
//! Schema error codes:
//! - REC_UNKNOWN_KIND (REJECT)
//! - REC_DOCUMENT_NOT_OBJECT (REJECT)
//! - REC_VALIDATION_FAILED (REJECT)
//! - REC_RECORD_CONVERSION (REJECT)
//! - REC_SCHEMA_MALFORMED (FATAL)
//! - REC_SCHEMA_DUPLICATE (FATAL)

use serde::Serialize;
use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller input rejected; correct and retry
    Reject,
    /// Schema definitions are unusable; the process cannot serve
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// What went wrong with a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    /// A mandatory field had no value
    #[serde(rename = "REC_MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// The value could not be coerced to the declared type
    #[serde(rename = "REC_TYPE_MISMATCH")]
    TypeMismatch,
    /// The coerced value broke a numeric bound
    #[serde(rename = "REC_CONSTRAINT_VIOLATION")]
    ConstraintViolation,
    /// The input carried a field the schema does not declare
    #[serde(rename = "REC_UNKNOWN_FIELD")]
    UnknownField,
}

impl ViolationKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequiredField => "REC_MISSING_REQUIRED_FIELD",
            ViolationKind::TypeMismatch => "REC_TYPE_MISMATCH",
            ViolationKind::ConstraintViolation => "REC_CONSTRAINT_VIOLATION",
            ViolationKind::UnknownField => "REC_UNKNOWN_FIELD",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field name
    pub field: String,
    /// Violation category
    #[serde(rename = "code")]
    pub kind: ViolationKind,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or condition found
    pub actual: String,
}

impl FieldViolation {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::MissingRequiredField,
            expected: "field to be present".into(),
            actual: "missing".into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::TypeMismatch,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn constraint_violation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::ConstraintViolation,
            expected: constraint.into(),
            actual: value.into(),
        }
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::UnknownField,
            expected: "no undeclared fields".into(),
            actual: "extra field present".into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Every violation found while validating one record.
///
/// Never empty: a validation that finds nothing wrong produces a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    kind: String,
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub(crate) fn new(kind: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self {
            kind: kind.into(),
            violations,
        }
    }

    /// Record kind that failed validation
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// All violations, declared fields first in declaration order
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns the violation reported for a field, if any
    pub fn violation_for(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    /// Returns true if the field failed with the given kind of violation
    pub fn has(&self, field: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.kind == kind)
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} record failed validation with {} violation(s)",
            self.kind,
            self.violations.len()
        )?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Schema-level error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// No schema registered for the requested kind
    RecUnknownKind,
    /// Raw input is not a JSON object
    RecDocumentNotObject,
    /// Record violates its schema
    RecValidationFailed,
    /// Validated record could not be converted to its typed struct
    RecRecordConversion,
    /// Schema file or definition is invalid
    RecSchemaMalformed,
    /// Kind registered twice
    RecSchemaDuplicate,
    /// Export target file already exists
    RecSchemaFileExists,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::RecUnknownKind => "REC_UNKNOWN_KIND",
            SchemaErrorCode::RecDocumentNotObject => "REC_DOCUMENT_NOT_OBJECT",
            SchemaErrorCode::RecValidationFailed => "REC_VALIDATION_FAILED",
            SchemaErrorCode::RecRecordConversion => "REC_RECORD_CONVERSION",
            SchemaErrorCode::RecSchemaMalformed => "REC_SCHEMA_MALFORMED",
            SchemaErrorCode::RecSchemaDuplicate => "REC_SCHEMA_DUPLICATE",
            SchemaErrorCode::RecSchemaFileExists => "REC_SCHEMA_FILE_EXISTS",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::RecSchemaMalformed | SchemaErrorCode::RecSchemaDuplicate => {
                Severity::Fatal
            }
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    kind: Option<String>,
    validation: Option<ValidationError>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, kind: Option<String>) -> Self {
        Self {
            code,
            message,
            kind,
            validation: None,
        }
    }

    /// Create an unknown kind error
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::new(
            SchemaErrorCode::RecUnknownKind,
            format!("No schema registered for kind '{}'", kind),
            Some(kind),
        )
    }

    /// Create an error for input that is not a JSON object
    pub fn not_an_object(kind: impl Into<String>, actual: &str) -> Self {
        let kind = kind.into();
        Self::new(
            SchemaErrorCode::RecDocumentNotObject,
            format!("{} input must be a JSON object, got {}", kind, actual),
            Some(kind),
        )
    }

    /// Create a validation failed error
    pub fn validation_failed(error: ValidationError) -> Self {
        Self {
            code: SchemaErrorCode::RecValidationFailed,
            message: error.to_string(),
            kind: Some(error.kind().to_string()),
            validation: Some(error),
        }
    }

    /// Create an error for a record that does not fit its typed struct
    pub fn record_conversion(kind: impl Into<String>, reason: impl fmt::Display) -> Self {
        let kind = kind.into();
        Self::new(
            SchemaErrorCode::RecRecordConversion,
            format!("Cannot convert {} record: {}", kind, reason),
            Some(kind),
        )
    }

    /// Create an error for a malformed schema file or definition
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::RecSchemaMalformed,
            format!("Malformed schema '{}': {}", source.into(), reason.into()),
            None,
        )
    }

    /// Create a duplicate kind error
    pub fn duplicate_kind(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::new(
            SchemaErrorCode::RecSchemaDuplicate,
            format!("Kind '{}' is already registered", kind),
            Some(kind),
        )
    }

    /// Create an error for an export target that already exists
    pub fn file_exists(path: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::RecSchemaFileExists,
            format!("Schema file '{}' already exists", path.into()),
            None,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the record kind if applicable
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Returns the field violations if validation failed
    pub fn validation(&self) -> Option<&ValidationError> {
        self.validation.as_ref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.validation
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<ValidationError> for SchemaError {
    fn from(error: ValidationError) -> Self {
        Self::validation_failed(error)
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
