//! Record validation against schemas
//!
//! Validation semantics:
//! - Fields are checked in declaration order
//! - Required fields must be present and non-null
//! - Present values are coerced to the declared type, then bound-checked
//! - Missing optional fields take their static default, or stay absent
//! - Every violation is collected; a record is produced only if none exist
//!
//! Validation is a pure function of the input and the schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::coerce::{coerce, describe_value, json_type_name};
use super::errors::{FieldViolation, SchemaError, SchemaResult, ValidationError};
use super::registry::SchemaRegistry;
use super::types::{FieldDef, Schema};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::record::{FieldValue, Record, RecordKind, SchemaRecord};

/// Handling of input keys the schema does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraFieldPolicy {
    /// Drop undeclared keys
    #[default]
    Ignore,
    /// Report each undeclared key as a violation
    Forbid,
}

impl Schema {
    /// Validates raw fields, ignoring undeclared keys.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<Record, ValidationError> {
        self.validate_with(raw, ExtraFieldPolicy::Ignore)
    }

    /// Validates raw fields with an explicit policy for undeclared keys.
    ///
    /// Violations for declared fields come first, in declaration order,
    /// followed by undeclared keys sorted by name.
    pub fn validate_with(
        &self,
        raw: &Map<String, Value>,
        policy: ExtraFieldPolicy,
    ) -> Result<Record, ValidationError> {
        let mut values = Vec::with_capacity(self.fields.len());
        let mut violations = Vec::new();

        for def in &self.fields {
            match resolve_field(def, raw.get(&def.name)) {
                Ok(value) => values.push((def.name.clone(), value)),
                Err(violation) => violations.push(violation),
            }
        }

        if policy == ExtraFieldPolicy::Forbid {
            let mut extra: Vec<&String> = raw
                .keys()
                .filter(|key| self.field(key).is_none())
                .collect();
            extra.sort();
            violations.extend(extra.into_iter().map(FieldViolation::unknown_field));
        }

        if !violations.is_empty() {
            return Err(ValidationError::new(self.kind.clone(), violations));
        }

        Ok(Record::new(self.kind.clone(), self.collection_name(), values))
    }
}

/// Resolves one declared field to its stored value.
fn resolve_field(def: &FieldDef, raw: Option<&Value>) -> Result<Option<FieldValue>, FieldViolation> {
    match raw {
        None | Some(Value::Null) if def.required => Err(FieldViolation::missing_field(&def.name)),
        None => match &def.default {
            None => Ok(None),
            Some(default) => coerce(default, def.field_type).map(Some).ok_or_else(|| {
                FieldViolation::type_mismatch(
                    &def.name,
                    def.field_type.type_name(),
                    format!("default {}", describe_value(default)),
                )
            }),
        },
        Some(Value::Null) if def.is_nullable() => Ok(None),
        Some(value) => {
            let coerced = coerce(value, def.field_type).ok_or_else(|| {
                FieldViolation::type_mismatch(
                    &def.name,
                    def.field_type.type_name(),
                    describe_value(value),
                )
            })?;
            check_constraints(def, &coerced)?;
            Ok(Some(coerced))
        }
    }
}

/// Checks numeric bounds; reports the first bound broken.
fn check_constraints(def: &FieldDef, value: &FieldValue) -> Result<(), FieldViolation> {
    let Some(n) = value.as_number() else {
        return Ok(());
    };
    match def.constraints.iter().find(|c| !c.is_satisfied_by(n)) {
        Some(constraint) => Err(FieldViolation::constraint_violation(
            &def.name,
            constraint.to_string(),
            value.to_string(),
        )),
        None => Ok(()),
    }
}

/// Validates raw fields against a built-in kind.
///
/// Undeclared keys are ignored. On failure the error lists every violation.
pub fn validate(kind: RecordKind, raw: &Map<String, Value>) -> Result<Record, ValidationError> {
    kind.schema().validate(raw)
}

/// Validates raw fields and converts the record to its typed struct.
pub fn validate_as<T: SchemaRecord>(raw: &Map<String, Value>) -> SchemaResult<T> {
    let record = validate(T::KIND, raw)?;
    T::from_record(&record).map_err(|e| SchemaError::record_conversion(T::KIND.name(), e))
}

/// Registry-backed validator for documents arriving from outside.
///
/// Resolves kinds by name, applies the configured extra-field policy,
/// logs each outcome and keeps counters.
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
    policy: ExtraFieldPolicy,
    metrics: MetricsRegistry,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a new validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            policy: ExtraFieldPolicy::default(),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Sets the policy for undeclared keys
    pub fn with_policy(mut self, policy: ExtraFieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the backing registry
    pub fn registry(&self) -> &SchemaRegistry {
        self.registry
    }

    /// Returns the extra-field policy in effect
    pub fn policy(&self) -> ExtraFieldPolicy {
        self.policy
    }

    /// Returns the validation counters
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Validates a JSON document as a record of the named kind.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if:
    /// - No schema is registered for the kind (REC_UNKNOWN_KIND)
    /// - The document is not a JSON object (REC_DOCUMENT_NOT_OBJECT)
    /// - Any field violates the schema (REC_VALIDATION_FAILED)
    pub fn validate_document(&self, kind: &str, document: &Value) -> SchemaResult<Record> {
        let schema = self
            .registry
            .get(kind)
            .ok_or_else(|| SchemaError::unknown_kind(kind))?;

        let Some(raw) = document.as_object() else {
            self.metrics.increment_rejected(0);
            return Err(SchemaError::not_an_object(&schema.kind, json_type_name(document)));
        };

        match schema.validate_with(raw, self.policy) {
            Ok(record) => {
                self.metrics.increment_validated();
                log_event_with_fields(
                    Event::RecordValidated,
                    &[("kind", record.kind()), ("collection", record.collection())],
                );
                Ok(record)
            }
            Err(error) => {
                self.metrics.increment_rejected(error.len() as u64);
                let count = error.len().to_string();
                let fields = error
                    .violations()
                    .iter()
                    .map(|v| v.field.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                log_event_with_fields(
                    Event::RecordRejected,
                    &[
                        ("kind", error.kind()),
                        ("violations", count.as_str()),
                        ("fields", fields.as_str()),
                    ],
                );
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Lead, User};
    use crate::schema::errors::ViolationKind;
    use crate::schema::types::{Constraint, FieldType};
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_user_passes() {
        let record = validate(
            RecordKind::User,
            &raw(json!({"name": "Alice", "email": "a@x.com", "address": "2 Elm", "age": 30})),
        )
        .unwrap();
        assert_eq!(record.get("age"), Some(&FieldValue::Int(30)));
        assert_eq!(record.get("is_active"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.collection(), "user");
    }

    #[test]
    fn test_missing_required_field_fails() {
        let err = validate(RecordKind::User, &raw(json!({"email": "a@x.com", "address": "2 Elm"})))
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err.has("name", ViolationKind::MissingRequiredField));
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let err = validate(
            RecordKind::User,
            &raw(json!({"name": null, "email": "a@x.com", "address": "2 Elm"})),
        )
        .unwrap_err();
        assert!(err.has("name", ViolationKind::MissingRequiredField));
    }

    #[test]
    fn test_null_optional_field_is_absent() {
        let record = validate(
            RecordKind::User,
            &raw(json!({"name": "A", "email": "a@x.com", "address": "2 Elm", "age": null})),
        )
        .unwrap();
        assert!(record.is_absent("age"));
    }

    #[test]
    fn test_null_for_defaulted_field_is_type_mismatch() {
        let err = validate(
            RecordKind::User,
            &raw(json!({"name": "A", "email": "a@x.com", "address": "2 Elm", "is_active": null})),
        )
        .unwrap_err();
        let violation = err.violation_for("is_active").unwrap();
        assert_eq!(violation.kind, ViolationKind::TypeMismatch);
        assert_eq!(violation.actual, "null");
    }

    #[test]
    fn test_all_violations_collected_in_order() {
        let err = validate(
            RecordKind::User,
            &raw(json!({"email": 42, "age": 121, "is_active": "yes"})),
        )
        .unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "address", "age", "is_active"]);
        assert!(err.has("email", ViolationKind::TypeMismatch));
        assert!(err.has("age", ViolationKind::ConstraintViolation));
        assert!(err.has("is_active", ViolationKind::TypeMismatch));
    }

    #[test]
    fn test_constraint_violation_details() {
        let err = validate(
            RecordKind::Product,
            &raw(json!({"title": "Sofa", "price": -0.01, "category": "Furniture"})),
        )
        .unwrap_err();
        let violation = err.violation_for("price").unwrap();
        assert_eq!(violation.kind, ViolationKind::ConstraintViolation);
        assert_eq!(violation.expected, "ge 0");
        assert_eq!(violation.actual, "-0.01");
    }

    #[test]
    fn test_extra_fields_ignored_by_default() {
        let record = validate(
            RecordKind::Product,
            &raw(json!({"title": "Sofa", "price": 10, "category": "F", "color": "red"})),
        )
        .unwrap();
        assert!(!record.has_field("color"));
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_extra_fields_forbidden() {
        let schema = RecordKind::Product.schema();
        let err = schema
            .validate_with(
                &raw(json!({"title": "Sofa", "price": 10, "zeta": 1, "alpha": 2})),
                ExtraFieldPolicy::Forbid,
            )
            .unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["category", "alpha", "zeta"]);
        assert!(err.has("alpha", ViolationKind::UnknownField));
    }

    #[test]
    fn test_invalid_default_reported_not_panicking() {
        let schema = Schema::new(
            "Widget",
            vec![FieldDef::with_default("count", FieldType::Int, json!("many"))
                .constrained(Constraint::Ge(0.0))],
        );
        let err = schema.validate(&Map::new()).unwrap_err();
        assert!(err.violation_for("count").unwrap().actual.starts_with("default"));
    }

    #[test]
    fn test_validate_as_typed() {
        let lead: Lead = validate_as(&raw(json!({
            "name": "Ann",
            "email": "ann@x.com",
            "budget_max": "1500000"
        })))
        .unwrap();
        assert_eq!(lead.budget_max, Some(1_500_000.0));
        assert_eq!(lead.status, "new");
        assert_eq!(lead.source, "website");

        let err = validate_as::<User>(&raw(json!({"name": "A"}))).unwrap_err();
        assert_eq!(err.validation().unwrap().len(), 2);
    }

    #[test]
    fn test_registry_validator_counts_outcomes() {
        let registry = SchemaRegistry::with_builtins();
        let validator = SchemaValidator::new(&registry);

        let ok = json!({"title": "Lamp", "price": 20.5, "category": "Lighting"});
        assert!(validator.validate_document("product", &ok).is_ok());

        let bad = json!({"title": "Lamp", "price": "cheap"});
        let err = validator.validate_document("Product", &bad).unwrap_err();
        assert_eq!(err.code().code(), "REC_VALIDATION_FAILED");

        let snapshot = validator.metrics().snapshot();
        assert_eq!(snapshot.records_validated, 1);
        assert_eq!(snapshot.records_rejected, 1);
        assert_eq!(snapshot.violations_reported, 2);
    }

    #[test]
    fn test_registry_validator_rejects_unknown_kind_and_non_objects() {
        let registry = SchemaRegistry::with_builtins();
        let validator = SchemaValidator::new(&registry);

        let err = validator.validate_document("Invoice", &json!({})).unwrap_err();
        assert_eq!(err.code().code(), "REC_UNKNOWN_KIND");

        let err = validator.validate_document("Lead", &json!(["Ann"])).unwrap_err();
        assert_eq!(err.code().code(), "REC_DOCUMENT_NOT_OBJECT");
        assert!(err.message().contains("array"));
    }

    #[test]
    fn test_registry_validator_uses_policy() {
        let registry = SchemaRegistry::with_builtins();
        let validator = SchemaValidator::new(&registry).with_policy(ExtraFieldPolicy::Forbid);
        let doc = json!({"name": "Ann", "email": "ann@x.com", "utm": "ad"});
        let err = validator.validate_document("lead", &doc).unwrap_err();
        assert!(err.validation().unwrap().has("utm", ViolationKind::UnknownField));
    }
}
