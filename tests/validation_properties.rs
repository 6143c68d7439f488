//! Validation Property Tests
//!
//! Behavior of the built-in User, Product and Lead schemas:
//! - Omitting any required field is reported by name, and no record is produced
//! - Omitting an optional field yields its default or an absent value
//! - Numeric bounds are inclusive
//! - Type mismatches are reported instead of guessed
//! - Every violation is collected, in declaration order
//! - Validation is deterministic and safe to share across threads

use chrono::{TimeZone, Utc};
use recordkit::record::{FieldValue, Lead, Product, RecordKind, User};
use recordkit::schema::{validate, validate_as, ViolationKind};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::thread;

// =============================================================================
// Helper Functions
// =============================================================================

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn valid_input(kind: RecordKind) -> Map<String, Value> {
    object(match kind {
        RecordKind::User => json!({
            "name": "Jane Doe",
            "email": "jane@x.com",
            "address": "1 Main St"
        }),
        RecordKind::Product => json!({
            "title": "Sofa",
            "price": 199.99,
            "category": "Furniture"
        }),
        RecordKind::Lead => json!({
            "name": "Ann",
            "email": "ann@x.com",
            "source": "chatbot"
        }),
    })
}

fn user_with_age(age: Value) -> Map<String, Value> {
    let mut raw = valid_input(RecordKind::User);
    raw.insert("age".to_string(), age);
    raw
}

fn product_with_price(price: Value) -> Map<String, Value> {
    let mut raw = valid_input(RecordKind::Product);
    raw.insert("price".to_string(), price);
    raw
}

// =============================================================================
// Required Field Tests
// =============================================================================

/// Dropping any one required field yields MissingRequiredField for that field.
#[test]
fn test_every_required_field_is_enforced() {
    for kind in RecordKind::ALL {
        let required: Vec<&str> = kind
            .schema()
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();
        assert!(!required.is_empty());

        for field in required {
            let mut raw = valid_input(kind);
            raw.remove(field);

            let err = validate(kind, &raw).unwrap_err();
            assert_eq!(err.len(), 1, "{} without {}: {}", kind, field, err);
            assert!(err.has(field, ViolationKind::MissingRequiredField));
        }
    }
}

/// A required field sent as null counts as missing.
#[test]
fn test_null_required_field_is_missing() {
    let mut raw = valid_input(RecordKind::User);
    raw.insert("email".to_string(), Value::Null);

    let err = validate(RecordKind::User, &raw).unwrap_err();
    assert!(err.has("email", ViolationKind::MissingRequiredField));
}

// =============================================================================
// Optional Field Tests
// =============================================================================

/// Omitted optional fields take their default, or stay absent.
#[test]
fn test_optional_fields_default_or_absent() {
    for kind in RecordKind::ALL {
        let mut raw = valid_input(kind);
        raw.remove("source");
        let record = validate(kind, &raw).unwrap();

        for def in kind.schema().fields.iter().filter(|f| !f.required) {
            match &def.default {
                Some(default) => assert_eq!(
                    record.get(&def.name).map(FieldValue::to_json).as_ref(),
                    Some(default),
                    "{}.{}",
                    kind,
                    def.name
                ),
                None => assert!(record.is_absent(&def.name), "{}.{}", kind, def.name),
            }
        }
    }
}

/// An absent value is distinct from a zero, empty or false value.
#[test]
fn test_absence_is_not_a_zero_value() {
    let record = validate(RecordKind::User, &user_with_age(json!(0))).unwrap();
    assert_eq!(record.get("age"), Some(&FieldValue::Int(0)));
    assert!(!record.is_absent("age"));

    let record = validate(RecordKind::User, &valid_input(RecordKind::User)).unwrap();
    assert_eq!(record.get("age"), None);
    assert!(record.is_absent("age"));
}

// =============================================================================
// Bounds Tests
// =============================================================================

/// Age bounds are inclusive at 0 and 120.
#[test]
fn test_age_bounds() {
    for age in [0, 120] {
        assert!(validate(RecordKind::User, &user_with_age(json!(age))).is_ok(), "age {}", age);
    }

    for age in [-1, 121] {
        let err = validate(RecordKind::User, &user_with_age(json!(age))).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err.has("age", ViolationKind::ConstraintViolation), "age {}", age);
    }
}

/// Price must not be negative; zero is allowed.
#[test]
fn test_price_bounds() {
    assert!(validate(RecordKind::Product, &product_with_price(json!(0))).is_ok());

    let err = validate(RecordKind::Product, &product_with_price(json!(-0.01))).unwrap_err();
    let violation = err.violation_for("price").unwrap();
    assert_eq!(violation.kind, ViolationKind::ConstraintViolation);
    assert_eq!(violation.expected, "ge 0");
}

// =============================================================================
// Type Tests
// =============================================================================

/// "yes" is not a boolean.
#[test]
fn test_is_active_rejects_yes() {
    let mut raw = valid_input(RecordKind::User);
    raw.insert("is_active".to_string(), json!("yes"));

    let err = validate(RecordKind::User, &raw).unwrap_err();
    assert!(err.has("is_active", ViolationKind::TypeMismatch));
}

/// Unambiguous representations are coerced to the declared type.
#[test]
fn test_unambiguous_values_are_coerced() {
    let mut raw = user_with_age(json!("42"));
    raw.insert("is_active".to_string(), json!("false"));

    let user: User = validate_as(&raw).unwrap();
    assert_eq!(user.age, Some(42));
    assert!(!user.is_active);
}

/// A fractional age is a type mismatch, not a rounding.
#[test]
fn test_fractional_int_is_rejected() {
    let err = validate(RecordKind::User, &user_with_age(json!(30.5))).unwrap_err();
    assert!(err.has("age", ViolationKind::TypeMismatch));
}

/// A value that fails coercion is not also bound-checked.
#[test]
fn test_type_mismatch_reported_once() {
    let err = validate(RecordKind::Product, &product_with_price(json!("free"))).unwrap_err();
    assert_eq!(err.len(), 1);
    assert!(err.has("price", ViolationKind::TypeMismatch));
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[test]
fn test_user_end_to_end() {
    let record = validate(RecordKind::User, &valid_input(RecordKind::User)).unwrap();
    assert_eq!(record.collection(), "user");
    assert!(record.is_absent("age"));
    assert_eq!(record.get("is_active"), Some(&FieldValue::Bool(true)));

    let user: User = validate_as(&valid_input(RecordKind::User)).unwrap();
    assert_eq!(
        user,
        User {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            address: "1 Main St".to_string(),
            age: None,
            is_active: true,
        }
    );
}

#[test]
fn test_product_end_to_end() {
    let product: Product = validate_as(&valid_input(RecordKind::Product)).unwrap();
    assert_eq!(product.title, "Sofa");
    assert_eq!(product.price, 199.99);
    assert_eq!(product.category, "Furniture");
    assert_eq!(product.description, None);
    assert!(product.in_stock);
}

#[test]
fn test_lead_end_to_end() {
    let lead: Lead = validate_as(&valid_input(RecordKind::Lead)).unwrap();
    assert_eq!(lead.name, "Ann");
    assert_eq!(lead.source, "chatbot");
    assert_eq!(lead.status, "new");
    assert_eq!(lead.phone, None);
    assert_eq!(lead.message, None);
    assert_eq!(lead.preferred_datetime, None);
    assert_eq!(lead.property_type, None);
    assert_eq!(lead.budget_min, None);
    assert_eq!(lead.budget_max, None);
}

#[test]
fn test_lead_preferred_datetime() {
    let mut raw = valid_input(RecordKind::Lead);
    raw.insert("preferred_datetime".to_string(), json!("2024-05-01T14:30:00Z"));
    raw.insert("budget_min".to_string(), json!(250000));

    let lead: Lead = validate_as(&raw).unwrap();
    assert_eq!(
        lead.preferred_datetime,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap())
    );
    assert_eq!(lead.budget_min, Some(250000.0));
}

/// Browser clients send `Date.now()` milliseconds; those are not seconds.
#[test]
fn test_lead_preferred_datetime_client_forms() {
    let expected = Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap();

    for raw in [
        json!(expected.timestamp_millis()),
        json!(expected.timestamp()),
        json!("2024-05-01T16:30:00+0200"),
        json!("2024-05-01T14:30Z"),
    ] {
        let mut input = valid_input(RecordKind::Lead);
        input.insert("preferred_datetime".to_string(), raw.clone());

        let lead: Lead = validate_as(&input).unwrap();
        assert_eq!(lead.preferred_datetime, Some(expected), "input {}", raw);
    }
}

// =============================================================================
// Error Collection Tests
// =============================================================================

/// All violations are reported together, in declaration order.
#[test]
fn test_all_violations_collected_in_order() {
    let raw = object(json!({
        "price": -5,
        "in_stock": "maybe"
    }));

    let err = validate(RecordKind::Product, &raw).unwrap_err();
    let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, vec!["title", "price", "category", "in_stock"]);

    let kinds: Vec<ViolationKind> = err.violations().iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::MissingRequiredField,
            ViolationKind::ConstraintViolation,
            ViolationKind::MissingRequiredField,
            ViolationKind::TypeMismatch,
        ]
    );
}

/// The error message names the kind and every offending field.
#[test]
fn test_error_message_lists_fields() {
    let err = validate(RecordKind::Lead, &Map::new()).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Lead record failed validation with 2 violation(s)"));
    assert!(message.contains("'name'"));
    assert!(message.contains("'email'"));
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Same input, same outcome, every time.
#[test]
fn test_validation_is_deterministic() {
    let good = valid_input(RecordKind::User);
    let bad = user_with_age(json!(-3));

    let first_ok = validate(RecordKind::User, &good).unwrap().to_document();
    let first_err = validate(RecordKind::User, &bad).unwrap_err();

    for _ in 0..100 {
        assert_eq!(validate(RecordKind::User, &good).unwrap().to_document(), first_ok);
        assert_eq!(validate(RecordKind::User, &bad).unwrap_err(), first_err);
    }
}

/// Validation is pure and may run concurrently on shared schemas.
#[test]
fn test_concurrent_validation() {
    let inputs = Arc::new(vec![
        (RecordKind::User, valid_input(RecordKind::User), true),
        (RecordKind::Product, product_with_price(json!(-1)), false),
        (RecordKind::Lead, valid_input(RecordKind::Lead), true),
    ]);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let inputs = Arc::clone(&inputs);
            thread::spawn(move || {
                for _ in 0..50 {
                    for (kind, raw, ok) in inputs.iter() {
                        assert_eq!(validate(*kind, raw).is_ok(), *ok);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
