//! Coercion of raw JSON values into typed field values
//!
//! Coercion is lax in the direction callers usually need (numeric strings,
//! whole floats for ints, ISO strings for timestamps) but never guesses:
//! booleans are not numbers, `"yes"` is not a boolean, and non-finite floats
//! are rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::types::FieldType;
use crate::record::FieldValue;

/// Datetime layouts carrying an offset, tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Naive datetime layouts accepted for timestamps, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Unix times beyond this magnitude are milliseconds rather than seconds.
const MILLIS_WATERSHED: i64 = 20_000_000_000;

/// Longest string rendered verbatim in error messages.
const MAX_RENDERED_LEN: usize = 64;

/// Coerces a raw value to the given field type.
///
/// Returns `None` when the value cannot be represented as that type.
pub fn coerce(value: &Value, field_type: FieldType) -> Option<FieldValue> {
    match field_type {
        FieldType::String => value.as_str().map(|s| FieldValue::String(s.to_string())),
        FieldType::Int => coerce_int(value).map(FieldValue::Int),
        FieldType::Float => coerce_float(value).map(FieldValue::Float),
        FieldType::Bool => coerce_bool(value).map(FieldValue::Bool),
        FieldType::Timestamp => coerce_timestamp(value).map(FieldValue::Timestamp),
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            // u64 beyond i64::MAX
            if n.is_u64() {
                return None;
            }
            n.as_f64().and_then(whole_f64)
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn whole_f64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => unix_int(i),
            None => unix_float(n.as_f64()?),
        },
        Value::Object(map) if map.len() == 1 => match map.get("$date")? {
            Value::String(s) => parse_timestamp(s.trim()),
            Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
            Value::Object(inner) => {
                let millis = inner.get("$numberLong")?.as_str()?.parse::<i64>().ok()?;
                DateTime::from_timestamp_millis(millis)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Integer Unix time: seconds, or milliseconds past the watershed.
fn unix_int(n: i64) -> Option<DateTime<Utc>> {
    if n.unsigned_abs() > MILLIS_WATERSHED as u64 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}

/// Fractional Unix time, kept to microsecond precision.
fn unix_float(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    let micros = if n.abs() > MILLIS_WATERSHED as f64 {
        n * 1_000.0
    } else {
        n * 1_000_000.0
    };
    // i64::MAX as f64 rounds up to 2^63
    if micros.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros.round() as i64)
}

/// Parses a timestamp string.
///
/// Accepts Unix time as a numeric string (same seconds/milliseconds rule as
/// JSON numbers), RFC 3339 and other ISO 8601 date-times with an offset
/// (`Z`, `+02:00` or `+0200`), naive date-times (read as UTC) and bare dates
/// (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(n) = s.parse::<i64>() {
        return unix_int(n);
    }
    if let Ok(n) = s.parse::<f64>() {
        return unix_float(n);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders a raw value for an error message, e.g. `string "yes"`.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) if s.chars().count() > MAX_RENDERED_LEN => {
            let head: String = s.chars().take(MAX_RENDERED_LEN).collect();
            format!("string \"{}...\"", head)
        }
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(_) | Value::Object(_) => json_type_name(value).to_string(),
        other => format!("{} {}", json_type_name(other), other),
    }
}
