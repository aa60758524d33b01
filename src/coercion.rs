use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::errors::CoercionError;
use crate::schema::FieldType;

/// Wire pattern for `DATETIME` values, e.g. `2002-04-20T12:30:52Z`
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// Wire pattern for `DATE` values, e.g. `2002-04-20`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A filter value after coercion to its field's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
    String(String),
    Number(f64),
    Date(NaiveDate),
    #[serde(rename = "datetime")]
    DateTime(DateTime<Utc>),
}

impl TypedValue {
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::String(_) => FieldType::String,
            Self::Number(_) => FieldType::Number,
            Self::Date(_) => FieldType::Date,
            Self::DateTime(_) => FieldType::DateTime,
        }
    }

    /// Order two values of the same type. Mixed types are incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Read `raw` as a value of `target` type.
///
/// Strings are taken verbatim; every other type ignores surrounding
/// whitespace and must match its pattern exactly.
///
/// # Errors
///
/// Returns a [`CoercionError`] when `raw` is not a valid literal of `target`.
pub fn coerce(raw: &str, target: FieldType) -> Result<TypedValue, CoercionError> {
    let trimmed = raw.trim();
    let value = match target {
        FieldType::String => Some(TypedValue::String(raw.to_string())),
        FieldType::Number => parse_number(trimmed).map(TypedValue::Number),
        FieldType::Date => parse_date(trimmed).map(TypedValue::Date),
        FieldType::DateTime => parse_datetime(trimmed).map(TypedValue::DateTime),
    };

    value.ok_or_else(|| CoercionError {
        value: raw.to_string(),
        expected: target,
    })
}

/// Most specific type `raw` can be read as: date-time, then date, else string.
#[must_use]
pub fn infer(raw: &str) -> TypedValue {
    let trimmed = raw.trim();
    if let Some(dt) = parse_datetime(trimmed) {
        TypedValue::DateTime(dt)
    } else if let Some(date) = parse_date(trimmed) {
        TypedValue::Date(date)
    } else {
        TypedValue::String(raw.to_string())
    }
}

/// Read a stored JSON document value as `target` type.
///
/// Text columns accept any scalar; numbers must be JSON numbers or numeric
/// strings; dates are read from strings in their wire pattern. `null` and
/// anything unreadable yield `None`.
#[must_use]
pub fn coerce_json(value: &serde_json::Value, target: FieldType) -> Option<TypedValue> {
    use serde_json::Value;

    match (target, value) {
        (_, Value::Null | Value::Array(_) | Value::Object(_)) => None,
        (FieldType::String, Value::String(s)) => Some(TypedValue::String(s.clone())),
        (FieldType::String, other) => Some(TypedValue::String(other.to_string())),
        (FieldType::Number, Value::Number(n)) => n.as_f64().map(TypedValue::Number),
        (_, Value::String(s)) => coerce(s, target).ok(),
        _ => None,
    }
}
