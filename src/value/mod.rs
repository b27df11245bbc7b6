//! Typed access to raw cell text.
//!
//! [`FieldType`] is a closed set of value kinds; each variant owns its
//! parse/format rules, with the numeric/temporal kinds delegating to a
//! configurable spec ([`DecimalSpec`], [`DateTimeSpec`], [`DateSpec`],
//! [`TimeSpec`]). Dispatch is a single exhaustive match per operation.
//!
//! Conventions shared by every kind:
//!
//! - a null/blank raw cell parses to [`Value::Null`]
//! - [`Value::Null`] formats to the empty string
//! - numeric kinds trim surrounding whitespace before parsing

pub mod datetime;
pub mod decimal;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use thiserror::Error;

pub use datetime::{
    DateSpec, DateTimeFormat, DateTimePreset, DateTimeSpec, MissingPartPolicy, TimeSpec,
};
pub use decimal::{DecimalSpec, Rounding};

/// A cell's parse or format failure. Scoped to the field; it does not by
/// itself abort the row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value '{raw}': {message}")]
pub struct ValueError {
    /// Field-type name, e.g. `"int"` or `"decimal"`.
    pub kind: &'static str,
    /// The offending raw text (or a description of the offending value).
    pub raw: String,
    /// What went wrong.
    pub message: String,
}

impl ValueError {
    fn new(kind: &'static str, raw: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            message: message.into(),
        }
    }
}

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/blank cell.
    Null,
    /// UTF-8 string.
    Str(String),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 64-bit float.
    Double(f64),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
    /// Boolean.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without offset.
    DateTime(NaiveDateTime),
    /// Time of day.
    Time(NaiveTime),
}

impl Value {
    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// The closed set of field kinds. Spec-driven kinds carry their spec.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Raw text, returned as-is.
    Str,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// 64-bit float.
    Double,
    /// Decimal under a [`DecimalSpec`].
    Decimal(DecimalSpec),
    /// Boolean with a fixed truthy token set.
    Boolean,
    /// Date under a [`DateSpec`].
    Date(DateSpec),
    /// Date-time under a [`DateTimeSpec`].
    DateTime(DateTimeSpec),
    /// Time under a [`TimeSpec`].
    Time(TimeSpec),
}

/// Tokens recognized as true by [`FieldType::Boolean`] (case-insensitive).
/// Every other token parses to false, never an error.
const TRUTHY: [&str; 4] = ["true", "1", "y", "yes"];

impl FieldType {
    /// Lower-case kind name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::Decimal(_) => "decimal",
            Self::Boolean => "boolean",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Time(_) => "time",
        }
    }

    /// Parse raw cell text into a typed [`Value`].
    ///
    /// Blank input parses to [`Value::Null`] for every kind; the decimal kind
    /// additionally honors its spec's allow-blank setting.
    pub fn parse(&self, raw: &str) -> Result<Value, ValueError> {
        if let Self::Decimal(spec) = self {
            // DecimalSpec owns the blank policy.
            return match spec.parse(raw) {
                Ok(Some(v)) => Ok(Value::Decimal(v)),
                Ok(None) => Ok(Value::Null),
                Err(message) => Err(ValueError::new(self.name(), raw, message)),
            };
        }

        if raw.trim().is_empty() {
            return Ok(Value::Null);
        }

        match self {
            Self::Str => Ok(Value::Str(raw.to_string())),
            Self::Int => raw
                .trim()
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|e| ValueError::new(self.name(), raw, e.to_string())),
            Self::Long => raw
                .trim()
                .parse::<i64>()
                .map(Value::Long)
                .map_err(|e| ValueError::new(self.name(), raw, e.to_string())),
            Self::Double => raw
                .trim()
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|e| ValueError::new(self.name(), raw, e.to_string())),
            Self::Boolean => {
                let token = raw.trim().to_lowercase();
                Ok(Value::Bool(TRUTHY.contains(&token.as_str())))
            }
            Self::Date(spec) => match spec.parse(raw) {
                Ok(Some(d)) => Ok(Value::Date(d)),
                Ok(None) => Ok(Value::Null),
                Err(message) => Err(ValueError::new(self.name(), raw, message)),
            },
            Self::DateTime(spec) => match spec.parse(raw) {
                Ok(Some(dt)) => Ok(Value::DateTime(dt)),
                Ok(None) => Ok(Value::Null),
                Err(message) => Err(ValueError::new(self.name(), raw, message)),
            },
            Self::Time(spec) => match spec.parse(raw) {
                Ok(Some(t)) => Ok(Value::Time(t)),
                Ok(None) => Ok(Value::Null),
                Err(message) => Err(ValueError::new(self.name(), raw, message)),
            },
            Self::Decimal(_) => unreachable!("handled above"),
        }
    }

    /// Format a typed [`Value`] back into raw cell text.
    ///
    /// [`Value::Null`] formats to the empty string for every kind; a value of
    /// the wrong kind is a [`ValueError`].
    pub fn format(&self, value: &Value) -> Result<String, ValueError> {
        match (self, value) {
            (_, Value::Null) => Ok(String::new()),
            (Self::Str, Value::Str(s)) => Ok(s.clone()),
            (Self::Int, Value::Int(v)) => Ok(v.to_string()),
            (Self::Long, Value::Long(v)) => Ok(v.to_string()),
            (Self::Double, Value::Double(v)) => Ok(v.to_string()),
            (Self::Decimal(spec), Value::Decimal(v)) => Ok(spec.format(Some(v))),
            (Self::Boolean, Value::Bool(v)) => Ok(v.to_string()),
            (Self::Date(spec), Value::Date(v)) => spec
                .format(v)
                .map_err(|m| ValueError::new(self.name(), &v.to_string(), m)),
            (Self::DateTime(spec), Value::DateTime(v)) => spec
                .format(v)
                .map_err(|m| ValueError::new(self.name(), &v.to_string(), m)),
            (Self::Time(spec), Value::Time(v)) => spec
                .format(v)
                .map_err(|m| ValueError::new(self.name(), &v.to_string(), m)),
            (_, other) => Err(ValueError::new(
                self.name(),
                &format!("{other:?}"),
                format!("value does not match field type '{}'", self.name()),
            )),
        }
    }
}

/// A cell seen through a [`FieldType`]: raw text plus the parse outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedField {
    /// Zero-based column index.
    pub index: usize,
    /// Column name.
    pub name: String,
    /// Raw cell text as tokenized.
    pub raw: String,
    /// The field kind (and spec) the cell was parsed under.
    pub field_type: FieldType,
    /// The parsed value; `None` when parsing failed.
    pub value: Option<Value>,
    /// Parse/validation failures, empty when the field is valid.
    pub errors: Vec<String>,
}

impl TypedField {
    /// Parse `raw` under `field_type`, capturing any failure instead of
    /// returning it.
    pub fn parse(
        index: usize,
        name: impl Into<String>,
        raw: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        let raw = raw.into();
        let (value, errors) = match field_type.parse(&raw) {
            Ok(v) => (Some(v), Vec::new()),
            Err(e) => (None, vec![e.to_string()]),
        };
        Self {
            index,
            name: name.into(),
            raw,
            field_type,
            value,
            errors,
        }
    }

    /// True when the raw text parsed cleanly.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_parses_to_null_and_null_formats_to_empty() {
        for ft in [FieldType::Str, FieldType::Int, FieldType::Boolean] {
            assert_eq!(ft.parse("").unwrap(), Value::Null);
            assert_eq!(ft.parse("   ").unwrap(), Value::Null);
            assert_eq!(ft.format(&Value::Null).unwrap(), "");
        }
    }

    #[test]
    fn numeric_kinds_trim_and_fail_on_garbage_or_overflow() {
        assert_eq!(FieldType::Int.parse(" 42 ").unwrap(), Value::Int(42));
        assert!(FieldType::Int.parse("forty-two").is_err());
        // i32 overflow, but a valid i64.
        assert!(FieldType::Int.parse("3000000000").is_err());
        assert_eq!(
            FieldType::Long.parse("3000000000").unwrap(),
            Value::Long(3_000_000_000)
        );
        assert_eq!(
            FieldType::Double.parse(" 1.5 ").unwrap(),
            Value::Double(1.5)
        );
    }

    #[test]
    fn boolean_truthy_set_and_no_errors() {
        for raw in ["true", "TRUE", "1", "y", "Yes"] {
            assert_eq!(FieldType::Boolean.parse(raw).unwrap(), Value::Bool(true));
        }
        for raw in ["false", "0", "nope", "2", "tru"] {
            assert_eq!(FieldType::Boolean.parse(raw).unwrap(), Value::Bool(false));
        }
    }

    #[test]
    fn format_rejects_mismatched_value_kind() {
        let err = FieldType::Int.format(&Value::Str("5".into())).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn typed_field_captures_errors_instead_of_failing() {
        let ok = TypedField::parse(0, "id", "7", FieldType::Int);
        assert!(ok.is_valid());
        assert_eq!(ok.value, Some(Value::Int(7)));

        let bad = TypedField::parse(0, "id", "x", FieldType::Int);
        assert!(!bad.is_valid());
        assert_eq!(bad.value, None);
        assert_eq!(bad.errors.len(), 1);
    }
}
