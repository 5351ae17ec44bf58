//! Building blocks of a resource descriptor: typed columns, joins, create defaults and field rules.
//! Everything here is const-constructible so descriptors can live in statics.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Storage kind of a column. Drives placeholder casts, query-string coercion and payload checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    BigInt,
    Float,
    Text,
    Bool,
    Timestamp,
    Date,
}

impl ColumnKind {
    /// PostgreSQL type name used in `$n::type` casts.
    pub fn pg_type(self) -> &'static str {
        match self {
            ColumnKind::Int => "integer",
            ColumnKind::BigInt => "bigint",
            ColumnKind::Float => "double precision",
            ColumnKind::Text => "text",
            ColumnKind::Bool => "boolean",
            ColumnKind::Timestamp => "timestamptz",
            ColumnKind::Date => "date",
        }
    }

    /// Coerce a raw query-string value. None when the text cannot represent this kind.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        match self {
            ColumnKind::Int => raw.parse::<i32>().ok().map(Value::from),
            ColumnKind::BigInt => raw.parse::<i64>().ok().map(Value::from),
            ColumnKind::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::from),
            ColumnKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            ColumnKind::Text => Some(Value::String(raw.to_string())),
            ColumnKind::Timestamp | ColumnKind::Date => self.parses_as_time(raw).then(|| Value::String(raw.to_string())),
        }
    }

    /// Whether an integer fits the column's storage width.
    pub fn fits(self, n: i64) -> bool {
        match self {
            ColumnKind::Int => i32::try_from(n).is_ok(),
            _ => true,
        }
    }

    /// Timestamps take RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` (with `T` or space) or a bare date.
    fn parses_as_time(self, raw: &str) -> bool {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok();
        match self {
            ColumnKind::Date => date,
            ColumnKind::Timestamp => {
                date || DateTime::parse_from_rfc3339(raw).is_ok()
                    || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
                    || NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").is_ok()
            }
            _ => false,
        }
    }

    /// Whether a JSON payload value fits this kind. Null always fits; required-ness is a rule concern.
    pub fn accepts(self, v: &Value) -> bool {
        match (self, v) {
            (_, Value::Null) => true,
            (ColumnKind::Int | ColumnKind::BigInt, v) => v.as_i64().is_some_and(|n| self.fits(n)),
            (ColumnKind::Float, v) => v.is_number(),
            (ColumnKind::Bool, v) => v.is_boolean(),
            (ColumnKind::Text, v) => v.is_string(),
            (ColumnKind::Timestamp | ColumnKind::Date, v) => v.as_str().is_some_and(|s| self.parses_as_time(s)),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ColumnKind::Int | ColumnKind::BigInt => "an integer",
            ColumnKind::Float => "a number",
            ColumnKind::Bool => "a boolean",
            ColumnKind::Text => "a string",
            ColumnKind::Timestamp => "a timestamp string",
            ColumnKind::Date => "a date string",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Column { name, kind }
    }
}

/// LEFT JOIN to a related table, selecting some of its columns under output aliases.
#[derive(Clone, Copy, Debug)]
pub struct JoinSpec {
    pub table: &'static str,
    pub alias: &'static str,
    /// Our column holding the reference.
    pub local_column: &'static str,
    /// Their column being referenced.
    pub foreign_column: &'static str,
    /// (their column, output name)
    pub fields: &'static [(&'static str, &'static str)],
}

/// Value filled in on create when the payload omits the column.
#[derive(Clone, Copy, Debug)]
pub enum DefaultValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(&'static str),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Null => Value::Null,
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Int(n) => Value::from(n),
            DefaultValue::Text(s) => Value::String(s.to_string()),
        }
    }
}

/// Boundary validation for one payload field.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub column: &'static str,
    pub required: bool,
    /// Strings must contain something other than whitespace.
    pub non_blank: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<&'static str>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl FieldRule {
    pub const fn new(column: &'static str) -> Self {
        FieldRule {
            column,
            required: false,
            non_blank: false,
            min_length: None,
            max_length: None,
            pattern: None,
            minimum: None,
            maximum: None,
        }
    }

    pub const fn required(self) -> Self {
        FieldRule { required: true, ..self }
    }

    pub const fn non_blank(self) -> Self {
        FieldRule { non_blank: true, ..self }
    }

    pub const fn min_length(self, n: u32) -> Self {
        FieldRule { min_length: Some(n), ..self }
    }

    pub const fn max_length(self, n: u32) -> Self {
        FieldRule { max_length: Some(n), ..self }
    }

    pub const fn pattern(self, re: &'static str) -> Self {
        FieldRule { pattern: Some(re), ..self }
    }

    pub const fn minimum(self, n: f64) -> Self {
        FieldRule { minimum: Some(n), ..self }
    }

    pub const fn maximum(self, n: f64) -> Self {
        FieldRule { maximum: Some(n), ..self }
    }
}

/// Lowercase words joined by single hyphens.
pub const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";
