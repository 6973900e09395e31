//! Field types
//!
//! How a single cell travels from CSV text to a typed [`Value`] and from
//! there to an SQL literal.

use crate::error::{FieldError, FieldResult};
use crate::models::Value;

/// The closed set of value kinds found in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, stored as `TEXT`.
    Text,
    /// Whole number, stored as `INTEGER`.
    Integer,
    /// `yes`/anything else, stored as `INTEGER` 1/0.
    YesNo,
}

impl FieldKind {
    /// SQL storage type.
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Text => "TEXT",
            FieldKind::Integer | FieldKind::YesNo => "INTEGER",
        }
    }

    fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::YesNo => "yesno",
        }
    }
}

/// Which side(s) of the conversion a field takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Participation {
    Both,
    CsvOnly,
    SqlOnly,
}

/// A field kind together with the directions it participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    kind: FieldKind,
    participation: Participation,
}

impl FieldType {
    pub const fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    pub const fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub const fn yesno() -> Self {
        Self::new(FieldKind::YesNo)
    }

    const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            participation: Participation::Both,
        }
    }

    /// Read from CSV but never written to SQL.
    pub const fn no_sql(self) -> Self {
        Self {
            participation: Participation::CsvOnly,
            ..self
        }
    }

    /// Written to SQL but never read from CSV; values are injected.
    pub const fn no_csv(self) -> Self {
        Self {
            participation: Participation::SqlOnly,
            ..self
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn sql_type(&self) -> &'static str {
        self.kind.sql_type()
    }

    pub fn is_sql(&self) -> bool {
        self.participation != Participation::CsvOnly
    }

    pub fn is_csv(&self) -> bool {
        self.participation != Participation::SqlOnly
    }

    /// Convert a raw CSV cell into a typed value.
    pub fn deserialize(&self, raw: &str) -> FieldResult<Value> {
        if !self.is_csv() {
            return Err(FieldError::NotDeserializable);
        }
        match self.kind {
            FieldKind::Text => Ok(Value::Text(raw.to_string())),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| FieldError::Conversion {
                    value: raw.to_string(),
                    expected: self.kind.name(),
                }),
            FieldKind::YesNo => Ok(Value::Bool(raw.eq_ignore_ascii_case("yes"))),
        }
    }

    /// Render a typed value as an SQL literal.
    pub fn serialize(&self, value: &Value) -> FieldResult<String> {
        if !self.is_sql() {
            return Err(FieldError::NotSerializable);
        }
        match (self.kind, value) {
            (FieldKind::Text, Value::Text(s)) => Ok(format!("'{}'", quote_sql_string(s))),
            (FieldKind::Integer, Value::Integer(n)) => Ok(n.to_string()),
            (FieldKind::YesNo, Value::Bool(b)) => Ok(if *b { "1" } else { "0" }.to_string()),
            (kind, other) => Err(FieldError::TypeMismatch {
                expected: kind.name(),
                found: other.kind(),
            }),
        }
    }
}

/// Escape single quotes for use inside an SQL string literal.
pub fn quote_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}
