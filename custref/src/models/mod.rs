//! Domain models shared by the schema, state machine and emitter.
//!
//! - [`Value`] - A typed cell deserialized from the export
//! - [`Row`] - Column name to value mapping for one record
//! - [`Customer`] - A customer row with the references that follow it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Values
// =============================================================================

/// A typed value produced by deserializing a CSV cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Yes/no flag.
    Bool(bool),
}

impl Value {
    /// Name of the variant, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Bool(_) => "yesno",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// One parsed record, keyed by normalized column name.
pub type Row = BTreeMap<String, Value>;

// =============================================================================
// Customer
// =============================================================================

/// A customer record and the references that belong to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Parsed CUST fields merged with the header extras.
    #[serde(flatten)]
    pub fields: Row,
    /// REF rows in arrival order.
    #[serde(default)]
    pub references: Vec<Row>,
}

impl Customer {
    pub fn new(fields: Row) -> Self {
        Self {
            fields,
            references: Vec::new(),
        }
    }

    /// The `customer_code` value, if the row carries one.
    pub fn code(&self) -> Option<&Value> {
        self.fields.get("customer_code")
    }
}
