//! Error types for the customer/reference conversion pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`FieldError`] - Single value (de)serialization errors
//! - [`SchemaError`] - Row parsing and SQL rendering errors
//! - [`MachineError`] - Record state machine errors
//! - [`ParseError`] - Input decoding and tokenizing errors
//! - [`ConvertError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Field Errors
// =============================================================================

/// Errors converting a single value between CSV text and SQL literal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// The CSV text could not be coerced into the field's type.
    #[error("cannot convert '{value}' to {expected}")]
    Conversion { value: String, expected: &'static str },

    /// The value handed to serialize does not match the field's type.
    #[error("expected a {expected} value, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The field does not participate in SQL output.
    #[error("field is not written to SQL")]
    NotSerializable,

    /// The field is never read from CSV.
    #[error("field is not read from CSV")]
    NotDeserializable,
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors while parsing a row or rendering it as SQL.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A field failed to (de)serialize.
    #[error("column '{column}': {source}")]
    Field {
        column: String,
        #[source]
        source: FieldError,
    },

    /// A column needed for an INSERT has no value in the row.
    #[error("no value for column '{column}' of table '{table}'")]
    MissingValue { table: String, column: String },

    /// The record has fewer cells than the table reads.
    #[error("table '{table}' expects {expected} fields but the record has {found}")]
    TooFewFields {
        table: String,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// State Machine Errors
// =============================================================================

/// Errors raised while interpreting the record stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// The discriminator is not a legal successor of the current state.
    #[error("expected one of [{}] but got '{}'", .expected.join(", "), .found)]
    InvalidTransition {
        expected: Vec<&'static str>,
        found: String,
    },

    /// The aggregated customer hierarchy would become inconsistent.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    /// A header record is too short to carry the insert date and time.
    #[error("header record has {found} fields, expected at least {expected}")]
    ShortHeader { expected: usize, found: usize },

    /// The record could not be parsed into its table.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Wraps another machine error with the 1-based record number.
    #[error("record {record}: {source}")]
    AtRecord {
        record: usize,
        #[source]
        source: Box<MachineError>,
    },
}

impl MachineError {
    /// Attach the record number, keeping an existing one.
    pub fn at_record(self, record: usize) -> Self {
        match self {
            MachineError::AtRecord { .. } => self,
            other => MachineError::AtRecord {
                record,
                source: Box::new(other),
            },
        }
    }
}

// =============================================================================
// Input Errors
// =============================================================================

/// Errors reading and tokenizing the raw input.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read input.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV tokenizer rejected the input.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The requested encoding label is not known.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::pipeline::convert_bytes`] and
/// friends. It wraps all lower-level errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input error.
    #[error("input error: {0}")]
    Parse(#[from] ParseError),

    /// Record stream error.
    #[error("{0}")]
    Machine(#[from] MachineError),

    /// SQL rendering error.
    #[error("SQL error: {0}")]
    Schema(#[from] SchemaError),

    /// JSON dump error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or write a stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for state machine operations.
pub type MachineResult<T> = Result<T, MachineError>;

/// Result type for input operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
