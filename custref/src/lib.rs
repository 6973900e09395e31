//! # custref - customer reference export to SQL
//!
//! Converts the semicolon-delimited customer/reference export into SQL that
//! recreates the data in two tables, `customers` and `customer_references`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Export    │────▶│   Parser    │────▶│   Machine   │────▶│   Emitter   │
//! │ (ISO/UTF8)  │     │ (records)   │     │ (hierarchy) │     │   (SQL)     │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use custref::{convert_bytes, ConvertOptions};
//!
//! let export = std::fs::read("export.csv")?;
//! let conversion = convert_bytes(&export, &ConvertOptions::default())?;
//! println!("{}", conversion.output);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Values, rows and customers
//! - [`schema`] - Field types, columns and the two tables
//! - [`parser`] - Decoding and record splitting
//! - [`machine`] - Record state machine
//! - [`aggregate`] - Hooks that build the customer hierarchy
//! - [`emit`] - SQL rendering
//! - [`pipeline`] - End-to-end conversion

// Core modules
pub mod error;
pub mod models;

// Schema
pub mod schema;

// Parsing
pub mod parser;

// Record processing
pub mod aggregate;
pub mod machine;

// Output
pub mod emit;
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConvertError, FieldError, MachineError, ParseError, SchemaError};

// =============================================================================
// Re-exports - Models and schema
// =============================================================================

pub use models::{Customer, Row, Value};
pub use schema::{to_sql_name, Column, FieldKind, FieldType, Table, CUSTOMERS, REFERENCES};

// =============================================================================
// Re-exports - Processing
// =============================================================================

pub use aggregate::ProcessingState;
pub use emit::{as_sql, render_sql};
pub use machine::{process, transition, Machine, State};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    convert_bytes, convert_file, convert_reader, render, Conversion, ConvertOptions,
    ConvertSummary, OutputFormat,
};
