//! Typed column schema for the export.
//!
//! - `field`: how a single value is read from CSV and written to SQL
//! - `table`: columns and tables, DDL/DML rendering and row parsing
//! - `tables`: the two fixed record layouts (`CUST` and `REF`)

pub mod field;
pub mod table;
pub mod tables;

pub use field::{quote_sql_string, FieldKind, FieldType};
pub use table::{to_sql_name, Column, Table};
pub use tables::{CUSTOMERS, REFERENCES};
