//! Columns and tables
//!
//! A [`Table`] knows its columns in source order. That order is the contract
//! with the export format: CSV cells are matched to columns by position.

use crate::error::{SchemaError, SchemaResult};
use crate::models::Row;

use super::field::FieldType;

/// Normalize a name for use as an SQL identifier.
///
/// Lower-cases and replaces spaces with underscores, so `"Customer Code"` and
/// `"customer_code"` name the same column.
pub fn to_sql_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub field_type: FieldType,
}

impl Column {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: to_sql_name(name),
            field_type,
        }
    }

    pub fn is_sql(&self) -> bool {
        self.field_type.is_sql()
    }

    pub fn is_csv(&self) -> bool {
        self.field_type.is_csv()
    }
}

/// A table definition: own columns plus columns supplied by a parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<Column>,
}

impl Table {
    pub fn new(name: &str, columns: Vec<Column>) -> Self {
        Self {
            name: to_sql_name(name),
            columns,
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_foreign_keys(mut self, foreign_keys: Vec<Column>) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    /// Columns written to SQL, in declaration order.
    pub fn sql_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_sql())
    }

    /// Columns read from CSV, in declaration order.
    pub fn csv_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_csv())
    }

    /// `CREATE TABLE` statement for the SQL columns and all foreign keys.
    pub fn create_sql(&self) -> String {
        let cols: Vec<String> = self
            .sql_columns()
            .chain(self.foreign_keys.iter())
            .map(|c| format!("{} {}", c.name, c.field_type.sql_type()))
            .collect();
        format!("CREATE TABLE {} ({});", self.name, cols.join(", "))
    }

    /// `INSERT` statement for a parsed row.
    ///
    /// Only the foreign keys present in `foreign_keys` are written, so one
    /// table definition serves rows that carry some, all or none of them.
    pub fn insert_sql(&self, row: &Row, foreign_keys: Option<&Row>) -> SchemaResult<String> {
        let fk_cols = self
            .foreign_keys
            .iter()
            .filter(|c| foreign_keys.is_some_and(|fks| fks.contains_key(&c.name)));

        let mut names = Vec::new();
        let mut values = Vec::new();
        for col in self.sql_columns().chain(fk_cols) {
            let value = foreign_keys
                .and_then(|fks| fks.get(&col.name))
                .or_else(|| row.get(&col.name))
                .ok_or_else(|| SchemaError::MissingValue {
                    table: self.name.clone(),
                    column: col.name.clone(),
                })?;
            let literal = col
                .field_type
                .serialize(value)
                .map_err(|source| SchemaError::Field {
                    column: col.name.clone(),
                    source,
                })?;
            names.push(col.name.as_str());
            values.push(literal);
        }

        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.name,
            names.join(", "),
            values.join(", ")
        ))
    }

    /// Deserialize raw cells into a row, matching CSV columns by position.
    ///
    /// Surplus trailing cells are ignored; too few cells is an error.
    pub fn parse_csv<S: AsRef<str>>(&self, cells: &[S]) -> SchemaResult<Row> {
        let expected = self.csv_columns().count();
        if cells.len() < expected {
            return Err(SchemaError::TooFewFields {
                table: self.name.clone(),
                expected,
                found: cells.len(),
            });
        }

        self.csv_columns()
            .zip(cells)
            .map(|(col, cell)| {
                col.field_type
                    .deserialize(cell.as_ref())
                    .map(|value| (col.name.clone(), value))
                    .map_err(|source| SchemaError::Field {
                        column: col.name.clone(),
                        source,
                    })
            })
            .collect()
    }
}
