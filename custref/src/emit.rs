//! SQL emitter
//!
//! Turns a finished [`ProcessingState`] into SQL lines:
//!
//! ```text
//! BEGIN TRANSACTION;
//!
//! -- Create tables            (only with create_tables)
//! CREATE TABLE customer_references (...);
//! CREATE TABLE customers (...);
//!
//! -- Customers
//! INSERT INTO customers (...) VALUES (...);
//! INSERT INTO customer_references (..., customer_code) VALUES (..., 'C001');
//!
//! COMMIT;
//! ```
//!
//! Lines are produced lazily; a line fails if its row cannot be rendered.

use std::iter;

use crate::aggregate::ProcessingState;
use crate::error::{SchemaError, SchemaResult};
use crate::models::{Customer, Row};
use crate::schema::{CUSTOMERS, REFERENCES};

/// SQL lines for the whole state, one statement (or separator) per item.
pub fn as_sql(
    state: &ProcessingState,
    create_tables: bool,
) -> impl Iterator<Item = SchemaResult<String>> + '_ {
    let ddl = create_tables
        .then(|| {
            [
                String::new(),
                "-- Create tables".to_string(),
                REFERENCES.create_sql(),
                CUSTOMERS.create_sql(),
            ]
        })
        .into_iter()
        .flatten();

    let heading = (!state.customers.is_empty()).then(|| "-- Customers".to_string());

    iter::once("BEGIN TRANSACTION;".to_string())
        .chain(ddl)
        .chain(iter::once(String::new()))
        .chain(heading)
        .map(Ok)
        .chain(state.customers.iter().flat_map(customer_sql))
        .chain([String::new(), "COMMIT;".to_string()].into_iter().map(Ok))
}

/// The customer INSERT followed by one INSERT per reference.
///
/// Every reference line fails when the customer has no `customer_code`.
fn customer_sql(customer: &Customer) -> impl Iterator<Item = SchemaResult<String>> + '_ {
    let foreign_keys = customer
        .code()
        .map(|code| Row::from([("customer_code".to_string(), code.clone())]))
        .ok_or_else(|| SchemaError::MissingValue {
            table: CUSTOMERS.name.clone(),
            column: "customer_code".to_string(),
        });

    iter::once(CUSTOMERS.insert_sql(&customer.fields, None)).chain(
        customer.references.iter().map(move |reference| {
            let foreign_keys = foreign_keys.as_ref().map_err(Clone::clone)?;
            REFERENCES.insert_sql(reference, Some(foreign_keys))
        }),
    )
}

/// Render the whole script, failing before any output if a row is bad.
pub fn render_sql(state: &ProcessingState, create_tables: bool) -> SchemaResult<String> {
    let lines = as_sql(state, create_tables).collect::<SchemaResult<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{append_reference, capture_header, flush_customer, open_customer};

    fn state_with(customers: &[(&str, Vec<&str>)]) -> ProcessingState {
        let mut state = ProcessingState::new();
        capture_header(&mut state, &["H", "", "", "", "", "", "", "d1", "d2"]).unwrap();
        for (code, refs) in customers {
            let mut cust = vec!["CUST", *code, "O'Brien"];
            cust.extend(std::iter::repeat("x").take(11));
            cust.extend(["no", "hq", "tel", "mob"]);
            open_customer(&mut state, &cust).unwrap();
            for id in refs {
                let r = vec![
                    "REF", *id, "5", "yes", "no", "1", "2", "yes", "chk", "no", "m", "i", "d", "c",
                    "cd", "no", "no", "no", "0", "t",
                ];
                append_reference(&mut state, &r).unwrap();
            }
            flush_customer(&mut state);
        }
        state
    }

    #[test]
    fn test_empty_state() {
        let sql = render_sql(&ProcessingState::new(), false).unwrap();
        assert_eq!(sql, "BEGIN TRANSACTION;\n\n\nCOMMIT;");
    }

    #[test]
    fn test_create_tables_flag() {
        let state = state_with(&[("C001", vec![])]);
        let without = render_sql(&state, false).unwrap();
        assert_eq!(without.matches("CREATE TABLE").count(), 0);

        let with = render_sql(&state, true).unwrap();
        assert_eq!(with.matches("CREATE TABLE").count(), 2);
        let refs_at = with.find("CREATE TABLE customer_references").unwrap();
        let cust_at = with.find("CREATE TABLE customers").unwrap();
        assert!(refs_at < cust_at);
    }

    #[test]
    fn test_statement_order_and_foreign_key() {
        let state = state_with(&[("C001", vec!["R1", "R2"]), ("C002", vec!["R3"])]);
        let lines: Vec<String> = as_sql(&state, false).map(Result::unwrap).collect();

        assert_eq!(lines.first().unwrap(), "BEGIN TRANSACTION;");
        assert_eq!(lines.last().unwrap(), "COMMIT;");
        let inserts: Vec<&String> = lines.iter().filter(|l| l.starts_with("INSERT")).collect();
        assert_eq!(inserts.len(), 5);
        assert!(inserts[0].starts_with("INSERT INTO customers ") && inserts[0].contains("'C001'"));
        assert!(inserts[1].contains("'R1'") && inserts[1].ends_with("'C001');"));
        assert!(inserts[2].contains("'R2'") && inserts[2].ends_with("'C001');"));
        assert!(inserts[3].starts_with("INSERT INTO customers ") && inserts[3].contains("'C002'"));
        assert!(inserts[4].contains("'R3'") && inserts[4].ends_with("'C002');"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let state = state_with(&[("C001", vec![])]);
        let sql = render_sql(&state, false).unwrap();
        assert!(sql.contains("'O''Brien'"));
    }

    #[test]
    fn test_missing_value_fails_render() {
        let mut state = state_with(&[("C001", vec![])]);
        state.customers[0].fields.remove("name");
        assert!(render_sql(&state, false).is_err());
    }

    #[test]
    fn test_reference_needs_customer_code() {
        let mut state = state_with(&[("C001", vec!["R1"])]);
        state.customers[0].fields.remove("customer_code");

        let errors: Vec<SchemaError> = as_sql(&state, false).filter_map(Result::err).collect();
        let missing = SchemaError::MissingValue {
            table: "customers".into(),
            column: "customer_code".into(),
        };
        assert_eq!(errors, vec![missing.clone(), missing]);
    }
}
