//! Building the customer → references hierarchy.
//!
//! The state machine calls into this module whenever a state with a hook is
//! entered or left. Every function works on an explicit [`ProcessingState`].
//!
//! ```text
//! H       → capture insert date/time as extras
//! H_CUST  → (on exit) flush the open customer
//! CUST    → open a customer (extras merged in)
//! REF     → append a reference to the open customer (extras merged in)
//! __final__ → flush the open customer
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::{MachineError, MachineResult};
use crate::machine::Hook;
use crate::models::{Customer, Row, Value};
use crate::schema::{CUSTOMERS, REFERENCES};

/// Header fields carrying the insert date and time.
const INSERT_DATE_FIELD: usize = 7;
const INSERT_TIME_FIELD: usize = 8;

/// Everything accumulated while reading the export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingState {
    /// Customer still receiving references.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_customer: Option<Customer>,
    /// Finalized customers in arrival order.
    pub customers: Vec<Customer>,
    /// Extras merged into every customer row parsed from now on.
    pub append_to_cust: Row,
    /// Extras merged into every reference row parsed from now on.
    pub append_to_ref: Row,
}

impl ProcessingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of finalized references.
    pub fn reference_count(&self) -> usize {
        self.customers.iter().map(|c| c.references.len()).sum()
    }
}

impl Hook {
    /// Run this hook against `state`.
    ///
    /// `record` is the record that triggered the transition; exit hooks
    /// receive the record that caused the state to be left.
    pub fn apply<S: AsRef<str>>(self, state: &mut ProcessingState, record: &[S]) -> MachineResult<()> {
        match self {
            Hook::CaptureHeader => capture_header(state, record),
            Hook::OpenCustomer => open_customer(state, record),
            Hook::AppendReference => append_reference(state, record),
            Hook::FlushCustomer => {
                flush_customer(state);
                Ok(())
            }
        }
    }
}

/// Take the insert date/time from a header record.
///
/// Replaces the extras of any earlier header. Rows already parsed keep the
/// values they were given.
pub fn capture_header<S: AsRef<str>>(state: &mut ProcessingState, record: &[S]) -> MachineResult<()> {
    if record.len() <= INSERT_TIME_FIELD {
        return Err(MachineError::ShortHeader {
            expected: INSERT_TIME_FIELD + 1,
            found: record.len(),
        });
    }

    let mut extras = Row::new();
    extras.insert(
        "insert_date".to_string(),
        Value::from(record[INSERT_DATE_FIELD].as_ref()),
    );
    extras.insert(
        "insert_time".to_string(),
        Value::from(record[INSERT_TIME_FIELD].as_ref()),
    );
    debug!(
        insert_date = record[INSERT_DATE_FIELD].as_ref(),
        insert_time = record[INSERT_TIME_FIELD].as_ref(),
        "captured header"
    );

    state.append_to_ref = extras.clone();
    state.append_to_cust = extras;
    Ok(())
}

/// Parse a `CUST` record and make it the open customer.
pub fn open_customer<S: AsRef<str>>(state: &mut ProcessingState, record: &[S]) -> MachineResult<()> {
    if state.current_customer.is_some() {
        return Err(MachineError::InconsistentState(
            "found unflushed CUST record when processing a new one".to_string(),
        ));
    }

    let mut fields = CUSTOMERS.parse_csv(record)?;
    merge(&mut fields, &state.append_to_cust);
    debug!(customer_code = ?fields.get("customer_code"), "opened customer");

    state.current_customer = Some(Customer::new(fields));
    Ok(())
}

/// Parse a `REF` record and attach it to the open customer.
pub fn append_reference<S: AsRef<str>>(state: &mut ProcessingState, record: &[S]) -> MachineResult<()> {
    let extras = &state.append_to_ref;
    let customer = state.current_customer.as_mut().ok_or_else(|| {
        MachineError::InconsistentState("found REF but no current customer".to_string())
    })?;

    let mut fields = REFERENCES.parse_csv(record)?;
    merge(&mut fields, extras);
    customer.references.push(fields);
    Ok(())
}

/// Move the open customer, if any, to the finalized list.
pub fn flush_customer(state: &mut ProcessingState) {
    if let Some(customer) = state.current_customer.take() {
        debug!(
            customer_code = ?customer.code(),
            references = customer.references.len(),
            "flushed customer"
        );
        state.customers.push(customer);
    }
}

/// Overlay `extras` onto `row`; extras win.
fn merge(row: &mut Row, extras: &Row) {
    row.extend(extras.iter().map(|(k, v)| (k.clone(), v.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<&'static str> {
        vec!["H", "a", "b", "c", "d", "e", "f", "2024-03-01", "12:30"]
    }

    fn cust(code: &str) -> Vec<String> {
        let mut r = vec!["CUST".to_string(), code.to_string()];
        r.extend((0..12).map(|i| format!("c{i}")));
        r.push("yes".into());
        r.extend((0..3).map(|i| format!("t{i}")));
        r
    }

    fn reference(id: &str) -> Vec<String> {
        [
            "REF", id, "10", "yes", "no", "1", "4", "yes", "chk", "no", "mask", "int", "desc",
            "dbi", "dbi desc", "no", "yes", "no", "2", "type",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_header_extras_applied_to_customer_and_reference() {
        let mut state = ProcessingState::new();
        capture_header(&mut state, &header()).unwrap();
        open_customer(&mut state, &cust("C001")).unwrap();
        append_reference(&mut state, &reference("R1")).unwrap();

        let customer = state.current_customer.as_ref().unwrap();
        assert_eq!(customer.fields["insert_date"], Value::from("2024-03-01"));
        assert_eq!(customer.fields["insert_time"], Value::from("12:30"));
        assert_eq!(customer.references[0]["insert_date"], Value::from("2024-03-01"));
        assert_eq!(customer.references[0]["length"], Value::Integer(10));
    }

    #[test]
    fn test_header_does_not_touch_finalized_customers() {
        let mut state = ProcessingState::new();
        open_customer(&mut state, &cust("C001")).unwrap();
        flush_customer(&mut state);
        capture_header(&mut state, &header()).unwrap();

        assert!(!state.customers[0].fields.contains_key("insert_date"));
    }

    #[test]
    fn test_short_header() {
        let mut state = ProcessingState::new();
        let err = capture_header(&mut state, &["H", "only"]).unwrap_err();
        assert_eq!(err, MachineError::ShortHeader { expected: 9, found: 2 });
    }

    #[test]
    fn test_second_customer_without_flush() {
        let mut state = ProcessingState::new();
        open_customer(&mut state, &cust("C001")).unwrap();
        let err = open_customer(&mut state, &cust("C002")).unwrap_err();
        assert!(matches!(err, MachineError::InconsistentState(_)));
    }

    #[test]
    fn test_reference_without_customer() {
        let mut state = ProcessingState::new();
        let err = append_reference(&mut state, &reference("R1")).unwrap_err();
        assert!(matches!(err, MachineError::InconsistentState(_)));
    }

    #[test]
    fn test_flush_is_noop_without_open_customer() {
        let mut state = ProcessingState::new();
        flush_customer(&mut state);
        assert!(state.customers.is_empty());
    }

    #[test]
    fn test_references_keep_arrival_order() {
        let mut state = ProcessingState::new();
        open_customer(&mut state, &cust("C001")).unwrap();
        for id in ["R1", "R2", "R3"] {
            Hook::AppendReference.apply(&mut state, &reference(id)).unwrap();
        }
        Hook::FlushCustomer.apply(&mut state, &[] as &[&str]).unwrap();

        let ids: Vec<_> = state.customers[0]
            .references
            .iter()
            .map(|r| r["reference_identifier"].clone())
            .collect();
        assert_eq!(ids, vec![Value::from("R1"), Value::from("R2"), Value::from("R3")]);
        assert_eq!(state.reference_count(), 3);
        assert!(state.current_customer.is_none());
    }
}
