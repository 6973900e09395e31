//! Record state machine
//!
//! The export is a flat list of records. Only the first field of each record
//! (its discriminator) tells what it is, and only the order of the records
//! tells which customer a reference belongs to. The machine walks the records
//! one at a time, checks each discriminator against the successors allowed
//! by the current state, and runs the enter/exit hooks that build the
//! hierarchy.
//!
//! ```text
//! __initial__ ─H→ H ─→ [S] ─→ H_CUST ─→ CUST ─→ H_REF ─→ REF* ─┐
//!                               ▲                               │
//!                               └───────────────────────────────┘
//!                          CUST / REF ─→ MEDIUM ─→ __final__
//! ```

pub mod states;

pub use states::{Action, Hook, State, Successors};

use tracing::{debug, trace};

use crate::aggregate::ProcessingState;
use crate::error::{MachineError, MachineResult};

/// Pick the state a record leads to from `current`.
pub fn transition<S: AsRef<str>>(current: State, record: &[S]) -> MachineResult<State> {
    let (candidates, may_stay) = match current.action().successors {
        Successors::Terminal => return Ok(State::Final),
        Successors::OneOf(states) => (states, false),
        Successors::OneOfOrStay(states) => (states, true),
    };

    let token = record.first().map(|s| s.as_ref()).unwrap_or_default();
    if let Some(next) = candidates.iter().find(|s| s.token() == token) {
        Ok(*next)
    } else if may_stay {
        Ok(current)
    } else {
        Err(MachineError::InvalidTransition {
            expected: candidates.iter().map(|s| s.token()).collect(),
            found: token.to_string(),
        })
    }
}

/// Drives [`transition`] over a record stream and owns the processing state.
#[derive(Debug)]
pub struct Machine {
    state: State,
    data: ProcessingState,
    records: usize,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self {
            state: State::Initial,
            data: ProcessingState::new(),
            records: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// State accumulated so far.
    pub fn data(&self) -> &ProcessingState {
        &self.data
    }

    /// Number of records fed so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// True once the final state has been reached; further records are ignored.
    pub fn is_finished(&self) -> bool {
        self.state.action().is_final
    }

    /// Feed one record and return the state it led to.
    pub fn feed<S: AsRef<str>>(&mut self, record: &[S]) -> MachineResult<State> {
        if self.is_finished() {
            return Ok(self.state);
        }
        self.records += 1;
        let number = self.records;

        let next = transition(self.state, record).map_err(|e| e.at_record(number))?;
        self.move_to(next, record).map_err(|e| e.at_record(number))?;
        Ok(next)
    }

    /// End of input: arrive at the final state and hand back the result.
    pub fn finish(mut self) -> MachineResult<ProcessingState> {
        if !self.is_finished() {
            self.move_to::<&str>(State::Final, &[])?;
        }
        debug!(
            records = self.records,
            customers = self.data.customers.len(),
            "record stream finished"
        );
        Ok(self.data)
    }

    fn move_to<S: AsRef<str>>(&mut self, next: State, record: &[S]) -> MachineResult<()> {
        if next != self.state {
            trace!(record = self.records, from = %self.state, to = %next, "transition");
            if let Some(exit) = self.state.action().exit {
                exit.apply(&mut self.data, record)?;
            }
        }
        if let Some(enter) = next.action().enter {
            enter.apply(&mut self.data, record)?;
        }
        self.state = next;
        Ok(())
    }
}

/// Run a whole record stream through a fresh machine.
///
/// Stops at the final state; records after it are not read, so a bad record
/// past `MEDIUM` is never seen. Returns the aggregated state and the number
/// of records fed.
pub fn process<I, R, S, E>(records: I) -> Result<(ProcessingState, usize), E>
where
    I: IntoIterator<Item = Result<R, E>>,
    R: AsRef<[S]>,
    S: AsRef<str>,
    E: From<MachineError>,
{
    let mut machine = Machine::new();
    for record in records {
        if machine.feed(record?.as_ref())? == State::Final {
            break;
        }
    }
    let count = machine.records();
    Ok((machine.finish()?, count))
}
