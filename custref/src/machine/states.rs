//! Transition table of the record state machine.
//!
//! Each state names the record types allowed to follow it and the hooks run
//! when it is entered or left. The hooks themselves live in
//! [`crate::aggregate`]; this module is data only.

use std::fmt;

/// A node of the state machine. All but the two sentinels are named after the
/// record type that leads into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Initial,
    Header,
    S,
    CustomerHeader,
    Customer,
    ReferenceHeader,
    Reference,
    Medium,
    Final,
}

impl State {
    /// The discriminator token (or sentinel name) for this state.
    pub fn token(self) -> &'static str {
        match self {
            State::Initial => "__initial__",
            State::Header => "H",
            State::S => "S",
            State::CustomerHeader => "H_CUST",
            State::Customer => "CUST",
            State::ReferenceHeader => "H_REF",
            State::Reference => "REF",
            State::Medium => "MEDIUM",
            State::Final => "__final__",
        }
    }

    /// The table entry for this state.
    pub fn action(self) -> &'static Action {
        match self {
            State::Initial => &INITIAL,
            State::Header => &HEADER,
            State::S => &S_RECORD,
            State::CustomerHeader => &CUSTOMER_HEADER,
            State::Customer => &CUSTOMER,
            State::ReferenceHeader => &REFERENCE_HEADER,
            State::Reference => &REFERENCE,
            State::Medium => &MEDIUM,
            State::Final => &FINAL,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Callbacks a state can run on the processing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// Remember the header's insert date/time for the rows that follow.
    CaptureHeader,
    /// Parse a customer and make it the open customer.
    OpenCustomer,
    /// Parse a reference and attach it to the open customer.
    AppendReference,
    /// Finalize the open customer, if any.
    FlushCustomer,
}

/// What may follow a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Successors {
    /// Nothing: the next record (or end of input) ends the run.
    Terminal,
    /// Exactly these record types.
    OneOf(&'static [State]),
    /// These record types; anything else keeps the machine where it is.
    OneOfOrStay(&'static [State]),
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub enter: Option<Hook>,
    pub exit: Option<Hook>,
    pub successors: Successors,
    pub is_final: bool,
}

impl Action {
    const fn new(successors: Successors) -> Self {
        Self {
            enter: None,
            exit: None,
            successors,
            is_final: false,
        }
    }

    const fn on_enter(self, hook: Hook) -> Self {
        Self {
            enter: Some(hook),
            ..self
        }
    }

    const fn on_exit(self, hook: Hook) -> Self {
        Self {
            exit: Some(hook),
            ..self
        }
    }
}

static INITIAL: Action = Action::new(Successors::OneOfOrStay(&[State::Header]));

static HEADER: Action = Action::new(Successors::OneOf(&[State::CustomerHeader, State::S]))
    .on_enter(Hook::CaptureHeader);

static S_RECORD: Action = Action::new(Successors::OneOf(&[State::CustomerHeader]));

static CUSTOMER_HEADER: Action = Action::new(Successors::OneOf(&[
    State::Customer,
    State::ReferenceHeader,
]))
.on_exit(Hook::FlushCustomer);

static CUSTOMER: Action = Action::new(Successors::OneOf(&[
    State::ReferenceHeader,
    State::CustomerHeader,
    State::Medium,
]))
.on_enter(Hook::OpenCustomer);

static REFERENCE_HEADER: Action = Action::new(Successors::OneOf(&[State::Reference]));

static REFERENCE: Action = Action::new(Successors::OneOf(&[
    State::Reference,
    State::CustomerHeader,
    State::Medium,
]))
.on_enter(Hook::AppendReference);

static MEDIUM: Action = Action::new(Successors::Terminal);

static FINAL: Action = Action {
    enter: Some(Hook::FlushCustomer),
    exit: None,
    successors: Successors::Terminal,
    is_final: true,
};
