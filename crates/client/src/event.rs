use std::fmt;

use serde_json::Value;

use crate::{
    handler::Ticket,
    request::{FormInput, InputError, SolveRequest},
    transport::TransportError,
};

/// Something the handler did, reported to its log observer.
#[derive(Debug)]
pub enum Event<'a> {
    /// The four raw field values were read.
    InputsRead(&'a FormInput),
    /// The values were rejected before sending.
    InputRejected(&'a InputError),
    /// A request was sent.
    Dispatched {
        ticket: Ticket,
        request: &'a SolveRequest,
    },
    /// A reply with `success: true` was rendered.
    Succeeded { ticket: Ticket, payload: &'a Value },
    /// Any other reply was rendered.
    Failed { ticket: Ticket, payload: &'a Value },
    /// The request never produced a JSON reply.
    TransportFailed {
        ticket: Ticket,
        error: &'a TransportError,
    },
    /// A reply arrived after a newer request was issued and was dropped.
    Stale { ticket: Ticket, latest: Ticket },
    /// A reply arrived for a cancelled request and was dropped.
    Cancelled { ticket: Ticket },
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputsRead(form) => write!(
                f,
                "Function: {}, x0: {}, Tolerance: {}, Max Iterations: {}",
                form.function, form.x0, form.tolerance, form.max_iterations
            ),
            Self::InputRejected(err) => write!(f, "Invalid input: {err}"),
            Self::Dispatched { ticket, request } => {
                let body = serde_json::to_string(request).map_err(|_| fmt::Error)?;
                write!(f, "{ticket}: POST {body}")
            }
            Self::Succeeded { ticket, payload } => write!(f, "{ticket}: Success: {payload}"),
            Self::Failed { ticket, payload } => write!(f, "{ticket}: Error: {payload}"),
            Self::TransportFailed { ticket, error } => write!(f, "{ticket}: Error: {error}"),
            Self::Stale { ticket, latest } => {
                write!(f, "{ticket}: discarded, superseded by {latest}")
            }
            Self::Cancelled { ticket } => write!(f, "{ticket}: discarded, cancelled"),
        }
    }
}

/// Writes every event to standard error, one line each.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLog;

impl<'a> fixpoint_core::Observer<Event<'a>, ()> for ConsoleLog {
    fn observe(&mut self, event: &Event<'a>) -> Option<()> {
        eprintln!("{event}");
        None
    }
}
