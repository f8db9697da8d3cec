use fixpoint_core::Observer;

use super::{Action, Event};

/// An observer that records every iterate the solver reports.
///
/// Pass `&mut History` as the observer to keep the record after the solve,
/// including when the solve ends in an error.
#[derive(Debug, Clone, Default)]
pub struct History {
    events: Vec<Event>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded iterates in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the recorded `x_n` values in order.
    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.events.iter().map(|event| event.x)
    }

    /// Consumes the history, returning the recorded iterates.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl Observer<Event, Action> for History {
    fn observe(&mut self, event: &Event) -> Option<Action> {
        self.events.push(*event);
        None
    }
}

impl Observer<Event, Action> for &mut History {
    fn observe(&mut self, event: &Event) -> Option<Action> {
        (**self).observe(event)
    }
}
