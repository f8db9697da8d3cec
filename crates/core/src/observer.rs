/// Receives events and decides how the emitter should proceed.
///
/// Observers let callers monitor or steer a solver or handler without
/// changing its API, enabling logging, recording, early stopping, or custom
/// control policies.
///
/// The `observe` method returns `Option<A>`, where `Some(action)` requests an
/// emitter-specific action and `None` lets it continue unchanged.
///
/// Closures automatically implement `Observer`, and a built-in impl for `()`
/// provides a no-op observer that always returns `None`.
pub trait Observer<E, A> {
    /// Observes an event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

/// Blanket implementation for observer closures.
impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

/// A no-op observer that always returns `None`.
impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive<O: Observer<u32, &'static str>>(mut observer: O) -> Option<&'static str> {
        (0..5).find_map(|n| observer.observe(&n))
    }

    #[test]
    fn closure_can_request_action() {
        let mut seen = Vec::new();
        let action = drive(|n: &u32| {
            seen.push(*n);
            (*n == 3).then_some("stop")
        });

        assert_eq!(action, Some("stop"));
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive(()), None);
    }
}
