//! Guard predicates for controlling state transitions.
//!
//! A guard looks at the data of the FSM it belongs to (its *context*) and
//! decides whether a rule may fire. Guards are plain function pointers, so
//! a rule table holds no captured state and can be built once at startup.

use std::fmt;

/// Predicate that determines if a transition can execute.
///
/// The context type `C` is the FSM's own data. Guards only read it; an
/// orchestrating FSM may also read its siblings through public accessors
/// reachable from its context.
///
/// # Example
///
/// ```rust
/// use urbanite::core::Guard;
///
/// struct Door {
///     open: bool,
/// }
///
/// let is_open = Guard::new(|door: &Door| door.open);
///
/// assert!(is_open.check(&Door { open: true }));
/// assert!(!is_open.check(&Door { open: false }));
/// ```
pub struct Guard<C> {
    predicate: fn(&C) -> bool,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate must complete in bounded time: it runs inside the
    /// polling loop on every cycle the owning FSM sits in the rule's origin
    /// state.
    pub fn new(predicate: fn(&C) -> bool) -> Self {
        Guard { predicate }
    }

    /// Evaluate the predicate against the FSM context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Guard<C> {}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter {
        value: Cell<u32>,
        limit: u32,
    }

    #[test]
    fn guard_reads_context() {
        let guard = Guard::new(|c: &Counter| c.value.get() >= c.limit);
        let counter = Counter {
            value: Cell::new(0),
            limit: 3,
        };

        assert!(!guard.check(&counter));
        counter.value.set(3);
        assert!(guard.check(&counter));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::new(|c: &Counter| c.value.get() % 2 == 0);
        let counter = Counter {
            value: Cell::new(4),
            limit: 0,
        };

        let result1 = guard.check(&counter);
        let result2 = guard.check(&counter);

        assert_eq!(result1, result2);
    }

    #[test]
    fn guard_is_copy() {
        let guard = Guard::new(|c: &Counter| c.limit > 0);
        let copy = guard;
        let counter = Counter {
            value: Cell::new(0),
            limit: 1,
        };

        assert_eq!(guard.check(&counter), copy.check(&counter));
    }
}
