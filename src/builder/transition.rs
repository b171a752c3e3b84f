//! Builder for constructing state transitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, State};
use crate::engine::{Action, Transition};

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State, C> {
    from: Option<S>,
    to: Option<S>,
    guard: Option<Guard<C>>,
    action: Option<Action<C>>,
}

impl<S: State, C> TransitionBuilder<S, C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            guard: None,
            action: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the guard (required).
    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Set the guard from a predicate function (required).
    pub fn when(mut self, predicate: fn(&C) -> bool) -> Self {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Set the action (optional).
    pub fn then(mut self, action: Action<C>) -> Self {
        self.action = Some(action);
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, C>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let guard = self.guard.ok_or(BuildError::MissingGuard)?;

        Ok(Transition {
            from,
            to,
            guard,
            action: self.action,
        })
    }
}

impl<S: State, C> Default for TransitionBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}
