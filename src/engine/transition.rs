//! Transition rule records.

use crate::core::{Guard, State};
use std::fmt;

/// Side effect executed when a rule fires, before the state changes.
pub type Action<C> = fn(&C);

/// A transition from one state to another, guarded by a predicate over the
/// FSM context and optionally carrying an action.
pub struct Transition<S: State, C> {
    pub from: S,
    pub to: S,
    pub guard: Guard<C>,
    pub action: Option<Action<C>>,
}

impl<S: State, C> Transition<S, C> {
    /// Check if this transition can execute from the current state
    pub fn can_execute(&self, current: &S, context: &C) -> bool {
        if *current != self.from {
            return false;
        }

        self.guard.check(context)
    }

    /// Run the rule's action, if any
    pub fn run_action(&self, context: &C) {
        if let Some(action) = self.action {
            action(context);
        }
    }
}

impl<S: State, C> Clone for Transition<S, C> {
    fn clone(&self) -> Self {
        Self {
            from: self.from,
            to: self.to,
            guard: self.guard,
            action: self.action,
        }
    }
}

impl<S: State, C> fmt::Debug for Transition<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
