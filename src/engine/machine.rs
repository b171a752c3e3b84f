//! State machine that evaluates a rule table against its context.

use crate::core::State;
use crate::engine::transition::Transition;
use log::trace;
use std::cell::Cell;

/// Result of firing a machine once
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult<S: State> {
    /// A rule matched; its action ran and the machine moved to `to`
    /// (which may equal `from` for a self-loop)
    Transitioned { from: S, to: S },

    /// No rule matched; the machine stayed where it was
    Idle(S),
}

impl<S: State> StepResult<S> {
    /// Whether a rule fired during this step
    pub fn transitioned(&self) -> bool {
        matches!(self, StepResult::Transitioned { .. })
    }

    /// State the machine is in after the step
    pub fn state(&self) -> S {
        match *self {
            StepResult::Transitioned { to, .. } => to,
            StepResult::Idle(state) => state,
        }
    }
}

/// State machine that executes guarded transitions over a context `C`.
///
/// Rule order is priority order: `fire` takes the first rule whose origin
/// is the current state and whose guard holds.
pub struct StateMachine<S: State, C> {
    name: &'static str,
    current: Cell<S>,
    transitions: Vec<Transition<S, C>>,
}

impl<S: State, C> StateMachine<S, C> {
    /// Create a new state machine in the initial state
    pub fn new(name: &'static str, initial: S) -> Self {
        Self {
            name,
            current: Cell::new(initial),
            transitions: Vec::new(),
        }
    }

    /// Add a transition to the end of the table
    pub fn add_transition(&mut self, transition: Transition<S, C>) {
        self.transitions.push(transition);
    }

    /// Name used in transition logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get current state
    pub fn current_state(&self) -> S {
        self.current.get()
    }

    /// Force the current state without running any action
    pub fn set_state(&self, state: S) {
        self.current.set(state);
    }

    /// The rule table, in priority order
    pub fn transitions(&self) -> &[Transition<S, C>] {
        &self.transitions
    }

    /// Evaluate the table once.
    ///
    /// Runs the action of the first matching rule and then moves to its
    /// destination. With no match the state is left untouched.
    pub fn fire(&self, context: &C) -> StepResult<S> {
        let from = self.current.get();

        let Some(transition) = self
            .transitions
            .iter()
            .find(|t| t.can_execute(&from, context))
        else {
            return StepResult::Idle(from);
        };

        transition.run_action(context);
        self.current.set(transition.to);

        if from != transition.to {
            trace!(
                "[{}] {} -> {}",
                self.name,
                from.name(),
                transition.to.name()
            );
        }

        StepResult::Transitioned {
            from,
            to: transition.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Guard;
    use crate::engine::transition::Action;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
    enum LightState {
        Off,
        On,
        Blink,
    }

    impl State for LightState {
        fn name(&self) -> &'static str {
            match self {
                Self::Off => "Off",
                Self::On => "On",
                Self::Blink => "Blink",
            }
        }
    }

    #[derive(Default)]
    struct Switch {
        on: Cell<bool>,
        blink: Cell<bool>,
        actions: Cell<u32>,
    }

    fn count(switch: &Switch) {
        switch.actions.set(switch.actions.get() + 1);
    }

    fn rule(
        from: LightState,
        to: LightState,
        guard: fn(&Switch) -> bool,
        action: Option<Action<Switch>>,
    ) -> Transition<LightState, Switch> {
        Transition {
            from,
            to,
            guard: Guard::new(guard),
            action,
        }
    }

    fn light() -> StateMachine<LightState, Switch> {
        let mut machine = StateMachine::new("light", LightState::Off);
        machine.add_transition(rule(LightState::Off, LightState::Blink, |s| s.blink.get(), None));
        machine.add_transition(rule(LightState::Off, LightState::On, |s| s.on.get(), Some(count)));
        machine.add_transition(rule(LightState::On, LightState::Off, |s| !s.on.get(), Some(count)));
        machine
    }

    #[test]
    fn no_match_stays_idle() {
        let machine = light();
        let switch = Switch::default();

        let result = machine.fire(&switch);

        assert_eq!(result, StepResult::Idle(LightState::Off));
        assert_eq!(machine.current_state(), LightState::Off);
        assert_eq!(switch.actions.get(), 0);
    }

    #[test]
    fn guard_and_origin_select_rule() {
        let machine = light();
        let switch = Switch::default();
        switch.on.set(true);

        let result = machine.fire(&switch);

        assert_eq!(
            result,
            StepResult::Transitioned {
                from: LightState::Off,
                to: LightState::On
            }
        );
        assert_eq!(switch.actions.get(), 1);

        // Only rules whose origin is On are considered now
        let result = machine.fire(&switch);
        assert!(!result.transitioned());
        assert_eq!(result.state(), LightState::On);
    }

    #[test]
    fn first_match_wins() {
        let machine = light();
        let switch = Switch::default();
        switch.on.set(true);
        switch.blink.set(true);

        machine.fire(&switch);

        assert_eq!(machine.current_state(), LightState::Blink);
        assert_eq!(switch.actions.get(), 0);
    }

    #[test]
    fn set_state_skips_actions() {
        let machine = light();
        let switch = Switch::default();

        machine.set_state(LightState::On);

        assert_eq!(machine.current_state(), LightState::On);
        assert_eq!(switch.actions.get(), 0);
        assert_eq!(machine.transitions().len(), 3);
    }

    #[test]
    fn self_loop_reports_transition() {
        let mut machine = StateMachine::new("loop", LightState::On);
        machine.add_transition(rule(LightState::On, LightState::On, |_| true, Some(count)));
        let switch = Switch::default();

        for _ in 0..3 {
            let result = machine.fire(&switch);
            assert!(result.transitioned());
        }

        assert_eq!(machine.current_state(), LightState::On);
        assert_eq!(switch.actions.get(), 3);
    }
}
