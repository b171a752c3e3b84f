//! Debounced push button.
//!
//! The button FSM turns the level latched by the edge interrupt into a clean
//! square wave and records how long the last complete press lasted:
//!
//! ```text
//! Released --pressed--> PressedWait --debounce--> Pressed
//!    ^                                               |
//!    +--debounce-- ReleasedWait <--released----------+
//! ```

use crate::builder::{guarded_action, guarded_transition, StateMachineBuilder};
use crate::engine::{StateMachine, StepResult};
use crate::fsm::deadline_reached;
use crate::hal::{ButtonPort, SystemPort};
use crate::state_enum;
use std::cell::Cell;

state_enum! {
    /// States of the button FSM.
    pub enum ButtonState {
        Released,
        PressedWait,
        Pressed,
        ReleasedWait,
    }
}

/// Data the button rules operate on.
pub struct ButtonContext<P> {
    port: P,
    button_id: u32,
    debounce_time_ms: u32,
    next_timeout: Cell<u32>,
    tick_pressed: Cell<u32>,
    duration: Cell<u32>,
}

impl<P: ButtonPort + SystemPort> ButtonContext<P> {
    fn check_button_pressed(&self) -> bool {
        self.port.is_pressed(self.button_id)
    }

    fn check_button_released(&self) -> bool {
        !self.port.is_pressed(self.button_id)
    }

    fn check_timeout(&self) -> bool {
        deadline_reached(self.port.millis(), self.next_timeout.get())
    }

    fn do_store_tick_pressed(&self) {
        let now = self.port.millis();
        self.tick_pressed.set(now);
        self.next_timeout.set(now.wrapping_add(self.debounce_time_ms));
    }

    fn do_set_duration(&self) {
        let now = self.port.millis();
        self.duration.set(now.wrapping_sub(self.tick_pressed.get()));
        self.next_timeout.set(now.wrapping_add(self.debounce_time_ms));
    }
}

/// Debounced button bound to one hardware identifier.
pub struct FsmButton<P> {
    machine: StateMachine<ButtonState, ButtonContext<P>>,
    context: ButtonContext<P>,
}

impl<P: ButtonPort + SystemPort> FsmButton<P> {
    /// Create the FSM in `Released` and initialise the button hardware.
    pub fn new(port: P, debounce_time_ms: u32, button_id: u32) -> Self {
        use ButtonState::*;

        let machine: StateMachine<ButtonState, ButtonContext<P>> = StateMachineBuilder::new()
            .named("button")
            .initial(Released)
            .transitions(vec![
                guarded_action(
                    Released,
                    PressedWait,
                    ButtonContext::check_button_pressed,
                    ButtonContext::do_store_tick_pressed,
                ),
                guarded_transition(PressedWait, Pressed, ButtonContext::check_timeout),
                guarded_action(
                    Pressed,
                    ReleasedWait,
                    ButtonContext::check_button_released,
                    ButtonContext::do_set_duration,
                ),
                guarded_transition(ReleasedWait, Released, ButtonContext::check_timeout),
            ])
            .build()
            .expect("button transition table is well-formed");

        port.init(button_id);

        Self {
            machine,
            context: ButtonContext {
                port,
                button_id,
                debounce_time_ms,
                next_timeout: Cell::new(0),
                tick_pressed: Cell::new(0),
                duration: Cell::new(0),
            },
        }
    }

    /// Sample the button once and advance the debounce machine.
    pub fn fire(&self) -> StepResult<ButtonState> {
        self.machine.fire(&self.context)
    }

    /// Length in ms of the last completed press, or 0 when no press has
    /// completed since the last reset.
    ///
    /// A completed press always lasts at least the debounce time, so 0 is
    /// never a real measurement when debouncing is enabled.
    pub fn duration(&self) -> u32 {
        self.context.duration.get()
    }

    /// Forget the last press so it is not acted on twice.
    pub fn reset_duration(&self) {
        self.context.duration.set(0);
    }

    pub fn debounce_time_ms(&self) -> u32 {
        self.context.debounce_time_ms
    }

    pub fn button_id(&self) -> u32 {
        self.context.button_id
    }

    /// True while a press or its debounce is in progress.
    pub fn check_activity(&self) -> bool {
        self.machine.current_state() != ButtonState::Released
    }

    pub fn state(&self) -> ButtonState {
        self.machine.current_state()
    }

    pub fn set_state(&self, state: ButtonState) {
        self.machine.set_state(state);
    }
}
