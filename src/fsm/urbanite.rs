//! System orchestrator.
//!
//! `FsmUrbanite` turns button presses into power and pause commands, feeds
//! ultrasound readings to the display and puts the board to sleep whenever
//! none of the sub-FSMs has work pending. It borrows the sub-FSMs; the
//! application owns them.
//!
//! ```text
//!            long press               no activity
//!   Off <-----------------> Measure -------------> SleepWhileOn
//!    |        long press     |  ^  ^                    |
//!    | no activity           |  |  +--new measurement---+
//!    v                       +--+ new measurement / pause press
//!   SleepWhileOff --activity--> Off
//! ```

use crate::builder::{guarded_action, guarded_transition, StateMachineBuilder};
use crate::engine::{StateMachine, StepResult};
use crate::fsm::button::FsmButton;
use crate::fsm::display::{FsmDisplay, WARNING_MIN_CM};
use crate::fsm::ultrasound::FsmUltrasound;
use crate::hal::{ButtonPort, DisplayPort, SystemPort, UltrasoundPort};
use crate::state_enum;
use log::{debug, info};
use std::cell::Cell;

state_enum! {
    /// States of the orchestrator.
    pub enum UrbaniteState {
        Off,
        Measure,
        SleepWhileOff,
        SleepWhileOn,
    }
}

/// Data the orchestrator rules operate on.
pub struct UrbaniteContext<'a, B, U, D, Sys> {
    button: &'a FsmButton<B>,
    ultrasound: &'a FsmUltrasound<U>,
    display: &'a FsmDisplay<D>,
    system: Sys,
    on_off_press_time_ms: u32,
    pause_display_time_ms: u32,
    paused: Cell<bool>,
}

impl<B, U, D, Sys> UrbaniteContext<'_, B, U, D, Sys>
where
    B: ButtonPort + SystemPort,
    U: UltrasoundPort,
    D: DisplayPort,
    Sys: SystemPort,
{
    fn check_on_off(&self) -> bool {
        self.button.duration() > self.on_off_press_time_ms
    }

    // Inclusive at the top: a press of exactly `on_off_press_time_ms` pauses.
    fn check_pause_display(&self) -> bool {
        let duration = self.button.duration();
        duration > self.pause_display_time_ms && duration <= self.on_off_press_time_ms
    }

    fn check_new_measure(&self) -> bool {
        self.ultrasound.new_measurement_ready()
    }

    fn check_activity(&self) -> bool {
        self.button.check_activity()
            || self.ultrasound.check_activity()
            || self.display.check_activity()
    }

    fn check_no_activity(&self) -> bool {
        !self.check_activity()
    }

    fn do_start_up_measure(&self) {
        self.button.reset_duration();
        self.ultrasound.start();
        self.display.set_status(true);
        info!("[{}] Urbanite system ON", self.system.millis());
    }

    fn do_stop_urbanite(&self) {
        self.button.reset_duration();
        self.ultrasound.stop();
        self.display.set_status(false);
        self.paused.set(false);
        info!("[{}] Urbanite system OFF", self.system.millis());
    }

    fn do_pause_display(&self) {
        self.button.reset_duration();
        let paused = !self.paused.get();
        self.paused.set(paused);
        self.display.set_status(!paused);
        if paused {
            info!("[{}] Urbanite system display PAUSE", self.system.millis());
        } else {
            info!("[{}] Urbanite system display RESUME", self.system.millis());
        }
    }

    fn do_display_distance(&self) {
        let distance_cm = self.ultrasound.get_distance();

        if !self.paused.get() {
            self.display.set_distance(distance_cm);
        } else if distance_cm < WARNING_MIN_CM / 2 {
            self.display.set_distance(distance_cm);
            self.display.set_status(true);
        } else {
            self.display.set_status(false);
        }

        debug!("[{}] Distance: {} cm", self.system.millis(), distance_cm);
    }

    fn do_sleep(&self) {
        self.system.sleep();
    }
}

/// Orchestrator over one button, one ultrasound sensor and one display.
pub struct FsmUrbanite<'a, B, U, D, Sys> {
    machine: StateMachine<UrbaniteState, UrbaniteContext<'a, B, U, D, Sys>>,
    context: UrbaniteContext<'a, B, U, D, Sys>,
}

impl<'a, B, U, D, Sys> FsmUrbanite<'a, B, U, D, Sys>
where
    B: ButtonPort + SystemPort,
    U: UltrasoundPort,
    D: DisplayPort,
    Sys: SystemPort,
{
    /// Create the orchestrator in `Off`, unpaused.
    ///
    /// A completed press strictly longer than `on_off_press_time_ms` toggles
    /// power. A press longer than `pause_display_time_ms` and up to and
    /// including `on_off_press_time_ms` toggles the display pause while
    /// measuring, so the two ranges never overlap. Shorter presses are
    /// ignored.
    pub fn new(
        button: &'a FsmButton<B>,
        on_off_press_time_ms: u32,
        pause_display_time_ms: u32,
        ultrasound: &'a FsmUltrasound<U>,
        display: &'a FsmDisplay<D>,
        system: Sys,
    ) -> Self {
        use UrbaniteState::*;

        let machine: StateMachine<UrbaniteState, UrbaniteContext<'a, B, U, D, Sys>> =
            StateMachineBuilder::new()
                .named("urbanite")
                .initial(Off)
                .transitions(vec![
                    guarded_action(
                        Off,
                        Measure,
                        UrbaniteContext::check_on_off,
                        UrbaniteContext::do_start_up_measure,
                    ),
                    guarded_action(
                        Off,
                        SleepWhileOff,
                        UrbaniteContext::check_no_activity,
                        UrbaniteContext::do_sleep,
                    ),
                    guarded_action(
                        Measure,
                        Off,
                        UrbaniteContext::check_on_off,
                        UrbaniteContext::do_stop_urbanite,
                    ),
                    guarded_action(
                        Measure,
                        Measure,
                        UrbaniteContext::check_new_measure,
                        UrbaniteContext::do_display_distance,
                    ),
                    guarded_action(
                        Measure,
                        Measure,
                        UrbaniteContext::check_pause_display,
                        UrbaniteContext::do_pause_display,
                    ),
                    guarded_action(
                        Measure,
                        SleepWhileOn,
                        UrbaniteContext::check_no_activity,
                        UrbaniteContext::do_sleep,
                    ),
                    guarded_transition(
                        SleepWhileOn,
                        Measure,
                        UrbaniteContext::check_new_measure,
                    ),
                    guarded_action(
                        SleepWhileOn,
                        SleepWhileOn,
                        UrbaniteContext::check_no_activity,
                        UrbaniteContext::do_sleep,
                    ),
                    guarded_transition(SleepWhileOff, Off, UrbaniteContext::check_activity),
                    guarded_action(
                        SleepWhileOff,
                        SleepWhileOff,
                        UrbaniteContext::check_no_activity,
                        UrbaniteContext::do_sleep,
                    ),
                ])
                .build()
                .expect("urbanite transition table is well-formed");

        Self {
            machine,
            context: UrbaniteContext {
                button,
                ultrasound,
                display,
                system,
                on_off_press_time_ms,
                pause_display_time_ms,
                paused: Cell::new(false),
            },
        }
    }

    /// Fire only the orchestrator; the sub-FSMs are left alone.
    pub fn fire(&self) -> StepResult<UrbaniteState> {
        self.machine.fire(&self.context)
    }

    /// One main-loop iteration: button, ultrasound, display, then the
    /// orchestrator, so it sees this cycle's sub-FSM results.
    pub fn poll(&self) -> StepResult<UrbaniteState> {
        self.context.button.fire();
        self.context.ultrasound.fire();
        self.context.display.fire();
        self.fire()
    }

    pub fn is_paused(&self) -> bool {
        self.context.paused.get()
    }

    pub fn on_off_press_time_ms(&self) -> u32 {
        self.context.on_off_press_time_ms
    }

    pub fn pause_display_time_ms(&self) -> u32 {
        self.context.pause_display_time_ms
    }

    pub fn state(&self) -> UrbaniteState {
        self.machine.current_state()
    }

    pub fn set_state(&self, state: UrbaniteState) {
        self.machine.set_state(state);
    }
}
