//! RGB distance display.
//!
//! While active the display renders every distance it is handed as a
//! [`DistanceBand`] color; when deactivated it goes dark.

use crate::builder::{guarded_action, StateMachineBuilder};
use crate::engine::{StateMachine, StepResult};
use crate::hal::{DisplayPort, RgbColor};
use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

pub const DANGER_MIN_CM: u32 = 0;
pub const WARNING_MIN_CM: u32 = 25;
pub const NO_PROBLEM_MIN_CM: u32 = 50;
pub const INFO_MIN_CM: u32 = 150;
pub const OK_MIN_CM: u32 = 175;
pub const OK_MAX_CM: u32 = 200;

/// Distance stored before the first reading; outside every band.
pub const UNSET_DISTANCE_CM: u32 = 10_000;

state_enum! {
    /// States of the display FSM.
    pub enum DisplayState {
        WaitDisplay,
        SetDisplay,
    }
}

/// Color band a distance falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceBand {
    /// `[0, 25]` cm
    Danger,
    /// `(25, 50]` cm
    Warning,
    /// `(50, 150]` cm
    NoProblem,
    /// `(150, 175]` cm
    Info,
    /// `(175, 200]` cm
    Ok,
    OutOfRange,
}

impl DistanceBand {
    pub fn from_distance(distance_cm: u32) -> Self {
        match distance_cm {
            d if d <= WARNING_MIN_CM => Self::Danger,
            d if d <= NO_PROBLEM_MIN_CM => Self::Warning,
            d if d <= INFO_MIN_CM => Self::NoProblem,
            d if d <= OK_MIN_CM => Self::Info,
            d if d <= OK_MAX_CM => Self::Ok,
            _ => Self::OutOfRange,
        }
    }

    pub fn color(self) -> RgbColor {
        match self {
            Self::Danger => RgbColor::RED,
            Self::Warning => RgbColor::YELLOW,
            Self::NoProblem => RgbColor::GREEN,
            Self::Info => RgbColor::TURQUOISE,
            Self::Ok => RgbColor::BLUE,
            Self::OutOfRange => RgbColor::OFF,
        }
    }
}

/// Data the display rules operate on.
pub struct DisplayContext<P> {
    port: P,
    display_id: u32,
    distance_cm: Cell<u32>,
    new_color: Cell<bool>,
    status: Cell<bool>,
    idle: Cell<bool>,
}

impl<P: DisplayPort> DisplayContext<P> {
    fn check_active(&self) -> bool {
        self.status.get()
    }

    fn check_set_new_color(&self) -> bool {
        self.new_color.get()
    }

    fn check_off(&self) -> bool {
        !self.status.get()
    }

    fn do_set_on(&self) {
        self.port.set_rgb(self.display_id, RgbColor::OFF);
    }

    fn do_set_color(&self) {
        let color = DistanceBand::from_distance(self.distance_cm.get()).color();
        self.port.set_rgb(self.display_id, color);
        self.new_color.set(false);
        self.idle.set(true);
    }

    fn do_set_off(&self) {
        self.port.set_rgb(self.display_id, RgbColor::OFF);
        self.idle.set(false);
    }
}

pub struct FsmDisplay<P> {
    machine: StateMachine<DisplayState, DisplayContext<P>>,
    context: DisplayContext<P>,
}

impl<P: DisplayPort> FsmDisplay<P> {
    pub fn new(port: P, display_id: u32) -> Self {
        use DisplayState::*;

        let machine: StateMachine<DisplayState, DisplayContext<P>> = StateMachineBuilder::new()
            .named("display")
            .initial(WaitDisplay)
            .transitions(vec![
                guarded_action(
                    WaitDisplay,
                    SetDisplay,
                    DisplayContext::check_active,
                    DisplayContext::do_set_on,
                ),
                guarded_action(
                    SetDisplay,
                    SetDisplay,
                    DisplayContext::check_set_new_color,
                    DisplayContext::do_set_color,
                ),
                guarded_action(
                    SetDisplay,
                    WaitDisplay,
                    DisplayContext::check_off,
                    DisplayContext::do_set_off,
                ),
            ])
            .build()
            .expect("display transition table is well-formed");

        port.init(display_id);

        Self {
            machine,
            context: DisplayContext {
                port,
                display_id,
                distance_cm: Cell::new(UNSET_DISTANCE_CM),
                new_color: Cell::new(false),
                status: Cell::new(false),
                idle: Cell::new(false),
            },
        }
    }

    /// Apply a pending status change or distance to the RGB light.
    pub fn fire(&self) -> StepResult<DisplayState> {
        self.machine.fire(&self.context)
    }

    /// Store a distance; its color is rendered on the next fire while
    /// active.
    pub fn set_distance(&self, distance_cm: u32) {
        self.context.distance_cm.set(distance_cm);
        self.context.new_color.set(true);
    }

    pub fn distance(&self) -> u32 {
        self.context.distance_cm.get()
    }

    /// Whether the display is switched on.
    pub fn status(&self) -> bool {
        self.context.status.get()
    }

    pub fn set_status(&self, status: bool) {
        self.context.status.set(status);
    }

    /// True while active and not yet settled on a rendered color.
    pub fn check_activity(&self) -> bool {
        self.context.status.get() && !self.context.idle.get()
    }

    pub fn display_id(&self) -> u32 {
        self.context.display_id
    }

    pub fn state(&self) -> DisplayState {
        self.machine.current_state()
    }

    pub fn set_state(&self, state: DisplayState) {
        self.machine.set_state(state);
    }
}
