//! Hardware abstraction surface consumed by the FSMs.
//!
//! Each board provides one implementation of these traits. Methods take
//! `&self` because the same hardware state is shared with interrupt
//! handlers: anything an ISR writes must live in an [`IsrFlag`] or
//! [`IsrCounter`] behind the port.
//!
//! Identifiers are compile-time constants of the board. Passing an unknown
//! identifier is a contract violation, not a reported error.

mod cell;
pub mod sim;

pub use cell::{IsrCounter, IsrFlag};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Three-channel color, 0-255 per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const YELLOW: Self = Self::new(94, 94, 0);
    pub const TURQUOISE: Self = Self::new(26, 89, 82);
    pub const OFF: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// System services: millisecond clock and low-power wait.
pub trait SystemPort {
    /// Milliseconds since boot. Wraps around after `u32::MAX`.
    fn millis(&self) -> u32;

    /// Enter low-power mode until the next interrupt.
    fn sleep(&self);
}

/// Push button input, fed by an edge interrupt.
pub trait ButtonPort {
    fn init(&self, button_id: u32);

    /// Level last latched by the button's edge interrupt.
    fn is_pressed(&self, button_id: u32) -> bool;
}

/// Ultrasound transceiver with trigger, echo and inter-measurement timers.
///
/// The trigger-ready, trigger-end, echo tick, echo-received and overflow
/// fields are written by interrupt handlers; the polling side reads them and
/// only resets them through the mutators below.
pub trait UltrasoundPort {
    fn init(&self, ultrasound_id: u32);

    /// Raise the trigger line and start the trigger, echo and
    /// new-measurement timers. Consumes the trigger-ready flag.
    fn start_measurement(&self, ultrasound_id: u32);

    /// Lower the trigger line and stop the trigger timer.
    fn stop_trigger_timer(&self, ultrasound_id: u32);

    fn stop_echo_timer(&self, ultrasound_id: u32);

    /// Halt all three timers and reset the echo ticks.
    fn stop(&self, ultrasound_id: u32);

    fn start_new_measurement_timer(&self);

    fn stop_new_measurement_timer(&self);

    /// Zero the echo ticks and overflow count, and clear the echo-captured
    /// and echo-received flags.
    fn reset_echo_ticks(&self, ultrasound_id: u32);

    fn trigger_ready(&self, ultrasound_id: u32) -> bool;
    fn set_trigger_ready(&self, ultrasound_id: u32, ready: bool);

    fn trigger_end(&self, ultrasound_id: u32) -> bool;
    fn set_trigger_end(&self, ultrasound_id: u32, end: bool);

    /// Read the trigger-end flag and clear it in one atomic step.
    fn take_trigger_end(&self, ultrasound_id: u32) -> bool;

    fn echo_init_tick(&self, ultrasound_id: u32) -> u32;
    fn set_echo_init_tick(&self, ultrasound_id: u32, tick: u32);

    /// Whether the rising edge of the current echo has been captured. The
    /// init tick alone cannot tell, since the counter may read 0 at the edge.
    fn echo_init_captured(&self, ultrasound_id: u32) -> bool;
    fn set_echo_init_captured(&self, ultrasound_id: u32, captured: bool);

    fn echo_end_tick(&self, ultrasound_id: u32) -> u32;
    fn set_echo_end_tick(&self, ultrasound_id: u32, tick: u32);

    fn echo_received(&self, ultrasound_id: u32) -> bool;
    fn set_echo_received(&self, ultrasound_id: u32, received: bool);

    fn echo_overflows(&self, ultrasound_id: u32) -> u32;
    fn set_echo_overflows(&self, ultrasound_id: u32, overflows: u32);
}

/// RGB light used as the distance display.
pub trait DisplayPort {
    fn init(&self, display_id: u32);

    fn set_rgb(&self, display_id: u32, color: RgbColor);
}

impl<T: SystemPort + ?Sized> SystemPort for &T {
    fn millis(&self) -> u32 {
        (**self).millis()
    }

    fn sleep(&self) {
        (**self).sleep()
    }
}

impl<T: SystemPort + ?Sized> SystemPort for Arc<T> {
    fn millis(&self) -> u32 {
        (**self).millis()
    }

    fn sleep(&self) {
        (**self).sleep()
    }
}

impl<T: ButtonPort + ?Sized> ButtonPort for &T {
    fn init(&self, button_id: u32) {
        (**self).init(button_id)
    }

    fn is_pressed(&self, button_id: u32) -> bool {
        (**self).is_pressed(button_id)
    }
}

impl<T: ButtonPort + ?Sized> ButtonPort for Arc<T> {
    fn init(&self, button_id: u32) {
        (**self).init(button_id)
    }

    fn is_pressed(&self, button_id: u32) -> bool {
        (**self).is_pressed(button_id)
    }
}

impl<T: DisplayPort + ?Sized> DisplayPort for &T {
    fn init(&self, display_id: u32) {
        (**self).init(display_id)
    }

    fn set_rgb(&self, display_id: u32, color: RgbColor) {
        (**self).set_rgb(display_id, color)
    }
}

impl<T: DisplayPort + ?Sized> DisplayPort for Arc<T> {
    fn init(&self, display_id: u32) {
        (**self).init(display_id)
    }

    fn set_rgb(&self, display_id: u32, color: RgbColor) {
        (**self).set_rgb(display_id, color)
    }
}

macro_rules! forward_ultrasound_port {
    ($($ty:ty),*) => {$(
        impl<T: UltrasoundPort + ?Sized> UltrasoundPort for $ty {
            fn init(&self, id: u32) {
                (**self).init(id)
            }
            fn start_measurement(&self, id: u32) {
                (**self).start_measurement(id)
            }
            fn stop_trigger_timer(&self, id: u32) {
                (**self).stop_trigger_timer(id)
            }
            fn stop_echo_timer(&self, id: u32) {
                (**self).stop_echo_timer(id)
            }
            fn stop(&self, id: u32) {
                (**self).stop(id)
            }
            fn start_new_measurement_timer(&self) {
                (**self).start_new_measurement_timer()
            }
            fn stop_new_measurement_timer(&self) {
                (**self).stop_new_measurement_timer()
            }
            fn reset_echo_ticks(&self, id: u32) {
                (**self).reset_echo_ticks(id)
            }
            fn trigger_ready(&self, id: u32) -> bool {
                (**self).trigger_ready(id)
            }
            fn set_trigger_ready(&self, id: u32, ready: bool) {
                (**self).set_trigger_ready(id, ready)
            }
            fn trigger_end(&self, id: u32) -> bool {
                (**self).trigger_end(id)
            }
            fn set_trigger_end(&self, id: u32, end: bool) {
                (**self).set_trigger_end(id, end)
            }
            fn take_trigger_end(&self, id: u32) -> bool {
                (**self).take_trigger_end(id)
            }
            fn echo_init_tick(&self, id: u32) -> u32 {
                (**self).echo_init_tick(id)
            }
            fn set_echo_init_tick(&self, id: u32, tick: u32) {
                (**self).set_echo_init_tick(id, tick)
            }
            fn echo_init_captured(&self, id: u32) -> bool {
                (**self).echo_init_captured(id)
            }
            fn set_echo_init_captured(&self, id: u32, captured: bool) {
                (**self).set_echo_init_captured(id, captured)
            }
            fn echo_end_tick(&self, id: u32) -> u32 {
                (**self).echo_end_tick(id)
            }
            fn set_echo_end_tick(&self, id: u32, tick: u32) {
                (**self).set_echo_end_tick(id, tick)
            }
            fn echo_received(&self, id: u32) -> bool {
                (**self).echo_received(id)
            }
            fn set_echo_received(&self, id: u32, received: bool) {
                (**self).set_echo_received(id, received)
            }
            fn echo_overflows(&self, id: u32) -> u32 {
                (**self).echo_overflows(id)
            }
            fn set_echo_overflows(&self, id: u32, overflows: u32) {
                (**self).set_echo_overflows(id, overflows)
            }
        }
    )*};
}

forward_ultrasound_port!(&T, Arc<T>);
