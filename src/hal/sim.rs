//! Host-side board for running the FSMs without hardware.
//!
//! `SimBoard` implements every port of the crate. Its `press`, `release`,
//! `advance_millis`, `trigger_timer_elapsed`, `echo_capture`,
//! `echo_counter_overflow` and `new_measurement_timer_elapsed` methods play
//! the role of the interrupt handlers on a real board: they only write the
//! ISR hand-off cells, and they ignore events from timers that are stopped.
//!
//! The board models one button, one ultrasound transceiver and one RGB
//! display. Identifiers are accepted as-is.

use super::{ButtonPort, DisplayPort, IsrCounter, IsrFlag, RgbColor, SystemPort, UltrasoundPort};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct SimBoard {
    millis: IsrCounter,
    sleeps: IsrCounter,

    button_pressed: IsrFlag,

    trigger_ready: IsrFlag,
    trigger_end: IsrFlag,
    trigger_line: IsrFlag,
    echo_received: IsrFlag,
    echo_init_captured: IsrFlag,
    echo_init_tick: IsrCounter,
    echo_end_tick: IsrCounter,
    echo_overflows: IsrCounter,
    trigger_timer: IsrFlag,
    echo_timer: IsrFlag,
    new_measurement_timer: IsrFlag,
    measurements: IsrCounter,

    rgb: Mutex<Vec<RgbColor>>,
}

impl SimBoard {
    pub fn new() -> Self {
        Self::default()
    }

    // -- interrupt sources -------------------------------------------------

    /// SysTick: move the millisecond clock forward.
    pub fn advance_millis(&self, ms: u32) {
        self.millis.advance(ms);
    }

    pub fn set_millis(&self, ms: u32) {
        self.millis.set(ms);
    }

    /// Button edge interrupt, falling edge.
    pub fn press(&self) {
        self.button_pressed.set(true);
    }

    /// Button edge interrupt, rising edge.
    pub fn release(&self) {
        self.button_pressed.set(false);
    }

    /// Trigger timer update: the trigger pulse has lasted long enough.
    pub fn trigger_timer_elapsed(&self) {
        if self.trigger_timer.get() {
            self.trigger_end.set(true);
        }
    }

    /// Echo timer input capture. The first capture after a reset is the
    /// rising edge, the next one the falling edge. Either may land on tick 0.
    pub fn echo_capture(&self, tick: u32) {
        if !self.echo_timer.get() {
            return;
        }
        if !self.echo_init_captured.get() {
            self.echo_init_tick.set(tick);
            self.echo_init_captured.set(true);
        } else {
            self.echo_end_tick.set(tick);
            self.echo_received.set(true);
        }
    }

    /// Echo timer update: the 16-bit counter wrapped.
    pub fn echo_counter_overflow(&self) {
        if self.echo_timer.get() {
            self.echo_overflows.increment();
        }
    }

    /// New-measurement timer update: the sensor may be triggered again.
    pub fn new_measurement_timer_elapsed(&self) {
        if self.new_measurement_timer.get() {
            self.trigger_ready.set(true);
        }
    }

    /// Deliver a whole echo pulse: rising edge at `init`, `overflows`
    /// counter wraps, falling edge at `end`.
    pub fn echo(&self, init: u32, end: u32, overflows: u32) {
        self.echo_capture(init);
        for _ in 0..overflows {
            self.echo_counter_overflow();
        }
        self.echo_capture(end);
    }

    // -- observation -------------------------------------------------------

    pub fn sleep_count(&self) -> u32 {
        self.sleeps.get()
    }

    pub fn measurements_started(&self) -> u32 {
        self.measurements.get()
    }

    pub fn trigger_line_high(&self) -> bool {
        self.trigger_line.get()
    }

    pub fn trigger_timer_running(&self) -> bool {
        self.trigger_timer.get()
    }

    pub fn echo_timer_running(&self) -> bool {
        self.echo_timer.get()
    }

    pub fn new_measurement_timer_running(&self) -> bool {
        self.new_measurement_timer.get()
    }

    /// Last color written to the display, if any.
    pub fn last_rgb(&self) -> Option<RgbColor> {
        self.rgb
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    /// Every color written to the display, oldest first.
    pub fn rgb_history(&self) -> Vec<RgbColor> {
        self.rgb
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SystemPort for SimBoard {
    fn millis(&self) -> u32 {
        self.millis.get()
    }

    fn sleep(&self) {
        self.sleeps.increment();
    }
}

impl ButtonPort for SimBoard {
    fn init(&self, _button_id: u32) {
        self.button_pressed.set(false);
    }

    fn is_pressed(&self, _button_id: u32) -> bool {
        self.button_pressed.get()
    }
}

impl UltrasoundPort for SimBoard {
    fn init(&self, ultrasound_id: u32) {
        self.trigger_ready.set(false);
        self.trigger_end.set(false);
        self.trigger_line.set(false);
        self.trigger_timer.set(false);
        self.echo_timer.set(false);
        self.new_measurement_timer.set(false);
        self.reset_echo_ticks(ultrasound_id);
    }

    fn start_measurement(&self, _ultrasound_id: u32) {
        self.trigger_ready.take();
        self.trigger_line.set(true);
        self.trigger_timer.set(true);
        self.echo_timer.set(true);
        self.new_measurement_timer.set(true);
        self.measurements.increment();
    }

    fn stop_trigger_timer(&self, _ultrasound_id: u32) {
        self.trigger_line.set(false);
        self.trigger_timer.set(false);
    }

    fn stop_echo_timer(&self, _ultrasound_id: u32) {
        self.echo_timer.set(false);
    }

    fn stop(&self, ultrasound_id: u32) {
        self.stop_trigger_timer(ultrasound_id);
        self.stop_echo_timer(ultrasound_id);
        self.stop_new_measurement_timer();
        self.reset_echo_ticks(ultrasound_id);
    }

    fn start_new_measurement_timer(&self) {
        self.new_measurement_timer.set(true);
    }

    fn stop_new_measurement_timer(&self) {
        self.new_measurement_timer.set(false);
    }

    fn reset_echo_ticks(&self, _ultrasound_id: u32) {
        self.echo_init_tick.set(0);
        self.echo_end_tick.set(0);
        self.echo_overflows.set(0);
        self.echo_init_captured.set(false);
        self.echo_received.set(false);
    }

    fn trigger_ready(&self, _ultrasound_id: u32) -> bool {
        self.trigger_ready.get()
    }

    fn set_trigger_ready(&self, _ultrasound_id: u32, ready: bool) {
        self.trigger_ready.set(ready);
    }

    fn trigger_end(&self, _ultrasound_id: u32) -> bool {
        self.trigger_end.get()
    }

    fn set_trigger_end(&self, _ultrasound_id: u32, end: bool) {
        self.trigger_end.set(end);
    }

    fn take_trigger_end(&self, _ultrasound_id: u32) -> bool {
        self.trigger_end.take()
    }

    fn echo_init_tick(&self, _ultrasound_id: u32) -> u32 {
        self.echo_init_tick.get()
    }

    fn set_echo_init_tick(&self, _ultrasound_id: u32, tick: u32) {
        self.echo_init_tick.set(tick);
    }

    fn echo_init_captured(&self, _ultrasound_id: u32) -> bool {
        self.echo_init_captured.get()
    }

    fn set_echo_init_captured(&self, _ultrasound_id: u32, captured: bool) {
        self.echo_init_captured.set(captured);
    }

    fn echo_end_tick(&self, _ultrasound_id: u32) -> u32 {
        self.echo_end_tick.get()
    }

    fn set_echo_end_tick(&self, _ultrasound_id: u32, tick: u32) {
        self.echo_end_tick.set(tick);
    }

    fn echo_received(&self, _ultrasound_id: u32) -> bool {
        self.echo_received.get()
    }

    fn set_echo_received(&self, _ultrasound_id: u32, received: bool) {
        self.echo_received.set(received);
    }

    fn echo_overflows(&self, _ultrasound_id: u32) -> u32 {
        self.echo_overflows.get()
    }

    fn set_echo_overflows(&self, _ultrasound_id: u32, overflows: u32) {
        self.echo_overflows.set(overflows);
    }
}

impl DisplayPort for SimBoard {
    fn init(&self, _display_id: u32) {
        self.rgb
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn set_rgb(&self, _display_id: u32, color: RgbColor) {
        self.rgb
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(color);
    }
}
