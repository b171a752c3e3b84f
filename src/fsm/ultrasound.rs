//! Ultrasound ranging FSM.
//!
//! One ranging cycle: raise the trigger line, wait for the trigger timer,
//! capture the rising and falling edges of the echo pulse, convert the
//! round-trip time into centimeters. Samples go into a circular buffer of
//! [`NUM_MEASUREMENTS`] and the median is published each time it fills.
//!
//! All progress comes from interrupt-written fields behind the
//! [`UltrasoundPort`]; firing the machine only reads them and clears them
//! through the port.

use crate::builder::{guarded_action, guarded_transition, StateMachineBuilder};
use crate::engine::{StateMachine, StepResult};
use crate::hal::UltrasoundPort;
use crate::state_enum;
use std::cell::Cell;

/// Samples per published median.
pub const NUM_MEASUREMENTS: usize = 5;

/// Speed of sound in m/s.
pub const SPEED_OF_SOUND_MS: u64 = 343;

/// Echo timer ticks per counter overflow (16-bit counter at 1 MHz).
pub const ECHO_COUNTER_PERIOD: u64 = 65_536;

/// Scale from `ticks * m/s` to centimeters for a 1 MHz tick.
pub const UNIT_SCALE: u64 = 10_000;

/// Length of the trigger pulse in microseconds.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Minimum time between two measurements in milliseconds.
pub const NEW_MEASUREMENT_INTERVAL_MS: u32 = 100;

state_enum! {
    /// States of the ultrasound FSM.
    pub enum UltrasoundState {
        WaitStart,
        TriggerStart,
        WaitEchoStart,
        WaitEchoEnd,
        SetDistance,
    }
}

/// Distance in cm for an echo that rose at tick `init`, fell at tick `end`
/// and saw `overflows` counter wraps in between.
///
/// Computed in 64 bits so no intermediate product truncates; the result
/// saturates at `u32::MAX`.
pub fn distance_from_echo(init: u32, end: u32, overflows: u32) -> u32 {
    let elapsed = (u64::from(overflows) * ECHO_COUNTER_PERIOD + u64::from(end))
        .saturating_sub(u64::from(init));
    let distance = elapsed * SPEED_OF_SOUND_MS / 2 / UNIT_SCALE;
    u32::try_from(distance).unwrap_or(u32::MAX)
}

/// Median of `samples`: the middle element for odd lengths, the mean of
/// the two middle elements for even lengths. `None` when empty.
pub fn median(samples: &[u32]) -> Option<u32> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let sum = u64::from(sorted[mid - 1]) + u64::from(sorted[mid]);
        Some((sum / 2) as u32)
    } else {
        Some(sorted[mid])
    }
}

/// Data the ultrasound rules operate on.
pub struct UltrasoundContext<P> {
    port: P,
    ultrasound_id: u32,
    distance_cm: Cell<u32>,
    status: Cell<bool>,
    new_measurement: Cell<bool>,
    samples: Cell<[u32; NUM_MEASUREMENTS]>,
    sample_idx: Cell<usize>,
}

impl<P: UltrasoundPort> UltrasoundContext<P> {
    fn check_on(&self) -> bool {
        self.port.trigger_ready(self.ultrasound_id)
    }

    fn check_off(&self) -> bool {
        !self.status.get()
    }

    fn check_trigger_end(&self) -> bool {
        self.port.trigger_end(self.ultrasound_id)
    }

    // The rising edge may legitimately be captured at counter value 0.
    fn check_echo_init(&self) -> bool {
        self.port.echo_init_captured(self.ultrasound_id)
    }

    fn check_echo_received(&self) -> bool {
        self.port.echo_received(self.ultrasound_id)
    }

    fn check_new_measurement(&self) -> bool {
        self.port.trigger_ready(self.ultrasound_id)
    }

    fn do_start_measurement(&self) {
        self.port.start_measurement(self.ultrasound_id);
    }

    fn do_stop_trigger(&self) {
        self.port.stop_trigger_timer(self.ultrasound_id);
        self.port.take_trigger_end(self.ultrasound_id);
    }

    fn do_set_distance(&self) {
        let id = self.ultrasound_id;
        let distance = distance_from_echo(
            self.port.echo_init_tick(id),
            self.port.echo_end_tick(id),
            self.port.echo_overflows(id),
        );
        self.push_sample(distance);

        self.port.stop_echo_timer(id);
        self.port.reset_echo_ticks(id);
    }

    fn do_stop_measurement(&self) {
        self.port.stop(self.ultrasound_id);
        self.port.set_trigger_ready(self.ultrasound_id, false);
    }

    fn push_sample(&self, distance: u32) {
        let mut samples = self.samples.get();
        let idx = self.sample_idx.get();
        samples[idx] = distance;
        self.samples.set(samples);

        if idx == NUM_MEASUREMENTS - 1 {
            if let Some(m) = median(&samples) {
                self.distance_cm.set(m);
                self.new_measurement.set(true);
            }
        }
        self.sample_idx.set((idx + 1) % NUM_MEASUREMENTS);
    }
}

/// Ultrasound transceiver driven through an [`UltrasoundPort`].
pub struct FsmUltrasound<P> {
    machine: StateMachine<UltrasoundState, UltrasoundContext<P>>,
    context: UltrasoundContext<P>,
}

impl<P: UltrasoundPort> FsmUltrasound<P> {
    /// Create the FSM in `WaitStart`, inactive, and initialise the sensor.
    pub fn new(port: P, ultrasound_id: u32) -> Self {
        use UltrasoundState::*;

        let machine: StateMachine<UltrasoundState, UltrasoundContext<P>> =
            StateMachineBuilder::new()
                .named("ultrasound")
                .initial(WaitStart)
                .transitions(vec![
                    guarded_action(
                        WaitStart,
                        TriggerStart,
                        UltrasoundContext::check_on,
                        UltrasoundContext::do_start_measurement,
                    ),
                    guarded_action(
                        TriggerStart,
                        WaitEchoStart,
                        UltrasoundContext::check_trigger_end,
                        UltrasoundContext::do_stop_trigger,
                    ),
                    guarded_transition(
                        WaitEchoStart,
                        WaitEchoEnd,
                        UltrasoundContext::check_echo_init,
                    ),
                    guarded_action(
                        WaitEchoEnd,
                        SetDistance,
                        UltrasoundContext::check_echo_received,
                        UltrasoundContext::do_set_distance,
                    ),
                    guarded_action(
                        SetDistance,
                        WaitStart,
                        UltrasoundContext::check_off,
                        UltrasoundContext::do_stop_measurement,
                    ),
                    guarded_action(
                        SetDistance,
                        TriggerStart,
                        UltrasoundContext::check_new_measurement,
                        UltrasoundContext::do_start_measurement,
                    ),
                ])
                .build()
                .expect("ultrasound transition table is well-formed");

        port.init(ultrasound_id);

        Self {
            machine,
            context: UltrasoundContext {
                port,
                ultrasound_id,
                distance_cm: Cell::new(0),
                status: Cell::new(false),
                new_measurement: Cell::new(false),
                samples: Cell::new([0; NUM_MEASUREMENTS]),
                sample_idx: Cell::new(0),
            },
        }
    }

    /// Run one step of the ranging cycle.
    pub fn fire(&self) -> StepResult<UltrasoundState> {
        self.machine.fire(&self.context)
    }

    /// Last published median in cm. Reading consumes the new-measurement
    /// flag.
    pub fn get_distance(&self) -> u32 {
        self.context.new_measurement.set(false);
        self.context.distance_cm.get()
    }

    /// Start ranging from a clean slate.
    ///
    /// Clears the sample buffer and echo ticks, arms the trigger and starts
    /// the new-measurement timer. The machine is rewound to `WaitStart` so
    /// the first trigger is issued on the next fire.
    pub fn start(&self) {
        let ctx = &self.context;
        ctx.status.set(true);
        ctx.sample_idx.set(0);
        ctx.samples.set([0; NUM_MEASUREMENTS]);
        ctx.distance_cm.set(0);
        ctx.new_measurement.set(false);

        ctx.port.reset_echo_ticks(ctx.ultrasound_id);
        ctx.port.set_trigger_ready(ctx.ultrasound_id, true);
        ctx.port.start_new_measurement_timer();
        self.machine.set_state(UltrasoundState::WaitStart);
    }

    /// Halt all three timers, reset the echo ticks and disarm the trigger.
    pub fn stop(&self) {
        self.context.status.set(false);
        self.context.do_stop_measurement();
    }

    /// Whether the orchestrator has the sensor switched on.
    pub fn status(&self) -> bool {
        self.context.status.get()
    }

    pub fn set_status(&self, status: bool) {
        self.context.status.set(status);
    }

    /// Hardware trigger-ready flag.
    pub fn is_ready(&self) -> bool {
        self.context.port.trigger_ready(self.context.ultrasound_id)
    }

    pub fn new_measurement_ready(&self) -> bool {
        self.context.new_measurement.get()
    }

    /// Always false: every transition is interrupt-driven, so the loop never
    /// has to stay awake for this machine.
    pub fn check_activity(&self) -> bool {
        false
    }

    pub fn ultrasound_id(&self) -> u32 {
        self.context.ultrasound_id
    }

    pub fn state(&self) -> UltrasoundState {
        self.machine.current_state()
    }

    pub fn set_state(&self, state: UltrasoundState) {
        self.machine.set_state(state);
    }
}
