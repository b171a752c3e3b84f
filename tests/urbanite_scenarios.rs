//! End-to-end scenarios: the four FSMs on a simulated board whose timers
//! and echo pin are driven by a tiny hardware model.

use std::cell::Cell;
use urbanite::config::UrbaniteConfig;
use urbanite::engine::StepResult;
use urbanite::fsm::{FsmDisplay, FsmUltrasound, FsmUrbanite, UrbaniteState};
use urbanite::hal::sim::SimBoard;
use urbanite::hal::{RgbColor, UltrasoundPort};

/// Echo lengths in timer ticks for a few obstacle distances.
const TICKS_10_CM: u32 = 600;
const TICKS_100_CM: u32 = 5_831;
const TICKS_300_CM: u32 = 17_493;

/// Milliseconds of simulated time per loop iteration.
const STEP_MS: u32 = 10;

type SimUrbanite<'a> = FsmUrbanite<'a, &'a SimBoard, &'a SimBoard, &'a SimBoard, &'a SimBoard>;

struct Rig<'a> {
    board: &'a SimBoard,
    ultrasound: &'a FsmUltrasound<&'a SimBoard>,
    display: &'a FsmDisplay<&'a SimBoard>,
    urbanite: SimUrbanite<'a>,
    echo_ticks: Cell<u32>,
}

impl Rig<'_> {
    /// Let the hardware react to whatever the FSMs started, then run one
    /// main-loop iteration.
    fn step(&self) -> StepResult<UrbaniteState> {
        let board = self.board;
        board.advance_millis(STEP_MS);

        if board.trigger_timer_running() {
            board.trigger_timer_elapsed();
        } else if board.echo_timer_running() && !board.echo_received(0) {
            board.echo(1, 1 + self.echo_ticks.get(), 0);
        } else if board.new_measurement_timer_running() {
            board.new_measurement_timer_elapsed();
        }

        self.urbanite.poll()
    }

    fn run(&self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    fn run_until(&self, max_steps: usize, done: impl Fn(&Self) -> bool) -> bool {
        for _ in 0..max_steps {
            self.step();
            if done(self) {
                return true;
            }
        }
        false
    }

    fn hold(&self, ms: u32) {
        self.board.press();
        self.run((ms / STEP_MS) as usize + 1);
        self.board.release();
        self.run(20);
    }
}

fn with_rig(test: impl FnOnce(&Rig<'_>)) {
    let board = SimBoard::new();
    let config = UrbaniteConfig::default();

    let button = config.button(&board);
    let ultrasound = config.ultrasound(&board);
    let display = config.display(&board);
    let urbanite = config.urbanite(&button, &ultrasound, &display, &board);

    let rig = Rig {
        board: &board,
        ultrasound: &ultrasound,
        display: &display,
        urbanite,
        echo_ticks: Cell::new(TICKS_100_CM),
    };
    test(&rig);
}

#[test]
fn idle_system_sleeps_while_off() {
    with_rig(|rig| {
        rig.run(5);

        assert_eq!(rig.urbanite.state(), UrbaniteState::SleepWhileOff);
        assert_eq!(rig.board.sleep_count(), 5);
        assert_eq!(rig.board.measurements_started(), 0);
    });
}

#[test]
fn long_press_turns_on_exactly_once() {
    with_rig(|rig| {
        rig.board.press();
        rig.run(111);
        rig.board.release();

        let mut turned_on = 0;
        for _ in 0..20 {
            if let StepResult::Transitioned {
                from: UrbaniteState::Off,
                to: UrbaniteState::Measure,
            } = rig.step()
            {
                turned_on += 1;
            }
        }

        assert_eq!(turned_on, 1);
        assert!(rig.ultrasound.status());
        assert!(rig.display.status());
        assert!(rig.board.measurements_started() >= 1);
    });
}

#[test]
fn measured_distance_reaches_the_display() {
    with_rig(|rig| {
        rig.hold(1200);

        let rendered = rig.run_until(200, |r| r.board.last_rgb() == Some(RgbColor::GREEN));

        assert!(rendered, "display never showed the 100 cm band");
        assert_eq!(rig.display.distance(), 100);
    });
}

#[test]
fn second_long_press_turns_off() {
    with_rig(|rig| {
        rig.hold(1200);
        rig.run(100);

        rig.hold(1200);
        rig.run(5);

        assert!(matches!(
            rig.urbanite.state(),
            UrbaniteState::Off | UrbaniteState::SleepWhileOff
        ));
        assert!(!rig.ultrasound.status());
        assert!(!rig.display.status());
        assert!(!rig.board.trigger_timer_running());
        assert!(!rig.board.echo_timer_running());
        assert!(!rig.board.new_measurement_timer_running());
        assert_eq!(rig.board.echo_init_tick(0), 0);
        assert_eq!(rig.board.last_rgb(), Some(RgbColor::OFF));

        let started = rig.board.measurements_started();
        rig.run(50);
        assert_eq!(rig.board.measurements_started(), started);
    });
}

#[test]
fn sleeps_while_on_and_wakes_on_new_measurement() {
    with_rig(|rig| {
        rig.hold(1200);

        let asleep = rig.run_until(200, |r| r.urbanite.state() == UrbaniteState::SleepWhileOn);
        assert!(asleep, "system never went to sleep while measuring");

        let mut woke = false;
        for _ in 0..200 {
            let ready_before = rig.ultrasound.new_measurement_ready();
            let sleeps_before = rig.board.sleep_count();
            let step = rig.step();

            if rig.urbanite.state() == UrbaniteState::SleepWhileOn {
                assert_eq!(rig.board.sleep_count(), sleeps_before + 1);
                continue;
            }

            assert!(!ready_before);
            assert_eq!(
                step,
                StepResult::Transitioned {
                    from: UrbaniteState::SleepWhileOn,
                    to: UrbaniteState::Measure,
                }
            );
            assert!(rig.ultrasound.new_measurement_ready());
            woke = true;
            break;
        }
        assert!(woke, "system never woke for a new measurement");
    });
}

#[test]
fn pause_hides_far_obstacles_but_not_near_ones() {
    with_rig(|rig| {
        rig.echo_ticks.set(TICKS_300_CM);
        rig.hold(1200);
        rig.run(100);

        rig.hold(700);
        assert!(rig.urbanite.is_paused());
        assert!(!rig.display.status());

        rig.run(100);
        assert!(!rig.display.status());
        assert_eq!(rig.board.last_rgb(), Some(RgbColor::OFF));

        rig.echo_ticks.set(TICKS_10_CM);
        let warned = rig.run_until(300, |r| r.board.last_rgb() == Some(RgbColor::RED));

        assert!(warned, "near obstacle did not break through the pause");
        assert!(rig.urbanite.is_paused());
        assert!(rig.display.status());
    });
}

#[test]
fn resume_after_pause_shows_distance_again() {
    with_rig(|rig| {
        rig.hold(1200);
        rig.run(100);

        rig.hold(700);
        assert!(rig.urbanite.is_paused());
        rig.run(50);

        rig.hold(700);
        assert!(!rig.urbanite.is_paused());

        let shown = rig.run_until(200, |r| r.board.last_rgb() == Some(RgbColor::GREEN));
        assert!(shown);
        assert!(rig.display.status());
    });
}

#[test]
fn turning_off_clears_pause() {
    with_rig(|rig| {
        rig.hold(1200);
        rig.run(100);
        rig.hold(700);
        assert!(rig.urbanite.is_paused());

        rig.hold(1200);

        assert!(!rig.urbanite.is_paused());
    });
}
