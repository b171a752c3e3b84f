//! Urbanite: table-driven state machines for an ultrasound parking assistant
//!
//! A button switches the system on and off and pauses the display, an
//! ultrasound transceiver measures the distance to the nearest obstacle and
//! an RGB light shows that distance as a color band.
//!
//! # Core Concepts
//!
//! - **Engine**: each FSM is a [`StateMachine`] over an ordered rule table of
//!   `(from, guard, to, action)` records; the first matching rule wins
//! - **HAL**: the FSMs only talk to hardware through the port traits in
//!   [`hal`], whose interrupt-written fields are atomic hand-off cells
//! - **Orchestrator**: [`FsmUrbanite`] borrows the other three FSMs and
//!   decides power state, display pause and when the board may sleep
//!
//! # Example
//!
//! ```rust
//! use urbanite::config::UrbaniteConfig;
//! use urbanite::fsm::UrbaniteState;
//! use urbanite::hal::sim::SimBoard;
//!
//! let board = SimBoard::new();
//! let config = UrbaniteConfig::default();
//!
//! let button = config.button(&board);
//! let ultrasound = config.ultrasound(&board);
//! let display = config.display(&board);
//! let urbanite = config.urbanite(&button, &ultrasound, &display, &board);
//!
//! // Hold the button for 1.2 s.
//! board.press();
//! urbanite.poll();
//! board.advance_millis(1200);
//! urbanite.poll();
//! board.release();
//! urbanite.poll();
//!
//! assert_eq!(urbanite.state(), UrbaniteState::Measure);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod fsm;
pub mod hal;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use config::{ConfigError, ConfigViolation, UrbaniteConfig};
pub use core::{Guard, State};
pub use engine::{StateMachine, StepResult, Transition};
pub use fsm::{FsmButton, FsmDisplay, FsmUltrasound, FsmUrbanite};
pub use hal::RgbColor;
