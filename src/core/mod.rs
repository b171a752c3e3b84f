//! Core state machine types.
//!
//! This module contains the data-free building blocks shared by every FSM:
//! - State definitions via the `State` trait
//! - Guard predicates over an FSM's context

mod guard;
mod state;

pub use guard::Guard;
pub use state::State;
