//! Table-driven dispatcher shared by every FSM in the crate.
//!
//! A machine owns an ordered list of rules `(origin, guard, destination,
//! action)` and a current state. Firing it scans the list from the top and
//! takes the first rule whose origin matches and whose guard holds.
//!
//! # Key Concepts
//!
//! - **Transitions**: a rule record with a guard and an optional action
//! - **State Machine**: holds the current state and runs one rule per `fire`
//! - **Context**: the FSM's own data, passed by reference into guards and
//!   actions; the machine itself holds no domain data
//!
//! Machines are fired through `&self`: the current state lives in a `Cell`,
//! and FSM contexts keep their mutable fields in cells too. This lets an
//! orchestrating FSM hold plain shared references to the machines it
//! coordinates while the polling loop keeps firing them.

mod machine;
mod transition;

pub use machine::{StateMachine, StepResult};
pub use transition::{Action, Transition};
