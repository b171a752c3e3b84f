//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders, rule helpers and a macro for
//! writing transition tables with minimal boilerplate. A table is written
//! once, in priority order, when an FSM is constructed.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::State;
use crate::engine::{Action, Transition};

/// Create a guarded transition with no action.
///
/// # Example
///
/// ```
/// use urbanite::builder::guarded_transition;
/// use urbanite::state_enum;
///
/// state_enum! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// struct Sensor {
///     open: bool,
/// }
///
/// let transition = guarded_transition(Door::Closed, Door::Open, |s: &Sensor| s.open);
/// assert!(transition.can_execute(&Door::Closed, &Sensor { open: true }));
/// ```
pub fn guarded_transition<S, C>(from: S, to: S, guard: fn(&C) -> bool) -> Transition<S, C>
where
    S: State,
{
    TransitionBuilder::new()
        .from(from)
        .to(to)
        .when(guard)
        .build()
        .expect("Guarded transition should always build")
}

/// Create a guarded transition that runs `action` when it fires.
///
/// # Example
///
/// ```
/// use urbanite::builder::guarded_action;
/// use urbanite::state_enum;
/// use std::cell::Cell;
///
/// state_enum! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// struct Sensor {
///     open: bool,
///     openings: Cell<u32>,
/// }
///
/// let transition = guarded_action(
///     Door::Closed,
///     Door::Open,
///     |s: &Sensor| s.open,
///     |s: &Sensor| s.openings.set(s.openings.get() + 1),
/// );
/// assert!(transition.action.is_some());
/// ```
pub fn guarded_action<S, C>(
    from: S,
    to: S,
    guard: fn(&C) -> bool,
    action: Action<C>,
) -> Transition<S, C>
where
    S: State,
{
    TransitionBuilder::new()
        .from(from)
        .to(to)
        .when(guard)
        .then(action)
        .build()
        .expect("Guarded action should always build")
}
