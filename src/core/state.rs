//! Core State trait for state machine states.
//!
//! Every FSM in this crate declares its states as a small `Copy` enum
//! implementing this trait. The engine only ever stores values of that
//! enum, so the current state is always a member of the declared set.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// States are plain values: comparing them is how the dispatcher finds the
/// rules that apply to the current state, and their names are what the
/// transition log prints.
///
/// # Required Traits
///
/// - `Copy`: states are stored and handed out by value
/// - `PartialEq`: rules are selected by comparing origin states
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states can be reported over a debug link
///
/// There are no terminal states. Machines built on this trait run for as
/// long as the polling loop keeps firing them.
///
/// # Example
///
/// ```rust
/// use urbanite::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
/// enum LampState {
///     Off,
///     On,
/// }
///
/// impl State for LampState {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// assert_eq!(LampState::On.name(), "On");
/// ```
pub trait State:
    Copy + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &'static str;
}
