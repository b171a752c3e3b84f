//! The four parking-assistance state machines.
//!
//! Every FSM keeps its data in `Cell`s and fires through `&self`, so the
//! orchestrator can hold plain shared references to its siblings while the
//! main loop keeps firing them.

pub mod button;
pub mod display;
pub mod ultrasound;
pub mod urbanite;

pub use button::{ButtonState, FsmButton};
pub use display::{DisplayState, DistanceBand, FsmDisplay};
pub use ultrasound::{FsmUltrasound, UltrasoundState};
pub use urbanite::{FsmUrbanite, UrbaniteState};

/// Whether the millisecond clock has reached `deadline`.
///
/// Correct across one wrap of the 32-bit clock as long as the deadline is
/// less than `i32::MAX` ms away.
pub(crate) fn deadline_reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_in_future_is_not_reached() {
        assert!(!deadline_reached(100, 250));
    }

    #[test]
    fn deadline_reached_at_and_after() {
        assert!(deadline_reached(250, 250));
        assert!(deadline_reached(251, 250));
    }

    #[test]
    fn deadline_across_wrap() {
        let deadline = 40u32;
        assert!(!deadline_reached(u32::MAX - 10, deadline));
        assert!(deadline_reached(41, deadline));
    }
}
