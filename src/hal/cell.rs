//! Single-writer / single-reader cells for ISR to polling-loop hand-off.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Event flag raised by an interrupt handler and consumed by the loop.
///
/// `take` reads and clears in one atomic step, so an edge that lands while
/// the loop is consuming the previous one is never lost.
#[derive(Debug, Default)]
pub struct IsrFlag(AtomicBool);

impl IsrFlag {
    pub const fn new(value: bool) -> Self {
        Self(AtomicBool::new(value))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }

    /// Return the flag and clear it atomically.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Tick or count written from interrupt context.
#[derive(Debug, Default)]
pub struct IsrCounter(AtomicU32);

impl IsrCounter {
    pub const fn new(value: u32) -> Self {
        Self(AtomicU32::new(value))
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, value: u32) {
        self.0.store(value, Ordering::Release);
    }

    /// Add one, wrapping at `u32::MAX`. Returns the new value.
    pub fn increment(&self) -> u32 {
        self.0.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    /// Add `delta`, wrapping at `u32::MAX`. Returns the new value.
    pub fn advance(&self, delta: u32) -> u32 {
        self.0.fetch_add(delta, Ordering::AcqRel).wrapping_add(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_flag() {
        let flag = IsrFlag::new(true);

        assert!(flag.take());
        assert!(!flag.get());
        assert!(!flag.take());
    }

    #[test]
    fn set_and_get_round_trip() {
        let flag = IsrFlag::default();
        flag.set(true);
        assert!(flag.get());
        flag.set(false);
        assert!(!flag.get());
    }

    #[test]
    fn counter_wraps_on_increment() {
        let counter = IsrCounter::new(u32::MAX);

        assert_eq!(counter.increment(), 0);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn counter_advances_by_delta() {
        let counter = IsrCounter::new(10);

        assert_eq!(counter.advance(5), 15);
        counter.set(3);
        assert_eq!(counter.get(), 3);
    }
}
