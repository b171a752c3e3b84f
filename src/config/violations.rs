//! Configuration violations.

use thiserror::Error;

/// A single problem found while validating an [`UrbaniteConfig`].
///
/// [`UrbaniteConfig`]: crate::config::UrbaniteConfig
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("Debounce time must be greater than zero")]
    ZeroDebounce,

    #[error("Pause press time must be greater than zero")]
    ZeroPauseTime,

    #[error("Pause press time ({pause_ms} ms) must be below the on/off press time ({on_off_ms} ms)")]
    PauseNotBelowOnOff { pause_ms: u32, on_off_ms: u32 },

    #[error("Debounce time ({debounce_ms} ms) must be below the pause press time ({pause_ms} ms)")]
    DebounceNotBelowPause { debounce_ms: u32, pause_ms: u32 },
}
