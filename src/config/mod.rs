//! Board configuration: hardware identifiers and press thresholds.
//!
//! Values are plain data loaded from JSON. Validation uses Stillwater's
//! `Validation` so every problem is reported in one pass instead of one at a
//! time.
//!
//! # Example
//!
//! ```rust
//! use urbanite::config::UrbaniteConfig;
//!
//! let config = UrbaniteConfig::from_json(r#"{ "on_off_press_time_ms": 1500 }"#).unwrap();
//! assert_eq!(config.on_off_press_time_ms, 1500);
//! assert_eq!(config.debounce_time_ms, 150);
//! ```

pub mod error;
pub mod rules;
pub mod violations;

pub use error::ConfigError;
pub use violations::ConfigViolation;

use crate::fsm::{FsmButton, FsmDisplay, FsmUltrasound, FsmUrbanite};
use crate::hal::{ButtonPort, DisplayPort, SystemPort, UltrasoundPort};
use log::warn;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;

/// Identifiers and thresholds for one Urbanite board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrbaniteConfig {
    pub button_id: u32,
    pub debounce_time_ms: u32,
    pub ultrasound_id: u32,
    pub display_id: u32,
    /// Presses strictly longer than this toggle power.
    pub on_off_press_time_ms: u32,
    /// Presses strictly longer than this, and not longer than the on/off
    /// time, toggle the display pause.
    pub pause_display_time_ms: u32,
}

impl Default for UrbaniteConfig {
    fn default() -> Self {
        Self {
            button_id: 0,
            debounce_time_ms: 150,
            ultrasound_id: 0,
            display_id: 0,
            on_off_press_time_ms: 1000,
            pause_display_time_ms: 500,
        }
    }
}

impl UrbaniteConfig {
    /// Parse and validate a JSON document. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.checked()
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `self` if valid, otherwise every violation found.
    pub fn checked(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(()) => Ok(self),
            Validation::Failure(errors) => {
                let violations: Vec<ConfigViolation> = errors.iter().cloned().collect();
                for violation in &violations {
                    warn!("Rejected configuration: {}", violation);
                }
                Err(ConfigError::Invalid(violations))
            }
        }
    }

    pub fn button<P: ButtonPort + SystemPort>(&self, port: P) -> FsmButton<P> {
        FsmButton::new(port, self.debounce_time_ms, self.button_id)
    }

    pub fn ultrasound<P: UltrasoundPort>(&self, port: P) -> FsmUltrasound<P> {
        FsmUltrasound::new(port, self.ultrasound_id)
    }

    pub fn display<P: DisplayPort>(&self, port: P) -> FsmDisplay<P> {
        FsmDisplay::new(port, self.display_id)
    }

    /// Orchestrator over sub-FSMs owned by the caller, using this
    /// configuration's press thresholds.
    pub fn urbanite<'a, B, U, D, Sys>(
        &self,
        button: &'a FsmButton<B>,
        ultrasound: &'a FsmUltrasound<U>,
        display: &'a FsmDisplay<D>,
        system: Sys,
    ) -> FsmUrbanite<'a, B, U, D, Sys>
    where
        B: ButtonPort + SystemPort,
        U: UltrasoundPort,
        D: DisplayPort,
        Sys: SystemPort,
    {
        FsmUrbanite::new(
            button,
            self.on_off_press_time_ms,
            self.pause_display_time_ms,
            ultrasound,
            display,
            system,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::sim::SimBoard;

    #[test]
    fn empty_document_gives_defaults() {
        let config = UrbaniteConfig::from_json("{}").unwrap();
        assert_eq!(config, UrbaniteConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config =
            UrbaniteConfig::from_json(r#"{ "display_id": 2, "pause_display_time_ms": 400 }"#)
                .unwrap();

        assert_eq!(config.display_id, 2);
        assert_eq!(config.pause_display_time_ms, 400);
        assert_eq!(config.on_off_press_time_ms, 1000);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = UrbaniteConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn invalid_values_are_all_reported() {
        let result = UrbaniteConfig::from_json(
            r#"{ "debounce_time_ms": 0, "pause_display_time_ms": 2000 }"#,
        );

        match result {
            Err(ConfigError::Invalid(violations)) => {
                assert_eq!(
                    violations,
                    vec![
                        ConfigViolation::ZeroDebounce,
                        ConfigViolation::PauseNotBelowOnOff {
                            pause_ms: 2000,
                            on_off_ms: 1000,
                        },
                    ]
                );
            }
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn json_round_trip() {
        let config = UrbaniteConfig {
            ultrasound_id: 1,
            ..UrbaniteConfig::default()
        };

        let json = config.to_json().unwrap();
        assert_eq!(UrbaniteConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn error_message_lists_violations() {
        let err = UrbaniteConfig {
            debounce_time_ms: 0,
            ..UrbaniteConfig::default()
        }
        .checked()
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid configuration: Debounce time must be greater than zero"
        );
    }

    #[test]
    fn builds_fsms_from_config() {
        let board = SimBoard::new();
        let config = UrbaniteConfig {
            debounce_time_ms: 80,
            on_off_press_time_ms: 2000,
            display_id: 3,
            ..UrbaniteConfig::default()
        };

        let button = config.button(&board);
        let ultrasound = config.ultrasound(&board);
        let display = config.display(&board);
        let urbanite = config.urbanite(&button, &ultrasound, &display, &board);

        assert_eq!(button.debounce_time_ms(), 80);
        assert_eq!(display.display_id(), 3);
        assert_eq!(urbanite.on_off_press_time_ms(), 2000);
        assert_eq!(urbanite.pause_display_time_ms(), 500);
    }
}
