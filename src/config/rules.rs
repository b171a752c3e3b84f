//! Validation rules for [`UrbaniteConfig`], accumulating every violation.

use crate::config::violations::ConfigViolation;
use crate::config::UrbaniteConfig;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn ensure(ok: bool, violation: ConfigViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation)
    }
}

impl UrbaniteConfig {
    /// Check the press thresholds, reporting ALL problems at once.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks = vec![
            ensure(self.debounce_time_ms > 0, ConfigViolation::ZeroDebounce),
            ensure(self.pause_display_time_ms > 0, ConfigViolation::ZeroPauseTime),
            ensure(
                self.pause_display_time_ms < self.on_off_press_time_ms,
                ConfigViolation::PauseNotBelowOnOff {
                    pause_ms: self.pause_display_time_ms,
                    on_off_ms: self.on_off_press_time_ms,
                },
            ),
            ensure(
                self.debounce_time_ms < self.pause_display_time_ms,
                ConfigViolation::DebounceNotBelowPause {
                    debounce_ms: self.debounce_time_ms,
                    pause_ms: self.pause_display_time_ms,
                },
            ),
        ];

        Validation::all_vec(checks).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(UrbaniteConfig::default().validate().is_success());
    }

    #[test]
    fn accumulates_all_violations() {
        let config = UrbaniteConfig {
            debounce_time_ms: 0,
            pause_display_time_ms: 0,
            on_off_press_time_ms: 0,
            ..UrbaniteConfig::default()
        };

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 4);
                assert!(errors.iter().any(|e| *e == ConfigViolation::ZeroDebounce));
                assert!(errors.iter().any(|e| *e == ConfigViolation::ZeroPauseTime));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::PauseNotBelowOnOff { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::DebounceNotBelowPause { .. })));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn pause_must_stay_below_on_off() {
        let config = UrbaniteConfig {
            on_off_press_time_ms: 500,
            pause_display_time_ms: 500,
            ..UrbaniteConfig::default()
        };

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.iter().any(|e| *e
                    == ConfigViolation::PauseNotBelowOnOff {
                        pause_ms: 500,
                        on_off_ms: 500,
                    }));
            }
            Validation::Success(_) => panic!("Expected failure, got success"),
        }
    }

    #[test]
    fn debounce_must_stay_below_pause() {
        let config = UrbaniteConfig {
            debounce_time_ms: 600,
            ..UrbaniteConfig::default()
        };

        assert!(config.validate().is_failure());
    }
}
