//! Board preferences: confirmation delay and clock-confirmed moves.

use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

pub const MOVE_DELAY_ENV: &str = "LIBOARD_MOVE_DELAY_MS";
pub const CLOCK_MOVE_ENV: &str = "LIBOARD_CLOCK_MOVE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardConfig {
    /// How long an observation must stay unchanged before it is reconciled.
    pub move_delay: Duration,
    /// Reconcile only when the player presses the clock.
    pub clock_move: bool,
}

impl BoardConfig {
    /// Applies one named preference. `move-delay` takes milliseconds,
    /// `clock-move` takes `true` or `false`.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_owned(),
            value: value.to_owned(),
        };

        match name {
            "move-delay" => {
                let millis = value.trim().parse::<u64>().map_err(|_| invalid())?;
                self.move_delay = Duration::from_millis(millis);
            }
            "clock-move" => {
                self.clock_move = match value.trim() {
                    "true" | "1" | "on" => true,
                    "false" | "0" | "off" => false,
                    _ => return Err(invalid()),
                };
            }
            _ => return Err(ConfigError::UnknownOption(name.to_owned())),
        }
        Ok(())
    }

    /// Defaults overridden by `LIBOARD_MOVE_DELAY_MS` and `LIBOARD_CLOCK_MOVE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = env::var(MOVE_DELAY_ENV) {
            config.set_option("move-delay", &value)?;
        }
        if let Ok(value) = env::var(CLOCK_MOVE_ENV) {
            config.set_option("clock-move", &value)?;
        }
        Ok(config)
    }
}
