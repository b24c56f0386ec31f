//! Runtime configuration read from the environment.

use std::time::Duration;

/// Environment variable overriding the evaluation quiet period, in milliseconds.
pub const DEBOUNCE_ENV: &str = "PWD_DEBOUNCE_MS";

/// Quiet period used when `PWD_DEBOUNCE_MS` is unset or invalid.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Idle time after the last password change before it is scored.
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            debounce: get_debounce_period(),
        }
    }
}

/// Returns the quiet period from `PWD_DEBOUNCE_MS`, or the default.
pub fn get_debounce_period() -> Duration {
    match std::env::var(DEBOUNCE_ENV) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("ignoring invalid {}={:?}", DEBOUNCE_ENV, raw);
                DEFAULT_DEBOUNCE
            }
        },
        Err(_) => DEFAULT_DEBOUNCE,
    }
}
