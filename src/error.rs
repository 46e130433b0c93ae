//! Error types for configuration.
//!
//! The simulation itself never fails: pick, place and movement outcomes are
//! plain `Option`s and `bool`s. Only building a warehouse from settings can.

use thiserror::Error;

/// Errors raised while validating or loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A dimension, speed or count that must be strictly positive is not.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// A value falls outside its allowed range.
    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: f32,
        /// Lower bound, inclusive.
        min: f32,
        /// Upper bound, inclusive.
        max: f32,
    },

    /// Settings that are individually valid but inconsistent together.
    #[error("Invalid {name}: {reason}")]
    Inconsistent {
        /// Setting name.
        name: &'static str,
        /// Why the combination is rejected.
        reason: String,
    },

    /// TOML parse failure.
    #[cfg(feature = "serde")]
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Checks that `value` is finite and strictly positive.
    pub fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NonPositive { name, value })
        }
    }

    /// Checks that `value` lies in `[min, max]`.
    pub fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
        if value >= min && value <= max {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                name,
                value,
                min,
                max,
            })
        }
    }
}
