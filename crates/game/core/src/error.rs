//! Error types for hive-core.
//!
//! Gameplay results (misses, empty hive, deaths) are values in
//! [`crate::outcome`]; the only failure this crate reports is a configuration
//! that cannot describe a playable session.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("player health must be greater than 0")]
    ZeroPlayerHealth,

    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
}
