//! Error types for Strata layout operations.
//!
//! [`StrataError`] is returned by every fallible layout call. Parameter
//! validation failures are reported separately as [`ConfigError`] so that
//! setters can reject a value without touching the engine.

use thiserror::Error;

/// The main error type for layout operations.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A post-condition of a layout phase did not hold.
    ///
    /// This points at a defect in the algorithm or at a graph model whose
    /// containment answers contradict its enumeration answers. It is never
    /// produced for well-formed input.
    #[error("Internal consistency error: {0}")]
    Consistency(String),
}

impl StrataError {
    /// Create a new `Consistency` error.
    pub fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency(message.into())
    }
}

/// An out-of-range engine parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sparseness must be a finite value >= 1.0, got {0}")]
    Sparseness(f32),

    #[error("cooling factor must be in (0, 1], got {0}")]
    CoolingFactor(f32),

    #[error("iteration count must be at least 1")]
    IterationCount,

    #[error("move count must be at least 1")]
    MoveCount,

    #[error("unknown orientation `{0}`, expected `vertical` or `horizontal`")]
    Orientation(String),

    #[error("unknown layout engine `{0}`, expected `level` or `annealing`")]
    Engine(String),

    #[error("cost weight `{name}` must be finite and non-negative, got {value}")]
    Weight { name: &'static str, value: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: StrataError = ConfigError::MoveCount.into();
        assert!(matches!(err, StrataError::Config(ConfigError::MoveCount)));
        assert_eq!(
            err.to_string(),
            "Configuration error: move count must be at least 1"
        );
    }

    #[test]
    fn test_messages_carry_values() {
        assert_eq!(
            ConfigError::CoolingFactor(1.5).to_string(),
            "cooling factor must be in (0, 1], got 1.5"
        );
        assert_eq!(
            ConfigError::Weight {
                name: "elbow",
                value: -1.0
            }
            .to_string(),
            "cost weight `elbow` must be finite and non-negative, got -1"
        );
        assert_eq!(
            StrataError::consistency("level bucket 2 is empty").to_string(),
            "Internal consistency error: level bucket 2 is empty"
        );
    }
}
