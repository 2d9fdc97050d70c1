//! Error types for the simulation core.
//!
//! Invalid input is rejected before any force evaluation. Integration failures
//! are recoverable and reported separately so a caller can retry with relaxed
//! tolerances or a shorter span. Non-finite values produced by close encounters
//! are *not* errors; they flow through the trajectory and the classifier.

use thiserror::Error;

use crate::simulation::integrator::SolverError;

/// Result type alias for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// A parameter fell outside its declared range.
    #[error("invalid parameter `{name}` = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: String,
    },

    /// The adaptive solver could not finish the run.
    #[error("simulation failed: {0}")]
    Solver(#[from] SolverError),

    #[error("scenario parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn invalid(name: &'static str, value: f64, expected: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            value,
            expected: expected.into(),
        }
    }
}

/// Reject `value` unless it lies in the closed interval `[lo, hi]`.
/// NaN never passes.
pub fn check_range(name: &'static str, value: f64, lo: f64, hi: f64) -> SimResult<()> {
    if value >= lo && value <= hi {
        Ok(())
    } else {
        Err(SimError::invalid(name, value, format!("a value in [{lo}, {hi}]")))
    }
}

/// Reject `value` unless it is finite and strictly positive.
pub fn check_positive(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, value, "a finite value > 0"))
    }
}
