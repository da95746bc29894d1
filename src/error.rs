use thiserror::Error;

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, DqnError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum DqnError {
    /// A state, batch or parameter set has the wrong shape
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Action index outside `[0, action_size)`
    #[error("Invalid action {action}: must be less than {action_size}")]
    InvalidAction {
        action: usize,
        action_size: usize,
    },

    /// More records requested than the replay store holds
    #[error("Insufficient data: requested {requested} experiences, buffer holds {available}")]
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Estimator misuse, e.g. backward without a recorded forward pass
    #[error("Estimator error: {0}")]
    EstimatorError(String),

    /// A shared buffer lock was poisoned by a panicking writer
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// Config serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper functions for common error patterns
impl DqnError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DqnError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DqnError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
