//! Error types for the qfmatch engine.
//!
//! All errors use the `QF_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input / argument errors
//! - 5xx: Matching errors
//! - 9xx: General / configuration errors
//!
//! Every error aborts the whole invocation. There are no partial results.

use thiserror::Error;

use crate::Amount;

/// Central error enum for all qfmatch operations.
#[derive(Debug, Error)]
pub enum QfError {
    // =================================================================
    // Input Errors (1xx)
    // =================================================================
    /// An argument violated the engine contract (negative amount, bad precision, ...).
    #[error("QF_ERR_100: Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A decimal value could not be converted to or from fixed-point units.
    #[error("QF_ERR_101: Unit conversion failed: {reason}")]
    UnitConversion { reason: String },

    // =================================================================
    // Matching Errors (5xx)
    // =================================================================
    /// Two independently accumulated sums disagree. Indicates an engine bug.
    #[error("QF_ERR_500: Arithmetic inconsistency: {reason}")]
    ArithmeticInconsistency { reason: String },

    /// Cap overflow plus the amount already distributed would exceed the pool.
    #[error(
        "QF_ERR_501: Cap overflow exceeds pool: overflow {overflow} + distributed {distributed} > pool {pool}"
    )]
    OverflowExceedsPool {
        overflow: Amount,
        distributed: Amount,
        pool: Amount,
    },

    /// Cap redistribution did not converge within its pass bound.
    #[error("QF_ERR_502: Cap redistribution did not converge after {passes} passes")]
    RedistributionDiverged { passes: usize },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Configuration error (invalid round config, missing fields, etc.).
    #[error("QF_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl QfError {
    /// Shorthand for [`QfError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, QfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = QfError::invalid("negative amount");
        let msg = format!("{err}");
        assert!(msg.starts_with("QF_ERR_100"), "Got: {msg}");
        assert!(msg.contains("negative amount"));
    }

    #[test]
    fn overflow_exceeds_pool_display() {
        let err = QfError::OverflowExceedsPool {
            overflow: Amount::from(70),
            distributed: Amount::from(50),
            pool: Amount::from(100),
        };
        let msg = format!("{err}");
        assert!(msg.contains("QF_ERR_501"));
        assert!(msg.contains("70"));
        assert!(msg.contains("50"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn all_errors_have_qf_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(QfError::invalid("x")),
            Box::new(QfError::UnitConversion { reason: "x".into() }),
            Box::new(QfError::ArithmeticInconsistency { reason: "x".into() }),
            Box::new(QfError::RedistributionDiverged { passes: 4 }),
            Box::new(QfError::Configuration("x".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("QF_ERR_"),
                "Error missing QF_ERR_ prefix: {msg}"
            );
        }
    }
}
