//! Error types for curve construction.
//!
//! Every variant is fatal to the curve build that raised it. Batch builds
//! isolate failures per curve, see [`crate::resolver::BatchOutcome`].

use parcurve_core::{CoreError, Currency, Date};
use parcurve_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Missing or malformed convention, quote or instrument id.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Description of the problem.
        reason: String,
    },

    /// The currency has no index mapping of the required kind.
    #[error("Unsupported currency {currency}: no {index} index")]
    UnsupportedCurrency {
        /// The currency that was looked up.
        currency: Currency,
        /// Kind of index requested ("term" or "overnight").
        index: &'static str,
    },

    /// Invalid schedule parameters.
    #[error("Schedule configuration error: {reason}")]
    ScheduleConfiguration {
        /// Description of the problem.
        reason: String,
    },

    /// The root search could not solve a node.
    #[error("Bootstrap failed to converge for {instrument}: {reason}")]
    BootstrapNonConvergence {
        /// Id of the instrument being solved.
        instrument: String,
        /// Underlying solver failure.
        reason: String,
    },

    /// Two instruments share a maturity, or a maturity is not after the previous one.
    #[error("Non-monotone maturity: {instrument} ({maturity}) does not follow {previous}")]
    NonMonotoneMaturity {
        /// Id of the preceding instrument.
        previous: String,
        /// Id of the offending instrument.
        instrument: String,
        /// Maturity of the offending instrument.
        maturity: Date,
    },

    /// Curves depend on each other's discounting.
    #[error("Cyclic curve dependency: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// Curve names along the cycle.
        cycle: Vec<String>,
    },

    /// A curve query produced no meaningful value.
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of the problem.
        reason: String,
    },
}

impl CurveError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates an unsupported currency error.
    #[must_use]
    pub fn unsupported_currency(currency: Currency, index: &'static str) -> Self {
        Self::UnsupportedCurrency { currency, index }
    }

    /// Creates a schedule configuration error.
    #[must_use]
    pub fn schedule_configuration(reason: impl Into<String>) -> Self {
        Self::ScheduleConfiguration {
            reason: reason.into(),
        }
    }

    /// Creates a non-convergence error for `instrument`.
    #[must_use]
    pub fn non_convergence(instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BootstrapNonConvergence {
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a solver failure with the instrument being solved.
    #[must_use]
    pub fn from_solver(instrument: impl Into<String>, err: &MathError) -> Self {
        Self::non_convergence(instrument, err.to_string())
    }

    /// Creates a non-monotone maturity error.
    #[must_use]
    pub fn non_monotone(
        previous: impl Into<String>,
        instrument: impl Into<String>,
        maturity: Date,
    ) -> Self {
        Self::NonMonotoneMaturity {
            previous: previous.into(),
            instrument: instrument.into(),
            maturity,
        }
    }

    /// Creates a cyclic dependency error.
    #[must_use]
    pub fn cyclic(cycle: Vec<String>) -> Self {
        Self::CyclicDependency { cycle }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}

impl From<CoreError> for CurveError {
    fn from(err: CoreError) -> Self {
        Self::configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::unsupported_currency(Currency::BRL, "overnight");
        assert_eq!(err.to_string(), "Unsupported currency BRL: no overnight index");

        let err = CurveError::cyclic(vec!["A".into(), "B".into(), "A".into()]);
        assert_eq!(err.to_string(), "Cyclic curve dependency: A -> B -> A");
    }

    #[test]
    fn test_core_error_is_configuration() {
        let core = CoreError::unknown_convention("day count", "Act999");
        let err: CurveError = core.into();
        assert!(matches!(err, CurveError::Configuration { .. }));
        assert!(err.to_string().contains("Act999"));
    }

    #[test]
    fn test_solver_error_context() {
        let math = MathError::bracket_not_found(1e-8, 2.0, 64);
        let err = CurveError::from_solver("swaps_10YR", &math);
        match err {
            CurveError::BootstrapNonConvergence { instrument, reason } => {
                assert_eq!(instrument, "swaps_10YR");
                assert!(reason.contains("No sign change"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
