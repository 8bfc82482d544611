//! Repricing validation for curve bootstrap.
//!
//! Every bootstrapped curve is checked against the instruments it was built
//! from: each instrument's rate implied by the finished curve must match its
//! quote within tolerance.
//!
//! # Key Principle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    MARKET OBSERVABLE RULE                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  If you can't reprice every input instrument within         │
//! │  tolerance, YOUR CURVE IS WRONG.                            │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let result = BootstrapSolver::new(config).bootstrap_validated(&setup, instruments)?;
//!
//! if !result.is_valid() {
//!     eprintln!("Failed instruments: {:?}", result.failed_instruments());
//! }
//! let curve = result.into_curve()?;
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::{CurveError, CurveResult};
use crate::instruments::{CalibrationInstrument, InstrumentType};
use crate::traits::Curve;

/// Default repricing tolerance, in rate terms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Result of repricing a single instrument against the curve.
#[derive(Debug, Clone)]
pub struct RepricingCheck {
    /// Instrument id (e.g., `swaps_5YR`)
    pub instrument_id: String,

    /// Type of instrument
    pub instrument_type: InstrumentType,

    /// Quoted rate
    pub quoted_rate: f64,

    /// Rate implied by the curve
    pub model_rate: f64,

    /// Absolute error |model_rate - quoted_rate|
    pub error: f64,

    /// Tolerance applied
    pub tolerance: f64,

    /// Whether this instrument passed validation
    pub passed: bool,
}

impl RepricingCheck {
    /// Creates a new repricing check result.
    #[must_use]
    pub fn new(
        instrument_id: impl Into<String>,
        instrument_type: InstrumentType,
        quoted_rate: f64,
        model_rate: f64,
        tolerance: f64,
    ) -> Self {
        let error = (model_rate - quoted_rate).abs();
        // NaN errors fail.
        let passed = error <= tolerance;

        Self {
            instrument_id: instrument_id.into(),
            instrument_type,
            quoted_rate,
            model_rate,
            error,
            tolerance,
            passed,
        }
    }

    /// Reprices `instrument` on `curve`.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn from_instrument(
        instrument: &CalibrationInstrument,
        curve: &dyn Curve,
        tolerance: f64,
    ) -> CurveResult<Self> {
        let model_rate = instrument.implied_rate(curve)?;

        Ok(Self::new(
            instrument.id(),
            instrument.instrument_type(),
            instrument.quoted_rate(),
            model_rate,
            tolerance,
        ))
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "✓" } else { "✗" };
        write!(
            f,
            "{} {} ({}) | quote: {:.6}% | model: {:.6}% | error: {:.2e} (tol: {:.2e})",
            status,
            self.instrument_id,
            self.instrument_type,
            self.quoted_rate * 100.0,
            self.model_rate * 100.0,
            self.error,
            self.tolerance
        )
    }
}

/// Complete repricing report for audit trail.
#[derive(Debug, Clone)]
pub struct RepricingReport {
    /// Individual instrument checks
    checks: Vec<RepricingCheck>,

    /// Maximum absolute error across all instruments
    max_error: f64,

    /// Root mean square of all errors
    rms_error: f64,

    /// Whether all instruments passed validation
    all_passed: bool,

    /// Number of instruments that passed
    passed_count: usize,
}

impl RepricingReport {
    /// Creates a new repricing report from individual checks.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>) -> Self {
        let max_error = checks.iter().map(|c| c.error).fold(0.0_f64, f64::max);

        let rms_error = if checks.is_empty() {
            0.0
        } else {
            let sum_sq: f64 = checks.iter().map(|c| c.error * c.error).sum();
            #[allow(clippy::cast_precision_loss)]
            let n = checks.len() as f64;
            (sum_sq / n).sqrt()
        };

        let all_passed = checks.iter().all(|c| c.passed);
        let passed_count = checks.iter().filter(|c| c.passed).count();

        Self {
            checks,
            max_error,
            rms_error,
            all_passed,
            passed_count,
        }
    }

    /// Returns whether all instruments passed repricing validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.all_passed
    }

    /// Returns the individual repricing checks.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Returns the maximum absolute error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Returns the RMS error.
    #[must_use]
    pub fn rms_error(&self) -> f64 {
        self.rms_error
    }

    /// Returns the number of instruments that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.passed_count
    }

    /// Returns the number of instruments that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count
    }

    /// Returns failed instrument checks for error reporting.
    #[must_use]
    pub fn failed_checks(&self) -> Vec<&RepricingCheck> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    /// Returns failed instrument IDs for error messages.
    #[must_use]
    pub fn failed_instruments(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.instrument_id.as_str())
            .collect()
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repricing Report")?;
        writeln!(f, "================")?;
        writeln!(f, "Status: {}", if self.all_passed { "PASSED" } else { "FAILED" })?;
        writeln!(f, "Instruments: {}/{} passed", self.passed_count, self.checks.len())?;
        writeln!(f, "Max Error: {:.2e}", self.max_error)?;
        writeln!(f, "RMS Error: {:.2e}", self.rms_error)?;

        if !self.checks.is_empty() {
            writeln!(f)?;
            writeln!(f, "Details:")?;
            for check in &self.checks {
                writeln!(f, "  {check}")?;
            }
        }

        Ok(())
    }
}

/// A bootstrapped curve with its repricing report.
#[derive(Debug, Clone)]
pub struct BootstrapResult<C> {
    /// The bootstrapped curve.
    pub curve: C,

    /// Repricing validation report.
    pub repricing_report: RepricingReport,

    /// Time taken to build the curve.
    pub build_duration: Duration,
}

impl<C> BootstrapResult<C> {
    /// Creates a new bootstrap result.
    #[must_use]
    pub fn new(curve: C, repricing_report: RepricingReport, build_duration: Duration) -> Self {
        Self {
            curve,
            repricing_report,
            build_duration,
        }
    }

    /// Returns whether every instrument reprices.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.repricing_report.is_valid()
    }

    /// Returns the maximum repricing error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.repricing_report.max_error()
    }

    /// Returns failed instrument IDs.
    #[must_use]
    pub fn failed_instruments(&self) -> Vec<&str> {
        self.repricing_report.failed_instruments()
    }

    /// Returns a reference to the curve.
    #[must_use]
    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Consumes the result and returns the curve if every instrument repriced.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::BootstrapNonConvergence`] naming the instruments
    /// that missed their tolerance.
    pub fn into_curve(self) -> CurveResult<C> {
        if self.is_valid() {
            return Ok(self.curve);
        }
        Err(CurveError::non_convergence(
            self.failed_instruments().join(", "),
            format!(
                "repricing validation failed, max error {:.2e}",
                self.max_error()
            ),
        ))
    }
}

impl<C> fmt::Display for BootstrapResult<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bootstrap Result")?;
        writeln!(f, "Build time: {:?}", self.build_duration)?;
        writeln!(f)?;
        write!(f, "{}", self.repricing_report)
    }
}

/// Reprices every instrument on `curve`.
///
/// # Errors
///
/// Propagates curve evaluation errors.
pub fn validate_curve_repricing(
    curve: &dyn Curve,
    instruments: &[CalibrationInstrument],
    tolerance: f64,
) -> CurveResult<RepricingReport> {
    let checks = instruments
        .iter()
        .map(|inst| RepricingCheck::from_instrument(inst, curve, tolerance))
        .collect::<CurveResult<Vec<_>>>()?;
    Ok(RepricingReport::new(checks))
}

/// Helper to time curve building operations.
pub struct BuildTimer {
    start: Instant,
}

impl BuildTimer {
    /// Starts a new timer.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Returns the elapsed duration.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
