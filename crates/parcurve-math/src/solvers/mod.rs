//! Root-finding.
//!
//! - [`brent`]: Brent-Dekker bracketed root finder
//! - [`find_bracket`]: locates a sign change, first around a guess and then on a grid
//!
//! The curve bootstrapper combines the two: it brackets the discount factor
//! of each pillar and polishes it with Brent.
//!
//! ```rust
//! use parcurve_math::solvers::{brent, find_bracket, SolverConfig};
//!
//! let f = |df: f64| (1.0 / df - 1.0) / 2.0 - 0.03;
//! let (a, b) = find_bracket(&f, Some(0.9), 1e-8, 2.0, 64).unwrap();
//! let result = brent(f, a, b, &SolverConfig::default()).unwrap();
//! assert!((result.root - 1.0 / 1.06).abs() < 1e-12);
//! ```

mod bracket;
mod brent;

pub use bracket::find_bracket;
pub use brent::brent;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-14;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence, applied to both the root and the residual.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}
