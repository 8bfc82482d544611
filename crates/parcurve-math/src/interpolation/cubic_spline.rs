//! Natural cubic spline interpolation.

use crate::error::MathResult;
use crate::interpolation::{locate, validate_knots, Extrapolation, Interpolator, Lookup};

/// Natural cubic spline interpolation.
///
/// Piecewise cubic with continuous first and second derivatives and zero
/// second derivative at both ends. With two knots the spline is the straight
/// line through them.
///
/// The spline is global: moving one knot changes every segment, so a
/// bootstrapper must refit it after each new node.
///
/// # Example
///
/// ```rust
/// use parcurve_math::interpolation::{CubicSpline, Extrapolation, Interpolator};
///
/// let xs = vec![0.25, 1.0, 2.0, 5.0];
/// let ys = vec![0.030, 0.032, 0.035, 0.038];
///
/// let spline = CubicSpline::new(xs, ys)
///     .unwrap()
///     .with_extrapolation(Extrapolation::Flat);
/// assert_eq!(spline.interpolate(30.0).unwrap(), 0.038);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    extrapolation: Extrapolation,
}

impl CubicSpline {
    /// Fits a natural cubic spline through the knots.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, the lengths differ,
    /// or `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys, 2)?;
        let y2s = second_derivatives(&xs, &ys);

        Ok(Self {
            xs,
            ys,
            y2s,
            extrapolation: Extrapolation::Forbidden,
        })
    }

    /// Sets the extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Second derivative at each knot.
    #[must_use]
    pub fn second_derivatives(&self) -> &[f64] {
        &self.y2s
    }

    fn segment(&self, i: usize, x: f64) -> (f64, f64, f64) {
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        (h, a, b)
    }
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        let i = match locate(&self.xs, x, self.extrapolation)? {
            Lookup::Below => return Ok(self.ys[0]),
            Lookup::Above => return Ok(self.ys[self.ys.len() - 1]),
            Lookup::Segment(i) => i,
        };

        let (h, a, b) = self.segment(i, x);
        let (y_lo, y_hi) = (self.ys[i], self.ys[i + 1]);
        let (y2_lo, y2_hi) = (self.y2s[i], self.y2s[i + 1]);

        Ok(a * y_lo + b * y_hi + ((a * a * a - a) * y2_lo + (b * b * b - b) * y2_hi) * (h * h) / 6.0)
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let i = match locate(&self.xs, x, self.extrapolation)? {
            Lookup::Below | Lookup::Above => return Ok(0.0),
            Lookup::Segment(i) => i,
        };

        let (h, a, b) = self.segment(i, x);
        let (y_lo, y_hi) = (self.ys[i], self.ys[i + 1]);
        let (y2_lo, y2_hi) = (self.y2s[i], self.y2s[i + 1]);

        Ok((y_hi - y_lo) / h - (3.0 * a * a - 1.0) * h * y2_lo / 6.0
            + (3.0 * b * b - 1.0) * h * y2_hi / 6.0)
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

/// Solves the tridiagonal system for the natural spline's knot curvatures.
fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    let mut u = vec![0.0; n];

    // decomposition; y2[0] = 0
    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        let slope_jump =
            (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]) - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * slope_jump / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    // back-substitution; y2[n-1] = 0
    y2s[n - 1] = 0.0;
    for i in (0..n - 1).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }

    y2s
}
