//! Linear interpolation.

use crate::error::MathResult;
use crate::interpolation::{locate, validate_knots, Extrapolation, Interpolator, Lookup};

/// Piecewise linear interpolation.
///
/// # Example
///
/// ```rust
/// use parcurve_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
/// assert_eq!(interp.interpolate(1.5).unwrap(), 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LinearInterpolator {
    /// Creates a linear interpolator over strictly increasing `xs`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, the lengths differ,
    /// or `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys, 2)?;
        Ok(Self {
            xs,
            ys,
            extrapolation: Extrapolation::Forbidden,
        })
    }

    /// Sets the extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        let i = match locate(&self.xs, x, self.extrapolation)? {
            Lookup::Below => return Ok(self.ys[0]),
            Lookup::Above => return Ok(self.ys[self.ys.len() - 1]),
            Lookup::Segment(i) => i,
        };

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let t = (x - x0) / (x1 - x0);
        Ok(y0 + t * (y1 - y0))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        match locate(&self.xs, x, self.extrapolation)? {
            Lookup::Below | Lookup::Above => Ok(0.0),
            Lookup::Segment(i) => {
                Ok((self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]))
            }
        }
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
