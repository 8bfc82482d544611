//! Interpolation on curve knots.
//!
//! - [`CubicSpline`]: natural cubic spline, refit globally on every knot change
//! - [`LinearInterpolator`]: piecewise linear
//!
//! Both take an [`Extrapolation`] policy for queries outside the knot range.
//! Curves use [`Extrapolation::Flat`], which holds the boundary value.

mod cubic_spline;
mod linear;

pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Behaviour outside the knot range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Queries outside the range fail with [`MathError::ExtrapolationNotAllowed`].
    #[default]
    Forbidden,
    /// Queries outside the range return the nearest boundary value.
    Flat,
}

/// Where a query lands relative to the knots.
pub(crate) enum Lookup {
    /// Below the first knot under flat extrapolation.
    Below,
    /// Above the last knot under flat extrapolation.
    Above,
    /// Inside segment `i`, i.e. `xs[i] <= x <= xs[i + 1]`.
    Segment(usize),
}

pub(crate) fn validate_knots(xs: &[f64], ys: &[f64], required: usize) -> MathResult<()> {
    if xs.len() < required {
        return Err(MathError::insufficient_data(required, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    if ys.iter().any(|y| !y.is_finite()) {
        return Err(MathError::invalid_input("y values must be finite"));
    }
    Ok(())
}

pub(crate) fn locate(xs: &[f64], x: f64, extrapolation: Extrapolation) -> MathResult<Lookup> {
    let (min, max) = (xs[0], xs[xs.len() - 1]);
    if x.is_nan() {
        return Err(MathError::invalid_input("query point is NaN"));
    }
    if x < min || x > max {
        return match extrapolation {
            Extrapolation::Forbidden => Err(MathError::ExtrapolationNotAllowed { x, min, max }),
            Extrapolation::Flat if x < min => Ok(Lookup::Below),
            Extrapolation::Flat => Ok(Lookup::Above),
        };
    }

    let i = xs.partition_point(|knot| *knot <= x);
    Ok(Lookup::Segment(i.saturating_sub(1).min(xs.len() - 2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_both_interpolators_through_points() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let rates = vec![0.02, 0.025, 0.03, 0.035, 0.04];

        let linear = LinearInterpolator::new(times.clone(), rates.clone()).unwrap();
        let spline = CubicSpline::new(times.clone(), rates.clone()).unwrap();

        for (t, r) in times.iter().zip(rates.iter()) {
            assert_relative_eq!(linear.interpolate(*t).unwrap(), *r, epsilon = 1e-14);
            assert_relative_eq!(spline.interpolate(*t).unwrap(), *r, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_derivative_consistency() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let rates = vec![0.02, 0.025, 0.03, 0.028, 0.04];

        let linear = LinearInterpolator::new(times.clone(), rates.clone()).unwrap();
        check_derivative(&linear, 1.5, "Linear");

        let spline = CubicSpline::new(times, rates).unwrap();
        for t in [0.75, 1.5, 2.5, 4.0] {
            check_derivative(&spline, t, "CubicSpline");
        }
    }

    fn check_derivative(interp: &dyn Interpolator, t: f64, name: &str) {
        let h = 1e-6;
        let y_plus = interp.interpolate(t + h).unwrap();
        let y_minus = interp.interpolate(t - h).unwrap();
        let numerical = (y_plus - y_minus) / (2.0 * h);

        let analytical = interp.derivative(t).unwrap();

        assert!(
            (analytical - numerical).abs() < 1e-6,
            "{} derivative at t={}: analytical={}, numerical={}",
            name,
            t,
            analytical,
            numerical
        );
    }

    #[test]
    fn test_validate_knots() {
        assert!(validate_knots(&[0.0, 1.0], &[1.0, 2.0], 2).is_ok());
        assert!(validate_knots(&[0.0], &[1.0], 2).is_err());
        assert!(validate_knots(&[0.0, 1.0], &[1.0], 2).is_err());
        assert!(validate_knots(&[0.0, 0.0], &[1.0, 2.0], 2).is_err());
        assert!(validate_knots(&[0.0, 1.0], &[1.0, f64::NAN], 2).is_err());
    }
}
