//! Sign-change bracketing.

use log::trace;

use crate::error::{MathError, MathResult};

fn brackets(fa: f64, fb: f64) -> bool {
    fa.is_finite() && fb.is_finite() && fa * fb <= 0.0
}

/// Finds an interval inside `[lower, upper]` over which `f` changes sign.
///
/// When `guess` lies inside the range, an interval around it is widened
/// geometrically first (at most `steps` times), which keeps the bracket tight
/// when the guess is already close. Otherwise, or if that fails, the range is
/// split into `steps` equal cells and the first cell with a sign change wins.
/// Non-finite function values never count as a sign change.
///
/// # Errors
///
/// Returns [`MathError::BracketNotFound`] if no sign change is seen, and
/// [`MathError::InvalidInput`] for an empty range or zero steps.
pub fn find_bracket<F>(
    f: &F,
    guess: Option<f64>,
    lower: f64,
    upper: f64,
    steps: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if !(lower < upper) || steps == 0 {
        return Err(MathError::invalid_input(format!(
            "bracket search needs lower < upper and steps > 0, got [{lower}, {upper}] / {steps}"
        )));
    }

    let mut samples = 0u32;

    if let Some(g) = guess.filter(|g| *g >= lower && *g <= upper) {
        let fg = f(g);
        samples += 1;
        if fg == 0.0 {
            return Ok((g, g));
        }

        let mut width = (g.abs() * 1e-4).max(1e-8);
        for _ in 0..steps {
            let lo = (g - width).max(lower);
            let hi = (g + width).min(upper);
            let (flo, fhi) = (f(lo), f(hi));
            samples += 2;
            trace!("bracket around {g}: [{lo}, {hi}] -> ({flo:.3e}, {fhi:.3e})");

            if brackets(flo, fg) {
                return Ok((lo, g));
            }
            if brackets(fg, fhi) {
                return Ok((g, hi));
            }
            if lo <= lower && hi >= upper {
                break;
            }
            width *= 4.0;
        }
    }

    let cell = (upper - lower) / f64::from(steps);
    let mut x_prev = lower;
    let mut f_prev = f(lower);
    samples += 1;
    for i in 1..=steps {
        let x = if i == steps {
            upper
        } else {
            lower + cell * f64::from(i)
        };
        let fx = f(x);
        samples += 1;
        if brackets(f_prev, fx) {
            trace!("grid bracket [{x_prev}, {x}] after {samples} samples");
            return Ok((x_prev, x));
        }
        x_prev = x;
        f_prev = fx;
    }

    Err(MathError::bracket_not_found(lower, upper, samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tight_bracket_near_guess() {
        let f = |x: f64| x - 0.95;
        let (a, b) = find_bracket(&f, Some(0.9501), 1e-8, 2.0, 64).unwrap();
        assert!(a <= 0.95 && 0.95 <= b);
        assert!(b - a < 1e-3);
    }

    #[test]
    fn test_grid_fallback_without_guess() {
        let f = |x: f64| x - 1.7;
        let (a, b) = find_bracket(&f, None, 0.0, 2.0, 8).unwrap();
        assert!(a <= 1.7 && 1.7 <= b);
        assert!((b - a - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_guess_outside_range_ignored() {
        let f = |x: f64| x - 0.5;
        let (a, b) = find_bracket(&f, Some(5.0), 0.0, 2.0, 4).unwrap();
        assert!(a <= 0.5 && 0.5 <= b);
    }

    #[test]
    fn test_nan_is_not_a_sign_change() {
        let f = |x: f64| if x < 1.0 { f64::NAN } else { x - 1.5 };
        let (a, b) = find_bracket(&f, None, 0.0, 2.0, 16).unwrap();
        assert!(a >= 1.0 && a <= 1.5 && 1.5 <= b);
    }

    #[test]
    fn test_no_sign_change() {
        let f = |x: f64| x * x + 1.0;
        let err = find_bracket(&f, Some(0.5), 0.0, 2.0, 8).unwrap_err();
        assert!(matches!(err, MathError::BracketNotFound { .. }));
    }

    #[test]
    fn test_rejects_empty_range() {
        let f = |x: f64| x;
        assert!(find_bracket(&f, None, 1.0, 1.0, 8).is_err());
        assert!(find_bracket(&f, None, 0.0, 1.0, 0).is_err());
    }
}
