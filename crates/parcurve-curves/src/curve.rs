//! The bootstrapped yield curve.
//!
//! A [`YieldCurve`] stores continuously-compounded zero rates at its node
//! dates, with time measured from the settlement date in the node day count.
//! Discount factors between nodes come from interpolating the zero rates;
//! outside the node range the boundary zero rate is held flat.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::Compounding;
use parcurve_core::Date;
use parcurve_math::interpolation::{CubicSpline, Extrapolation, Interpolator, LinearInterpolator};

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Interpolation scheme applied to node zero rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Natural cubic spline, refit over all nodes.
    #[default]
    CubicSpline,
    /// Piecewise linear.
    Linear,
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationMethod::CubicSpline => write!(f, "CubicSpline"),
            InterpolationMethod::Linear => write!(f, "Linear"),
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(|c: char| c == ' ' || c == '_', "").as_str() {
            "cubicspline" | "cubic" | "spline" | "naturalcubic" | "naturalcubicspline" => {
                Ok(InterpolationMethod::CubicSpline)
            }
            "linear" => Ok(InterpolationMethod::Linear),
            _ => Err(CurveError::configuration(format!(
                "unknown interpolation method '{s}'"
            ))),
        }
    }
}

/// One node of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldCurveNode {
    /// Node date.
    pub date: Date,
    /// Year fraction from settlement in the node day count.
    pub time: f64,
    /// Discount factor at the node.
    pub discount_factor: f64,
    /// Continuously-compounded zero rate at the node.
    pub zero_rate: f64,
}

#[derive(Debug, Clone)]
enum ZeroInterpolator {
    Spline(CubicSpline),
    Linear(LinearInterpolator),
}

impl ZeroInterpolator {
    fn new(method: InterpolationMethod, xs: Vec<f64>, ys: Vec<f64>) -> CurveResult<Self> {
        let fitted = match method {
            InterpolationMethod::CubicSpline => CubicSpline::new(xs, ys)
                .map(|s| Self::Spline(s.with_extrapolation(Extrapolation::Flat))),
            InterpolationMethod::Linear => LinearInterpolator::new(xs, ys)
                .map(|l| Self::Linear(l.with_extrapolation(Extrapolation::Flat))),
        };
        fitted.map_err(|e| CurveError::invalid_value(format!("cannot fit zero rates: {e}")))
    }

    fn value(&self, t: f64) -> CurveResult<f64> {
        let result = match self {
            Self::Spline(s) => s.interpolate(t),
            Self::Linear(l) => l.interpolate(t),
        };
        result.map_err(|e| CurveError::invalid_value(e.to_string()))
    }
}

/// Zero-rate interpolation over a settlement knot plus pillar knots.
///
/// This is the pricing core shared by finished curves and the trial curves
/// evaluated inside the bootstrap.
#[derive(Debug, Clone)]
pub(crate) struct ZeroCurve {
    settlement: Date,
    day_count: DayCountConvention,
    zeros: ZeroInterpolator,
}

impl ZeroCurve {
    /// Fits `pillars` (date, continuous zero rate). The settlement knot takes the
    /// first pillar's zero rate.
    pub(crate) fn fit(
        settlement: Date,
        day_count: DayCountConvention,
        method: InterpolationMethod,
        pillars: &[(Date, f64)],
    ) -> CurveResult<Self> {
        let first = pillars
            .first()
            .ok_or_else(|| CurveError::invalid_value("a curve needs at least one node"))?;

        let mut xs = Vec::with_capacity(pillars.len() + 1);
        let mut ys = Vec::with_capacity(pillars.len() + 1);
        xs.push(0.0);
        ys.push(first.1);
        for (date, zero) in pillars {
            xs.push(day_count.fraction(settlement, *date));
            ys.push(*zero);
        }

        Ok(Self {
            settlement,
            day_count,
            zeros: ZeroInterpolator::new(method, xs, ys)?,
        })
    }

    fn time(&self, date: Date) -> f64 {
        self.day_count.fraction(self.settlement, date)
    }

    fn zero_at(&self, t: f64) -> CurveResult<f64> {
        self.zeros.value(t)
    }
}

impl Curve for ZeroCurve {
    fn settlement_date(&self) -> Date {
        self.settlement
    }

    fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        // Dates before settlement discount as settlement.
        let t = self.time(date).max(0.0);
        Ok((-self.zero_at(t)? * t).exp())
    }
}

/// An immutable bootstrapped curve.
///
/// ```rust
/// use parcurve_core::daycounts::DayCountConvention;
/// use parcurve_core::Date;
/// use parcurve_curves::curve::{InterpolationMethod, YieldCurve};
/// use parcurve_curves::Curve;
///
/// let settlement = Date::from_ymd(2025, 1, 17).unwrap();
/// let curve = YieldCurve::from_zero_rates(
///     "USD_OIS",
///     settlement,
///     DayCountConvention::Act360,
///     InterpolationMethod::CubicSpline,
///     &[
///         (Date::from_ymd(2025, 4, 17).unwrap(), 0.043),
///         (Date::from_ymd(2026, 1, 20).unwrap(), 0.041),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(curve.discount_factor(settlement).unwrap(), 1.0);
/// assert_eq!(curve.nodes().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct YieldCurve {
    name: String,
    interpolation: InterpolationMethod,
    compounding: Compounding,
    nodes: Vec<YieldCurveNode>,
    zeros: ZeroCurve,
}

impl YieldCurve {
    /// Builds a curve from (date, continuously-compounded zero rate) pillars.
    ///
    /// A settlement node carrying the first pillar's zero rate is added in front.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidValue`] if there are no pillars, a pillar is
    /// not after settlement, or pillar times are not strictly increasing.
    pub fn from_zero_rates(
        name: impl Into<String>,
        settlement: Date,
        day_count: DayCountConvention,
        interpolation: InterpolationMethod,
        pillars: &[(Date, f64)],
    ) -> CurveResult<Self> {
        let zeros = ZeroCurve::fit(settlement, day_count, interpolation, pillars)?;

        let mut nodes = Vec::with_capacity(pillars.len() + 1);
        nodes.push(YieldCurveNode {
            date: settlement,
            time: 0.0,
            discount_factor: 1.0,
            zero_rate: pillars[0].1,
        });
        nodes.extend(pillars.iter().map(|&(date, zero_rate)| {
            let time = day_count.fraction(settlement, date);
            YieldCurveNode {
                date,
                time,
                discount_factor: (-zero_rate * time).exp(),
                zero_rate,
            }
        }));

        Ok(Self {
            name: name.into(),
            interpolation,
            compounding: Compounding::Continuous,
            nodes,
            zeros,
        })
    }

    /// Sets the compounding used by [`YieldCurve::quoted_zero_rate`].
    #[must_use]
    pub fn with_compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = compounding;
        self
    }

    /// Curve name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Day count measuring node times.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.zeros.day_count
    }

    /// Interpolation scheme.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Reporting compounding.
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Nodes in date order, starting with the settlement node.
    #[must_use]
    pub fn nodes(&self) -> &[YieldCurveNode] {
        &self.nodes
    }

    /// Date of the last node.
    #[must_use]
    pub fn max_date(&self) -> Date {
        self.nodes
            .last()
            .map_or(self.zeros.settlement, |node| node.date)
    }

    /// Year fraction from settlement to `date` in the node day count.
    #[must_use]
    pub fn time(&self, date: Date) -> f64 {
        self.zeros.time(date)
    }

    /// Continuously-compounded zero rate at `date`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidValue`] if interpolation fails.
    pub fn zero_rate(&self, date: Date) -> CurveResult<f64> {
        self.zeros.zero_at(self.time(date))
    }

    /// Zero rate at `date` under `compounding`.
    ///
    /// At or before settlement the short-end limit of the conversion is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidValue`] if interpolation fails.
    pub fn zero_rate_with(&self, date: Date, compounding: Compounding) -> CurveResult<f64> {
        let t = self.time(date);
        let z = self.zeros.zero_at(t)?;
        if t > 0.0 {
            return Ok(Compounding::Continuous.convert_to(z, compounding, t));
        }
        Ok(match compounding.periods_per_year_opt() {
            Some(n) => {
                let n = f64::from(n);
                n * ((z / n).exp() - 1.0)
            }
            None => z,
        })
    }

    /// Zero rate at `date` under the curve's reporting compounding.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidValue`] if interpolation fails.
    pub fn quoted_zero_rate(&self, date: Date) -> CurveResult<f64> {
        self.zero_rate_with(date, self.compounding)
    }

    /// (date, discount factor) for every node.
    #[must_use]
    pub fn export_rows(&self) -> Vec<(Date, f64)> {
        self.nodes
            .iter()
            .map(|node| (node.date, node.discount_factor))
            .collect()
    }
}

impl Curve for YieldCurve {
    fn settlement_date(&self) -> Date {
        self.zeros.settlement
    }

    fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        self.zeros.discount_factor(date)
    }
}

impl fmt::Display for YieldCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}, {} nodes, {})",
            self.name,
            self.interpolation,
            self.nodes.len(),
            self.zeros.day_count
        )?;
        for node in &self.nodes {
            writeln!(
                f,
                "  {}  {:>8.5}  {:.10}  {:>9.6}%",
                node.date,
                node.time,
                node.discount_factor,
                node.zero_rate * 100.0
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn sample(method: InterpolationMethod) -> YieldCurve {
        YieldCurve::from_zero_rates(
            "TEST",
            d(2025, 1, 15),
            DayCountConvention::Act365Fixed,
            method,
            &[
                (d(2025, 4, 15), 0.040),
                (d(2026, 1, 15), 0.042),
                (d(2030, 1, 15), 0.045),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_settlement_node() {
        let curve = sample(InterpolationMethod::CubicSpline);
        let first = curve.nodes()[0];
        assert_eq!(first.date, d(2025, 1, 15));
        assert_eq!(first.discount_factor, 1.0);
        assert_eq!(first.zero_rate, 0.040);
        assert_eq!(curve.discount_factor(d(2025, 1, 15)).unwrap(), 1.0);
    }

    #[test]
    fn test_dates_before_settlement_discount_at_par() {
        for method in [InterpolationMethod::CubicSpline, InterpolationMethod::Linear] {
            let curve = sample(method);
            assert_eq!(curve.discount_factor(d(2025, 1, 14)).unwrap(), 1.0);
            assert_eq!(curve.discount_factor(d(2024, 6, 30)).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_nodes_reprice() {
        for method in [InterpolationMethod::CubicSpline, InterpolationMethod::Linear] {
            let curve = sample(method);
            for node in curve.nodes() {
                assert_relative_eq!(
                    curve.discount_factor(node.date).unwrap(),
                    node.discount_factor,
                    epsilon = 1e-15
                );
                assert_relative_eq!(curve.zero_rate(node.date).unwrap(), node.zero_rate, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_flat_extrapolation() {
        let curve = sample(InterpolationMethod::CubicSpline);
        assert_relative_eq!(curve.zero_rate(d(2040, 1, 15)).unwrap(), 0.045, epsilon = 1e-15);
        assert_eq!(curve.max_date(), d(2030, 1, 15));
    }

    #[test]
    fn test_zero_rate_with_compounding() {
        let curve = sample(InterpolationMethod::Linear);
        let date = d(2026, 1, 15);
        let t = curve.time(date);
        let annual = curve.zero_rate_with(date, Compounding::Annual).unwrap();
        assert_relative_eq!(annual, (0.042 * t).exp().powf(1.0 / t) - 1.0, epsilon = 1e-12);

        let continuous = curve.zero_rate_with(date, Compounding::Continuous).unwrap();
        assert_relative_eq!(continuous, 0.042, epsilon = 1e-12);

        let short = curve.zero_rate_with(d(2025, 1, 15), Compounding::Annual).unwrap();
        assert_relative_eq!(short, 0.04_f64.exp() - 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_quoted_zero_rate_uses_curve_compounding() {
        let curve = sample(InterpolationMethod::Linear).with_compounding(Compounding::SemiAnnual);
        let date = d(2030, 1, 15);
        assert_eq!(
            curve.quoted_zero_rate(date).unwrap(),
            curve.zero_rate_with(date, Compounding::SemiAnnual).unwrap()
        );
    }

    #[test]
    fn test_export_rows() {
        let curve = sample(InterpolationMethod::CubicSpline);
        let rows = curve.export_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], (d(2025, 1, 15), 1.0));
        assert!(rows.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_rejects_bad_pillars() {
        let settlement = d(2025, 1, 15);
        let empty = YieldCurve::from_zero_rates(
            "X",
            settlement,
            DayCountConvention::Act360,
            InterpolationMethod::CubicSpline,
            &[],
        );
        assert!(empty.is_err());

        let at_settlement = YieldCurve::from_zero_rates(
            "X",
            settlement,
            DayCountConvention::Act360,
            InterpolationMethod::CubicSpline,
            &[(settlement, 0.04)],
        );
        assert!(at_settlement.is_err());
    }

    #[test]
    fn test_interpolation_parse() {
        assert_eq!("Cubic Spline".parse::<InterpolationMethod>().unwrap(), InterpolationMethod::CubicSpline);
        assert_eq!("linear".parse::<InterpolationMethod>().unwrap(), InterpolationMethod::Linear);
        assert!("MonotoneConvex".parse::<InterpolationMethod>().is_err());
    }
}
