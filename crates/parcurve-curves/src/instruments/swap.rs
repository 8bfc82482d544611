//! Vanilla fixed-for-floating interest-rate swaps.
//!
//! The floating leg projects the curve under construction. Coupons discount
//! off an attached discounting curve when the curve convention requires one,
//! and off the projection curve otherwise.

use std::sync::Arc;

use parcurve_core::types::Tenor;
use parcurve_core::Date;

use super::{leg_periods, parse_tenor, AccrualPeriod, CalibrationInstrument, CollectorContext};
use crate::curve::YieldCurve;
use crate::error::{CurveError, CurveResult};
use crate::index::{tenor_from_curve_name, FloatingIndex};
use crate::traits::Curve;

/// A par swap used as a calibration instrument.
///
/// # Par Rate
///
/// ```text
/// S = Σ D(pay_j) × (P(s_j) / P(e_j) - 1) / Σ D(pay_i) × τ_i
/// ```
///
/// where `P` is the projection curve, `D` the discounting curve, `j` runs over
/// floating periods and `i` over fixed periods. Without a separate
/// discounting curve `D = P` and the numerator telescopes to
/// `P(start) - P(end)`.
#[derive(Debug, Clone)]
pub struct Swap {
    id: String,
    tenor: Tenor,
    index: FloatingIndex,
    rate: f64,
    fixed: Vec<AccrualPeriod>,
    floating: Vec<AccrualPeriod>,
    discounting: Option<Arc<YieldCurve>>,
}

impl Swap {
    /// Creates a swap from its legs.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] if either leg has no periods.
    pub fn new(
        id: impl Into<String>,
        tenor: Tenor,
        index: FloatingIndex,
        rate: f64,
        fixed: Vec<AccrualPeriod>,
        floating: Vec<AccrualPeriod>,
    ) -> CurveResult<Self> {
        let id = id.into();
        if fixed.is_empty() || floating.is_empty() {
            return Err(CurveError::configuration(format!(
                "swap {id} has an empty leg"
            )));
        }
        Ok(Self {
            id,
            tenor,
            index,
            rate,
            fixed,
            floating,
            discounting: None,
        })
    }

    /// Discounts coupons off `curve` instead of the projection curve.
    #[must_use]
    pub fn with_discounting(mut self, curve: Arc<YieldCurve>) -> Self {
        self.discounting = Some(curve);
        self
    }

    /// Instrument id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Swap tenor.
    #[must_use]
    pub fn tenor(&self) -> Tenor {
        self.tenor
    }

    /// Projected index.
    #[must_use]
    pub fn index(&self) -> FloatingIndex {
        self.index
    }

    /// Quoted par rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Fixed leg periods.
    #[must_use]
    pub fn fixed_leg(&self) -> &[AccrualPeriod] {
        &self.fixed
    }

    /// Floating leg periods.
    #[must_use]
    pub fn floating_leg(&self) -> &[AccrualPeriod] {
        &self.floating
    }

    /// Attached discounting curve.
    #[must_use]
    pub fn discounting(&self) -> Option<&Arc<YieldCurve>> {
        self.discounting.as_ref()
    }

    /// Last fixed payment date; the node this swap determines.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.fixed.last().map_or(self.floating[0].end, |p| p.payment)
    }

    /// Last payment date on either leg.
    #[must_use]
    pub fn last_payment(&self) -> Date {
        self.fixed
            .iter()
            .chain(&self.floating)
            .map(|p| p.payment)
            .max()
            .unwrap_or_else(|| self.maturity())
    }

    /// Par rate implied by projecting off `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidValue`] if the annuity is not positive, and
    /// propagates curve evaluation errors.
    pub fn implied_rate(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let discount: &dyn Curve = match &self.discounting {
            Some(external) => external.as_ref(),
            None => curve,
        };

        let mut floating = 0.0;
        for period in &self.floating {
            let forward =
                curve.discount_factor(period.start)? / curve.discount_factor(period.end)? - 1.0;
            floating += discount.discount_factor(period.payment)? * forward;
        }

        let mut annuity = 0.0;
        for period in &self.fixed {
            annuity += discount.discount_factor(period.payment)? * period.accrual;
        }
        if annuity <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "swap {} has a non-positive annuity",
                self.id
            )));
        }

        Ok(floating / annuity)
    }
}

/// Collects the swaps flagged for the context's term curve.
///
/// # Errors
///
/// Returns [`CurveError::Configuration`] if swaps are selected without swap
/// conventions, or if the convention requires a discounting curve the context
/// does not carry; [`CurveError::UnsupportedCurrency`] if the currency has no
/// term index.
pub fn collect(ctx: &CollectorContext<'_>) -> CurveResult<Vec<CalibrationInstrument>> {
    let selected = ctx.selected("swaps");
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let convention = ctx.convention;
    let conventions = convention.swaps.as_ref().ok_or_else(|| {
        CurveError::configuration(format!(
            "{} selects swaps but has no swap conventions",
            ctx.curve
        ))
    })?;

    let index_tenor = match conventions.float_tenor {
        Some(tenor) => tenor,
        None => tenor_from_curve_name(ctx.curve)?,
    };
    let index = FloatingIndex::for_currency(convention.currency, index_tenor)?;

    let discounting = if convention.requires_ois {
        let curve = ctx.discounting.clone().ok_or_else(|| {
            CurveError::configuration(format!(
                "{} discounts off {} which was not supplied",
                ctx.curve,
                convention.discounting_curve().unwrap_or_default()
            ))
        })?;
        Some(curve)
    } else {
        None
    };

    let float_step = match conventions.float_frequency {
        Some(frequency) => frequency.period(),
        None => Some(index.tenor()),
    };
    let float_adjustment = conventions
        .float_adjustment
        .unwrap_or(conventions.fixed_adjustment);
    let spot = ctx.spot_date(convention.swap_spot_lag());

    selected
        .into_iter()
        .map(|(id, suffix)| {
            let tenor = parse_tenor(&id, &suffix)?;
            let maturity = tenor.add_to(spot)?;

            let fixed = leg_periods(
                spot,
                maturity,
                conventions.fixed_frequency.period(),
                ctx.calendar,
                conventions.fixed_adjustment,
                conventions.fixed_day_count,
            )?;
            let floating = leg_periods(
                spot,
                maturity,
                float_step,
                ctx.calendar,
                float_adjustment,
                index.day_count(),
            )?;
            let rate = ctx.quote(&id)?;

            let swap = Swap::new(id, tenor, index, rate, fixed, floating)?;
            let swap = match &discounting {
                Some(curve) => swap.with_discounting(Arc::clone(curve)),
                None => swap,
            };
            Ok(CalibrationInstrument::Swap(swap))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{CurveConvention, DepositConventions, SwapConventions};
    use crate::curve::InterpolationMethod;
    use crate::market::{InclusionTable, QuoteTable};
    use crate::traits::testing::FlatCurve;
    use approx::assert_relative_eq;
    use parcurve_core::calendars::{BusinessDayConvention, CalendarId, WeekendCalendar};
    use parcurve_core::daycounts::DayCountConvention;
    use parcurve_core::types::{Currency, Frequency};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn convention(currency: Currency) -> CurveConvention {
        CurveConvention::new(
            currency,
            CalendarId::WeekendsOnly,
            DepositConventions {
                spot_lag: 2,
                day_count: DayCountConvention::Act360,
                adjustment: BusinessDayConvention::ModifiedFollowing,
            },
        )
        .with_swaps(SwapConventions {
            spot_lag: None,
            fixed_frequency: Frequency::SemiAnnual,
            fixed_adjustment: BusinessDayConvention::ModifiedFollowing,
            fixed_day_count: DayCountConvention::Thirty360US,
            float_frequency: None,
            float_tenor: None,
            float_adjustment: None,
        })
    }

    fn context<'a>(
        curve: &'a str,
        convention: &'a CurveConvention,
        quotes: &'a QuoteTable,
        inclusion: &'a InclusionTable,
        discounting: Option<Arc<YieldCurve>>,
    ) -> CollectorContext<'a> {
        CollectorContext {
            curve,
            convention,
            quotes,
            inclusion,
            anchor: d(2025, 1, 15),
            calendar: &WeekendCalendar,
            discounting,
        }
    }

    fn collect_one(ctx: &CollectorContext<'_>) -> Swap {
        match collect(ctx).unwrap().remove(0) {
            CalibrationInstrument::Swap(swap) => swap,
            other => panic!("expected a swap, got {other:?}"),
        }
    }

    #[test]
    fn test_collect_legs() {
        let convention = convention(Currency::USD);
        let quotes = QuoteTable::new().with("USD_3M", "swaps_2YR", d(2025, 1, 15), 0.04);
        let inclusion = InclusionTable::new().include("USD_3M", ["swaps_2YR"]);
        let ctx = context("USD_3M", &convention, &quotes, &inclusion, None);

        let swap = collect_one(&ctx);
        assert_eq!(swap.fixed_leg().len(), 4);
        assert_eq!(swap.floating_leg().len(), 8);
        assert_eq!(swap.fixed_leg()[0].start, d(2025, 1, 17));
        // 2027-01-17 is a Sunday
        assert_eq!(swap.maturity(), d(2027, 1, 18));
        assert_eq!(swap.last_payment(), d(2027, 1, 18));
        assert_eq!(swap.index().to_string(), "USD LIBOR 3M");
    }

    #[test]
    fn test_single_curve_par_rate_telescopes() {
        let convention = convention(Currency::USD);
        let quotes = QuoteTable::new().with("USD_3M", "swaps_5YR", d(2025, 1, 15), 0.04);
        let inclusion = InclusionTable::new().include("USD_3M", ["swaps_5YR"]);
        let ctx = context("USD_3M", &convention, &quotes, &inclusion, None);
        let swap = collect_one(&ctx);

        let curve = FlatCurve {
            settlement: d(2025, 1, 17),
            rate: 0.035,
        };
        let start = swap.floating_leg()[0].start;
        let end = swap.floating_leg().last().unwrap().end;
        let annuity: f64 = swap
            .fixed_leg()
            .iter()
            .map(|p| curve.discount_factor(p.payment).unwrap() * p.accrual)
            .sum();
        let expected =
            (curve.discount_factor(start).unwrap() - curve.discount_factor(end).unwrap()) / annuity;

        assert_relative_eq!(swap.implied_rate(&curve).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_discounting_curve_changes_par_rate() {
        let ois = YieldCurve::from_zero_rates(
            "USD_OIS",
            d(2025, 1, 17),
            DayCountConvention::Act360,
            InterpolationMethod::CubicSpline,
            &[(d(2026, 1, 20), 0.02), (d(2031, 1, 17), 0.025)],
        )
        .unwrap();
        let convention = convention(Currency::USD).requiring_ois();
        let quotes = QuoteTable::new().with("USD_3M", "swaps_5YR", d(2025, 1, 15), 0.04);
        let inclusion = InclusionTable::new().include("USD_3M", ["swaps_5YR"]);

        let ctx = context("USD_3M", &convention, &quotes, &inclusion, Some(Arc::new(ois)));
        let swap = collect_one(&ctx);
        assert!(swap.discounting().is_some());

        let projection = FlatCurve {
            settlement: d(2025, 1, 17),
            rate: 0.035,
        };
        let dual = swap.implied_rate(&projection).unwrap();
        let single = Swap {
            discounting: None,
            ..swap.clone()
        }
        .implied_rate(&projection)
        .unwrap();
        assert!((dual - single).abs() > 1e-8);
        assert!((dual - single).abs() < 1e-3);
    }

    #[test]
    fn test_requires_discounting_curve() {
        let convention = convention(Currency::USD).requiring_ois();
        let quotes = QuoteTable::new().with("USD_3M", "swaps_5YR", d(2025, 1, 15), 0.04);
        let inclusion = InclusionTable::new().include("USD_3M", ["swaps_5YR"]);
        let ctx = context("USD_3M", &convention, &quotes, &inclusion, None);

        let err = collect(&ctx).unwrap_err();
        assert!(matches!(err, CurveError::Configuration { .. }));
        assert!(err.to_string().contains("USD_OIS"));
    }

    #[test]
    fn test_unsupported_currency() {
        let convention = convention(Currency::BRL);
        let quotes = QuoteTable::new().with("BRL_3M", "swaps_5YR", d(2025, 1, 15), 0.11);
        let inclusion = InclusionTable::new().include("BRL_3M", ["swaps_5YR"]);
        let ctx = context("BRL_3M", &convention, &quotes, &inclusion, None);

        assert!(matches!(
            collect(&ctx),
            Err(CurveError::UnsupportedCurrency { currency: Currency::BRL, .. })
        ));
    }

    #[test]
    fn test_unsupported_currency_ignored_without_swaps() {
        let convention = convention(Currency::BRL);
        let quotes = QuoteTable::new();
        let inclusion = InclusionTable::new();
        let ctx = context("BRL_3M", &convention, &quotes, &inclusion, None);
        assert!(collect(&ctx).unwrap().is_empty());
    }
}
