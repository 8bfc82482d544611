//! Overnight-index swaps.
//!
//! An OIS exchanges a fixed rate for the compounded overnight rate. Compounding
//! daily overnight forwards off a single curve telescopes, so each period's
//! floating payment is `P(start) / P(end) - 1` and the whole floating leg is
//! worth `P(start) - P(end)`.

use parcurve_core::types::Tenor;
use parcurve_core::Date;

use super::{leg_periods, parse_tenor, AccrualPeriod, CalibrationInstrument, CollectorContext};
use crate::error::{CurveError, CurveResult};
use crate::index::OvernightIndex;
use crate::traits::Curve;

/// Swaps up to this many months pay a single period at maturity.
const SINGLE_PERIOD_MONTHS: u32 = 12;

/// An overnight-index swap.
///
/// # Par Rate
///
/// ```text
/// S = (P(start) - P(end)) / Σ P(pay_i) × τ_i
/// ```
///
/// Swaps of one year or less have a single period; longer swaps pay annually
/// on a schedule rolled backward from maturity.
#[derive(Debug, Clone)]
pub struct OisSwap {
    id: String,
    tenor: Tenor,
    index: OvernightIndex,
    rate: f64,
    periods: Vec<AccrualPeriod>,
}

impl OisSwap {
    /// Creates an overnight-index swap.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] if there are no periods.
    pub fn new(
        id: impl Into<String>,
        tenor: Tenor,
        index: OvernightIndex,
        rate: f64,
        periods: Vec<AccrualPeriod>,
    ) -> CurveResult<Self> {
        let id = id.into();
        if periods.is_empty() {
            return Err(CurveError::configuration(format!(
                "overnight swap {id} has no periods"
            )));
        }
        Ok(Self {
            id,
            tenor,
            index,
            rate,
            periods,
        })
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

    /// Overnight index.
    #[must_use]
    pub fn index(&self) -> OvernightIndex {
        self.index
    }

    /// Quoted fixed rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Accrual periods, shared by both legs.
    #[must_use]
    pub fn periods(&self) -> &[AccrualPeriod] {
        &self.periods
    }

    /// Start of the first period.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.periods[0].start
    }

    /// Final payment date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.periods[self.periods.len() - 1].payment
    }

    /// Fixed rate implied by `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidValue`] if the annuity is not positive, and
    /// propagates curve evaluation errors.
    pub fn implied_rate(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let last = &self.periods[self.periods.len() - 1];
        let floating = curve.discount_factor(self.start_date())? - curve.discount_factor(last.end)?;

        let mut annuity = 0.0;
        for period in &self.periods {
            annuity += curve.discount_factor(period.payment)? * period.accrual;
        }
        if annuity <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "overnight swap {} has a non-positive annuity",
                self.id
            )));
        }

        Ok(floating / annuity)
    }
}

/// Regular period of an OIS of `tenor`; `None` for a single period.
fn period_for(tenor: Tenor) -> Option<Tenor> {
    match tenor.total_months() {
        Some(months) if months > SINGLE_PERIOD_MONTHS => Some(Tenor::months(12)),
        _ => None,
    }
}

/// Collects the overnight-index swaps flagged for the context's overnight curve.
///
/// # Errors
///
/// Returns [`CurveError::UnsupportedCurrency`] if the currency has no
/// overnight index, and [`CurveError::Configuration`] for a malformed id or a
/// missing quote.
pub fn collect(ctx: &CollectorContext<'_>) -> CurveResult<Vec<CalibrationInstrument>> {
    let selected = ctx.selected("swaps");
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let convention = ctx.convention;
    let index = OvernightIndex::for_currency(convention.currency)?;
    let spot = ctx.spot_date(convention.deposits.spot_lag);
    let adjustment = convention
        .swaps
        .as_ref()
        .map_or(convention.deposits.adjustment, |s| s.fixed_adjustment);

    selected
        .into_iter()
        .map(|(id, suffix)| {
            let tenor = parse_tenor(&id, &suffix)?;
            let maturity = tenor.add_to(spot)?;
            let periods = leg_periods(
                spot,
                maturity,
                period_for(tenor),
                ctx.calendar,
                adjustment,
                index.day_count(),
            )?;
            let rate = ctx.quote(&id)?;
            Ok(CalibrationInstrument::OisSwap(OisSwap::new(
                id, tenor, index, rate, periods,
            )?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{CurveConvention, DepositConventions};
    use crate::market::{InclusionTable, QuoteTable};
    use crate::traits::testing::FlatCurve;
    use approx::assert_relative_eq;
    use parcurve_core::calendars::{BusinessDayConvention, CalendarId, WeekendCalendar};
    use parcurve_core::daycounts::DayCountConvention;
    use parcurve_core::types::{Currency, TenorUnit};

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
    }

    fn collect_for(
        curve: &str,
        convention: &CurveConvention,
        ids: &[&str],
    ) -> CurveResult<Vec<CalibrationInstrument>> {
        let anchor = d(2025, 1, 15);
        let quotes = ids
            .iter()
            .fold(QuoteTable::new(), |table, id| table.with(curve, id, anchor, 0.04));
        let inclusion = InclusionTable::new().include(curve, ids.iter().copied());
        let ctx = CollectorContext {
            curve,
            convention,
            quotes: &quotes,
            inclusion: &inclusion,
            anchor,
            calendar: &WeekendCalendar,
            discounting: None,
        };
        collect(&ctx)
    }

    fn ois<'a>(instruments: &'a [CalibrationInstrument], id: &str) -> &'a OisSwap {
        match instruments.iter().find(|i| i.id() == id) {
            Some(CalibrationInstrument::OisSwap(swap)) => swap,
            other => panic!("expected OIS {id}, got {other:?}"),
        }
    }

    #[test]
    fn test_period_for() {
        assert_eq!(period_for(Tenor::months(6)), None);
        assert_eq!(period_for(Tenor::years(1)), None);
        assert_eq!(period_for(Tenor::new(2, TenorUnit::Weeks)), None);
        assert_eq!(period_for(Tenor::months(18)), Some(Tenor::months(12)));
    }

    #[test]
    fn test_collect_schedules() {
        let instruments =
            collect_for("USD_OIS", &convention(Currency::USD), &["swaps_6M", "swaps_3YR"]).unwrap();
        let short = ois(&instruments, "swaps_6M");
        let long = ois(&instruments, "swaps_3YR");

        assert_eq!(short.periods().len(), 1);
        assert_eq!(short.start_date(), d(2025, 1, 17));
        assert_eq!(short.maturity(), d(2025, 7, 17));
        assert_eq!(long.periods().len(), 3);
        assert_eq!(long.index(), OvernightIndex::FedFunds);
    }

    #[test]
    fn test_par_rate_on_flat_curve() {
        let instruments = collect_for("EUR_OIS", &convention(Currency::EUR), &["swaps_2YR"]).unwrap();
        let swap = ois(&instruments, "swaps_2YR");
        let curve = FlatCurve {
            settlement: d(2025, 1, 17),
            rate: 0.03,
        };

        let annuity: f64 = swap
            .periods()
            .iter()
            .map(|p| curve.discount_factor(p.payment).unwrap() * p.accrual)
            .sum();
        let expected = (1.0 - curve.discount_factor(swap.maturity()).unwrap()) / annuity;
        assert_relative_eq!(swap.implied_rate(&curve).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_unsupported_currency() {
        let result = collect_for("JPY_OIS", &convention(Currency::JPY), &["swaps_1YR"]);
        assert!(matches!(
            result,
            Err(CurveError::UnsupportedCurrency { currency: Currency::JPY, .. })
        ));
    }
}
