//! Interest-rate futures.
//!
//! Futures are quoted as `Price = 100 - Rate`. Contracts expire on IMM dates
//! (third Wednesday of March, June, September and December); each one accrues
//! from its IMM date for the configured number of months.

use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::Date;

use super::{CalibrationInstrument, CollectorContext};
use crate::error::CurveResult;
use crate::traits::Curve;

/// Instrument class prefix of futures ids.
const CLASS: &str = "futures";

const IMM_MONTHS: [u32; 4] = [3, 6, 9, 12];

/// Wednesday, counted from Monday = 0.
const WEDNESDAY: i64 = 2;

/// An interest-rate future.
///
/// # Pricing Convention
///
/// ```text
/// Rate = (100 - Price) / 100
/// ```
///
/// Example: price 94.75 implies a rate of 5.25%. The convexity adjustment is
/// zero, so the futures rate is used as the forward rate directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Future {
    id: String,
    price: f64,
    start_date: Date,
    end_date: Date,
    day_count: DayCountConvention,
}

impl Future {
    /// Creates a future from its quoted price.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        price: f64,
        start_date: Date,
        end_date: Date,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            id: id.into(),
            price,
            start_date,
            end_date,
            day_count,
        }
    }

    /// Instrument id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Quoted price.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Futures rate implied by the price.
    #[must_use]
    pub fn rate(&self) -> f64 {
        (100.0 - self.price) / 100.0
    }

    /// Accrual start (the rolled IMM date).
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Accrual end.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Year fraction of the accrual period.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.fraction(self.start_date, self.end_date)
    }

    /// Forward rate implied by `curve` over the contract period.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn implied_rate(&self, curve: &dyn Curve) -> CurveResult<f64> {
        curve.forward_rate(self.start_date, self.end_date, self.day_count)
    }

    /// Discount factor at the accrual end that reprices the contract.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn discount_factor_from(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_start = curve.discount_factor(self.start_date)?;
        Ok(df_start / (1.0 + self.rate() * self.year_fraction()))
    }
}

/// Third Wednesday of `month` in `year`.
///
/// # Errors
///
/// Returns [`crate::CurveError::Configuration`] for an invalid month.
pub fn imm_date(year: i32, month: u32) -> CurveResult<Date> {
    let first = Date::from_ymd(year, month, 1)?;
    let weekday = i64::from(first.weekday().num_days_from_monday());
    let to_first_wednesday = (WEDNESDAY - weekday).rem_euclid(7);
    Ok(first.add_days(to_first_wednesday + 14))
}

/// First IMM date strictly after `date`.
///
/// # Errors
///
/// Returns an error only if the date arithmetic leaves the supported range.
pub fn next_imm_date(date: Date) -> CurveResult<Date> {
    for month in IMM_MONTHS {
        let imm = imm_date(date.year(), month)?;
        if imm > date {
            return Ok(imm);
        }
    }
    imm_date(date.year() + 1, IMM_MONTHS[0])
}

/// The `count` consecutive IMM dates following `date`.
///
/// # Errors
///
/// Returns an error only if the date arithmetic leaves the supported range.
pub fn next_imm_dates(date: Date, count: usize) -> CurveResult<Vec<Date>> {
    let mut dates = Vec::with_capacity(count);
    let mut current = date;
    while dates.len() < count {
        current = next_imm_date(current)?;
        dates.push(current);
    }
    Ok(dates)
}

/// Collects the futures strip for the context's curve.
///
/// The strip holds the next `count` IMM contracts after the anchor date. One
/// contract is dropped: the first when it expires more than `days_to_exclude`
/// days after the anchor, the last otherwise. Surviving contracts keep their
/// `futures_<n>` id in IMM order. Curves without futures conventions have no
/// futures.
///
/// # Errors
///
/// Returns [`crate::CurveError::Configuration`] for a missing quote.
pub fn collect(ctx: &CollectorContext<'_>) -> CurveResult<Vec<CalibrationInstrument>> {
    let Some(conventions) = ctx.convention.futures.as_ref() else {
        return Ok(Vec::new());
    };

    let count = usize::try_from(conventions.count).unwrap_or(usize::MAX);
    let dates = next_imm_dates(ctx.anchor, count)?;
    let mut strip: Vec<(usize, Date)> = dates
        .into_iter()
        .enumerate()
        .map(|(i, imm)| (i + 1, imm))
        .collect();

    match strip.first() {
        Some(&(_, first)) if first - ctx.anchor > conventions.days_to_exclude => {
            strip.remove(0);
        }
        Some(_) => {
            strip.pop();
        }
        None => {}
    }

    let tenor_months = i32::try_from(conventions.tenor_months).unwrap_or(i32::MAX);
    strip
        .into_iter()
        .map(|(n, imm)| {
            let id = format!("{CLASS}_{n}");
            let start = ctx.adjust(imm, conventions.adjustment)?;
            let end = ctx.adjust(imm.add_months(tenor_months)?, conventions.adjustment)?;
            let price = ctx.quote(&id)?;
            Ok(CalibrationInstrument::Future(Future::new(
                id,
                price,
                start,
                end,
                conventions.day_count,
            )))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{CurveConvention, DepositConventions, FutureConventions};
    use crate::market::{InclusionTable, QuoteTable};
    use crate::traits::testing::FlatCurve;
    use approx::assert_relative_eq;
    use parcurve_core::calendars::{BusinessDayConvention, CalendarId, WeekendCalendar};
    use parcurve_core::types::Currency;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn convention(days_to_exclude: i64) -> CurveConvention {
        CurveConvention::new(
            Currency::USD,
            CalendarId::WeekendsOnly,
            DepositConventions {
                spot_lag: 2,
                day_count: DayCountConvention::Act360,
                adjustment: BusinessDayConvention::ModifiedFollowing,
            },
        )
        .with_futures(FutureConventions {
            tenor_months: 3,
            count: 4,
            days_to_exclude,
            day_count: DayCountConvention::Act360,
            adjustment: BusinessDayConvention::ModifiedFollowing,
        })
    }

    fn quotes(anchor: Date) -> QuoteTable {
        (1..=4).fold(QuoteTable::new(), |table, n| {
            table.with("USD_3M", &format!("futures_{n}"), anchor, 95.0 - 0.1 * f64::from(n))
        })
    }

    fn collect_with(convention: &CurveConvention, quotes: &QuoteTable, anchor: Date) -> Vec<CalibrationInstrument> {
        let inclusion = InclusionTable::new();
        let ctx = CollectorContext {
            curve: "USD_3M",
            convention,
            quotes,
            inclusion: &inclusion,
            anchor,
            calendar: &WeekendCalendar,
            discounting: None,
        };
        collect(&ctx).unwrap()
    }

    #[test]
    fn test_imm_date() {
        assert_eq!(imm_date(2025, 3).unwrap(), d(2025, 3, 19));
        assert_eq!(imm_date(2025, 6).unwrap(), d(2025, 6, 18));
        assert_eq!(imm_date(2025, 10).unwrap(), d(2025, 10, 15));
        assert!(imm_date(2025, 13).is_err());
    }

    #[test]
    fn test_next_imm_date_is_strictly_after() {
        assert_eq!(next_imm_date(d(2025, 3, 19)).unwrap(), d(2025, 6, 18));
        assert_eq!(next_imm_date(d(2025, 3, 18)).unwrap(), d(2025, 3, 19));
        assert_eq!(next_imm_date(d(2025, 12, 20)).unwrap(), d(2026, 3, 18));
    }

    #[test]
    fn test_next_imm_dates() {
        let dates = next_imm_dates(d(2025, 1, 15), 4).unwrap();
        let months: Vec<u32> = dates.iter().map(Date::month).collect();
        assert_eq!(months, vec![3, 6, 9, 12]);
    }

    #[test]
    fn test_rate_from_price() {
        let future = Future::new("futures_1", 94.75, d(2025, 3, 19), d(2025, 6, 19), DayCountConvention::Act360);
        assert_relative_eq!(future.rate(), 0.0525, epsilon = 1e-12);
    }

    #[test]
    fn test_closed_form_reprices() {
        let curve = FlatCurve {
            settlement: d(2025, 1, 15),
            rate: 0.04,
        };
        let future = Future::new("futures_1", 95.5, d(2025, 3, 19), d(2025, 6, 19), DayCountConvention::Act360);
        let df_end = future.discount_factor_from(&curve).unwrap();
        let df_start = curve.discount_factor(d(2025, 3, 19)).unwrap();
        let implied = (df_start / df_end - 1.0) / future.year_fraction();
        assert_relative_eq!(implied, 0.045, epsilon = 1e-13);
    }

    #[test]
    fn test_collect_drops_first_when_far() {
        // First IMM (2025-03-19) is 63 days out.
        let anchor = d(2025, 1, 15);
        let instruments = collect_with(&convention(30), &quotes(anchor), anchor);

        let ids: Vec<&str> = instruments.iter().map(CalibrationInstrument::id).collect();
        assert_eq!(ids, vec!["futures_2", "futures_3", "futures_4"]);
        assert_eq!(instruments[0].maturity(), d(2025, 9, 18));
        assert_relative_eq!(instruments[0].quoted_rate(), 0.052, epsilon = 1e-12);
    }

    #[test]
    fn test_collect_drops_last_when_near() {
        let anchor = d(2025, 1, 15);
        let instruments = collect_with(&convention(90), &quotes(anchor), anchor);

        let ids: Vec<&str> = instruments.iter().map(CalibrationInstrument::id).collect();
        assert_eq!(ids, vec!["futures_1", "futures_2", "futures_3"]);
        // 2025-06-19 is a Thursday
        assert_eq!(instruments[0].maturity(), d(2025, 6, 19));
    }

    #[test]
    fn test_collect_without_futures_section() {
        let anchor = d(2025, 1, 15);
        let mut convention = convention(30);
        convention.futures = None;
        assert!(collect_with(&convention, &quotes(anchor), anchor).is_empty());
    }
}
