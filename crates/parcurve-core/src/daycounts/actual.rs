//! Actual-day conventions: ACT/360, ACT/365F and ACT/ACT ISDA.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/360.
///
/// Money market basis for USD, EUR, CHF, JPY and most overnight indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Fixed.
///
/// Money market basis for GBP, AUD, NZD and CAD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ISDA.
///
/// Splits the period at year boundaries; days in leap years count over 366.
///
/// $$\text{YF} = \frac{\text{days in non-leap years}}{365} + \frac{\text{days in leap years}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if end < start {
            return -self.year_fraction(end, start);
        }

        let mut total = Decimal::ZERO;
        let mut current = start.as_naive_date();
        let end = end.as_naive_date();

        while current < end {
            let year = chrono::Datelike::year(&current);
            let next_year = chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap_or(end);
            let stop = next_year.min(end);
            let days = (stop - current).num_days();
            let basis = if Date::from(current).is_leap_year() { 366 } else { 365 };

            total += Decimal::from(days) / Decimal::from(basis);
            current = stop;
        }

        total
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
