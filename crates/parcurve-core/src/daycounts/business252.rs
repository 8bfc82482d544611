//! Business/252 day count.

use rust_decimal::Decimal;

use super::DayCount;
use crate::calendars::{Calendar, WeekendCalendar};
use crate::types::Date;

/// Business/252 counted on a weekends-only calendar.
///
/// The Brazilian market variant needs the ANBIMA holiday table, which callers
/// supply through [`Business252::year_fraction_on`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Business252;

impl Business252 {
    /// Year fraction counting business days on `calendar`.
    pub fn year_fraction_on(&self, calendar: &dyn Calendar, start: Date, end: Date) -> Decimal {
        Decimal::from(signed_business_days(calendar, start, end)) / Decimal::from(252)
    }
}

fn signed_business_days(calendar: &dyn Calendar, start: Date, end: Date) -> i64 {
    if end < start {
        -i64::from(calendar.business_days_between(end, start))
    } else {
        i64::from(calendar.business_days_between(start, end))
    }
}

impl DayCount for Business252 {
    fn name(&self) -> &'static str {
        "BUS/252"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        self.year_fraction_on(&WeekendCalendar, start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        signed_business_days(&WeekendCalendar, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::HolidayCalendar;
    use rust_decimal_macros::dec;

    #[test]
    fn test_counts_weekdays() {
        // Mon 2025-01-06 to Mon 2025-01-13: 5 business days
        let start = Date::from_ymd(2025, 1, 6).unwrap();
        let end = Date::from_ymd(2025, 1, 13).unwrap();

        assert_eq!(Business252.day_count(start, end), 5);
        assert_eq!(Business252.year_fraction(start, end), dec!(5) / dec!(252));
        assert_eq!(Business252.day_count(end, start), -5);
    }

    #[test]
    fn test_holiday_calendar_variant() {
        let start = Date::from_ymd(2025, 1, 6).unwrap();
        let end = Date::from_ymd(2025, 1, 13).unwrap();
        let cal = HolidayCalendar::new("BRL", [Date::from_ymd(2025, 1, 8).unwrap()]);

        assert_eq!(Business252.year_fraction_on(&cal, start, end), dec!(4) / dec!(252));
    }
}
