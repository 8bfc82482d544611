//! 30/360 US (bond basis).

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

#[inline]
fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

/// 30/360 US day count convention.
///
/// Fixed legs of USD swaps are quoted on this basis. Day adjustments:
///
/// 1. D1 on the last day of February, or on the 31st, becomes 30.
/// 2. D2 on the last day of February becomes 30 when D1 was too.
/// 3. D2 on the 31st becomes 30 once D1 is 30.
///
/// $$\text{Days} = 360 (Y_2 - Y_1) + 30 (M_2 - M_1) + (D_2 - D_1)$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let y1 = i64::from(start.year());
        let y2 = i64::from(end.year());
        let m1 = i64::from(start.month());
        let m2 = i64::from(end.month());
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        let start_feb_eom = is_last_day_of_february(start);
        if start_feb_eom || d1 == 31 {
            d1 = 30;
        }

        if start_feb_eom && is_last_day_of_february(end) {
            d2 = 30;
        } else if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
    }
}
