//! Property tests for date arithmetic, calendars and day counts.

use parcurve_core::prelude::*;
use proptest::prelude::*;

fn date_strategy() -> impl Strategy<Value = Date> {
    (2000i32..2080i32, 1u32..13u32, 1u32..32u32)
        .prop_filter_map("valid date", |(y, m, d)| Date::from_ymd(y, m, d).ok())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn month_shift_never_overflows_month(date in date_strategy(), months in -240i32..240) {
        let shifted = date.add_months(months).unwrap();
        let total = date.year() * 12 + date.month() as i32 - 1 + months;
        prop_assert_eq!(shifted.year(), total.div_euclid(12));
        prop_assert_eq!(shifted.month() as i32, total.rem_euclid(12) + 1);
        prop_assert!(shifted.day() <= date.day());
    }

    #[test]
    fn anchored_31st_lands_on_month_end(date in date_strategy(), months in 1i32..120) {
        let shifted = date.add_months_anchored(months, 31).unwrap();
        prop_assert!(shifted.is_end_of_month());
    }

    #[test]
    fn modified_following_stays_in_month(date in date_strategy()) {
        let adjusted = WeekendCalendar
            .adjust(date, BusinessDayConvention::ModifiedFollowing)
            .unwrap();
        prop_assert!(WeekendCalendar.is_business_day(adjusted));
        prop_assert_eq!(adjusted.month(), date.month());
        prop_assert!((adjusted - date).abs() <= 2);
    }

    #[test]
    fn business_day_round_trip(date in date_strategy(), n in 1i32..40) {
        let start = WeekendCalendar.next_business_day(date);
        let forward = WeekendCalendar.add_business_days(start, n);
        prop_assert_eq!(WeekendCalendar.business_days_between(start, forward), n);
        prop_assert_eq!(WeekendCalendar.add_business_days(forward, -n), start);
    }

    #[test]
    fn year_fractions_are_antisymmetric(start in date_strategy(), end in date_strategy()) {
        for convention in DayCountConvention::all() {
            let forward = convention.fraction(start, end);
            let backward = convention.fraction(end, start);
            if *convention != DayCountConvention::Thirty360US {
                prop_assert!((forward + backward).abs() < 1e-12);
            }
            if start <= end {
                prop_assert!(forward >= 0.0);
            }
        }
    }
}

#[test]
fn conventions_serialize_as_json() {
    let dc: DayCountConvention = serde_json::from_str("\"Act365Fixed\"").unwrap();
    assert_eq!(dc, DayCountConvention::Act365Fixed);

    let date = Date::from_ymd(2011, 11, 11).unwrap();
    assert_eq!(serde_json::to_string(&date).unwrap(), "\"2011-11-11\"");

    let bdc = serde_json::to_string(&BusinessDayConvention::ModifiedFollowing).unwrap();
    assert_eq!(bdc, "\"ModifiedFollowing\"");
}
