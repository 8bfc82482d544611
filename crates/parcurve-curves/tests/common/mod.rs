//! Shared market fixture for the integration tests.
//!
//! As of Wednesday 2025-01-15 on a weekends-only calendar, so every curve
//! settles on Friday 2025-01-17.
//!
//! | Curve | Instruments | Discounting |
//! |-------|-------------|-------------|
//! | USD_OIS | ON deposit, OIS 1M..12Y | itself |
//! | USD_3M | 3M deposit, futures 2-4, swaps 2Y..10Y | USD_OIS |
//! | EUR_6M | 6M deposit, FRAs 6x12 and 12x18, swaps 2Y and 5Y | itself |
//! | GBP_OIS | ON deposit with no quote | itself |
//! | GBP_3M | 3M deposit | GBP_OIS |
//! | CHF_3M, CHF_6M | none | each other |

#![allow(dead_code)]

use parcurve_core::calendars::{BusinessDayConvention, CalendarId, WeekendsOnly};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::{Currency, Frequency};
use parcurve_core::Date;
use parcurve_curves::builder::CurveBuilder;
use parcurve_curves::conventions::{
    CurveConvention, DepositConventions, FraConventions, FutureConventions, SwapConventions,
};
use parcurve_curves::market::{ConventionTable, InclusionTable, QuoteTable};
use parcurve_curves::resolver::DualCurveResolver;
use tracing_subscriber::EnvFilter;

pub const USD_OIS: &[(&str, f64)] = &[
    ("deposits_ON", 0.0433),
    ("swaps_1M", 0.0432),
    ("swaps_3M", 0.0430),
    ("swaps_6M", 0.0420),
    ("swaps_1YR", 0.0405),
    ("swaps_2YR", 0.0380),
    ("swaps_3YR", 0.0370),
    ("swaps_5YR", 0.0368),
    ("swaps_7YR", 0.0372),
    ("swaps_10YR", 0.0380),
    ("swaps_12YR", 0.0384),
];

pub const USD_3M: &[(&str, f64)] = &[
    ("deposits_3M", 0.0445),
    ("futures_1", 95.60),
    ("futures_2", 95.70),
    ("futures_3", 95.85),
    ("futures_4", 96.00),
    ("swaps_2YR", 0.0395),
    ("swaps_3YR", 0.0390),
    ("swaps_5YR", 0.0392),
    ("swaps_7YR", 0.0398),
    ("swaps_10YR", 0.0405),
];

pub const EUR_6M: &[(&str, f64)] = &[
    ("deposits_6M", 0.0260),
    ("fras_6x12", 0.0245),
    ("fras_12x18", 0.0235),
    ("swaps_2YR", 0.0240),
    ("swaps_5YR", 0.0250),
];

/// Routes build logs to the test harness; `RUST_LOG=parcurve_curves=debug` shows node solves.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

pub fn anchor() -> Date {
    d(2025, 1, 15)
}

pub fn deposits() -> DepositConventions {
    DepositConventions {
        spot_lag: 2,
        day_count: DayCountConvention::Act360,
        adjustment: BusinessDayConvention::ModifiedFollowing,
    }
}

pub fn usd_swaps() -> SwapConventions {
    SwapConventions {
        spot_lag: None,
        fixed_frequency: Frequency::SemiAnnual,
        fixed_adjustment: BusinessDayConvention::ModifiedFollowing,
        fixed_day_count: DayCountConvention::Thirty360US,
        float_frequency: None,
        float_tenor: None,
        float_adjustment: None,
    }
}

pub fn usd_3m() -> CurveConvention {
    CurveConvention::new(Currency::USD, CalendarId::Nyse, deposits())
        .with_futures(FutureConventions {
            tenor_months: 3,
            count: 4,
            days_to_exclude: 30,
            day_count: DayCountConvention::Act360,
            adjustment: BusinessDayConvention::ModifiedFollowing,
        })
        .with_swaps(usd_swaps())
        .requiring_ois()
}

pub fn eur_6m() -> CurveConvention {
    CurveConvention::new(Currency::EUR, CalendarId::Target, deposits())
        .with_fras(FraConventions {
            spot_lag: 2,
            day_count: DayCountConvention::Act360,
            adjustment: BusinessDayConvention::ModifiedFollowing,
        })
        .with_swaps(SwapConventions {
            fixed_frequency: Frequency::Annual,
            ..usd_swaps()
        })
}

pub fn conventions() -> ConventionTable {
    ConventionTable::new()
        .with(
            "USD_OIS",
            CurveConvention::new(Currency::USD, CalendarId::Nyse, deposits()),
        )
        .unwrap()
        .with("USD_3M", usd_3m())
        .unwrap()
        .with("EUR_6M", eur_6m())
        .unwrap()
        .with(
            "GBP_OIS",
            CurveConvention::new(Currency::GBP, CalendarId::London, deposits()),
        )
        .unwrap()
        .with(
            "GBP_3M",
            CurveConvention::new(Currency::GBP, CalendarId::London, deposits()).requiring_ois(),
        )
        .unwrap()
        .with(
            "CHF_3M",
            CurveConvention::new(Currency::CHF, CalendarId::WeekendsOnly, deposits())
                .discounted_by("CHF_6M"),
        )
        .unwrap()
        .with(
            "CHF_6M",
            CurveConvention::new(Currency::CHF, CalendarId::WeekendsOnly, deposits())
                .discounted_by("CHF_3M"),
        )
        .unwrap()
}

pub fn quotes() -> QuoteTable {
    let mut quotes = QuoteTable::new();
    for (curve, table) in [("USD_OIS", USD_OIS), ("USD_3M", USD_3M), ("EUR_6M", EUR_6M)] {
        for (id, value) in table {
            quotes.insert(curve, id, anchor(), *value);
        }
    }
    quotes.insert("GBP_3M", "deposits_3M", anchor(), 0.047);
    quotes
}

pub fn inclusion() -> InclusionTable {
    let ids = |table: &'static [(&'static str, f64)]| table.iter().map(|(id, _)| *id);
    InclusionTable::new()
        .include("USD_OIS", ids(USD_OIS))
        .include("USD_3M", ids(USD_3M))
        .include("EUR_6M", ids(EUR_6M))
        .include("GBP_OIS", ["deposits_ON"])
        .include("GBP_3M", ["deposits_3M"])
}

/// Owns the market lookups the builders borrow.
pub struct Market {
    pub conventions: ConventionTable,
    pub quotes: QuoteTable,
    pub inclusion: InclusionTable,
}

impl Market {
    pub fn new() -> Self {
        init_tracing();
        Self {
            conventions: conventions(),
            quotes: quotes(),
            inclusion: inclusion(),
        }
    }

    pub fn builder(&self) -> CurveBuilder<'_> {
        CurveBuilder::new(
            anchor(),
            &self.conventions,
            &self.quotes,
            &self.inclusion,
            &WeekendsOnly,
        )
    }

    pub fn resolver(&self) -> DualCurveResolver<'_> {
        DualCurveResolver::new(self.builder())
    }
}
