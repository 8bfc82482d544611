//! Builds named curves from conventions, quotes and inclusion flags.
//!
//! [`CurveBuilder`] wires the market lookups to the collectors and the
//! [`BootstrapSolver`]. It builds one curve at a time and never resolves
//! dependencies itself: a curve that discounts off another curve must be
//! handed that curve. [`crate::resolver::DualCurveResolver`] does the ordering.
//!
//! # Example
//!
//! ```rust
//! use parcurve_core::calendars::{BusinessDayConvention, CalendarId, WeekendsOnly};
//! use parcurve_core::daycounts::DayCountConvention;
//! use parcurve_core::{Currency, Date};
//! use parcurve_curves::builder::CurveBuilder;
//! use parcurve_curves::conventions::{CurveConvention, DepositConventions};
//! use parcurve_curves::market::{ConventionTable, InclusionTable, QuoteTable};
//!
//! let anchor = Date::from_ymd(2025, 1, 15).unwrap();
//! let conventions = ConventionTable::new()
//!     .with(
//!         "USD_OIS",
//!         CurveConvention::new(
//!             Currency::USD,
//!             CalendarId::WeekendsOnly,
//!             DepositConventions {
//!                 spot_lag: 2,
//!                 day_count: DayCountConvention::Act360,
//!                 adjustment: BusinessDayConvention::ModifiedFollowing,
//!             },
//!         ),
//!     )
//!     .unwrap();
//! let quotes = QuoteTable::new()
//!     .with("USD_OIS", "deposits_1M", anchor, 0.043)
//!     .with("USD_OIS", "deposits_3M", anchor, 0.044);
//! let inclusion = InclusionTable::new().include("USD_OIS", ["deposits_1M", "deposits_3M"]);
//!
//! let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &WeekendsOnly);
//! let curve = builder.build("USD_OIS", None).unwrap();
//! assert_eq!(curve.nodes().len(), 3);
//! ```

use std::sync::Arc;

use tracing::debug;

use parcurve_core::calendars::CalendarProvider;
use parcurve_core::Date;

use crate::bootstrap::{BootstrapConfig, BootstrapSolver, CurveSetup};
use crate::conventions::CurveConvention;
use crate::curve::YieldCurve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::{collect_all, CalibrationInstrument, CollectorContext};
use crate::market::{ConventionSet, InstrumentInclusionTable, MarketQuoteStore};
use crate::repricing::BootstrapResult;
use crate::validation::Validate;

/// Builds single curves as of one anchor date.
///
/// The builder borrows its lookups and is `Send + Sync`, so one builder can
/// serve every curve of a batch in parallel.
#[derive(Clone, Copy)]
pub struct CurveBuilder<'a> {
    anchor: Date,
    conventions: &'a dyn ConventionSet,
    quotes: &'a dyn MarketQuoteStore,
    inclusion: &'a dyn InstrumentInclusionTable,
    calendars: &'a dyn CalendarProvider,
    config: BootstrapConfig,
}

impl<'a> CurveBuilder<'a> {
    /// Creates a builder with the default [`BootstrapConfig`].
    #[must_use]
    pub fn new(
        anchor: Date,
        conventions: &'a dyn ConventionSet,
        quotes: &'a dyn MarketQuoteStore,
        inclusion: &'a dyn InstrumentInclusionTable,
        calendars: &'a dyn CalendarProvider,
    ) -> Self {
        Self {
            anchor,
            conventions,
            quotes,
            inclusion,
            calendars,
            config: BootstrapConfig::default(),
        }
    }

    /// Replaces the solver settings.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Curve (as-of) date.
    #[must_use]
    pub fn anchor(&self) -> Date {
        self.anchor
    }

    /// Convention lookup.
    #[must_use]
    pub fn conventions(&self) -> &'a dyn ConventionSet {
        self.conventions
    }

    /// Solver settings.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Conventions of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] if the curve is unknown.
    pub fn convention(&self, name: &str) -> CurveResult<&'a CurveConvention> {
        self.conventions
            .convention(name)
            .ok_or_else(|| CurveError::configuration(format!("no conventions for curve {name}")))
    }

    /// Name of the curve `name` discounts its swaps off, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] if the curve is unknown.
    pub fn dependency(&self, name: &str) -> CurveResult<Option<String>> {
        Ok(self.convention(name)?.discounting_curve())
    }

    /// The anchor advanced by the deposit spot lag on the curve calendar.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] for an unknown curve or calendar.
    pub fn settlement_date(&self, name: &str) -> CurveResult<Date> {
        let convention = self.convention(name)?;
        let calendar = self.calendars.require(convention.calendar)?;
        let lag = i32::try_from(convention.deposits.spot_lag).unwrap_or(i32::MAX);
        Ok(calendar.add_business_days(self.anchor, lag))
    }

    /// Collects the calibration instruments of `name` in collector order.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] for an unknown curve, calendar,
    /// malformed id, missing quote or missing discounting curve, and
    /// [`CurveError::UnsupportedCurrency`] if the currency has no index.
    pub fn collect(
        &self,
        name: &str,
        discounting: Option<Arc<YieldCurve>>,
    ) -> CurveResult<Vec<CalibrationInstrument>> {
        let convention = self.convention(name)?;
        convention.validate_or_error()?;
        let calendar = self.calendars.require(convention.calendar)?;

        let ctx = CollectorContext {
            curve: name,
            convention,
            quotes: self.quotes,
            inclusion: self.inclusion,
            anchor: self.anchor,
            calendar,
            discounting,
        };
        let instruments = collect_all(&ctx)?;
        debug!(
            curve = name,
            kind = %convention.kind_for(name),
            instruments = instruments.len(),
            "collected instruments"
        );
        Ok(instruments)
    }

    /// Builds `name`, discounting its swaps off `discounting` when required.
    ///
    /// # Errors
    ///
    /// Any collector or bootstrap error for this curve, including
    /// [`CurveError::BootstrapNonConvergence`] when repricing misses tolerance.
    pub fn build(
        &self,
        name: &str,
        discounting: Option<Arc<YieldCurve>>,
    ) -> CurveResult<YieldCurve> {
        self.build_validated(name, discounting)?.into_curve()
    }

    /// Builds `name` and returns the curve with its repricing report.
    ///
    /// # Errors
    ///
    /// As [`CurveBuilder::build`], except for repricing misses.
    pub fn build_validated(
        &self,
        name: &str,
        discounting: Option<Arc<YieldCurve>>,
    ) -> CurveResult<BootstrapResult<YieldCurve>> {
        let convention = self.convention(name)?;
        let instruments = self.collect(name, discounting)?;
        let setup = CurveSetup::new(
            name,
            self.settlement_date(name)?,
            convention.deposits.day_count,
        )
        .with_compounding(convention.compounding);

        let config = match convention.interpolation {
            Some(method) => self.config.with_interpolation(method),
            None => self.config,
        };
        BootstrapSolver::new(config).bootstrap_validated(&setup, instruments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{DepositConventions, SwapConventions};
    use crate::curve::InterpolationMethod;
    use crate::market::{ConventionTable, InclusionTable, QuoteTable};
    use crate::traits::Curve;
    use approx::assert_relative_eq;
    use parcurve_core::calendars::{
        BusinessDayConvention, CalendarId, CalendarTable, HolidayCalendar, WeekendsOnly,
    };
    use parcurve_core::daycounts::DayCountConvention;
    use parcurve_core::types::{Currency, Frequency};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn deposits() -> DepositConventions {
        DepositConventions {
            spot_lag: 2,
            day_count: DayCountConvention::Act360,
            adjustment: BusinessDayConvention::ModifiedFollowing,
        }
    }

    fn swaps() -> SwapConventions {
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

    fn conventions() -> ConventionTable {
        ConventionTable::new()
            .with(
                "USD_OIS",
                CurveConvention::new(Currency::USD, CalendarId::Nyse, deposits()),
            )
            .unwrap()
            .with(
                "USD_3M",
                CurveConvention::new(Currency::USD, CalendarId::Nyse, deposits())
                    .with_swaps(swaps())
                    .requiring_ois(),
            )
            .unwrap()
    }

    fn market(anchor: Date) -> (QuoteTable, InclusionTable) {
        let quotes = QuoteTable::new()
            .with("USD_OIS", "deposits_ON", anchor, 0.0430)
            .with("USD_OIS", "swaps_1YR", anchor, 0.0420)
            .with("USD_OIS", "swaps_2YR", anchor, 0.0400)
            .with("USD_OIS", "swaps_3YR", anchor, 0.0390)
            .with("USD_3M", "deposits_3M", anchor, 0.0450)
            .with("USD_3M", "swaps_2YR", anchor, 0.0410)
            .with("USD_3M", "swaps_3YR", anchor, 0.0400);
        let inclusion = InclusionTable::new()
            .include("USD_OIS", ["deposits_ON", "swaps_1YR", "swaps_2YR", "swaps_3YR"])
            .include("USD_3M", ["deposits_3M", "swaps_2YR", "swaps_3YR"]);
        (quotes, inclusion)
    }

    #[test]
    fn test_settlement_uses_curve_calendar() {
        let anchor = d(2025, 1, 15);
        let conventions = conventions();
        let (quotes, inclusion) = market(anchor);
        // Jan 16 is a holiday on this calendar, so spot moves to Monday.
        let calendars = CalendarTable::new().with(
            CalendarId::Nyse,
            HolidayCalendar::new("test", [d(2025, 1, 16)]),
        );
        let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &calendars);
        assert_eq!(builder.settlement_date("USD_OIS").unwrap(), d(2025, 1, 20));

        let weekends = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &WeekendsOnly);
        assert_eq!(weekends.settlement_date("USD_OIS").unwrap(), d(2025, 1, 17));
    }

    #[test]
    fn test_unknown_curve_and_calendar() {
        let anchor = d(2025, 1, 15);
        let conventions = conventions();
        let (quotes, inclusion) = market(anchor);
        let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &WeekendsOnly);
        assert!(matches!(
            builder.build("GBP_OIS", None),
            Err(CurveError::Configuration { .. })
        ));

        let empty = CalendarTable::new();
        let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &empty);
        assert!(matches!(
            builder.settlement_date("USD_OIS"),
            Err(CurveError::Configuration { .. })
        ));
    }

    #[test]
    fn test_build_overnight_curve() {
        let anchor = d(2025, 1, 15);
        let conventions = conventions();
        let (quotes, inclusion) = market(anchor);
        let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &WeekendsOnly);

        let result = builder.build_validated("USD_OIS", None).unwrap();
        assert!(result.is_valid());
        let curve = result.curve();
        assert_eq!(curve.name(), "USD_OIS");
        assert_eq!(curve.settlement_date(), d(2025, 1, 17));
        assert_relative_eq!(
            curve.discount_factor(d(2025, 1, 17)).unwrap(),
            1.0,
            epsilon = 1e-15
        );
        // Settlement knot plus one node per instrument.
        assert_eq!(curve.nodes().len(), 5);
    }

    #[test]
    fn test_term_curve_needs_discounting_curve() {
        let anchor = d(2025, 1, 15);
        let conventions = conventions();
        let (quotes, inclusion) = market(anchor);
        let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &WeekendsOnly);

        assert_eq!(builder.dependency("USD_3M").unwrap().as_deref(), Some("USD_OIS"));
        assert_eq!(builder.dependency("USD_OIS").unwrap(), None);
        assert!(matches!(
            builder.build("USD_3M", None),
            Err(CurveError::Configuration { .. })
        ));

        let ois = Arc::new(builder.build("USD_OIS", None).unwrap());
        let projection = builder.build("USD_3M", Some(ois)).unwrap();
        assert_eq!(projection.nodes().len(), 4);
    }

    #[test]
    fn test_interpolation_override() {
        let anchor = d(2025, 1, 15);
        let conventions = ConventionTable::new()
            .with(
                "USD_OIS",
                CurveConvention::new(Currency::USD, CalendarId::Nyse, deposits())
                    .with_interpolation(InterpolationMethod::Linear),
            )
            .unwrap();
        let (quotes, inclusion) = market(anchor);
        let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &WeekendsOnly);

        let curve = builder.build("USD_OIS", None).unwrap();
        assert_eq!(curve.interpolation(), InterpolationMethod::Linear);
        assert_eq!(
            builder.config().interpolation,
            InterpolationMethod::CubicSpline
        );
    }
}
