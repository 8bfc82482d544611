//! Calibration instruments and the collectors that produce them.
//!
//! Each collector turns one instrument class of a curve's market data into
//! [`CalibrationInstrument`]s:
//!
//! | Collector | Ids | Quote |
//! |-----------|-----|-------|
//! | [`deposit::collect`] | `deposits_ON`, `deposits_3M` | simple rate |
//! | [`future::collect`] | `futures_1` .. `futures_<count>` | price (100 - rate) |
//! | [`fra::collect`] | `fras_3x6` | simple rate |
//! | [`swap::collect`] | `swaps_5YR` | par rate |
//! | [`ois::collect`] | `swaps_1YR` on overnight curves | par rate |
//!
//! Collectors are pure functions of a [`CollectorContext`]; the bootstrap
//! sorts their combined output by maturity.

pub mod deposit;
pub mod fra;
pub mod future;
pub mod ois;
pub mod swap;

pub use deposit::Deposit;
pub use fra::Fra;
pub use future::{imm_date, next_imm_date, next_imm_dates, Future};
pub use ois::OisSwap;
pub use swap::Swap;

use std::fmt;
use std::sync::Arc;

use parcurve_core::calendars::{BusinessDayConvention, Calendar};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::{Tenor, TenorUnit};
use parcurve_core::Date;

use crate::conventions::{CurveConvention, CurveKind};
use crate::curve::YieldCurve;
use crate::error::{CurveError, CurveResult};
use crate::market::{InstrumentInclusionTable, MarketQuoteStore};
use crate::schedule::{Schedule, ScheduleSpec};
use crate::traits::Curve;

/// Instrument class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentType {
    /// Money market deposit
    Deposit,
    /// Interest-rate future
    Future,
    /// Forward rate agreement
    Fra,
    /// Term interest-rate swap
    Swap,
    /// Overnight-index swap
    OisSwap,
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstrumentType::Deposit => "Deposit",
            InstrumentType::Future => "Future",
            InstrumentType::Fra => "FRA",
            InstrumentType::Swap => "Swap",
            InstrumentType::OisSwap => "OIS",
        };
        write!(f, "{name}")
    }
}

/// An instrument the bootstrap solves a node for.
#[derive(Debug, Clone)]
pub enum CalibrationInstrument {
    /// Money market deposit.
    Deposit(Deposit),
    /// Interest-rate future.
    Future(Future),
    /// Forward rate agreement.
    Fra(Fra),
    /// Term swap.
    Swap(Swap),
    /// Overnight-index swap.
    OisSwap(OisSwap),
}

impl CalibrationInstrument {
    /// Instrument id, e.g. `deposits_3M`.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Deposit(i) => i.id(),
            Self::Future(i) => i.id(),
            Self::Fra(i) => i.id(),
            Self::Swap(i) => i.id(),
            Self::OisSwap(i) => i.id(),
        }
    }

    /// Instrument class.
    #[must_use]
    pub fn instrument_type(&self) -> InstrumentType {
        match self {
            Self::Deposit(_) => InstrumentType::Deposit,
            Self::Future(_) => InstrumentType::Future,
            Self::Fra(_) => InstrumentType::Fra,
            Self::Swap(_) => InstrumentType::Swap,
            Self::OisSwap(_) => InstrumentType::OisSwap,
        }
    }

    /// The date whose node this instrument determines.
    #[must_use]
    pub fn maturity(&self) -> Date {
        match self {
            Self::Deposit(i) => i.end_date(),
            Self::Future(i) => i.end_date(),
            Self::Fra(i) => i.end_date(),
            Self::Swap(i) => i.maturity(),
            Self::OisSwap(i) => i.maturity(),
        }
    }

    /// Quoted rate; futures prices are converted to rates.
    #[must_use]
    pub fn quoted_rate(&self) -> f64 {
        match self {
            Self::Deposit(i) => i.rate(),
            Self::Future(i) => i.rate(),
            Self::Fra(i) => i.rate(),
            Self::Swap(i) => i.rate(),
            Self::OisSwap(i) => i.rate(),
        }
    }

    /// Rate the instrument would quote under `curve`.
    ///
    /// Swaps with an attached discounting curve project off `curve` and
    /// discount off their own curve.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn implied_rate(&self, curve: &dyn Curve) -> CurveResult<f64> {
        match self {
            Self::Deposit(i) => i.implied_rate(curve),
            Self::Future(i) => i.implied_rate(curve),
            Self::Fra(i) => i.implied_rate(curve),
            Self::Swap(i) => i.implied_rate(curve),
            Self::OisSwap(i) => i.implied_rate(curve),
        }
    }

    /// Closed-form discount factor at maturity given the discount factor at
    /// the accrual start on `curve`; `None` for swaps.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn closed_form_discount_factor(&self, curve: &dyn Curve) -> CurveResult<Option<f64>> {
        match self {
            Self::Deposit(i) => i.discount_factor_from(curve).map(Some),
            Self::Future(i) => i.discount_factor_from(curve).map(Some),
            Self::Fra(i) => i.discount_factor_from(curve).map(Some),
            Self::Swap(_) | Self::OisSwap(_) => Ok(None),
        }
    }

    /// External discounting curve and the last date it must cover.
    #[must_use]
    pub fn discounting(&self) -> Option<(&Arc<YieldCurve>, Date)> {
        match self {
            Self::Swap(swap) => swap.discounting().map(|curve| (curve, swap.last_payment())),
            _ => None,
        }
    }
}

/// Inputs shared by all collectors for one curve build.
pub struct CollectorContext<'a> {
    /// Curve being built.
    pub curve: &'a str,
    /// Its conventions.
    pub convention: &'a CurveConvention,
    /// Quote lookup.
    pub quotes: &'a dyn MarketQuoteStore,
    /// Inclusion flags.
    pub inclusion: &'a dyn InstrumentInclusionTable,
    /// Curve (as-of) date.
    pub anchor: Date,
    /// Resolved holiday calendar.
    pub calendar: &'a dyn Calendar,
    /// Fully built discounting curve for swaps, when the convention requires one.
    pub discounting: Option<Arc<YieldCurve>>,
}

impl CollectorContext<'_> {
    /// The anchor date advanced by `lag` business days.
    #[must_use]
    pub fn spot_date(&self, lag: u32) -> Date {
        self.calendar
            .add_business_days(self.anchor, i32::try_from(lag).unwrap_or(i32::MAX))
    }

    /// Quote of `instrument` as of the anchor date.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] if the quote is missing or not finite.
    pub fn quote(&self, instrument: &str) -> CurveResult<f64> {
        self.quotes
            .quote(self.curve, instrument, self.anchor)
            .filter(|q| q.is_finite())
            .ok_or_else(|| {
                CurveError::configuration(format!(
                    "no quote for {instrument} on {} as of {}",
                    self.curve, self.anchor
                ))
            })
    }

    /// Ids of `class` flagged for inclusion, paired with their suffix.
    #[must_use]
    pub fn selected(&self, class: &str) -> Vec<(String, String)> {
        self.inclusion
            .selected(self.curve, class)
            .into_iter()
            .filter_map(|id| {
                let suffix = id.strip_prefix(class)?.strip_prefix('_')?.to_string();
                Some((id, suffix))
            })
            .collect()
    }

    /// Rolls `date` on the curve calendar.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] if the calendar cannot roll the date.
    pub fn adjust(&self, date: Date, convention: BusinessDayConvention) -> CurveResult<Date> {
        Ok(self.calendar.adjust(date, convention)?)
    }
}

/// Signature shared by every collector.
pub type Collector = fn(&CollectorContext<'_>) -> CurveResult<Vec<CalibrationInstrument>>;

static TERM_COLLECTORS: [Collector; 4] = [deposit::collect, future::collect, fra::collect, swap::collect];
static OVERNIGHT_COLLECTORS: [Collector; 2] = [deposit::collect, ois::collect];

/// Collectors feeding a curve of `kind`.
#[must_use]
pub fn collectors(kind: CurveKind) -> &'static [Collector] {
    match kind {
        CurveKind::Term => &TERM_COLLECTORS,
        CurveKind::Overnight => &OVERNIGHT_COLLECTORS,
    }
}

/// Runs every collector for the context's curve kind and concatenates the output.
///
/// # Errors
///
/// Returns the first collector error.
pub fn collect_all(ctx: &CollectorContext<'_>) -> CurveResult<Vec<CalibrationInstrument>> {
    let kind = ctx.convention.kind_for(ctx.curve);
    let mut instruments = Vec::new();
    for collector in collectors(kind) {
        instruments.extend(collector(ctx)?);
    }
    Ok(instruments)
}

/// Parses the tenor suffix of an instrument id.
pub(crate) fn parse_tenor(id: &str, suffix: &str) -> CurveResult<Tenor> {
    suffix
        .parse()
        .map_err(|e| CurveError::configuration(format!("instrument {id}: {e}")))
}

/// One accrual period of a swap leg, with dates already rolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualPeriod {
    /// Accrual start.
    pub start: Date,
    /// Accrual end.
    pub end: Date,
    /// Payment date.
    pub payment: Date,
    /// Year fraction of the period.
    pub accrual: f64,
}

/// Builds the accrual periods of a leg running from `start` to `maturity`.
///
/// `step` is the regular period; `None` gives a single period. Unadjusted
/// schedule dates are rolled with `adjustment` on `calendar`; payment is on the
/// rolled period end.
pub(crate) fn leg_periods(
    start: Date,
    maturity: Date,
    step: Option<Tenor>,
    calendar: &dyn Calendar,
    adjustment: BusinessDayConvention,
    day_count: DayCountConvention,
) -> CurveResult<Vec<AccrualPeriod>> {
    let schedule = match step {
        None => Schedule::single(start, maturity),
        Some(tenor) => {
            let spec = ScheduleSpec::new(start, maturity);
            let spec = match (tenor.unit(), tenor.total_months()) {
                (_, Some(months)) => spec.with_months(months),
                (TenorUnit::Weeks, None) => spec.with_weeks(tenor.count()),
                _ => {
                    return Err(CurveError::configuration(format!(
                        "leg frequency {tenor} is not a whole number of weeks or months"
                    )))
                }
            };
            spec.generate()?
        }
    };

    schedule
        .periods()
        .map(|(s, e)| -> CurveResult<AccrualPeriod> {
            let s = calendar.adjust(s, adjustment)?;
            let e = calendar.adjust(e, adjustment)?;
            Ok(AccrualPeriod {
                start: s,
                end: e,
                payment: e,
                accrual: day_count.fraction(s, e),
            })
        })
        .collect()
}
