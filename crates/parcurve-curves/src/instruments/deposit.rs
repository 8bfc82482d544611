//! Money market deposits.
//!
//! Deposits fix the short end of the curve. A deposit starts at spot and runs
//! for the tenor in its id: `ON`, `TN` and `SN` end 1, 2 and 3 business days
//! after spot, anything else is a calendar tenor rolled with the deposit
//! adjustment.

use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::Tenor;
use parcurve_core::Date;

use super::{parse_tenor, CalibrationInstrument, CollectorContext};
use crate::error::CurveResult;
use crate::traits::Curve;

/// A money market deposit.
///
/// # Pricing Formula
///
/// The deposit reprices when:
/// ```text
/// DF(end) = DF(start) / (1 + rate × τ)
/// ```
/// where τ is the year fraction in the deposit day count.
#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    id: String,
    tenor: Tenor,
    start_date: Date,
    end_date: Date,
    rate: f64,
    day_count: DayCountConvention,
}

impl Deposit {
    /// Creates a deposit.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        tenor: Tenor,
        start_date: Date,
        end_date: Date,
        rate: f64,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            id: id.into(),
            tenor,
            start_date,
            end_date,
            rate,
            day_count,
        }
    }

    /// Instrument id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Deposit tenor.
    #[must_use]
    pub fn tenor(&self) -> Tenor {
        self.tenor
    }

    /// Start date (spot).
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// End date (maturity).
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Simple deposit rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Year fraction of the deposit period.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.fraction(self.start_date, self.end_date)
    }

    /// Simple rate implied by `curve` over the deposit period.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn implied_rate(&self, curve: &dyn Curve) -> CurveResult<f64> {
        curve.forward_rate(self.start_date, self.end_date, self.day_count)
    }

    /// Discount factor at maturity that reprices the deposit, given `curve` at the start.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn discount_factor_from(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_start = curve.discount_factor(self.start_date)?;
        Ok(df_start / (1.0 + self.rate * self.year_fraction()))
    }
}

/// Collects the deposits flagged for the context's curve.
///
/// # Errors
///
/// Returns [`crate::CurveError::Configuration`] for a malformed id or a missing quote.
pub fn collect(ctx: &CollectorContext<'_>) -> CurveResult<Vec<CalibrationInstrument>> {
    let conventions = &ctx.convention.deposits;
    let spot = ctx.spot_date(conventions.spot_lag);

    ctx.selected("deposits")
        .into_iter()
        .map(|(id, suffix)| {
            let tenor = parse_tenor(&id, &suffix)?;
            let end = tenor.advance(spot, ctx.calendar, conventions.adjustment)?;
            let rate = ctx.quote(&id)?;
            Ok(CalibrationInstrument::Deposit(Deposit::new(
                id,
                tenor,
                spot,
                end,
                rate,
                conventions.day_count,
            )))
        })
        .collect()
}
