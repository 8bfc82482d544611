//! Forward rate agreements.

use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::Date;

use super::{CalibrationInstrument, CollectorContext};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// A forward rate agreement.
///
/// A 3x6 FRA fixes a 3-month rate starting 3 months after spot. The curve
/// reprices it when:
/// ```text
/// DF(end) = DF(start) / (1 + rate × τ)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Fra {
    id: String,
    start_months: u32,
    end_months: u32,
    start_date: Date,
    end_date: Date,
    rate: f64,
    day_count: DayCountConvention,
}

impl Fra {
    /// Creates a FRA.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        (start_months, end_months): (u32, u32),
        start_date: Date,
        end_date: Date,
        rate: f64,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            id: id.into(),
            start_months,
            end_months,
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

    /// Month offsets of the accrual period from spot, e.g. `(3, 6)`.
    #[must_use]
    pub fn offsets(&self) -> (u32, u32) {
        (self.start_months, self.end_months)
    }

    /// Accrual start.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Accrual end.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// FRA rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Year fraction of the accrual period.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.fraction(self.start_date, self.end_date)
    }

    /// Forward rate implied by `curve` over the accrual period.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn implied_rate(&self, curve: &dyn Curve) -> CurveResult<f64> {
        curve.forward_rate(self.start_date, self.end_date, self.day_count)
    }

    /// Discount factor at the accrual end that reprices the FRA.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn discount_factor_from(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_start = curve.discount_factor(self.start_date)?;
        Ok(df_start / (1.0 + self.rate * self.year_fraction()))
    }
}

/// Parses an `AxB` suffix into start and end month offsets.
fn parse_offsets(id: &str, suffix: &str) -> CurveResult<(u32, u32)> {
    let malformed =
        || CurveError::configuration(format!("instrument {id}: expected AxB month offsets"));

    let (start, end) = suffix
        .split_once(|c: char| c.eq_ignore_ascii_case(&'x'))
        .ok_or_else(malformed)?;
    let start: u32 = start.trim().parse().map_err(|_| malformed())?;
    let end: u32 = end.trim().parse().map_err(|_| malformed())?;
    if start >= end {
        return Err(CurveError::configuration(format!(
            "instrument {id}: FRA end offset must follow start offset"
        )));
    }
    Ok((start, end))
}

/// Collects the FRAs flagged for the context's curve.
///
/// # Errors
///
/// Returns [`CurveError::Configuration`] if FRAs are selected without FRA
/// conventions, for a malformed id, or for a missing quote.
pub fn collect(ctx: &CollectorContext<'_>) -> CurveResult<Vec<CalibrationInstrument>> {
    let selected = ctx.selected("fras");
    if selected.is_empty() {
        return Ok(Vec::new());
    }
    let conventions = ctx.convention.fras.as_ref().ok_or_else(|| {
        CurveError::configuration(format!("{} selects FRAs but has no FRA conventions", ctx.curve))
    })?;
    let spot = ctx.spot_date(conventions.spot_lag);

    selected
        .into_iter()
        .map(|(id, suffix)| {
            let (a, b) = parse_offsets(&id, &suffix)?;
            let offset = |months: u32| -> CurveResult<Date> {
                let raw = spot.add_months(i32::try_from(months).unwrap_or(i32::MAX))?;
                ctx.adjust(raw, conventions.adjustment)
            };
            let start = offset(a)?;
            let end = offset(b)?;
            let rate = ctx.quote(&id)?;
            Ok(CalibrationInstrument::Fra(Fra::new(
                id,
                (a, b),
                start,
                end,
                rate,
                conventions.day_count,
            )))
        })
        .collect()
}
