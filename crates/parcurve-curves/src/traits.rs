//! Core trait for discounting.
//!
//! Calibration instruments price against [`Curve`] rather than a concrete
//! curve type, so the same pricing code runs against trial curves during the
//! bootstrap, finished [`YieldCurve`](crate::curve::YieldCurve)s, and simple
//! test curves.

use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::Date;

use crate::error::{CurveError, CurveResult};

/// The core trait for discount curves.
///
/// # Required Methods
///
/// - [`settlement_date`](Curve::settlement_date): the date with discount factor 1
/// - [`discount_factor`](Curve::discount_factor): the primary method for discounting
///
/// # Derived Methods
///
/// - [`forward_rate`](Curve::forward_rate): simply-compounded forward between two dates
pub trait Curve: Send + Sync {
    /// Returns the settlement date of the curve.
    fn settlement_date(&self) -> Date;

    /// Returns the discount factor from the settlement date to `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot produce a value at `date`.
    fn discount_factor(&self, date: Date) -> CurveResult<f64>;

    /// Returns the simply-compounded forward rate between `start` and `end`.
    ///
    /// # Formula
    ///
    /// `F(t1, t2) = (DF(t1) / DF(t2) - 1) / τ(t1, t2)`
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidValue`] if the accrual period is empty or
    /// the end discount factor is not positive.
    fn forward_rate(&self, start: Date, end: Date, day_count: DayCountConvention) -> CurveResult<f64> {
        let tau = day_count.fraction(start, end);
        if tau <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "empty accrual period {start} .. {end}"
            )));
        }

        let df1 = self.discount_factor(start)?;
        let df2 = self.discount_factor(end)?;
        if df2 <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "non-positive discount factor {df2} at {end}"
            )));
        }

        Ok((df1 / df2 - 1.0) / tau)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Flat curves for instrument tests.

    use super::*;

    /// Flat continuously-compounded curve measured in ACT/365F.
    pub(crate) struct FlatCurve {
        pub settlement: Date,
        pub rate: f64,
    }

    impl Curve for FlatCurve {
        fn settlement_date(&self) -> Date {
            self.settlement
        }

        fn discount_factor(&self, date: Date) -> CurveResult<f64> {
            let t = DayCountConvention::Act365Fixed.fraction(self.settlement, date);
            Ok((-self.rate * t).exp())
        }
    }
}
