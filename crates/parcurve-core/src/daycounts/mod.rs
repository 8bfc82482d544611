//! Day count conventions.
//!
//! A day count turns a pair of dates into an accrual year fraction. The
//! curve engine needs the five conventions named in curve configuration:
//!
//! | Key | Type | Basis |
//! |-----|------|-------|
//! | `Act360` | [`Act360`] | actual days / 360 |
//! | `Act365Fixed` | [`Act365Fixed`] | actual days / 365 |
//! | `ActAct` | [`ActActIsda`] | actual days split by calendar year |
//! | `Bus252` | [`Business252`] | weekdays / 252 |
//! | `30360` | [`Thirty360US`] | 30-day months / 360 |
//!
//! # Usage
//!
//! ```rust
//! use parcurve_core::daycounts::{DayCount, DayCountConvention};
//! use parcurve_core::types::Date;
//!
//! let dc: DayCountConvention = "Act360".parse().unwrap();
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 4, 1).unwrap();
//!
//! assert_eq!(dc.to_day_count().day_count(start, end), 90);
//! assert_eq!(dc.fraction(start, end), 0.25);
//! ```

mod actual;
mod business252;
mod thirty360;

pub use actual::{Act360, Act365Fixed, ActActIsda};
pub use business252::Business252;
pub use thirty360::Thirty360US;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates according to the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Enumeration of the supported day count conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360
    #[default]
    Act360,
    /// Actual/365 Fixed
    Act365Fixed,
    /// Actual/Actual ISDA
    ActActIsda,
    /// Business/252 on weekends
    Business252,
    /// 30/360 US
    Thirty360US,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::Business252 => Box::new(Business252),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
        }
    }

    /// Year fraction as `f64`, for the numerical code in the curve engine.
    #[must_use]
    pub fn fraction(&self, start: Date, end: Date) -> f64 {
        let yf = match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::ActActIsda => ActActIsda.year_fraction(start, end),
            DayCountConvention::Business252 => Business252.year_fraction(start, end),
            DayCountConvention::Thirty360US => Thirty360US.year_fraction(start, end),
        };
        // Decimal to f64 never fails: every Decimal lies within f64 range and
        // rounds to the nearest double.
        yf.to_f64().unwrap_or(f64::NAN)
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::Business252 => "BUS/252",
            DayCountConvention::Thirty360US => "30/360 US",
        }
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::Business252,
            DayCountConvention::Thirty360US,
        ]
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Accepts the configuration keys (`Act360`, `Bus252`, `30360`, ...) and the
    /// market names returned by [`DayCountConvention::name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ACT360" | "ACT/360" | "ACTUAL/360" => Ok(DayCountConvention::Act360),

            "ACT365FIXED" | "ACT365F" | "ACT365" | "ACT/365F" | "ACT/365" | "ACT/365 FIXED"
            | "ACTUAL/365" => Ok(DayCountConvention::Act365Fixed),

            "ACTACT" | "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTACTISDA" => {
                Ok(DayCountConvention::ActActIsda)
            }

            "BUS252" | "BUS/252" | "BUSINESS252" => Ok(DayCountConvention::Business252),

            "30360" | "30/360" | "30/360 US" | "THIRTY360US" | "BOND" => {
                Ok(DayCountConvention::Thirty360US)
            }

            _ => Err(CoreError::unknown_convention("day count", s)),
        }
    }
}
