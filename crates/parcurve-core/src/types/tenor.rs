//! Tenor (period length) parsing and date arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendars::{BusinessDayConvention, Calendar};
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Unit of a [`Tenor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenorUnit {
    /// Business days on the instrument's calendar (ON/TN/SN).
    BusinessDays,
    /// Calendar days.
    Days,
    /// Calendar weeks.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

/// Largest count [`Tenor::from_str`] accepts.
pub const MAX_TENOR_COUNT: u32 = 10_000;

/// The length of an instrument's term, e.g. `3M` or `10Y`.
///
/// Parses the money-market shorthands used in instrument ids:
///
/// | Input | Meaning |
/// |-------|---------|
/// | `ON` / `TN` / `SN` | 1 / 2 / 3 business days |
/// | `7D` | 7 calendar days |
/// | `1W`, `2WK` | weeks |
/// | `3M`, `6MO` | months |
/// | `1Y`, `10YR` | years |
///
/// ```rust
/// use parcurve_core::types::{Tenor, TenorUnit};
///
/// let tenor: Tenor = "10YR".parse().unwrap();
/// assert_eq!(tenor, Tenor::new(10, TenorUnit::Years));
/// assert_eq!(tenor.to_string(), "10Y");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tenor {
    count: u32,
    unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor.
    #[must_use]
    pub const fn new(count: u32, unit: TenorUnit) -> Self {
        Self { count, unit }
    }

    /// Tenor of `n` months.
    #[must_use]
    pub const fn months(n: u32) -> Self {
        Self::new(n, TenorUnit::Months)
    }

    /// Tenor of `n` years.
    #[must_use]
    pub const fn years(n: u32) -> Self {
        Self::new(n, TenorUnit::Years)
    }

    /// Number of units.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The unit.
    #[must_use]
    pub fn unit(&self) -> TenorUnit {
        self.unit
    }

    /// Length in whole months, if the tenor is month-based.
    #[must_use]
    pub fn total_months(&self) -> Option<u32> {
        match self.unit {
            TenorUnit::Months => Some(self.count),
            TenorUnit::Years => self.count.checked_mul(12),
            _ => None,
        }
    }

    /// Approximate length in years, used only for ordering and display.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let n = f64::from(self.count);
        match self.unit {
            TenorUnit::BusinessDays | TenorUnit::Days => n / 365.0,
            TenorUnit::Weeks => n * 7.0 / 365.0,
            TenorUnit::Months => n / 12.0,
            TenorUnit::Years => n,
        }
    }

    /// Applies the tenor to `start` without any business-day adjustment.
    ///
    /// Business-day tenors count weekdays only; use [`Tenor::advance`] to count on
    /// a holiday calendar.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTenor` if the count does not fit date
    /// arithmetic and `CoreError::InvalidDate` if the result is out of range.
    pub fn add_to(&self, start: Date) -> CoreResult<Date> {
        let n = self.signed_count()?;
        match self.unit {
            TenorUnit::BusinessDays => {
                let mut date = start;
                let mut remaining = n;
                while remaining > 0 {
                    date = date.add_days(1);
                    if !date.is_weekend() {
                        remaining -= 1;
                    }
                }
                Ok(date)
            }
            TenorUnit::Days => start.checked_add_days(i64::from(n)),
            TenorUnit::Weeks => start.checked_add_days(7 * i64::from(n)),
            TenorUnit::Months => start.add_months(n),
            TenorUnit::Years => start.add_years(n),
        }
    }

    /// Applies the tenor to `start` on `calendar`, then rolls the result.
    pub fn advance(
        &self,
        start: Date,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        let raw = match self.unit {
            TenorUnit::BusinessDays => {
                return Ok(calendar.add_business_days(start, self.signed_count()?));
            }
            _ => self.add_to(start)?,
        };
        calendar.adjust(raw, convention)
    }

    fn signed_count(&self) -> CoreResult<i32> {
        i32::try_from(self.count)
            .map_err(|_| CoreError::invalid_tenor(self.to_string(), "count out of range"))
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_uppercase();
        match input.as_str() {
            "ON" => return Ok(Self::new(1, TenorUnit::BusinessDays)),
            "TN" => return Ok(Self::new(2, TenorUnit::BusinessDays)),
            "SN" => return Ok(Self::new(3, TenorUnit::BusinessDays)),
            _ => {}
        }

        let split = input
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoreError::invalid_tenor(s, "missing unit"))?;
        let (digits, unit) = input.split_at(split);
        if digits.is_empty() {
            return Err(CoreError::invalid_tenor(s, "missing count"));
        }
        let count: u32 = digits
            .parse()
            .map_err(|_| CoreError::invalid_tenor(s, "count out of range"))?;
        if count == 0 {
            return Err(CoreError::invalid_tenor(s, "count must be positive"));
        }
        if count > MAX_TENOR_COUNT {
            return Err(CoreError::invalid_tenor(s, "count out of range"));
        }

        let unit = match unit {
            "D" => TenorUnit::Days,
            "W" | "WK" => TenorUnit::Weeks,
            "M" | "MO" => TenorUnit::Months,
            "Y" | "YR" => TenorUnit::Years,
            other => {
                return Err(CoreError::invalid_tenor(
                    s,
                    format!("unknown unit '{other}'"),
                ))
            }
        };

        Ok(Self::new(count, unit))
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.unit, self.count) {
            (TenorUnit::BusinessDays, 1) => write!(f, "ON"),
            (TenorUnit::BusinessDays, 2) => write!(f, "TN"),
            (TenorUnit::BusinessDays, 3) => write!(f, "SN"),
            (TenorUnit::BusinessDays, n) => write!(f, "{n}BD"),
            (TenorUnit::Days, n) => write!(f, "{n}D"),
            (TenorUnit::Weeks, n) => write!(f, "{n}W"),
            (TenorUnit::Months, n) => write!(f, "{n}M"),
            (TenorUnit::Years, n) => write!(f, "{n}Y"),
        }
    }
}
