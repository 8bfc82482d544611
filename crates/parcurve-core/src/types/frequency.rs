//! Frequency and compounding types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::{Tenor, TenorUnit};

/// Payment or reset frequency of a swap leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// A single payment at maturity.
    Once,
    /// Annual payments (1 per year)
    #[default]
    Annual,
    /// Semi-annual payments (2 per year)
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
    /// Weekly payments
    Weekly,
    /// Daily payments
    Daily,
}

impl Frequency {
    /// Returns the number of periods per year, `None` for [`Frequency::Once`].
    #[must_use]
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Frequency::Once => None,
            Frequency::Annual => Some(1),
            Frequency::SemiAnnual => Some(2),
            Frequency::Quarterly => Some(4),
            Frequency::Monthly => Some(12),
            Frequency::Weekly => Some(52),
            Frequency::Daily => Some(365),
        }
    }

    /// Returns the regular period as a tenor, `None` for [`Frequency::Once`].
    #[must_use]
    pub fn period(&self) -> Option<Tenor> {
        match self {
            Frequency::Once => None,
            Frequency::Annual => Some(Tenor::months(12)),
            Frequency::SemiAnnual => Some(Tenor::months(6)),
            Frequency::Quarterly => Some(Tenor::months(3)),
            Frequency::Monthly => Some(Tenor::months(1)),
            Frequency::Weekly => Some(Tenor::new(1, TenorUnit::Weeks)),
            Frequency::Daily => Some(Tenor::new(1, TenorUnit::Days)),
        }
    }

    /// Maps a month-based tenor to the matching frequency (3M -> Quarterly).
    #[must_use]
    pub fn from_tenor(tenor: Tenor) -> Option<Self> {
        match (tenor.unit(), tenor.total_months()) {
            (TenorUnit::Weeks, _) if tenor.count() == 1 => Some(Frequency::Weekly),
            (TenorUnit::Days, _) if tenor.count() == 1 => Some(Frequency::Daily),
            (_, Some(12)) => Some(Frequency::Annual),
            (_, Some(6)) => Some(Frequency::SemiAnnual),
            (_, Some(3)) => Some(Frequency::Quarterly),
            (_, Some(1)) => Some(Frequency::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Once => "Once",
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semiannual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Frequency::Once),
            "annual" => Ok(Frequency::Annual),
            "semiannual" | "semi-annual" => Ok(Frequency::SemiAnnual),
            "quarterly" => Ok(Frequency::Quarterly),
            "monthly" => Ok(Frequency::Monthly),
            "weekly" => Ok(Frequency::Weekly),
            "daily" => Ok(Frequency::Daily),
            _ => Err(CoreError::unknown_convention("frequency", s)),
        }
    }
}

/// Interest compounding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Simple interest (no compounding)
    Simple,
    /// Annual compounding (1x per year)
    Annual,
    /// Semi-annual compounding (2x per year)
    SemiAnnual,
    /// Quarterly compounding (4x per year)
    Quarterly,
    /// Monthly compounding (12x per year)
    Monthly,
    /// Continuous compounding
    #[default]
    Continuous,
}

impl Compounding {
    /// Returns the number of compounding periods per year for periodic conventions.
    #[must_use]
    pub fn periods_per_year_opt(&self) -> Option<u32> {
        match self {
            Compounding::Simple | Compounding::Continuous => None,
            Compounding::Annual => Some(1),
            Compounding::SemiAnnual => Some(2),
            Compounding::Quarterly => Some(4),
            Compounding::Monthly => Some(12),
        }
    }

    /// Discount factor for `rate` over `t` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        match self {
            Compounding::Continuous => (-rate * t).exp(),
            Compounding::Simple => 1.0 / (1.0 + rate * t),
            _ => {
                let n = f64::from(self.periods_per_year_opt().unwrap_or(1));
                (1.0 + rate / n).powf(-n * t)
            }
        }
    }

    /// Zero rate implied by discount factor `df` over `t` years.
    ///
    /// Returns 0 for `t <= 0` where no rate is defined.
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        if t <= 0.0 || df <= 0.0 {
            return 0.0;
        }
        match self {
            Compounding::Continuous => -df.ln() / t,
            Compounding::Simple => (1.0 / df - 1.0) / t,
            _ => {
                let n = f64::from(self.periods_per_year_opt().unwrap_or(1));
                n * (df.powf(-1.0 / (n * t)) - 1.0)
            }
        }
    }

    /// Converts `rate` under this convention into the equivalent rate under `target`.
    #[must_use]
    pub fn convert_to(&self, rate: f64, target: Compounding, t: f64) -> f64 {
        target.zero_rate(self.discount_factor(rate, t), t)
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Annual => "Annual",
            Compounding::SemiAnnual => "Semiannual",
            Compounding::Quarterly => "Quarterly",
            Compounding::Monthly => "Monthly",
            Compounding::Continuous => "Continuous",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Compounding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Compounding::Simple),
            "annual" => Ok(Compounding::Annual),
            "semiannual" | "semi-annual" => Ok(Compounding::SemiAnnual),
            "quarterly" => Ok(Compounding::Quarterly),
            "monthly" => Ok(Compounding::Monthly),
            "continuous" => Ok(Compounding::Continuous),
            _ => Err(CoreError::unknown_convention("compounding", s)),
        }
    }
}
