//! Floating-rate indices referenced by swap legs.
//!
//! Term curves project an IBOR-style index whose tenor comes from the curve
//! name (`USD_3M` projects 3M USD LIBOR); overnight curves project the
//! currency's overnight index.

use std::fmt;

use serde::{Deserialize, Serialize};

use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::{Currency, Tenor};

use crate::error::{CurveError, CurveResult};

/// Term index families, one per supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermIndexFamily {
    /// Bank Bill Swap Rate (AUD)
    Bbsw,
    /// Canadian Dealer Offered Rate (CAD)
    Cdor,
    /// CHF LIBOR
    ChfLibor,
    /// Copenhagen Interbank Offered Rate (DKK)
    Cibor,
    /// Euro Interbank Offered Rate (EUR)
    Euribor,
    /// GBP LIBOR
    GbpLibor,
    /// JPY LIBOR
    JpyLibor,
    /// Bank Bill Benchmark Rate (NZD)
    Bkbm,
    /// Stockholm Interbank Offered Rate (SEK)
    Stibor,
    /// Turkish Lira Interbank Offered Rate (TRY)
    Trlibor,
    /// USD LIBOR
    UsdLibor,
}

impl TermIndexFamily {
    /// The family used by `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedCurrency`] if the currency has no term index.
    pub fn for_currency(currency: Currency) -> CurveResult<Self> {
        let family = match currency {
            Currency::AUD => Self::Bbsw,
            Currency::CAD => Self::Cdor,
            Currency::CHF => Self::ChfLibor,
            Currency::DKK => Self::Cibor,
            Currency::EUR => Self::Euribor,
            Currency::GBP => Self::GbpLibor,
            Currency::JPY => Self::JpyLibor,
            Currency::NZD => Self::Bkbm,
            Currency::SEK => Self::Stibor,
            Currency::TRY => Self::Trlibor,
            Currency::USD => Self::UsdLibor,
            other => return Err(CurveError::unsupported_currency(other, "term")),
        };
        Ok(family)
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bbsw => "BBSW",
            Self::Cdor => "CDOR",
            Self::ChfLibor => "CHF LIBOR",
            Self::Cibor => "CIBOR",
            Self::Euribor => "EURIBOR",
            Self::GbpLibor => "GBP LIBOR",
            Self::JpyLibor => "JPY LIBOR",
            Self::Bkbm => "BKBM",
            Self::Stibor => "STIBOR",
            Self::Trlibor => "TRLIBOR",
            Self::UsdLibor => "USD LIBOR",
        }
    }

    /// Accrual day count of the index.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        match self {
            Self::Bbsw | Self::Cdor | Self::GbpLibor | Self::Bkbm => DayCountConvention::Act365Fixed,
            Self::ChfLibor
            | Self::Cibor
            | Self::Euribor
            | Self::JpyLibor
            | Self::Stibor
            | Self::Trlibor
            | Self::UsdLibor => DayCountConvention::Act360,
        }
    }
}

/// A term index at a given tenor, e.g. 6M EURIBOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloatingIndex {
    family: TermIndexFamily,
    tenor: Tenor,
}

impl FloatingIndex {
    /// The term index of `currency` at `tenor`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedCurrency`] if the currency has no term index.
    pub fn for_currency(currency: Currency, tenor: Tenor) -> CurveResult<Self> {
        Ok(Self {
            family: TermIndexFamily::for_currency(currency)?,
            tenor,
        })
    }

    /// The index family.
    #[must_use]
    pub fn family(&self) -> TermIndexFamily {
        self.family
    }

    /// The index tenor.
    #[must_use]
    pub fn tenor(&self) -> Tenor {
        self.tenor
    }

    /// Accrual day count of the index.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.family.day_count()
    }
}

impl fmt::Display for FloatingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family.name(), self.tenor)
    }
}

/// Overnight indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OvernightIndex {
    /// Euro Overnight Index Average (EUR)
    Eonia,
    /// Sterling Overnight Index Average (GBP)
    Sonia,
    /// Effective Federal Funds Rate (USD)
    FedFunds,
}

impl OvernightIndex {
    /// The overnight index of `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedCurrency`] if the currency has no overnight index.
    pub fn for_currency(currency: Currency) -> CurveResult<Self> {
        match currency {
            Currency::EUR => Ok(Self::Eonia),
            Currency::GBP => Ok(Self::Sonia),
            Currency::USD => Ok(Self::FedFunds),
            other => Err(CurveError::unsupported_currency(other, "overnight")),
        }
    }

    /// Currency of the index.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            Self::Eonia => Currency::EUR,
            Self::Sonia => Currency::GBP,
            Self::FedFunds => Currency::USD,
        }
    }

    /// Accrual day count, used on both legs of an overnight-index swap.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        match self {
            Self::Sonia => DayCountConvention::Act365Fixed,
            Self::Eonia | Self::FedFunds => DayCountConvention::Act360,
        }
    }
}

impl fmt::Display for OvernightIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Eonia => "EONIA",
            Self::Sonia => "SONIA",
            Self::FedFunds => "Fed Funds",
        };
        write!(f, "{name}")
    }
}

/// Index tenor encoded in a term curve name (`USD_3M` -> 3M).
///
/// # Errors
///
/// Returns [`CurveError::Configuration`] if the name has no tenor suffix.
pub fn tenor_from_curve_name(curve_name: &str) -> CurveResult<Tenor> {
    let suffix = curve_name
        .rsplit_once('_')
        .map(|(_, suffix)| suffix)
        .ok_or_else(|| {
            CurveError::configuration(format!(
                "curve name {curve_name} has no index tenor suffix"
            ))
        })?;
    suffix.parse().map_err(|e| {
        CurveError::configuration(format!("curve name {curve_name}: {e}"))
    })
}
