//! Currency type with ISO 4217 codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// ISO 4217 currency codes.
///
/// Not every currency here has a floating-rate index; the index tables in
/// the curves crate decide which ones can be bootstrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    /// Australian Dollar
    AUD,
    /// Canadian Dollar
    CAD,
    /// Swiss Franc
    CHF,
    /// Danish Krone
    DKK,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// New Zealand Dollar
    NZD,
    /// Swedish Krona
    SEK,
    /// Turkish Lira
    TRY,
    /// United States Dollar
    USD,
    /// Norwegian Krone
    NOK,
    /// Hong Kong Dollar
    HKD,
    /// Singapore Dollar
    SGD,
    /// Brazilian Real
    BRL,
    /// Mexican Peso
    MXN,
    /// South African Rand
    ZAR,
}

impl Currency {
    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
            Currency::DKK => "DKK",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::NZD => "NZD",
            Currency::SEK => "SEK",
            Currency::TRY => "TRY",
            Currency::USD => "USD",
            Currency::NOK => "NOK",
            Currency::HKD => "HKD",
            Currency::SGD => "SGD",
            Currency::BRL => "BRL",
            Currency::MXN => "MXN",
            Currency::ZAR => "ZAR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let currency = match s.trim().to_ascii_uppercase().as_str() {
            "AUD" => Currency::AUD,
            "CAD" => Currency::CAD,
            "CHF" => Currency::CHF,
            "DKK" => Currency::DKK,
            "EUR" => Currency::EUR,
            "GBP" => Currency::GBP,
            "JPY" => Currency::JPY,
            "NZD" => Currency::NZD,
            "SEK" => Currency::SEK,
            // pre-2005 lira code still used by some data vendors
            "TRY" | "TRL" => Currency::TRY,
            "USD" => Currency::USD,
            "NOK" => Currency::NOK,
            "HKD" => Currency::HKD,
            "SGD" => Currency::SGD,
            "BRL" => Currency::BRL,
            "MXN" => Currency::MXN,
            "ZAR" => Currency::ZAR,
            _ => return Err(CoreError::unknown_convention("currency", s)),
        };
        Ok(currency)
    }
}
