//! Per-curve market conventions.
//!
//! A [`CurveConvention`] holds everything the collectors need to turn quotes
//! into calibration instruments: currency, calendar, and per-class day count,
//! adjustment and spot lag. Conventions are plain serde types and can also be
//! read from the flat `<class>_<Field>` records used by convention tables:
//!
//! ```rust
//! use std::collections::HashMap;
//! use parcurve_curves::conventions::CurveConvention;
//!
//! let fields: HashMap<String, String> = [
//!     ("general_Currency", "USD"),
//!     ("general_HolidayCalendar", "NYSE"),
//!     ("deposits_SpotLag", "2"),
//!     ("deposits_DCF", "Act360"),
//!     ("deposits_Adjustment", "Modified Following"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let convention = CurveConvention::from_fields(&fields).unwrap();
//! assert_eq!(convention.deposits.spot_lag, 2);
//! assert!(convention.swaps.is_none());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::{Compounding, Currency, Frequency, Tenor};

use crate::curve::InterpolationMethod;
use crate::error::{CurveError, CurveResult};
use crate::validation::{Validate, ValidationError};

/// Which collectors feed a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    /// Deposits, futures, FRAs and swaps against a term index.
    Term,
    /// Deposits and overnight-index swaps.
    Overnight,
}

impl CurveKind {
    /// Suffix that marks an overnight curve name.
    pub const OVERNIGHT_SUFFIX: &'static str = "_OIS";

    /// Infers the kind from a curve name (`EUR_OIS` is overnight, `EUR_6M` is term).
    #[must_use]
    pub fn infer(curve_name: &str) -> Self {
        if curve_name
            .to_ascii_uppercase()
            .ends_with(Self::OVERNIGHT_SUFFIX)
        {
            CurveKind::Overnight
        } else {
            CurveKind::Term
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Term => write!(f, "Term"),
            CurveKind::Overnight => write!(f, "Overnight"),
        }
    }
}

/// Deposit conventions. The deposit spot lag also fixes the curve settlement date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositConventions {
    /// Business days from the anchor date to spot.
    pub spot_lag: u32,
    /// Accrual day count, also used to measure node times.
    pub day_count: DayCountConvention,
    /// Maturity adjustment.
    #[serde(default)]
    pub adjustment: BusinessDayConvention,
}

/// Interest-rate futures conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureConventions {
    /// Length of the underlying deposit in months.
    #[serde(default = "default_future_tenor")]
    pub tenor_months: u32,
    /// Number of contracts quoted (`futures_1` .. `futures_<count>`).
    pub count: u32,
    /// Calendar-day window after the anchor in which the front contract is kept.
    pub days_to_exclude: i64,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// End-date adjustment.
    #[serde(default)]
    pub adjustment: BusinessDayConvention,
}

/// Forward-rate agreement conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraConventions {
    /// Business days from the anchor date to spot.
    pub spot_lag: u32,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// Start and end date adjustment.
    #[serde(default)]
    pub adjustment: BusinessDayConvention,
}

/// Swap conventions, shared by term and overnight-index swaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapConventions {
    /// Spot lag; the deposit spot lag when absent.
    #[serde(default)]
    pub spot_lag: Option<u32>,
    /// Fixed leg payment frequency.
    #[serde(default)]
    pub fixed_frequency: Frequency,
    /// Fixed leg payment adjustment.
    #[serde(default)]
    pub fixed_adjustment: BusinessDayConvention,
    /// Fixed leg day count.
    pub fixed_day_count: DayCountConvention,
    /// Floating leg frequency; follows the index tenor when absent.
    #[serde(default)]
    pub float_frequency: Option<Frequency>,
    /// Index tenor override; parsed from the curve name when absent.
    #[serde(default)]
    pub float_tenor: Option<Tenor>,
    /// Floating leg adjustment; the fixed leg adjustment when absent.
    #[serde(default)]
    pub float_adjustment: Option<BusinessDayConvention>,
}

/// Conventions for one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConvention {
    /// Curve currency.
    pub currency: Currency,
    /// Holiday calendar for spot lags and adjustments.
    pub calendar: CalendarId,
    /// Explicit curve kind; inferred from the curve name when absent.
    #[serde(default)]
    pub kind: Option<CurveKind>,
    /// Swaps discount off a separately built overnight curve.
    #[serde(default)]
    pub requires_ois: bool,
    /// Name of the discounting curve; `<CCY>_OIS` when absent.
    #[serde(default)]
    pub ois_curve: Option<String>,
    /// Compounding used when reporting zero rates.
    #[serde(default = "default_compounding")]
    pub compounding: Compounding,
    /// Interpolation override for this curve.
    #[serde(default)]
    pub interpolation: Option<InterpolationMethod>,
    /// Deposit conventions.
    pub deposits: DepositConventions,
    /// Futures conventions, if the curve uses futures.
    #[serde(default)]
    pub futures: Option<FutureConventions>,
    /// FRA conventions, if the curve uses FRAs.
    #[serde(default)]
    pub fras: Option<FraConventions>,
    /// Swap conventions, if the curve uses swaps.
    #[serde(default)]
    pub swaps: Option<SwapConventions>,
}

fn default_compounding() -> Compounding {
    Compounding::Continuous
}

fn default_future_tenor() -> u32 {
    3
}

impl CurveConvention {
    /// Creates a deposits-only convention.
    #[must_use]
    pub fn new(currency: Currency, calendar: CalendarId, deposits: DepositConventions) -> Self {
        Self {
            currency,
            calendar,
            kind: None,
            requires_ois: false,
            ois_curve: None,
            compounding: default_compounding(),
            interpolation: None,
            deposits,
            futures: None,
            fras: None,
            swaps: None,
        }
    }

    /// Sets the curve kind explicitly.
    #[must_use]
    pub fn with_kind(mut self, kind: CurveKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Adds futures conventions.
    #[must_use]
    pub fn with_futures(mut self, futures: FutureConventions) -> Self {
        self.futures = Some(futures);
        self
    }

    /// Adds FRA conventions.
    #[must_use]
    pub fn with_fras(mut self, fras: FraConventions) -> Self {
        self.fras = Some(fras);
        self
    }

    /// Adds swap conventions.
    #[must_use]
    pub fn with_swaps(mut self, swaps: SwapConventions) -> Self {
        self.swaps = Some(swaps);
        self
    }

    /// Discounts swaps off the default `<CCY>_OIS` curve.
    #[must_use]
    pub fn requiring_ois(mut self) -> Self {
        self.requires_ois = true;
        self
    }

    /// Discounts swaps off the named curve.
    #[must_use]
    pub fn discounted_by(mut self, curve: impl Into<String>) -> Self {
        self.requires_ois = true;
        self.ois_curve = Some(curve.into());
        self
    }

    /// Sets the interpolation override.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.interpolation = Some(method);
        self
    }

    /// The curve kind, explicit or inferred from `curve_name`.
    #[must_use]
    pub fn kind_for(&self, curve_name: &str) -> CurveKind {
        self.kind.unwrap_or_else(|| CurveKind::infer(curve_name))
    }

    /// Name of the curve this one discounts off, if any.
    #[must_use]
    pub fn discounting_curve(&self) -> Option<String> {
        if !self.requires_ois {
            return None;
        }
        Some(
            self.ois_curve
                .clone()
                .unwrap_or_else(|| format!("{}{}", self.currency, CurveKind::OVERNIGHT_SUFFIX)),
        )
    }

    /// Spot lag used by swaps.
    #[must_use]
    pub fn swap_spot_lag(&self) -> u32 {
        self.swaps
            .as_ref()
            .and_then(|s| s.spot_lag)
            .unwrap_or(self.deposits.spot_lag)
    }

    /// Parses a flat convention record such as `deposits_SpotLag = 2`.
    ///
    /// Blank values count as absent. The futures, FRA and swap sections are
    /// present when any of their keys is set, and then every required key of
    /// that section must be set.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] for a missing required key or a
    /// value that does not parse.
    pub fn from_fields(fields: &HashMap<String, String>) -> CurveResult<Self> {
        let record = Record(fields);

        let deposits = DepositConventions {
            spot_lag: record.required("deposits_SpotLag")?,
            day_count: record.required("deposits_DCF")?,
            adjustment: record.optional("deposits_Adjustment")?.unwrap_or_default(),
        };

        let futures = if record.has_section("futures") {
            Some(FutureConventions {
                tenor_months: record
                    .get("futures_Tenor")
                    .map(|raw| parse_months("futures_Tenor", raw))
                    .transpose()?
                    .unwrap_or_else(default_future_tenor),
                count: record.required("futures_NumberOfFutures")?,
                days_to_exclude: record.required("futures_DaysToExclude")?,
                day_count: record.required("futures_DCF")?,
                adjustment: record.optional("futures_Adjustment")?.unwrap_or_default(),
            })
        } else {
            None
        };

        let fras = if record.has_section("fras") {
            Some(FraConventions {
                spot_lag: record.required("fras_SpotLag")?,
                day_count: record.required("fras_DCF")?,
                adjustment: record.optional("fras_Adjustment")?.unwrap_or_default(),
            })
        } else {
            None
        };

        let swaps = if record.has_section("swaps") {
            Some(SwapConventions {
                spot_lag: record.optional("swaps_SpotLag")?,
                fixed_frequency: record.required("swaps_FixedFreq")?,
                fixed_adjustment: record.optional("swaps_FixedAdjustment")?.unwrap_or_default(),
                fixed_day_count: record.required("swaps_FixedLegDCF")?,
                float_frequency: record.optional("swaps_FloatFreq")?,
                float_tenor: record.optional("swaps_FloatTenor")?,
                float_adjustment: record.optional("swaps_FloatAdjustment")?,
            })
        } else {
            None
        };

        let requires_ois = record
            .get("general_RequiresOIS")
            .map(|raw| parse_flag("general_RequiresOIS", raw))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            currency: record.required("general_Currency")?,
            calendar: record.required("general_HolidayCalendar")?,
            kind: None,
            requires_ois,
            ois_curve: record.get("general_OISCurve").map(str::to_string),
            compounding: record
                .optional("general_Compounding")?
                .unwrap_or_else(default_compounding),
            interpolation: record.optional("general_Interpolation")?,
            deposits,
            futures,
            fras,
            swaps,
        })
    }

    /// Parses a JSON convention.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] if the JSON does not describe a convention.
    pub fn from_json(json: &str) -> CurveResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CurveError::configuration(format!("invalid convention JSON: {e}")))
    }

    /// Serializes the convention to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Configuration`] if serialization fails.
    pub fn to_json(&self) -> CurveResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CurveError::configuration(format!("cannot serialize convention: {e}")))
    }
}

impl Validate for CurveConvention {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(futures) = &self.futures {
            if futures.count == 0 {
                errors.push(ValidationError::new(
                    "futures_NumberOfFutures",
                    "must be at least 1",
                ));
            }
            if futures.tenor_months == 0 {
                errors.push(ValidationError::new("futures_Tenor", "must be at least 1 month"));
            }
            if futures.days_to_exclude < 0 {
                errors.push(ValidationError::new(
                    "futures_DaysToExclude",
                    "cannot be negative",
                ));
            }
        }

        if let Some(swaps) = &self.swaps {
            if swaps.fixed_frequency == Frequency::Daily {
                errors.push(ValidationError::new(
                    "swaps_FixedFreq",
                    "daily fixed legs are not supported",
                ));
            }
            if swaps.float_frequency == Some(Frequency::Daily) {
                errors.push(ValidationError::new(
                    "swaps_FloatFreq",
                    "daily floating legs are not supported",
                ));
            }
        }

        if self.ois_curve.as_deref().is_some_and(|name| name.trim().is_empty()) {
            errors.push(ValidationError::new("general_OISCurve", "cannot be blank"));
        }

        if self.requires_ois && self.kind == Some(CurveKind::Overnight) {
            errors.push(ValidationError::new(
                "general_RequiresOIS",
                "an overnight curve cannot discount off another overnight curve",
            ));
        }

        errors
    }
}

/// Flat key/value record with blank values treated as missing.
struct Record<'a>(&'a HashMap<String, String>);

impl Record<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn has_section(&self, class: &str) -> bool {
        let prefix = format!("{class}_");
        self.0
            .iter()
            .any(|(k, v)| k.starts_with(&prefix) && !v.trim().is_empty())
    }

    fn optional<T>(&self, key: &str) -> CurveResult<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key).map(|raw| parse_value(key, raw)).transpose()
    }

    fn required<T>(&self, key: &str) -> CurveResult<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.optional(key)?
            .ok_or_else(|| CurveError::configuration(format!("missing convention field {key}")))
    }
}

fn parse_value<T>(key: &str, raw: &str) -> CurveResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse()
        .map_err(|e| CurveError::configuration(format!("{key}: {e}")))
}

fn parse_flag(key: &str, raw: &str) -> CurveResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(CurveError::configuration(format!(
            "{key}: expected a boolean, got '{raw}'"
        ))),
    }
}

/// Accepts a bare month count (`3`) or a month-based tenor (`3M`, `1Y`).
fn parse_months(key: &str, raw: &str) -> CurveResult<u32> {
    if let Ok(months) = raw.parse::<u32>() {
        return Ok(months);
    }
    let tenor: Tenor = parse_value(key, raw)?;
    tenor.total_months().ok_or_else(|| {
        CurveError::configuration(format!("{key}: '{raw}' is not a whole number of months"))
    })
}
