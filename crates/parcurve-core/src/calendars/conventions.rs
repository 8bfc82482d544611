//! Business day adjustment conventions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Business day adjustment conventions.
///
/// These conventions specify how to adjust a date that falls
/// on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// No adjustment - use the date as-is even if not a business day.
    Unadjusted,

    /// Move to the following business day.
    Following,

    /// Move to the following business day, unless it crosses a month boundary,
    /// in which case move to the preceding business day.
    #[default]
    ModifiedFollowing,

    /// Move to the preceding business day.
    Preceding,

    /// Move to the preceding business day, unless it crosses a month boundary,
    /// in which case move to the following business day.
    ModifiedPreceding,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BusinessDayConvention {
    type Err = CoreError;

    /// Accepts the display names plus their unspaced forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "unadjusted" => Ok(BusinessDayConvention::Unadjusted),
            "following" => Ok(BusinessDayConvention::Following),
            "modifiedfollowing" => Ok(BusinessDayConvention::ModifiedFollowing),
            "preceding" => Ok(BusinessDayConvention::Preceding),
            "modifiedpreceding" => Ok(BusinessDayConvention::ModifiedPreceding),
            _ => Err(CoreError::unknown_convention("business day convention", s)),
        }
    }
}

/// Adjusts a date according to the given business day convention.
pub fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> CoreResult<Date> {
    if calendar.is_business_day(date) {
        return Ok(date);
    }

    let adjusted = match convention {
        BusinessDayConvention::Unadjusted => date,

        BusinessDayConvention::Following => following(date, calendar)?,

        BusinessDayConvention::ModifiedFollowing => {
            let forward = following(date, calendar)?;
            if forward.month() != date.month() {
                preceding(date, calendar)?
            } else {
                forward
            }
        }

        BusinessDayConvention::Preceding => preceding(date, calendar)?,

        BusinessDayConvention::ModifiedPreceding => {
            let back = preceding(date, calendar)?;
            if back.month() != date.month() {
                following(date, calendar)?
            } else {
                back
            }
        }
    };

    Ok(adjusted)
}

/// Upper bound on consecutive holidays before a calendar is considered broken.
const MAX_ROLL_DAYS: i64 = 31;

fn following<C: Calendar + ?Sized>(date: Date, calendar: &C) -> CoreResult<Date> {
    roll(date, 1, calendar)
}

fn preceding<C: Calendar + ?Sized>(date: Date, calendar: &C) -> CoreResult<Date> {
    roll(date, -1, calendar)
}

fn roll<C: Calendar + ?Sized>(date: Date, step: i64, calendar: &C) -> CoreResult<Date> {
    let mut current = date;
    for _ in 0..MAX_ROLL_DAYS {
        if calendar.is_business_day(current) {
            return Ok(current);
        }
        current = current.add_days(step);
    }
    Err(CoreError::calendar_error(format!(
        "{}: no business day within {MAX_ROLL_DAYS} days of {date}",
        calendar.name()
    )))
}
