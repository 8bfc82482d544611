//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait used for date rolling and business-day counting
//! - Business day adjustment conventions
//! - [`CalendarId`] keys and the [`CalendarProvider`] lookup that resolves them
//!
//! Holiday tables themselves are supplied by the caller, either as a
//! [`HolidayCalendar`] or through a custom [`Calendar`] implementation.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod conventions;

pub use conventions::{adjust, BusinessDayConvention};

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> CoreResult<Date> {
        conventions::adjust(date, convention, self)
    }

    /// Advances a date by a number of business days.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Returns the next business day on or after the given date.
    fn next_business_day(&self, date: Date) -> Date {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.add_days(1);
        }
        result
    }

    /// Returns the previous business day on or before the given date.
    fn previous_business_day(&self, date: Date) -> Date {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.add_days(-1);
        }
        result
    }

    /// Counts business days between two dates (exclusive of start, inclusive of end).
    fn business_days_between(&self, start: Date, end: Date) -> i32 {
        let mut count = 0;
        let mut current = start.add_days(1);

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }
}

/// A simple weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Weekends plus an explicit holiday list.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    name: String,
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar closed on weekends and on every date in `holidays`.
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Adds a holiday.
    pub fn add_holiday(&mut self, date: Date) {
        self.holidays.insert(date);
    }

    /// Number of explicit holidays.
    #[must_use]
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.holidays.contains(&date)
    }
}

/// Identifier of a holiday calendar as named in curve conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CalendarId {
    /// New York Stock Exchange
    Nyse,
    /// TARGET2 (Euro)
    Target,
    /// London
    London,
    /// Tokyo
    Tokyo,
    /// Saturdays and Sundays only
    WeekendsOnly,
}

impl CalendarId {
    /// Every known calendar id.
    pub const ALL: [CalendarId; 5] = [
        CalendarId::Nyse,
        CalendarId::Target,
        CalendarId::London,
        CalendarId::Tokyo,
        CalendarId::WeekendsOnly,
    ];

    /// The key used in convention records.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            CalendarId::Nyse => "NYSE",
            CalendarId::Target => "TARGET",
            CalendarId::London => "London",
            CalendarId::Tokyo => "Tokyo",
            CalendarId::WeekendsOnly => "WeekendsOnly",
        }
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for CalendarId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nyse" => Ok(CalendarId::Nyse),
            "target" | "target2" => Ok(CalendarId::Target),
            "london" => Ok(CalendarId::London),
            "tokyo" => Ok(CalendarId::Tokyo),
            "weekendsonly" | "weekends only" => Ok(CalendarId::WeekendsOnly),
            _ => Err(CoreError::unknown_convention("calendar", s)),
        }
    }
}

/// Resolves calendar ids to calendars.
pub trait CalendarProvider: Send + Sync {
    /// Returns the calendar for `id`, if the provider has one.
    fn calendar(&self, id: CalendarId) -> Option<&dyn Calendar>;

    /// Returns the calendar for `id` or a [`CoreError::CalendarError`].
    fn require(&self, id: CalendarId) -> CoreResult<&dyn Calendar> {
        self.calendar(id)
            .ok_or_else(|| CoreError::calendar_error(format!("no calendar registered for {id}")))
    }
}

/// Provider that answers every id with a weekends-only calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl CalendarProvider for WeekendsOnly {
    fn calendar(&self, _id: CalendarId) -> Option<&dyn Calendar> {
        Some(&WeekendCalendar)
    }
}

/// In-memory calendar registry.
#[derive(Default)]
pub struct CalendarTable {
    calendars: HashMap<CalendarId, Box<dyn Calendar>>,
}

impl CalendarTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `calendar` under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: CalendarId, calendar: impl Calendar + 'static) {
        self.calendars.insert(id, Box::new(calendar));
    }

    /// Builder-style [`CalendarTable::insert`].
    #[must_use]
    pub fn with(mut self, id: CalendarId, calendar: impl Calendar + 'static) -> Self {
        self.insert(id, calendar);
        self
    }
}

impl CalendarProvider for CalendarTable {
    fn calendar(&self, id: CalendarId) -> Option<&dyn Calendar> {
        self.calendars.get(&id).map(AsRef::as_ref)
    }
}

impl fmt::Debug for CalendarTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.calendars.iter().map(|(id, cal)| (id, cal.name())))
            .finish()
    }
}
