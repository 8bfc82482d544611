//! # Parcurve Core
//!
//! Dates, calendars and market conventions for the Parcurve curve-construction library.
//!
//! This crate provides the foundational building blocks used throughout Parcurve:
//!
//! - **Types**: `Date`, `Tenor`, `Frequency`, `Compounding`, `Currency`
//! - **Day Count Conventions**: the accrual bases used by money market and swap legs
//! - **Business Day Calendars**: the `Calendar` trait, adjustment conventions and
//!   the `CalendarProvider` lookup keyed by `CalendarId`
//!
//! Every string key found in curve configuration maps onto a closed enum here,
//! so an unknown key is rejected when the configuration is loaded.
//!
//! ## Example
//!
//! ```rust
//! use parcurve_core::prelude::*;
//!
//! let trade = Date::from_ymd(2025, 1, 3).unwrap();
//! let spot = WeekendCalendar.add_business_days(trade, 2);
//! let maturity = "6M"
//!     .parse::<Tenor>()
//!     .unwrap()
//!     .advance(spot, &WeekendCalendar, BusinessDayConvention::ModifiedFollowing)
//!     .unwrap();
//!
//! let tau = DayCountConvention::Act360.fraction(spot, maturity);
//! assert!(tau > 0.5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::cast_possible_truncation)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessDayConvention, Calendar, CalendarId, CalendarProvider, HolidayCalendar,
        WeekendCalendar, WeekendsOnly,
    };
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Compounding, Currency, Date, Frequency, Tenor, TenorUnit};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Compounding, Currency, Date, Frequency, Tenor};
