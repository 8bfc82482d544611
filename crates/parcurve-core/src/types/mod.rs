//! Domain types for curve construction.
//!
//! - [`Date`]: Calendar date with clamped month arithmetic
//! - [`Tenor`]: Period length parsed from instrument ids (`ON`, `3M`, `10YR`)
//! - [`Currency`]: ISO currency codes
//! - [`Frequency`]: Swap leg payment frequency
//! - [`Compounding`]: Interest compounding convention

mod currency;
mod date;
mod frequency;
mod tenor;

pub use currency::Currency;
pub use date::{days_in_month, Date};
pub use frequency::{Compounding, Frequency};
pub use tenor::{Tenor, TenorUnit};
