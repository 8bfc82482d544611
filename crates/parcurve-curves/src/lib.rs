//! # Parcurve Curves
//!
//! Interest-rate curve bootstrapping for the Parcurve library.
//!
//! This crate provides:
//!
//! - **Collectors**: turn conventions, quotes and inclusion flags into
//!   deposits, futures, FRAs, term swaps and overnight-index swaps
//! - **Schedules**: unadjusted period dates with stub control
//! - **Bootstrap**: sequential node solving on interpolated zero rates, exact
//!   repricing of every input instrument
//! - **Dual curves**: overnight discounting curves built before the term
//!   curves that need them, with cycle detection and parallel batch builds
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parcurve_curves::prelude::*;
//!
//! let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &calendars);
//! let resolver = DualCurveResolver::new(builder);
//!
//! // Builds USD_OIS first, then discounts USD_3M swaps off it
//! let curve = resolver.build("USD_3M")?;
//! let df = curve.discount_factor(Date::from_ymd(2030, 1, 15)?)?;
//!
//! // Every curve in a batch, failures isolated per curve
//! let outcome = resolver.build_all(["USD_3M", "USD_6M", "EUR_6M"]);
//! for (name, error) in &outcome.failures {
//!     eprintln!("{name}: {error}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod bootstrap;
pub mod builder;
pub mod conventions;
pub mod curve;
pub mod error;
pub mod index;
pub mod instruments;
pub mod market;
pub mod repricing;
pub mod resolver;
pub mod schedule;
pub mod traits;
pub mod validation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{BootstrapConfig, BootstrapSolver, CurveSetup};
    pub use crate::builder::CurveBuilder;
    pub use crate::conventions::{
        CurveConvention, CurveKind, DepositConventions, FraConventions, FutureConventions,
        SwapConventions,
    };
    pub use crate::curve::{InterpolationMethod, YieldCurve, YieldCurveNode};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::index::{FloatingIndex, OvernightIndex, TermIndexFamily};
    pub use crate::instruments::{
        CalibrationInstrument, Deposit, Fra, Future, InstrumentType, OisSwap, Swap,
    };
    pub use crate::market::{
        ConventionSet, ConventionTable, InclusionTable, InstrumentInclusionTable,
        MarketQuoteStore, QuoteTable,
    };
    pub use crate::repricing::{BootstrapResult, RepricingCheck, RepricingReport};
    pub use crate::resolver::{BatchOutcome, CurveDependencyGraph, DualCurveResolver};
    pub use crate::schedule::{Direction, Schedule, ScheduleSpec};
    pub use crate::traits::Curve;
    pub use crate::validation::{Validate, ValidationError};

    pub use parcurve_core::prelude::*;
}

pub use bootstrap::{BootstrapConfig, BootstrapSolver};
pub use builder::CurveBuilder;
pub use curve::{InterpolationMethod, YieldCurve};
pub use error::{CurveError, CurveResult};
pub use resolver::{BatchOutcome, DualCurveResolver};
pub use traits::Curve;
