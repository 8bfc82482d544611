//! # Parcurve Math
//!
//! Numerical routines for the Parcurve curve-construction library.
//!
//! This crate provides:
//!
//! - **Solvers**: Brent root finding and sign-change bracketing
//! - **Interpolation**: natural cubic spline and linear interpolation with
//!   flat extrapolation

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
#![allow(clippy::many_single_char_names)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{CubicSpline, Extrapolation, Interpolator, LinearInterpolator};
    pub use crate::solvers::{brent, find_bracket, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
