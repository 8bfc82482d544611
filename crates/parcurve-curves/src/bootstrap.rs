//! Curve bootstrapping.
//!
//! The solver fixes one node per instrument, at the instrument's maturity, so
//! that the instrument's implied rate equals its quote. Nodes carry
//! continuously-compounded zero rates and are joined by the configured
//! interpolation over all nodes.
//!
//! # Algorithm
//!
//! 1. Sort instruments by maturity and reject duplicate or non-increasing
//!    maturities.
//! 2. Solve nodes in maturity order. Deposits, FRAs and futures start from
//!    their closed-form discount factor; swaps start from the curve so far.
//!    A start value that does not reprice under the refit curve is polished
//!    with a bracketed Brent search on `(0, 2]`.
//! 3. A cubic spline moves earlier nodes' values when a later node is added,
//!    so the solver sweeps all nodes again (each re-solved with the others
//!    fixed) until every instrument reprices within `refit_tolerance`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::types::Compounding;
use parcurve_core::Date;
use parcurve_math::solvers::{brent, find_bracket, SolverConfig};

use crate::curve::{InterpolationMethod, YieldCurve, ZeroCurve};
use crate::error::{CurveError, CurveResult};
use crate::instruments::CalibrationInstrument;
use crate::repricing::{validate_curve_repricing, BootstrapResult, BuildTimer};
use crate::traits::Curve;
use crate::validation::{Validate, ValidationError};

/// Solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Root-search tolerance on the rate residual.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap for one root search.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Smallest discount factor searched.
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,
    /// Largest discount factor searched.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
    /// Samples used to bracket a sign change.
    #[serde(default = "default_bracket_steps")]
    pub bracket_steps: u32,
    /// Interpolation applied to node zero rates.
    #[serde(default)]
    pub interpolation: InterpolationMethod,
    /// Largest accepted repricing error of a finished curve.
    #[serde(default = "default_repricing_tolerance")]
    pub repricing_tolerance: f64,
    /// Cap on refit sweeps after the first pass.
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    /// Largest repricing error that ends the refit sweeps.
    #[serde(default = "default_refit_tolerance")]
    pub refit_tolerance: f64,
}

fn default_tolerance() -> f64 {
    1e-14
}

fn default_max_iterations() -> u32 {
    100
}

fn default_lower_bound() -> f64 {
    1e-8
}

fn default_upper_bound() -> f64 {
    2.0
}

fn default_bracket_steps() -> u32 {
    64
}

fn default_repricing_tolerance() -> f64 {
    crate::repricing::DEFAULT_TOLERANCE
}

fn default_max_passes() -> u32 {
    50
}

fn default_refit_tolerance() -> f64 {
    1e-12
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            lower_bound: default_lower_bound(),
            upper_bound: default_upper_bound(),
            bracket_steps: default_bracket_steps(),
            interpolation: InterpolationMethod::default(),
            repricing_tolerance: default_repricing_tolerance(),
            max_passes: default_max_passes(),
            refit_tolerance: default_refit_tolerance(),
        }
    }
}

impl BootstrapConfig {
    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }
}

impl Validate for BootstrapConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.tolerance > 0.0) {
            errors.push(ValidationError::new("tolerance", "must be positive"));
        }
        if self.max_iterations == 0 {
            errors.push(ValidationError::new("max_iterations", "must be at least 1"));
        }
        if !(self.lower_bound > 0.0) {
            errors.push(ValidationError::new("lower_bound", "must be positive"));
        }
        if !(self.upper_bound > self.lower_bound) {
            errors.push(ValidationError::new("upper_bound", "must exceed lower_bound"));
        }
        if self.bracket_steps == 0 {
            errors.push(ValidationError::new("bracket_steps", "must be at least 1"));
        }
        if !(self.repricing_tolerance > 0.0) {
            errors.push(ValidationError::new("repricing_tolerance", "must be positive"));
        }
        if !(self.refit_tolerance > 0.0) {
            errors.push(ValidationError::new("refit_tolerance", "must be positive"));
        }

        errors
    }
}

/// Identity of the curve being solved.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSetup {
    /// Curve name.
    pub name: String,
    /// Settlement date; discount factor 1.
    pub settlement: Date,
    /// Day count measuring node times.
    pub day_count: DayCountConvention,
    /// Compounding for reported zero rates.
    pub compounding: Compounding,
}

impl CurveSetup {
    /// Creates a setup reporting continuous zero rates.
    #[must_use]
    pub fn new(name: impl Into<String>, settlement: Date, day_count: DayCountConvention) -> Self {
        Self {
            name: name.into(),
            settlement,
            day_count,
            compounding: Compounding::Continuous,
        }
    }

    /// Sets the reporting compounding.
    #[must_use]
    pub fn with_compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = compounding;
        self
    }

    fn time(&self, date: Date) -> f64 {
        self.day_count.fraction(self.settlement, date)
    }
}

/// Discount factor 1 everywhere; prices the first node's closed form.
struct UnitCurve(Date);

impl Curve for UnitCurve {
    fn settlement_date(&self) -> Date {
        self.0
    }

    fn discount_factor(&self, _date: Date) -> CurveResult<f64> {
        Ok(1.0)
    }
}

/// Node value as (date, continuous zero rate).
type Pillar = (Date, f64);

/// Sequential bootstrap with refit sweeps.
#[derive(Debug, Clone, Default)]
pub struct BootstrapSolver {
    config: BootstrapConfig,
}

impl BootstrapSolver {
    /// Creates a solver.
    #[must_use]
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    /// Solver settings.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Bootstraps a curve that reprices every instrument.
    ///
    /// # Errors
    ///
    /// - [`CurveError::Configuration`] for an empty instrument set, a maturity on
    ///   or before settlement, or a discounting curve that ends too early
    /// - [`CurveError::NonMonotoneMaturity`] for duplicate maturities
    /// - [`CurveError::BootstrapNonConvergence`] if a node cannot be solved or
    ///   the finished curve misses the repricing tolerance
    pub fn bootstrap(
        &self,
        setup: &CurveSetup,
        instruments: Vec<CalibrationInstrument>,
    ) -> CurveResult<YieldCurve> {
        self.bootstrap_validated(setup, instruments)?.into_curve()
    }

    /// Bootstraps a curve and reports how well it reprices its instruments.
    ///
    /// The result is returned even when repricing misses tolerance; check
    /// [`BootstrapResult::is_valid`].
    ///
    /// # Errors
    ///
    /// As [`BootstrapSolver::bootstrap`], except for repricing misses.
    pub fn bootstrap_validated(
        &self,
        setup: &CurveSetup,
        mut instruments: Vec<CalibrationInstrument>,
    ) -> CurveResult<BootstrapResult<YieldCurve>> {
        let timer = BuildTimer::start();
        self.config.validate_or_error()?;

        instruments.sort_by_key(CalibrationInstrument::maturity);
        check_maturities(setup, &instruments)?;
        check_discounting(setup, &instruments)?;

        let pillars = self.solve(setup, &instruments)?;
        let curve = YieldCurve::from_zero_rates(
            setup.name.clone(),
            setup.settlement,
            setup.day_count,
            self.config.interpolation,
            &pillars,
        )?
        .with_compounding(setup.compounding);

        let report =
            validate_curve_repricing(&curve, &instruments, self.config.repricing_tolerance)?;
        info!(
            curve = %setup.name,
            nodes = pillars.len(),
            max_error = report.max_error(),
            "bootstrapped curve"
        );

        Ok(BootstrapResult::new(curve, report, timer.elapsed()))
    }

    fn solve(
        &self,
        setup: &CurveSetup,
        instruments: &[CalibrationInstrument],
    ) -> CurveResult<Vec<Pillar>> {
        let mut pillars: Vec<Pillar> = Vec::with_capacity(instruments.len());

        for (i, instrument) in instruments.iter().enumerate() {
            let guess = self.initial_guess(setup, &pillars, instrument)?;
            pillars.push((instrument.maturity(), zero_from(setup, instrument.maturity(), guess)));
            let df = self.solve_node(setup, &mut pillars, i, instrument, guess)?;
            debug!(
                curve = %setup.name,
                instrument = instrument.id(),
                maturity = %instrument.maturity(),
                df,
                "solved node"
            );
        }

        let mut passes = 0;
        loop {
            let worst = self.worst_residual(setup, &pillars, instruments)?;
            if worst <= self.config.refit_tolerance {
                debug!(curve = %setup.name, passes, worst, "refit settled");
                return Ok(pillars);
            }
            if passes == self.config.max_passes {
                return Err(CurveError::non_convergence(
                    setup.name.clone(),
                    format!(
                        "refit did not settle after {passes} passes, worst residual {worst:.2e}"
                    ),
                ));
            }

            for (i, instrument) in instruments.iter().enumerate() {
                let current = (-pillars[i].1 * setup.time(pillars[i].0)).exp();
                self.solve_node(setup, &mut pillars, i, instrument, current)?;
            }
            passes += 1;
        }
    }

    /// Closed-form discount factor on the curve so far, else the curve's own
    /// value at maturity, else the quote as a flat rate.
    fn initial_guess(
        &self,
        setup: &CurveSetup,
        pillars: &[Pillar],
        instrument: &CalibrationInstrument,
    ) -> CurveResult<f64> {
        let maturity = instrument.maturity();
        if pillars.is_empty() {
            let unit = UnitCurve(setup.settlement);
            return Ok(instrument
                .closed_form_discount_factor(&unit)?
                .unwrap_or_else(|| (-instrument.quoted_rate() * setup.time(maturity)).exp()));
        }

        let partial = self.fit(setup, pillars)?;
        match instrument.closed_form_discount_factor(&partial)? {
            Some(df) => Ok(df),
            None => partial.discount_factor(maturity),
        }
    }

    /// Solves node `i` with every other node fixed, starting from `guess`.
    /// Leaves the solved zero rate in `pillars[i]` and returns its discount factor.
    fn solve_node(
        &self,
        setup: &CurveSetup,
        pillars: &mut [Pillar],
        i: usize,
        instrument: &CalibrationInstrument,
        guess: f64,
    ) -> CurveResult<f64> {
        let (maturity, _) = pillars[i];
        let snapshot = pillars.to_vec();
        let residual = |df: f64| -> f64 {
            if !(df > 0.0) {
                return f64::NAN;
            }
            let mut trial = snapshot.clone();
            trial[i].1 = zero_from(setup, maturity, df);
            self.fit(setup, &trial)
                .and_then(|curve| instrument.implied_rate(&curve))
                .map_or(f64::NAN, |rate| rate - instrument.quoted_rate())
        };

        let at_guess = residual(guess);
        let df = if at_guess.abs() <= self.config.tolerance {
            guess
        } else {
            debug!(
                curve = %setup.name,
                instrument = instrument.id(),
                residual = at_guess,
                "polishing node with root search"
            );
            let (lo, hi) = find_bracket(
                &residual,
                Some(guess),
                self.config.lower_bound,
                self.config.upper_bound,
                self.config.bracket_steps,
            )
            .map_err(|e| CurveError::from_solver(instrument.id(), &e))?;
            let solver = SolverConfig::new(self.config.tolerance, self.config.max_iterations);
            brent(&residual, lo, hi, &solver)
                .map_err(|e| CurveError::from_solver(instrument.id(), &e))?
                .root
        };

        pillars[i].1 = zero_from(setup, maturity, df);
        Ok(df)
    }

    fn fit(&self, setup: &CurveSetup, pillars: &[Pillar]) -> CurveResult<ZeroCurve> {
        ZeroCurve::fit(
            setup.settlement,
            setup.day_count,
            self.config.interpolation,
            pillars,
        )
    }

    fn worst_residual(
        &self,
        setup: &CurveSetup,
        pillars: &[Pillar],
        instruments: &[CalibrationInstrument],
    ) -> CurveResult<f64> {
        let curve = self.fit(setup, pillars)?;
        instruments.iter().try_fold(0.0_f64, |worst, instrument| {
            let error = (instrument.implied_rate(&curve)? - instrument.quoted_rate()).abs();
            Ok(if error.is_nan() { f64::INFINITY } else { worst.max(error) })
        })
    }
}

fn zero_from(setup: &CurveSetup, date: Date, df: f64) -> f64 {
    -df.ln() / setup.time(date)
}

/// Instruments must mature strictly after settlement and strictly after each other.
fn check_maturities(setup: &CurveSetup, instruments: &[CalibrationInstrument]) -> CurveResult<()> {
    let first = instruments.first().ok_or_else(|| {
        CurveError::configuration(format!("{}: no instruments selected", setup.name))
    })?;
    if setup.time(first.maturity()) <= 0.0 {
        return Err(CurveError::configuration(format!(
            "{}: {} matures on or before settlement {}",
            setup.name,
            first.id(),
            setup.settlement
        )));
    }

    for pair in instruments.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        if setup.time(next.maturity()) <= setup.time(previous.maturity()) {
            return Err(CurveError::non_monotone(
                previous.id(),
                next.id(),
                next.maturity(),
            ));
        }
    }
    Ok(())
}

/// Every attached discounting curve must reach the last payment it discounts.
fn check_discounting(setup: &CurveSetup, instruments: &[CalibrationInstrument]) -> CurveResult<()> {
    for instrument in instruments {
        if let Some((curve, last_payment)) = instrument.discounting() {
            if curve.max_date() < last_payment {
                return Err(CurveError::configuration(format!(
                    "{}: discounting curve {} ends {} before {} pays on {}",
                    setup.name,
                    curve.name(),
                    curve.max_date(),
                    instrument.id(),
                    last_payment
                )));
            }
        }
    }
    Ok(())
}
