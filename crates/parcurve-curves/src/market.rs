//! Market data lookups consumed by the collectors.
//!
//! The builders only see the traits; [`ConventionTable`], [`QuoteTable`] and
//! [`InclusionTable`] are in-memory implementations for tests and embedding.

use std::collections::{BTreeMap, HashMap};

use parcurve_core::Date;

use crate::conventions::CurveConvention;
use crate::error::CurveResult;
use crate::validation::Validate;

/// Convention lookup by curve name.
pub trait ConventionSet: Send + Sync {
    /// Returns the conventions of `curve`, if known.
    fn convention(&self, curve: &str) -> Option<&CurveConvention>;
}

/// Quote lookup.
///
/// Quotes are keyed by curve as well as instrument id because curves of the
/// same currency reuse ids such as `swaps_5YR`.
pub trait MarketQuoteStore: Send + Sync {
    /// Returns the quote of `instrument` on `curve` as of `as_of`.
    fn quote(&self, curve: &str, instrument: &str, as_of: Date) -> Option<f64>;
}

/// Per-curve inclusion flags.
pub trait InstrumentInclusionTable: Send + Sync {
    /// Every instrument id flagged for `curve`, with its flag.
    fn flags(&self, curve: &str) -> Vec<(String, bool)>;

    /// Ids of `class` (`deposits`, `fras`, `swaps`) flagged true for `curve`.
    fn selected(&self, curve: &str, class: &str) -> Vec<String> {
        let prefix = format!("{class}_");
        self.flags(curve)
            .into_iter()
            .filter(|(id, included)| *included && id.starts_with(&prefix))
            .map(|(id, _)| id)
            .collect()
    }
}

/// In-memory [`ConventionSet`].
#[derive(Debug, Clone, Default)]
pub struct ConventionTable {
    conventions: HashMap<String, CurveConvention>,
}

impl ConventionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers `convention` under `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CurveError::Configuration`] if the convention is invalid.
    pub fn insert(&mut self, curve: impl Into<String>, convention: CurveConvention) -> CurveResult<()> {
        convention.validate_or_error()?;
        self.conventions.insert(curve.into(), convention);
        Ok(())
    }

    /// Builder-style [`ConventionTable::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::CurveError::Configuration`] if the convention is invalid.
    pub fn with(mut self, curve: impl Into<String>, convention: CurveConvention) -> CurveResult<Self> {
        self.insert(curve, convention)?;
        Ok(self)
    }

    /// Curve names in the table, sorted.
    #[must_use]
    pub fn curve_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.conventions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }
}

impl ConventionSet for ConventionTable {
    fn convention(&self, curve: &str) -> Option<&CurveConvention> {
        self.conventions.get(curve)
    }
}

/// In-memory [`MarketQuoteStore`].
#[derive(Debug, Clone, Default)]
pub struct QuoteTable {
    quotes: HashMap<(String, String, Date), f64>,
}

impl QuoteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a quote, replacing any previous value.
    pub fn insert(&mut self, curve: &str, instrument: &str, as_of: Date, value: f64) {
        self.quotes
            .insert((curve.to_string(), instrument.to_string(), as_of), value);
    }

    /// Builder-style [`QuoteTable::insert`].
    #[must_use]
    pub fn with(mut self, curve: &str, instrument: &str, as_of: Date, value: f64) -> Self {
        self.insert(curve, instrument, as_of, value);
        self
    }

    /// Number of stored quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns true if no quotes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl MarketQuoteStore for QuoteTable {
    fn quote(&self, curve: &str, instrument: &str, as_of: Date) -> Option<f64> {
        self.quotes
            .get(&(curve.to_string(), instrument.to_string(), as_of))
            .copied()
    }
}

/// In-memory [`InstrumentInclusionTable`]. Ids are kept sorted per curve.
#[derive(Debug, Clone, Default)]
pub struct InclusionTable {
    flags: HashMap<String, BTreeMap<String, bool>>,
}

impl InclusionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag of `instrument` on `curve`.
    pub fn set(&mut self, curve: &str, instrument: &str, included: bool) {
        self.flags
            .entry(curve.to_string())
            .or_default()
            .insert(instrument.to_string(), included);
    }

    /// Flags every id in `instruments` as included on `curve`.
    #[must_use]
    pub fn include<'a>(mut self, curve: &str, instruments: impl IntoIterator<Item = &'a str>) -> Self {
        for id in instruments {
            self.set(curve, id, true);
        }
        self
    }
}

impl InstrumentInclusionTable for InclusionTable {
    fn flags(&self, curve: &str) -> Vec<(String, bool)> {
        self.flags
            .get(curve)
            .map(|ids| ids.iter().map(|(id, flag)| (id.clone(), *flag)).collect())
            .unwrap_or_default()
    }
}
