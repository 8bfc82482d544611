//! Dependency-ordered curve builds.
//!
//! A term curve whose swaps discount off an overnight curve can only be built
//! once that overnight curve exists. The resolver derives these dependencies
//! from the conventions, orders the builds topologically and hands each
//! finished curve to its dependents.
//!
//! ```text
//! USD_OIS ──► USD_3M
//!        └──► USD_6M
//! EUR_OIS ──► EUR_6M
//! ```
//!
//! Batch builds run every level of the graph in parallel and never abort on a
//! single failure: a curve that fails, or sits on a cycle, is reported with
//! its error and every curve downstream of it fails with a
//! [`CurveError::Configuration`] naming the missing dependency.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::builder::CurveBuilder;
use crate::curve::YieldCurve;
use crate::error::{CurveError, CurveResult};
use crate::market::ConventionSet;

// =============================================================================
// DEPENDENCY GRAPH
// =============================================================================

/// Discounting dependencies between curves.
///
/// Edges run from the discounting curve to the curve that needs it. Adding a
/// curve also adds its dependencies, transitively.
#[derive(Debug, Clone, Default)]
pub struct CurveDependencyGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
    dependencies: HashMap<String, String>,
    expanded: HashSet<String>,
}

impl CurveDependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph of `names` and everything they discount off.
    ///
    /// Curves without conventions become dependency-free nodes; building them
    /// reports the missing conventions.
    pub fn from_conventions<I, S>(conventions: &dyn ConventionSet, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();
        for name in names {
            graph.add_curve(conventions, name.as_ref());
        }
        graph
    }

    /// Adds `name` and its dependency chain.
    pub fn add_curve(&mut self, conventions: &dyn ConventionSet, name: &str) {
        let mut pending = vec![name.to_string()];
        while let Some(curve) = pending.pop() {
            // A dependency gets its node before its own convention is read.
            if !self.expanded.insert(curve.clone()) {
                continue;
            }
            let node = self.node(&curve);
            let Some(dependency) = conventions
                .convention(&curve)
                .and_then(|c| c.discounting_curve())
            else {
                continue;
            };
            let parent = self.node(&dependency);
            self.graph.add_edge(parent, node, ());
            self.dependencies.insert(curve, dependency.clone());
            pending.push(dependency);
        }
    }

    /// Returns the node of `name`, creating it if needed. The node is not
    /// expanded; [`CurveDependencyGraph::add_curve`] handles that.
    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.nodes.get(name) {
            return index;
        }
        let index = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), index);
        index
    }

    /// Number of curves in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// True if the graph has no curves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// True if `name` is in the graph.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Curve names in lexicographic order.
    #[must_use]
    pub fn curve_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    /// The curve `name` discounts off, if any.
    #[must_use]
    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).map(String::as_str)
    }

    /// Curves that discount off `name`, sorted.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Vec<String> {
        let Some(&index) = self.nodes.get(name) else {
            return Vec::new();
        };
        let mut dependents: Vec<String> = self
            .graph
            .neighbors(index)
            .map(|n| self.graph[n].clone())
            .collect();
        dependents.sort();
        dependents.dedup();
        dependents
    }

    /// Every dependency cycle, each starting and ending at its smallest name.
    ///
    /// A curve that discounts off itself is a cycle of one.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || self.graph.contains_edge(component[0], component[0])
            })
            .filter_map(|component| {
                let start = component.iter().map(|&n| &self.graph[n]).min()?;
                Some(self.cycle_from(start))
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Follows dependencies from `start` until it comes back around.
    fn cycle_from(&self, start: &str) -> Vec<String> {
        let mut cycle = vec![start.to_string()];
        let mut current = start;
        while let Some(next) = self.dependency(current) {
            cycle.push(next.to_string());
            if next == start || cycle.len() > self.len() {
                break;
            }
            current = next;
        }
        cycle
    }

    /// Curves in build order, dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::CyclicDependency`] if the graph has a cycle.
    pub fn build_order(&self) -> CurveResult<Vec<String>> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|n| self.graph[n].clone()).collect())
            .map_err(|cycle| {
                let name = &self.graph[cycle.node_id()];
                let on_cycle = self
                    .cycles()
                    .into_iter()
                    .find(|c| c.iter().any(|member| member == name));
                CurveError::cyclic(on_cycle.unwrap_or_else(|| vec![name.clone()]))
            })
    }

    /// Curves off every cycle, grouped by dependency depth.
    ///
    /// Level 0 holds curves with no dependency, or whose dependency sits on a
    /// cycle; level `n + 1` holds curves discounting off level `n`. Each level
    /// is sorted.
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<String>> {
        let cyclic: BTreeSet<String> = self.cycles().into_iter().flatten().collect();
        let mut depths: HashMap<&str, usize> = HashMap::new();
        for name in self.nodes.keys() {
            if !cyclic.contains(name) {
                self.depth(name, &cyclic, &mut depths);
            }
        }

        let mut levels: Vec<Vec<String>> = Vec::new();
        for (name, depth) in depths {
            if levels.len() <= depth {
                levels.resize_with(depth + 1, Vec::new);
            }
            levels[depth].push(name.to_string());
        }
        for level in &mut levels {
            level.sort();
        }
        levels
    }

    fn depth<'g>(
        &'g self,
        name: &'g str,
        cyclic: &BTreeSet<String>,
        depths: &mut HashMap<&'g str, usize>,
    ) -> usize {
        if let Some(&depth) = depths.get(name) {
            return depth;
        }
        let depth = match self.dependency(name) {
            Some(parent) if !cyclic.contains(parent) => self.depth(parent, cyclic, depths) + 1,
            _ => 0,
        };
        depths.insert(name, depth);
        depth
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Outcome of a batch build: every curve that built and every curve that did not.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Built curves by name, including dependencies pulled in by the request.
    pub curves: BTreeMap<String, Arc<YieldCurve>>,
    /// Failed curves with their errors, sorted by name.
    pub failures: Vec<(String, CurveError)>,
}

impl BatchOutcome {
    /// True if nothing failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The built curve `name`, if it succeeded.
    #[must_use]
    pub fn curve(&self, name: &str) -> Option<&Arc<YieldCurve>> {
        self.curves.get(name)
    }

    /// The error of `name`, if it failed.
    #[must_use]
    pub fn failure(&self, name: &str) -> Option<&CurveError> {
        self.failures
            .iter()
            .find(|(curve, _)| curve == name)
            .map(|(_, error)| error)
    }
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Batch: {} built, {} failed",
            self.curves.len(),
            self.failures.len()
        )?;
        for (name, error) in &self.failures {
            writeln!(f, "  {name}: {error}")?;
        }
        Ok(())
    }
}

/// Builds curves after the curves they discount off.
pub struct DualCurveResolver<'a> {
    builder: CurveBuilder<'a>,
}

impl<'a> DualCurveResolver<'a> {
    /// Creates a resolver that reads dependencies from the builder's conventions.
    #[must_use]
    pub fn new(builder: CurveBuilder<'a>) -> Self {
        Self { builder }
    }

    /// The underlying single-curve builder.
    #[must_use]
    pub fn builder(&self) -> &CurveBuilder<'a> {
        &self.builder
    }

    /// Dependency graph of `names`.
    pub fn graph<I, S>(&self, names: I) -> CurveDependencyGraph
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        CurveDependencyGraph::from_conventions(self.builder.conventions(), names)
    }

    /// Builds `name`, building its discounting curve first.
    ///
    /// # Errors
    ///
    /// - [`CurveError::CyclicDependency`] if the dependency chain loops
    /// - [`CurveError::Configuration`] naming the dependency if it fails to build
    /// - any build error of `name` itself
    pub fn build(&self, name: &str) -> CurveResult<Arc<YieldCurve>> {
        let graph = self.graph([name]);
        let order = graph.build_order()?;

        let mut built: HashMap<String, Arc<YieldCurve>> = HashMap::new();
        for curve in order {
            let discounting = graph
                .dependency(&curve)
                .and_then(|dependency| built.get(dependency).cloned());
            match self.builder.build(&curve, discounting) {
                Ok(yield_curve) => {
                    built.insert(curve, Arc::new(yield_curve));
                }
                Err(e) if curve != name => {
                    return Err(CurveError::configuration(format!(
                        "{name} depends on {curve}, which failed: {e}"
                    )));
                }
                Err(e) => return Err(e),
            }
        }

        built.remove(name).ok_or_else(|| {
            CurveError::configuration(format!("{name} was not part of its own build order"))
        })
    }

    /// Builds every curve in `names` and their dependencies.
    ///
    /// Curves on the same dependency level are built in parallel. Failures are
    /// collected rather than returned, so one bad curve never hides the rest.
    pub fn build_all<I, S>(&self, names: I) -> BatchOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let graph = self.graph(names);
        let mut outcome = BatchOutcome::default();
        let mut failed: BTreeMap<String, CurveError> = BTreeMap::new();

        for cycle in graph.cycles() {
            warn!(cycle = %cycle.join(" -> "), "cyclic curve dependency");
            for member in &cycle {
                failed
                    .entry(member.clone())
                    .or_insert_with(|| CurveError::cyclic(cycle.clone()));
            }
        }

        for (depth, level) in graph.levels().into_iter().enumerate() {
            debug!(depth, curves = level.len(), "building dependency level");
            let results: Vec<(String, CurveResult<YieldCurve>)> = level
                .into_par_iter()
                .map(|name| {
                    let result = match graph.dependency(&name) {
                        Some(dependency) if failed.contains_key(dependency) => {
                            Err(CurveError::configuration(format!(
                                "{name} depends on {dependency}, which failed"
                            )))
                        }
                        dependency => {
                            let discounting =
                                dependency.and_then(|d| outcome.curves.get(d).cloned());
                            self.builder.build(&name, discounting)
                        }
                    };
                    (name, result)
                })
                .collect();

            for (name, result) in results {
                match result {
                    Ok(curve) => {
                        outcome.curves.insert(name, Arc::new(curve));
                    }
                    Err(e) => {
                        warn!(curve = %name, error = %e, "curve build failed");
                        failed.insert(name, e);
                    }
                }
            }
        }

        outcome.failures = failed.into_iter().collect();
        info!(
            curves = graph.len(),
            built = outcome.curves.len(),
            failed = outcome.failures.len(),
            "batch build finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{CurveConvention, DepositConventions};
    use crate::market::{ConventionTable, InclusionTable, QuoteTable};
    use parcurve_core::calendars::{BusinessDayConvention, CalendarId, WeekendsOnly};
    use parcurve_core::daycounts::DayCountConvention;
    use parcurve_core::types::Currency;
    use parcurve_core::Date;

    fn convention(currency: Currency) -> CurveConvention {
        CurveConvention::new(
            currency,
            CalendarId::WeekendsOnly,
            DepositConventions {
                spot_lag: 2,
                day_count: DayCountConvention::Act360,
                adjustment: BusinessDayConvention::ModifiedFollowing,
            },
        )
    }

    fn table(entries: Vec<(&str, CurveConvention)>) -> ConventionTable {
        entries
            .into_iter()
            .fold(ConventionTable::new(), |table, (name, c)| {
                table.with(name, c).unwrap()
            })
    }

    #[test]
    fn test_dependencies_are_pulled_in() {
        let conventions = table(vec![
            ("USD_OIS", convention(Currency::USD)),
            ("USD_3M", convention(Currency::USD).requiring_ois()),
            ("USD_6M", convention(Currency::USD).requiring_ois()),
        ]);
        let graph = CurveDependencyGraph::from_conventions(&conventions, ["USD_3M", "USD_6M"]);

        assert_eq!(graph.len(), 3);
        assert!(graph.contains("USD_OIS"));
        assert_eq!(graph.dependency("USD_3M"), Some("USD_OIS"));
        assert_eq!(graph.dependency("USD_OIS"), None);
        assert_eq!(graph.dependents("USD_OIS"), vec!["USD_3M", "USD_6M"]);
        assert!(graph.cycles().is_empty());
        assert_eq!(
            graph.levels(),
            vec![vec!["USD_OIS".to_string()], vec!["USD_3M".into(), "USD_6M".into()]]
        );

        let order = graph.build_order().unwrap();
        assert_eq!(order[0], "USD_OIS");
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_two_curve_cycle() {
        let conventions = table(vec![
            ("EUR_3M", convention(Currency::EUR).discounted_by("EUR_6M")),
            ("EUR_6M", convention(Currency::EUR).discounted_by("EUR_3M")),
            ("EUR_1M", convention(Currency::EUR).discounted_by("EUR_3M")),
        ]);
        let graph = CurveDependencyGraph::from_conventions(&conventions, ["EUR_1M"]);

        assert_eq!(
            graph.cycles(),
            vec![vec!["EUR_3M".to_string(), "EUR_6M".into(), "EUR_3M".into()]]
        );
        assert!(matches!(
            graph.build_order(),
            Err(CurveError::CyclicDependency { .. })
        ));
        // The dependent of the cycle still gets a level.
        assert_eq!(graph.levels(), vec![vec!["EUR_1M".to_string()]]);
    }

    #[test]
    fn test_transitive_chain_is_expanded() {
        let conventions = table(vec![
            ("USD_1M", convention(Currency::USD).discounted_by("USD_3M")),
            ("USD_3M", convention(Currency::USD).requiring_ois()),
            ("USD_OIS", convention(Currency::USD)),
        ]);
        let graph = CurveDependencyGraph::from_conventions(&conventions, ["USD_1M"]);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependency("USD_1M"), Some("USD_3M"));
        assert_eq!(graph.dependency("USD_3M"), Some("USD_OIS"));
        assert!(graph.cycles().is_empty());
        assert_eq!(
            graph.build_order().unwrap(),
            vec!["USD_OIS", "USD_3M", "USD_1M"]
        );
        assert_eq!(
            graph.levels(),
            vec![
                vec!["USD_OIS".to_string()],
                vec!["USD_3M".to_string()],
                vec!["USD_1M".to_string()],
            ]
        );
    }

    #[test]
    fn test_three_curve_cycle() {
        let conventions = table(vec![
            ("EUR_1M", convention(Currency::EUR).discounted_by("EUR_3M")),
            ("EUR_3M", convention(Currency::EUR).discounted_by("EUR_6M")),
            ("EUR_6M", convention(Currency::EUR).discounted_by("EUR_1M")),
        ]);

        for start in ["EUR_1M", "EUR_3M", "EUR_6M"] {
            let graph = CurveDependencyGraph::from_conventions(&conventions, [start]);
            assert_eq!(
                graph.cycles(),
                vec![vec![
                    "EUR_1M".to_string(),
                    "EUR_3M".into(),
                    "EUR_6M".into(),
                    "EUR_1M".into()
                ]]
            );
            match graph.build_order() {
                Err(CurveError::CyclicDependency { cycle }) => assert_eq!(cycle.len(), 4),
                other => panic!("expected a cycle, got {other:?}"),
            }
            assert!(graph.levels().is_empty());
        }
    }

    #[test]
    fn test_failure_deep_in_a_chain_reaches_the_requested_curve() {
        let conventions = table(vec![
            ("USD_1M", convention(Currency::USD).discounted_by("USD_3M")),
            ("USD_3M", convention(Currency::USD).discounted_by("XXX_OIS")),
        ]);
        let quotes = QuoteTable::new();
        let inclusion = InclusionTable::new();
        let anchor = Date::from_ymd(2025, 1, 15).unwrap();
        let builder = CurveBuilder::new(anchor, &conventions, &quotes, &inclusion, &WeekendsOnly);
        let resolver = DualCurveResolver::new(builder);

        match resolver.build("USD_1M") {
            Err(CurveError::Configuration { reason }) => {
                assert!(reason.contains("USD_1M depends on XXX_OIS"), "{reason}");
            }
            other => panic!("expected a dependency failure, got {other:?}"),
        }

        let outcome = resolver.build_all(["USD_1M"]);
        let failed: Vec<&str> = outcome.failures.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(failed, vec!["USD_1M", "USD_3M", "XXX_OIS"]);
        match outcome.failure("USD_1M") {
            Some(CurveError::Configuration { reason }) => assert!(reason.contains("USD_3M")),
            other => panic!("expected a dependency failure, got {other:?}"),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let conventions = table(vec![(
            "GBP_3M",
            convention(Currency::GBP).discounted_by("GBP_3M"),
        )]);
        let graph = CurveDependencyGraph::from_conventions(&conventions, ["GBP_3M"]);
        assert_eq!(
            graph.cycles(),
            vec![vec!["GBP_3M".to_string(), "GBP_3M".into()]]
        );
        assert!(graph.levels().is_empty());
    }

    #[test]
    fn test_unknown_curves_have_no_dependency() {
        let conventions = ConventionTable::new();
        let graph = CurveDependencyGraph::from_conventions(&conventions, ["XXX_3M", "XXX_3M"]);
        assert_eq!(graph.curve_names(), vec!["XXX_3M"]);
        assert_eq!(graph.dependency("XXX_3M"), None);
    }

    #[test]
    fn test_batch_outcome_lookup() {
        let outcome = BatchOutcome {
            curves: BTreeMap::new(),
            failures: vec![("USD_3M".to_string(), CurveError::configuration("boom"))],
        };
        assert!(!outcome.is_complete());
        assert!(outcome.failure("USD_3M").is_some());
        assert!(outcome.curve("USD_3M").is_none());
        assert!(outcome.to_string().contains("USD_3M: Configuration error: boom"));
    }
}
