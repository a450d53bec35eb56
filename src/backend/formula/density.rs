//! Per-variable bookkeeping for continuous random variables.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::{GuardedFormula, Source};
use crate::backend::grounded::ExecError;
use crate::backend::models::{Guard, NodeId, Term};
use crate::backend::symbol::{intern, Symbol};

/// Functor of a realization-site identifier: `~(Variable, Distribution, Body)`
pub const SITE_FUNCTOR: &str = "~";
/// Point-mass distribution; `delta(N)` realizes to the number `N`
pub const DELTA: &str = "delta";

fn guard_term(guard: Guard) -> Term {
    match guard {
        Guard::True => Term::atom("true"),
        Guard::False => Term::atom("false"),
        Guard::Node(id) => Term::int(i64::from(id.raw())),
    }
}

impl GuardedFormula {
    /// Record that `variable` is realized by `distribution` whenever `body`
    /// holds. `None` marks a site without distribution, whose value is
    /// undefined.
    ///
    /// Sites are content-addressed on `(variable, distribution, body)`, so
    /// grounding the same clause twice yields the same site.
    pub fn add_density_site(
        &mut self,
        variable: Term,
        distribution: Option<Term>,
        body: Guard,
    ) -> NodeId {
        let identifier = Term::compound(
            SITE_FUNCTOR,
            vec![
                variable.clone(),
                distribution.clone().unwrap_or_else(|| Term::atom("none")),
                guard_term(body),
            ],
        );
        let site = self.add_atom(identifier, distribution, Source::Realization);
        if !body.is_true() {
            self.density_node_body.insert(site, body);
        }
        debug!(target: "dcground::backend::formula::add_density_site", %variable, %site, %body);
        self.density_nodes.entry(variable).or_default().insert(site);
        site
    }

    /// True if `variable` has at least one realization site
    pub fn is_random_variable(&self, variable: &Term) -> bool {
        self.density_nodes
            .get(variable)
            .is_some_and(|sites| !sites.is_empty())
    }

    /// Realization sites of `variable`, in ascending node order
    pub fn density_sites(&self, variable: &Term) -> Option<&BTreeSet<NodeId>> {
        self.density_nodes.get(variable).filter(|sites| !sites.is_empty())
    }

    /// Condition under which `site` is reachable
    pub fn density_body(&self, site: NodeId) -> Guard {
        self.density_node_body
            .get(&site)
            .copied()
            .unwrap_or(Guard::True)
    }

    /// Name of the realization of `variable` at `site`
    pub fn density_name(variable: &Term, site: NodeId) -> Symbol {
        intern(&format!("{}#{}", variable, site.raw()))
    }

    /// Realized-value descriptor of `variable` at `site` with `dimensions`
    /// coordinates, computed once and memoized under
    /// [`density_name`](Self::density_name).
    ///
    /// A realization keeps the dimension it was first given: asking for a
    /// different one later is an `IncorrectArgument`.
    pub fn value_descriptor(
        &mut self,
        variable: &Term,
        site: NodeId,
        dimensions: usize,
    ) -> Result<Term, ExecError> {
        let dimensions = dimensions.max(1);
        let name = Self::density_name(variable, site);
        if let Some(value) = self.density_values.get(&name) {
            trace!(target: "dcground::backend::formula::value_descriptor", %name, "cache hit");
            return match value {
                Term::ValueExpr {
                    dimensions: cached, ..
                } if *cached != dimensions => Err(ExecError::IncorrectArgument(format!(
                    "{} is realized with {} dimension(s), not {}",
                    name, cached, dimensions
                ))),
                _ => Ok(value.clone()),
            };
        }
        self.create_descriptor(variable, site, name, dimensions)
    }

    /// The memoized descriptor of `variable` at `site`, whatever its
    /// dimension, or a new point descriptor.
    pub fn realized_descriptor(&mut self, variable: &Term, site: NodeId) -> Result<Term, ExecError> {
        let name = Self::density_name(variable, site);
        match self.density_values.get(&name) {
            Some(value) => Ok(value.clone()),
            None => self.create_descriptor(variable, site, name, 1),
        }
    }

    fn create_descriptor(
        &mut self,
        variable: &Term,
        site: NodeId,
        name: Symbol,
        dimensions: usize,
    ) -> Result<Term, ExecError> {
        let distribution = self
            .get_node(site)
            .and_then(|node| node.probability())
            .ok_or_else(|| ExecError::UndefinedRealization(variable.clone()))?;
        let (functor, args) = match distribution {
            Term::Constant(n) => (intern(DELTA), vec![Term::Constant(*n)]),
            other => match other.functor() {
                Some(functor) => (functor.clone(), other.args().to_vec()),
                None => {
                    return Err(ExecError::IncorrectArgument(format!(
                        "{} is not a distribution",
                        other
                    )))
                }
            },
        };
        let value = Term::ValueExpr {
            functor,
            args,
            name: name.clone(),
            dimensions,
        };
        trace!(target: "dcground::backend::formula::value_descriptor", %name, %value, "created");
        self.density_values.insert(name, value.clone());
        Ok(value)
    }

    /// Memoized descriptor by name
    pub fn density_value(&self, name: &Symbol) -> Option<&Term> {
        self.density_values.get(name)
    }

    pub fn add_density_query(&mut self, variable: Term, density: Term) {
        self.density_queries.entry(variable).or_default().insert(density);
    }

    pub fn density_queries(&self, variable: &Term) -> Option<&BTreeSet<Term>> {
        self.density_queries.get(variable)
    }

    /// Declare `variable` free (marginalized). Returns false if it already was.
    pub fn add_free_variable(&mut self, variable: Term) -> bool {
        self.free_variables.insert(variable)
    }

    pub fn free_variables(&self) -> &BTreeSet<Term> {
        &self.free_variables
    }

    pub fn is_free(&self, variable: &Term) -> bool {
        self.free_variables.contains(variable)
    }
}
