//! The guarded formula: the proof DAG built while a query is grounded.
//!
//! Nodes are content-addressed. An atom is identified by a term and a
//! conjunction by its (sorted, deduplicated) children, so registering the same
//! condition twice returns the node created the first time. Nodes are only
//! ever added; a formula lives for one query (or one inference session) and is
//! then handed read-only to the knowledge-compilation backend through
//! [`GuardedFormula::export`].
//!
//! Next to the registry the formula keeps the bookkeeping for continuous
//! random variables (realization sites, memoized value descriptors, density
//! queries and free variables); see `density.rs`.

mod density;
mod shared;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use smallvec::SmallVec;
use tracing::trace;

use crate::backend::models::{Guard, NodeId, Term};
use crate::backend::symbol::Symbol;

pub use density::{DELTA, SITE_FUNCTOR};
pub use shared::SharedFormula;

/// Children of a conjunction, sorted and deduplicated
pub type Children = SmallVec<[NodeId; 4]>;

/// Where an atom came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Probabilistic fact supplied by the resolution loop
    Fact,
    /// Realization site of a continuous random variable
    Realization,
    /// Symbolic comparison or observation condition
    Condition,
    /// Deterministic builtin kept as a named atom
    Builtin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Atom {
        identifier: Term,
        /// Probability or distribution term; `None` for deterministic atoms
        probability: Option<Term>,
        source: Source,
    },
    Conj {
        children: Children,
    },
}

impl Node {
    pub fn probability(&self) -> Option<&Term> {
        match self {
            Node::Atom { probability, .. } => probability.as_ref(),
            Node::Conj { .. } => None,
        }
    }
}

/// Role under which a term is attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Query,
    Evidence,
}

#[derive(Debug, Default)]
pub struct GuardedFormula {
    nodes: Vec<Node>,
    atom_index: HashMap<Term, NodeId>,
    conj_index: HashMap<Children, NodeId>,
    names: BTreeMap<Label, Vec<(Term, Guard)>>,

    density_nodes: HashMap<Term, BTreeSet<NodeId>>,
    density_node_body: HashMap<NodeId, Guard>,
    density_values: HashMap<Symbol, Term>,
    density_queries: HashMap<Term, BTreeSet<Term>>,
    free_variables: BTreeSet<Term>,
}

/// Read-only view handed to the knowledge-compilation backend
#[derive(Debug, Clone, Copy)]
pub struct FormulaExport<'a> {
    pub nodes: &'a [Node],
    pub names: &'a BTreeMap<Label, Vec<(Term, Guard)>>,
    pub density_nodes: &'a HashMap<Term, BTreeSet<NodeId>>,
    pub density_queries: &'a HashMap<Term, BTreeSet<Term>>,
    pub free_variables: &'a BTreeSet<Term>,
}

impl GuardedFormula {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32 + 1), node))
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() as u32)
    }

    /// Register an atom, or return the node already registered for `identifier`.
    pub fn add_atom(&mut self, identifier: Term, probability: Option<Term>, source: Source) -> NodeId {
        if let Some(&id) = self.atom_index.get(&identifier) {
            trace!(target: "dcground::backend::formula::add_atom", %identifier, %id, "reused");
            return id;
        }
        let id = self.push(Node::Atom {
            identifier: identifier.clone(),
            probability,
            source,
        });
        trace!(target: "dcground::backend::formula::add_atom", %identifier, %id, "registered");
        self.atom_index.insert(identifier, id);
        id
    }

    /// Node already registered for `identifier`, if any
    pub fn find_atom(&self, identifier: &Term) -> Option<NodeId> {
        self.atom_index.get(identifier).copied()
    }

    /// Conjoin guards.
    ///
    /// `True` children are dropped and any `False` child makes the result
    /// `False`. No remaining child gives `True`, a single one is returned
    /// as-is, otherwise the conjunction node over the sorted, deduplicated
    /// children is registered (or reused).
    pub fn add_and<I>(&mut self, guards: I) -> Guard
    where
        I: IntoIterator<Item = Guard>,
    {
        let mut children = Children::new();
        for guard in guards {
            match guard {
                Guard::True => {}
                Guard::False => return Guard::False,
                Guard::Node(id) => children.push(id),
            }
        }
        children.sort_unstable();
        children.dedup();

        match children.len() {
            0 => Guard::True,
            1 => Guard::Node(children[0]),
            _ => {
                if let Some(&id) = self.conj_index.get(&children) {
                    return Guard::Node(id);
                }
                let id = self.push(Node::Conj {
                    children: children.clone(),
                });
                trace!(target: "dcground::backend::formula::add_and", ?children, %id);
                self.conj_index.insert(children, id);
                Guard::Node(id)
            }
        }
    }

    /// Conjunction of two guards
    #[inline]
    pub fn conjoin(&mut self, a: Guard, b: Guard) -> Guard {
        self.add_and([a, b])
    }

    /// Attach `term` to `guard` under `label`. Repeated registrations are ignored.
    pub fn add_name(&mut self, term: Term, guard: Guard, label: Label) {
        let entries = self.names.entry(label).or_default();
        if !entries.iter().any(|(t, g)| *t == term && *g == guard) {
            entries.push((term, guard));
        }
    }

    /// Terms registered under `label`, in registration order
    pub fn names(&self, label: Label) -> &[(Term, Guard)] {
        self.names.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn export(&self) -> FormulaExport<'_> {
        FormulaExport {
            nodes: &self.nodes,
            names: &self.names,
            density_nodes: &self.density_nodes,
            density_queries: &self.density_queries,
            free_variables: &self.free_variables,
        }
    }
}
