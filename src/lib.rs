//! dcground - guarded builtin evaluation for hybrid probabilistic logic
//!
//! This library grounds queries of a probabilistic logic language with
//! discrete and continuous random variables into a propositional proof
//! formula. A continuous random variable may be realized differently along
//! mutually exclusive proof branches, so every value the builtins compute is
//! paired with the guard (a node of the formula) under which it holds.
//!
//! # Architecture
//!
//! 1. **Guarded Formula** (`backend::formula`)
//!    - Content-addressed node registry: identical conditions share one node
//!    - Conjunctions are sorted and deduplicated; `True` is neutral
//!    - Realization sites, memoized value descriptors, density queries and
//!      free variables of continuous random variables
//!
//! 2. **Evaluation** (`backend::eval`, `backend::builtin`)
//!    - Arithmetic over the guarded cartesian product of operand values
//!    - Deterministic comparisons decided directly, symbolic ones registered
//!      as condition nodes
//!    - Answers reported as a finite stream ending in one completion marker
//!
//! # Example
//!
//! ```rust
//! use dcground::backend::*;
//!
//! let mut session = Session::new();
//! let g1 = session
//!     .formula_mut()
//!     .add_atom(Term::atom("tall"), Some(Term::float(0.3)), Source::Fact);
//! let r = Term::atom("r");
//! let delta = |n| Term::compound("delta", vec![Term::int(n)]);
//! session.formula_mut().add_density_site(r.clone(), Some(delta(3)), Guard::True);
//! session.formula_mut().add_density_site(r.clone(), Some(delta(7)), g1.into());
//!
//! let answers = session.call(">", &[r, Term::int(5)]).unwrap();
//! let guards: Vec<Guard> = answers.results().iter().map(|a| a.guard).collect();
//! assert_eq!(guards, vec![Guard::False, Guard::Node(g1)]);
//! ```

pub mod backend;

pub use backend::{
    Answers, EngineConfig, ExecError, GuardedFormula, GuardedValue, Session, Term, Value,
};
