//! Shared helpers for the grounding integration tests
//!
//! - tracing output routed through the test writer
//! - constructors for distributions and realization sites
//! - guard extraction from answer streams

#![allow(dead_code)]

use dcground::backend::{Answers, Guard, Session, Source, Term};

/// Install a fmt subscriber once per test binary; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

pub fn delta(n: i64) -> Term {
    Term::compound("delta", vec![Term::int(n)])
}

pub fn normal(mean: i64, stddev: i64) -> Term {
    Term::compound("normal", vec![Term::int(mean), Term::int(stddev)])
}

/// Register a probabilistic fact and return its guard
pub fn fact(session: &mut Session, name: &str, probability: f64) -> Guard {
    session
        .formula_mut()
        .add_atom(Term::atom(name), Some(Term::float(probability)), Source::Fact)
        .into()
}

/// Register one realization site per `(distribution, body)` for `variable`
pub fn realize(session: &mut Session, variable: &Term, sites: &[(Term, Guard)]) {
    for (distribution, body) in sites {
        session
            .formula_mut()
            .add_density_site(variable.clone(), Some(distribution.clone()), *body);
    }
}

pub fn guards(answers: &Answers) -> Vec<Guard> {
    answers.results().iter().map(|a| a.guard).collect()
}
