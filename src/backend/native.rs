//! Conversion between terms and the values of a native logic engine.
//!
//! An external Prolog backend can stand in for the built-in resolution
//! loop. Its values cross into this crate as [`NativeValue`]s: compound
//! terms, atoms, numbers, lists and unbound variables map one-to-one onto
//! [`Term`]s; strings and dictionaries have no term form and are rejected.

use std::collections::BTreeMap;

use crate::backend::grounded::{friendly_type_name, ExecError};
use crate::backend::models::{Number, Term};
use crate::backend::symbol::intern;

/// A value as produced or consumed by a native logic engine
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Functor { name: String, args: Vec<NativeValue> },
    Atom(String),
    Int(i64),
    Float(f64),
    List(Vec<NativeValue>),
    /// Unbound variable, by name
    Variable(String),
    Str(String),
    Dict(BTreeMap<String, NativeValue>),
}

impl NativeValue {
    fn kind(&self) -> &'static str {
        match self {
            NativeValue::Functor { .. } => "functor",
            NativeValue::Atom(_) => "atom",
            NativeValue::Int(_) => "integer",
            NativeValue::Float(_) => "float",
            NativeValue::List(_) => "list",
            NativeValue::Variable(_) => "variable",
            NativeValue::Str(_) => "string",
            NativeValue::Dict(_) => "dict",
        }
    }
}

/// Convert a native value to a term
pub fn native_to_term(value: &NativeValue) -> Result<Term, ExecError> {
    match value {
        NativeValue::Functor { name, args } => {
            let args = args
                .iter()
                .map(native_to_term)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Term::Compound {
                functor: intern(name),
                args,
            })
        }
        NativeValue::Atom(name) => Ok(Term::atom(name)),
        NativeValue::Int(n) => Ok(Term::int(*n)),
        NativeValue::Float(x) => Ok(Term::float(*x)),
        NativeValue::List(items) => {
            let items = items
                .iter()
                .map(native_to_term)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Term::list(items))
        }
        NativeValue::Variable(name) => Ok(Term::var(name)),
        other @ (NativeValue::Str(_) | NativeValue::Dict(_)) => Err(ExecError::Conversion(
            format!("unhandled native {} value: {:?}", other.kind(), other),
        )),
    }
}

/// Convert a term to a native value. Proper lists become `List`; symbolic
/// terms only exist inside the grounder and are rejected.
pub fn term_to_native(term: &Term) -> Result<NativeValue, ExecError> {
    if let Some(items) = term.as_list() {
        let items = items
            .iter()
            .map(term_to_native)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(NativeValue::List(items));
    }

    match term {
        Term::Constant(Number::Int(n)) => Ok(NativeValue::Int(*n)),
        Term::Constant(Number::Float(x)) => Ok(NativeValue::Float(*x)),
        Term::Atom(name) => Ok(NativeValue::Atom(name.to_string())),
        Term::Compound { functor, args } => {
            let args = args
                .iter()
                .map(term_to_native)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NativeValue::Functor {
                name: functor.to_string(),
                args,
            })
        }
        Term::Variable(name) => Ok(NativeValue::Variable(name.to_string())),
        other => Err(ExecError::Conversion(format!(
            "{} has no native representation: {}",
            friendly_type_name(other),
            other
        ))),
    }
}
