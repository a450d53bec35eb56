use std::fmt;

use super::{Guard, Number, Term};

/// Result of evaluating an arithmetic expression along one proof branch.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Number),
    /// Depends on a not-yet-realized random variable; carried opaquely.
    Symbolic(Term),
    /// The branch has no value (e.g. a realization site without distribution).
    Undefined,
}

impl Value {
    #[inline]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Term form of the value. `Undefined` has none.
    pub fn to_term(&self) -> Option<Term> {
        match self {
            Value::Number(n) => Some(Term::Constant(*n)),
            Value::Symbolic(t) => Some(t.clone()),
            Value::Undefined => None,
        }
    }
}

impl From<Term> for Value {
    fn from(term: Term) -> Self {
        match term {
            Term::Constant(n) => Value::Number(n),
            other => Value::Symbolic(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Symbolic(t) => write!(f, "{}", t),
            Value::Undefined => f.write_str("undefined"),
        }
    }
}

/// A value paired with the guard under which it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardedValue {
    pub value: Value,
    pub guard: Guard,
}

impl GuardedValue {
    pub fn new(value: Value, guard: Guard) -> Self {
        GuardedValue { value, guard }
    }

    /// Value that holds unconditionally.
    pub fn certain(value: Value) -> Self {
        GuardedValue {
            value,
            guard: Guard::True,
        }
    }
}
