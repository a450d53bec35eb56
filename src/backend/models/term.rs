//! Term representation for ground and symbolic data.
//!
//! A `Term` is either ordinary logic data (numbers, atoms, compound terms,
//! variables) or one of the symbolic forms that stand for quantities that only
//! exist once a continuous random variable is realized:
//!
//! - `SymbolicConstant` - an unresolved expression over random variables
//! - `DensityConstant` - the density of one realization of a variable
//! - `ValueExpr` - the memoized descriptor of a realized value
//! - `ValueDim` - one coordinate of a realized value
//!
//! Equality, ordering and hashing are structural, so a term can be used
//! directly as a content-addressing key.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::backend::symbol::{intern, Symbol};

/// Functor of a list cell
pub const LIST_FUNCTOR: &str = ".";
/// The empty list atom
pub const NIL_ATOM: &str = "[]";

/// Numeric constant.
///
/// Structural equality: `Int(1)` and `Float(1.0)` are different terms, and
/// floats compare by bit pattern. Use [`Number::numeric_cmp`] for arithmetic
/// comparison.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Arithmetic comparison; `None` when a NaN is involved.
    pub fn numeric_cmp(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Number::Int(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            Number::Float(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    // Standard order of terms: by value, ties broken Int before Float.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(b),
            (Number::Float(a), Number::Float(b)) => a.total_cmp(b),
            (Number::Int(a), Number::Float(b)) => {
                (*a as f64).total_cmp(b).then(Ordering::Less)
            }
            (Number::Float(a), Number::Int(b)) => {
                a.total_cmp(&(*b as f64)).then(Ordering::Greater)
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

/// A logic term, ground or symbolic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Constant(Number),
    Atom(Symbol),
    Compound {
        functor: Symbol,
        args: Vec<Term>,
    },
    Variable(Symbol),
    /// Unresolved expression over continuous random variables.
    /// `cvariables` is the union of the `cvariables` of `args`.
    SymbolicConstant {
        functor: Symbol,
        args: Vec<Term>,
        cvariables: BTreeSet<Symbol>,
    },
    DensityConstant(Symbol),
    /// Realized value descriptor: the distribution `functor(args)` realized
    /// under `name`, with `dimensions >= 1` coordinates.
    ValueExpr {
        functor: Symbol,
        args: Vec<Term>,
        name: Symbol,
        dimensions: usize,
    },
    /// Coordinate `dimension` of the realized value `name`.
    ValueDim {
        name: Symbol,
        dimension: usize,
    },
}

impl Term {
    pub fn int(i: i64) -> Self {
        Term::Constant(Number::Int(i))
    }

    pub fn float(x: f64) -> Self {
        Term::Constant(Number::Float(x))
    }

    pub fn atom(name: &str) -> Self {
        Term::Atom(intern(name))
    }

    pub fn var(name: &str) -> Self {
        Term::Variable(intern(name))
    }

    pub fn compound(functor: &str, args: Vec<Term>) -> Self {
        Term::Compound {
            functor: intern(functor),
            args,
        }
    }

    /// Build a symbolic constant; `cvariables` is derived from `args`.
    pub fn symbolic(functor: Symbol, args: Vec<Term>) -> Self {
        let cvariables = args.iter().flat_map(|a| a.cvariables()).collect();
        Term::SymbolicConstant {
            functor,
            args,
            cvariables,
        }
    }

    pub fn nil() -> Self {
        Term::atom(NIL_ATOM)
    }

    /// Build a proper Prolog list from `items`.
    pub fn list(items: Vec<Term>) -> Self {
        items.into_iter().rev().fold(Term::nil(), |tail, head| Term::Compound {
            functor: intern(LIST_FUNCTOR),
            args: vec![head, tail],
        })
    }

    /// Items of a proper list, `None` for partial lists and non-lists.
    pub fn as_list(&self) -> Option<Vec<Term>> {
        let mut items = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Term::Atom(name) if *name == NIL_ATOM => return Some(items),
                Term::Compound { functor, args } if *functor == LIST_FUNCTOR && args.len() == 2 => {
                    items.push(args[0].clone());
                    cursor = &args[1];
                }
                _ => return None,
            }
        }
    }

    pub fn is_list(&self) -> bool {
        self.as_list().is_some()
    }

    #[inline]
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Atom or compound term.
    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Term::Atom(_) | Term::Compound { .. })
    }

    /// Opaque symbolic form, carried as-is by the evaluator.
    #[inline]
    pub fn is_symbolic(&self) -> bool {
        matches!(
            self,
            Term::SymbolicConstant { .. }
                | Term::DensityConstant(_)
                | Term::ValueExpr { .. }
                | Term::ValueDim { .. }
        )
    }

    /// True when no variable occurs anywhere in the term.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Compound { args, .. }
            | Term::SymbolicConstant { args, .. }
            | Term::ValueExpr { args, .. } => args.iter().all(Term::is_ground),
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Term::Constant(n) => Some(*n),
            _ => None,
        }
    }

    /// Functor name of an atom, compound or symbolic constant.
    pub fn functor(&self) -> Option<&Symbol> {
        match self {
            Term::Atom(name) => Some(name),
            Term::Compound { functor, .. }
            | Term::SymbolicConstant { functor, .. }
            | Term::ValueExpr { functor, .. } => Some(functor),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Compound { args, .. }
            | Term::SymbolicConstant { args, .. }
            | Term::ValueExpr { args, .. } => args,
            _ => &[],
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.args().len()
    }

    /// Continuous random variables this term depends on.
    pub fn cvariables(&self) -> BTreeSet<Symbol> {
        match self {
            Term::SymbolicConstant { cvariables, .. } => cvariables.clone(),
            Term::DensityConstant(name)
            | Term::ValueExpr { name, .. }
            | Term::ValueDim { name, .. } => BTreeSet::from([name.clone()]),
            Term::Compound { args, .. } => args.iter().flat_map(|a| a.cvariables()).collect(),
            Term::Constant(_) | Term::Atom(_) | Term::Variable(_) => BTreeSet::new(),
        }
    }

    /// Coordinates of a realized value descriptor, one `ValueDim` per dimension.
    /// Empty for any other term.
    pub fn dimension_values(&self) -> Vec<Term> {
        match self {
            Term::ValueExpr {
                name, dimensions, ..
            } => (0..*dimensions)
                .map(|dimension| Term::ValueDim {
                    name: name.clone(),
                    dimension,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Number> for Term {
    fn from(n: Number) -> Self {
        Term::Constant(n)
    }
}

fn needs_quotes(name: &str) -> bool {
    if name.is_empty() {
        return true;
    }
    if name == NIL_ATOM || name == "!" || name == ";" {
        return false;
    }
    let symbolic = name.chars().all(|c| "+-*/\\^<>=~:.?@#&$".contains(c));
    let alnum = name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    !(symbolic || alnum)
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &Symbol) -> fmt::Result {
    if needs_quotes(name.as_str()) {
        write!(f, "'{}'", name.as_str().replace('\'', "\\'"))
    } else {
        write!(f, "{}", name)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Term]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, head: &Term, tail: &Term) -> fmt::Result {
    write!(f, "[{}", head)?;
    let mut cursor = tail;
    loop {
        match cursor {
            Term::Atom(name) if *name == NIL_ATOM => break,
            Term::Compound { functor, args } if *functor == LIST_FUNCTOR && args.len() == 2 => {
                write!(f, ",{}", args[0])?;
                cursor = &args[1];
            }
            other => {
                write!(f, "|{}", other)?;
                break;
            }
        }
    }
    f.write_str("]")
}

/// Canonical rendering, used for density names and in logs.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(n) => write!(f, "{}", n),
            Term::Atom(name) => write_name(f, name),
            Term::Variable(name) => write!(f, "{}", name),
            Term::Compound { functor, args } if *functor == LIST_FUNCTOR && args.len() == 2 => {
                write_list(f, &args[0], &args[1])
            }
            Term::Compound { functor, args } | Term::SymbolicConstant { functor, args, .. } => {
                write_name(f, functor)?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("(")?;
                write_args(f, args)?;
                f.write_str(")")
            }
            Term::DensityConstant(name) => write!(f, "density({})", name),
            Term::ValueExpr {
                functor,
                args,
                name,
                dimensions,
            } => {
                write!(f, "value({},", name)?;
                write_name(f, functor)?;
                f.write_str("(")?;
                write_args(f, args)?;
                write!(f, "),{})", dimensions)
            }
            Term::ValueDim { name, dimension } => write!(f, "{}[{}]", name, dimension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = Term::compound("f", vec![Term::int(1), Term::atom("x")]);
        let b = Term::compound("f", vec![Term::int(1), Term::atom("x")]);
        let c = Term::compound("f", vec![Term::float(1.0), Term::atom("x")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_number_ordering_and_numeric_compare() {
        assert!(Number::Int(1) < Number::Float(1.0));
        assert!(Number::Float(0.5) < Number::Int(1));
        assert_eq!(
            Number::Int(1).numeric_cmp(&Number::Float(1.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(Number::Float(f64::NAN).numeric_cmp(&Number::Int(0)), None);
    }

    #[test]
    fn test_symbolic_cvariables_union() {
        let x = Term::ValueDim {
            name: intern("x#1"),
            dimension: 0,
        };
        let y = Term::ValueDim {
            name: intern("y#2"),
            dimension: 0,
        };
        let sum = Term::symbolic(intern("+"), vec![x, Term::int(3)]);
        let cmp = Term::symbolic(intern("<"), vec![sum, y]);

        let names: Vec<String> = cmp.cvariables().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["x#1", "y#2"]);
        assert!(Term::int(3).cvariables().is_empty());
        assert!(Term::atom("a").cvariables().is_empty());
    }

    #[test]
    fn test_list_roundtrip_and_rendering() {
        let list = Term::list(vec![Term::int(1), Term::atom("a"), Term::float(2.5)]);
        assert_eq!(
            list.as_list(),
            Some(vec![Term::int(1), Term::atom("a"), Term::float(2.5)])
        );
        assert_eq!(list.to_string(), "[1,a,2.5]");
        assert_eq!(Term::nil().as_list(), Some(vec![]));

        let partial = Term::compound(LIST_FUNCTOR, vec![Term::int(1), Term::var("T")]);
        assert!(partial.as_list().is_none());
        assert_eq!(partial.to_string(), "[1|T]");
    }

    #[test]
    fn test_ground_check() {
        assert!(Term::compound("f", vec![Term::int(1)]).is_ground());
        assert!(!Term::compound("f", vec![Term::var("X")]).is_ground());
        assert!(Term::DensityConstant(intern("x#1")).is_ground());
    }

    #[test]
    fn test_canonical_rendering() {
        let t = Term::compound("normal", vec![Term::int(0), Term::float(1.0)]);
        assert_eq!(t.to_string(), "normal(0,1.0)");
        assert_eq!(Term::atom("Hello world").to_string(), "'Hello world'");
        assert_eq!(Term::atom("=<").to_string(), "=<");
    }

    #[test]
    fn test_dimension_values() {
        let value = Term::ValueExpr {
            functor: intern("normal2"),
            args: vec![],
            name: intern("p#3"),
            dimensions: 2,
        };
        let dims = value.dimension_values();
        assert_eq!(dims.len(), 2);
        assert_eq!(dims[1].to_string(), "p#3[1]");
        assert!(Term::int(1).dimension_values().is_empty());
    }
}
