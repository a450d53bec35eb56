//! Arithmetic functions and evaluation errors.
//!
//! The `FunctionTable` maps `(name, arity)` to an [`ArithmeticFunction`]. It is
//! built once per session and passed by reference to the evaluator; nothing
//! here is global.
//!
//! Functions only ever see numbers. Lifting them over guarded and symbolic
//! operands is the evaluator's job (see `backend::eval`).

mod arithmetic;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::mode::ModeError;
use super::models::{Number, Term};
use super::symbol::{intern, Symbol};

pub use arithmetic::{
    Binary, Checked, Constant, DivOp, FloatUnary, IntDivOp, ModOp, PowOp, RemOp, Rounding, Unary,
};

/// Error raised while evaluating a builtin or an arithmetic expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    /// Argument instantiation does not match the builtin's mode pattern
    #[error(transparent)]
    Mode(#[from] ModeError),

    /// No arithmetic function is registered under this name and arity
    #[error("Unknown function '{name}'/{arity}")]
    UnknownFunction { name: String, arity: usize },

    /// No builtin predicate is registered under this name and arity
    #[error("Unknown builtin '{name}'/{arity}")]
    UnknownBuiltin { name: String, arity: usize },

    /// A builtin declares a mode pattern with an unknown letter or the wrong
    /// length
    #[error("Builtin '{functor}' declares invalid mode pattern '{pattern}'")]
    InvalidMode { functor: String, pattern: String },

    /// Domain error during function application (division by zero, overflow, ...)
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Density query on a term with no realization site
    #[error("Cannot query density of discrete random variable ({0})")]
    NotARandomVariable(Term),

    /// Value lookup on a term with no realization site
    #[error("The value of a discrete random variable ({0}) is not defined")]
    UndefinedRealization(Term),

    /// Foreign value without a term representation (or vice versa)
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Argument has the right instantiation but the wrong shape or type
    #[error("Incorrect argument: {0}")]
    IncorrectArgument(String),

    #[error(
        "Combinatorial explosion: evaluation would produce {size} guarded values, \
         exceeding limit of {limit}"
    )]
    CombinatorialExplosion { size: usize, limit: usize },
}

impl ExecError {
    /// Errors that make the current proof branch fail rather than abort the
    /// query: mode violations, numeric domain errors and ill-shaped arguments.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExecError::Mode(_) | ExecError::Arithmetic(_) | ExecError::IncorrectArgument(_)
        )
    }
}

/// Friendly type name for error messages
pub(crate) fn friendly_type_name(term: &Term) -> &'static str {
    match term {
        Term::Constant(Number::Int(_)) => "Number (integer)",
        Term::Constant(Number::Float(_)) => "Number (float)",
        Term::Atom(_) => "Atom",
        Term::Compound { .. } => "Compound",
        Term::Variable(_) => "Variable",
        Term::SymbolicConstant { .. } => "Symbolic expression",
        Term::DensityConstant(_) => "Density",
        Term::ValueExpr { .. } => "Realized value",
        Term::ValueDim { .. } => "Realized value dimension",
    }
}

/// A numeric function usable inside arithmetic expressions.
///
/// # Implementing a function
///
/// ```ignore
/// struct Hypot;
///
/// impl ArithmeticFunction for Hypot {
///     fn name(&self) -> &str { "hypot" }
///     fn arity(&self) -> usize { 2 }
///     fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
///         Ok(Number::Float(args[0].as_f64().hypot(args[1].as_f64())))
///     }
/// }
/// ```
pub trait ArithmeticFunction: Send + Sync {
    fn name(&self) -> &str;

    fn arity(&self) -> usize;

    /// Apply to exactly `arity()` numbers.
    ///
    /// Division by zero, overflow and out-of-domain inputs return
    /// `ExecError::Arithmetic`.
    fn apply(&self, args: &[Number]) -> Result<Number, ExecError>;
}

/// Registry of arithmetic functions, keyed by `(name, arity)`
#[derive(Clone)]
pub struct FunctionTable {
    functions: HashMap<(Symbol, usize), Arc<dyn ArithmeticFunction>>,
}

impl FunctionTable {
    /// Create a new empty table
    pub fn new() -> Self {
        FunctionTable {
            functions: HashMap::new(),
        }
    }

    /// Create a table with the standard Prolog arithmetic functions
    pub fn with_standard_functions() -> Self {
        let mut table = Self::new();
        for function in arithmetic::standard_functions() {
            table.register(function);
        }
        table
    }

    /// Register a function, replacing any previous one with the same name/arity
    pub fn register(&mut self, function: Arc<dyn ArithmeticFunction>) {
        let key = (intern(function.name()), function.arity());
        self.functions.insert(key, function);
    }

    /// Look up a function by name and arity
    pub fn get(&self, name: &Symbol, arity: usize) -> Option<&Arc<dyn ArithmeticFunction>> {
        self.functions.get(&(name.clone(), arity))
    }

    pub fn contains(&self, name: &Symbol, arity: usize) -> bool {
        self.functions.contains_key(&(name.clone(), arity))
    }

    /// True if some arity of `name` is registered
    pub fn knows_name(&self, name: &Symbol) -> bool {
        self.functions.keys().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::with_standard_functions()
    }
}
