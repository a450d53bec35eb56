//! Builtin predicates.
//!
//! Every builtin receives its argument terms and an [`EvalContext`] (formula,
//! function table, resolver, configuration) and returns an [`Answers`]
//! stream. The registry checks the mode pattern before a builtin runs, and
//! [`BuiltinRegistry::call`] turns recoverable errors into a failed call.
//!
//! Catalog:
//! - `comparison` - `<`, `=<`, `>`, `>=`, `=:=`, `=\=`
//! - `assign` - `is`
//! - `density` - `density`, `free`, `free_list`, `as`
//! - `observation` - `observation`

mod assign;
mod comparison;
mod density;
mod observation;


use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::continuation::Answers;
use crate::backend::eval::EvalContext;
use crate::backend::grounded::ExecError;
use crate::backend::mode::check_mode;
use crate::backend::models::Term;
use crate::backend::symbol::{intern, Symbol};

pub use assign::IsOp;
pub use comparison::{
    CompareKind, GreaterEqOp, GreaterOp, LessEqOp, LessOp, NumEqOp, NumNeqOp,
};
pub use density::{AsOp, DensityOp, FreeListOp, FreeOp};
pub use observation::{ObservationOp, OBSERVATION_FUNCTOR};

/// A predicate implemented natively.
///
/// # Implementing a builtin
///
/// ```ignore
/// struct Positive;
///
/// impl Builtin for Positive {
///     fn name(&self) -> &str { "positive" }
///     fn mode(&self) -> &str { "g" }
///
///     fn execute(&self, args: &[Term], ctx: &mut EvalContext<'_>) -> Result<Answers, ExecError> {
///         let mut sink = AnswerSink::new();
///         for gv in evaluate(&args[0], ctx)? {
///             if gv.value.as_number().is_some_and(|n| n.as_f64() > 0.0) {
///                 sink.push(args.to_vec(), gv.guard);
///             }
///         }
///         Ok(sink.finish())
///     }
/// }
/// ```
pub trait Builtin: Send + Sync {
    fn name(&self) -> &str;

    /// Mode pattern, one character per argument (see `backend::mode`).
    /// Its length is the builtin's arity.
    fn mode(&self) -> &str;

    fn arity(&self) -> usize {
        self.mode().chars().count()
    }

    /// Run with arguments that already satisfy [`mode`](Self::mode).
    fn execute(&self, args: &[Term], ctx: &mut EvalContext<'_>) -> Result<Answers, ExecError>;
}

/// Registry of builtins, keyed by `(name, arity)`
#[derive(Clone)]
pub struct BuiltinRegistry {
    builtins: HashMap<(Symbol, usize), Arc<dyn Builtin>>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        BuiltinRegistry {
            builtins: HashMap::new(),
        }
    }

    /// Create a registry with the comparison, assignment, density and
    /// observation builtins
    pub fn with_standard_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LessOp));
        registry.register(Arc::new(LessEqOp));
        registry.register(Arc::new(GreaterOp));
        registry.register(Arc::new(GreaterEqOp));
        registry.register(Arc::new(NumEqOp));
        registry.register(Arc::new(NumNeqOp));
        registry.register(Arc::new(IsOp));
        registry.register(Arc::new(DensityOp));
        registry.register(Arc::new(FreeOp));
        registry.register(Arc::new(FreeListOp));
        registry.register(Arc::new(AsOp));
        registry.register(Arc::new(ObservationOp));
        registry
    }

    /// Register a builtin, replacing any previous one with the same name/arity
    pub fn register(&mut self, builtin: Arc<dyn Builtin>) {
        let key = (intern(builtin.name()), builtin.arity());
        self.builtins.insert(key, builtin);
    }

    pub fn get(&self, name: &str, arity: usize) -> Option<&Arc<dyn Builtin>> {
        self.builtins.get(&(intern(name), arity))
    }

    pub fn contains(&self, name: &str, arity: usize) -> bool {
        self.get(name, arity).is_some()
    }

    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }

    /// Run builtin `name` on `args`.
    ///
    /// Mode violations, arithmetic errors and ill-shaped arguments make the
    /// call fail (no results, one completion) with the error kept on the
    /// returned [`Answers`]. Any other error aborts the query and is returned.
    pub fn call(
        &self,
        name: &str,
        args: &[Term],
        ctx: &mut EvalContext<'_>,
    ) -> Result<Answers, ExecError> {
        let builtin = self
            .get(name, args.len())
            .ok_or_else(|| ExecError::UnknownBuiltin {
                name: name.to_string(),
                arity: args.len(),
            })?;

        let result =
            check_mode(args, builtin.mode(), name).and_then(|()| builtin.execute(args, ctx));
        match result {
            Ok(answers) => {
                debug!(
                    target: "dcground::backend::builtin::call",
                    name,
                    results = answers.len()
                );
                Ok(answers)
            }
            Err(e) if e.is_recoverable() => {
                warn!(target: "dcground::backend::builtin::call", name, error = %e, "builtin failed");
                Ok(Answers::failed(e))
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::with_standard_builtins()
    }
}
