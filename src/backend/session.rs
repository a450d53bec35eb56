//! A grounding session: one formula plus the tables the builtins run against.

use std::sync::Arc;

use tracing::debug;

use crate::backend::builtin::{Builtin, BuiltinRegistry};
use crate::backend::config::EngineConfig;
use crate::backend::continuation::Answers;
use crate::backend::eval::{evaluate, EvalContext, ResolveFn};
use crate::backend::formula::GuardedFormula;
use crate::backend::grounded::{ArithmeticFunction, ExecError, FunctionTable};
use crate::backend::models::{GuardedValue, Term};

/// Owns the guarded formula of the current query together with the function
/// table, builtin registry and configuration.
///
/// The resolution loop registers facts and realization sites through
/// [`formula_mut`](Self::formula_mut), calls builtins through
/// [`call`](Self::call), and finally hands the formula to the
/// knowledge-compilation backend with [`take_formula`](Self::take_formula)
/// or [`into_formula`](Self::into_formula).
#[derive(Default)]
pub struct Session {
    formula: GuardedFormula,
    functions: FunctionTable,
    builtins: BuiltinRegistry,
    config: EngineConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        debug!(target: "dcground::backend::session::with_config", ?config);
        Session {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    /// Add an arithmetic function for this session
    pub fn register_function(&mut self, function: Arc<dyn ArithmeticFunction>) {
        self.functions.register(function);
    }

    /// Add a builtin predicate for this session
    pub fn register_builtin(&mut self, builtin: Arc<dyn Builtin>) {
        self.builtins.register(builtin);
    }

    pub fn formula(&self) -> &GuardedFormula {
        &self.formula
    }

    pub fn formula_mut(&mut self) -> &mut GuardedFormula {
        &mut self.formula
    }

    /// Call builtin `name`; random variables are named by the terms themselves.
    pub fn call(&mut self, name: &str, args: &[Term]) -> Result<Answers, ExecError> {
        let mut ctx = EvalContext::new(&mut self.formula, &self.functions, &self.config);
        self.builtins.call(name, args, &mut ctx)
    }

    /// Call builtin `name`, enumerating realization alternatives with `resolve`.
    pub fn call_with(
        &mut self,
        resolve: &ResolveFn,
        name: &str,
        args: &[Term],
    ) -> Result<Answers, ExecError> {
        let mut ctx = EvalContext::new(&mut self.formula, &self.functions, &self.config)
            .with_resolver(resolve);
        self.builtins.call(name, args, &mut ctx)
    }

    /// Evaluate an arithmetic expression to its guarded values
    pub fn evaluate(&mut self, expr: &Term) -> Result<Vec<GuardedValue>, ExecError> {
        let mut ctx = EvalContext::new(&mut self.formula, &self.functions, &self.config);
        evaluate(expr, &mut ctx)
    }

    /// Hand over the finished formula and start the next query with a fresh one.
    pub fn take_formula(&mut self) -> GuardedFormula {
        debug!(
            target: "dcground::backend::session::take_formula",
            nodes = self.formula.len()
        );
        std::mem::take(&mut self.formula)
    }

    pub fn into_formula(self) -> GuardedFormula {
        self.formula
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::{Guard, Number};

    struct Double;

    impl ArithmeticFunction for Double {
        fn name(&self) -> &str {
            "double"
        }

        fn arity(&self) -> usize {
            1
        }

        fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
            match args[0] {
                Number::Int(n) => n
                    .checked_mul(2)
                    .map(Number::Int)
                    .ok_or_else(|| ExecError::Arithmetic("Integer overflow.".into())),
                Number::Float(x) => Ok(Number::Float(x * 2.0)),
            }
        }
    }

    #[test]
    fn test_session_function_registration() {
        let mut session = Session::new();
        session.register_function(Arc::new(Double));
        let expr = Term::compound("double", vec![Term::int(21)]);
        let answers = session.call("is", &[Term::var("X"), expr]).unwrap();
        assert_eq!(answers.results()[0].args[0], Term::int(42));
    }

    #[test]
    fn test_take_formula_starts_fresh() {
        let mut session = Session::new();
        session
            .formula_mut()
            .add_density_site(Term::atom("r"), None, Guard::True);
        let formula = session.take_formula();

        assert_eq!(formula.len(), 1);
        assert!(session.formula().is_empty());
    }

    #[test]
    fn test_call_with_resolver() {
        let mut session = Session::new();
        let height = Term::compound("height", vec![Term::atom("bob")]);
        session.formula_mut().add_density_site(
            height.clone(),
            Some(Term::compound("delta", vec![Term::int(180)])),
            Guard::True,
        );

        let resolve = move |_: &Term| Ok::<_, ExecError>(vec![height.clone()]);
        let answers = session
            .call_with(&resolve, ">", &[Term::atom("h"), Term::int(170)])
            .unwrap();
        assert_eq!(answers.results()[0].guard, Guard::True);
    }
}
