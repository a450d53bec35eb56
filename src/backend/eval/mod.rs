// Guarded evaluation: every sub-expression may denote different values along
// different, mutually exclusive proof branches.
//
// evaluate(n)            = [(n, true)]
// evaluate(symbolic)     = [(symbolic, true)]
// evaluate(f(a1..ak))    = for (v1,g1)..(vk,gk) in evaluate(a1) x .. x evaluate(ak):
//                            (f(v1..vk), and(g1..gk))
// evaluate(other)        = for alt in resolve(other): realized_values(alt)

mod cartesian;


use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::backend::config::EngineConfig;
use crate::backend::formula::{GuardedFormula, DELTA};
use crate::backend::grounded::{ArithmeticFunction, ExecError, FunctionTable};
use crate::backend::models::{GuardedValue, Number, Term, Value};
use crate::backend::symbol::Symbol;

pub use cartesian::{check_product_size, product_size, Combination, GuardedProduct};

/// Enumerates the realization alternatives of a non-arithmetic term.
///
/// The resolution loop supplies this; each alternative is looked up as a
/// random variable in the formula.
pub type ResolveFn = dyn Fn(&Term) -> Result<Vec<Term>, ExecError>;

/// The term itself names the random variable.
pub fn resolve_identity(term: &Term) -> Result<Vec<Term>, ExecError> {
    Ok(vec![term.clone()])
}

/// Everything the evaluator needs for one call.
pub struct EvalContext<'a> {
    pub formula: &'a mut GuardedFormula,
    pub functions: &'a FunctionTable,
    pub resolve: &'a ResolveFn,
    pub config: &'a EngineConfig,
    /// Terms whose alternatives are being evaluated, innermost last
    resolving: Vec<Term>,
}

impl<'a> EvalContext<'a> {
    /// Context with the identity resolver
    pub fn new(
        formula: &'a mut GuardedFormula,
        functions: &'a FunctionTable,
        config: &'a EngineConfig,
    ) -> Self {
        EvalContext {
            formula,
            functions,
            resolve: &resolve_identity,
            config,
            resolving: Vec::new(),
        }
    }

    pub fn with_resolver(mut self, resolve: &'a ResolveFn) -> Self {
        self.resolve = resolve;
        self
    }
}

/// Evaluate `expr` to every value it can take, each paired with the guard
/// under which it holds.
pub fn evaluate(expr: &Term, ctx: &mut EvalContext<'_>) -> Result<Vec<GuardedValue>, ExecError> {
    trace!(target: "dcground::backend::eval::evaluate", %expr);

    match expr {
        Term::Constant(n) => Ok(vec![GuardedValue::certain(Value::Number(*n))]),
        symbolic if symbolic.is_symbolic() => {
            Ok(vec![GuardedValue::certain(Value::Symbolic(symbolic.clone()))])
        }
        Term::Variable(name) => Err(ExecError::IncorrectArgument(format!(
            "Arguments are not sufficiently instantiated: {}",
            name
        ))),
        Term::Atom(name) | Term::Compound { functor: name, .. }
            if ctx.functions.contains(name, expr.arity()) =>
        {
            apply_function(name, expr.args(), ctx)
        }
        _ => evaluate_realizations(expr, ctx),
    }
}

/// Apply the function registered under `(name, args.len())` over the guarded
/// cartesian product of its evaluated arguments.
pub fn apply_function(
    name: &Symbol,
    args: &[Term],
    ctx: &mut EvalContext<'_>,
) -> Result<Vec<GuardedValue>, ExecError> {
    let functions: &FunctionTable = ctx.functions;
    let function = functions
        .get(name, args.len())
        .ok_or_else(|| ExecError::UnknownFunction {
            name: name.to_string(),
            arity: args.len(),
        })?;

    let operands = args
        .iter()
        .map(|arg| evaluate(arg, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    let size = check_product_size(&operands, ctx.config.max_cartesian_results)?;

    let mut results = Vec::with_capacity(size);
    for combo in GuardedProduct::new(&operands) {
        let guard = ctx.formula.add_and(combo.iter().map(|gv| gv.guard));
        let value = apply_to_values(function.as_ref(), name, &combo)?;
        trace!(target: "dcground::backend::eval::apply_function", %name, %value, %guard);
        results.push(GuardedValue::new(value, guard));
    }
    Ok(results)
}

/// One tuple of the product: compute if every operand is a number, stay
/// symbolic otherwise. An undefined operand makes the result undefined.
fn apply_to_values(
    function: &dyn ArithmeticFunction,
    name: &Symbol,
    combo: &Combination<'_>,
) -> Result<Value, ExecError> {
    if combo.iter().any(|gv| gv.value.is_undefined()) {
        return Ok(Value::Undefined);
    }

    let numbers: Option<SmallVec<[Number; 4]>> =
        combo.iter().map(|gv| gv.value.as_number()).collect();
    match numbers {
        Some(numbers) => function.apply(&numbers).map(Value::Number),
        None => {
            let args = combo.iter().filter_map(|gv| gv.value.to_term()).collect();
            Ok(Value::Symbolic(Term::symbolic(name.clone(), args)))
        }
    }
}

/// Values of the realization alternatives of `expr`. A term reached again
/// while its own alternatives are being evaluated is a cyclic resolution.
fn evaluate_realizations(
    expr: &Term,
    ctx: &mut EvalContext<'_>,
) -> Result<Vec<GuardedValue>, ExecError> {
    if ctx.resolving.contains(expr) {
        return Err(ExecError::IncorrectArgument(format!(
            "cyclic realization of {}",
            expr
        )));
    }
    ctx.resolving.push(expr.clone());
    let result = evaluate_alternatives(expr, ctx);
    ctx.resolving.pop();
    result
}

fn evaluate_alternatives(
    expr: &Term,
    ctx: &mut EvalContext<'_>,
) -> Result<Vec<GuardedValue>, ExecError> {
    let alternatives = (ctx.resolve)(expr)?;
    debug!(
        target: "dcground::backend::eval::evaluate_realizations",
        %expr,
        alternatives = alternatives.len()
    );

    let mut values = Vec::new();
    for alternative in &alternatives {
        if ctx.formula.is_random_variable(alternative) {
            values.extend(realized_values(alternative, ctx)?);
        } else if alternative == expr {
            return Err(not_evaluable(expr, ctx.functions));
        } else {
            values.extend(evaluate(alternative, ctx)?);
        }
    }
    Ok(values)
}

/// A term that neither computes nor names a random variable. A name the
/// function table knows under another arity is a misspelt call.
fn not_evaluable(expr: &Term, functions: &FunctionTable) -> ExecError {
    match expr.functor() {
        Some(name) if functions.knows_name(name) => ExecError::UnknownFunction {
            name: name.to_string(),
            arity: expr.arity(),
        },
        _ => ExecError::UndefinedRealization(expr.clone()),
    }
}

/// Values of `variable`, one per realization site, each under the site's
/// body guard.
///
/// A `delta(N)` site realizes to `N`, a site without distribution to
/// `Value::Undefined`, any other site to the coordinates of its memoized
/// value descriptor.
pub fn realized_values(
    variable: &Term,
    ctx: &mut EvalContext<'_>,
) -> Result<Vec<GuardedValue>, ExecError> {
    let sites: Vec<_> = ctx
        .formula
        .density_sites(variable)
        .ok_or_else(|| ExecError::UndefinedRealization(variable.clone()))?
        .iter()
        .copied()
        .collect();

    let mut values = Vec::with_capacity(sites.len());
    for site in sites {
        let guard = ctx.formula.density_body(site);
        let distribution = ctx
            .formula
            .get_node(site)
            .and_then(|node| node.probability())
            .cloned();

        let value = match distribution {
            None => Value::Undefined,
            Some(distribution) => match point_mass(&distribution) {
                Some(n) => Value::Number(n),
                None => {
                    let descriptor = ctx.formula.realized_descriptor(variable, site)?;
                    let mut coordinates = descriptor.dimension_values();
                    if coordinates.len() == 1 {
                        Value::Symbolic(coordinates.remove(0))
                    } else {
                        Value::Symbolic(Term::list(coordinates))
                    }
                }
            },
        };
        trace!(target: "dcground::backend::eval::realized_values", %variable, %site, %value, %guard);
        values.push(GuardedValue::new(value, guard));
    }
    Ok(values)
}

/// `delta(N)` or a bare number
fn point_mass(distribution: &Term) -> Option<Number> {
    match distribution {
        Term::Constant(n) => Some(*n),
        Term::Compound { functor, args } if *functor == DELTA && args.len() == 1 => {
            args[0].as_number()
        }
        _ => None,
    }
}
