//! Arithmetic comparison builtins.
//!
//! Provides the standard comparison operations:
//! - `LessOp`, `LessEqOp` - `<` / `=<`
//! - `GreaterOp`, `GreaterEqOp` - `>` / `>=`
//! - `NumEqOp`, `NumNeqOp` - `=:=` / `=\=`
//!
//! Both sides are evaluated to guarded values and every pair of the product
//! is decided separately. Numeric pairs pass under the pair's guard or fail
//! under `Guard::False`. Pairs involving a symbolic value become a condition
//! node conjoined with the pair's guard.

use std::cmp::Ordering;

use itertools::iproduct;
use tracing::trace;

use super::Builtin;
use crate::backend::continuation::{AnswerSink, Answers};
use crate::backend::eval::{evaluate, EvalContext};
use crate::backend::formula::Source;
use crate::backend::grounded::ExecError;
use crate::backend::models::{Guard, GuardedValue, Number, Term, Value};
use crate::backend::symbol::intern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareKind {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    Neq,
}

impl CompareKind {
    /// Predicate name
    pub fn name(self) -> &'static str {
        match self {
            CompareKind::Less => "<",
            CompareKind::LessEq => "=<",
            CompareKind::Greater => ">",
            CompareKind::GreaterEq => ">=",
            CompareKind::Eq => "=:=",
            CompareKind::Neq => "=\\=",
        }
    }

    /// Functor of the symbolic condition handed to the backend
    pub fn symbolic_functor(self) -> &'static str {
        match self {
            CompareKind::Less => "<",
            CompareKind::LessEq => "<=",
            CompareKind::Greater => ">",
            CompareKind::GreaterEq => ">=",
            CompareKind::Eq => "==",
            CompareKind::Neq => "!=",
        }
    }

    /// Decide the comparison. NaN compares unequal to everything.
    pub fn holds(self, a: &Number, b: &Number) -> bool {
        let ord = a.numeric_cmp(b);
        match self {
            CompareKind::Less => ord == Some(Ordering::Less),
            CompareKind::LessEq => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            CompareKind::Greater => ord == Some(Ordering::Greater),
            CompareKind::GreaterEq => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            CompareKind::Eq => ord == Some(Ordering::Equal),
            CompareKind::Neq => ord != Some(Ordering::Equal),
        }
    }
}

macro_rules! comparison_builtin {
    ($(#[$doc:meta])* $op:ident, $kind:expr) => {
        $(#[$doc])*
        pub struct $op;

        impl Builtin for $op {
            fn name(&self) -> &str {
                $kind.name()
            }

            fn mode(&self) -> &str {
                "gg"
            }

            fn execute(
                &self,
                args: &[Term],
                ctx: &mut EvalContext<'_>,
            ) -> Result<Answers, ExecError> {
                eval_comparison(args, ctx, $kind)
            }
        }
    };
}

comparison_builtin!(
    /// Less than: `X < Y`
    LessOp,
    CompareKind::Less
);
comparison_builtin!(
    /// Less than or equal: `X =< Y`
    LessEqOp,
    CompareKind::LessEq
);
comparison_builtin!(
    /// Greater than: `X > Y`
    GreaterOp,
    CompareKind::Greater
);
comparison_builtin!(
    /// Greater than or equal: `X >= Y`
    GreaterEqOp,
    CompareKind::GreaterEq
);
comparison_builtin!(
    /// Arithmetic equality: `X =:= Y`
    NumEqOp,
    CompareKind::Eq
);
comparison_builtin!(
    /// Arithmetic inequality: `X =\= Y`
    NumNeqOp,
    CompareKind::Neq
);

fn eval_comparison(
    args: &[Term],
    ctx: &mut EvalContext<'_>,
    kind: CompareKind,
) -> Result<Answers, ExecError> {
    let lhs = evaluate(&args[0], ctx)?;
    let rhs = evaluate(&args[1], ctx)?;
    let size = lhs.len().saturating_mul(rhs.len());
    let limit = ctx.config.max_cartesian_results;
    if size > limit {
        return Err(ExecError::CombinatorialExplosion { size, limit });
    }

    let mut sink = AnswerSink::new();
    for (a, b) in iproduct!(&lhs, &rhs) {
        let pair_guard = ctx.formula.conjoin(a.guard, b.guard);
        match (&a.value, &b.value) {
            (Value::Number(x), Value::Number(y)) => {
                let guard = if kind.holds(x, y) {
                    passing_guard(kind, *x, *y, pair_guard, ctx)
                } else {
                    Guard::False
                };
                trace!(target: "dcground::backend::builtin::eval_comparison", %x, %y, op = kind.name(), %guard);
                sink.push(args.to_vec(), guard);
            }
            (Value::Undefined, _) | (_, Value::Undefined) => {
                sink.push(args.to_vec(), Guard::False);
            }
            _ => {
                let (guard, operands) = symbolic_condition(kind, a, b, pair_guard, ctx);
                sink.push(operands, guard);
            }
        }
    }
    Ok(sink.finish())
}

/// Guard of a numeric pair that passed. With `keep_builtins` the comparison
/// itself is kept in the formula as a deterministic atom.
fn passing_guard(
    kind: CompareKind,
    x: Number,
    y: Number,
    pair_guard: Guard,
    ctx: &mut EvalContext<'_>,
) -> Guard {
    if !ctx.config.keep_builtins {
        return pair_guard;
    }
    let atom = Term::compound(kind.name(), vec![Term::Constant(x), Term::Constant(y)]);
    let node = ctx.formula.add_atom(atom, None, Source::Builtin);
    ctx.formula.conjoin(pair_guard, node.into())
}

/// Register `op(a, b)` as a condition node (reused if it already exists) and
/// conjoin it with the pair's guard. Returns the guard and the symbolic pair.
fn symbolic_condition(
    kind: CompareKind,
    a: &GuardedValue,
    b: &GuardedValue,
    pair_guard: Guard,
    ctx: &mut EvalContext<'_>,
) -> (Guard, Vec<Term>) {
    let operands: Vec<Term> = [&a.value, &b.value]
        .into_iter()
        .filter_map(Value::to_term)
        .collect();
    let condition = Term::symbolic(intern(kind.symbolic_functor()), operands.clone());
    let node = ctx
        .formula
        .add_atom(condition.clone(), Some(condition), Source::Condition);
    let guard = ctx.formula.conjoin(pair_guard, node.into());
    trace!(target: "dcground::backend::builtin::symbolic_condition", op = kind.name(), %node, %guard);
    (guard, operands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds() {
        let one = Number::Int(1);
        let two = Number::Float(2.0);
        assert!(CompareKind::Less.holds(&one, &two));
        assert!(CompareKind::LessEq.holds(&one, &one));
        assert!(!CompareKind::Greater.holds(&one, &two));
        assert!(CompareKind::GreaterEq.holds(&two, &Number::Int(2)));
        assert!(CompareKind::Eq.holds(&Number::Int(2), &two));
        assert!(CompareKind::Neq.holds(&one, &two));
    }

    #[test]
    fn test_nan_is_unordered() {
        let nan = Number::Float(f64::NAN);
        let one = Number::Int(1);
        assert!(!CompareKind::Less.holds(&nan, &one));
        assert!(!CompareKind::GreaterEq.holds(&nan, &one));
        assert!(!CompareKind::Eq.holds(&nan, &nan));
        assert!(CompareKind::Neq.holds(&nan, &nan));
    }

    #[test]
    fn test_symbolic_functor_of_less_eq() {
        assert_eq!(CompareKind::LessEq.name(), "=<");
        assert_eq!(CompareKind::LessEq.symbolic_functor(), "<=");
    }
}
