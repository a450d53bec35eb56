use tracing::trace;

use super::Builtin;
use crate::backend::continuation::{AnswerSink, Answers};
use crate::backend::eval::{check_product_size, evaluate, EvalContext, GuardedProduct};
use crate::backend::formula::Source;
use crate::backend::grounded::{friendly_type_name, ExecError};
use crate::backend::models::{GuardedValue, Term, Value};
use crate::backend::symbol::intern;

/// Functor of the observation condition handed to the backend
pub const OBSERVATION_FUNCTOR: &str = "observation";

/// Observe a realized value: `observation(Value, Observed)`
///
/// `Value` is a realized coordinate (as bound by `as/2`) or a list of them,
/// `Observed` an expression or a list of expressions of the same length.
/// Each guarded value of `Observed` yields the condition
/// `observation(Value, Observed')`, registered once and conjoined with the
/// value's guard.
pub struct ObservationOp;

impl Builtin for ObservationOp {
    fn name(&self) -> &str {
        "observation"
    }

    fn mode(&self) -> &str {
        "gg"
    }

    fn execute(&self, args: &[Term], ctx: &mut EvalContext<'_>) -> Result<Answers, ExecError> {
        let (value, observed) = (&args[0], &args[1]);
        let observed_values = match value.as_list() {
            Some(coordinates) => {
                coordinates.iter().try_for_each(expect_coordinate)?;
                let observed_items = observed.as_list().ok_or_else(|| {
                    ExecError::IncorrectArgument(format!(
                        "observation of a {}-dimensional value expects a list, got {}",
                        coordinates.len(),
                        friendly_type_name(observed)
                    ))
                })?;
                if observed_items.len() != coordinates.len() {
                    return Err(ExecError::IncorrectArgument(format!(
                        "observation dimension mismatch: value has {}, observed has {}",
                        coordinates.len(),
                        observed_items.len()
                    )));
                }
                evaluate_vector(&observed_items, ctx)?
            }
            None => {
                expect_coordinate(value)?;
                if let Some(observed_items) = observed.as_list() {
                    return Err(ExecError::IncorrectArgument(format!(
                        "observation dimension mismatch: value is a point, observed has {}",
                        observed_items.len()
                    )));
                }
                evaluate(observed, ctx)?
            }
        };

        let mut sink = AnswerSink::new();
        for gv in observed_values {
            let Some(observed_term) = gv.value.to_term() else {
                continue;
            };
            let condition = Term::symbolic(
                intern(OBSERVATION_FUNCTOR),
                vec![value.clone(), observed_term.clone()],
            );
            let node = ctx
                .formula
                .add_atom(condition.clone(), Some(condition), Source::Condition);
            let guard = ctx.formula.conjoin(gv.guard, node.into());
            trace!(target: "dcground::backend::builtin::observation", %value, observed = %observed_term, %guard);
            sink.push(vec![value.clone(), observed_term], guard);
        }
        Ok(sink.finish())
    }
}

fn expect_coordinate(term: &Term) -> Result<(), ExecError> {
    match term {
        Term::ValueDim { .. } => Ok(()),
        other => Err(ExecError::IncorrectArgument(format!(
            "observation expects a realized value, got {} ({})",
            friendly_type_name(other),
            other
        ))),
    }
}

/// Guarded values of a list of expressions, as guarded lists
fn evaluate_vector(items: &[Term], ctx: &mut EvalContext<'_>) -> Result<Vec<GuardedValue>, ExecError> {
    let operands = items
        .iter()
        .map(|item| evaluate(item, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    check_product_size(&operands, ctx.config.max_cartesian_results)?;

    let mut values = Vec::new();
    for combo in GuardedProduct::new(&operands) {
        let terms: Option<Vec<Term>> = combo.iter().map(|gv| gv.value.to_term()).collect();
        let guard = ctx.formula.add_and(combo.iter().map(|gv| gv.guard));
        let value = match terms {
            Some(terms) => Value::Symbolic(Term::list(terms)),
            None => Value::Undefined,
        };
        values.push(GuardedValue::new(value, guard));
    }
    Ok(values)
}
