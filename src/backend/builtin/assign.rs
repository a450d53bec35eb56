use tracing::trace;

use super::Builtin;
use crate::backend::continuation::{AnswerSink, Answers};
use crate::backend::eval::{evaluate, EvalContext};
use crate::backend::grounded::ExecError;
use crate::backend::models::Term;

/// Arithmetic evaluation: `X is Expr`
///
/// One answer `[Value, Expr]` per guarded value of `Expr`; the resolution
/// loop unifies `X` with `Value`. Branches without a value are dropped.
pub struct IsOp;

impl Builtin for IsOp {
    fn name(&self) -> &str {
        "is"
    }

    fn mode(&self) -> &str {
        "*g"
    }

    fn execute(&self, args: &[Term], ctx: &mut EvalContext<'_>) -> Result<Answers, ExecError> {
        let mut sink = AnswerSink::new();
        for gv in evaluate(&args[1], ctx)? {
            let Some(value) = gv.value.to_term() else {
                trace!(target: "dcground::backend::builtin::is", expr = %args[1], "undefined branch skipped");
                continue;
            };
            sink.push(vec![value, args[1].clone()], gv.guard);
        }
        Ok(sink.finish())
    }
}
