//! Builtins over continuous random variables: density queries, free
//! (marginalized) variables and realized values.

use tracing::debug;

use super::Builtin;
use crate::backend::continuation::{AnswerSink, Answers};
use crate::backend::eval::EvalContext;
use crate::backend::formula::{GuardedFormula, Label};
use crate::backend::grounded::ExecError;
use crate::backend::models::{Guard, NodeId, Term};

fn sites_of(formula: &GuardedFormula, variable: &Term) -> Option<Vec<NodeId>> {
    formula
        .density_sites(variable)
        .map(|sites| sites.iter().copied().collect())
}

/// Density query: `density(V)`
///
/// Registers one `DensityConstant` per realization site of `V` as a query
/// under the site's body guard and accumulates it into the variable's
/// density queries. Answers `[V]` once per site.
pub struct DensityOp;

impl Builtin for DensityOp {
    fn name(&self) -> &str {
        "density"
    }

    fn mode(&self) -> &str {
        "c"
    }

    fn execute(&self, args: &[Term], ctx: &mut EvalContext<'_>) -> Result<Answers, ExecError> {
        let variable = &args[0];
        let sites = sites_of(ctx.formula, variable)
            .ok_or_else(|| ExecError::NotARandomVariable(variable.clone()))?;

        let mut sink = AnswerSink::new();
        for site in sites {
            let body = ctx.formula.density_body(site);
            let density = Term::DensityConstant(GuardedFormula::density_name(variable, site));
            debug!(target: "dcground::backend::builtin::density", %variable, %density, %body);
            ctx.formula.add_name(density.clone(), body, Label::Query);
            ctx.formula.add_density_query(variable.clone(), density);
            sink.push(vec![variable.clone()], body);
        }
        Ok(sink.finish())
    }
}

/// Marginalize a variable: `free(V)`
pub struct FreeOp;

impl Builtin for FreeOp {
    fn name(&self) -> &str {
        "free"
    }

    fn mode(&self) -> &str {
        "c"
    }

    fn execute(&self, args: &[Term], ctx: &mut EvalContext<'_>) -> Result<Answers, ExecError> {
        let added = ctx.formula.add_free_variable(args[0].clone());
        debug!(target: "dcground::backend::builtin::free", variable = %args[0], added);

        let mut sink = AnswerSink::new();
        sink.push(args.to_vec(), Guard::True);
        Ok(sink.finish())
    }
}

/// Marginalize every variable of a list: `free_list([V1, .., Vn])`
pub struct FreeListOp;

impl Builtin for FreeListOp {
    fn name(&self) -> &str {
        "free_list"
    }

    fn mode(&self) -> &str {
        "l"
    }

    fn execute(&self, args: &[Term], ctx: &mut EvalContext<'_>) -> Result<Answers, ExecError> {
        let variables = args[0].as_list().ok_or_else(|| {
            ExecError::IncorrectArgument(format!("free_list expects a list, got {}", args[0]))
        })?;
        for variable in variables {
            ctx.formula.add_free_variable(variable);
        }

        let mut sink = AnswerSink::new();
        sink.push(args.to_vec(), Guard::True);
        Ok(sink.finish())
    }
}

/// Realized value of a random variable: `as(Value, V)`
///
/// `Value` is a point (anything but a list, typically unbound) or a vector
/// whose list length gives the number of dimensions. For each realization
/// site the memoized value descriptor is looked up or created, and `[Value',
/// V]` is answered under the site's body guard, where `Value'` is the single
/// coordinate of a point or the list of coordinates of a vector.
pub struct AsOp;

impl Builtin for AsOp {
    fn name(&self) -> &str {
        "as"
    }

    fn mode(&self) -> &str {
        "*g"
    }

    fn execute(&self, args: &[Term], ctx: &mut EvalContext<'_>) -> Result<Answers, ExecError> {
        let variable = &args[1];
        let vector = args[0].as_list().map(|items| items.len());
        let sites = sites_of(ctx.formula, variable)
            .ok_or_else(|| ExecError::UndefinedRealization(variable.clone()))?;

        let mut sink = AnswerSink::new();
        for site in sites {
            let descriptor = ctx
                .formula
                .value_descriptor(variable, site, vector.unwrap_or(1))?;
            let mut coordinates = descriptor.dimension_values();
            let value = match vector {
                Some(_) => Term::list(coordinates),
                None if !coordinates.is_empty() => coordinates.remove(0),
                None => continue,
            };
            sink.push(vec![value, variable.clone()], ctx.formula.density_body(site));
        }
        Ok(sink.finish())
    }
}
