// Backend for guarded grounding of hybrid discrete-continuous programs
//
// - `models`: terms, guards and guarded values
// - `formula`: the content-addressed proof DAG and random-variable bookkeeping
// - `grounded`: arithmetic function table and the error taxonomy
// - `eval`: guarded evaluation over cartesian products of operand values
// - `builtin`: comparison, `is`, density, free, `as` and observation predicates
// - `continuation`: how builtins report their answers
// - `session`: formula + tables for one grounding run

pub mod builtin;
pub mod config;
pub mod continuation;
pub mod eval;
pub mod formula;
pub mod grounded;
pub mod mode;
pub mod models;
pub mod native;
pub mod session;
pub mod symbol;

pub use builtin::{Builtin, BuiltinRegistry, CompareKind};
pub use config::{ConfigError, EngineConfig, MAX_CARTESIAN_RESULTS};
pub use continuation::{Answer, AnswerSink, AnswerStream, Answers, Continuation, Notification};
pub use eval::{evaluate, realized_values, resolve_identity, EvalContext, ResolveFn};
pub use formula::{FormulaExport, GuardedFormula, Label, Node, SharedFormula, Source};
pub use grounded::{ArithmeticFunction, ExecError, FunctionTable};
pub use mode::{check_mode, Mode, ModeError};
pub use models::*;
pub use native::{native_to_term, term_to_native, NativeValue};
pub use session::Session;
pub use symbol::{intern, Symbol};
