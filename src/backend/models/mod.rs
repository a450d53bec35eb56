pub mod guard;
pub mod term;
pub mod value;

pub use guard::{Guard, NodeId};
pub use term::{Number, Term, LIST_FUNCTOR, NIL_ATOM};
pub use value::{GuardedValue, Value};
