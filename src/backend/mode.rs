//! Instantiation checks for builtin arguments.
//!
//! A mode pattern has one character per argument:
//!
//! | char | requirement                         |
//! |------|-------------------------------------|
//! | `g`  | ground (no variables anywhere)      |
//! | `c`  | callable: an atom or compound term  |
//! | `*`  | anything                            |
//! | `l`  | a proper list                       |
//! | `v`  | an unbound variable                 |
//! | `n`  | not a variable                      |
//! | `i`  | an integer                          |
//! | `a`  | an atom                             |

use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::backend::grounded::ExecError;
use crate::backend::models::{Number, Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ground,
    Callable,
    Any,
    List,
    Var,
    NonVar,
    Integer,
    Atom,
}

impl Mode {
    pub fn from_char(c: char) -> Option<Mode> {
        Some(match c {
            'g' => Mode::Ground,
            'c' => Mode::Callable,
            '*' => Mode::Any,
            'l' => Mode::List,
            'v' => Mode::Var,
            'n' => Mode::NonVar,
            'i' => Mode::Integer,
            'a' => Mode::Atom,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Mode::Ground => 'g',
            Mode::Callable => 'c',
            Mode::Any => '*',
            Mode::List => 'l',
            Mode::Var => 'v',
            Mode::NonVar => 'n',
            Mode::Integer => 'i',
            Mode::Atom => 'a',
        }
    }

    pub fn accepts(self, term: &Term) -> bool {
        match self {
            Mode::Ground => term.is_ground(),
            Mode::Callable => term.is_callable(),
            Mode::Any => true,
            Mode::List => term.is_list(),
            Mode::Var => term.is_var(),
            Mode::NonVar => !term.is_var(),
            Mode::Integer => matches!(term, Term::Constant(Number::Int(_))),
            Mode::Atom => matches!(term, Term::Atom(_)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Mode::Ground => "ground",
            Mode::Callable => "callable",
            Mode::Any => "any term",
            Mode::List => "a list",
            Mode::Var => "a variable",
            Mode::NonVar => "non-variable",
            Mode::Integer => "an integer",
            Mode::Atom => "an atom",
        };
        f.write_str(description)
    }
}

/// Argument `position` (1-based) of `functor` violates its mode.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Mode error in {functor}: argument {position} must be {expected} ('{}'), got {found}", .expected.as_char())]
pub struct ModeError {
    pub functor: String,
    pub position: usize,
    pub expected: Mode,
    pub found: Term,
}

/// Check `args` against `pattern`, reporting the first offending argument.
pub fn check_mode(args: &[Term], pattern: &str, functor: &str) -> Result<(), ExecError> {
    trace!(target: "dcground::backend::mode::check_mode", functor, pattern, ?args);
    let invalid = || ExecError::InvalidMode {
        functor: functor.to_string(),
        pattern: pattern.to_string(),
    };
    if pattern.chars().count() != args.len() {
        return Err(invalid());
    }

    for (i, (c, arg)) in pattern.chars().zip(args).enumerate() {
        let mode = Mode::from_char(c).ok_or_else(invalid)?;
        if !mode.accepts(arg) {
            return Err(ModeError {
                functor: functor.to_string(),
                position: i + 1,
                expected: mode,
                found: arg.clone(),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_pair_accepted() {
        let args = [Term::int(1), Term::compound("f", vec![Term::atom("a")])];
        assert!(check_mode(&args, "gg", ">").is_ok());
    }

    #[test]
    fn test_mode_error_names_argument_and_mode() {
        let args = [Term::int(1), Term::compound("f", vec![Term::var("X")])];
        let err = check_mode(&args, "gg", "<").unwrap_err();
        match err {
            ExecError::Mode(ModeError {
                ref functor,
                position,
                expected,
                ..
            }) => {
                assert_eq!(functor, "<");
                assert_eq!(position, 2);
                assert_eq!(expected, Mode::Ground);
            }
            other => panic!("Expected mode error, got {:?}", other),
        }
        assert!(err.to_string().contains("argument 2 must be ground"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_callable_and_list_modes() {
        assert!(check_mode(&[Term::atom("x")], "c", "free").is_ok());
        assert!(check_mode(&[Term::compound("h", vec![Term::atom("b")])], "c", "free").is_ok());
        assert!(check_mode(&[Term::int(3)], "c", "free").is_err());
        assert!(check_mode(&[Term::list(vec![Term::atom("x")])], "l", "free_list").is_ok());
        assert!(check_mode(&[Term::atom("x")], "l", "free_list").is_err());
    }

    #[test]
    fn test_any_mode_accepts_variables() {
        assert!(check_mode(&[Term::var("X"), Term::int(1)], "*g", "is").is_ok());
        assert!(check_mode(&[Term::var("X")], "v", "t").is_ok());
        assert!(check_mode(&[Term::var("X")], "n", "t").is_err());
    }

    #[test]
    fn test_malformed_pattern_is_structural() {
        let short = check_mode(&[Term::int(1)], "gg", ">").unwrap_err();
        let unknown = check_mode(&[Term::int(1)], "x", "odd").unwrap_err();
        assert_eq!(
            unknown,
            ExecError::InvalidMode {
                functor: "odd".into(),
                pattern: "x".into()
            }
        );
        assert!(matches!(short, ExecError::InvalidMode { .. }));
        assert!(!short.is_recoverable());
        assert!(!unknown.is_recoverable());
    }
}
