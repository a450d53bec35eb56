//! Tests for the arithmetic function table.

use super::*;

fn apply(name: &str, args: &[Number]) -> Result<Number, ExecError> {
    let table = FunctionTable::with_standard_functions();
    let function = table
        .get(&intern(name), args.len())
        .unwrap_or_else(|| panic!("{}/{} not registered", name, args.len()));
    function.apply(args)
}

#[test]
fn test_add_ints_and_floats() {
    assert_eq!(
        apply("+", &[Number::Int(2), Number::Int(3)]).unwrap(),
        Number::Int(5)
    );
    match apply("+", &[Number::Int(2), Number::Float(0.5)]).unwrap() {
        Number::Float(f) => assert!((f - 2.5).abs() < f64::EPSILON),
        other => panic!("Expected Float, got {:?}", other),
    }
}

#[test]
fn test_integer_overflow_is_arithmetic_error() {
    let result = apply("*", &[Number::Int(i64::MAX), Number::Int(2)]);
    assert!(matches!(result, Err(ExecError::Arithmetic(_))));
}

#[test]
fn test_division_by_zero() {
    for name in ["/", "//", "mod", "rem"] {
        let result = apply(name, &[Number::Int(10), Number::Int(0)]);
        assert!(
            matches!(result, Err(ExecError::Arithmetic(ref msg)) if msg.contains("Division by zero")),
            "{} should report division by zero, got {:?}",
            name,
            result
        );
    }
    let result = apply("/", &[Number::Float(1.0), Number::Float(0.0)]);
    assert!(matches!(result, Err(ExecError::Arithmetic(_))));
}

#[test]
fn test_division_exact_and_inexact() {
    assert_eq!(
        apply("/", &[Number::Int(6), Number::Int(3)]).unwrap(),
        Number::Int(2)
    );
    assert_eq!(
        apply("/", &[Number::Int(7), Number::Int(2)]).unwrap(),
        Number::Float(3.5)
    );
}

#[test]
fn test_mod_follows_divisor_sign() {
    assert_eq!(
        apply("mod", &[Number::Int(-7), Number::Int(3)]).unwrap(),
        Number::Int(2)
    );
    assert_eq!(
        apply("rem", &[Number::Int(-7), Number::Int(3)]).unwrap(),
        Number::Int(-1)
    );
}

#[test]
fn test_integer_ops_reject_floats() {
    let result = apply("//", &[Number::Float(7.0), Number::Int(2)]);
    assert!(matches!(result, Err(ExecError::IncorrectArgument(_))));
}

#[test]
fn test_domain_errors() {
    assert!(matches!(
        apply("sqrt", &[Number::Int(-1)]),
        Err(ExecError::Arithmetic(_))
    ));
    assert!(matches!(
        apply("log", &[Number::Int(0)]),
        Err(ExecError::Arithmetic(_))
    ));
    assert!(matches!(
        apply("asin", &[Number::Float(1.5)]),
        Err(ExecError::Arithmetic(_))
    ));
}

#[test]
fn test_power() {
    assert_eq!(
        apply("^", &[Number::Int(2), Number::Int(10)]).unwrap(),
        Number::Int(1024)
    );
    assert_eq!(
        apply("**", &[Number::Int(2), Number::Int(-1)]).unwrap(),
        Number::Float(0.5)
    );
    assert!(matches!(
        apply("^", &[Number::Int(2), Number::Int(-1)]),
        Err(ExecError::Arithmetic(_))
    ));
}

#[test]
fn test_rounding_and_constants() {
    assert_eq!(apply("floor", &[Number::Float(2.7)]).unwrap(), Number::Int(2));
    assert_eq!(apply("round", &[Number::Float(2.5)]).unwrap(), Number::Int(3));
    assert!(matches!(
        apply("truncate", &[Number::Float(f64::NAN)]),
        Err(ExecError::Arithmetic(_))
    ));
    match apply("pi", &[]).unwrap() {
        Number::Float(f) => assert!((f - std::f64::consts::PI).abs() < f64::EPSILON),
        other => panic!("Expected Float, got {:?}", other),
    }
}

#[test]
fn test_min_max_keep_operand_type() {
    assert_eq!(
        apply("min", &[Number::Int(1), Number::Float(2.0)]).unwrap(),
        Number::Int(1)
    );
    assert_eq!(
        apply("max", &[Number::Int(1), Number::Float(2.0)]).unwrap(),
        Number::Float(2.0)
    );
}

#[test]
fn test_lookup_is_by_name_and_arity() {
    let table = FunctionTable::with_standard_functions();
    assert!(table.contains(&intern("-"), 1));
    assert!(table.contains(&intern("-"), 2));
    assert!(!table.contains(&intern("sqrt"), 2));
    assert!(table.knows_name(&intern("sqrt")));
    assert!(!table.knows_name(&intern("frobnicate")));
}

#[test]
fn test_register_custom_function() {
    struct Hypot;

    impl ArithmeticFunction for Hypot {
        fn name(&self) -> &str {
            "hypot"
        }

        fn arity(&self) -> usize {
            2
        }

        fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
            Ok(Number::Float(args[0].as_f64().hypot(args[1].as_f64())))
        }
    }

    let mut table = FunctionTable::new();
    assert!(table.is_empty());
    table.register(Arc::new(Hypot));
    let f = table.get(&intern("hypot"), 2).unwrap();
    assert_eq!(
        f.apply(&[Number::Int(3), Number::Int(4)]).unwrap(),
        Number::Float(5.0)
    );
}

#[test]
fn test_recoverable_classification() {
    assert!(ExecError::Arithmetic("x".into()).is_recoverable());
    assert!(ExecError::IncorrectArgument("x".into()).is_recoverable());
    assert!(!ExecError::UnknownFunction {
        name: "f".into(),
        arity: 1
    }
    .is_recoverable());
    assert!(!ExecError::NotARandomVariable(Term::atom("r")).is_recoverable());
}
