//! Standard arithmetic functions.
//!
//! - `Checked` - integer-checked binary operations (+, -, *)
//! - `DivOp`, `IntDivOp`, `ModOp`, `RemOp` - division family
//! - `PowOp` - exponentiation (`**`, `^`)
//! - `Binary`, `Unary` - generic numeric functions (min, max, abs, ...)
//! - `FloatUnary` - float functions with a domain check (sqrt, log, ...)
//! - `Rounding` - float to integer conversions
//! - `Constant` - nullary functions (pi, e, inf, nan)

use std::cmp::Ordering;
use std::sync::Arc;

use super::{ArithmeticFunction, ExecError, Number};

fn division_by_zero() -> ExecError {
    ExecError::Arithmetic("Division by zero.".to_string())
}

fn expect_ints(name: &str, a: Number, b: Number) -> Result<(i64, i64), ExecError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Ok((x, y)),
        _ => Err(ExecError::IncorrectArgument(format!(
            "'{}' expects integers, got {} and {}",
            name, a, b
        ))),
    }
}

/// Binary operation that stays integral on integer inputs and reports overflow
pub struct Checked {
    pub name: &'static str,
    pub int: fn(i64, i64) -> Option<i64>,
    pub float: fn(f64, f64) -> f64,
}

impl ArithmeticFunction for Checked {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        2
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        match (args[0], args[1]) {
            (Number::Int(x), Number::Int(y)) => (self.int)(x, y).map(Number::Int).ok_or_else(|| {
                ExecError::Arithmetic(format!("Integer overflow: {} {} {}", x, self.name, y))
            }),
            (a, b) => Ok(Number::Float((self.float)(a.as_f64(), b.as_f64()))),
        }
    }
}

/// Division: exact integer quotients stay integral, everything else is a float
pub struct DivOp;

impl ArithmeticFunction for DivOp {
    fn name(&self) -> &str {
        "/"
    }

    fn arity(&self) -> usize {
        2
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        let (a, b) = (args[0], args[1]);
        if b.as_f64() == 0.0 {
            return Err(division_by_zero());
        }
        match (a, b) {
            (Number::Int(x), Number::Int(y)) if x.checked_rem(y) == Some(0) => x
                .checked_div(y)
                .map(Number::Int)
                .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: {} / {}", x, y))),
            _ => Ok(Number::Float(a.as_f64() / b.as_f64())),
        }
    }
}

/// Integer division truncating toward zero: `//`
pub struct IntDivOp;

impl ArithmeticFunction for IntDivOp {
    fn name(&self) -> &str {
        "//"
    }

    fn arity(&self) -> usize {
        2
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        let (x, y) = expect_ints(self.name(), args[0], args[1])?;
        if y == 0 {
            return Err(division_by_zero());
        }
        x.checked_div(y)
            .map(Number::Int)
            .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: {} // {}", x, y)))
    }
}

/// Modulo with the sign of the divisor
pub struct ModOp;

impl ArithmeticFunction for ModOp {
    fn name(&self) -> &str {
        "mod"
    }

    fn arity(&self) -> usize {
        2
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        let (x, y) = expect_ints(self.name(), args[0], args[1])?;
        if y == 0 {
            return Err(division_by_zero());
        }
        // i64::MIN mod -1 is 0, which checked_rem reports as overflow
        let r = x.checked_rem(y).unwrap_or(0);
        if r != 0 && (r < 0) != (y < 0) {
            Ok(Number::Int(r + y))
        } else {
            Ok(Number::Int(r))
        }
    }
}

/// Remainder with the sign of the dividend
pub struct RemOp;

impl ArithmeticFunction for RemOp {
    fn name(&self) -> &str {
        "rem"
    }

    fn arity(&self) -> usize {
        2
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        let (x, y) = expect_ints(self.name(), args[0], args[1])?;
        if y == 0 {
            return Err(division_by_zero());
        }
        Ok(Number::Int(x.checked_rem(y).unwrap_or(0)))
    }
}

/// Exponentiation. With `integer_power`, an integer base and exponent must
/// give an integer result (`^`); otherwise negative exponents fall back to
/// floats (`**`).
pub struct PowOp {
    pub name: &'static str,
    pub integer_power: bool,
}

impl ArithmeticFunction for PowOp {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        2
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        let (a, b) = (args[0], args[1]);
        if let (Number::Int(base), Number::Int(exp)) = (a, b) {
            if exp >= 0 {
                let exp = u32::try_from(exp).map_err(|_| {
                    ExecError::Arithmetic(format!("Exponent too large: {}", exp))
                })?;
                return base.checked_pow(exp).map(Number::Int).ok_or_else(|| {
                    ExecError::Arithmetic(format!("Integer overflow: {} {} {}", base, self.name, exp))
                });
            }
            if self.integer_power {
                return match base {
                    1 => Ok(Number::Int(1)),
                    -1 => Ok(Number::Int(if exp % 2 == 0 { 1 } else { -1 })),
                    0 => Err(division_by_zero()),
                    _ => Err(ExecError::Arithmetic(format!(
                        "{} {} {}: negative exponent on an integer base",
                        base, self.name, exp
                    ))),
                };
            }
        }
        let (base, exp) = (a.as_f64(), b.as_f64());
        if base == 0.0 && exp < 0.0 {
            return Err(division_by_zero());
        }
        let result = base.powf(exp);
        if result.is_nan() && !base.is_nan() && !exp.is_nan() {
            return Err(ExecError::Arithmetic(format!(
                "Undefined: {} {} {}",
                base, self.name, exp
            )));
        }
        Ok(Number::Float(result))
    }
}

/// Generic binary function on numbers
pub struct Binary {
    pub name: &'static str,
    pub f: fn(Number, Number) -> Result<Number, ExecError>,
}

impl ArithmeticFunction for Binary {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        2
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        (self.f)(args[0], args[1])
    }
}

/// Generic unary function on numbers
pub struct Unary {
    pub name: &'static str,
    pub f: fn(Number) -> Result<Number, ExecError>,
}

impl ArithmeticFunction for Unary {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        1
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        (self.f)(args[0])
    }
}

/// Float function defined on part of the real line
pub struct FloatUnary {
    pub name: &'static str,
    pub f: fn(f64) -> f64,
    pub domain: fn(f64) -> bool,
}

impl ArithmeticFunction for FloatUnary {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        1
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        let x = args[0].as_f64();
        if !(self.domain)(x) {
            return Err(ExecError::Arithmetic(format!(
                "{}({}) is outside the function's domain",
                self.name, args[0]
            )));
        }
        let y = (self.f)(x);
        if y.is_infinite() && x.is_finite() {
            return Err(ExecError::Arithmetic(format!(
                "Float overflow: {}({})",
                self.name, args[0]
            )));
        }
        Ok(Number::Float(y))
    }
}

/// Float to integer conversion; integers pass through unchanged
pub struct Rounding {
    pub name: &'static str,
    pub f: fn(f64) -> f64,
}

impl ArithmeticFunction for Rounding {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        1
    }

    fn apply(&self, args: &[Number]) -> Result<Number, ExecError> {
        match args[0] {
            Number::Int(i) => Ok(Number::Int(i)),
            Number::Float(x) => {
                let r = (self.f)(x);
                if !r.is_finite() || r < i64::MIN as f64 || r >= i64::MAX as f64 {
                    return Err(ExecError::Arithmetic(format!(
                        "Cannot convert {} to an integer",
                        x
                    )));
                }
                Ok(Number::Int(r as i64))
            }
        }
    }
}

/// Nullary function
pub struct Constant {
    pub name: &'static str,
    pub value: f64,
}

impl ArithmeticFunction for Constant {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        0
    }

    fn apply(&self, _args: &[Number]) -> Result<Number, ExecError> {
        Ok(Number::Float(self.value))
    }
}

fn min(a: Number, b: Number) -> Result<Number, ExecError> {
    Ok(match a.numeric_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    })
}

fn max(a: Number, b: Number) -> Result<Number, ExecError> {
    Ok(match a.numeric_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    })
}

fn atan2(a: Number, b: Number) -> Result<Number, ExecError> {
    Ok(Number::Float(a.as_f64().atan2(b.as_f64())))
}

fn neg(a: Number) -> Result<Number, ExecError> {
    match a {
        Number::Int(i) => i
            .checked_neg()
            .map(Number::Int)
            .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: -({})", i))),
        Number::Float(x) => Ok(Number::Float(-x)),
    }
}

fn abs(a: Number) -> Result<Number, ExecError> {
    match a {
        Number::Int(i) => i
            .checked_abs()
            .map(Number::Int)
            .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: abs({})", i))),
        Number::Float(x) => Ok(Number::Float(x.abs())),
    }
}

fn sign(a: Number) -> Result<Number, ExecError> {
    Ok(match a {
        Number::Int(i) => Number::Int(i.signum()),
        Number::Float(x) if x == 0.0 => Number::Float(0.0),
        Number::Float(x) => Number::Float(x.signum()),
    })
}

pub(super) fn standard_functions() -> Vec<Arc<dyn ArithmeticFunction>> {
    vec![
        Arc::new(Checked {
            name: "+",
            int: i64::checked_add,
            float: |a, b| a + b,
        }),
        Arc::new(Checked {
            name: "-",
            int: i64::checked_sub,
            float: |a, b| a - b,
        }),
        Arc::new(Checked {
            name: "*",
            int: i64::checked_mul,
            float: |a, b| a * b,
        }),
        Arc::new(DivOp),
        Arc::new(IntDivOp),
        Arc::new(ModOp),
        Arc::new(RemOp),
        Arc::new(PowOp {
            name: "**",
            integer_power: false,
        }),
        Arc::new(PowOp {
            name: "^",
            integer_power: true,
        }),
        Arc::new(Binary { name: "min", f: min }),
        Arc::new(Binary { name: "max", f: max }),
        Arc::new(Binary {
            name: "atan2",
            f: atan2,
        }),
        Arc::new(Unary { name: "-", f: neg }),
        Arc::new(Unary { name: "+", f: Ok }),
        Arc::new(Unary { name: "abs", f: abs }),
        Arc::new(Unary {
            name: "sign",
            f: sign,
        }),
        Arc::new(Unary {
            name: "float",
            f: |a| Ok(Number::Float(a.as_f64())),
        }),
        Arc::new(FloatUnary {
            name: "sqrt",
            f: f64::sqrt,
            domain: |x| x >= 0.0,
        }),
        Arc::new(FloatUnary {
            name: "exp",
            f: f64::exp,
            domain: |_| true,
        }),
        Arc::new(FloatUnary {
            name: "log",
            f: f64::ln,
            domain: |x| x > 0.0,
        }),
        Arc::new(FloatUnary {
            name: "sin",
            f: f64::sin,
            domain: |_| true,
        }),
        Arc::new(FloatUnary {
            name: "cos",
            f: f64::cos,
            domain: |_| true,
        }),
        Arc::new(FloatUnary {
            name: "tan",
            f: f64::tan,
            domain: |_| true,
        }),
        Arc::new(FloatUnary {
            name: "asin",
            f: f64::asin,
            domain: |x| (-1.0..=1.0).contains(&x),
        }),
        Arc::new(FloatUnary {
            name: "acos",
            f: f64::acos,
            domain: |x| (-1.0..=1.0).contains(&x),
        }),
        Arc::new(FloatUnary {
            name: "atan",
            f: f64::atan,
            domain: |_| true,
        }),
        Arc::new(Rounding {
            name: "floor",
            f: f64::floor,
        }),
        Arc::new(Rounding {
            name: "ceiling",
            f: f64::ceil,
        }),
        Arc::new(Rounding {
            name: "round",
            f: f64::round,
        }),
        Arc::new(Rounding {
            name: "truncate",
            f: f64::trunc,
        }),
        Arc::new(Rounding {
            name: "integer",
            f: f64::round,
        }),
        Arc::new(Constant {
            name: "pi",
            value: std::f64::consts::PI,
        }),
        Arc::new(Constant {
            name: "e",
            value: std::f64::consts::E,
        }),
        Arc::new(Constant {
            name: "inf",
            value: f64::INFINITY,
        }),
        Arc::new(Constant {
            name: "nan",
            value: f64::NAN,
        }),
    ]
}
