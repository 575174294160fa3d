//! Builtin function library.
//!
//! Every builtin receives already-evaluated values and applies its own
//! coercion rule: inherently real functions (`sin`, `cos`, `sqrt`) widen
//! integers to real, inherently integral ones (`%`, `&`, `|`) narrow reals
//! by truncating toward zero, and base arithmetic promotes to real as soon
//! as a real argument is involved. Integer arithmetic wraps on overflow;
//! integer remainder or division by zero is an explicit arithmetic error.

use crate::error::{LangError, LangResult};
use crate::scope::Scope;
use crate::value::{Number, Value};

/// The fixed function set available to snippets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `+`: sum, at least one argument.
    Add,
    /// `-`: subtraction, or negation with a single argument.
    Sub,
    /// `*`: product, at least one argument.
    Mul,
    /// `/`: division, or the real reciprocal with a single argument.
    Div,
    /// `%`: integer remainder, exactly two arguments.
    Rem,
    /// `&`: bitwise AND left-fold.
    BitAnd,
    /// `|`: bitwise OR left-fold.
    BitOr,
    /// `sin`: sine of the argument in radians.
    Sin,
    /// `cos`: cosine of the argument in radians.
    Cos,
    /// `sqrt`: square root. No domain check; a negative argument yields NaN.
    Sqrt,
    /// `rnd`: random real in `[0.0, 1.0)`. Ignores its arguments.
    Rnd,
}

impl Builtin {
    /// Every builtin, in scope-population order.
    pub const ALL: [Builtin; 11] = [
        Builtin::Add,
        Builtin::Sub,
        Builtin::Mul,
        Builtin::Div,
        Builtin::Rem,
        Builtin::BitAnd,
        Builtin::BitOr,
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Sqrt,
        Builtin::Rnd,
    ];

    /// The symbol this builtin is bound to.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Rem => "%",
            Builtin::BitAnd => "&",
            Builtin::BitOr => "|",
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Sqrt => "sqrt",
            Builtin::Rnd => "rnd",
        }
    }

    /// Apply this builtin to already-evaluated arguments.
    pub(crate) fn apply(self, args: &[Value], scope: &Scope) -> LangResult<Value> {
        match self {
            Builtin::Sin => real_unary("sin", args, f64::sin),
            Builtin::Cos => real_unary("cos", args, f64::cos),
            Builtin::Sqrt => real_unary("sqrt", args, f64::sqrt),
            Builtin::Rem => rem(args),
            Builtin::BitAnd => bit_fold("&", args, |acc, v| acc & v),
            Builtin::BitOr => bit_fold("|", args, |acc, v| acc | v),
            Builtin::Add => promote_fold("+", args, i64::wrapping_add, |a, b| a + b),
            Builtin::Sub => sub(args),
            Builtin::Mul => promote_fold("*", args, i64::wrapping_mul, |a, b| a * b),
            Builtin::Div => div(args),
            Builtin::Rnd => Ok(Value::Real(scope.next_random())),
        }
    }
}

fn number_arg(function: &'static str, value: &Value) -> LangResult<Number> {
    value.as_number().ok_or_else(|| LangError::TypeMismatch {
        function,
        value: value.to_string(),
    })
}

fn int_arg(function: &'static str, value: &Value) -> LangResult<i64> {
    Ok(number_arg(function, value)?.truncate())
}

fn real_unary(function: &'static str, args: &[Value], op: fn(f64) -> f64) -> LangResult<Value> {
    let [arg] = args else {
        return Err(LangError::Arity {
            function,
            expected: "one value",
            got: args.len(),
        });
    };
    let n = number_arg(function, arg)?;
    Ok(Value::Real(op(n.as_real())))
}

fn rem(args: &[Value]) -> LangResult<Value> {
    let [a, b] = args else {
        return Err(LangError::Arity {
            function: "%",
            expected: "two values",
            got: args.len(),
        });
    };
    let dividend = int_arg("%", a)?;
    let divisor = int_arg("%", b)?;
    if divisor == 0 {
        return Err(LangError::Arithmetic {
            function: "%",
            message: "remainder by zero",
        });
    }
    Ok(Value::Int(dividend.wrapping_rem(divisor)))
}

fn bit_fold(function: &'static str, args: &[Value], op: fn(i64, i64) -> i64) -> LangResult<Value> {
    let Some((first, rest)) = args.split_first() else {
        return Err(LangError::Arity {
            function,
            expected: "at least one value",
            got: 0,
        });
    };
    let mut acc = int_arg(function, first)?;
    for arg in rest {
        acc = op(acc, int_arg(function, arg)?);
    }
    Ok(Value::Int(acc))
}

/// Left-fold with int/real promotion: stays integer until a real argument
/// appears, then continues in reals. With a single argument the fold is the
/// argument itself.
fn promote_fold(
    function: &'static str,
    args: &[Value],
    int_op: fn(i64, i64) -> i64,
    real_op: fn(f64, f64) -> f64,
) -> LangResult<Value> {
    let Some((first, rest)) = args.split_first() else {
        return Err(LangError::Arity {
            function,
            expected: "at least one value",
            got: 0,
        });
    };
    let mut acc = number_arg(function, first)?;
    for arg in rest {
        let n = number_arg(function, arg)?;
        acc = match (acc, n) {
            (Number::Int(a), Number::Int(b)) => Number::Int(int_op(a, b)),
            (a, b) => Number::Real(real_op(a.as_real(), b.as_real())),
        };
    }
    Ok(acc.into())
}

fn sub(args: &[Value]) -> LangResult<Value> {
    let Some((first, rest)) = args.split_first() else {
        return Err(LangError::Arity {
            function: "-",
            expected: "at least one value",
            got: 0,
        });
    };
    let first = number_arg("-", first)?;
    if rest.is_empty() {
        return Ok(match first {
            Number::Int(v) => Value::Int(v.wrapping_neg()),
            Number::Real(v) => Value::Real(-v),
        });
    }
    let mut acc = first;
    for arg in rest {
        let n = number_arg("-", arg)?;
        acc = match (acc, n) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_sub(b)),
            (a, b) => Number::Real(a.as_real() - b.as_real()),
        };
    }
    Ok(acc.into())
}

fn div(args: &[Value]) -> LangResult<Value> {
    let Some((first, rest)) = args.split_first() else {
        return Err(LangError::Arity {
            function: "/",
            expected: "at least one value",
            got: 0,
        });
    };
    let first = number_arg("/", first)?;
    if rest.is_empty() {
        return Ok(Value::Real(1.0 / first.as_real()));
    }
    let mut acc = first;
    for arg in rest {
        let n = number_arg("/", arg)?;
        acc = match (acc, n) {
            (Number::Int(a), Number::Int(b)) => {
                if b == 0 {
                    return Err(LangError::Arithmetic {
                        function: "/",
                        message: "division by zero",
                    });
                }
                Number::Int(a.wrapping_div(b))
            }
            (a, b) => Number::Real(a.as_real() / b.as_real()),
        };
    }
    Ok(acc.into())
}
