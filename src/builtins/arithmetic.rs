//! Arithmetic operations: +, -, *, /, min, max
//!
//! Each operator reduces its arguments left-to-right starting from the
//! first cell. If any argument is a `Double`, the whole reduction is carried
//! out in `f64`; otherwise it stays `i64`. A single argument passes through
//! unchanged (`(- 5)` is `5`, not `-5`).

use crate::env::Env;
use crate::error::{RuntimeError, ARITY_AT_LEAST_ONE};
use crate::value::Value;
use std::collections::VecDeque;

fn numeric_cells(who: &str, args: Value) -> Result<VecDeque<Value>, RuntimeError> {
    let cells = args.into_cells(who)?;
    if cells.is_empty() {
        return Err(RuntimeError::arity_error(who, ARITY_AT_LEAST_ONE, 0));
    }
    for c in &cells {
        if !c.is_numeric() {
            return Err(RuntimeError::type_error(who, "numeric", c, 0));
        }
    }
    Ok(cells)
}

/// Reduces `args` with `int_op` when every cell is an integer, or `dbl_op`
/// (promoting every cell to `f64`) when any cell is a `Double`.
fn fold(
    who: &str,
    args: Value,
    int_op: impl Fn(i64, i64) -> Result<i64, RuntimeError>,
    dbl_op: impl Fn(f64, f64) -> Result<f64, RuntimeError>,
) -> Result<Value, RuntimeError> {
    let cells = numeric_cells(who, args)?;
    let double_mode = cells.iter().any(|c| matches!(c, Value::Double(_)));
    let mut iter = cells.into_iter();

    if double_mode {
        let mut acc = iter.next().unwrap().as_f64().unwrap();
        for c in iter {
            acc = dbl_op(acc, c.as_f64().unwrap())?;
        }
        Ok(Value::Double(acc))
    } else {
        let mut acc = match iter.next().unwrap() {
            Value::Integer(n) => n,
            _ => unreachable!("non-integer cell in integer-mode reduction"),
        };
        for c in iter {
            let n = match c {
                Value::Integer(n) => n,
                _ => unreachable!("non-integer cell in integer-mode reduction"),
            };
            acc = int_op(acc, n)?;
        }
        Ok(Value::Integer(acc))
    }
}

pub fn builtin_add(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    fold("+", args, |a, b| Ok(a + b), |a, b| Ok(a + b))
}

pub fn builtin_sub(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    fold("-", args, |a, b| Ok(a - b), |a, b| Ok(a - b))
}

pub fn builtin_mul(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    fold("*", args, |a, b| Ok(a * b), |a, b| Ok(a * b))
}

pub fn builtin_div(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    fold(
        "/",
        args,
        |a, b| {
            if b == 0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        },
        |a, b| {
            if b == 0.0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        },
    )
}

pub fn builtin_min(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    fold("min", args, |a, b| Ok(a.min(b)), |a, b| Ok(a.min(b)))
}

pub fn builtin_max(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    fold("max", args, |a, b| Ok(a.max(b)), |a, b| Ok(a.max(b)))
}

/// Registers `+ - * / min max` in the environment.
pub fn register(env: &Env) {
    env.insert("+", Value::Builtin(builtin_add));
    env.insert("-", Value::Builtin(builtin_sub));
    env.insert("*", Value::Builtin(builtin_mul));
    env.insert("/", Value::Builtin(builtin_div));
    env.insert("min", Value::Builtin(builtin_min));
    env.insert("max", Value::Builtin(builtin_max));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;

    fn call(f: fn(&Env, Value) -> Result<Value, RuntimeError>, cells: Vec<Value>) -> Value {
        let env = Environment::new();
        f(&env, Value::sexpr(cells)).unwrap()
    }

    #[test]
    fn test_add_integers() {
        let result = call(builtin_add, vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        assert!(matches!(result, Value::Integer(6)));
    }

    #[test]
    fn test_add_promotes_to_double() {
        let result = call(builtin_add, vec![Value::Integer(1), Value::Double(2.5)]);
        assert!(matches!(result, Value::Double(d) if (d - 3.5).abs() < 1e-9));
    }

    #[test]
    fn test_sub_single_arg_is_identity() {
        let result = call(builtin_sub, vec![Value::Integer(5)]);
        assert!(matches!(result, Value::Integer(5)));
    }

    #[test]
    fn test_div_by_zero_errors() {
        let env = Environment::new();
        let result = builtin_div(&env, Value::sexpr(vec![Value::Integer(1), Value::Integer(0)]));
        assert!(matches!(result, Err(RuntimeError::DivisionByZero)));
    }

    #[test]
    fn test_min_max() {
        let min = call(builtin_min, vec![Value::Integer(3), Value::Integer(1), Value::Integer(2)]);
        assert!(matches!(min, Value::Integer(1)));
        let max = call(builtin_max, vec![Value::Integer(3), Value::Integer(1), Value::Integer(2)]);
        assert!(matches!(max, Value::Integer(3)));
    }

    #[test]
    fn test_non_numeric_errors() {
        let env = Environment::new();
        let result = builtin_add(&env, Value::sexpr(vec![Value::Integer(1), Value::symbol("x")]));
        assert!(matches!(result, Err(RuntimeError::TypeMismatch { .. })));
    }
}
