//! Comparison operations: <, <=, >, >=, ==, !=
//!
//! `< <= > >=` are strictly binary and numeric. `==`/`!=` fall back to
//! structural equality (see `Value::structural_eq`) and accept any two
//! values, not just numbers. All six return `Integer(1)`/`Integer(0)`.

use crate::env::Env;
use crate::error::{RuntimeError, ARITY_TWO};
use crate::value::Value;

fn to_bool(b: bool) -> Value {
    Value::Integer(if b { 1 } else { 0 })
}

fn numeric_pair(who: &str, args: Value) -> Result<(f64, f64), RuntimeError> {
    let cells = args.into_cells(who)?;
    if cells.len() != 2 {
        return Err(RuntimeError::arity_error(who, ARITY_TWO, cells.len()));
    }
    let mut iter = cells.into_iter();
    let a = iter.next().unwrap();
    let b = iter.next().unwrap();
    let af = a
        .as_f64()
        .ok_or_else(|| RuntimeError::type_error(who, "numeric", &a, 0))?;
    let bf = b
        .as_f64()
        .ok_or_else(|| RuntimeError::type_error(who, "numeric", &b, 1))?;
    Ok((af, bf))
}

fn pair(who: &str, args: Value) -> Result<(Value, Value), RuntimeError> {
    let cells = args.into_cells(who)?;
    if cells.len() != 2 {
        return Err(RuntimeError::arity_error(who, ARITY_TWO, cells.len()));
    }
    let mut iter = cells.into_iter();
    Ok((iter.next().unwrap(), iter.next().unwrap()))
}

pub fn builtin_lt(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let (a, b) = numeric_pair("<", args)?;
    Ok(to_bool(a < b))
}

pub fn builtin_le(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let (a, b) = numeric_pair("<=", args)?;
    Ok(to_bool(a <= b))
}

pub fn builtin_gt(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let (a, b) = numeric_pair(">", args)?;
    Ok(to_bool(a > b))
}

pub fn builtin_ge(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let (a, b) = numeric_pair(">=", args)?;
    Ok(to_bool(a >= b))
}

pub fn builtin_eq(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let (a, b) = pair("==", args)?;
    Ok(to_bool(a.structural_eq(&b)))
}

pub fn builtin_neq(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let (a, b) = pair("!=", args)?;
    Ok(to_bool(!a.structural_eq(&b)))
}

/// Registers `< <= > >= == !=` in the environment.
pub fn register(env: &Env) {
    env.insert("<", Value::Builtin(builtin_lt));
    env.insert("<=", Value::Builtin(builtin_le));
    env.insert(">", Value::Builtin(builtin_gt));
    env.insert(">=", Value::Builtin(builtin_ge));
    env.insert("==", Value::Builtin(builtin_eq));
    env.insert("!=", Value::Builtin(builtin_neq));
}
