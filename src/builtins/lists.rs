//! List operations: list, head, tail, eval, join
//!
//! These all work over q-expressions (literal data), retagging a `kind`
//! between `SExpression`/`QExpression` rather than copying cells, the same
//! trick the reference evaluator uses for `builtin_list`/`builtin_head`/
//! `builtin_tail`/`builtin_eval`.

use crate::env::Env;
use crate::error::{RuntimeError, ARITY_ONE};
use crate::value::Value;
use std::collections::VecDeque;

/// `(list a b c)` - wraps its (already-evaluated) arguments into a
/// q-expression.
pub fn builtin_list(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    Ok(args.retag_qexpr())
}

/// `(head [a b c])` - the first element of a q-expression, itself wrapped
/// in a one-element q-expression.
pub fn builtin_head(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let mut cells = args.into_cells("head")?;
    if cells.len() != 1 {
        return Err(RuntimeError::arity_error("head", ARITY_ONE, cells.len()));
    }
    let list_cells = expect_qexpr("head", cells.pop_front().unwrap())?;
    let mut list_cells = list_cells;
    let head = list_cells
        .pop_front()
        .ok_or_else(|| RuntimeError::runtime_error("head", "cannot take head of an empty list"))?;
    Ok(Value::qexpr(vec![head]))
}

/// `(tail [a b c])` - every element but the first, still a q-expression.
pub fn builtin_tail(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let mut cells = args.into_cells("tail")?;
    if cells.len() != 1 {
        return Err(RuntimeError::arity_error("tail", ARITY_ONE, cells.len()));
    }
    let mut list_cells = expect_qexpr("tail", cells.pop_front().unwrap())?;
    if list_cells.is_empty() {
        return Err(RuntimeError::runtime_error("tail", "cannot take tail of an empty list"));
    }
    list_cells.pop_front();
    Ok(Value::QExpression(list_cells))
}

/// `(eval [+ 1 2])` - retags a q-expression to an s-expression and reduces
/// it.
pub fn builtin_eval(env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let mut cells = args.into_cells("eval")?;
    if cells.len() != 1 {
        return Err(RuntimeError::arity_error("eval", ARITY_ONE, cells.len()));
    }
    let expr = cells.pop_front().unwrap();
    crate::eval::eval(env, expr.retag_sexpr())
}

/// `(join [1 2] [3 4])` - concatenates any number of q-expressions.
pub fn builtin_join(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let cells = args.into_cells("join")?;
    let mut result = VecDeque::new();
    for cell in cells {
        result.extend(expect_qexpr("join", cell)?);
    }
    Ok(Value::QExpression(result))
}

fn expect_qexpr(who: &str, v: Value) -> Result<VecDeque<Value>, RuntimeError> {
    match v {
        Value::QExpression(cells) => Ok(cells),
        other => Err(RuntimeError::type_error(who, "q-expression", &other, 0)),
    }
}

/// Registers `list head tail eval join` in the environment.
pub fn register(env: &Env) {
    env.insert("list", Value::Builtin(builtin_list));
    env.insert("head", Value::Builtin(builtin_head));
    env.insert("tail", Value::Builtin(builtin_tail));
    env.insert("eval", Value::Builtin(builtin_eval));
    env.insert("join", Value::Builtin(builtin_join));
}
