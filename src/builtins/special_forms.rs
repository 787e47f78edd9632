//! Binding and branching: def, define, =, if
//!
//! `def`/`define`/`=` take their symbol list as a q-expression (so the
//! symbols are never looked up as values) followed by one value argument
//! per symbol; all of it already evaluated by the time these run, since
//! q-expressions are identity under `eval` and the value arguments are
//! ordinary cells in the surrounding s-expression. `def`/`define` bind at
//! the root of the environment chain; `=` binds in the current frame only.

use crate::env::Env;
use crate::error::{RuntimeError, ARITY_TWO_OR_MORE};
use crate::value::Value;

fn bind(args: Value, who: &'static str, env: &Env, global: bool) -> Result<Value, RuntimeError> {
    let mut cells = args.into_cells(who)?;
    if cells.is_empty() {
        return Err(RuntimeError::arity_error(who, ARITY_TWO_OR_MORE, 0));
    }
    let symbols = match cells.pop_front().unwrap() {
        Value::QExpression(cells) => cells,
        other => return Err(RuntimeError::type_error(who, "q-expression", &other, 0)),
    };
    if symbols.len() != cells.len() {
        return Err(RuntimeError::arity_error(
            who,
            symbols.len().to_string(),
            cells.len(),
        ));
    }

    for (symbol, value) in symbols.into_iter().zip(cells.into_iter()) {
        let name = match symbol {
            Value::Symbol(s) => s,
            other => return Err(RuntimeError::type_error(who, "symbol", &other, 0)),
        };
        if global {
            env.insert_global(name, value);
        } else {
            env.insert(name, value);
        }
    }

    Ok(Value::empty_sexpr())
}

/// `(def [x y] 1 2)` - binds at the root of the environment chain.
pub fn builtin_def(env: &Env, args: Value) -> Result<Value, RuntimeError> {
    bind(args, "def", env, true)
}

/// `(define [x y] 1 2)` - an alias for `def`.
pub fn builtin_define(env: &Env, args: Value) -> Result<Value, RuntimeError> {
    bind(args, "define", env, true)
}

/// `(= [x] 1)` - binds in the current frame only.
pub fn builtin_set(env: &Env, args: Value) -> Result<Value, RuntimeError> {
    bind(args, "=", env, false)
}

/// Registers `def define = if` in the environment.
pub fn register(env: &Env) {
    env.insert("def", Value::Builtin(builtin_def));
    env.insert("define", Value::Builtin(builtin_define));
    env.insert("=", Value::Builtin(builtin_set));
    env.insert("if", Value::Builtin(crate::eval::builtin_if));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;

    #[test]
    fn test_def_binds_globally() {
        let parent = Environment::new();
        let child = Environment::with_parent(parent.clone());
        builtin_def(
            &child,
            Value::sexpr(vec![Value::qexpr(vec![Value::symbol("x")]), Value::Integer(1)]),
        )
        .unwrap();
        assert!(matches!(parent.lookup("x"), Some(Value::Integer(1))));
    }

    #[test]
    fn test_set_binds_locally() {
        let parent = Environment::new();
        let child = Environment::with_parent(parent.clone());
        builtin_set(
            &child,
            Value::sexpr(vec![Value::qexpr(vec![Value::symbol("x")]), Value::Integer(1)]),
        )
        .unwrap();
        assert!(parent.lookup("x").is_none());
        assert!(matches!(child.lookup("x"), Some(Value::Integer(1))));
    }

    #[test]
    fn test_def_multiple_symbols() {
        let env = Environment::new();
        builtin_def(
            &env,
            Value::sexpr(vec![
                Value::qexpr(vec![Value::symbol("x"), Value::symbol("y")]),
                Value::Integer(1),
                Value::Integer(2),
            ]),
        )
        .unwrap();
        assert!(matches!(env.lookup("x"), Some(Value::Integer(1))));
        assert!(matches!(env.lookup("y"), Some(Value::Integer(2))));
    }

    #[test]
    fn test_def_arity_mismatch_errors() {
        let env = Environment::new();
        let r = builtin_def(
            &env,
            Value::sexpr(vec![
                Value::qexpr(vec![Value::symbol("x"), Value::symbol("y")]),
                Value::Integer(1),
            ]),
        );
        assert!(matches!(r, Err(RuntimeError::ArityError { .. })));
    }
}
