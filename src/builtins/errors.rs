//! Error handling: error, error?, error-msg
//!
//! Errors are first-class values, not exceptions: `error` produces one,
//! it propagates through `eval` like any other value, and callers inspect
//! it with `error?`/`error-msg` rather than catching an exception.

use crate::env::Env;
use crate::error::{RuntimeError, ARITY_ONE};
use crate::value::Value;

/// `(error "message")` - builds an error value. Does not unwind the call
/// stack; the caller decides what to do with it.
pub fn builtin_error(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let mut cells = args.into_cells("error")?;
    if cells.len() != 1 {
        return Err(RuntimeError::arity_error("error", ARITY_ONE, cells.len()));
    }
    let message = match cells.pop_front().unwrap() {
        Value::String(s) => s,
        other => format!("{}", other),
    };
    Ok(Value::Error(message))
}

/// `(error? v)` - tests whether `v` is an error value.
pub fn builtin_error_p(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let mut cells = args.into_cells("error?")?;
    if cells.len() != 1 {
        return Err(RuntimeError::arity_error("error?", ARITY_ONE, cells.len()));
    }
    let is_error = cells.pop_front().unwrap().is_error();
    Ok(Value::Integer(if is_error { 1 } else { 0 }))
}

/// `(error-msg e)` - extracts the message carried by an error value.
pub fn builtin_error_msg(_env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let mut cells = args.into_cells("error-msg")?;
    if cells.len() != 1 {
        return Err(RuntimeError::arity_error("error-msg", ARITY_ONE, cells.len()));
    }
    match cells.pop_front().unwrap() {
        Value::Error(msg) => Ok(Value::String(msg)),
        other => Err(RuntimeError::type_error("error-msg", "error", &other, 0)),
    }
}

/// Registers `error error? error-msg` in the environment.
pub fn register(env: &Env) {
    env.insert("error", Value::Builtin(builtin_error));
    env.insert("error?", Value::Builtin(builtin_error_p));
    env.insert("error-msg", Value::Builtin(builtin_error_msg));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;

    #[test]
    fn test_error_builds_error_value() {
        let env = Environment::new();
        let r = builtin_error(&env, Value::sexpr(vec![Value::String("bad".into())])).unwrap();
        assert!(matches!(r, Value::Error(ref m) if m == "bad"));
    }

    #[test]
    fn test_error_p_predicate() {
        let env = Environment::new();
        let r = builtin_error_p(&env, Value::sexpr(vec![Value::Error("x".into())])).unwrap();
        assert!(matches!(r, Value::Integer(1)));
        let r = builtin_error_p(&env, Value::sexpr(vec![Value::Integer(1)])).unwrap();
        assert!(matches!(r, Value::Integer(0)));
    }

    #[test]
    fn test_error_msg_extracts_message() {
        let env = Environment::new();
        let r = builtin_error_msg(&env, Value::sexpr(vec![Value::Error("oops".into())])).unwrap();
        assert!(matches!(r, Value::String(ref s) if s == "oops"));
    }

    #[test]
    fn test_error_msg_rejects_non_error() {
        let env = Environment::new();
        let r = builtin_error_msg(&env, Value::sexpr(vec![Value::Integer(1)]));
        assert!(r.is_err());
    }
}
