// ABOUTME: Evaluator module for executing parsed Lisp expressions

use crate::env::{Env, Environment};
use crate::error::{RuntimeError, ARITY_THREE, ARITY_TWO};
use crate::value::{Lambda, Value, VARARG_MARKER};
use std::collections::VecDeque;

/// Evaluates a single value in `env`.
///
/// Symbols resolve through the environment's parent chain. S-expressions
/// reduce via [`eval_sexpression`]. Every other kind (numbers, strings,
/// q-expressions, builtins, functions, errors) is self-evaluating.
pub fn eval(env: &Env, v: Value) -> Result<Value, RuntimeError> {
    match v {
        Value::Symbol(name) => env
            .lookup(&name)
            .ok_or(RuntimeError::UnboundSymbol(name)),
        Value::SExpression(cells) => eval_sexpression(env, cells),
        other => Ok(other),
    }
}

fn eval_sexpression(env: &Env, mut cells: VecDeque<Value>) -> Result<Value, RuntimeError> {
    if cells.is_empty() {
        return Ok(Value::SExpression(cells));
    }
    if cells.len() == 1 {
        return eval(env, cells.pop_front().unwrap());
    }

    // `lambda`/`\` and `defun` must see their body unevaluated, so they are
    // recognized before the generic reduction below touches anything. Every
    // other special form (`def`, `define`, `=`, `if`) writes its "don't
    // evaluate this" arguments as q-expressions, which are already identity
    // under `eval` - no extra case is needed for them here.
    if let Some(Value::Symbol(name)) = cells.front() {
        match name.as_str() {
            "lambda" | "\\" => return eval_lambda_form(cells),
            "defun" => return eval_defun(env, cells),
            _ => {}
        }
    }

    let mut evaluated = VecDeque::with_capacity(cells.len());
    for cell in cells {
        evaluated.push_back(eval(env, cell)?);
    }

    if evaluated.len() == 1 {
        return Ok(evaluated.pop_front().unwrap());
    }

    let head = evaluated.pop_front().unwrap();
    apply(env, head, Value::SExpression(evaluated))
}

/// Applies an already-evaluated `head` to `args` (itself an already-evaluated
/// s-expression of argument values).
pub fn apply(env: &Env, head: Value, args: Value) -> Result<Value, RuntimeError> {
    match head {
        Value::Builtin(f) => f(env, args),
        Value::Function(lambda) => apply_function(env, lambda, args.into_cells("<lambda>")?),
        other => Err(RuntimeError::NotCallable(other.type_name())),
    }
}

/// Binds `args` to `lambda`'s formals one at a time, consuming a `&` marker
/// as "bind the rest of the arguments, as a list, to the following symbol."
/// Once every formal is satisfied, installs `caller_env` as the outer scope
/// and evaluates the body; otherwise returns the partially-applied function.
fn apply_function(
    caller_env: &Env,
    mut lambda: Lambda,
    mut args: VecDeque<Value>,
) -> Result<Value, RuntimeError> {
    let mut formals = match *lambda.formals {
        Value::QExpression(cells) => cells,
        other => {
            return Err(RuntimeError::type_error(
                "<lambda>",
                "q-expression",
                &other,
                0,
            ))
        }
    };

    let formal_count = formals.len();
    let arg_count = args.len();

    while !args.is_empty() {
        if formals.is_empty() {
            return Err(RuntimeError::arity_error(
                "<lambda>",
                formal_count.to_string(),
                arg_count,
            ));
        }

        let symbol_name = expect_symbol("<lambda>", formals.pop_front().unwrap())?;

        if symbol_name == VARARG_MARKER {
            if formals.len() != 1 {
                return Err(RuntimeError::runtime_error(
                    "<lambda>",
                    "'&' must be followed by exactly one symbol",
                ));
            }
            let rest_symbol = expect_symbol("<lambda>", formals.pop_front().unwrap())?;
            let rest_args = std::mem::take(&mut args);
            lambda.env.insert(rest_symbol, Value::QExpression(rest_args));
            break;
        }

        let value = args.pop_front().unwrap();
        lambda.env.insert(symbol_name, value);
    }

    if matches!(formals.front(), Some(Value::Symbol(s)) if s == VARARG_MARKER) {
        if formals.len() != 2 {
            return Err(RuntimeError::runtime_error(
                "<lambda>",
                "'&' must be followed by exactly one symbol",
            ));
        }
        formals.pop_front();
        let rest_symbol = expect_symbol("<lambda>", formals.pop_front().unwrap())?;
        lambda.env.insert(rest_symbol, Value::empty_qexpr());
    }

    if formals.is_empty() {
        lambda.env.set_outer_scope(caller_env.clone());
        let body = (*lambda.body).clone().retag_sexpr();
        return eval(&lambda.env, body);
    }

    Ok(Value::Function(Lambda {
        formals: Box::new(Value::QExpression(formals)),
        body: lambda.body,
        env: lambda.env,
    }))
}

fn expect_symbol(who: &str, v: Value) -> Result<String, RuntimeError> {
    match v {
        Value::Symbol(s) => Ok(s),
        other => Err(RuntimeError::type_error(who, "symbol", &other, 0)),
    }
}

/// `(lambda [formals] body)` / `(\ [formals] body)` - builds a closure
/// without evaluating its formals or body. The closure's own environment
/// starts out empty and parentless; [`apply_function`] installs the calling
/// environment as its parent once every formal is bound.
fn eval_lambda_form(mut cells: VecDeque<Value>) -> Result<Value, RuntimeError> {
    cells.pop_front(); // "lambda" / "\"
    if cells.len() != 2 {
        return Err(RuntimeError::arity_error("lambda", ARITY_TWO, cells.len()));
    }
    let formals_val = cells.pop_front().unwrap();
    let body = cells.pop_front().unwrap();

    let formals = match formals_val {
        Value::QExpression(cells) => cells,
        other => {
            return Err(RuntimeError::type_error(
                "lambda",
                "q-expression",
                &other,
                0,
            ))
        }
    };
    for f in &formals {
        if !matches!(f, Value::Symbol(_)) {
            return Err(RuntimeError::type_error("lambda", "symbol", f, 0));
        }
    }

    Ok(Value::Function(Lambda {
        formals: Box::new(Value::QExpression(formals)),
        body: Box::new(body),
        env: Environment::new(),
    }))
}

/// `(defun [name formals...] body)` - sugar that builds the same kind of
/// closure `lambda` does and binds it globally under `name` as a side
/// effect, mirroring `(def [name] (lambda [formals...] body))`.
fn eval_defun(env: &Env, mut cells: VecDeque<Value>) -> Result<Value, RuntimeError> {
    cells.pop_front(); // "defun"
    if cells.len() != 2 {
        return Err(RuntimeError::arity_error("defun", ARITY_TWO, cells.len()));
    }
    let header_val = cells.pop_front().unwrap();
    let body = cells.pop_front().unwrap();

    let mut header = match header_val {
        Value::QExpression(cells) => cells,
        other => {
            return Err(RuntimeError::type_error(
                "defun",
                "q-expression",
                &other,
                0,
            ))
        }
    };
    if header.is_empty() {
        return Err(RuntimeError::runtime_error("defun", "missing function name"));
    }
    let name = expect_symbol("defun", header.pop_front().unwrap())?;
    for f in &header {
        if !matches!(f, Value::Symbol(_)) {
            return Err(RuntimeError::type_error("defun", "symbol", f, 0));
        }
    }

    let function = Value::Function(Lambda {
        formals: Box::new(Value::QExpression(header)),
        body: Box::new(body),
        env: Environment::new(),
    });

    env.insert_global(name, function);
    Ok(Value::empty_sexpr())
}

/// `(if condition [then] [else])`. `condition` is evaluated eagerly by the
/// generic reduction in [`eval_sexpression`] before this builtin ever runs;
/// the two branches arrive untouched because q-expressions are identity
/// under `eval`. Only the chosen branch is retagged to an s-expression and
/// evaluated.
pub fn builtin_if(env: &Env, args: Value) -> Result<Value, RuntimeError> {
    let mut cells = args.into_cells("if")?;
    if cells.len() != 3 {
        return Err(RuntimeError::arity_error("if", ARITY_THREE, cells.len()));
    }
    let condition = cells.pop_front().unwrap();
    let then_branch = cells.pop_front().unwrap();
    let else_branch = cells.pop_front().unwrap();

    let truthy = match condition {
        Value::Integer(n) => n != 0,
        Value::Double(d) => d != 0.0,
        other => {
            return Err(RuntimeError::type_error(
                "if",
                "numeric condition",
                &other,
                0,
            ))
        }
    };

    let branch = if truthy { then_branch } else { else_branch };
    eval(env, branch.retag_sexpr())
}
