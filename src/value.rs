// ABOUTME: Value types representing Lisp data structures and expressions

use crate::env::Env;
use crate::error::RuntimeError;
use std::collections::VecDeque;
use std::fmt;

/// The variadic marker symbol recognized in formal-argument lists.
pub const VARARG_MARKER: &str = "&";

/// A host-provided function bound into the root environment under a symbol
/// name. Plain function pointers are enough here: every built-in is a pure
/// function of its environment and argument expression, none needs to close
/// over extra state.
pub type BuiltinFn = fn(&Env, Value) -> Result<Value, RuntimeError>;

/// A closure: an ordered formal-argument list, a body expression, and the
/// environment captured at the point the `lambda` form ran.
///
/// `env` starts out parentless; application installs the caller's
/// environment as its parent just before the body is evaluated (see
/// `eval::apply_function`). See SPEC_FULL.md ("Supplemented features") for
/// why that wiring happens at call time rather than at definition time.
#[derive(Debug)]
pub struct Lambda {
    pub formals: Box<Value>,
    pub body: Box<Value>,
    pub env: Env,
}

impl Clone for Lambda {
    fn clone(&self) -> Self {
        Lambda {
            formals: Box::new((*self.formals).clone()),
            body: Box::new((*self.body).clone()),
            env: self.env.fork(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Double(f64),
    String(String),
    Symbol(String),
    Builtin(BuiltinFn),
    Function(Lambda),
    /// Evaluated applicatively: head is applied to the reduced tail.
    SExpression(VecDeque<Value>),
    /// Literal data; identity under `eval` until explicitly retagged.
    QExpression(VecDeque<Value>),
    /// A carried runtime error value, first-class so user code (`error`,
    /// `error?`-style predicates built atop it) can inspect it.
    Error(String),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Value {
        Value::Symbol(name.into())
    }

    pub fn sexpr(cells: impl Into<VecDeque<Value>>) -> Value {
        Value::SExpression(cells.into())
    }

    pub fn qexpr(cells: impl Into<VecDeque<Value>>) -> Value {
        Value::QExpression(cells.into())
    }

    pub fn empty_sexpr() -> Value {
        Value::SExpression(VecDeque::new())
    }

    pub fn empty_qexpr() -> Value {
        Value::QExpression(VecDeque::new())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Double(_))
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Value::SExpression(_) | Value::QExpression(_))
    }

    pub fn is_empty_expression(&self) -> bool {
        match self {
            Value::SExpression(cells) | Value::QExpression(cells) => cells.is_empty(),
            _ => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn has_symbol_name(&self, name: &str) -> bool {
        matches!(self, Value::Symbol(s) if s == name)
    }

    /// Cells of an SExpression/QExpression, or an arity error naming `who`.
    pub fn into_cells(self, who: &str) -> Result<VecDeque<Value>, RuntimeError> {
        match self {
            Value::SExpression(cells) | Value::QExpression(cells) => Ok(cells),
            other => Err(RuntimeError::type_error(
                who,
                "expression",
                &other,
                0,
            )),
        }
    }

    pub fn cells(&self) -> Option<&VecDeque<Value>> {
        match self {
            Value::SExpression(cells) | Value::QExpression(cells) => Some(cells),
            _ => None,
        }
    }

    /// Retags an expression's kind between SExpression and QExpression,
    /// keeping its cells. No-op on non-expression values.
    pub fn retag_sexpr(self) -> Value {
        match self {
            Value::QExpression(cells) => Value::SExpression(cells),
            other => other,
        }
    }

    pub fn retag_qexpr(self) -> Value {
        match self {
            Value::SExpression(cells) => Value::QExpression(cells),
            other => other,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Builtin(_) => "builtin",
            Value::Function(_) => "function",
            Value::SExpression(_) => "s-expression",
            Value::QExpression(_) => "q-expression",
            Value::Error(_) => "error",
        }
        .to_string()
    }

    /// Structural equality per §4.1: numeric-to-numeric promotes to Double;
    /// String/Symbol compare by payload; Functions compare formals+body;
    /// Expressions compare pairwise; Builtins are never equal to anything.
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_numeric() && b.is_numeric() => a.as_f64() == b.as_f64(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => {
                a.formals.structural_eq(&b.formals) && a.body.structural_eq(&b.body)
            }
            (Value::SExpression(a), Value::SExpression(b))
            | (Value::QExpression(a), Value::QExpression(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Builtin(_) => write!(f, "<builtin>"),
            Value::Function(_) => write!(f, "<function>"),
            Value::Error(msg) => write!(f, "Error: {}", msg),
            Value::SExpression(cells) => {
                write!(f, "(")?;
                for (i, c) in cells.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
            Value::QExpression(cells) => {
                write!(f, "[")?;
                for (i, c) in cells.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "]")
            }
        }
    }
}
