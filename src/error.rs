// ABOUTME: Error types for parse failures and evaluation failures

use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_THREE: &str = "3";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_TWO_OR_MORE: &str = "2 or more";

/// A malformed-source error. Carries a location so callers can point at the
/// offending span instead of just printing a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// Offset in characters from the start of input.
    pub begin: usize,
    pub length: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, begin: usize, length: usize) -> Self {
        ParseError {
            message: message.into(),
            begin,
            length,
        }
    }
}

#[allow(dead_code)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Type mismatch error with function name, expected type, actual type, and position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String, // "2", "1-3", "at least 1"
        actual: usize,
    },

    /// Catch-all runtime error with function context
    #[error("{function}: {message}")]
    RuntimeMessage { function: String, message: String },

    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),

    #[error("value is not callable: {0}")]
    NotCallable(String),

    #[error("division by zero")]
    DivisionByZero,
}

impl RuntimeError {
    /// Create a type mismatch error with full context
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        RuntimeError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name(),
            position,
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        RuntimeError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a runtime error with function context
    pub fn runtime_error(function: &str, message: impl Into<String>) -> Self {
        RuntimeError::RuntimeMessage {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
