//! expression::errors — construction-time failures of the function compiler.
//!
//! Purpose
//! -------
//! Collect every way turning a user string into a callable can fail, so the
//! presentation layer can show one message and keep the previous function.
//!
//! Key behaviors
//! -------------
//! - Parse failures carry a 1-based line and column into the source string.
//! - `VariableNotFound` is raised when the main variable is absent from the
//!   parsed expression; no partial function is built.
//! - `NoClosedForm` is returned by `derivative()` / `antiderivative()` when
//!   the result is outside what the symbolic rules can express.
//! - Evaluation-time singularities are never errors; they surface as
//!   inf/NaN elements.
//!
//! Conventions
//! -----------
//! - With `python-bindings`, every variant converts into `ValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

use crate::special::errors::SeriesError;

pub type ExprResult<T> = Result<T, ExprError>;

/// Malformed expression syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, col {}: {}", self.line, self.col, self.message)
    }
}

/// ExprError — failures raised while building or transforming a function.
///
/// Variants
/// --------
/// - `Parse(ParseError)`
///   The source string is not a valid expression.
/// - `UnknownFunction { name }`
///   A call names a function outside the namespace.
/// - `Arity { function, expected, got }`
///   A known function was called with the wrong number of arguments.
/// - `InvalidVariable { name }`
///   The requested main variable is not a usable symbol name.
/// - `VariableNotFound { variable, expression }`
///   The main variable does not occur in the expression.
/// - `ParameterCount { expected, got }`
///   An evaluation call supplied the wrong number of parameter values.
/// - `NoClosedForm { operation, detail }`
///   Symbolic differentiation or integration has no expressible result.
/// - `Series(SeriesError)`
///   The zeta/eta engines of the namespace could not be built.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    Parse(ParseError),
    UnknownFunction { name: String },
    Arity { function: &'static str, expected: usize, got: usize },
    InvalidVariable { name: String },
    VariableNotFound { variable: String, expression: String },
    ParameterCount { expected: usize, got: usize },
    NoClosedForm { operation: &'static str, detail: String },
    Series(SeriesError),
}

impl std::error::Error for ExprError {}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::Parse(err) => write!(f, "Parse error at {err}"),
            ExprError::UnknownFunction { name } => write!(f, "Unknown function: '{name}'"),
            ExprError::Arity { function, expected, got } => {
                write!(f, "Function '{function}' takes {expected} argument(s); got: {got}")
            }
            ExprError::InvalidVariable { name } => {
                write!(f, "Invalid main variable '{name}': must be a plain symbol name")
            }
            ExprError::VariableNotFound { variable, expression } => {
                write!(f, "Variable not found: '{variable}' does not occur in '{expression}'")
            }
            ExprError::ParameterCount { expected, got } => {
                write!(f, "Expected {expected} parameter value(s); got: {got}")
            }
            ExprError::NoClosedForm { operation, detail } => {
                write!(f, "No closed-form {operation}: {detail}")
            }
            ExprError::Series(err) => write!(f, "{err}"),
        }
    }
}

impl From<ParseError> for ExprError {
    fn from(err: ParseError) -> Self {
        ExprError::Parse(err)
    }
}

impl From<SeriesError> for ExprError {
    fn from(err: SeriesError) -> Self {
        ExprError::Series(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<ExprError> for PyErr {
    fn from(err: ExprError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_reports_position() {
        let err: ExprError = ParseError { message: "unexpected ')'".into(), line: 1, col: 7 }.into();
        assert_eq!(err.to_string(), "Parse error at line 1, col 7: unexpected ')'");
    }

    #[test]
    fn series_errors_convert() {
        let err: ExprError = SeriesError::InvalidTermCount { terms: 0, max: 1000 }.into();
        assert!(matches!(err, ExprError::Series(_)));
        assert!(err.to_string().contains("1..=1000"));
    }
}
