//! special::errors — configuration errors for the series engines.
//!
//! Only construction can fail. Evaluation never returns an error: poles and
//! overflow surface as IEEE infinities or NaN in the affected elements.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

pub type SeriesResult<T> = Result<T, SeriesError>;

/// SeriesError — rejected series-engine configuration.
///
/// Variants
/// --------
/// - `InvalidTermCount { terms, max }`
///   The requested number of series terms is zero or larger than `max`
///   (binomial entries beyond `max` overflow `f64`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    InvalidTermCount { terms: usize, max: usize },
}

impl std::error::Error for SeriesError {}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::InvalidTermCount { terms, max } => {
                write!(f, "Number of series terms must be in 1..={max}; got: {terms}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SeriesError> for PyErr {
    fn from(err: SeriesError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
