//! grid::errors — dimension errors for grid construction.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by every validated grid
//! input ([`GridBounds`](crate::grid::bounds::GridBounds),
//! [`GridShape`](crate::grid::shape::GridShape)) and by the fallible
//! [`ComplexGridArray`](crate::grid::complex_grid::ComplexGridArray)
//! constructors.
//!
//! Key behaviors
//! -------------
//! - Parametric paths and zero-search options reuse the same enum.
//! - Every invalid rectangle or line/point count is rejected before any
//!   geometry is generated; nothing is clamped or corrected silently.
//! - `Display` messages name the offending value and the constraint it
//!   violates.
//! - With `python-bindings`, errors convert into `ValueError`.
//!
//! Testing notes
//! -------------
//! - Unit tests check that each variant's message embeds its payload.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

pub type GridResult<T> = Result<T, GridError>;

/// GridError — rejected grid dimensions.
///
/// Variants
/// --------
/// - `NonFiniteBound { name, value }`
///   A rectangle bound is NaN or ±∞.
/// - `EmptyRange { axis, min, max }`
///   `min >= max` along `axis` (`'x'` or `'y'`).
/// - `InvalidLineCount { family, count, reason }`
///   A line family has zero lines or more than the supported maximum.
/// - `InvalidPointCount { points, reason }`
///   Too few points per line, or fewer points than lines in a family (the
///   connector segments would have no samples).
/// - `InvalidScale { factor }`
///   A view scale factor is non-finite or not strictly positive.
/// - `InvalidPath { reason }`
///   A parametric path has too few or non-increasing parameter samples.
/// - `InvalidSearchOption { name, reason }`
///   A zero-search setting is out of range.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    NonFiniteBound { name: &'static str, value: f64 },
    EmptyRange { axis: char, min: f64, max: f64 },
    InvalidLineCount { family: &'static str, count: usize, reason: &'static str },
    InvalidPointCount { points: usize, reason: &'static str },
    InvalidScale { factor: f64 },
    InvalidPath { reason: &'static str },
    InvalidSearchOption { name: &'static str, reason: &'static str },
}

impl std::error::Error for GridError {}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::NonFiniteBound { name, value } => {
                write!(f, "Grid bound {name} must be finite; got: {value}")
            }
            GridError::EmptyRange { axis, min, max } => {
                write!(f, "Grid range along {axis} must satisfy min < max; got min={min}, max={max}")
            }
            GridError::InvalidLineCount { family, count, reason } => {
                write!(f, "Invalid number of {family} lines: {count}. {reason}")
            }
            GridError::InvalidPointCount { points, reason } => {
                write!(f, "Invalid number of points per line: {points}. {reason}")
            }
            GridError::InvalidScale { factor } => {
                write!(f, "Scale factor must be finite and > 0; got: {factor}")
            }
            GridError::InvalidPath { reason } => write!(f, "Invalid parametric path: {reason}"),
            GridError::InvalidSearchOption { name, reason } => {
                write!(f, "Invalid zero-search option {name}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<GridError> for PyErr {
    fn from(err: GridError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
