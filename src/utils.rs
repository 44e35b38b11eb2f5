//! utils — conversion helpers for the PyO3 bridge.
//!
//! Everything here is compiled only with `python-bindings`; the helpers turn
//! loosely typed Python inputs (numpy arrays, sequences, scalars, option
//! strings) into the validated Rust types of the inner modules.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use num_complex::Complex64;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use crate::{
    grid::{ComplexGridArray, GridBounds, GridShape},
    logging::discard_logger,
    special::{Backend, SeriesOptions, DEFAULT_SERIES_TERMS},
};

/// Complex samples from a 1-D complex or real numpy array, a sequence of
/// numbers, or a single scalar.
#[cfg(feature = "python-bindings")]
pub fn extract_complex_array<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Array1<Complex64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<Complex64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().mapv(|x| Complex64::new(x, 0.0)));
    }
    if let Ok(z) = raw.extract::<Complex64>() {
        return Ok(Array1::from_elem(1, z));
    }
    let vec: Vec<Complex64> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, a sequence of complex numbers, or a complex scalar",
        )
    })?;
    Ok(Array1::from(vec))
}

/// Parameter values in compile order; `None` means "use the defaults".
#[cfg(feature = "python-bindings")]
pub fn extract_params<'py>(raw: Option<&Bound<'py, PyAny>>) -> PyResult<Vec<Complex64>> {
    match raw {
        None => Ok(Vec::new()),
        Some(obj) if obj.is_none() => Ok(Vec::new()),
        Some(obj) => Ok(extract_complex_array(obj)?.to_vec()),
    }
}

#[cfg(feature = "python-bindings")]
pub fn extract_backend(backend: Option<&str>) -> PyResult<Backend> {
    match backend {
        None => Ok(Backend::default()),
        Some(name) => name.parse::<Backend>().map_err(PyValueError::new_err),
    }
}

#[cfg(feature = "python-bindings")]
pub fn extract_series_options(terms: Option<usize>, backend: Option<&str>) -> PyResult<SeriesOptions> {
    let terms = terms.unwrap_or(DEFAULT_SERIES_TERMS);
    Ok(SeriesOptions::new(terms, extract_backend(backend)?, discard_logger()))
}

/// Grid from optional `[x_min, y_min, x_max, y_max]` and line counts; the
/// missing pieces fall back to the default view.
#[cfg(feature = "python-bindings")]
pub fn build_grid(
    dimensions: Option<[f64; 4]>, points_per_line: Option<usize>,
    n_horizontal_lines: Option<usize>, n_vertical_lines: Option<usize>,
) -> PyResult<ComplexGridArray> {
    let base = ComplexGridArray::default_view();
    let bounds = match dimensions {
        Some(dims) => GridBounds::from_array(dims)?,
        None => base.bounds(),
    };
    let shape = GridShape::new(
        points_per_line.unwrap_or(base.points_per_line()),
        n_horizontal_lines.unwrap_or(base.n_horizontal_lines()),
        n_vertical_lines.unwrap_or(base.n_vertical_lines()),
    )?;
    Ok(ComplexGridArray::new(bounds, shape))
}
