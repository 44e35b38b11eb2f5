//! complex_graph — computational core for exploring complex functions.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the grid generator, the expression compiler and the zeta/eta
//! engines to Python via the `_complex_graph` extension module. An
//! interactive front end draws the reference grid, pushes it through a user
//! function and plots the image; everything numeric happens here.
//!
//! Key behaviors
//! -------------
//! - [`grid`]: serpentine grid lines, rectangle edges, parametric paths and
//!   zero search along them.
//! - [`special`]: analytic continuation of ζ and η through a shared
//!   coefficient table with switchable evaluation backends, plus the complex
//!   special functions of the expression namespace.
//! - [`expression`]: parser, symbolic helpers, default inference and the
//!   compiled vectorized evaluator.
//! - With `python-bindings`, `#[pyclass]` wrappers and the `#[pymodule]`
//!   initializer register `complex_graph.grid` and `complex_graph.functions`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file is FFI glue,
//!   input conversion and error mapping.
//! - Construction errors are typed per module (`GridError`, `SeriesError`,
//!   `ExprError`) and become `ValueError` at the PyO3 boundary. Evaluation
//!   never raises; singular points come back as inf/NaN.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on the inner modules (or their
//!   `prelude`s) and can ignore the feature-gated PyO3 items.
//! - The Python packaging layer imports `_complex_graph` and wraps its
//!   classes in the user-facing application.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each module; `tests/integration_complex_pipeline.rs`
//!   drives grid → compile → map → zero search end to end.

pub mod expression;
pub mod grid;
pub mod logging;
pub mod special;
pub mod utils;

#[cfg(feature = "python-bindings")]
use num_complex::Complex64;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny, types::PyDict};

#[cfg(feature = "python-bindings")]
use crate::{
    expression::{CompiledFunction, CompilerOptions, FunctionCompiler, PRESETS},
    grid::{ComplexGridArray, ParametricPath, ZeroSearchOptions},
    logging::discard_logger,
    special::{EtaFunction, ZetaFunction},
    utils::{build_grid, extract_complex_array, extract_params, extract_series_options},
};

/// ComplexGrid — Python-facing wrapper for [`ComplexGridArray`].
///
/// Purpose
/// -------
/// Hand the serpentine line families and rectangle edges to Python as
/// complex numpy arrays.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `ComplexGrid(dimensions=None, points_per_line=None, n_horizontal_lines=None, n_vertical_lines=None)`;
/// each missing argument falls back to the default view.
///
/// Notes
/// -----
/// - Grids are immutable; `get_copy` rebuilds an equal grid from the current
///   limits.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "complex_graph.grid")]
pub struct ComplexGrid {
    inner: ComplexGridArray,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ComplexGrid {
    #[new]
    #[pyo3(signature = (dimensions = None, points_per_line = None, n_horizontal_lines = None, n_vertical_lines = None))]
    pub fn new(
        dimensions: Option<[f64; 4]>, points_per_line: Option<usize>,
        n_horizontal_lines: Option<usize>, n_vertical_lines: Option<usize>,
    ) -> PyResult<ComplexGrid> {
        let inner = build_grid(dimensions, points_per_line, n_horizontal_lines, n_vertical_lines)?;
        Ok(ComplexGrid { inner })
    }

    #[staticmethod]
    pub fn default_view() -> ComplexGrid {
        ComplexGrid { inner: ComplexGridArray::default_view() }
    }

    #[staticmethod]
    pub fn zeta_view() -> ComplexGrid {
        ComplexGrid { inner: ComplexGridArray::zeta_view() }
    }

    pub fn get_copy(&self) -> ComplexGrid {
        ComplexGrid { inner: self.inner.get_copy() }
    }

    #[getter]
    pub fn horizontal_lines<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<Complex64>> {
        self.inner.horizontal_lines().to_owned().into_pyarray(py)
    }

    #[getter]
    pub fn vertical_lines<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<Complex64>> {
        self.inner.vertical_lines().to_owned().into_pyarray(py)
    }

    /// Edges ordered `[x_min, y_min, x_max, y_max]`.
    #[getter]
    pub fn boundaries<'py>(&self, py: Python<'py>) -> Vec<Bound<'py, PyArray1<Complex64>>> {
        self.inner.boundaries().into_iter().map(|b| b.to_owned().into_pyarray(py)).collect()
    }

    pub fn combined_lines<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<Complex64>> {
        self.inner.combined_lines().into_pyarray(py)
    }

    #[getter]
    pub fn dimensions(&self) -> [f64; 4] {
        self.inner.bounds().to_array()
    }

    #[getter]
    pub fn xlim(&self) -> [f64; 2] {
        self.inner.xlim()
    }

    #[getter]
    pub fn ylim(&self) -> [f64; 2] {
        self.inner.ylim()
    }

    #[getter]
    pub fn points_per_line(&self) -> usize {
        self.inner.points_per_line()
    }

    #[getter]
    pub fn n_horizontal_lines(&self) -> usize {
        self.inner.n_horizontal_lines()
    }

    #[getter]
    pub fn n_vertical_lines(&self) -> usize {
        self.inner.n_vertical_lines()
    }
}

/// ComplexFunction — Python-facing wrapper for [`CompiledFunction`].
///
/// Purpose
/// -------
/// Compile a user expression once and evaluate it over numpy arrays, grids
/// and the critical line.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `ComplexFunction(expression, main_variable="z", terms=None, backend=None)`:
/// - `terms` / `backend` configure the `zeta` / `eta` engines of the
///   namespace (defaults 128 and `"vectorized"`).
///
/// Notes
/// -----
/// - `derivative()` / `antiderivative()` return new objects; the receiver is
///   unchanged.
/// - Passing `params=None` evaluates with `default_values`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "complex_graph.functions")]
pub struct ComplexFunction {
    inner: CompiledFunction,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ComplexFunction {
    #[new]
    #[pyo3(signature = (expression, main_variable = "z", terms = None, backend = None))]
    pub fn new(
        expression: &str, main_variable: &str, terms: Option<usize>, backend: Option<&str>,
    ) -> PyResult<ComplexFunction> {
        let series = extract_series_options(terms, backend)?;
        let compiler = FunctionCompiler::new(CompilerOptions::new(series, discard_logger()))?;
        Ok(ComplexFunction { inner: compiler.compile(expression, main_variable)? })
    }

    #[pyo3(signature = (z, params = None))]
    pub fn __call__<'py>(
        &self, py: Python<'py>, z: &Bound<'py, PyAny>, params: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<Bound<'py, PyArray1<Complex64>>> {
        let z = extract_complex_array(z)?;
        let params = extract_params(params)?;
        Ok(self.inner.call(z.view(), &params)?.into_pyarray(py))
    }

    /// `(horizontal_lines, vertical_lines, boundaries)` of the mapped grid.
    #[pyo3(signature = (grid, params = None))]
    #[allow(clippy::type_complexity)]
    pub fn map_grid<'py>(
        &self, py: Python<'py>, grid: &ComplexGrid, params: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<(
        Bound<'py, PyArray1<Complex64>>,
        Bound<'py, PyArray1<Complex64>>,
        Vec<Bound<'py, PyArray1<Complex64>>>,
    )> {
        let params = extract_params(params)?;
        let mapped = self.inner.map_grid(&grid.inner, &params)?;
        let boundaries = mapped.boundaries.into_iter().map(|b| b.into_pyarray(py)).collect();
        Ok((mapped.horizontal_lines.into_pyarray(py), mapped.vertical_lines.into_pyarray(py), boundaries))
    }

    /// Imaginary parts `t` of zeros on `Re s = 1/2` for `t_start <= t <= t_end`.
    #[pyo3(signature = (t_start, t_end, n_points = 2000, params = None))]
    pub fn critical_line_zeros<'py>(
        &self, t_start: f64, t_end: f64, n_points: usize, params: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<Vec<f64>> {
        let params = extract_params(params)?;
        let path = ParametricPath::critical_line(t_start, t_end, n_points)?;
        Ok(self.inner.zeros_along(&path, &params, &ZeroSearchOptions::default())?)
    }

    pub fn derivative(&self) -> PyResult<ComplexFunction> {
        Ok(ComplexFunction { inner: self.inner.derivative()? })
    }

    pub fn antiderivative(&self) -> PyResult<ComplexFunction> {
        Ok(ComplexFunction { inner: self.inner.antiderivative()? })
    }

    #[getter]
    pub fn symbols(&self) -> Vec<String> {
        self.inner.symbols()
    }

    #[getter]
    pub fn parameters(&self) -> Vec<String> {
        self.inner.parameters().to_vec()
    }

    /// `{parameter: default}` in parameter order.
    #[getter]
    pub fn default_values<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        for (name, value) in self.inner.default_table() {
            dict.set_item(name, value)?;
        }
        Ok(dict)
    }

    #[getter]
    pub fn display(&self) -> String {
        self.inner.display().to_string()
    }

    #[getter]
    pub fn latex(&self) -> String {
        self.inner.latex().to_string()
    }

    #[getter]
    pub fn backend(&self) -> &'static str {
        self.inner.backend().name()
    }

    pub fn toggle_backend(&mut self) {
        self.inner = self.inner.with_backend(self.inner.backend().toggled());
    }

    pub fn __repr__(&self) -> String {
        format!("ComplexFunction('{}')", self.inner)
    }
}

/// Zeta — Python-facing wrapper for the [`ZetaFunction`] engine.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "complex_graph.functions")]
pub struct Zeta {
    inner: ZetaFunction,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Zeta {
    #[new]
    #[pyo3(signature = (terms = None, backend = None))]
    pub fn new(terms: Option<usize>, backend: Option<&str>) -> PyResult<Zeta> {
        Ok(Zeta { inner: ZetaFunction::new(extract_series_options(terms, backend)?)? })
    }

    pub fn __call__<'py>(
        &self, py: Python<'py>, s: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray1<Complex64>>> {
        let s = extract_complex_array(s)?;
        Ok(self.inner.call(s.view()).into_pyarray(py))
    }

    #[getter]
    pub fn backend(&self) -> &'static str {
        self.inner.backend().name()
    }

    #[getter]
    pub fn terms(&self) -> usize {
        self.inner.terms()
    }

    pub fn toggle_backend(&mut self) {
        self.inner.toggle_backend();
    }
}

/// Eta — Python-facing wrapper for the [`EtaFunction`] engine.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "complex_graph.functions")]
pub struct Eta {
    inner: EtaFunction,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Eta {
    #[new]
    #[pyo3(signature = (terms = None, backend = None))]
    pub fn new(terms: Option<usize>, backend: Option<&str>) -> PyResult<Eta> {
        Ok(Eta { inner: EtaFunction::new(extract_series_options(terms, backend)?)? })
    }

    pub fn __call__<'py>(
        &self, py: Python<'py>, s: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray1<Complex64>>> {
        let s = extract_complex_array(s)?;
        Ok(self.inner.call(s.view()).into_pyarray(py))
    }

    #[getter]
    pub fn backend(&self) -> &'static str {
        self.inner.backend().name()
    }

    #[getter]
    pub fn terms(&self) -> usize {
        self.inner.terms()
    }

    pub fn toggle_backend(&mut self) {
        self.inner.toggle_backend();
    }
}

/// `(name, expression, view)` for every built-in preset.
#[cfg(feature = "python-bindings")]
#[pyfunction]
pub fn presets() -> Vec<(&'static str, &'static str, &'static str)> {
    PRESETS
        .iter()
        .map(|p| {
            let view = match p.view {
                crate::expression::PresetView::Default => "default",
                crate::expression::PresetView::Zeta => "zeta",
            };
            (p.name, p.expression, view)
        })
        .collect()
}

/// _complex_graph — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_complex_graph` module, attach the `grid` and `functions`
/// submodules, and register them in `sys.modules` so dotted imports work.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _complex_graph<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let grid_mod = PyModule::new(_py, "grid")?;
    let functions_mod = PyModule::new(_py, "functions")?;
    grid_module(_py, m, &grid_mod)?;
    functions_module(_py, m, &functions_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("complex_graph.grid", grid_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("complex_graph.functions", functions_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn grid_module<'py>(
    _py: Python, complex_graph: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<ComplexGrid>()?;
    complex_graph.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn functions_module<'py>(
    _py: Python, complex_graph: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<ComplexFunction>()?;
    m.add_class::<Zeta>()?;
    m.add_class::<Eta>()?;
    m.add_function(wrap_pyfunction!(presets, m)?)?;
    complex_graph.add_submodule(m)?;
    Ok(())
}
