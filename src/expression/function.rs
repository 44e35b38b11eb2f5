//! expression::function — FunctionCompiler and CompiledFunction.
//!
//! Purpose
//! -------
//! Turn a user expression string plus a designated main variable into a
//! vectorized callable `f(z; p₁, …, pₙ)` with inferred parameters, display
//! strings and slider defaults.
//!
//! Key behaviors
//! -------------
//! - [`FunctionCompiler::compile`] parses the source, checks the main
//!   variable, records every other free symbol as a parameter (first
//!   occurrence order), renders plain and LaTeX display strings, computes
//!   one default per parameter via
//!   [`multiplies_var`](super::heuristics::multiplies_var) and compiles the
//!   evaluator.
//! - [`CompiledFunction::call`] evaluates over a complex array; an empty
//!   parameter slice means "use the defaults".
//! - [`CompiledFunction::derivative`] / [`CompiledFunction::antiderivative`]
//!   return a new function over the same main variable and parameter list;
//!   the receiver is left untouched.
//!
//! Invariants & assumptions
//! ------------------------
//! - A `CompiledFunction` always contains its main variable; construction
//!   fails with [`ExprError::VariableNotFound`] otherwise and nothing
//!   partial is returned.
//! - The parameter list never changes across derivative/antiderivative,
//!   even if a parameter disappears from the new expression.
//! - All clones share the zeta/eta coefficient table of the compiler.
//!
//! Downstream usage
//! ----------------
//! - The presentation layer builds one [`FunctionCompiler`] and calls
//!   `compile` whenever the user submits a new expression, keeping the
//!   previous function on error.
//! - `map_grid` is the per-frame call: one evaluation per grid sequence.
use std::fmt;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;
use slog::{debug, Logger};

use super::{
    algebra::Form,
    ast::{Constant, Expr, Func},
    calculus,
    compile::{Program, Value},
    errors::{ExprError, ExprResult},
    heuristics::default_value,
    latex::to_latex,
    namespace::FunctionNamespace,
    parser::parse,
};
use crate::{
    grid::{find_zeros, ComplexGridArray, MappedGrid, ParametricPath, ZeroSearchOptions},
    logging::discard_logger,
    special::{Backend, SeriesOptions},
};

/// Options for [`FunctionCompiler::new`].
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Term count and backend of the `zeta` / `eta` engines.
    pub series: SeriesOptions,
    pub logger: Logger,
}

impl CompilerOptions {
    pub fn new(series: SeriesOptions, logger: Logger) -> Self {
        CompilerOptions { series, logger }
    }
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions { series: SeriesOptions::default(), logger: discard_logger() }
    }
}

fn validate_main_variable(name: &str) -> ExprResult<()> {
    let mut chars = name.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let reserved = Constant::from_ident(name).is_some() || Func::from_ident(name).is_some();
    if starts_ok && rest_ok && !reserved {
        Ok(())
    } else {
        Err(ExprError::InvalidVariable { name: name.to_string() })
    }
}

/// Builds [`CompiledFunction`]s over one shared function namespace.
#[derive(Debug, Clone)]
pub struct FunctionCompiler {
    namespace: FunctionNamespace,
    logger: Logger,
}

impl FunctionCompiler {
    /// # Errors
    /// [`ExprError::Series`] when the zeta/eta engines cannot be built.
    pub fn new(options: CompilerOptions) -> ExprResult<Self> {
        let namespace = FunctionNamespace::new(options.series)?;
        Ok(FunctionCompiler { namespace, logger: options.logger })
    }

    pub fn from_namespace(namespace: FunctionNamespace, logger: Logger) -> Self {
        FunctionCompiler { namespace, logger }
    }

    pub fn namespace(&self) -> &FunctionNamespace {
        &self.namespace
    }

    /// Compile `source` as a function of `main`.
    ///
    /// # Errors
    /// - [`ExprError::InvalidVariable`] if `main` is not a plain symbol name.
    /// - [`ExprError::Parse`], [`ExprError::UnknownFunction`],
    ///   [`ExprError::Arity`] for malformed sources.
    /// - [`ExprError::VariableNotFound`] if `main` does not occur in the
    ///   parsed expression.
    pub fn compile(&self, source: &str, main: &str) -> ExprResult<CompiledFunction> {
        validate_main_variable(main)?;
        let expr = parse(source)?;
        let symbols = expr.free_symbols();
        if !symbols.iter().any(|s| s == main) {
            return Err(ExprError::VariableNotFound {
                variable: main.to_string(),
                expression: source.trim().to_string(),
            });
        }
        let parameters: Vec<String> = symbols.into_iter().filter(|s| s != main).collect();
        let function = CompiledFunction::build(
            source.trim().to_string(),
            main.to_string(),
            parameters,
            expr,
            self.namespace.clone(),
        )?;
        debug!(self.logger, "compiled expression";
            "source" => function.source(), "main" => main,
            "parameters" => function.parameters.join(","), "display" => function.display());
        Ok(function)
    }
}

/// Vectorized callable compiled from an expression.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    source: String,
    main: String,
    parameters: Vec<String>,
    expr: Expr,
    form: Form,
    display: String,
    latex: String,
    defaults: Vec<f64>,
    program: Program,
    namespace: FunctionNamespace,
}

impl CompiledFunction {
    fn build(
        source: String, main: String, parameters: Vec<String>, expr: Expr, namespace: FunctionNamespace,
    ) -> ExprResult<Self> {
        let form = Form::from_expr(&expr);
        let defaults = parameters.iter().map(|p| default_value(&main, p, &form)).collect();
        let mut symbols = Vec::with_capacity(parameters.len() + 1);
        symbols.push(main.clone());
        symbols.extend(parameters.iter().cloned());
        let program = Program::compile(&expr, &symbols)?;
        Ok(CompiledFunction {
            source,
            main,
            parameters,
            display: expr.to_string(),
            latex: to_latex(&expr),
            expr,
            form,
            defaults,
            program,
            namespace,
        })
    }

    /// Same variables, new symbolic body.
    fn rebuild(&self, form: Form) -> ExprResult<Self> {
        let expr = form.to_expr();
        CompiledFunction::build(
            expr.to_string(),
            self.main.clone(),
            self.parameters.clone(),
            expr,
            self.namespace.clone(),
        )
    }

    /// Text this function was built from (the rendered expression for
    /// derived functions).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn main_variable(&self) -> &str {
        &self.main
    }

    /// Parameter symbols in first-occurrence order, main variable excluded.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Main variable followed by the parameters; the evaluator signature.
    pub fn symbols(&self) -> Vec<String> {
        std::iter::once(self.main.clone()).chain(self.parameters.iter().cloned()).collect()
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn latex(&self) -> &str {
        &self.latex
    }

    /// Default value per parameter, in parameter order.
    pub fn default_values(&self) -> &[f64] {
        &self.defaults
    }

    pub fn default_value(&self, name: &str) -> Option<f64> {
        self.parameters.iter().position(|p| p == name).map(|i| self.defaults[i])
    }

    /// `(name, default)` pairs in parameter order.
    pub fn default_table(&self) -> Vec<(&str, f64)> {
        self.parameters.iter().map(String::as_str).zip(self.defaults.iter().copied()).collect()
    }

    pub fn backend(&self) -> Backend {
        self.namespace.backend()
    }

    fn inputs(&self, z: Value, params: &[Complex64]) -> ExprResult<Vec<Value>> {
        let mut inputs = Vec::with_capacity(self.parameters.len() + 1);
        inputs.push(z);
        if params.is_empty() {
            inputs.extend(self.defaults.iter().map(|&d| Value::Scalar(Complex64::new(d, 0.0))));
        } else if params.len() == self.parameters.len() {
            inputs.extend(params.iter().map(|&p| Value::Scalar(p)));
        } else {
            return Err(ExprError::ParameterCount { expected: self.parameters.len(), got: params.len() });
        }
        Ok(inputs)
    }

    /// Evaluate over `z`; empty `params` uses [`Self::default_values`].
    ///
    /// # Errors
    /// [`ExprError::ParameterCount`] for a non-empty `params` of the wrong
    /// length. Poles are not errors; they yield non-finite elements.
    pub fn call(&self, z: ArrayView1<'_, Complex64>, params: &[Complex64]) -> ExprResult<Array1<Complex64>> {
        let inputs = self.inputs(Value::Array(z.to_owned()), params)?;
        Ok(self.program.eval(&inputs, &self.namespace).into_array(z.len()))
    }

    pub fn eval(&self, z: Complex64, params: &[Complex64]) -> ExprResult<Complex64> {
        let inputs = self.inputs(Value::Scalar(z), params)?;
        Ok(match self.program.eval(&inputs, &self.namespace) {
            Value::Scalar(v) => v,
            Value::Array(a) => a.get(0).copied().unwrap_or(Complex64::new(f64::NAN, f64::NAN)),
        })
    }

    /// Image of every sequence of `grid`.
    pub fn map_grid(&self, grid: &ComplexGridArray, params: &[Complex64]) -> ExprResult<MappedGrid> {
        grid.map_with(|points| self.call(points, params))
    }

    /// Parameter values along `path` where this function vanishes.
    pub fn zeros_along(
        &self, path: &ParametricPath, params: &[Complex64], options: &ZeroSearchOptions,
    ) -> ExprResult<Vec<f64>> {
        find_zeros(path, |points| self.call(points, params), options)
    }

    /// # Errors
    /// [`ExprError::NoClosedForm`] when a call without a symbolic derivative
    /// depends on the main variable.
    pub fn derivative(&self) -> ExprResult<CompiledFunction> {
        self.rebuild(calculus::derivative(&self.form, &self.main)?)
    }

    /// # Errors
    /// [`ExprError::NoClosedForm`] outside the supported integration rules.
    pub fn antiderivative(&self) -> ExprResult<CompiledFunction> {
        self.rebuild(calculus::antiderivative(&self.form, &self.main)?)
    }

    /// Same function evaluated with `backend` for `zeta` / `eta`.
    pub fn with_backend(&self, backend: Backend) -> CompiledFunction {
        CompiledFunction { namespace: self.namespace.with_backend(backend), ..self.clone() }
    }
}

impl fmt::Display for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn compiler() -> FunctionCompiler {
        FunctionCompiler::new(CompilerOptions::default()).unwrap()
    }

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    // Purpose
    // -------
    // Parameters come out in first-occurrence order and evaluation binds
    // them positionally.
    //
    // Given
    // -----
    // a*sin(w*z) with a = 2, w = 3.
    //
    // Expect
    // ------
    // parameters = [a, w]; f(0) = 0; f(π/6) = 2 sin(π/2) = 2.
    fn parameters_in_first_occurrence_order() {
        let f = compiler().compile("a*sin(w*z)", "z").unwrap();
        assert_eq!(f.parameters(), ["a", "w"]);
        assert_eq!(f.symbols(), vec!["z", "a", "w"]);
        let params = [c(2.0, 0.0), c(3.0, 0.0)];
        assert_eq!(f.eval(c(0.0, 0.0), &params).unwrap(), c(0.0, 0.0));
        let v = f.eval(c(std::f64::consts::PI / 6.0, 0.0), &params).unwrap();
        assert_abs_diff_eq!(v.re, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_or_invalid_main_variable_fails() {
        let comp = compiler();
        assert!(matches!(
            comp.compile("a*sin(w*x)", "z"),
            Err(ExprError::VariableNotFound { variable, .. }) if variable == "z"
        ));
        for bad in ["", "2z", "pi", "sin", "z w"] {
            assert!(matches!(comp.compile("z", bad), Err(ExprError::InvalidVariable { .. })), "{bad}");
        }
        assert!(matches!(comp.compile("z +", "z"), Err(ExprError::Parse(_))));
    }

    #[test]
    fn empty_params_use_defaults_and_wrong_count_fails() {
        let f = compiler().compile("w/(z - a)", "z").unwrap();
        assert_eq!(f.default_values(), [1.0, 0.0]);
        assert_eq!(f.default_value("a"), Some(0.0));
        assert_eq!(f.default_value("q"), None);
        assert_eq!(f.default_table(), vec![("w", 1.0), ("a", 0.0)]);

        let z = array![c(2.0, 0.0), c(0.0, 4.0)];
        let out = f.call(z.view(), &[]).unwrap();
        assert_abs_diff_eq!(out[0].re, 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(out[1].im, -0.25, epsilon = 1e-15);
        assert!(matches!(
            f.call(z.view(), &[c(1.0, 0.0)]),
            Err(ExprError::ParameterCount { expected: 2, got: 1 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // derivative() returns a new function matching the analytic derivative
    // while the original stays untouched and the parameter list is kept.
    fn derivative_returns_new_function() {
        let f = compiler().compile("z**2", "z").unwrap();
        let df = f.derivative().unwrap();
        assert_eq!(f.display(), "z**2");
        assert_eq!(df.display(), "2*z");
        let z = array![c(1.0, 2.0), c(-0.5, 0.0), c(3.0, -1.0)];
        let got = df.call(z.view(), &[]).unwrap();
        for (g, &zi) in got.iter().zip(z.iter()) {
            assert!((g - 2.0 * zi).norm() < 1e-12);
        }

        let g = compiler().compile("k*z + w", "z").unwrap();
        let dg = g.derivative().unwrap();
        assert_eq!(dg.parameters(), ["k", "w"]);
        assert_eq!(dg.eval(c(5.0, 0.0), &[c(3.0, 0.0), c(9.0, 0.0)]).unwrap(), c(3.0, 0.0));
    }

    #[test]
    fn antiderivative_and_errors() {
        let f = compiler().compile("cos(z)", "z").unwrap();
        assert_eq!(f.antiderivative().unwrap().display(), "sin(z)");
        let zeta = compiler().compile("zeta(z)", "z").unwrap();
        assert!(matches!(zeta.derivative(), Err(ExprError::NoClosedForm { .. })));
        assert!(matches!(zeta.antiderivative(), Err(ExprError::NoClosedForm { .. })));
    }

    #[test]
    fn map_grid_covers_every_sequence() {
        let grid = ComplexGridArray::from_dimensions([-1.0, -1.0, 1.0, 1.0], 20, 4, 5).unwrap();
        let f = compiler().compile("2*z", "z").unwrap();
        let mapped = f.map_grid(&grid, &[]).unwrap();
        assert_eq!(mapped.horizontal_lines.len(), grid.horizontal_lines().len());
        assert_eq!(mapped.vertical_lines[3], 2.0 * grid.vertical_lines()[3]);
        for (m, b) in mapped.boundaries.iter().zip(grid.boundaries()) {
            assert_eq!(m.len(), b.len());
            assert_eq!(m[0], 2.0 * b[0]);
        }
    }

    #[test]
    fn backend_switch_keeps_values() {
        let f = compiler().compile("zeta(z)", "z").unwrap();
        let g = f.with_backend(Backend::Reference);
        assert_eq!(g.backend(), Backend::Reference);
        let s = c(0.5, 10.0);
        assert!((f.eval(s, &[]).unwrap() - g.eval(s, &[]).unwrap()).norm() < 1e-9);
        assert_eq!(f.latex(), "\\zeta{\\left(z \\right)}");
        assert_eq!(f.to_string(), "zeta(z)");
    }
}
