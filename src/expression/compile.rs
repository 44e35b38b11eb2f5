//! expression::compile — vectorized stack-machine evaluator.
//!
//! Purpose
//! -------
//! Turn an [`Expr`] into a flat postfix [`Program`] over an ordered symbol
//! list, and run it over complex arrays without re-walking the tree.
//!
//! Key behaviors
//! -------------
//! - Each symbol becomes a `Load(index)` into the evaluation inputs, so the
//!   symbol order fixed at compile time is the call signature.
//! - Values are [`Value::Scalar`] or [`Value::Array`]; binary operations
//!   broadcast scalars against arrays, so parameter-only subexpressions are
//!   computed once.
//! - Integer exponents compile to `PowI` (repeated multiplication), which
//!   is exact for small powers and well defined at `0`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All array inputs of one evaluation have the same length.
//! - Singular points propagate as inf/NaN; evaluation never fails.
use ndarray::Array1;
use num_complex::Complex64;

use super::{
    ast::{BinaryOp, Constant, Expr, Func, UnaryOp},
    errors::{ExprError, ExprResult},
    namespace::FunctionNamespace,
};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const MAX_POWI: f64 = 64.0;

#[derive(Debug, Clone, PartialEq)]
enum Instr {
    Const(Complex64),
    Load(usize),
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    PowI(i32),
    Call(Func),
}

/// Broadcastable evaluation value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Complex64),
    Array(Array1<Complex64>),
}

impl Value {
    fn map(self, f: impl Fn(Complex64) -> Complex64) -> Value {
        match self {
            Value::Scalar(a) => Value::Scalar(f(a)),
            Value::Array(a) => Value::Array(a.mapv_into(f)),
        }
    }

    fn zip_with(self, rhs: Value, f: impl Fn(Complex64, Complex64) -> Complex64) -> Value {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f(a, b)),
            (Value::Array(a), Value::Scalar(b)) => Value::Array(a.mapv_into(|x| f(x, b))),
            (Value::Scalar(a), Value::Array(b)) => Value::Array(b.mapv_into(|y| f(a, y))),
            (Value::Array(mut a), Value::Array(b)) => {
                a.zip_mut_with(&b, |x, &y| *x = f(*x, y));
                Value::Array(a)
            }
        }
    }

    /// Owned array of length `len`, broadcasting a scalar.
    pub fn into_array(self, len: usize) -> Array1<Complex64> {
        match self {
            Value::Scalar(v) => Array1::from_elem(len, v),
            Value::Array(a) => a,
        }
    }
}

fn constant_value(c: Constant) -> Complex64 {
    match c {
        Constant::Pi => Complex64::new(std::f64::consts::PI, 0.0),
        Constant::E => Complex64::new(std::f64::consts::E, 0.0),
        Constant::I => Complex64::new(0.0, 1.0),
    }
}

/// Complex power with `0^w` defined as `1` (`w = 0`), `0` (`Re w > 0`) or
/// infinite otherwise.
pub(crate) fn cpow(base: Complex64, exponent: Complex64) -> Complex64 {
    if base == ZERO {
        if exponent == ZERO {
            return ONE;
        }
        if exponent.re > 0.0 {
            return ZERO;
        }
        return Complex64::new(f64::INFINITY, 0.0);
    }
    base.powc(exponent)
}

fn cpowi(base: Complex64, n: i32) -> Complex64 {
    if n >= 0 {
        base.powi(n)
    } else {
        ONE / base.powi(-n)
    }
}

/// Compiled postfix program.
#[derive(Debug, Clone)]
pub struct Program {
    code: Vec<Instr>,
    arity: usize,
}

impl Program {
    /// Compile `expr` with inputs bound to `symbols` by position.
    ///
    /// # Errors
    /// [`ExprError::VariableNotFound`] when `expr` uses a symbol missing
    /// from `symbols`.
    pub fn compile(expr: &Expr, symbols: &[String]) -> ExprResult<Program> {
        let mut code = Vec::new();
        emit(expr, expr, symbols, &mut code)?;
        Ok(Program { code, arity: symbols.len() })
    }

    /// Number of inputs expected by [`Program::eval`].
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Run the program; inputs are matched to the compile-time symbols by
    /// position.
    pub fn eval(&self, inputs: &[Value], namespace: &FunctionNamespace) -> Value {
        let nan = || Value::Scalar(Complex64::new(f64::NAN, f64::NAN));
        let mut stack: Vec<Value> = Vec::with_capacity(8);
        for instr in &self.code {
            let value = match instr {
                Instr::Const(c) => Value::Scalar(*c),
                Instr::Load(i) => inputs.get(*i).cloned().unwrap_or_else(nan),
                Instr::Neg => stack.pop().unwrap_or_else(nan).map(|z| -z),
                Instr::PowI(n) => {
                    let n = *n;
                    stack.pop().unwrap_or_else(nan).map(|z| cpowi(z, n))
                }
                Instr::Call(func) => namespace.apply(*func, stack.pop().unwrap_or_else(nan)),
                Instr::Add | Instr::Sub | Instr::Mul | Instr::Div | Instr::Pow => {
                    let rhs = stack.pop().unwrap_or_else(nan);
                    let lhs = stack.pop().unwrap_or_else(nan);
                    match instr {
                        Instr::Add => lhs.zip_with(rhs, |a, b| a + b),
                        Instr::Sub => lhs.zip_with(rhs, |a, b| a - b),
                        Instr::Mul => lhs.zip_with(rhs, |a, b| a * b),
                        Instr::Div => lhs.zip_with(rhs, |a, b| a / b),
                        _ => lhs.zip_with(rhs, cpow),
                    }
                }
            };
            stack.push(value);
        }
        stack.pop().unwrap_or_else(nan)
    }
}

fn emit(node: &Expr, root: &Expr, symbols: &[String], code: &mut Vec<Instr>) -> ExprResult<()> {
    match node {
        Expr::Num(v) => code.push(Instr::Const(Complex64::new(*v, 0.0))),
        Expr::Const(c) => code.push(Instr::Const(constant_value(*c))),
        Expr::Sym(name) => {
            let index = symbols.iter().position(|s| s == name).ok_or_else(|| {
                ExprError::VariableNotFound { variable: name.clone(), expression: root.to_string() }
            })?;
            code.push(Instr::Load(index));
        }
        Expr::Unary(UnaryOp::Neg, inner) => {
            emit(inner, root, symbols, code)?;
            code.push(Instr::Neg);
        }
        Expr::Binary(BinaryOp::Pow, base, exponent)
            if matches!(exponent.as_ref(), Expr::Num(n) if n.fract() == 0.0 && n.abs() <= MAX_POWI) =>
        {
            emit(base, root, symbols, code)?;
            if let Expr::Num(n) = exponent.as_ref() {
                code.push(Instr::PowI(*n as i32));
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            emit(lhs, root, symbols, code)?;
            emit(rhs, root, symbols, code)?;
            code.push(match op {
                BinaryOp::Add => Instr::Add,
                BinaryOp::Sub => Instr::Sub,
                BinaryOp::Mul => Instr::Mul,
                BinaryOp::Div => Instr::Div,
                BinaryOp::Pow => Instr::Pow,
            });
        }
        Expr::Call(func, args) => {
            for a in args {
                emit(a, root, symbols, code)?;
            }
            code.push(Instr::Call(*func));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parser::parse;
    use crate::special::SeriesOptions;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn run(src: &str, symbols: &[&str], inputs: &[Value]) -> Value {
        let ns = FunctionNamespace::new(SeriesOptions::default()).unwrap();
        let symbols: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        Program::compile(&parse(src).unwrap(), &symbols).unwrap().eval(inputs, &ns)
    }

    #[test]
    // Purpose
    // -------
    // Scalar parameters broadcast against the array input and operator
    // semantics match direct complex arithmetic.
    fn broadcasting_arithmetic() {
        let z = array![c(0.0, 0.0), c(1.0, 2.0), c(-3.0, 0.5)];
        let out = run("a*z**2 - z/w + I", &["z", "a", "w"], &[
            Value::Array(z.clone()),
            Value::Scalar(c(2.0, 0.0)),
            Value::Scalar(c(0.0, 1.0)),
        ])
        .into_array(3);
        for (o, &zi) in out.iter().zip(z.iter()) {
            let want = 2.0 * zi * zi - zi / c(0.0, 1.0) + c(0.0, 1.0);
            assert!((o - want).norm() < 1e-12);
        }
    }

    #[test]
    fn parameter_only_expression_broadcasts_on_output() {
        let out = run("pi*k", &["z", "k"], &[Value::Array(Array1::zeros(4)), Value::Scalar(c(2.0, 0.0))]);
        assert_eq!(out, Value::Scalar(c(2.0 * std::f64::consts::PI, 0.0)));
        assert_eq!(out.into_array(4).len(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Powers and poles at the origin follow IEEE semantics instead of
    // failing the batch.
    fn zero_base_powers_and_poles() {
        assert_eq!(cpow(ZERO, c(0.5, 0.0)), ZERO);
        assert_eq!(cpow(ZERO, ZERO), ONE);
        assert!(!cpow(ZERO, c(-1.0, 0.0)).is_finite());

        let z = array![c(0.0, 0.0), c(2.0, 0.0)];
        let out = run("1/z + z**2", &["z"], &[Value::Array(z)]).into_array(2);
        assert!(!out[0].is_finite());
        assert!((out[1] - c(4.5, 0.0)).norm() < 1e-15);
    }

    #[test]
    fn unknown_symbol_fails_compilation() {
        let err = Program::compile(&parse("a*z").unwrap(), &["z".to_string()]).unwrap_err();
        assert!(matches!(err, ExprError::VariableNotFound { variable, .. } if variable == "a"));
    }

    #[test]
    fn calls_dispatch_through_namespace() {
        let out = run("zeta(2*z)", &["z"], &[Value::Scalar(c(1.0, 0.0))]);
        let Value::Scalar(v) = out else { panic!("scalar in, scalar out") };
        assert!((v.re - std::f64::consts::PI.powi(2) / 6.0).abs() < 1e-9);
    }
}
