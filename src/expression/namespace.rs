//! expression::namespace — the fixed table behind named calls.
//!
//! Purpose
//! -------
//! Resolve every [`Func`] of a compiled expression to a numeric
//! implementation. Elementary functions come from `num_complex`, the
//! special functions from [`crate::special`], and `zeta` / `eta` from two
//! series engines owned here that share one coefficient table.
//!
//! Key behaviors
//! -------------
//! - `zeta` / `eta` over an array are single vectorized engine calls; every
//!   other function is applied element-wise.
//! - `abs`, `re`, `im` and `arg` return real values embedded in `Complex64`.
//! - `cot`, `sec`, `csc` are reciprocals of `tan`, `cos`, `sin`.
//!
//! Conventions
//! -----------
//! - A namespace is cheap to clone; clones share the coefficient table.
use std::sync::Arc;

use num_complex::Complex64;

use super::{ast::Func, compile::Value};
use crate::special::{
    digamma, erf, gamma, lambert_w, sinc, Backend, EtaFunction, SeriesOptions, SeriesResult,
    ZetaFunction,
};

/// Engines and dispatch for named calls.
#[derive(Debug, Clone)]
pub struct FunctionNamespace {
    zeta: ZetaFunction,
    eta: EtaFunction,
}

impl FunctionNamespace {
    /// Build one coefficient table and both engines over it.
    ///
    /// # Errors
    /// [`SeriesError`](crate::special::SeriesError) for an unsupported term
    /// count.
    pub fn new(options: SeriesOptions) -> SeriesResult<Self> {
        let logger = options.logger.clone();
        let zeta = ZetaFunction::new(options)?;
        let eta = EtaFunction::from_coefficients(Arc::clone(zeta.coefficients()), zeta.backend(), logger);
        Ok(FunctionNamespace { zeta, eta })
    }

    pub fn from_engines(zeta: ZetaFunction, eta: EtaFunction) -> Self {
        FunctionNamespace { zeta, eta }
    }

    /// Same tables, both engines switched to `backend`.
    pub fn with_backend(&self, backend: Backend) -> Self {
        FunctionNamespace { zeta: self.zeta.with_backend(backend), eta: self.eta.with_backend(backend) }
    }

    pub fn backend(&self) -> Backend {
        self.zeta.backend()
    }

    pub fn zeta(&self) -> &ZetaFunction {
        &self.zeta
    }

    pub fn eta(&self) -> &EtaFunction {
        &self.eta
    }

    /// `func(z)` for a single point.
    pub fn eval(&self, func: Func, z: Complex64) -> Complex64 {
        match func {
            Func::Zeta => self.zeta.eval(z),
            Func::Eta => self.eta.eval(z),
            _ => elementary(func, z),
        }
    }

    pub fn apply(&self, func: Func, value: Value) -> Value {
        match value {
            Value::Scalar(z) => Value::Scalar(self.eval(func, z)),
            Value::Array(a) => Value::Array(match func {
                Func::Zeta => self.zeta.call(a.view()),
                Func::Eta => self.eta.call(a.view()),
                _ => a.mapv_into(|z| elementary(func, z)),
            }),
        }
    }
}

fn real(v: f64) -> Complex64 {
    Complex64::new(v, 0.0)
}

fn elementary(func: Func, z: Complex64) -> Complex64 {
    match func {
        Func::Sin => z.sin(),
        Func::Cos => z.cos(),
        Func::Tan => z.tan(),
        Func::Cot => z.cos() / z.sin(),
        Func::Sec => z.cos().inv(),
        Func::Csc => z.sin().inv(),
        Func::Asin => z.asin(),
        Func::Acos => z.acos(),
        Func::Atan => z.atan(),
        Func::Sinh => z.sinh(),
        Func::Cosh => z.cosh(),
        Func::Tanh => z.tanh(),
        Func::Asinh => z.asinh(),
        Func::Acosh => z.acosh(),
        Func::Atanh => z.atanh(),
        Func::Exp => z.exp(),
        Func::Log => z.ln(),
        Func::Sqrt => z.sqrt(),
        Func::Abs => real(z.norm()),
        Func::Re => real(z.re),
        Func::Im => real(z.im),
        Func::Conjugate => z.conj(),
        Func::Arg => real(z.arg()),
        Func::Gamma => gamma(z),
        Func::Erf => erf(z),
        Func::Digamma => digamma(z),
        Func::LambertW => lambert_w(z),
        Func::Sinc => sinc(z),
        // engine-backed; reached only through FunctionNamespace::eval
        Func::Zeta | Func::Eta => real(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::special::DEFAULT_SERIES_TERMS;
    use ndarray::array;

    fn namespace() -> FunctionNamespace {
        FunctionNamespace::new(SeriesOptions::default()).unwrap()
    }

    fn assert_close(a: Complex64, b: Complex64) {
        assert!((a - b).norm() < 1e-12 * b.norm().max(1.0), "{a} vs {b}");
    }

    #[test]
    fn reciprocal_trig_and_real_valued_functions() {
        let ns = namespace();
        let z = Complex64::new(0.7, -0.4);
        assert_close(ns.eval(Func::Cot, z), z.tan().inv());
        assert_close(ns.eval(Func::Sec, z) * z.cos(), real(1.0));
        assert_close(ns.eval(Func::Csc, z) * z.sin(), real(1.0));
        assert_eq!(ns.eval(Func::Abs, Complex64::new(3.0, 4.0)), real(5.0));
        assert_eq!(ns.eval(Func::Re, z), real(0.7));
        assert_eq!(ns.eval(Func::Im, z), real(-0.4));
        assert_eq!(ns.eval(Func::Conjugate, z), z.conj());
    }

    #[test]
    // Purpose
    // -------
    // Array application of zeta/eta goes through the engines and agrees
    // with point evaluation; both engines share one table.
    fn engines_share_a_table_and_agree_pointwise() {
        let ns = namespace();
        assert_eq!(ns.zeta().terms(), DEFAULT_SERIES_TERMS);
        assert!(Arc::ptr_eq(ns.zeta().coefficients(), ns.eta().coefficients()));

        let s = array![Complex64::new(2.0, 0.0), Complex64::new(0.5, 14.0), Complex64::new(-1.5, 3.0)];
        let Value::Array(out) = ns.apply(Func::Zeta, Value::Array(s.clone())) else {
            panic!("array in, array out");
        };
        for (o, &si) in out.iter().zip(s.iter()) {
            assert_close(*o, ns.eval(Func::Zeta, si));
        }

        let switched = ns.with_backend(Backend::Reference);
        assert_eq!(switched.backend(), Backend::Reference);
        assert!(Arc::ptr_eq(switched.eta().coefficients(), ns.eta().coefficients()));
    }

    #[test]
    fn elementwise_functions_map_over_arrays() {
        let ns = namespace();
        let z = array![Complex64::new(0.0, 0.0), Complex64::new(1.0, 1.0)];
        let Value::Array(out) = ns.apply(Func::Sinc, Value::Array(z)) else {
            panic!("array in, array out");
        };
        assert_eq!(out[0], real(1.0));
        assert_close(out[1], sinc(Complex64::new(1.0, 1.0)));
    }
}
