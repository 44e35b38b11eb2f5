//! special — analytic continuation of ζ/η and complex special functions.
//!
//! Purpose
//! -------
//! Host the numerical engine behind the `zeta(...)` and `eta(...)` calls of
//! compiled expressions, plus the complex special functions the expression
//! namespace needs (`gamma`, `erf`, `digamma`, `lambertw`, `sinc`).
//!
//! Key behaviors
//! -------------
//! - [`SeriesCoefficients`] is the O(n²) table built once per term count.
//! - [`EtaFunction`] / [`ZetaFunction`] evaluate over complex arrays in
//!   O(n · |s|) using only that table; they may share it through `Arc`.
//! - [`Backend`] selects the evaluation strategy at runtime; a missing
//!   accelerated backend degrades to a slower one with identical results.
//! - [`SeriesError`] is the only failure mode (unsupported term counts).
//!
//! Conventions
//! -----------
//! - Inputs are `ArrayView1<Complex64>`, outputs owned `Array1<Complex64>`.
//! - Singular elements (e.g. `ζ(1)`) come back as inf/NaN, never as errors.

pub mod backend;
pub mod coefficients;
pub mod errors;
pub mod functions;
pub mod zeta;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::backend::Backend;
pub use self::coefficients::{SeriesCoefficients, MAX_SERIES_TERMS};
pub use self::errors::{SeriesError, SeriesResult};
pub use self::functions::{digamma, erf, gamma, lambert_w, sinc};
pub use self::zeta::{EtaFunction, SeriesOptions, ZetaFunction, DEFAULT_SERIES_TERMS};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        Backend, EtaFunction, SeriesCoefficients, SeriesError, SeriesOptions, SeriesResult,
        ZetaFunction,
    };
}
