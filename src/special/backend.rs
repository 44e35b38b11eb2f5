//! special::backend — interchangeable strategies for the eta partial sum.
//!
//! Purpose
//! -------
//! Evaluate `Σ_{k<n} pm[k] · (k+1)^(-s)` elementwise over an array of `s`
//! from one shared [`SeriesCoefficients`] table. Every strategy implements
//! the same [`SeriesKernel`] contract, so engines can switch at runtime
//! without touching the table.
//!
//! Key behaviors
//! -------------
//! - [`Backend::Reference`]: per-element scalar loop using `powc`, the
//!   plain transcription of the series.
//! - [`Backend::Vectorized`]: coefficient-major loop that updates the whole
//!   output array per term, using the cached `ln(k+1)` table and
//!   `exp(-s·ln(k+1))`.
//! - [`Backend::Parallel`]: element-major loop split across threads via
//!   `ndarray`'s rayon integration (feature `parallel`). Without the feature
//!   it resolves to `Vectorized`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All strategies agree to round-off (≲ 1e-12 relative for moderate `s`).
//! - Kernels are stateless; the coefficient table is the only input besides
//!   `s`.
use ndarray::{Array1, ArrayView1, Zip};
use num_complex::Complex64;

use crate::special::coefficients::SeriesCoefficients;

/// Evaluation strategy for the eta partial sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    Reference,
    #[default]
    Vectorized,
    Parallel,
}

impl Backend {
    /// The backend that will actually run on this build.
    pub fn resolved(self) -> Backend {
        match self {
            Backend::Parallel if !cfg!(feature = "parallel") => Backend::Vectorized,
            other => other,
        }
    }

    /// Flip between the reference loop and the accelerated path.
    pub fn toggled(self) -> Backend {
        match self {
            Backend::Reference => Backend::Vectorized,
            Backend::Vectorized | Backend::Parallel => Backend::Reference,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Reference => "reference",
            Backend::Vectorized => "vectorized",
            Backend::Parallel => "parallel",
        }
    }

    pub(crate) fn kernel(self) -> &'static dyn SeriesKernel {
        match self.resolved() {
            Backend::Reference => &ReferenceKernel,
            Backend::Vectorized => &VectorizedKernel,
            Backend::Parallel => &ParallelKernel,
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" => Ok(Backend::Reference),
            "vectorized" => Ok(Backend::Vectorized),
            "parallel" => Ok(Backend::Parallel),
            other => Err(format!("Unknown series backend: {other}")),
        }
    }
}

/// `(coefficients, s) → Σ_k pm[k]·(k+1)^(-s)` for every element of `s`.
pub(crate) trait SeriesKernel: Send + Sync {
    fn eta_sum(&self, coefficients: &SeriesCoefficients, s: ArrayView1<'_, Complex64>)
        -> Array1<Complex64>;
}

struct ReferenceKernel;

impl SeriesKernel for ReferenceKernel {
    fn eta_sum(
        &self, coefficients: &SeriesCoefficients, s: ArrayView1<'_, Complex64>,
    ) -> Array1<Complex64> {
        let pm = coefficients.pm();
        s.mapv(|sj| {
            let mut acc = Complex64::new(0.0, 0.0);
            for (k, &c) in pm.iter().enumerate() {
                acc += c / Complex64::new((k + 1) as f64, 0.0).powc(sj);
            }
            acc
        })
    }
}

struct VectorizedKernel;

impl SeriesKernel for VectorizedKernel {
    fn eta_sum(
        &self, coefficients: &SeriesCoefficients, s: ArrayView1<'_, Complex64>,
    ) -> Array1<Complex64> {
        let mut acc = Array1::<Complex64>::zeros(s.len());
        for (&c, &ln_k) in coefficients.pm().iter().zip(coefficients.ln_k().iter()) {
            Zip::from(&mut acc).and(&s).for_each(|a, &sj| *a += c * (-sj * ln_k).exp());
        }
        acc
    }
}

struct ParallelKernel;

impl SeriesKernel for ParallelKernel {
    #[cfg(feature = "parallel")]
    fn eta_sum(
        &self, coefficients: &SeriesCoefficients, s: ArrayView1<'_, Complex64>,
    ) -> Array1<Complex64> {
        let pm = coefficients.pm();
        let ln_k = coefficients.ln_k();
        let mut acc = Array1::<Complex64>::zeros(s.len());
        Zip::from(&mut acc).and(&s).par_for_each(|a, &sj| {
            *a = pm.iter().zip(ln_k.iter()).map(|(&c, &l)| c * (-sj * l).exp()).sum();
        });
        acc
    }

    #[cfg(not(feature = "parallel"))]
    fn eta_sum(
        &self, coefficients: &SeriesCoefficients, s: ArrayView1<'_, Complex64>,
    ) -> Array1<Complex64> {
        VectorizedKernel.eta_sum(coefficients, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::discard_logger;

    fn sample_points() -> Array1<Complex64> {
        let mut pts = Vec::new();
        for re in [-3.0, -0.5, 0.0, 0.5, 2.0, 4.5] {
            for im in [-20.0, -3.0, 0.0, 0.7, 14.1] {
                pts.push(Complex64::new(re, im));
            }
        }
        Array1::from(pts)
    }

    #[test]
    // Purpose
    // -------
    // All strategies produce the same partial sums from one table.
    //
    // Expect
    // ------
    // - Every pair differs by < 1e-6 (absolute, scaled by magnitude).
    fn backends_agree_on_sample_grid() {
        let coeffs = SeriesCoefficients::new(128, &discard_logger()).unwrap();
        let s = sample_points();
        let reference = Backend::Reference.kernel().eta_sum(&coeffs, s.view());
        for backend in [Backend::Vectorized, Backend::Parallel] {
            let other = backend.kernel().eta_sum(&coeffs, s.view());
            for (a, b) in reference.iter().zip(other.iter()) {
                let scale = a.norm().max(1.0);
                assert!((a - b).norm() / scale < 1e-6, "{backend:?}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn toggled_switches_between_reference_and_accelerated() {
        assert_eq!(Backend::Reference.toggled(), Backend::Vectorized);
        assert_eq!(Backend::Vectorized.toggled(), Backend::Reference);
        assert_eq!(Backend::Parallel.toggled(), Backend::Reference);
        assert_eq!(Backend::default(), Backend::Vectorized);
    }

    #[test]
    fn parallel_resolves_according_to_feature() {
        let expected = if cfg!(feature = "parallel") { Backend::Parallel } else { Backend::Vectorized };
        assert_eq!(Backend::Parallel.resolved(), expected);
        assert_eq!(Backend::Reference.resolved(), Backend::Reference);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("Parallel".parse::<Backend>().unwrap(), Backend::Parallel);
        assert!("numba".parse::<Backend>().is_err());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let coeffs = SeriesCoefficients::new(8, &discard_logger()).unwrap();
        let s = Array1::<Complex64>::zeros(0);
        assert_eq!(Backend::Vectorized.kernel().eta_sum(&coeffs, s.view()).len(), 0);
    }
}
