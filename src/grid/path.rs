//! grid::path — parametric paths and zero search along them.
//!
//! Purpose
//! -------
//! Sample a curve `z(t) = x(t) + i·y(t)` over a real parameter array and
//! locate near-zeros of a complex function along it (e.g. zeta zeros on the
//! critical line `Re s = 1/2`).
//!
//! Key behaviors
//! -------------
//! - [`ParametricPath`] stores the parameter samples plus the curve, so the
//!   curve can be re-sampled inside refinement windows.
//! - [`find_zeros`] runs `passes` rounds of window refinement. In round `j`
//!   (0-based) every sample with `|f| < 0.5·10^-(j+1)` opens a window of
//!   half-width `span / ((j+1)·window_divisor)` sampled with
//!   `samples_per_window` points. Overlapping windows are merged before
//!   evaluation so each region is visited once.
//! - After the last round, samples with `|f| < 0.5·10^-passes` are grouped
//!   into clusters and the best sample of each cluster is reported.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter samples are finite and strictly increasing.
//! - The search only finds zeros that some initial sample already
//!   approaches within the first tolerance; coarse initial sampling can miss
//!   zeros.
use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

use crate::grid::{
    errors::{GridError, GridResult},
    geometry::linspace,
};

type Curve = Arc<dyn Fn(f64) -> Complex64 + Send + Sync>;

/// A sampled curve in the complex plane.
#[derive(Clone)]
pub struct ParametricPath {
    t: Array1<f64>,
    curve: Curve,
}

impl fmt::Debug for ParametricPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParametricPath").field("t", &self.t).finish_non_exhaustive()
    }
}

impl ParametricPath {
    /// Path through `curve` at parameter samples `t`.
    ///
    /// # Errors
    /// [`GridError::InvalidPath`] if `t` has fewer than two samples, or is
    /// non-finite or not strictly increasing.
    pub fn new<C>(t: Array1<f64>, curve: C) -> GridResult<Self>
    where
        C: Fn(f64) -> Complex64 + Send + Sync + 'static,
    {
        if t.len() < 2 {
            return Err(GridError::InvalidPath { reason: "at least two parameter samples required" });
        }
        if t.iter().any(|v| !v.is_finite()) {
            return Err(GridError::InvalidPath { reason: "parameter samples must be finite" });
        }
        if t.windows(2).into_iter().any(|w| w[1] <= w[0]) {
            return Err(GridError::InvalidPath {
                reason: "parameter samples must be strictly increasing",
            });
        }
        Ok(ParametricPath { t, curve: Arc::new(curve) })
    }

    /// Path from separate real and imaginary component functions.
    pub fn from_components<X, Y>(t: Array1<f64>, x: X, y: Y) -> GridResult<Self>
    where
        X: Fn(f64) -> f64 + Send + Sync + 'static,
        Y: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        ParametricPath::new(t, move |s| Complex64::new(x(s), y(s)))
    }

    /// Straight segment `start + t·(end - start)` for `t ∈ [0, 1]`.
    pub fn segment(start: Complex64, end: Complex64, n_points: usize) -> GridResult<Self> {
        ParametricPath::new(linspace(0.0, 1.0, n_points), move |s| start + (end - start) * s)
    }

    /// The vertical line `1/2 + i·t` for `t ∈ [t_start, t_end]`.
    pub fn critical_line(t_start: f64, t_end: f64, n_points: usize) -> GridResult<Self> {
        ParametricPath::new(linspace(t_start, t_end, n_points), |s| Complex64::new(0.5, s))
    }

    pub fn parameters(&self) -> ArrayView1<'_, f64> {
        self.t.view()
    }

    /// Points of the path at its own parameter samples.
    pub fn points(&self) -> Array1<Complex64> {
        self.sample(self.t.view())
    }

    /// Points of the curve at arbitrary parameter values.
    pub fn sample(&self, t: ArrayView1<'_, f64>) -> Array1<Complex64> {
        t.mapv(|s| (self.curve)(s))
    }

    /// Parameter range `t_end - t_start`.
    pub fn span(&self) -> f64 {
        self.t[self.t.len() - 1] - self.t[0]
    }
}

/// Settings for [`find_zeros`], built through [`ZeroSearchOptions::new`] or
/// `Default`.
///
/// ```compile_fail
/// use complex_graph::grid::ZeroSearchOptions;
///
/// let _ = ZeroSearchOptions { passes: 0, samples_per_window: 1, window_divisor: 0.0 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroSearchOptions {
    /// Refinement rounds; also fixes the final tolerance `0.5·10^-passes`.
    passes: usize,
    /// Samples per refinement window.
    samples_per_window: usize,
    /// Window half-width in round `j` is `span / ((j+1)·window_divisor)`.
    window_divisor: f64,
}

impl ZeroSearchOptions {
    /// # Errors
    /// [`GridError::InvalidSearchOption`] if `passes == 0`,
    /// `samples_per_window < 2`, or `window_divisor` is not finite and > 0.
    pub fn new(passes: usize, samples_per_window: usize, window_divisor: f64) -> GridResult<Self> {
        if passes == 0 {
            return Err(GridError::InvalidSearchOption {
                name: "passes",
                reason: "at least one refinement pass is required",
            });
        }
        if samples_per_window < 2 {
            return Err(GridError::InvalidSearchOption {
                name: "samples_per_window",
                reason: "windows need at least two samples",
            });
        }
        if !window_divisor.is_finite() || window_divisor <= 0.0 {
            return Err(GridError::InvalidSearchOption {
                name: "window_divisor",
                reason: "must be finite and > 0",
            });
        }
        Ok(ZeroSearchOptions { passes, samples_per_window, window_divisor })
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn samples_per_window(&self) -> usize {
        self.samples_per_window
    }

    pub fn window_divisor(&self) -> f64 {
        self.window_divisor
    }

    fn tolerance(pass: usize) -> f64 {
        0.5 * 10f64.powi(-(pass as i32 + 1))
    }
}

impl Default for ZeroSearchOptions {
    fn default() -> Self {
        ZeroSearchOptions { passes: 3, samples_per_window: 1000, window_divisor: 100.0 }
    }
}

/// Merge `[c - h, c + h]` windows around sorted centres into disjoint
/// intervals.
fn merge_windows(centres: &[f64], half_width: f64) -> Vec<(f64, f64)> {
    let mut merged: Vec<(f64, f64)> = Vec::new();
    for &c in centres {
        let (lo, hi) = (c - half_width, c + half_width);
        match merged.last_mut() {
            Some(last) if lo <= last.1 => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

/// Locate parameter values where `|f(z(t))|` vanishes along `path`.
///
/// `f` is called once per round on the concatenated window samples, so it
/// can be a vectorized evaluator such as `CompiledFunction::call`. The first
/// error from `f` aborts the search.
///
/// # Returns
/// Parameter values of the located zeros in increasing order (one per
/// cluster of accepted samples).
pub fn find_zeros<E, F>(
    path: &ParametricPath, mut f: F, options: &ZeroSearchOptions,
) -> Result<Vec<f64>, E>
where
    F: FnMut(ArrayView1<'_, Complex64>) -> Result<Array1<Complex64>, E>,
{
    let span = path.span();
    let mut t = path.t.clone();
    let mut values = f(path.points().view())?;
    let mut half_width = span;

    for pass in 0..options.passes {
        let tol = ZeroSearchOptions::tolerance(pass);
        let centres: Vec<f64> = t
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| v.norm() < tol)
            .map(|(&s, _)| s)
            .collect();
        half_width = span / ((pass + 1) as f64 * options.window_divisor);

        let mut refined = Vec::new();
        for (lo, hi) in merge_windows(&centres, half_width) {
            let n_windows = ((hi - lo) / (2.0 * half_width)).ceil().max(1.0) as usize;
            refined.extend(linspace(lo, hi, n_windows * options.samples_per_window).iter().copied());
        }
        t = Array1::from(refined);
        if t.is_empty() {
            return Ok(Vec::new());
        }
        values = f(path.sample(t.view()).view())?;
    }

    let tol = 0.5 * 10f64.powi(-(options.passes as i32));
    let mut zeros = Vec::new();
    let mut best: Option<(f64, f64)> = None;
    let mut last_t = f64::NEG_INFINITY;
    for (&s, v) in t.iter().zip(values.iter()) {
        let r = v.norm();
        if r >= tol {
            continue;
        }
        if s - last_t > 2.0 * half_width {
            if let Some((bt, _)) = best.take() {
                zeros.push(bt);
            }
        }
        best = match best {
            Some((bt, br)) if br <= r => Some((bt, br)),
            _ => Some((s, r)),
        };
        last_t = s;
    }
    if let Some((bt, _)) = best {
        zeros.push(bt);
    }
    Ok(zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::convert::Infallible;

    #[test]
    fn new_rejects_bad_parameter_samples() {
        let c = |s: f64| Complex64::new(s, 0.0);
        assert!(matches!(
            ParametricPath::new(Array1::from(vec![1.0]), c),
            Err(GridError::InvalidPath { .. })
        ));
        assert!(ParametricPath::new(Array1::from(vec![0.0, 0.0, 1.0]), c).is_err());
        assert!(ParametricPath::new(Array1::from(vec![0.0, f64::NAN]), c).is_err());
    }

    #[test]
    fn segment_interpolates_endpoints() {
        let p = ParametricPath::segment(Complex64::new(-1.0, 0.0), Complex64::new(1.0, 2.0), 5)
            .unwrap();
        let z = p.points();
        assert_eq!(z[0], Complex64::new(-1.0, 0.0));
        assert_eq!(z[4], Complex64::new(1.0, 2.0));
        assert_eq!(z[2], Complex64::new(0.0, 1.0));
        assert_abs_diff_eq!(p.span(), 1.0);
    }

    #[test]
    fn options_validate_ranges() {
        assert!(ZeroSearchOptions::new(0, 10, 1.0).is_err());
        assert!(ZeroSearchOptions::new(1, 1, 1.0).is_err());
        assert!(ZeroSearchOptions::new(1, 10, 0.0).is_err());
        assert!(ZeroSearchOptions::new(1, 10, f64::INFINITY).is_err());
        let defaults = ZeroSearchOptions::default();
        assert_eq!(ZeroSearchOptions::new(3, 1000, 100.0).unwrap(), defaults);
        assert_eq!(
            (defaults.passes(), defaults.samples_per_window(), defaults.window_divisor()),
            (3, 1000, 100.0)
        );
    }

    #[test]
    fn merge_windows_joins_overlaps() {
        let m = merge_windows(&[0.0, 0.1, 1.0], 0.1);
        assert_eq!(m.len(), 2);
        assert_abs_diff_eq!(m[0].0, -0.1);
        assert_abs_diff_eq!(m[0].1, 0.2);
    }

    #[test]
    // Purpose
    // -------
    // Zeros of z² + 1 on the imaginary axis are located to within the final
    // tolerance, one result per zero.
    //
    // Given
    // -----
    // - Path z(t) = i·t on t ∈ [-2, 2] with 401 samples (hits ±1 exactly).
    //
    // Expect
    // ------
    // - Exactly two zeros near t = -1 and t = 1.
    fn find_zeros_locates_simple_roots() {
        let path = ParametricPath::from_components(linspace(-2.0, 2.0, 401), |_| 0.0, |s| s)
            .unwrap();
        let f = |z: ArrayView1<'_, Complex64>| {
            Ok::<_, Infallible>(z.mapv(|w| w * w + Complex64::new(1.0, 0.0)))
        };
        let zeros = find_zeros(&path, f, &ZeroSearchOptions::default()).unwrap();
        assert_eq!(zeros.len(), 2, "{zeros:?}");
        assert_abs_diff_eq!(zeros[0], -1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(zeros[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn find_zeros_returns_empty_without_candidates() {
        let path = ParametricPath::critical_line(0.0, 1.0, 50).unwrap();
        let f = |z: ArrayView1<'_, Complex64>| Ok::<_, Infallible>(z.mapv(|w| w + 10.0));
        assert!(find_zeros(&path, f, &ZeroSearchOptions::default()).unwrap().is_empty());
    }
}
