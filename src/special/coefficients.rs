//! special::coefficients — the binomial-transform table behind eta/zeta.
//!
//! Purpose
//! -------
//! Precompute, once per term count `n`, everything the series evaluation
//! needs so each call costs `O(n · |s|)` and reads only immutable arrays.
//!
//! Key behaviors
//! -------------
//! - `binomial[[i, j]] = C(i, j)` for `0 ≤ i, j < n`. Only `j ≤ i/2 + 1` is
//!   computed via `statrs`; the rest of row `i` is mirrored from
//!   `C(i, j) = C(i, i - j)`. Entries with `j > i` are zero.
//! - `eta[i] = Σ_{j<n} C(j, i) / 2^(j+1)`.
//! - `pm[i] = eta[i]` for even `i` and `-eta[i]` for odd `i`.
//! - `ln_k[i] = ln(i + 1)`, shared by the vectorized backends.
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 ≤ n ≤ MAX_SERIES_TERMS`; larger tables overflow `f64` in the
//!   central binomial entries.
//! - The table is written once in [`SeriesCoefficients::new`] and never
//!   mutated; share it with `Arc` across engines and threads.
use ndarray::{Array1, Array2};
use slog::{debug, Logger};
use statrs::function::factorial::binomial;

use crate::special::errors::{SeriesError, SeriesResult};

/// Largest supported term count.
pub const MAX_SERIES_TERMS: usize = 1000;

/// Immutable coefficient table for an `n`-term eta/zeta series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesCoefficients {
    binomial: Array2<f64>,
    eta: Array1<f64>,
    pm: Array1<f64>,
    ln_k: Array1<f64>,
}

impl SeriesCoefficients {
    /// Build the table for `terms` series terms.
    ///
    /// # Errors
    /// [`SeriesError::InvalidTermCount`] if `terms == 0` or
    /// `terms > MAX_SERIES_TERMS`.
    pub fn new(terms: usize, logger: &Logger) -> SeriesResult<Self> {
        if terms == 0 || terms > MAX_SERIES_TERMS {
            return Err(SeriesError::InvalidTermCount { terms, max: MAX_SERIES_TERMS });
        }
        let n = terms;

        let mut table = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            let half = (i / 2 + 2).min(n);
            for j in 0..half {
                table[[i, j]] = binomial(i as u64, j as u64);
            }
            for j in half..=i.min(n - 1) {
                table[[i, j]] = table[[i, i - j]];
            }
        }

        let weights = Array1::from_shape_fn(n, |j| 0.5f64.powi(j as i32 + 1));
        let eta = table.t().dot(&weights);
        let pm = Array1::from_shape_fn(n, |i| if i % 2 == 0 { eta[i] } else { -eta[i] });
        let ln_k = Array1::from_shape_fn(n, |k| ((k + 1) as f64).ln());

        debug!(logger, "built series coefficient table"; "terms" => n, "entries" => n * n);
        Ok(SeriesCoefficients { binomial: table, eta, pm, ln_k })
    }

    pub fn terms(&self) -> usize {
        self.pm.len()
    }

    /// `C(i, j)` table, `terms × terms`.
    pub fn binomial(&self) -> &Array2<f64> {
        &self.binomial
    }

    pub fn eta_coefficients(&self) -> &Array1<f64> {
        &self.eta
    }

    /// Sign-alternated eta coefficients, the weights of `(k+1)^-s`.
    pub fn pm(&self) -> &Array1<f64> {
        &self.pm
    }

    pub(crate) fn ln_k(&self) -> &Array1<f64> {
        &self.ln_k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::discard_logger;
    use approx::assert_relative_eq;

    #[test]
    fn new_rejects_out_of_range_term_counts() {
        let log = discard_logger();
        assert_eq!(
            SeriesCoefficients::new(0, &log).unwrap_err(),
            SeriesError::InvalidTermCount { terms: 0, max: MAX_SERIES_TERMS }
        );
        assert!(SeriesCoefficients::new(MAX_SERIES_TERMS + 1, &log).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The mirrored half of each row must equal the directly computed
    // binomial coefficient, and the upper triangle must stay zero.
    fn binomial_table_matches_pascal_triangle() {
        let c = SeriesCoefficients::new(12, &discard_logger()).unwrap();
        let b = c.binomial();
        for i in 0..12 {
            for j in 0..12 {
                let expected = if j <= i { binomial(i as u64, j as u64) } else { 0.0 };
                assert_eq!(b[[i, j]], expected, "C({i}, {j})");
            }
        }
        assert_eq!(b[[10, 7]], 120.0);
    }

    #[test]
    // Purpose
    // -------
    // Check the derived eta / pm vectors against hand-computed values.
    //
    // Given
    // -----
    // - n = 3: eta[0] = 1/2 + 1/4 + 1/8, eta[1] = 1/4 + 2/8, eta[2] = 1/8.
    fn eta_and_pm_coefficients_for_small_table() {
        let c = SeriesCoefficients::new(3, &discard_logger()).unwrap();
        assert_relative_eq!(c.eta_coefficients()[0], 0.875);
        assert_relative_eq!(c.eta_coefficients()[1], 0.5);
        assert_relative_eq!(c.eta_coefficients()[2], 0.125);
        assert_eq!(c.pm().to_vec(), vec![0.875, -0.5, 0.125]);
        assert_eq!(c.terms(), 3);
    }

    #[test]
    fn largest_table_stays_finite() {
        let c = SeriesCoefficients::new(MAX_SERIES_TERMS, &discard_logger()).unwrap();
        assert!(c.binomial().iter().all(|v| v.is_finite()));
        assert!(c.pm().iter().all(|v| v.is_finite()));
    }
}
