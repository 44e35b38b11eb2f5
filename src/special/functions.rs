//! special::functions — complex special functions for the expression
//! namespace.
//!
//! Purpose
//! -------
//! Provide `Γ`, `erf`, `ψ` (digamma), the principal Lambert `W` and the
//! unnormalised `sinc` on `Complex64`, so compiled expressions can call them
//! over complex grids.
//!
//! Key behaviors
//! -------------
//! - `gamma` and `digamma` on the real axis go through `statrs`; everything
//!   else uses the complex algorithms below. `erf` has no real fast path so
//!   it stays continuous across the axis.
//! - `gamma`: Lanczos (g = 7, 9 terms) with the reflection formula for
//!   `Re z < 1/2`.
//! - `erf`: odd reflection to `Re z ≥ 0`, then the Maclaurin series where it
//!   is stable (`|z| < 3` or `Re z < 3/2`) and a Lentz continued fraction
//!   for `erfc` elsewhere. The series loses about `e^{2 (Re z)²}` ulps to
//!   cancellation, which bounds the strip it may serve.
//! - `digamma`: reflection for `Re z < 1/2`, upward recurrence to
//!   `Re z ≥ 10`, then the asymptotic expansion.
//! - `lambert_w`: Halley iteration from a branch-point series
//!   (`|z + 1/e| < 0.7`), a small-argument series, `ln(1 + z)` for `|z| ≤ 3`
//!   or the asymptotic `ln z - ln ln z`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Poles and overflow produce non-finite values; nothing panics.
//! - Relative accuracy is roughly 1e-12 away from poles and zeros.
use std::f64::consts::{E, PI};

use num_complex::Complex64;
use statrs::function::gamma as real_gamma;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

const ONE: Complex64 = Complex64::new(1.0, 0.0);

const ERF_SERIES_RADIUS: f64 = 3.0;
const ERF_SERIES_STRIP: f64 = 1.5;
const LAMBERT_BRANCH_RADIUS: f64 = 0.7;

fn is_real(z: Complex64) -> bool {
    z.im == 0.0
}

/// Complex gamma function.
pub fn gamma(z: Complex64) -> Complex64 {
    if is_real(z) {
        return Complex64::new(real_gamma::gamma(z.re), 0.0);
    }
    if z.re < 0.5 {
        // Γ(z) Γ(1-z) = π / sin(πz)
        return PI / ((z * PI).sin() * gamma(ONE - z));
    }
    let z = z - 1.0;
    let mut x = Complex64::new(LANCZOS_COEFFS[0], 0.0);
    for (i, &c) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        x += c / (z + i as f64);
    }
    let t = z + LANCZOS_G + 0.5;
    (2.0 * PI).sqrt() * t.powc(z + 0.5) * (-t).exp() * x
}

fn erf_series(z: Complex64) -> Complex64 {
    let z2 = z * z;
    let mut term = z;
    let mut sum = z;
    for n in 1..4000 {
        term *= -z2 / n as f64;
        let contribution = term / (2 * n + 1) as f64;
        sum += contribution;
        if contribution.norm() <= 1e-17 * sum.norm() {
            break;
        }
    }
    sum * (2.0 / PI.sqrt())
}

/// `erfc(z)` for `Re z > 0` by the continued fraction
/// `√π e^{z²} erfc(z) = 1 / (z + (1/2) / (z + 1 / (z + (3/2) / (z + …))))`.
fn erfc_continued_fraction(z: Complex64) -> Complex64 {
    const TINY: f64 = 1e-300;
    let tiny = Complex64::new(TINY, 0.0);
    let mut f = if z.norm() == 0.0 { tiny } else { z };
    let mut c = f;
    let mut d = Complex64::new(0.0, 0.0);
    for n in 1..2000 {
        let a = n as f64 / 2.0;
        d = z + d * a;
        if d.norm() == 0.0 {
            d = tiny;
        }
        c = z + a / c;
        if c.norm() == 0.0 {
            c = tiny;
        }
        d = d.inv();
        let delta = c * d;
        f *= delta;
        if (delta - 1.0).norm() < 1e-16 {
            break;
        }
    }
    (-z * z).exp() / (f * PI.sqrt())
}

/// Complex error function.
pub fn erf(z: Complex64) -> Complex64 {
    if z.re < 0.0 {
        return -erf(-z);
    }
    if z.norm() < ERF_SERIES_RADIUS || z.re < ERF_SERIES_STRIP {
        erf_series(z)
    } else {
        ONE - erfc_continued_fraction(z)
    }
}

/// Complex digamma `ψ(z) = Γ'(z) / Γ(z)`.
pub fn digamma(z: Complex64) -> Complex64 {
    if is_real(z) {
        return Complex64::new(real_gamma::digamma(z.re), 0.0);
    }
    if z.re < 0.5 {
        // ψ(1-z) - ψ(z) = π cot(πz)
        let pz = z * PI;
        return digamma(ONE - z) - PI * pz.cos() / pz.sin();
    }
    let mut z = z;
    let mut shift = Complex64::new(0.0, 0.0);
    while z.re < 10.0 {
        shift -= z.inv();
        z += 1.0;
    }
    let inv = z.inv();
    let inv2 = inv * inv;
    let series = inv2
        * (-1.0 / 12.0
            + inv2
                * (1.0 / 120.0
                    + inv2 * (-1.0 / 252.0 + inv2 * (1.0 / 240.0 + inv2 * (-1.0 / 132.0)))));
    shift + z.ln() - 0.5 * inv + series
}

/// Principal branch `W₀` of the Lambert W function, `W(z) e^{W(z)} = z`.
pub fn lambert_w(z: Complex64) -> Complex64 {
    if z.norm() == 0.0 {
        return z;
    }
    let branch_distance = z + 1.0 / E;
    let mut w = if branch_distance.norm() < LAMBERT_BRANCH_RADIUS {
        let p = (2.0 * (E * z + 1.0)).sqrt();
        -1.0 + p - p * p / 3.0 + 11.0 / 72.0 * p * p * p
    } else if z.norm() <= 0.5 {
        z * (ONE - z + 1.5 * z * z)
    } else if z.norm() <= 3.0 {
        (ONE + z).ln()
    } else {
        let l = z.ln();
        l - l.ln()
    };
    for _ in 0..100 {
        let ew = w.exp();
        let f = w * ew - z;
        let wp1 = w + 1.0;
        let denom = ew * wp1 - (w + 2.0) * f / (2.0 * wp1);
        if denom.norm() == 0.0 || !denom.is_finite() {
            break;
        }
        let step = f / denom;
        w -= step;
        if step.norm() <= 1e-15 * (1.0 + w.norm()) {
            break;
        }
    }
    w
}

/// Unnormalised sinc, `sin(z) / z` with `sinc(0) = 1`.
pub fn sinc(z: Complex64) -> Complex64 {
    if z.norm() == 0.0 {
        ONE
    } else {
        z.sin() / z
    }
}
