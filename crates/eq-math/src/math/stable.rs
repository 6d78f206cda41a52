//! Log-domain primitives: Gamma function, factorials, binomial coefficients.

use std::f64::consts::PI;

const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8; // 0.5 * ln(2*pi)
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)] // These are published numerical constants
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Largest `n` for which `n!` is finite in f64.
pub const MAX_FACTORIAL: u64 = 170;

/// Natural log of the Gamma function (log |Gamma(z)|).
///
/// Uses a Lanczos approximation with reflection for z < 0.5.
pub fn log_gamma(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return f64::INFINITY;
    }
    if z == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if z <= 0.0 {
        let z_round = z.round();
        if (z - z_round).abs() < 1e-15 {
            return f64::NAN;
        }
    }
    if z < 0.5 {
        let sin_pi = (PI * z).sin();
        if sin_pi == 0.0 {
            return f64::NAN;
        }
        return PI.ln() - sin_pi.abs().ln() - log_gamma(1.0 - z);
    }

    let z_minus = z - 1.0;
    let mut x = LANCZOS_COEFFS[0];
    for (i, coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        x += coeff / (z_minus + i as f64);
    }
    let t = z_minus + LANCZOS_G + 0.5;
    LOG_SQRT_2PI + (z_minus + 0.5) * t.ln() - t + x.ln()
}

/// log(n!) using the Gamma function.
pub fn log_factorial(n: u64) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    log_gamma((n as f64) + 1.0)
}

/// n! as f64, or `None` once it leaves the finite range.
///
/// Exact products up to 22!, Gamma-based beyond.
pub fn factorial(n: u64) -> Option<f64> {
    if n > MAX_FACTORIAL {
        return None;
    }
    if n <= 22 {
        return Some((2..=n).fold(1.0, |acc, i| acc * i as f64));
    }
    let value = log_factorial(n).exp();
    value.is_finite().then_some(value)
}

/// log binomial coefficient: log(n choose k).
pub fn log_binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0 || k == n {
        return 0.0;
    }
    log_factorial(n) - log_factorial(k) - log_factorial(n - k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn log_gamma_known_values() {
        assert!(approx_eq(log_gamma(1.0), 0.0, 1e-12));
        assert!(approx_eq(log_gamma(0.5), 0.5 * PI.ln(), 1e-10));
        assert!(approx_eq(log_gamma(5.0), 24.0f64.ln(), 1e-10));
    }

    #[test]
    fn log_gamma_negative_integer_is_nan() {
        assert!(log_gamma(-2.0).is_nan());
        assert!(log_gamma(f64::NAN).is_nan());
    }

    #[test]
    fn factorial_small_values_are_exact() {
        assert_eq!(factorial(0), Some(1.0));
        assert_eq!(factorial(1), Some(1.0));
        assert_eq!(factorial(5), Some(120.0));
        assert_eq!(factorial(10), Some(3_628_800.0));
    }

    #[test]
    fn factorial_overflow_boundary() {
        let last = factorial(MAX_FACTORIAL).unwrap();
        assert!(last.is_finite());
        assert!(last > 7.2e306);
        assert_eq!(factorial(MAX_FACTORIAL + 1), None);
    }

    #[test]
    fn log_factorial_and_binomial() {
        assert!(approx_eq(log_factorial(5), 120.0f64.ln(), 1e-12));
        assert!(approx_eq(log_binomial(5, 2), 10.0f64.ln(), 1e-12));
        assert_eq!(log_binomial(3, 0), 0.0);
        assert_eq!(log_binomial(3, 4), f64::NEG_INFINITY);
    }
}
