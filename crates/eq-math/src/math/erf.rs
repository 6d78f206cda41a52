//! Error function and the standard normal CDF.
//!
//! Expressed through the incomplete gamma functions:
//! `erf(x) = sign(x) · P(1/2, x²)` and `erfc(x) = Q(1/2, x²)` for x ≥ 0,
//! which keeps full double precision in both tails.

use super::gamma::{gamma_p, gamma_q};

/// Error function.
pub fn erf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return x.signum();
    }
    x.signum() * gamma_p(0.5, x * x)
}

/// Complementary error function, `1 - erf(x)`.
pub fn erfc(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 0.0;
    }
    if x == f64::NEG_INFINITY {
        return 2.0;
    }
    if x < 0.0 {
        return 1.0 + gamma_p(0.5, x * x);
    }
    gamma_q(0.5, x * x)
}

/// Standard normal CDF Φ(z).
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
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
    fn erf_reference_values() {
        assert_eq!(erf(0.0), 0.0);
        assert!(approx_eq(erf(0.5), 0.520_499_877_813_046_5, 1e-12));
        assert!(approx_eq(erf(1.0), 0.842_700_792_949_714_9, 1e-12));
        assert!(approx_eq(erf(2.0), 0.995_322_265_018_952_7, 1e-12));
    }

    #[test]
    fn erf_is_odd() {
        for &x in &[0.1, 0.7, 1.3, 3.0] {
            assert!(approx_eq(erf(-x), -erf(x), 1e-15));
        }
    }

    #[test]
    fn erf_saturates() {
        assert_eq!(erf(f64::INFINITY), 1.0);
        assert_eq!(erf(f64::NEG_INFINITY), -1.0);
        assert!(approx_eq(erf(8.0), 1.0, 1e-15));
    }

    #[test]
    fn erfc_keeps_tail_precision() {
        // erfc(5) = 1.5374597944280349e-12
        let tail = erfc(5.0);
        assert!((tail - 1.537_459_794_428_035e-12).abs() / 1.537_459_794_428_035e-12 < 1e-8);
        assert!(approx_eq(erfc(-1.0), 1.0 + erf(1.0), 1e-12));
    }

    #[test]
    fn normal_cdf_reference_values() {
        assert!(approx_eq(normal_cdf(0.0), 0.5, 1e-15));
        assert!(approx_eq(normal_cdf(1.959_963_984_540_054), 0.975, 1e-12));
        assert!(approx_eq(normal_cdf(-1.0), 0.158_655_253_931_457_05, 1e-12));
    }
}
