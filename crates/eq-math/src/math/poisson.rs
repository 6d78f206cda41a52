//! Poisson mass and cumulative counts, scaled by a total time.
//!
//! `poisson_pmf(rate, k, ttot)` is the expected number of unit intervals,
//! out of `ttot`, that contain exactly `k` events when events arrive at
//! `rate` per unit time; `poisson_cdf` counts intervals with at most `k`.
//!
//! # Evaluation
//!
//! The exact series `rate^i / i! · e^(-rate)` is used while `rate^k` and `k!`
//! are representable. Past that point the count falls back to the
//! continuity-corrected normal approximation:
//!
//! ```text
//! pmf ≈ ttot · ½ · (erf((k+½-rate)/√(2·rate)) - erf((k-½-rate)/√(2·rate)))
//! cdf ≈ ttot · ½ · (1 + erf((k+½-rate)/√(2·rate)))
//! ```
//!
//! Both branches are public so callers can inspect the switch point.
//! A negative or NaN rate yields NaN.

use super::erf::erf;
use super::stable::{factorial, MAX_FACTORIAL};

/// Expected count of intervals with exactly `k` events.
pub fn poisson_pmf(rate: f64, k: u64, ttot: f64) -> f64 {
    poisson_pmf_series(rate, k, ttot).unwrap_or_else(|| poisson_pmf_normal(rate, k, ttot))
}

/// Expected count of intervals with at most `k` events.
pub fn poisson_cdf(rate: f64, k: u64, ttot: f64) -> f64 {
    poisson_cdf_series(rate, k, ttot).unwrap_or_else(|| poisson_cdf_normal(rate, k, ttot))
}

/// Exact series for the mass, or `None` when `rate^k` or `k!` overflows.
pub fn poisson_pmf_series(rate: f64, k: u64, ttot: f64) -> Option<f64> {
    if rate.is_nan() || rate < 0.0 {
        return Some(f64::NAN);
    }
    if rate == 0.0 {
        return Some(if k == 0 { ttot } else { 0.0 });
    }
    let (power, fact) = series_term_parts(rate, k)?;
    Some(ttot * (-rate).exp() * power / fact)
}

/// Exact finite sum for the cumulative count, or `None` when any term overflows.
pub fn poisson_cdf_series(rate: f64, k: u64, ttot: f64) -> Option<f64> {
    if rate.is_nan() || rate < 0.0 {
        return Some(f64::NAN);
    }
    if rate == 0.0 {
        return Some(ttot);
    }
    let mut total = 0.0;
    for i in 0..=k {
        let (power, fact) = series_term_parts(rate, i)?;
        total += power / fact;
    }
    Some(total * (-rate).exp() * ttot)
}

/// Normal approximation to the mass.
pub fn poisson_pmf_normal(rate: f64, k: u64, ttot: f64) -> f64 {
    if rate.is_nan() || rate < 0.0 {
        return f64::NAN;
    }
    let scale = (2.0 * rate).sqrt();
    let k = k as f64;
    ttot * 0.5 * (erf((k + 0.5 - rate) / scale) - erf((k - 0.5 - rate) / scale))
}

/// Normal approximation to the cumulative count.
pub fn poisson_cdf_normal(rate: f64, k: u64, ttot: f64) -> f64 {
    if rate.is_nan() || rate < 0.0 {
        return f64::NAN;
    }
    let scale = (2.0 * rate).sqrt();
    ttot * 0.5 * (1.0 + erf((k as f64 + 0.5 - rate) / scale))
}

/// `(rate^k, k!)`, or `None` if either is not a finite f64.
fn series_term_parts(rate: f64, k: u64) -> Option<(f64, f64)> {
    if k > MAX_FACTORIAL {
        return None;
    }
    let power = rate.powi(k as i32);
    if !power.is_finite() {
        return None;
    }
    Some((power, factorial(k)?))
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

    /// First k for which the series branch gives up.
    fn switch_point(rate: f64) -> u64 {
        (0..=MAX_FACTORIAL + 1)
            .find(|&k| poisson_cdf_series(rate, k, 1.0).is_none())
            .unwrap()
    }

    #[test]
    fn pmf_known_values() {
        // Poisson(1): P(0) = P(1) = e^-1, P(2) = e^-1 / 2
        let e_inv = (-1.0f64).exp();
        assert!(approx_eq(poisson_pmf(1.0, 0, 1.0), e_inv, 1e-15));
        assert!(approx_eq(poisson_pmf(1.0, 1, 1.0), e_inv, 1e-15));
        assert!(approx_eq(poisson_pmf(1.0, 2, 100.0), 50.0 * e_inv, 1e-12));
    }

    #[test]
    fn cdf_matches_pmf_sum() {
        let rate = 3.5;
        let mut running = 0.0;
        for k in 0..20 {
            running += poisson_pmf(rate, k, 100.0);
            assert!(approx_eq(poisson_cdf(rate, k, 100.0), running, 1e-10));
        }
    }

    #[test]
    fn cdf_converges_to_total_time() {
        assert!(approx_eq(poisson_cdf(2.0, 60, 100.0), 100.0, 1e-10));
    }

    #[test]
    fn zero_rate_is_point_mass() {
        assert_eq!(poisson_pmf(0.0, 0, 100.0), 100.0);
        assert_eq!(poisson_pmf(0.0, 3, 100.0), 0.0);
        assert_eq!(poisson_cdf(0.0, 0, 100.0), 100.0);
        assert_eq!(poisson_cdf_normal(0.0, 2, 100.0), 100.0);
    }

    #[test]
    fn invalid_rate_is_nan() {
        assert!(poisson_pmf(-1.0, 1, 1.0).is_nan());
        assert!(poisson_cdf(f64::NAN, 1, 1.0).is_nan());
    }

    #[test]
    fn series_overflows_on_large_k() {
        assert!(poisson_pmf_series(1.0, MAX_FACTORIAL, 1.0).is_some());
        assert!(poisson_pmf_series(1.0, MAX_FACTORIAL + 1, 1.0).is_none());
        assert!(poisson_cdf_series(1.0, MAX_FACTORIAL + 1, 1.0).is_none());
    }

    #[test]
    fn series_overflows_on_large_rate() {
        // 1000^103 > f64::MAX
        assert!(poisson_pmf_series(1000.0, 102, 1.0).is_some());
        assert!(poisson_pmf_series(1000.0, 103, 1.0).is_none());
    }

    #[test]
    fn fallback_agrees_with_series_at_switch_point() {
        for &rate in &[100.0, 150.0, 170.0, 200.0] {
            let k = switch_point(rate) - 1;
            let series = poisson_cdf_series(rate, k, 1.0).unwrap();
            let normal = poisson_cdf_normal(rate, k, 1.0);
            assert!(
                approx_eq(series, normal, 1e-2),
                "rate={rate} k={k} series={series} normal={normal}"
            );
            let series_pmf = poisson_pmf_series(rate, k, 1.0).unwrap();
            let normal_pmf = poisson_pmf_normal(rate, k, 1.0);
            assert!(approx_eq(series_pmf, normal_pmf, 1e-3));
        }
    }

    #[test]
    fn cdf_is_monotone_across_switch_point() {
        for &rate in &[100.0, 140.0, 170.0, 250.0] {
            let k = switch_point(rate);
            let before = poisson_cdf(rate, k - 1, 1.0);
            let after = poisson_cdf(rate, k, 1.0);
            assert!(after >= before, "rate={rate} k={k}: {after} < {before}");
        }
    }
}
