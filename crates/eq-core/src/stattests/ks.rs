//! One-sample Kolmogorov–Smirnov tests.

use super::{check_nonempty, check_ttot};
use eq_common::{Error, Result};
use eq_math::kolmogorov_sf;
use serde::{Deserialize, Serialize};

/// KS distance and its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsResult {
    pub statistic: f64,
    pub pvalue: f64,
}

/// Two-sided KS distance between the empirical CDF of `values` and `cdf`.
///
/// `values` need not be sorted. NaN values are rejected.
pub fn ks_statistic<F>(values: &[f64], cdf: F) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    check_nonempty(values)?;
    if values.iter().any(|v| v.is_nan()) {
        return Err(Error::DegenerateData("NaN in KS sample".to_string()));
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let d = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let above = (i + 1) as f64 / n - f;
            let below = f - i as f64 / n;
            above.max(below)
        })
        .fold(0.0_f64, f64::max);
    Ok(d)
}

fn ks_test<F>(values: &[f64], cdf: F) -> Result<KsResult>
where
    F: Fn(f64) -> f64,
{
    let statistic = ks_statistic(values, cdf)?;
    let pvalue = kolmogorov_sf(values.len() as u64, statistic);
    Ok(KsResult { statistic, pvalue })
}

/// KS test of recurrence times against the exponential with the observed rate.
///
/// Times are rescaled by `(n + 1) / ttot` and compared with the unit
/// exponential CDF `1 - e^-x`.
pub fn ksexp_test(recurtimes: &[f64], ttot: f64) -> Result<KsResult> {
    check_ttot(ttot)?;
    check_nonempty(recurtimes)?;
    let scale = (recurtimes.len() + 1) as f64 / ttot;
    let scaled: Vec<f64> = recurtimes.iter().map(|&t| t * scale).collect();
    ks_test(&scaled, |x| if x <= 0.0 { 0.0 } else { -(-x).exp_m1() })
}

/// KS p-value of `cumtimes / ttot` against uniform(0, 1).
pub fn ksunif_test(cumtimes: &[f64], ttot: f64) -> Result<f64> {
    check_ttot(ttot)?;
    check_nonempty(cumtimes)?;
    let scaled: Vec<f64> = cumtimes.iter().map(|&t| t / ttot).collect();
    ks_test(&scaled, |x| x.clamp(0.0, 1.0)).map(|ks| ks.pvalue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn statistic_of_single_point() {
        // Empirical CDF jumps 0 -> 1 at 0.3: D = max(1 - 0.3, 0.3).
        let d = ks_statistic(&[0.3], |x| x.clamp(0.0, 1.0)).unwrap();
        assert!(approx_eq(d, 0.7, 1e-12));
    }

    #[test]
    fn statistic_of_grid_midpoints_is_half_step() {
        let values: Vec<f64> = (0..10).map(|i| (i as f64 + 0.5) / 10.0).collect();
        let d = ks_statistic(&values, |x| x.clamp(0.0, 1.0)).unwrap();
        assert!(approx_eq(d, 0.05, 1e-12));
    }

    #[test]
    fn uniform_grid_is_not_rejected() {
        let cumtimes: Vec<f64> = (0..50).map(|i| 2.0 * i as f64 + 1.0).collect();
        let pval = ksunif_test(&cumtimes, 100.0).unwrap();
        assert!(pval > 0.99, "pval={pval}");
    }

    #[test]
    fn front_loaded_catalog_is_rejected() {
        let cumtimes: Vec<f64> = (0..50).map(|i| 0.2 * i as f64).collect();
        let pval = ksunif_test(&cumtimes, 100.0).unwrap();
        assert!(pval < 1e-10, "pval={pval}");
    }

    #[test]
    fn exponential_quantiles_fit() {
        // Recurrence times at exponential quantiles with mean ttot/(n+1).
        let n = 40;
        let ttot = 100.0;
        let recur: Vec<f64> = (0..n)
            .map(|i| {
                let u = (i as f64 + 0.5) / n as f64;
                -(1.0 - u).ln() * ttot / (n + 1) as f64
            })
            .collect();
        let ks = ksexp_test(&recur, ttot).unwrap();
        assert!(ks.statistic < 0.05, "D={}", ks.statistic);
        assert!(ks.pvalue > 0.9, "p={}", ks.pvalue);
    }

    #[test]
    fn constant_recurrence_times_are_rejected() {
        let recur = vec![2.0; 50];
        let ks = ksexp_test(&recur, 100.0).unwrap();
        assert!(ks.pvalue < 0.01, "p={}", ks.pvalue);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(ksexp_test(&[], 100.0), Err(Error::EmptyCatalog)));
        assert!(matches!(
            ksunif_test(&[1.0], -1.0),
            Err(Error::InvalidDuration { .. })
        ));
        assert!(ks_statistic(&[f64::NAN], |x| x).is_err());
    }
}
