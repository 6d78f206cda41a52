//! Serial structure of recurrence times: autocorrelation and dispersion.

use super::check_nonempty;
use eq_common::{Error, Result};
use eq_math::chi_squared_sf;

/// Ljung–Box portmanteau test over the first `lags` autocorrelations.
///
/// Returns `(Q, p)` with `Q = n(n+2) Σ r_k²/(n-k)` and `p` from the
/// chi-squared distribution with `lags` degrees of freedom. A constant
/// series has no serial correlation: `(0, 1)`.
pub fn ljung_box(data: &[f64], lags: usize) -> Result<(f64, f64)> {
    if lags == 0 {
        return Err(Error::invalid("lags", 0.0, "must be > 0"));
    }
    let n = data.len();
    if n <= lags {
        return Err(Error::InsufficientData {
            required: lags + 1,
            actual: n,
        });
    }

    let mean = data.iter().sum::<f64>() / n as f64;
    let denom: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    // Relative to the raw second moment, so the cutoff is unit-free.
    let scale: f64 = data.iter().map(|x| x * x).sum();
    if denom <= f64::EPSILON * scale {
        return Ok((0.0, 1.0));
    }

    let nf = n as f64;
    let q = (1..=lags)
        .map(|k| {
            let num: f64 = (k..n).map(|i| (data[i] - mean) * (data[i - k] - mean)).sum();
            let r = num / denom;
            r * r / (nf - k as f64)
        })
        .sum::<f64>()
        * nf
        * (nf + 2.0);

    Ok((q, chi_squared_sf(q, lags as f64)))
}

/// Lag-1 Ljung–Box p-value of recurrence times.
pub fn acorr_test(recurtimes: &[f64]) -> Result<f64> {
    check_nonempty(recurtimes)?;
    ljung_box(recurtimes, 1).map(|(_, pvalue)| pvalue)
}

/// Population variance of recurrence times over their squared mean.
///
/// 1 for a Poisson process, 0 for evenly spaced events, above 1 for
/// clustered catalogs.
pub fn var_test(recurtimes: &[f64]) -> Result<f64> {
    check_nonempty(recurtimes)?;
    let n = recurtimes.len() as f64;
    let mean = recurtimes.iter().sum::<f64>() / n;
    if mean == 0.0 || !mean.is_finite() {
        return Err(Error::DegenerateData(format!(
            "mean recurrence time is {mean}"
        )));
    }
    let variance = recurtimes.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;
    Ok(variance / (mean * mean))
}
