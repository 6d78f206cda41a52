//! Binned-count statistics over `[0, ttot]`.

use super::{check_nbins, check_nonempty, check_ttot};
use eq_common::{Error, Result};

/// Counts of `values` in `nbins` equal-width bins over `[0, ttot]`.
///
/// Bins are half-open except the last, which includes `ttot`. Values
/// outside the range (and NaN) are not counted.
pub fn histogram(values: &[f64], ttot: f64, nbins: usize) -> Result<Vec<u64>> {
    check_ttot(ttot)?;
    check_nbins(nbins)?;
    let mut counts = vec![0_u64; nbins];
    let width = ttot / nbins as f64;
    for &x in values {
        if !(0.0..=ttot).contains(&x) {
            continue;
        }
        let idx = ((x / width) as usize).min(nbins - 1);
        counts[idx] += 1;
    }
    Ok(counts)
}

/// Chi-squared of binned counts against the overall rate `n / ttot`.
///
/// The expected count per bin is the rate itself, not `n / nbins`, so the
/// statistic assumes unit-width bins.
pub fn condchi_test(cumtimes: &[f64], ttot: f64, nbins: usize) -> Result<f64> {
    check_nonempty(cumtimes)?;
    let counts = histogram(cumtimes, ttot, nbins)?;
    let obsrate = cumtimes.len() as f64 / ttot;
    Ok(counts
        .iter()
        .map(|&c| (c as f64 - obsrate).powi(2) / obsrate)
        .sum())
}

/// Brown–Zhao statistic on unit-time bins.
///
/// Uses the first `floor(ttot)` of `nbins` bins, transforms each count to
/// `y = sqrt(count + 3/8)` and returns `4 Σ (y - ȳ)²` with `ȳ = Σy / ttot`.
/// An empty catalog is valid input.
pub fn brownzhao_test(cumtimes: &[f64], ttot: f64, nbins: usize) -> Result<f64> {
    check_ttot(ttot)?;
    let units = ttot.floor() as usize;
    if units == 0 {
        return Err(Error::InvalidDuration { ttot });
    }
    if nbins < units {
        return Err(Error::invalid(
            "nbins",
            nbins as f64,
            "must be >= floor(ttot)",
        ));
    }
    let counts = histogram(cumtimes, ttot, nbins)?;
    let y: Vec<f64> = counts[..units]
        .iter()
        .map(|&c| (c as f64 + 0.375).sqrt())
        .collect();
    let ybar = y.iter().sum::<f64>() / ttot;
    Ok(4.0 * y.iter().map(|&v| (v - ybar).powi(2)).sum::<f64>())
}
