//! Adaptive multinomial chi-squared test.
//!
//! Bin counts are compared against the Poisson distribution of counts per
//! unit interval at the observed rate. Sparse tails are merged so every
//! category keeps an expected count of about [`MIN_EXPECTED`] or more:
//!
//! 1. `kmin` is the smallest count in `[0, floor(rate)]` whose cumulative
//!    expected count reaches the floor.
//! 2. `kmax` is the largest count in `[round(rate), max(ceil(5·rate), round(rate))]`
//!    whose upper-tail expected count reaches the floor.
//! 3. Bin counts are clamped into `[kmin, kmax]`; the two endpoints absorb
//!    the tails and interior counts use the point mass.
//!
//! Both searches go through [`bisect_tail`].

use super::{binned::histogram, check_nonempty};
use eq_common::config::defaults::MIN_EXPECTED;
use eq_common::{Error, Result};
use eq_math::{poisson_cdf, poisson_pmf};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which end of a monotone predicate [`bisect_tail`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailDirection {
    /// Predicate goes false → true as `k` grows; find the first true.
    Lower,
    /// Predicate goes true → false as `k` grows; find the last true.
    Upper,
}

/// Bisection over integer `k` in `[lo, hi]` for a monotone predicate.
///
/// When no `k` satisfies the predicate, `Lower` returns `hi` and `Upper`
/// returns `lo`.
pub fn bisect_tail<F>(direction: TailDirection, lo: u64, hi: u64, mut predicate: F) -> u64
where
    F: FnMut(u64) -> bool,
{
    if hi <= lo {
        return lo;
    }
    match direction {
        TailDirection::Lower => {
            if predicate(lo) {
                return lo;
            }
            if !predicate(hi) {
                return hi;
            }
            // predicate(a) false, predicate(b) true
            let (mut a, mut b) = (lo, hi);
            while b - a > 1 {
                let mid = a + (b - a) / 2;
                if predicate(mid) {
                    b = mid;
                } else {
                    a = mid;
                }
            }
            b
        }
        TailDirection::Upper => {
            if !predicate(lo) {
                return lo;
            }
            if predicate(hi) {
                return hi;
            }
            // predicate(a) true, predicate(b) false
            let (mut a, mut b) = (lo, hi);
            while b - a > 1 {
                let mid = a + (b - a) / 2;
                if predicate(mid) {
                    a = mid;
                } else {
                    b = mid;
                }
            }
            a
        }
    }
}

/// Categories of the multinomial test for one catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialBinning {
    pub obsrate: f64,
    pub kmin: u64,
    pub kmax: u64,
    /// Expected number of bins per category, `kmin..=kmax`.
    pub expected: Vec<f64>,
    /// Observed number of bins per category after clamping.
    pub observed: Vec<u64>,
}

impl MultinomialBinning {
    pub fn categories(&self) -> usize {
        self.expected.len()
    }

    /// `Σ (observed - expected)² / expected`.
    pub fn statistic(&self) -> f64 {
        self.expected
            .iter()
            .zip(&self.observed)
            .map(|(&e, &o)| (o as f64 - e).powi(2) / e)
            .sum()
    }
}

/// Build the merged categories for `cumtimes` binned into `nbins` over `[0, ttot]`.
pub fn multichi_binning(cumtimes: &[f64], ttot: f64, nbins: usize) -> Result<MultinomialBinning> {
    check_nonempty(cumtimes)?;
    let counts = histogram(cumtimes, ttot, nbins)?;
    let obsrate = cumtimes.len() as f64 / ttot;

    let lower_mass = |k: u64| poisson_cdf(obsrate, k, ttot);
    let upper_mass = |k: u64| {
        if k == 0 {
            ttot
        } else {
            ttot - poisson_cdf(obsrate, k - 1, ttot)
        }
    };

    let center = obsrate.round() as u64;
    let kmin = bisect_tail(TailDirection::Lower, 0, obsrate.floor() as u64, |k| {
        lower_mass(k) >= MIN_EXPECTED
    });
    let upper_hi = ((5.0 * obsrate).ceil() as u64).max(center);
    let kmax = bisect_tail(TailDirection::Upper, center, upper_hi, |k| {
        upper_mass(k) >= MIN_EXPECTED
    });

    let mut observed = vec![0_u64; (kmax - kmin + 1) as usize];
    for &c in &counts {
        let k = c.clamp(kmin, kmax);
        observed[(k - kmin) as usize] += 1;
    }

    let expected: Vec<f64> = if kmax == kmin {
        vec![ttot]
    } else {
        (kmin..=kmax)
            .map(|k| {
                if k == kmin {
                    lower_mass(k)
                } else if k == kmax {
                    upper_mass(k)
                } else {
                    poisson_pmf(obsrate, k, ttot)
                }
            })
            .collect()
    };

    if let Some(bad) = expected.iter().find(|e| !(e.is_finite() && **e > 0.0)) {
        return Err(Error::DegenerateData(format!(
            "expected count {bad} in multinomial category"
        )));
    }

    debug!(
        obsrate,
        kmin,
        kmax,
        categories = expected.len(),
        "multinomial binning"
    );

    Ok(MultinomialBinning {
        obsrate,
        kmin,
        kmax,
        expected,
        observed,
    })
}

/// Multinomial chi-squared statistic of `cumtimes` against a Poisson process.
pub fn multichi_test(cumtimes: &[f64], ttot: f64, nbins: usize) -> Result<f64> {
    multichi_binning(cumtimes, ttot, nbins).map(|binning| binning.statistic())
}
