//! Binomial distribution and the exact binomial test.
//!
//! The two-sided p-value sums the probability of every outcome that is no
//! more likely than the observed one (the "minimum likelihood" rule). A
//! relative tolerance of `1e-7` keeps outcomes whose mass equals the observed
//! mass up to rounding on the same side of the cut.

use super::stable::log_binomial;

/// Relative tolerance when comparing outcome masses to the observed mass.
const BINOM_TEST_RERR: f64 = 1.0 + 1e-7;

/// Log probability of `k` successes in `n` trials with success probability `p`.
pub fn binomial_log_pmf(k: u64, n: u64, p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if k > n {
        return f64::NEG_INFINITY;
    }
    // Degenerate success probabilities put all mass on one outcome.
    if p == 0.0 {
        return if k == 0 { 0.0 } else { f64::NEG_INFINITY };
    }
    if p == 1.0 {
        return if k == n { 0.0 } else { f64::NEG_INFINITY };
    }
    log_binomial(n, k) + k as f64 * p.ln() + (n - k) as f64 * (-p).ln_1p()
}

/// Probability of `k` successes in `n` trials.
pub fn binomial_pmf(k: u64, n: u64, p: f64) -> f64 {
    let log_pmf = binomial_log_pmf(k, n, p);
    if log_pmf.is_nan() {
        return f64::NAN;
    }
    log_pmf.exp()
}

/// Exact two-sided binomial test p-value for `k` successes in `n` trials.
///
/// Returns 1 when `k` equals the expected count `n·p`, NaN for `k > n` or a
/// success probability outside [0, 1].
pub fn binomial_test_two_sided(k: u64, n: u64, p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) || k > n {
        return f64::NAN;
    }
    let expected = n as f64 * p;
    if k as f64 == expected {
        return 1.0;
    }

    let observed = binomial_pmf(k, n, p);
    let cutoff = observed * BINOM_TEST_RERR;
    let pval: f64 = (0..=n)
        .map(|i| binomial_pmf(i, n, p))
        .filter(|&mass| mass <= cutoff)
        .sum();

    pval.min(1.0)
}
