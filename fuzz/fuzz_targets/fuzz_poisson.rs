//! Fuzz target for Poisson counts across the series/normal switch.

#![no_main]

use eq_math::{poisson_cdf, poisson_pmf};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (f64, u16)| {
    let (rate, k) = input;
    if !rate.is_finite() || rate < 0.0 {
        assert!(poisson_cdf(rate, u64::from(k), 1.0).is_nan() || rate.is_infinite());
        return;
    }
    let k = u64::from(k);
    let pmf = poisson_pmf(rate, k, 1.0);
    let cdf = poisson_cdf(rate, k, 1.0);
    assert!(pmf >= -1e-12, "pmf={pmf}");
    assert!((-1e-12..=1.0 + 1e-9).contains(&cdf), "cdf={cdf}");
});
