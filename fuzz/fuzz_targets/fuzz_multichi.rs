//! Fuzz target for the binned statistics.
//!
//! Arbitrary catalogs, durations and bin counts must produce a value or an
//! error. When the multinomial binning succeeds its categories must bracket
//! the rounded rate.

#![no_main]

use arbitrary::Arbitrary;
use eq_core::stattests::{brownzhao_test, condchi_test, multichi_binning};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    times: Vec<f64>,
    ttot: f64,
    nbins: u16,
}

fuzz_target!(|input: Input| {
    let nbins = usize::from(input.nbins);
    let mut times = input.times;
    times.sort_by(f64::total_cmp);

    let _ = condchi_test(&times, input.ttot, nbins);
    let _ = brownzhao_test(&times, input.ttot, nbins.max(1));

    if let Ok(binning) = multichi_binning(&times, input.ttot, nbins) {
        let center = binning.obsrate.round() as u64;
        assert!(binning.kmin <= center && center <= binning.kmax);
        assert_eq!(binning.observed.iter().sum::<u64>(), nbins as u64);
    }
});
