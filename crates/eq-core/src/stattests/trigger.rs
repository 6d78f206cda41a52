//! Excess seismicity in the unit window after large events.

use super::{check_nonempty, check_ttot};
use eq_common::{Error, Result};
use eq_math::binomial_test_two_sided;
use serde::{Deserialize, Serialize};

/// Length of the triggering window after each big event.
const TRIGGER_WINDOW: f64 = 1.0;

/// Intermediate quantities of the triggering test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerSummary {
    /// Events with magnitude `>= mbig`.
    pub nbig: usize,
    /// Non-big events inside some window `(t_big, t_big + 1]`.
    pub triggered: usize,
    /// Binomial trials: the non-big events.
    pub trials: usize,
    /// Total time covered by the union of windows.
    pub window_exposure: f64,
    /// Success probability under a homogeneous rate.
    pub null_probability: f64,
    pub pvalue: f64,
}

/// Full triggering analysis for one catalog.
///
/// Exposure counts each window once, so overlapping windows after closely
/// spaced big events add only the gap between them.
pub fn bigtrig_summary(
    cumtimes: &[f64],
    mag: &[f64],
    ttot: f64,
    mbig: f64,
) -> Result<TriggerSummary> {
    check_ttot(ttot)?;
    check_nonempty(cumtimes)?;
    if mag.len() != cumtimes.len() {
        return Err(Error::LengthMismatch {
            expected: cumtimes.len(),
            actual: mag.len(),
        });
    }
    if mbig.is_nan() {
        return Err(Error::invalid("mbig", mbig, "must not be NaN"));
    }

    let n = cumtimes.len();
    let is_big: Vec<bool> = mag.iter().map(|&m| m >= mbig).collect();
    let mut big_times: Vec<f64> = cumtimes
        .iter()
        .zip(&is_big)
        .filter(|&(_, &big)| big)
        .map(|(&t, _)| t)
        .collect();
    big_times.sort_unstable_by(f64::total_cmp);
    let nbig = big_times.len();

    let triggered = cumtimes
        .iter()
        .zip(&is_big)
        .filter(|&(&t, &big)| {
            !big && big_times.iter().any(|&tb| {
                let dt = t - tb;
                dt > 0.0 && dt <= TRIGGER_WINDOW
            })
        })
        .count();

    let window_exposure: f64 = big_times
        .iter()
        .enumerate()
        .map(|(i, &tb)| {
            if i == 0 {
                return TRIGGER_WINDOW;
            }
            let gap = tb - big_times[i - 1];
            if gap > TRIGGER_WINDOW {
                TRIGGER_WINDOW
            } else {
                gap
            }
        })
        .sum();

    let obsrate = n as f64 / ttot;
    let null_probability = window_exposure * obsrate / n as f64;
    if null_probability > 1.0 {
        return Err(Error::invalid(
            "null_probability",
            null_probability,
            "window exposure exceeds total duration",
        ));
    }

    let trials = n - nbig;
    let pvalue = binomial_test_two_sided(triggered as u64, trials as u64, null_probability);

    Ok(TriggerSummary {
        nbig,
        triggered,
        trials,
        window_exposure,
        null_probability,
        pvalue,
    })
}

/// Two-sided binomial p-value for triggered events after big ones.
pub fn bigtrig_test(cumtimes: &[f64], mag: &[f64], ttot: f64, mbig: f64) -> Result<f64> {
    bigtrig_summary(cumtimes, mag, ttot, mbig).map(|summary| summary.pvalue)
}
