//! Goodness-of-fit statistics for event-time catalogs.
//!
//! Every test is a pure function of an event-time sequence: either the
//! absolute times (`cumtimes`, ascending) or their recurrence times
//! (`recurtimes`, see [`recurrence_times`]). None of them draw random
//! numbers or retry.
//!
//! | Test | Input | Returns |
//! |------|-------|---------|
//! | [`ksexp_test`] | recurrence times | KS statistic and p-value against the exponential |
//! | [`ksunif_test`] | event times | KS p-value against the uniform |
//! | [`acorr_test`] | recurrence times | lag-1 Ljung–Box p-value |
//! | [`var_test`] | recurrence times | variance / mean² |
//! | [`condchi_test`] | event times | binned chi-squared against the mean rate |
//! | [`multichi_test`] | event times | adaptive multinomial chi-squared |
//! | [`brownzhao_test`] | event times | Brown–Zhao variance-stabilized statistic |
//! | [`bigtrig_test`] | event times and magnitudes | binomial p-value for triggering |
//!
//! [`Statistic`] names the single-catalog tests so null distributions can be
//! built generically, and [`StatisticReport`] runs all of them at once.

mod binned;
mod ks;
mod multichi;
mod serial;
pub mod suite;
mod trigger;

pub use binned::{brownzhao_test, condchi_test, histogram};
pub use ks::{ks_statistic, ksexp_test, ksunif_test, KsResult};
pub use multichi::{
    bisect_tail, multichi_binning, multichi_test, MultinomialBinning, TailDirection,
};
pub use serial::{acorr_test, ljung_box, var_test};
pub use suite::StatisticReport;
pub use trigger::{bigtrig_summary, bigtrig_test, TriggerSummary};

use eq_common::{AnalysisConfig, Error, Result};
use serde::{Deserialize, Serialize};

/// Where the first recurrence interval starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceAnchor {
    /// First interval is `cumtimes[0] - 0`; output has `n` values.
    #[default]
    Zero,
    /// Intervals between consecutive events only; output has `n - 1` values.
    FirstEvent,
}

/// Consecutive differences of ascending event times.
pub fn recurrence_times(cumtimes: &[f64], anchor: RecurrenceAnchor) -> Vec<f64> {
    let diffs = cumtimes.windows(2).map(|w| w[1] - w[0]);
    match (anchor, cumtimes.first()) {
        (RecurrenceAnchor::Zero, Some(&first)) => std::iter::once(first).chain(diffs).collect(),
        _ => diffs.collect(),
    }
}

/// The single-catalog statistics, for building null distributions generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// KS distance of scaled recurrence times from the unit exponential.
    KsExp,
    /// KS p-value of event times against the uniform.
    KsUnif,
    /// Lag-1 Ljung–Box p-value of recurrence times.
    Acorr,
    /// Normalized variance of recurrence times.
    Var,
    /// Chi-squared of per-bin counts against the overall rate.
    CondChi,
    /// Multinomial chi-squared of bin-count categories against Poisson.
    MultiChi,
    /// Brown–Zhao dispersion of square-root transformed unit-bin counts.
    BrownZhao,
}

impl Statistic {
    pub const ALL: [Statistic; 7] = [
        Statistic::KsExp,
        Statistic::KsUnif,
        Statistic::Acorr,
        Statistic::Var,
        Statistic::CondChi,
        Statistic::MultiChi,
        Statistic::BrownZhao,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Statistic::KsExp => "ksexp",
            Statistic::KsUnif => "ksunif",
            Statistic::Acorr => "acorr",
            Statistic::Var => "var",
            Statistic::CondChi => "condchi",
            Statistic::MultiChi => "multichi",
            Statistic::BrownZhao => "brownzhao",
        }
    }

    /// Whether the statistic reads recurrence times rather than event times.
    pub fn uses_recurrence_times(&self) -> bool {
        matches!(self, Statistic::KsExp | Statistic::Acorr | Statistic::Var)
    }

    /// Evaluate on one catalog, deriving recurrence times from `0` when needed.
    pub fn evaluate(&self, cumtimes: &[f64], config: &AnalysisConfig) -> Result<f64> {
        let ttot = config.ttot;
        let nbins = config.nbins;
        if self.uses_recurrence_times() {
            let recurtimes = recurrence_times(cumtimes, RecurrenceAnchor::Zero);
            return match self {
                Statistic::KsExp => ksexp_test(&recurtimes, ttot).map(|ks| ks.statistic),
                Statistic::Acorr => acorr_test(&recurtimes),
                _ => var_test(&recurtimes),
            };
        }
        match self {
            Statistic::KsUnif => ksunif_test(cumtimes, ttot),
            Statistic::CondChi => condchi_test(cumtimes, ttot, nbins),
            Statistic::MultiChi => multichi_test(cumtimes, ttot, nbins),
            _ => brownzhao_test(cumtimes, ttot, nbins),
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(format!("unknown statistic: {s}")))
    }
}

pub(crate) fn check_ttot(ttot: f64) -> Result<()> {
    if !ttot.is_finite() || ttot <= 0.0 {
        return Err(Error::InvalidDuration { ttot });
    }
    Ok(())
}

pub(crate) fn check_nbins(nbins: usize) -> Result<()> {
    if nbins == 0 {
        return Err(Error::invalid("nbins", 0.0, "must be > 0"));
    }
    Ok(())
}

pub(crate) fn check_nonempty(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::EmptyCatalog);
    }
    Ok(())
}
