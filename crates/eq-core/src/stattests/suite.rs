//! Every statistic for one catalog in a single serializable record.

use super::{
    acorr_test, bigtrig_summary, brownzhao_test, condchi_test, ksexp_test, ksunif_test,
    multichi_test, recurrence_times, var_test, KsResult, RecurrenceAnchor, TriggerSummary,
};
use eq_common::{AnalysisConfig, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Results of the full statistic suite on one catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticReport {
    pub nevents: usize,
    pub ttot: f64,
    pub nbins: usize,
    pub ksexp: KsResult,
    pub ksunif_pvalue: f64,
    pub acorr_pvalue: f64,
    pub var: f64,
    pub condchi: f64,
    pub multichi: f64,
    pub brownzhao: f64,
    /// Present only when magnitudes were supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bigtrig: Option<TriggerSummary>,
}

impl StatisticReport {
    /// Evaluate every statistic on `cumtimes` with the configured duration and binning.
    ///
    /// The first error from any statistic aborts the report.
    pub fn evaluate(
        cumtimes: &[f64],
        magnitudes: Option<&[f64]>,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let ttot = config.ttot;
        let nbins = config.nbins;
        let recurtimes = recurrence_times(cumtimes, RecurrenceAnchor::Zero);

        let report = StatisticReport {
            nevents: cumtimes.len(),
            ttot,
            nbins,
            ksexp: ksexp_test(&recurtimes, ttot)?,
            ksunif_pvalue: ksunif_test(cumtimes, ttot)?,
            acorr_pvalue: acorr_test(&recurtimes)?,
            var: var_test(&recurtimes)?,
            condchi: condchi_test(cumtimes, ttot, nbins)?,
            multichi: multichi_test(cumtimes, ttot, nbins)?,
            brownzhao: brownzhao_test(cumtimes, ttot, nbins)?,
            bigtrig: magnitudes
                .map(|mag| bigtrig_summary(cumtimes, mag, ttot, config.mbig))
                .transpose()?,
        };
        debug!(nevents = report.nevents, "statistic report complete");
        Ok(report)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
