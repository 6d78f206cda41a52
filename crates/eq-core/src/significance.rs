//! Empirical p-values and detection power.
//!
//! A null distribution is the statistic evaluated on many synthetic
//! catalogs. [`get_pval`] ranks an observed statistic against it and
//! [`get_power`] turns repeated p-values into the fraction of detections.
//!
//! # Tail convention
//!
//! [`get_pval`] returns the fraction of null values strictly *below* the
//! observed statistic, so an observation larger than every null value
//! scores 1.0. For statistics where large values are extreme this is the
//! complement of the usual upper-tail p-value, and thresholding it with
//! [`get_power`] counts observations that are unusually *small*. Callers
//! that want the upper tail can use [`TailConvention::AtOrAbove`].

use crate::catalog::CatalogEnsemble;
use crate::stattests::Statistic;
use eq_common::{AnalysisConfig, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How an observed statistic is ranked against the null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailConvention {
    /// `count(null < observed) / len`, as [`get_pval`].
    #[default]
    StrictlyBelow,
    /// `count(null >= observed) / len`, the upper-tail p-value.
    AtOrAbove,
}

impl TailConvention {
    /// Empirical p-value of `teststat` against `randvals`.
    pub fn pvalue(&self, teststat: f64, randvals: &[f64]) -> Result<f64> {
        if randvals.is_empty() {
            return Err(Error::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if teststat.is_nan() {
            return Err(Error::invalid("teststat", teststat, "must not be NaN"));
        }
        let hits = match self {
            TailConvention::StrictlyBelow => randvals.iter().filter(|&&v| v < teststat).count(),
            TailConvention::AtOrAbove => randvals.iter().filter(|&&v| v >= teststat).count(),
        };
        Ok(hits as f64 / randvals.len() as f64)
    }
}

/// Fraction of `randvals` strictly below `teststat`.
///
/// See the module docs for why this is the lower-rank fraction rather than
/// the upper-tail p-value.
pub fn get_pval(teststat: f64, randvals: &[f64]) -> Result<f64> {
    TailConvention::StrictlyBelow.pvalue(teststat, randvals)
}

/// Fraction of `pvals` strictly below `thresh`.
pub fn get_power(pvals: &[f64], thresh: f64) -> Result<f64> {
    if pvals.is_empty() {
        return Err(Error::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if thresh.is_nan() {
        return Err(Error::invalid("thresh", thresh, "must not be NaN"));
    }
    let hits = pvals.iter().filter(|&&p| p < thresh).count();
    Ok(hits as f64 / pvals.len() as f64)
}

/// Values of one statistic over a set of null catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullDistribution {
    statistic: Statistic,
    values: Vec<f64>,
}

impl NullDistribution {
    /// Wrap precomputed values. Fails when `values` is empty.
    pub fn from_values(statistic: Statistic, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        Ok(Self { statistic, values })
    }

    /// Evaluate `statistic` on every catalog of `ensemble`.
    pub fn from_ensemble(
        statistic: Statistic,
        ensemble: &CatalogEnsemble,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let values = ensemble
            .rows()
            .map(|row| statistic.evaluate(row, config))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            statistic = %statistic,
            ncat = values.len(),
            "built null distribution"
        );
        Self::from_values(statistic, values)
    }

    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// [`get_pval`] of `observed` against this distribution.
    pub fn pval(&self, observed: f64) -> Result<f64> {
        get_pval(observed, &self.values)
    }

    /// P-value of `observed` under an explicit tail convention.
    pub fn pval_with(&self, observed: f64, convention: TailConvention) -> Result<f64> {
        convention.pvalue(observed, &self.values)
    }

    /// P-value of each catalog in `alternative` against this distribution.
    pub fn pvalues_for(
        &self,
        alternative: &CatalogEnsemble,
        config: &AnalysisConfig,
        convention: TailConvention,
    ) -> Result<Vec<f64>> {
        alternative
            .rows()
            .map(|row| {
                let observed = self.statistic.evaluate(row, config)?;
                convention.pvalue(observed, &self.values)
            })
            .collect()
    }
}

/// Detection power of the null's statistic against an alternative ensemble.
///
/// Each alternative catalog gets an empirical p-value against `null`; the
/// power is the fraction of those below `thresh`.
pub fn power_against_null(
    null: &NullDistribution,
    alternative: &CatalogEnsemble,
    config: &AnalysisConfig,
    thresh: f64,
    convention: TailConvention,
) -> Result<f64> {
    let pvals = null.pvalues_for(alternative, config, convention)?;
    let power = get_power(&pvals, thresh)?;
    debug!(
        statistic = %null.statistic(),
        catalogs = pvals.len(),
        thresh,
        power,
        "estimated detection power"
    );
    Ok(power)
}
