//! Analysis configuration for catalog generation and statistic evaluation.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. Partial documents override only the keys they name:
//!
//! ```toml
//! ttot = 200.0
//! nbins = 200
//! seed = 42
//!
//! [omori]
//! b = 0.5
//! p = 1.1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Built-in defaults shared by the statistic and generator entry points.
pub mod defaults {
    /// Total catalog duration.
    pub const TTOT: f64 = 100.0;
    /// Number of equal-width histogram bins.
    pub const NBINS: usize = 100;
    /// Magnitude at or above which an event counts as "big".
    pub const MBIG: f64 = 2.5;
    /// Expected-count floor for the merged tail categories of the multinomial test.
    pub const MIN_EXPECTED: f64 = 5.0;
    /// Detection rejection-sampling cap per event slot.
    pub const MAX_ATTEMPTS_PER_EVENT: u64 = 100_000;
    /// Lower bound for homogeneous catalogs.
    pub const TMIN: f64 = 0.0;
    /// Upper bound for homogeneous catalogs.
    pub const TMAX: f64 = 100.0;
    /// Omori exponent.
    pub const OMORI_P: f64 = 1.0;
}

/// Default Omori parameters used when a caller does not supply its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmoriDefaults {
    /// Catalog start time (main shock at t = 0).
    pub tmin: f64,
    /// Catalog end time.
    pub tmax: f64,
    /// Omori time offset.
    pub b: f64,
    /// Omori decay exponent.
    pub p: f64,
}

impl Default for OmoriDefaults {
    fn default() -> Self {
        Self {
            tmin: 1.0,
            tmax: defaults::TMAX,
            b: 1.0,
            p: defaults::OMORI_P,
        }
    }
}

/// Configuration for a single analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Total catalog duration used to normalize event times.
    pub ttot: f64,
    /// Number of histogram bins for the binned chi-squared statistics.
    pub nbins: usize,
    /// Big-event magnitude threshold for the triggering test.
    pub mbig: f64,
    /// Rejection-sampling cap per event slot when thinning by detection probability.
    pub max_attempts_per_event: u64,
    /// Seed for the random generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Omori parameters for synthetic catalogs.
    pub omori: OmoriDefaults,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ttot: defaults::TTOT,
            nbins: defaults::NBINS,
            mbig: defaults::MBIG,
            max_attempts_per_event: defaults::MAX_ATTEMPTS_PER_EVENT,
            seed: None,
            omori: OmoriDefaults::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to pretty JSON, for embedding in analysis reports.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Return a copy with the given seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Semantic validation of every field.
    pub fn validate(&self) -> Result<()> {
        if !self.ttot.is_finite() || self.ttot <= 0.0 {
            return Err(Error::InvalidDuration { ttot: self.ttot });
        }
        if self.nbins == 0 {
            return Err(Error::Config("nbins must be at least 1".to_string()));
        }
        // Brown–Zhao reads one unit-time bin per whole time unit.
        if (self.nbins as f64) < self.ttot.floor() {
            return Err(Error::invalid(
                "nbins",
                self.nbins as f64,
                "must be >= floor(ttot)",
            ));
        }
        if self.mbig.is_nan() {
            return Err(Error::Config("mbig must be a number".to_string()));
        }
        if self.max_attempts_per_event == 0 {
            return Err(Error::Config(
                "max_attempts_per_event must be at least 1".to_string(),
            ));
        }

        let omori = &self.omori;
        if omori.tmin.is_nan() || omori.tmin <= 0.0 {
            return Err(Error::invalid("omori.tmin", omori.tmin, "must be > 0"));
        }
        if !omori.tmax.is_finite() || omori.tmax <= omori.tmin {
            return Err(Error::invalid(
                "omori.tmax",
                omori.tmax,
                "must be finite and > tmin",
            ));
        }
        if omori.b.is_nan() || omori.b <= 0.0 {
            return Err(Error::invalid("omori.b", omori.b, "must be > 0"));
        }
        if !omori.p.is_finite() || omori.p <= 0.0 {
            return Err(Error::invalid("omori.p", omori.p, "must be finite and > 0"));
        }
        Ok(())
    }
}
