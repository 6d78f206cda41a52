//! eqstats core: synthetic catalogs and temporal goodness-of-fit statistics.
//!
//! The pipeline runs leaves first:
//! - [`catalog`] draws Omori-decay or homogeneous event-time catalogs
//! - [`stattests`] maps one catalog to scalar statistics
//! - [`significance`] turns statistics into empirical p-values and detection power

pub mod catalog;
pub mod logging;
pub mod significance;
pub mod stattests;

pub use catalog::{
    omori_times, random_times, rng_from_config, AlwaysDetected, CatalogEnsemble,
    CatalogGenerator, DetectionProbability, OmoriParams,
};
pub use eq_common::{AnalysisConfig, Error, Result};
pub use significance::{
    get_power, get_pval, power_against_null, NullDistribution, TailConvention,
};
pub use stattests::{
    acorr_test, bigtrig_test, brownzhao_test, condchi_test, ksexp_test, ksunif_test,
    multichi_test, recurrence_times, var_test, KsResult, RecurrenceAnchor, Statistic,
    StatisticReport,
};
