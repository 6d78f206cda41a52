//! No-mock end-to-end tests for the catalog → statistic → significance pipeline.
//!
//! Every test drives real seeded generators through the public API:
//! - Omori and homogeneous null ensembles
//! - Empirical p-values of clustered and regular catalogs
//! - Detection power of the variance statistic
//! - The full statistic report on a synthetic catalog

use eq_core::catalog::{omori_times, CatalogGenerator, OmoriParams};
use eq_core::significance::{power_against_null, NullDistribution, TailConvention};
use eq_core::stattests::{multichi_binning, StatisticReport};
use eq_core::{get_pval, recurrence_times, var_test, AnalysisConfig, RecurrenceAnchor, Statistic};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Print test event (simple logging for integration tests).
macro_rules! log_test {
    ($level:expr, $msg:expr $(,)?) => {{
        eprintln!("[{}] {}", $level, $msg);
    }};
    ($level:expr, $msg:expr, $($key:ident = $val:expr),* $(,)?) => {{
        eprintln!("[{}] {} {{ {} }}", $level, $msg, format!(concat!($(stringify!($key), "={:?} "),*), $($val),*));
    }};
}

/// Two tight bursts of 25 events each.
fn clustered_catalog() -> Vec<f64> {
    let mut times: Vec<f64> = (0..25)
        .map(|j| 10.0 + 0.001 * j as f64)
        .chain((0..25).map(|j| 70.0 + 0.001 * j as f64))
        .collect();
    times.sort_by(f64::total_cmp);
    times
}

fn var_of(cumtimes: &[f64]) -> f64 {
    var_test(&recurrence_times(cumtimes, RecurrenceAnchor::Zero)).unwrap()
}

#[test]
fn test_clustered_catalog_ranks_above_omori_null() {
    let config = AnalysisConfig::default().with_seed(20_240_101);
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap());
    let params = OmoriParams::new(1.0, 100.0, 1.0, 1.0).unwrap();

    let ensemble = omori_times(&mut rng, 1000, 50, &params, None, 1_000).unwrap();
    let null = NullDistribution::from_ensemble(Statistic::Var, &ensemble, &config).unwrap();
    assert_eq!(null.len(), 1000);

    let observed = var_of(&clustered_catalog());
    let pval = get_pval(observed, null.values()).unwrap();
    log_test!("INFO", "clustered vs omori null", observed = observed, pval = pval);

    assert!(observed > 30.0, "observed={observed}");
    assert!(pval > 0.99, "pval={pval}");
}

#[test]
fn test_regular_and_clustered_catalogs_against_homogeneous_null() {
    let config = AnalysisConfig::default().with_seed(7);
    let generator = CatalogGenerator::new(&config);
    let mut rng = StdRng::seed_from_u64(7);

    let ensemble = generator.homogeneous(&mut rng, 500, 50).unwrap();
    let null = NullDistribution::from_ensemble(Statistic::Var, &ensemble, &config).unwrap();

    // Poisson recurrence times have normalized variance near 1.
    let mean = null.values().iter().sum::<f64>() / null.len() as f64;
    log_test!("INFO", "homogeneous null", mean = mean);
    assert!((mean - 1.0).abs() < 0.2, "mean={mean}");

    let regular: Vec<f64> = (1..=50).map(|i| 2.0 * i as f64).collect();
    assert_eq!(null.pval(var_of(&regular)).unwrap(), 0.0);
    assert_eq!(null.pval(var_of(&clustered_catalog())).unwrap(), 1.0);
    assert_eq!(
        null.pval_with(var_of(&clustered_catalog()), TailConvention::AtOrAbove)
            .unwrap(),
        0.0
    );
}

#[test]
fn test_variance_detects_omori_decay() {
    let config = AnalysisConfig::default();
    let generator = CatalogGenerator::new(&config);
    let mut rng = StdRng::seed_from_u64(99);

    let null_ensemble = generator.homogeneous(&mut rng, 500, 50).unwrap();
    let null = NullDistribution::from_ensemble(Statistic::Var, &null_ensemble, &config).unwrap();

    let params = OmoriParams::new(1.0, 100.0, 1.0, 1.0).unwrap();
    let alternative = generator
        .omori_times(&mut rng, 200, 50, &params, None)
        .unwrap();

    let power = power_against_null(
        &null,
        &alternative,
        &config,
        0.05,
        TailConvention::AtOrAbove,
    )
    .unwrap();
    log_test!("INFO", "variance power against omori", power = power);
    assert!(power > 0.8, "power={power}");

    // A homogeneous alternative is rejected at about the nominal rate.
    let same = generator.homogeneous(&mut rng, 200, 50).unwrap();
    let size = power_against_null(&null, &same, &config, 0.05, TailConvention::AtOrAbove).unwrap();
    assert!(size < 0.15, "size={size}");
}

#[test]
fn test_multichi_binning_brackets_rate_on_synthetic_catalogs() {
    let config = AnalysisConfig::default();
    let generator = CatalogGenerator::new(&config);
    let mut rng = StdRng::seed_from_u64(3);

    for nevents in [1, 20, 100, 1_000, 5_000] {
        let ensemble = generator.homogeneous(&mut rng, 5, nevents).unwrap();
        for row in ensemble.rows() {
            let binning = multichi_binning(row, config.ttot, config.nbins).unwrap();
            let center = binning.obsrate.round() as u64;
            assert!(binning.kmin <= center && center <= binning.kmax);
            assert_eq!(binning.categories() as u64, binning.kmax - binning.kmin + 1);
            assert_eq!(binning.observed.iter().sum::<u64>(), config.nbins as u64);
            assert!(binning.statistic().is_finite());
        }
    }
}

#[test]
fn test_detection_thinning_shifts_catalog_later() {
    let config = AnalysisConfig::default();
    let generator = CatalogGenerator::new(&config);
    let params = OmoriParams::new(1.0, 100.0, 1.0, 1.0).unwrap();

    // Early aftershocks are hidden in the main shock's coda.
    let coda = |t: f64| (t / 10.0).min(1.0);

    let mut rng = StdRng::seed_from_u64(11);
    let complete = generator.omori_times(&mut rng, 50, 50, &params, None).unwrap();
    let thinned = generator
        .omori_times(&mut rng, 50, 50, &params, Some(&coda))
        .unwrap();

    let median = |values: &[f64]| {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted[sorted.len() / 2]
    };
    let complete_median = median(complete.as_slice());
    let thinned_median = median(thinned.as_slice());
    log_test!(
        "INFO",
        "detection thinning",
        complete_median = complete_median,
        thinned_median = thinned_median,
    );
    assert!(thinned_median > complete_median);
}

#[test]
fn test_statistic_report_on_omori_catalog() {
    let config = AnalysisConfig::default().with_seed(5);
    let generator = CatalogGenerator::new(&config);
    let mut rng = eq_core::rng_from_config(&config);

    let catalog = generator.default_omori(&mut rng, 1, 200).unwrap();
    let cumtimes = catalog.row(0);
    let mags: Vec<f64> = (0..cumtimes.len())
        .map(|i| if i % 40 == 0 { 3.0 } else { 1.0 })
        .collect();

    let report = StatisticReport::evaluate(cumtimes, Some(mags.as_slice()), &config).unwrap();
    let json = report.to_json().unwrap();
    log_test!("INFO", "report", bytes = json.len());

    // Strong decay is far from uniform.
    assert!(report.ksunif_pvalue < 1e-6, "p={}", report.ksunif_pvalue);
    assert!(report.var > 1.0);
    assert_eq!(report.bigtrig.map(|t| t.nbig), Some(5));
}

#[test]
fn test_seeded_pipeline_is_reproducible() {
    let config = AnalysisConfig::default().with_seed(123);
    let run = || {
        let generator = CatalogGenerator::new(&config);
        let mut rng = eq_core::rng_from_config(&config);
        let ensemble = generator.default_omori(&mut rng, 20, 30).unwrap();
        NullDistribution::from_ensemble(Statistic::MultiChi, &ensemble, &config)
            .unwrap()
            .values()
            .to_vec()
    };
    assert_eq!(run(), run());
}
