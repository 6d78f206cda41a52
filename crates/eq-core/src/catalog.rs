//! Synthetic earthquake catalogs.
//!
//! Two generators:
//! - [`omori_times`]: aftershock sequences whose rate decays as `(b+t)^-p`
//!   between `tmin` and `tmax` (main shock at t = 0), optionally thinned by a
//!   time-dependent detection probability
//! - [`random_times`]: a fixed number of uniform event times, the
//!   homogeneous null model
//!
//! Every sampling call takes an explicit random generator, so a seeded
//! [`rand::rngs::StdRng`] reproduces catalogs exactly.
//!
//! # Example
//!
//! ```
//! use eq_core::catalog::{omori_times, OmoriParams};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let params = OmoriParams::new(1.0, 100.0, 1.0, 1.0).unwrap();
//! let ensemble = omori_times(&mut rng, 10, 50, &params, None, 1_000).unwrap();
//! assert_eq!(ensemble.ncat(), 10);
//! assert!(ensemble.row(0).windows(2).all(|w| w[0] <= w[1]));
//! ```

use eq_common::{AnalysisConfig, Error, OmoriDefaults, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Build the generator an analysis run should use.
///
/// A configured seed gives a reproducible stream; otherwise the generator is
/// seeded from OS entropy.
pub fn rng_from_config(config: &AnalysisConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Probability that an event at time `t` makes it into the catalog.
///
/// Values are compared against a uniform draw, so anything >= 1 always
/// accepts and anything <= 0 always rejects.
pub trait DetectionProbability {
    fn probability(&self, t: f64) -> f64;
}

impl<F> DetectionProbability for F
where
    F: Fn(f64) -> f64,
{
    fn probability(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Complete detection at every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDetected;

impl DetectionProbability for AlwaysDetected {
    fn probability(&self, _t: f64) -> f64 {
        1.0
    }
}

/// Omori decay parameters: rate ∝ `(b+t)^-p` on `[tmin, tmax]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OmoriParams {
    pub tmin: f64,
    pub tmax: f64,
    pub b: f64,
    pub p: f64,
}

impl OmoriParams {
    /// Validated constructor.
    pub fn new(tmin: f64, tmax: f64, b: f64, p: f64) -> Result<Self> {
        let params = Self { tmin, tmax, b, p };
        params.validate()?;
        Ok(params)
    }

    /// Requires `0 < tmin < tmax` (finite), `b > 0` and `p > 0`.
    pub fn validate(&self) -> Result<()> {
        if self.tmin.is_nan() || self.tmin <= 0.0 {
            return Err(Error::invalid("tmin", self.tmin, "must be > 0"));
        }
        if !self.tmax.is_finite() || self.tmax <= self.tmin {
            return Err(Error::invalid("tmax", self.tmax, "must be finite and > tmin"));
        }
        if self.b.is_nan() || self.b <= 0.0 {
            return Err(Error::invalid("b", self.b, "must be > 0"));
        }
        if !self.p.is_finite() || self.p <= 0.0 {
            return Err(Error::invalid("p", self.p, "must be finite and > 0"));
        }
        Ok(())
    }

    /// Inverse CDF of the truncated Omori density at quantile `u` in [0, 1).
    pub fn quantile(&self, u: f64) -> f64 {
        let Self { tmin, tmax, b, p } = *self;
        let t = if p == 1.0 {
            tmin + (b + tmin) * (((b + tmax) / (b + tmin)).powf(u) - 1.0)
        } else {
            let q = p - 1.0;
            -b + ((1.0 - u) / (b + tmin).powf(q) + u / (b + tmax).powf(q)).powf(-1.0 / q)
        };
        // Rounding in powf can step just outside the support.
        t.clamp(tmin, tmax)
    }
}

impl From<&OmoriDefaults> for OmoriParams {
    fn from(defaults: &OmoriDefaults) -> Self {
        Self {
            tmin: defaults.tmin,
            tmax: defaults.tmax,
            b: defaults.b,
            p: defaults.p,
        }
    }
}

/// `ncat` independent catalogs of `nevents` sorted event times each.
///
/// Stored row-major; row `i` is realization `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEnsemble {
    ncat: usize,
    nevents: usize,
    times: Vec<f64>,
}

impl CatalogEnsemble {
    /// Assemble from equal-length rows, sorting each row.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let ncat = rows.len();
        let nevents = rows.first().map_or(0, Vec::len);
        let mut times = Vec::with_capacity(ncat * nevents);
        for mut row in rows {
            if row.len() != nevents {
                return Err(Error::LengthMismatch {
                    expected: nevents,
                    actual: row.len(),
                });
            }
            row.sort_unstable_by(f64::total_cmp);
            times.extend(row);
        }
        Ok(Self {
            ncat,
            nevents,
            times,
        })
    }

    fn from_flat(ncat: usize, nevents: usize, mut times: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), ncat * nevents);
        if nevents > 0 {
            for row in times.chunks_exact_mut(nevents) {
                row.sort_unstable_by(f64::total_cmp);
            }
        }
        Self {
            ncat,
            nevents,
            times,
        }
    }

    /// Number of realizations.
    pub fn ncat(&self) -> usize {
        self.ncat
    }

    /// Events per realization.
    pub fn nevents(&self) -> usize {
        self.nevents
    }

    /// `(ncat, nevents)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.ncat, self.nevents)
    }

    /// Event times of realization `i`. Panics if `i >= ncat`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.times[i * self.nevents..(i + 1) * self.nevents]
    }

    /// Iterate over realizations in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.ncat).map(move |i| self.row(i))
    }

    /// All event times, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        if self.nevents == 0 {
            return vec![Vec::new(); self.ncat];
        }
        self.times
            .chunks_exact(self.nevents)
            .map(<[f64]>::to_vec)
            .collect()
    }
}

/// Draw `ncat` Omori-decay catalogs of `nevents` events each.
///
/// Each event slot draws `t = params.quantile(u)` and, when `detect` is
/// given, keeps it if `detect(t) >= v` for an independent uniform `v`;
/// rejected slots redraw both. After `max_attempts` rejections for one slot
/// the whole call fails with [`Error::SamplingExhausted`].
///
/// Fails with [`Error::InvalidParameter`] before drawing anything if
/// `ncat` or `nevents` is zero or `params` is invalid.
pub fn omori_times<R: Rng + ?Sized>(
    rng: &mut R,
    ncat: usize,
    nevents: usize,
    params: &OmoriParams,
    detect: Option<&dyn DetectionProbability>,
    max_attempts: u64,
) -> Result<CatalogEnsemble> {
    if ncat == 0 {
        return Err(Error::invalid("ncat", 0.0, "must be > 0"));
    }
    if nevents == 0 {
        return Err(Error::invalid("nevents", 0.0, "must be > 0"));
    }
    if max_attempts == 0 {
        return Err(Error::invalid("max_attempts", 0.0, "must be > 0"));
    }
    params.validate()?;

    let total = ncat * nevents;
    let mut accepted = Vec::with_capacity(total);
    let mut draws: u64 = 0;

    for slot in 0..total {
        let mut attempts = 0;
        let t = loop {
            if attempts == max_attempts {
                warn!(
                    slot,
                    attempts, "detection probability rejected every draw for event slot"
                );
                return Err(Error::SamplingExhausted { attempts, slot });
            }
            attempts += 1;
            let t = params.quantile(rng.random::<f64>());
            match detect {
                None => break t,
                Some(model) => {
                    if model.probability(t) >= rng.random::<f64>() {
                        break t;
                    }
                }
            }
        };
        draws += attempts;
        accepted.push(t);
    }

    debug!(
        ncat,
        nevents,
        draws,
        acceptance = total as f64 / draws as f64,
        "generated omori ensemble"
    );
    Ok(CatalogEnsemble::from_flat(ncat, nevents, accepted))
}

/// `nevents` independent uniform times on `[tmin, tmax)`, sorted ascending.
///
/// The event count is fixed; this is not a variable-count Poisson process.
pub fn random_times<R: Rng + ?Sized>(
    rng: &mut R,
    nevents: usize,
    tmin: f64,
    tmax: f64,
) -> Result<Vec<f64>> {
    if !tmin.is_finite() {
        return Err(Error::invalid("tmin", tmin, "must be finite"));
    }
    if !tmax.is_finite() || tmax <= tmin {
        return Err(Error::invalid("tmax", tmax, "must be finite and > tmin"));
    }
    let mut times: Vec<f64> = (0..nevents)
        .map(|_| tmin + (tmax - tmin) * rng.random::<f64>())
        .collect();
    times.sort_unstable_by(f64::total_cmp);
    Ok(times)
}

/// Catalog generation bound to an [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct CatalogGenerator {
    max_attempts_per_event: u64,
    omori: OmoriParams,
    ttot: f64,
}

impl CatalogGenerator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            max_attempts_per_event: config.max_attempts_per_event,
            omori: OmoriParams::from(&config.omori),
            ttot: config.ttot,
        }
    }

    /// Omori parameters taken from the configuration.
    pub fn omori_params(&self) -> &OmoriParams {
        &self.omori
    }

    /// Omori ensemble with the given parameters and the configured attempt cap.
    pub fn omori_times<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ncat: usize,
        nevents: usize,
        params: &OmoriParams,
        detect: Option<&dyn DetectionProbability>,
    ) -> Result<CatalogEnsemble> {
        omori_times(rng, ncat, nevents, params, detect, self.max_attempts_per_event)
    }

    /// Omori ensemble with the configured parameters.
    pub fn default_omori<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ncat: usize,
        nevents: usize,
    ) -> Result<CatalogEnsemble> {
        self.omori_times(rng, ncat, nevents, &self.omori, None)
    }

    /// `ncat` homogeneous catalogs on `[0, ttot)`.
    pub fn homogeneous<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ncat: usize,
        nevents: usize,
    ) -> Result<CatalogEnsemble> {
        if ncat == 0 {
            return Err(Error::invalid("ncat", 0.0, "must be > 0"));
        }
        let rows = (0..ncat)
            .map(|_| random_times(rng, nevents, 0.0, self.ttot))
            .collect::<Result<Vec<_>>>()?;
        CatalogEnsemble::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn params() -> OmoriParams {
        OmoriParams::new(1.0, 100.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn omori_shape_and_ordering() {
        let ens = omori_times(&mut seeded(1), 5, 40, &params(), None, 10).unwrap();
        assert_eq!(ens.shape(), (5, 40));
        for row in ens.rows() {
            assert_eq!(row.len(), 40);
            assert!(row.windows(2).all(|w| w[0] <= w[1]));
            assert!(row.iter().all(|&t| (1.0..=100.0).contains(&t)));
        }
    }

    #[test]
    fn omori_rejects_invalid_parameters() {
        let mut rng = seeded(2);
        assert!(matches!(
            omori_times(&mut rng, 0, 10, &params(), None, 10),
            Err(Error::InvalidParameter { name: "ncat", .. })
        ));
        assert!(matches!(
            omori_times(&mut rng, 1, 0, &params(), None, 10),
            Err(Error::InvalidParameter { name: "nevents", .. })
        ));
        assert!(OmoriParams::new(0.0, 10.0, 1.0, 1.0).is_err());
        assert!(OmoriParams::new(5.0, 5.0, 1.0, 1.0).is_err());
        assert!(OmoriParams::new(1.0, 10.0, 0.0, 1.0).is_err());
        assert!(OmoriParams::new(1.0, 10.0, 1.0, -0.5).is_err());
    }

    #[test]
    fn quantile_hits_both_ends() {
        for p in [0.5, 1.0, 1.5] {
            let params = OmoriParams::new(2.0, 50.0, 0.5, p).unwrap();
            assert!((params.quantile(0.0) - 2.0).abs() < 1e-9);
            assert!((params.quantile(1.0) - 50.0).abs() < 1e-9);
            assert!(params.quantile(0.3) < params.quantile(0.7));
        }
    }

    #[test]
    fn omori_decay_front_loads_events() {
        // With p=1, b=1 on [1, 100], half the mass lies below sqrt(2*101) - 1 ≈ 13.2.
        let ens = omori_times(&mut seeded(3), 20, 100, &params(), None, 10).unwrap();
        let early = ens.as_slice().iter().filter(|&&t| t < 13.2).count();
        let frac = early as f64 / ens.as_slice().len() as f64;
        assert!((frac - 0.5).abs() < 0.05, "frac={frac}");
    }

    #[test]
    fn quantile_inverts_power_law_cdf() {
        for p in [0.5, 1.5, 2.5] {
            let params = OmoriParams::new(2.0, 50.0, 0.5, p).unwrap();
            let q = p - 1.0;
            let lo = (params.b + params.tmin).powf(-q);
            let hi = (params.b + params.tmax).powf(-q);
            let cdf = |t: f64| (lo - (params.b + t).powf(-q)) / (lo - hi);
            for u in [0.1, 0.25, 0.5, 0.9] {
                let t = params.quantile(u);
                assert!((cdf(t) - u).abs() < 1e-12, "p={p} u={u} t={t}");
            }
        }
    }

    #[test]
    fn steeper_decay_median_matches_cdf() {
        // p=1.5, b=1 on [1, 100]: (1+m)^-1/2 = (2^-1/2 + 101^-1/2)/2, so m ≈ 5.148.
        let params = OmoriParams::new(1.0, 100.0, 1.0, 1.5).unwrap();
        let ens = omori_times(&mut seeded(6), 20, 100, &params, None, 10).unwrap();
        let early = ens.as_slice().iter().filter(|&&t| t < 5.148).count();
        let frac = early as f64 / ens.as_slice().len() as f64;
        assert!((frac - 0.5).abs() < 0.05, "frac={frac}");
    }

    #[test]
    fn detection_thinning_removes_undetectable_times() {
        let detect = |t: f64| if t < 10.0 { 0.0 } else { 1.0 };
        let ens = omori_times(&mut seeded(4), 3, 50, &params(), Some(&detect), 1_000).unwrap();
        assert!(ens.as_slice().iter().all(|&t| t >= 10.0));
    }

    #[test]
    fn zero_detection_exhausts_attempts() {
        let never = |_t: f64| 0.0;
        let err = omori_times(&mut seeded(5), 2, 3, &params(), Some(&never), 25).unwrap_err();
        assert!(matches!(
            err,
            Error::SamplingExhausted {
                attempts: 25,
                slot: 0
            }
        ));
    }

    #[test]
    fn always_detected_matches_no_model_in_distribution() {
        let ens = omori_times(&mut seeded(6), 2, 30, &params(), Some(&AlwaysDetected), 1).unwrap();
        assert_eq!(ens.shape(), (2, 30));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = omori_times(&mut seeded(9), 3, 20, &params(), None, 10).unwrap();
        let b = omori_times(&mut seeded(9), 3, 20, &params(), None, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_times_sorted_in_range() {
        let times = random_times(&mut seeded(10), 200, 5.0, 15.0).unwrap();
        assert_eq!(times.len(), 200);
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert!(times.iter().all(|&t| (5.0..15.0).contains(&t)));
        assert!(random_times(&mut seeded(10), 10, 5.0, 5.0).is_err());
        assert!(random_times(&mut seeded(10), 0, 0.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn ensemble_from_rows_checks_lengths() {
        let ens = CatalogEnsemble::from_rows(vec![vec![3.0, 1.0], vec![2.0, 4.0]]).unwrap();
        assert_eq!(ens.row(0), &[1.0, 3.0]);
        assert_eq!(ens.into_rows(), vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
        assert!(matches!(
            CatalogEnsemble::from_rows(vec![vec![1.0], vec![1.0, 2.0]]),
            Err(Error::LengthMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn generator_uses_config() {
        let config = AnalysisConfig::default().with_seed(12);
        let generator = CatalogGenerator::new(&config);
        let mut rng = rng_from_config(&config);
        let omori = generator.default_omori(&mut rng, 4, 25).unwrap();
        assert_eq!(omori.shape(), (4, 25));
        assert!(omori.as_slice().iter().all(|&t| t >= config.omori.tmin));

        let flat = generator.homogeneous(&mut rng, 3, 25).unwrap();
        assert_eq!(flat.shape(), (3, 25));
        assert!(flat.as_slice().iter().all(|&t| (0.0..100.0).contains(&t)));
    }
}
