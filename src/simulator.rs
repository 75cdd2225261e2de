//! # Observation Simulator
//!
//! $$
//! X^{(k)}\overset{iid}{\sim}\mathcal N(\mu,\Sigma)^{\otimes n},\qquad
//! (\hat\mu^{(k)},\hat\Sigma^{(k)})=\mathcal E\big(X^{(k)}\big),\quad k=1,2,\dots
//! $$
//!
//! Draws empirical means and covariances around fixed true parameters, see
//! section 4.1 of "A Robust Estimator of the Efficient Frontier"
//! (Lopez de Prado, 2019).
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::ConfigurationError;
use crate::error::SimulationError;
use crate::estimators::EstimatorExt;
use crate::estimators::Jackknife;
use crate::estimators::LedoitWolf;
use crate::estimators::SampleMoments;
use crate::params::Estimate;
use crate::params::TrueParameters;

/// Capability shared by every observation simulator.
pub trait SimulatorExt {
  /// Dimensionality `p` of the estimates.
  fn dim(&self) -> usize;

  /// Observations drawn per call.
  fn n_observations(&self) -> usize;

  /// Draw a fresh sample and reduce it to an estimate.
  fn simulate(&mut self) -> Result<Estimate, SimulationError>;

  /// `m` consecutive draws; stops at the first failure.
  fn simulate_n(&mut self, m: usize) -> Result<Vec<Estimate>, SimulationError> {
    (0..m).map(|_| self.simulate()).collect()
  }
}

/// Construction settings for an [`ObservationSimulator`] seeded with [`StdRng`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulatorConfig {
  /// Observations drawn per `simulate` call.
  pub n_observations: usize,
  /// Generator seed; `None` seeds from OS entropy.
  pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
  fn default() -> Self {
    Self {
      n_observations: 100,
      seed: None,
    }
  }
}

/// Samples `n_observations` draws from `params` and reduces them with `estimator`.
///
/// The generator is owned, so simulators never share random state.
#[derive(Clone, Debug)]
pub struct ObservationSimulator<'a, E, R = StdRng> {
  params: &'a TrueParameters,
  estimator: E,
  n_observations: usize,
  rng: R,
}

/// Plain sample mean and covariance.
pub type MuCovObservationSimulator<'a, R = StdRng> = ObservationSimulator<'a, SampleMoments, R>;

/// Sample mean with Ledoit-Wolf shrunk covariance.
pub type MuCovLedoitWolfObservationSimulator<'a, R = StdRng> =
  ObservationSimulator<'a, LedoitWolf, R>;

/// Leave-one-out averaged mean and covariance.
pub type MuCovJackknifeObservationSimulator<'a, R = StdRng> =
  ObservationSimulator<'a, Jackknife, R>;

impl<'a, E: EstimatorExt> ObservationSimulator<'a, E, StdRng> {
  /// Simulator seeded from OS entropy.
  pub fn new(
    params: &'a TrueParameters,
    estimator: E,
    n_observations: usize,
  ) -> Result<Self, SimulationError> {
    Self::with_rng(params, estimator, n_observations, StdRng::from_entropy())
  }

  /// Reproducible simulator.
  pub fn with_seed(
    params: &'a TrueParameters,
    estimator: E,
    n_observations: usize,
    seed: u64,
  ) -> Result<Self, SimulationError> {
    Self::with_rng(
      params,
      estimator,
      n_observations,
      StdRng::seed_from_u64(seed),
    )
  }

  pub fn from_config(
    params: &'a TrueParameters,
    estimator: E,
    cfg: SimulatorConfig,
  ) -> Result<Self, SimulationError> {
    match cfg.seed {
      Some(seed) => Self::with_seed(params, estimator, cfg.n_observations, seed),
      None => Self::new(params, estimator, cfg.n_observations),
    }
  }
}

impl<'a, E: EstimatorExt, R: Rng> ObservationSimulator<'a, E, R> {
  /// Simulator driven by a caller-supplied generator.
  pub fn with_rng(
    params: &'a TrueParameters,
    estimator: E,
    n_observations: usize,
    rng: R,
  ) -> Result<Self, SimulationError> {
    if n_observations == 0 {
      return Err(ConfigurationError::ZeroSampleSize.into());
    }

    Ok(Self {
      params,
      estimator,
      n_observations,
      rng,
    })
  }

  pub fn params(&self) -> &'a TrueParameters {
    self.params
  }

  pub fn estimator(&self) -> &E {
    &self.estimator
  }

  /// Hand back the generator, e.g. to continue a stream elsewhere.
  pub fn into_rng(self) -> R {
    self.rng
  }

  /// `m` draws evaluated in parallel.
  ///
  /// Draw `k` uses its own [`StdRng`] seeded from `(seed, k)`, so the output does
  /// not depend on the thread count and the owned generator is left untouched.
  pub fn simulate_par(&self, m: usize, seed: u64) -> Result<Vec<Estimate>, SimulationError> {
    let params = self.params;
    let estimator = &self.estimator;
    let n = self.n_observations;

    (0..m)
      .into_par_iter()
      .map(|k| {
        let mut rng = StdRng::seed_from_u64(draw_seed(seed, k));
        let sample = params.sample(n, &mut rng);
        estimator.estimate(sample.view())
      })
      .collect()
  }
}

/// SplitMix64 step so neighbouring draws get well separated seeds.
fn draw_seed(seed: u64, k: usize) -> u64 {
  let mut z = seed.wrapping_add((k as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

impl<'a, E: EstimatorExt, R: Rng> SimulatorExt for ObservationSimulator<'a, E, R> {
  fn dim(&self) -> usize {
    self.params.dim()
  }

  fn n_observations(&self) -> usize {
    self.n_observations
  }

  fn simulate(&mut self) -> Result<Estimate, SimulationError> {
    tracing::trace!(
      estimator = self.estimator.name(),
      n_observations = self.n_observations,
      dim = self.params.dim(),
      "simulate"
    );
    let sample = self.params.sample(self.n_observations, &mut self.rng);
    self.estimator.estimate(sample.view())
  }
}
