//! # Estimators
//!
//! $$
//! \mathcal E: X\in\mathbb R^{n\times p}\mapsto(\hat\mu,\hat\Sigma)
//! $$
//!
//! Policies that reduce one sample of observations to an estimate pair.
//!
//! | Policy            | Covariance                                   | Minimum `n`     |
//! |-------------------|----------------------------------------------|-----------------|
//! | [`SampleMoments`] | unbiased sample covariance                   | `p + 1`         |
//! | [`LedoitWolf`]    | shrinkage toward `μ I` with optimal intensity | `1`             |
//! | [`Jackknife`]     | average of leave-one-out covariances          | `max(3, p + 1)` |
use ndarray::ArrayView2;

use crate::error::SimulationError;
use crate::params::Estimate;

pub mod jackknife;
pub mod ledoit_wolf;
pub mod sample_moments;

pub use jackknife::Jackknife;
pub use ledoit_wolf::LedoitWolf;
pub use ledoit_wolf::ShrunkCovariance;
pub use sample_moments::SampleMoments;

/// Reduction of an `n x p` sample (rows are observations) to an [`Estimate`].
pub trait EstimatorExt: Send + Sync {
  /// Short identifier used in logs.
  fn name(&self) -> &'static str;

  fn estimate(&self, sample: ArrayView2<'_, f64>) -> Result<Estimate, SimulationError>;
}

impl<E: EstimatorExt + ?Sized> EstimatorExt for Box<E> {
  fn name(&self) -> &'static str {
    (**self).name()
  }

  fn estimate(&self, sample: ArrayView2<'_, f64>) -> Result<Estimate, SimulationError> {
    (**self).estimate(sample)
  }
}

/// Estimation policy chosen at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EstimatorKind {
  #[default]
  SampleMoments,
  LedoitWolf,
  Jackknife,
}

impl EstimatorKind {
  /// Parse a policy name. Unknown names fall back to [`EstimatorKind::SampleMoments`].
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "lw" | "ledoit-wolf" | "ledoit_wolf" | "ledoitwolf" | "shrinkage" => Self::LedoitWolf,
      "jackknife" | "jack-knife" | "jk" | "leave-one-out" | "loo" => Self::Jackknife,
      "sample-moments" | "sample_moments" | "plain" => Self::SampleMoments,
      _ => Self::SampleMoments,
    }
  }
}

impl EstimatorExt for EstimatorKind {
  fn name(&self) -> &'static str {
    match self {
      EstimatorKind::SampleMoments => SampleMoments.name(),
      EstimatorKind::LedoitWolf => LedoitWolf::default().name(),
      EstimatorKind::Jackknife => Jackknife.name(),
    }
  }

  fn estimate(&self, sample: ArrayView2<'_, f64>) -> Result<Estimate, SimulationError> {
    match self {
      EstimatorKind::SampleMoments => SampleMoments.estimate(sample),
      EstimatorKind::LedoitWolf => LedoitWolf::default().estimate(sample),
      EstimatorKind::Jackknife => Jackknife.estimate(sample),
    }
  }
}
