//! # Sampling
//!
//! $$
//! X = \mu + L Z,\qquad Z\sim\mathcal N(0, I_p),\quad LL^\top=\Sigma
//! $$
//!
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Distribution;
use rand_distr::StandardNormal;

use crate::error::NumericalError;
use crate::linalg::sampling_factor;
use crate::linalg::FactorKind;

/// Multivariate normal distribution with a precomputed sampling factor.
#[derive(Clone, Debug)]
pub struct MultivariateNormal {
  mean: Array1<f64>,
  factor: Array2<f64>,
  factor_kind: FactorKind,
}

impl MultivariateNormal {
  /// Factorizes `cov` once; dimensions are assumed consistent with `mean`.
  pub fn new(mean: Array1<f64>, cov: ArrayView2<'_, f64>) -> Result<Self, NumericalError> {
    let (factor, factor_kind) = sampling_factor(cov)?;
    tracing::debug!(dim = mean.len(), ?factor_kind, "factorized covariance");

    Ok(Self {
      mean,
      factor,
      factor_kind,
    })
  }

  pub fn dim(&self) -> usize {
    self.mean.len()
  }

  pub fn mean(&self) -> ArrayView1<'_, f64> {
    self.mean.view()
  }

  /// Lower factor `L` with `L Lᵀ = Σ`.
  pub fn factor(&self) -> ArrayView2<'_, f64> {
    self.factor.view()
  }

  pub fn factor_kind(&self) -> FactorKind {
    self.factor_kind
  }

  /// Draw `n` observations as rows of an `n x p` matrix.
  pub fn sample_matrix<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array2<f64> {
    let z = Array2::<f64>::random_using((n, self.dim()), StandardNormal, rng);
    z.dot(&self.factor.t()) + &self.mean
  }
}

impl Distribution<Array1<f64>> for MultivariateNormal {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
    let z = Array1::<f64>::random_using(self.dim(), StandardNormal, rng);
    self.factor.dot(&z) + &self.mean
  }
}
