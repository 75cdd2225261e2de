//! # Jackknife
//!
//! $$
//! \hat\mu_J=\frac1n\sum_{i=1}^n\hat\mu_{(-i)},\qquad
//! \hat\Sigma_J=\frac1n\sum_{i=1}^n\hat\Sigma_{(-i)}
//! $$
//!
//! Leave-one-out averages of the per-fold sample mean and unbiased covariance.
//!
//! Both averages coincide with the full-sample statistics: the mean trivially,
//! the covariance because the unbiased covariance is a degree-two U-statistic.
//! Summing the raw leave-one-out matrices element-wise, dividing by `n` and
//! taking one column mean also reduces to `Σx / n`, so that aggregation gives
//! the same mean as the fold average implemented here.
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView2;
use ndarray::Axis;
use rayon::prelude::*;

use super::sample_moments::mean_and_cov;
use super::EstimatorExt;
use crate::error::NumericalError;
use crate::error::SimulationError;
use crate::linalg::ensure_nonsingular;
use crate::params::Estimate;

/// Folds handled by one parallel task at least.
const MIN_CHUNK: usize = 64;

/// Upper bound on the number of partial sums held at once.
const MAX_CHUNKS: usize = 64;

/// Average of leave-one-out sample moments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Jackknife;

fn check_len(n: usize) -> Result<(), NumericalError> {
  if n < 3 {
    return Err(NumericalError::InsufficientObservations {
      required: 3,
      actual: n,
    });
  }
  Ok(())
}

fn fold_moments(
  sample: ArrayView2<'_, f64>,
  held_out: usize,
) -> Result<(Array1<f64>, Array2<f64>), NumericalError> {
  let keep: Vec<usize> = (0..sample.nrows()).filter(|&i| i != held_out).collect();
  mean_and_cov(sample.select(Axis(0), &keep).view())
}

impl Jackknife {
  /// Mean and covariance of every leave-one-out fold, in held-out index order.
  ///
  /// Holds all `n` folds in memory. [`EstimatorExt::estimate`] does not use it.
  pub fn folds(
    &self,
    sample: ArrayView2<'_, f64>,
  ) -> Result<Vec<(Array1<f64>, Array2<f64>)>, NumericalError> {
    check_len(sample.nrows())?;

    (0..sample.nrows())
      .into_par_iter()
      .map(|held_out| fold_moments(sample, held_out))
      .collect()
  }

  /// Sums of fold means and fold covariances.
  ///
  /// Folds are split into contiguous chunks that depend only on `n`. Each chunk is
  /// summed sequentially in parallel with the others, then the partial sums are
  /// added in chunk order, so the result is the same on every thread pool.
  fn fold_sums(
    &self,
    sample: ArrayView2<'_, f64>,
  ) -> Result<(Array1<f64>, Array2<f64>), NumericalError> {
    let (n, p) = sample.dim();
    check_len(n)?;

    let chunk = n.div_ceil(MAX_CHUNKS).max(MIN_CHUNK);
    let partials = (0..n.div_ceil(chunk))
      .into_par_iter()
      .map(|c| {
        let mut mean = Array1::<f64>::zeros(p);
        let mut cov = Array2::<f64>::zeros((p, p));
        for held_out in (c * chunk)..((c + 1) * chunk).min(n) {
          let (fold_mean, fold_cov) = fold_moments(sample, held_out)?;
          mean += &fold_mean;
          cov += &fold_cov;
        }
        Ok::<_, NumericalError>((mean, cov))
      })
      .collect::<Result<Vec<_>, NumericalError>>()?;

    let mut mean = Array1::<f64>::zeros(p);
    let mut cov = Array2::<f64>::zeros((p, p));
    for (partial_mean, partial_cov) in &partials {
      mean += partial_mean;
      cov += partial_cov;
    }
    Ok((mean, cov))
  }
}

impl EstimatorExt for Jackknife {
  fn name(&self) -> &'static str {
    "jackknife"
  }

  fn estimate(&self, sample: ArrayView2<'_, f64>) -> Result<Estimate, SimulationError> {
    let n = sample.nrows();
    let (mut mean, mut cov) = self.fold_sums(sample)?;
    mean /= n as f64;
    cov /= n as f64;

    ensure_nonsingular(cov.view(), n)?;
    Ok(Estimate::new(mean, cov))
  }
}
