//! # Sample Moments
//!
//! $$
//! \hat\mu=\frac1n\sum_{i=1}^n x_i,\qquad
//! \hat\Sigma=\frac1{n-1}\sum_{i=1}^n (x_i-\hat\mu)(x_i-\hat\mu)^\top
//! $$
//!
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndarray_stats::CorrelationExt;

use super::EstimatorExt;
use crate::error::NumericalError;
use crate::error::SimulationError;
use crate::linalg::ensure_nonsingular;
use crate::params::Estimate;

/// Plain sample mean and unbiased sample covariance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SampleMoments;

/// Column mean and unbiased covariance without any conditioning check.
pub(crate) fn mean_and_cov(
  sample: ArrayView2<'_, f64>,
) -> Result<(Array1<f64>, Array2<f64>), NumericalError> {
  let n = sample.nrows();
  let insufficient = NumericalError::InsufficientObservations {
    required: 2,
    actual: n,
  };
  if n < 2 {
    return Err(insufficient);
  }

  let mean = sample
    .mean_axis(Axis(0))
    .ok_or_else(|| insufficient.clone())?;
  // ndarray-stats expects variables in rows
  let cov = sample.t().cov(1.0).map_err(|_| insufficient)?;

  Ok((mean, symmetrize(cov)))
}

pub(crate) fn symmetrize(a: Array2<f64>) -> Array2<f64> {
  (&a + &a.t()) * 0.5
}

impl EstimatorExt for SampleMoments {
  fn name(&self) -> &'static str {
    "sample-moments"
  }

  fn estimate(&self, sample: ArrayView2<'_, f64>) -> Result<Estimate, SimulationError> {
    let (mean, cov) = mean_and_cov(sample)?;
    ensure_nonsingular(cov.view(), sample.nrows())?;
    Ok(Estimate::new(mean, cov))
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn matches_hand_computed_moments() {
    let x = array![[1.0, 2.0], [3.0, 6.0], [5.0, 4.0]];
    let est = SampleMoments.estimate(x.view()).unwrap();

    assert_abs_diff_eq!(est.mean[0], 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(est.mean[1], 4.0, epsilon = 1e-12);
    // deviations: x0 = [-2, 0, 2], x1 = [-2, 2, 0]
    assert_abs_diff_eq!(est.cov[[0, 0]], 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(est.cov[[1, 1]], 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(est.cov[[0, 1]], 2.0, epsilon = 1e-12);
    assert_eq!(est.cov[[0, 1]], est.cov[[1, 0]]);
  }

  #[test]
  fn too_few_observations_is_singular() {
    let x = array![[1.0, 2.0], [3.0, 6.0]];
    assert_eq!(
      SampleMoments.estimate(x.view()).unwrap_err(),
      SimulationError::Numerical(NumericalError::SingularCovariance {
        observations: 2,
        dimension: 2
      })
    );
  }

  #[test]
  fn single_observation_is_insufficient() {
    let x = array![[1.0, 2.0]];
    assert_eq!(
      mean_and_cov(x.view()).unwrap_err(),
      NumericalError::InsufficientObservations {
        required: 2,
        actual: 1
      }
    );
  }

  #[test]
  fn collinear_sample_is_singular() {
    // second column is exactly twice the first
    let x = array![[1.0, 2.0], [2.0, 4.0], [4.0, 8.0], [-1.0, -2.0]];
    assert!(SampleMoments.estimate(x.view()).unwrap_err().is_numerical());
  }
}
