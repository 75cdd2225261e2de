//! # Parameters
//!
//! $$
//! (\mu,\Sigma)\ \xrightarrow{\ \text{sample}\ }\ X\in\mathbb R^{n\times p}\ \xrightarrow{\ \text{estimate}\ }\ (\hat\mu,\hat\Sigma)
//! $$
//!
//! True parameters of the simulated market and the estimate pairs reduced from samples.
use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::Axis;
use rand::Rng;

use crate::error::ConfigurationError;
use crate::error::SimulationError;
use crate::linalg::asymmetry;
use crate::linalg::frobenius_distance;
use crate::sampling::MultivariateNormal;

/// Assumed ground-truth distribution of asset returns.
///
/// Validated once on construction and immutable afterwards. Simulators borrow it.
#[derive(Clone, Debug)]
pub struct TrueParameters {
  cov: Array2<f64>,
  mvn: MultivariateNormal,
}

impl TrueParameters {
  /// Checks shape, finiteness, symmetry and positive semi-definiteness of `(mean, cov)`.
  pub fn new(mean: Array1<f64>, cov: Array2<f64>) -> Result<Self, SimulationError> {
    let p = mean.len();
    if p == 0 {
      return Err(ConfigurationError::EmptyParameters.into());
    }
    if cov.nrows() != p || cov.ncols() != p {
      return Err(
        ConfigurationError::DimensionMismatch {
          mean: p,
          rows: cov.nrows(),
          cols: cov.ncols(),
        }
        .into(),
      );
    }
    if mean.iter().chain(cov.iter()).any(|v| !v.is_finite()) {
      return Err(ConfigurationError::NonFiniteParameter.into());
    }
    if let Some((row, col)) = asymmetry(cov.view()) {
      return Err(ConfigurationError::AsymmetricCovariance { row, col }.into());
    }

    let mvn = MultivariateNormal::new(mean, cov.view())?;
    Ok(Self { cov, mvn })
  }

  /// Build from nested rows, the layout most callers already hold.
  pub fn from_rows(mean: &[f64], cov: &[Vec<f64>]) -> Result<Self, SimulationError> {
    let rows = cov.len();
    let cols = cov.first().map(|r| r.len()).unwrap_or(0);
    if cov.iter().any(|r| r.len() != cols) {
      return Err(
        ConfigurationError::DimensionMismatch {
          mean: mean.len(),
          rows,
          cols,
        }
        .into(),
      );
    }

    let flat: Vec<f64> = cov.iter().flatten().copied().collect();
    let cov = Array2::from_shape_vec((rows, cols), flat).map_err(|_| {
      ConfigurationError::DimensionMismatch {
        mean: mean.len(),
        rows,
        cols,
      }
    })?;
    Self::new(Array1::from(mean.to_vec()), cov)
  }

  /// Dimensionality `p`.
  pub fn dim(&self) -> usize {
    self.mvn.dim()
  }

  pub fn mean(&self) -> ArrayView1<'_, f64> {
    self.mvn.mean()
  }

  pub fn cov(&self) -> ArrayView2<'_, f64> {
    self.cov.view()
  }

  pub fn distribution(&self) -> &MultivariateNormal {
    &self.mvn
  }

  /// Draw an `n x p` sample of observations.
  pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array2<f64> {
    self.mvn.sample_matrix(n, rng)
  }
}

/// Estimated expected-return vector and covariance matrix.
#[derive(ImplNew, Clone, Debug, PartialEq)]
pub struct Estimate {
  /// Estimated mean, length `p`.
  pub mean: Array1<f64>,
  /// Estimated covariance, `p x p`.
  pub cov: Array2<f64>,
}

impl Estimate {
  pub fn dim(&self) -> usize {
    self.mean.len()
  }

  /// Mean as a `p x 1` column.
  pub fn mean_column(&self) -> Array2<f64> {
    self.mean.clone().insert_axis(Axis(1))
  }

  /// Distance of this estimate from the parameters it was drawn from.
  pub fn error_against(&self, truth: &TrueParameters) -> Result<EstimationError, SimulationError> {
    if self.dim() != truth.dim() || self.cov.dim() != (truth.dim(), truth.dim()) {
      return Err(
        ConfigurationError::DimensionMismatch {
          mean: truth.dim(),
          rows: self.cov.nrows(),
          cols: self.cov.ncols(),
        }
        .into(),
      );
    }

    let mean_error = self
      .mean
      .iter()
      .zip(truth.mean().iter())
      .map(|(a, b)| (a - b) * (a - b))
      .sum::<f64>()
      .sqrt();

    Ok(EstimationError {
      mean_error,
      cov_error: frobenius_distance(self.cov.view(), truth.cov()),
    })
  }
}

/// Euclidean mean error and Frobenius covariance error of one estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EstimationError {
  pub mean_error: f64,
  pub cov_error: f64,
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;
  use crate::error::NumericalError;

  #[test]
  fn rejects_dimension_mismatch() {
    let err = TrueParameters::new(array![0.1, 0.2], Array2::eye(3)).unwrap_err();
    assert_eq!(
      err,
      SimulationError::Configuration(ConfigurationError::DimensionMismatch {
        mean: 2,
        rows: 3,
        cols: 3
      })
    );
  }

  #[test]
  fn rejects_non_square_covariance() {
    let err = TrueParameters::new(array![0.1, 0.2], Array2::zeros((2, 3))).unwrap_err();
    assert!(err.is_configuration());
  }

  #[test]
  fn rejects_ragged_rows() {
    let err = TrueParameters::from_rows(&[0.1, 0.2], &[vec![1.0, 0.0], vec![0.0]]).unwrap_err();
    assert!(err.is_configuration());
  }

  #[test]
  fn rejects_empty_and_non_finite() {
    assert_eq!(
      TrueParameters::new(Array1::zeros(0), Array2::zeros((0, 0))).unwrap_err(),
      SimulationError::Configuration(ConfigurationError::EmptyParameters)
    );
    assert_eq!(
      TrueParameters::new(array![f64::NAN], array![[1.0]]).unwrap_err(),
      SimulationError::Configuration(ConfigurationError::NonFiniteParameter)
    );
  }

  #[test]
  fn rejects_asymmetric_and_indefinite_covariance() {
    let err = TrueParameters::new(array![0.0, 0.0], array![[1.0, 0.3], [0.1, 1.0]]).unwrap_err();
    assert_eq!(
      err,
      SimulationError::Configuration(ConfigurationError::AsymmetricCovariance { row: 0, col: 1 })
    );

    let err = TrueParameters::new(array![0.0, 0.0], array![[1.0, 3.0], [3.0, 1.0]]).unwrap_err();
    assert!(matches!(
      err,
      SimulationError::Numerical(NumericalError::NotPositiveSemiDefinite { .. })
    ));
  }

  #[test]
  fn from_rows_matches_array_constructor() {
    let p = TrueParameters::from_rows(&[0.05, 0.03], &[vec![0.04, 0.01], vec![0.01, 0.09]]).unwrap();
    assert_eq!(p.dim(), 2);
    assert_eq!(p.mean(), array![0.05, 0.03].view());
    assert_eq!(p.cov(), array![[0.04, 0.01], [0.01, 0.09]].view());
  }

  #[test]
  fn estimate_reports_errors_and_column_shape() {
    let truth = TrueParameters::new(array![0.0, 0.0], Array2::eye(2)).unwrap();
    let est = Estimate::new(array![3.0, 4.0], array![[1.0, 0.0], [0.0, 3.0]]);

    assert_eq!(est.mean_column().dim(), (2, 1));
    let err = est.error_against(&truth).unwrap();
    assert_abs_diff_eq!(err.mean_error, 5.0);
    assert_abs_diff_eq!(err.cov_error, 2.0);

    let other = Estimate::new(array![0.0], array![[1.0]]);
    assert!(other.error_against(&truth).is_err());
  }
}
