//! # Linalg
//!
//! $$
//! \Sigma = L L^\top,\qquad \|A\|_F=\sqrt{\textstyle\sum_{ij} a_{ij}^2}
//! $$
//!
//! Thin bridge between `ndarray` storage and `nalgebra` decompositions.
use nalgebra::DMatrix;
use nalgebra::SymmetricEigen;
use ndarray::Array2;
use ndarray::ArrayView2;

use crate::error::NumericalError;

/// Relative tolerance below which a negative eigenvalue is treated as rounding noise.
pub const PSD_TOLERANCE: f64 = 1e-10;

/// Smallest eigenvalue a usable covariance may have on the correlation scale.
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Relative tolerance for symmetry checks.
pub const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// How a sampling factor was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactorKind {
  /// Lower Cholesky factor of a positive definite matrix.
  Cholesky,
  /// `V diag(sqrt(max(λ, 0)))` from a symmetric eigendecomposition.
  Eigen,
}

pub(crate) fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
  DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub(crate) fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
  Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

fn max_abs(a: ArrayView2<'_, f64>) -> f64 {
  a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Eigenvalues of a symmetric matrix, returned as `(min, max)`.
pub fn eigenvalue_range(a: ArrayView2<'_, f64>) -> (f64, f64) {
  let eigenvalues = to_dmatrix(a).symmetric_eigenvalues();
  eigenvalues
    .iter()
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
      (lo.min(v), hi.max(v))
    })
}

/// First `(row, col)` pair where `a` is not symmetric within `SYMMETRY_TOLERANCE`.
pub fn asymmetry(a: ArrayView2<'_, f64>) -> Option<(usize, usize)> {
  let scale = max_abs(a).max(1.0);
  let n = a.nrows();
  for i in 0..n {
    for j in (i + 1)..n {
      if (a[[i, j]] - a[[j, i]]).abs() > SYMMETRY_TOLERANCE * scale {
        return Some((i, j));
      }
    }
  }
  None
}

pub fn is_symmetric(a: ArrayView2<'_, f64>) -> bool {
  a.is_square() && asymmetry(a).is_none()
}

/// Positive semi-definite up to `PSD_TOLERANCE` relative to the spectral radius.
pub fn is_positive_semi_definite(a: ArrayView2<'_, f64>) -> bool {
  if !is_symmetric(a) {
    return false;
  }
  let (lo, hi) = eigenvalue_range(a);
  lo >= -PSD_TOLERANCE * hi.abs().max(lo.abs()).max(f64::MIN_POSITIVE)
}

pub fn frobenius_norm(a: ArrayView2<'_, f64>) -> f64 {
  a.iter().map(|v| v * v).sum::<f64>().sqrt()
}

pub fn frobenius_distance(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> f64 {
  a.iter()
    .zip(b.iter())
    .map(|(x, y)| (x - y) * (x - y))
    .sum::<f64>()
    .sqrt()
}

/// Matrix `L` with `L Lᵀ = cov`.
///
/// Tries Cholesky first. Singular but PSD matrices fall back to the symmetric
/// eigendecomposition with negative rounding noise clipped to zero.
pub fn sampling_factor(
  cov: ArrayView2<'_, f64>,
) -> Result<(Array2<f64>, FactorKind), NumericalError> {
  let m = to_dmatrix(cov);

  if let Some(chol) = m.clone().cholesky() {
    return Ok((from_dmatrix(&chol.l()), FactorKind::Cholesky));
  }

  let eig = SymmetricEigen::new(m);
  let (lo, hi) = eig
    .eigenvalues
    .iter()
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
      (lo.min(v), hi.max(v))
    });
  let scale = hi.abs().max(lo.abs());
  if lo < -PSD_TOLERANCE * scale {
    return Err(NumericalError::NotPositiveSemiDefinite { min_eigenvalue: lo });
  }

  let p = cov.nrows();
  let roots: Vec<f64> = eig.eigenvalues.iter().map(|&l| l.max(0.0).sqrt()).collect();
  let factor = Array2::from_shape_fn((p, p), |(i, j)| eig.eigenvectors[(i, j)] * roots[j]);

  Ok((factor, FactorKind::Eigen))
}

/// Reject covariance estimates that cannot be inverted.
///
/// Fewer observations than `dimension + 1` always gives a rank-deficient estimate.
/// Otherwise the estimate is singular only if a variance is zero or non-finite, or
/// the implied correlation matrix has a vanishing eigenvalue. Working on the
/// correlation scale keeps badly scaled but full-rank estimates valid.
pub fn ensure_nonsingular(
  cov: ArrayView2<'_, f64>,
  observations: usize,
) -> Result<(), NumericalError> {
  let dimension = cov.nrows();
  let singular = NumericalError::SingularCovariance {
    observations,
    dimension,
  };

  if observations <= dimension {
    return Err(singular);
  }
  if cov.iter().any(|v| !v.is_finite()) {
    return Err(singular);
  }

  let diag = cov.diag();
  if diag.iter().any(|&v| v <= 0.0) {
    return Err(singular);
  }

  let scale: Vec<f64> = diag.iter().map(|v| v.sqrt()).collect();
  let corr = Array2::from_shape_fn((dimension, dimension), |(i, j)| {
    cov[[i, j]] / (scale[i] * scale[j])
  });
  let (lo, _) = eigenvalue_range(corr.view());
  if !(lo > SINGULARITY_TOLERANCE) {
    return Err(singular);
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn cholesky_factor_reconstructs_covariance() {
    let cov = array![[0.04, 0.01], [0.01, 0.09]];
    let (l, kind) = sampling_factor(cov.view()).unwrap();

    assert_eq!(kind, FactorKind::Cholesky);
    assert_abs_diff_eq!(l[[0, 1]], 0.0);
    let rebuilt = l.dot(&l.t());
    assert!(frobenius_distance(rebuilt.view(), cov.view()) < 1e-14);
  }

  #[test]
  fn singular_psd_matrix_uses_eigen_fallback() {
    // rank one: every row is a multiple of [1, 2]
    let cov = array![[1.0, 2.0], [2.0, 4.0]];
    let (l, kind) = sampling_factor(cov.view()).unwrap();

    assert_eq!(kind, FactorKind::Eigen);
    let rebuilt = l.dot(&l.t());
    assert!(frobenius_distance(rebuilt.view(), cov.view()) < 1e-12);
  }

  #[test]
  fn indefinite_matrix_is_rejected() {
    let cov = array![[1.0, 2.0], [2.0, 1.0]];
    match sampling_factor(cov.view()) {
      Err(NumericalError::NotPositiveSemiDefinite { min_eigenvalue }) => {
        assert_abs_diff_eq!(min_eigenvalue, -1.0, epsilon = 1e-12);
      }
      other => panic!("expected NotPositiveSemiDefinite, got {other:?}"),
    }
  }

  #[test]
  fn symmetry_and_psd_checks() {
    let sym = array![[2.0, 0.5], [0.5, 1.0]];
    let asym = array![[2.0, 0.5], [0.4, 1.0]];

    assert!(is_symmetric(sym.view()));
    assert!(is_positive_semi_definite(sym.view()));
    assert_eq!(asymmetry(asym.view()), Some((0, 1)));
    assert!(!is_positive_semi_definite(asym.view()));
  }

  #[test]
  fn nonsingular_check_counts_observations() {
    let cov = array![[1.0, 0.0], [0.0, 1.0]];
    assert!(ensure_nonsingular(cov.view(), 3).is_ok());
    assert_eq!(
      ensure_nonsingular(cov.view(), 2),
      Err(NumericalError::SingularCovariance {
        observations: 2,
        dimension: 2
      })
    );

    let rank_one = array![[1.0, 1.0], [1.0, 1.0]];
    assert!(ensure_nonsingular(rank_one.view(), 50).is_err());

    let zero_variance = array![[1.0, 0.0], [0.0, 0.0]];
    assert!(ensure_nonsingular(zero_variance.view(), 50).is_err());

    let non_finite = array![[1.0, f64::NAN], [f64::NAN, 1.0]];
    assert!(ensure_nonsingular(non_finite.view(), 50).is_err());
  }

  #[test]
  fn badly_scaled_full_rank_covariance_is_accepted() {
    let cov = array![[1.0, 0.0], [0.0, 1e-13]];
    assert!(ensure_nonsingular(cov.view(), 10).is_ok());

    let correlated = array![[1.0, 0.5e-6], [0.5e-6, 1e-12]];
    assert!(ensure_nonsingular(correlated.view(), 10).is_ok());
  }

  #[test]
  fn frobenius_helpers() {
    let a = array![[3.0, 0.0], [0.0, 4.0]];
    let b = Array2::<f64>::zeros((2, 2));
    assert_abs_diff_eq!(frobenius_norm(a.view()), 5.0);
    assert_abs_diff_eq!(frobenius_distance(a.view(), b.view()), 5.0);
  }
}
