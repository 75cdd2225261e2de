//! # Error
//!
//! $$
//! \text{SimulationError}=\text{ConfigurationError}\ \cup\ \text{NumericalError}
//! $$
//!
//! Errors are never recovered internally; every failure surfaces to the caller.
use thiserror::Error;

/// Invalid simulator configuration, detected at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
  /// Mean vector has no entries.
  #[error("true parameters must have at least one dimension")]
  EmptyParameters,

  /// Mean length and covariance shape disagree, or the covariance is not square.
  #[error("dimension mismatch: mean has length {mean}, covariance is {rows}x{cols}")]
  DimensionMismatch {
    /// Length of the mean vector.
    mean: usize,
    /// Covariance rows.
    rows: usize,
    /// Covariance columns.
    cols: usize,
  },

  /// A mean or covariance entry is NaN or infinite.
  #[error("true parameters contain non-finite values")]
  NonFiniteParameter,

  /// `cov[row, col]` differs from `cov[col, row]` beyond tolerance.
  #[error("covariance matrix is not symmetric at ({row}, {col})")]
  AsymmetricCovariance {
    /// Row index of the offending entry.
    row: usize,
    /// Column index of the offending entry.
    col: usize,
  },

  /// Sample size must be positive.
  #[error("sample size must be at least 1")]
  ZeroSampleSize,
}

/// Failure of the underlying linear algebra or statistics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
  /// True covariance has a materially negative eigenvalue, so it cannot be sampled from.
  #[error("covariance matrix is not positive semi-definite (min eigenvalue {min_eigenvalue:e})")]
  NotPositiveSemiDefinite {
    /// Smallest eigenvalue found.
    min_eigenvalue: f64,
  },

  /// Too few observations for the requested statistic.
  #[error("insufficient observations: need at least {required}, got {actual}")]
  InsufficientObservations {
    /// Minimum number of observations.
    required: usize,
    /// Observations available.
    actual: usize,
  },

  /// Estimated covariance is singular.
  #[error("sample covariance is singular ({observations} observations in {dimension} dimensions)")]
  SingularCovariance {
    /// Observations used in the estimate.
    observations: usize,
    /// Dimensionality of the estimate.
    dimension: usize,
  },
}

/// Top-level error returned by every simulator operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
  #[error(transparent)]
  Configuration(#[from] ConfigurationError),
  #[error(transparent)]
  Numerical(#[from] NumericalError),
}

impl SimulationError {
  /// `true` for errors of the numerical family.
  pub fn is_numerical(&self) -> bool {
    matches!(self, SimulationError::Numerical(_))
  }

  /// `true` for errors of the configuration family.
  pub fn is_configuration(&self) -> bool {
    matches!(self, SimulationError::Configuration(_))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wraps_families_via_from() {
    let err: SimulationError = ConfigurationError::ZeroSampleSize.into();
    assert!(err.is_configuration());
    assert!(!err.is_numerical());

    let err: SimulationError = NumericalError::SingularCovariance {
      observations: 2,
      dimension: 2,
    }
    .into();
    assert!(err.is_numerical());
  }

  #[test]
  fn display_is_transparent() {
    let err: SimulationError = ConfigurationError::DimensionMismatch {
      mean: 2,
      rows: 3,
      cols: 3,
    }
    .into();
    assert_eq!(
      err.to_string(),
      "dimension mismatch: mean has length 2, covariance is 3x3"
    );
  }
}
