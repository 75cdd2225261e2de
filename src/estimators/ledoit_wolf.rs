//! # Ledoit-Wolf
//!
//! $$
//! \hat\Sigma_{LW}=(1-\delta^\*)\,S+\delta^\*\,\frac{\operatorname{tr}S}{p}\,I_p
//! $$
//!
//! Shrinkage of the empirical covariance toward a scaled identity, with the
//! intensity $\delta^\*$ minimizing the expected Frobenius loss.
//!
//! Source:
//! - Ledoit & Wolf (2004), "A well-conditioned estimator for large-dimensional covariance matrices"
//!   https://doi.org/10.1016/S0047-259X(03)00096-4
use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView2;
use ndarray::Axis;

use super::sample_moments::symmetrize;
use super::EstimatorExt;
use crate::error::NumericalError;
use crate::error::SimulationError;
use crate::params::Estimate;

/// Sample mean with Ledoit-Wolf shrunk covariance.
#[derive(ImplNew, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedoitWolf {
  /// Treat the sample as already centered at zero when computing the covariance.
  pub assume_centered: bool,
}

/// Shrunk covariance together with the intensity that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShrunkCovariance {
  pub covariance: Array2<f64>,
  /// Weight on the scaled-identity target, in `[0, 1]`.
  pub shrinkage: f64,
  /// Column means of the sample (zeros when `assume_centered`).
  pub location: Array1<f64>,
}

impl LedoitWolf {
  /// Shrunk covariance of `sample`. Any `n >= 1` is accepted, including `n < p`.
  pub fn shrink(&self, sample: ArrayView2<'_, f64>) -> Result<ShrunkCovariance, NumericalError> {
    let (n, p) = sample.dim();
    let location = sample
      .mean_axis(Axis(0))
      .ok_or(NumericalError::InsufficientObservations {
        required: 1,
        actual: n,
      })?;
    let location = if self.assume_centered {
      Array1::zeros(p)
    } else {
      location
    };

    let x = &sample - &location;
    let n_f = n as f64;
    let p_f = p as f64;

    let xtx = x.t().dot(&x);
    let emp_cov = symmetrize(&xtx / n_f);

    let shrinkage = if p == 1 {
      0.0
    } else {
      let x2 = x.mapv(|v| v * v);
      let emp_cov_trace = x2.sum_axis(Axis(0)) / n_f;
      let trace_sum = emp_cov_trace.sum();
      let mu = trace_sum / p_f;

      let beta_ = x2.t().dot(&x2).sum();
      let delta_ = xtx.mapv(|v| v * v).sum() / (n_f * n_f);

      let beta = (beta_ / n_f - delta_) / (p_f * n_f);
      let delta = (delta_ - 2.0 * mu * trace_sum + p_f * mu * mu) / p_f;
      // beta >= 0 up to rounding
      let beta = beta.min(delta).max(0.0);

      if beta == 0.0 {
        0.0
      } else {
        beta / delta
      }
    };

    let mu = emp_cov.diag().sum() / p_f;
    let mut covariance = emp_cov * (1.0 - shrinkage);
    covariance.diag_mut().mapv_inplace(|v| v + shrinkage * mu);

    tracing::debug!(n, p, shrinkage, "ledoit-wolf shrinkage intensity");

    Ok(ShrunkCovariance {
      covariance,
      shrinkage,
      location,
    })
  }
}

impl EstimatorExt for LedoitWolf {
  fn name(&self) -> &'static str {
    "ledoit-wolf"
  }

  fn estimate(&self, sample: ArrayView2<'_, f64>) -> Result<Estimate, SimulationError> {
    let shrunk = self.shrink(sample)?;
    let mean = if self.assume_centered {
      sample
        .mean_axis(Axis(0))
        .ok_or(NumericalError::InsufficientObservations {
          required: 1,
          actual: 0,
        })?
    } else {
      shrunk.location
    };

    Ok(Estimate::new(mean, shrunk.covariance))
  }
}
