//! # mcos
//!
//! Observation simulators for Monte Carlo optimization selection
//! ("A Robust Estimator of the Efficient Frontier", Lopez de Prado).
//!
//! A simulator holds fixed true parameters $(\mu,\Sigma)$ and a sample size $n$.
//! Every call to [`SimulatorExt::simulate`] draws a fresh $n\times p$ sample from
//! $\mathcal N(\mu,\Sigma)$ and reduces it to an estimate $(\hat\mu,\hat\Sigma)$.
//! Repeating this builds the distribution of estimation error that downstream
//! optimizer comparisons consume.
//!
//! ## Modules
//!
//! | Module           | Description                                                                 |
//! |------------------|-----------------------------------------------------------------------------|
//! | [`simulator`]    | The `simulate` capability, the generic simulator and its three named variants. |
//! | [`estimators`]   | Sample moments, Ledoit-Wolf shrinkage and jackknife estimation policies.     |
//! | [`params`]       | Validated true parameters and estimate pairs.                                |
//! | [`sampling`]     | Multivariate normal sampling through a cached covariance factor.             |
//! | [`linalg`]       | Factorizations, symmetry/PSD checks and Frobenius distances.                 |
//! | [`error`]        | Configuration and numerical error taxonomy.                                  |
//!
//! ## Example
//!
//! ```ignore
//! use mcos::prelude::*;
//! use ndarray::array;
//!
//! let params = TrueParameters::new(array![0.05, 0.03], array![[0.04, 0.01], [0.01, 0.09]])?;
//! let mut sim = MuCovLedoitWolfObservationSimulator::with_seed(&params, LedoitWolf::default(), 250, 42)?;
//! let estimate = sim.simulate()?;
//! ```
pub mod error;
pub mod estimators;
pub mod linalg;
pub mod params;
pub mod sampling;
pub mod simulator;

pub mod prelude {
  pub use crate::error::ConfigurationError;
  pub use crate::error::NumericalError;
  pub use crate::error::SimulationError;
  pub use crate::estimators::EstimatorExt;
  pub use crate::estimators::EstimatorKind;
  pub use crate::estimators::Jackknife;
  pub use crate::estimators::LedoitWolf;
  pub use crate::estimators::SampleMoments;
  pub use crate::params::Estimate;
  pub use crate::params::EstimationError;
  pub use crate::params::TrueParameters;
  pub use crate::sampling::MultivariateNormal;
  pub use crate::simulator::MuCovJackknifeObservationSimulator;
  pub use crate::simulator::MuCovLedoitWolfObservationSimulator;
  pub use crate::simulator::MuCovObservationSimulator;
  pub use crate::simulator::ObservationSimulator;
  pub use crate::simulator::SimulatorConfig;
  pub use crate::simulator::SimulatorExt;
}

pub use simulator::SimulatorExt;
