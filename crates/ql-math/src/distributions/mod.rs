//! Probability distributions used by the pricing engines and path
//! generators, delegating special functions to `statrs`.

pub mod normal;
pub mod poisson;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use poisson::{InverseCumulativePoisson, PoissonDistribution};
