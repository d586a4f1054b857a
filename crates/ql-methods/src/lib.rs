//! # ql-methods
//!
//! Numerical methods used by the pricing engines. Currently the Monte
//! Carlo framework: multi-factor path generation on a time grid,
//! antithetic variates and tolerance-driven sampling.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Monte Carlo simulation: path generation, path pricing, statistics.
pub mod monte_carlo;

pub use monte_carlo::{
    MonteCarloModel, MonteCarloResult, MultiPath, MultiPathGenerator, PathPricer, SamplingTarget,
    TimeGrid,
};
