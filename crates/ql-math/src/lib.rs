//! # ql-math
//!
//! Numerical building blocks for pricing and calibration: the `Array`
//! vector type, normal and Poisson distributions, Black's formula,
//! Gauss–Laguerre quadrature, Brent root finding, linear and bilinear
//! interpolation, Mersenne Twister random numbers, running statistics and
//! the least-squares optimization framework.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Dense real vector.
pub mod array;

/// Black's formula and the option type.
pub mod black_formula;

/// Probability distributions.
pub mod distributions;

/// Quadrature rules.
pub mod integrals;

/// Interpolation schemes.
pub mod interpolations;

/// Minimizers, constraints and end criteria.
pub mod optimization;

/// Random number generators.
pub mod random_numbers;

/// One-dimensional root finders.
pub mod solvers1d;

/// Sample statistics.
pub mod statistics;

pub use array::Array;
pub use black_formula::{black_formula, OptionType};
pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
