//! Numerical integration on the half line.

pub mod gaussianquadratures;

pub use gaussianquadratures::GaussLaguerreIntegration;
