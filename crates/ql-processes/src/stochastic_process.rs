//! `StochasticProcess`: state dimension, drift and a discretized step.
//!
//! Market inputs (quotes, curves) are read when a method is called, so
//! every query can fail if one of them has gone invalid.

use ql_core::{errors::Result, Real, Time};
use ql_math::Array;

/// A multi-dimensional process driven by `factors()` independent
/// standard normal draws per step.
pub trait StochasticProcess: std::fmt::Debug + Send + Sync {
    /// State dimension.
    fn size(&self) -> usize;

    /// Number of random draws consumed by one [`evolve`](Self::evolve).
    fn factors(&self) -> usize {
        self.size()
    }

    /// State at time zero.
    fn initial_values(&self) -> Result<Array>;

    /// Drift `μ(t, x)`.
    fn drift(&self, t: Time, x: &Array) -> Result<Array>;

    /// State at `t + dt` given state `x` at `t` and draws `dw`.
    fn evolve(&self, t: Time, x: &Array, dt: Time, dw: &Array) -> Result<Array>;
}

/// A one-dimensional process `dX = μ(t, X) dt + σ(t, X) dW`.
pub trait StochasticProcess1D: std::fmt::Debug + Send + Sync {
    /// Initial value.
    fn x0(&self) -> Result<Real>;

    /// Drift `μ(t, x)`.
    fn drift_1d(&self, t: Time, x: Real) -> Result<Real>;

    /// Diffusion `σ(t, x)`.
    fn diffusion_1d(&self, t: Time, x: Real) -> Result<Real>;

    /// Euler step `x + μ dt + σ √dt dw`.
    fn evolve_1d(&self, t: Time, x: Real, dt: Time, dw: Real) -> Result<Real> {
        Ok(x + self.drift_1d(t, x)? * dt + self.diffusion_1d(t, x)? * dt.sqrt() * dw)
    }
}

impl<T: StochasticProcess1D> StochasticProcess for T {
    fn size(&self) -> usize {
        1
    }

    fn initial_values(&self) -> Result<Array> {
        Ok(Array::from_slice(&[self.x0()?]))
    }

    fn drift(&self, t: Time, x: &Array) -> Result<Array> {
        Ok(Array::from_slice(&[self.drift_1d(t, x[0])?]))
    }

    fn evolve(&self, t: Time, x: &Array, dt: Time, dw: &Array) -> Result<Array> {
        Ok(Array::from_slice(&[self.evolve_1d(t, x[0], dt, dw[0])?]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Drifting;

    impl StochasticProcess1D for Drifting {
        fn x0(&self) -> Result<Real> {
            Ok(100.0)
        }
        fn drift_1d(&self, _t: Time, _x: Real) -> Result<Real> {
            Ok(0.05)
        }
        fn diffusion_1d(&self, _t: Time, _x: Real) -> Result<Real> {
            Ok(0.2)
        }
    }

    #[test]
    fn one_dimensional_processes_lift() {
        let p = Drifting;
        assert_eq!(p.size(), 1);
        assert_eq!(p.factors(), 1);
        assert_eq!(p.initial_values().unwrap().as_slice(), &[100.0]);
        let x = p
            .evolve(0.0, &Array::from_slice(&[100.0]), 0.25, &Array::from_slice(&[1.0]))
            .unwrap();
        assert!((x[0] - (100.0 + 0.05 * 0.25 + 0.2 * 0.5)).abs() < 1e-12);
    }
}
