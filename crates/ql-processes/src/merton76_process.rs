//! Merton (1976) jump-diffusion process
//!
//! ```text
//! dS/S = (r − q − λ m) dt + σ dW + (J − 1) dN
//! ```
//!
//! The diffusive part is a [`BlackScholesMertonProcess`]; `N` is Poisson
//! with intensity `λ` and `ln J ~ N(ν, δ²)`.

use crate::black_scholes_process::BlackScholesMertonProcess;
use crate::stochastic_process::{StochasticProcess, StochasticProcess1D};
use ql_core::{ensure, errors::Result, Real, Time};
use ql_math::distributions::InverseCumulativePoisson;
use ql_math::{normal_cdf, Array};

/// Black–Scholes–Merton diffusion with log-normal jumps.
#[derive(Debug, Clone)]
pub struct Merton76Process {
    diffusion: BlackScholesMertonProcess,
    lambda: Real,
    nu: Real,
    delta: Real,
}

impl Merton76Process {
    /// Jumps with intensity `lambda`, mean log-jump `nu` and log-jump
    /// volatility `delta` on top of `diffusion`.
    pub fn new(
        diffusion: BlackScholesMertonProcess,
        lambda: Real,
        nu: Real,
        delta: Real,
    ) -> Result<Self> {
        ensure!(lambda >= 0.0, "jump intensity must be non-negative, got {lambda}");
        ensure!(delta >= 0.0, "jump volatility must be non-negative, got {delta}");
        Ok(Self {
            diffusion,
            lambda,
            nu,
            delta,
        })
    }

    /// The diffusive part.
    pub fn diffusion(&self) -> &BlackScholesMertonProcess {
        &self.diffusion
    }

    /// Jump intensity `λ`.
    pub fn lambda(&self) -> Real {
        self.lambda
    }

    /// Mean log-jump `ν`.
    pub fn nu(&self) -> Real {
        self.nu
    }

    /// Log-jump volatility `δ`.
    pub fn delta(&self) -> Real {
        self.delta
    }

    /// Mean relative jump `m = exp(ν + δ²/2) − 1`.
    pub fn jump_compensator(&self) -> Real {
        (self.nu + 0.5 * self.delta * self.delta).exp() - 1.0
    }
}

impl StochasticProcess for Merton76Process {
    fn size(&self) -> usize {
        1
    }

    fn factors(&self) -> usize {
        3
    }

    fn initial_values(&self) -> Result<Array> {
        Ok(Array::from_slice(&[self.diffusion.x0()?]))
    }

    fn drift(&self, t: Time, x: &Array) -> Result<Array> {
        let d = self.diffusion.drift_1d(t, x[0])?;
        Ok(Array::from_slice(&[d - self.lambda * self.jump_compensator() * x[0]]))
    }

    fn evolve(&self, t: Time, x: &Array, dt: Time, dw: &Array) -> Result<Array> {
        let s = self.diffusion.evolve_1d(t, x[0], dt, dw[0])?;
        let p = normal_cdf(dw[1]).clamp(0.0, 1.0 - Real::EPSILON);
        let jumps = InverseCumulativePoisson::new(self.lambda * dt)?.value(p);
        let log_jump = -self.lambda * self.jump_compensator() * dt
            + self.nu * jumps
            + self.delta * jumps.sqrt() * dw[2];
        Ok(Array::from_slice(&[s * log_jump.exp()]))
    }
}
