//! Bates process: Heston dynamics plus log-normal jumps in the spot.
//!
//! ```text
//! dS/S = (r − q − λ m) dt + √v dW₁ + (J − 1) dN
//! dv   = κ(θ − v) dt + σ √v dW₂
//! ```
//!
//! `N` is Poisson with intensity `λ`, `ln J ~ N(ν, δ²)` and
//! `m = exp(ν + δ²/2) − 1` compensates the jumps so the discounted spot
//! stays a martingale.

use crate::heston_process::HestonProcess;
use crate::stochastic_process::StochasticProcess;
use ql_core::{ensure, errors::Result, Real, Time};
use ql_math::distributions::InverseCumulativePoisson;
use ql_math::{normal_cdf, Array};

/// Heston process with compound-Poisson log-normal jumps.
///
/// One step draws four numbers: the two Heston shocks, one mapped to the
/// jump count and one for the aggregate jump size.
#[derive(Debug, Clone)]
pub struct BatesProcess {
    heston: HestonProcess,
    lambda: Real,
    nu: Real,
    delta: Real,
}

impl BatesProcess {
    /// Jumps with intensity `lambda`, mean log-jump `nu` and log-jump
    /// volatility `delta` on top of `heston`.
    pub fn new(heston: HestonProcess, lambda: Real, nu: Real, delta: Real) -> Result<Self> {
        ensure!(lambda >= 0.0, "jump intensity must be non-negative, got {lambda}");
        ensure!(delta >= 0.0, "jump volatility must be non-negative, got {delta}");
        Ok(Self {
            heston,
            lambda,
            nu,
            delta,
        })
    }

    /// The diffusive part.
    pub fn heston(&self) -> &HestonProcess {
        &self.heston
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

impl StochasticProcess for BatesProcess {
    fn size(&self) -> usize {
        2
    }

    fn factors(&self) -> usize {
        4
    }

    fn initial_values(&self) -> Result<Array> {
        self.heston.initial_values()
    }

    fn drift(&self, t: Time, x: &Array) -> Result<Array> {
        let mut d = self.heston.drift(t, x)?;
        d[0] -= self.lambda * self.jump_compensator() * x[0];
        Ok(d)
    }

    fn evolve(&self, t: Time, x: &Array, dt: Time, dw: &Array) -> Result<Array> {
        let mut next = self.heston.evolve(t, x, dt, dw)?;
        let p = normal_cdf(dw[2]).clamp(0.0, 1.0 - Real::EPSILON);
        let jumps = InverseCumulativePoisson::new(self.lambda * dt)?.value(p);
        let log_jump = -self.lambda * self.jump_compensator() * dt
            + self.nu * jumps
            + self.delta * jumps.sqrt() * dw[3];
        next[0] *= log_jump.exp();
        Ok(next)
    }
}
