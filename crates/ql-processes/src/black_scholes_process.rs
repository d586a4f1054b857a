//! Black–Scholes–Merton process
//!
//! `dS/S = (r(t) − q(t)) dt + σ(t, S) dW`
//!
//! with `r` and `q` read from yield curves and `σ` from a Black volatility
//! surface. The state is the spot price; [`evolve`](StochasticProcess1D::evolve_1d)
//! takes the exact log-normal step over `dt`.

use crate::stochastic_process::StochasticProcess1D;
use ql_core::{errors::Result, Real, Time};
use ql_quotes::Quote;
use ql_termstructures::{BlackVolTermStructure, YieldTermStructure};
use std::sync::Arc;

/// Length of the interval used for instantaneous rates and volatilities.
const DT: Time = 1.0e-4;

/// Geometric Brownian motion with term-structure rates and Black volatility.
#[derive(Debug, Clone)]
pub struct BlackScholesMertonProcess {
    s0: Arc<dyn Quote>,
    risk_free_rate: Arc<dyn YieldTermStructure>,
    dividend_yield: Arc<dyn YieldTermStructure>,
    black_volatility: Arc<dyn BlackVolTermStructure>,
}

impl BlackScholesMertonProcess {
    /// Process on `s0` with the given curves and volatility.
    pub fn new(
        s0: Arc<dyn Quote>,
        risk_free_rate: Arc<dyn YieldTermStructure>,
        dividend_yield: Arc<dyn YieldTermStructure>,
        black_volatility: Arc<dyn BlackVolTermStructure>,
    ) -> Self {
        Self {
            s0,
            risk_free_rate,
            dividend_yield,
            black_volatility,
        }
    }

    /// Current spot.
    pub fn spot(&self) -> Result<Real> {
        self.s0.checked_value()
    }

    /// Spot quote.
    pub fn state_variable(&self) -> &Arc<dyn Quote> {
        &self.s0
    }

    /// Risk-free curve.
    pub fn risk_free_rate(&self) -> &Arc<dyn YieldTermStructure> {
        &self.risk_free_rate
    }

    /// Dividend curve.
    pub fn dividend_yield(&self) -> &Arc<dyn YieldTermStructure> {
        &self.dividend_yield
    }

    /// Black volatility surface.
    pub fn black_volatility(&self) -> &Arc<dyn BlackVolTermStructure> {
        &self.black_volatility
    }

    fn carry(&self, t: Time, dt: Time) -> Result<Real> {
        let r = self.risk_free_rate.forward_rate(t, t + dt, true)?;
        let q = self.dividend_yield.forward_rate(t, t + dt, true)?;
        Ok(r - q)
    }
}

impl StochasticProcess1D for BlackScholesMertonProcess {
    fn x0(&self) -> Result<Real> {
        self.spot()
    }

    fn drift_1d(&self, t: Time, x: Real) -> Result<Real> {
        Ok(self.carry(t, DT)? * x)
    }

    fn diffusion_1d(&self, t: Time, x: Real) -> Result<Real> {
        Ok(self.black_volatility.black_vol(t, x, true)? * x)
    }

    fn evolve_1d(&self, t: Time, x: Real, dt: Time, dw: Real) -> Result<Real> {
        let sigma = self.black_volatility.black_vol(t, x, true)?;
        let mu = self.carry(t, dt)?;
        Ok(x * ((mu - 0.5 * sigma * sigma) * dt + sigma * dt.sqrt() * dw).exp())
    }
}
