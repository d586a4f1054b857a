//! Heston stochastic-volatility process
//!
//! ```text
//! dS = (r − q) S dt + √v S dW₁
//! dv = κ(θ − v) dt + σ √v dW₂
//! dW₁ dW₂ = ρ dt
//! ```
//!
//! State vector: `x = [S, v]`. Steps use Andersen's quadratic-exponential
//! scheme for the variance and the matching log-spot update, which keeps
//! `v` non-negative without truncation.

use crate::stochastic_process::StochasticProcess;
use ql_core::{ensure, errors::Result, Real, Time};
use ql_math::{normal_cdf, Array};
use ql_quotes::Quote;
use ql_termstructures::YieldTermStructure;
use std::sync::Arc;

/// Switching level of `ψ = s²/m²` between the quadratic and exponential
/// variance samplers.
const PSI_CRITICAL: Real = 1.5;

/// The Heston process.
///
/// * `v0`    — initial variance
/// * `kappa` — mean-reversion speed of the variance
/// * `theta` — long-run variance
/// * `sigma` — volatility of the variance
/// * `rho`   — correlation of spot and variance shocks
#[derive(Debug, Clone)]
pub struct HestonProcess {
    s0: Arc<dyn Quote>,
    risk_free_rate: Arc<dyn YieldTermStructure>,
    dividend_yield: Arc<dyn YieldTermStructure>,
    v0: Real,
    kappa: Real,
    theta: Real,
    sigma: Real,
    rho: Real,
}

impl HestonProcess {
    /// Process with the given market inputs and parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        s0: Arc<dyn Quote>,
        risk_free_rate: Arc<dyn YieldTermStructure>,
        dividend_yield: Arc<dyn YieldTermStructure>,
        v0: Real,
        kappa: Real,
        theta: Real,
        sigma: Real,
        rho: Real,
    ) -> Result<Self> {
        ensure!(v0 >= 0.0, "initial variance must be non-negative, got {v0}");
        ensure!(kappa >= 0.0, "mean-reversion speed must be non-negative, got {kappa}");
        ensure!(theta >= 0.0, "long-run variance must be non-negative, got {theta}");
        ensure!(sigma >= 0.0, "vol of variance must be non-negative, got {sigma}");
        ensure!(
            (-1.0..=1.0).contains(&rho),
            "correlation must be in [-1, 1], got {rho}"
        );
        Ok(Self {
            s0,
            risk_free_rate,
            dividend_yield,
            v0,
            kappa,
            theta,
            sigma,
            rho,
        })
    }

    /// Same market inputs with new parameters.
    pub fn with_parameters(
        &self,
        v0: Real,
        kappa: Real,
        theta: Real,
        sigma: Real,
        rho: Real,
    ) -> Result<Self> {
        Self::new(
            self.s0.clone(),
            self.risk_free_rate.clone(),
            self.dividend_yield.clone(),
            v0,
            kappa,
            theta,
            sigma,
            rho,
        )
    }

    /// Spot quote.
    pub fn s0(&self) -> &Arc<dyn Quote> {
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

    /// Initial variance.
    pub fn v0(&self) -> Real {
        self.v0
    }

    /// Mean-reversion speed.
    pub fn kappa(&self) -> Real {
        self.kappa
    }

    /// Long-run variance.
    pub fn theta(&self) -> Real {
        self.theta
    }

    /// Volatility of variance.
    pub fn sigma(&self) -> Real {
        self.sigma
    }

    /// Spot/variance correlation.
    pub fn rho(&self) -> Real {
        self.rho
    }

    /// Forward carry `r − q` over `[t, t + dt]`.
    pub(crate) fn carry(&self, t: Time, dt: Time) -> Result<Real> {
        let dt = dt.max(1.0e-4);
        let r = self.risk_free_rate.forward_rate(t, t + dt, true)?;
        let q = self.dividend_yield.forward_rate(t, t + dt, true)?;
        Ok(r - q)
    }

    /// Quadratic-exponential variance step from `v` with draw `zv`.
    fn next_variance(&self, v: Real, dt: Time, zv: Real) -> Real {
        let (kappa, theta, sigma) = (self.kappa, self.theta, self.sigma);
        let ex = (-kappa * dt).exp();
        let m = theta + (v - theta) * ex;
        let one_minus_ex = if kappa > 0.0 { 1.0 - ex } else { 0.0 };
        let s2 = if kappa > 0.0 {
            v * sigma * sigma * ex * one_minus_ex / kappa
                + theta * sigma * sigma * one_minus_ex * one_minus_ex / (2.0 * kappa)
        } else {
            v * sigma * sigma * dt
        };
        if m <= 0.0 {
            return 0.0;
        }
        let psi = s2 / (m * m);
        if psi <= PSI_CRITICAL {
            let b2 = 2.0 / psi - 1.0 + (2.0 / psi).sqrt() * (2.0 / psi - 1.0).max(0.0).sqrt();
            if !b2.is_finite() {
                return m;
            }
            let b = b2.sqrt();
            let a = m / (1.0 + b2);
            a * (b + zv) * (b + zv)
        } else {
            let p = (psi - 1.0) / (psi + 1.0);
            let beta = (1.0 - p) / m;
            let u = normal_cdf(zv);
            if u <= p {
                0.0
            } else {
                ((1.0 - p) / (1.0 - u)).ln() / beta
            }
        }
    }

    /// Log-spot increment consistent with the variance step `v → v_next`.
    fn log_spot_increment(&self, v: Real, v_next: Real, dt: Time, zs: Real) -> Real {
        let (kappa, theta, sigma, rho) = (self.kappa, self.theta, self.sigma, self.rho);
        // central weights γ₁ = γ₂ = ½ on the integrated variance
        let integrated = 0.5 * (v + v_next) * dt;
        let correlated = if sigma > 0.0 {
            rho / sigma * (v_next - v - kappa * theta * dt + kappa * integrated)
        } else {
            0.0
        };
        -0.5 * integrated + correlated + ((1.0 - rho * rho) * integrated).max(0.0).sqrt() * zs
    }
}

impl StochasticProcess for HestonProcess {
    fn size(&self) -> usize {
        2
    }

    fn initial_values(&self) -> Result<Array> {
        Ok(Array::from_slice(&[self.s0.checked_value()?, self.v0]))
    }

    fn drift(&self, t: Time, x: &Array) -> Result<Array> {
        let v = x[1].max(0.0);
        Ok(Array::from_slice(&[
            self.carry(t, 0.0)? * x[0],
            self.kappa * (self.theta - v),
        ]))
    }

    fn evolve(&self, t: Time, x: &Array, dt: Time, dw: &Array) -> Result<Array> {
        let v = x[1].max(0.0);
        let v_next = self.next_variance(v, dt, dw[1]);
        let dlog = self.carry(t, dt)? * dt + self.log_spot_increment(v, v_next, dt, dw[0]);
        Ok(Array::from_slice(&[x[0] * dlog.exp(), v_next]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_math::random_numbers::InverseCumulativeNormalRng;
    use ql_math::statistics::IncrementalStatistics;
    use ql_quotes::SimpleQuote;
    use ql_termstructures::{FlatForward, TermStructureData};
    use ql_time::{Actual365Fixed, Date, NullCalendar};

    fn heston(v0: Real, kappa: Real, theta: Real, sigma: Real, rho: Real) -> HestonProcess {
        let today = Date::from_ymd(2025, 1, 2).unwrap();
        let data = || TermStructureData::fixed(today, NullCalendar, Actual365Fixed);
        HestonProcess::new(
            Arc::new(SimpleQuote::new(100.0)),
            Arc::new(FlatForward::new(data(), 0.05)),
            Arc::new(FlatForward::new(data(), 0.02)),
            v0,
            kappa,
            theta,
            sigma,
            rho,
        )
        .unwrap()
    }

    #[test]
    fn constructor_validates_parameters() {
        let today = Date::from_ymd(2025, 1, 2).unwrap();
        let curve = || -> Arc<dyn YieldTermStructure> {
            Arc::new(FlatForward::new(
                TermStructureData::fixed(today, NullCalendar, Actual365Fixed),
                0.0,
            ))
        };
        let s0: Arc<dyn Quote> = Arc::new(SimpleQuote::new(1.0));
        assert!(HestonProcess::new(s0.clone(), curve(), curve(), 0.04, 1.0, 0.04, 0.3, 1.5).is_err());
        assert!(HestonProcess::new(s0, curve(), curve(), -0.01, 1.0, 0.04, 0.3, 0.0).is_err());
    }

    #[test]
    fn drift_at_long_run_variance() {
        let p = heston(0.04, 1.5, 0.04, 0.3, -0.7);
        let d = p.drift(0.0, &Array::from_slice(&[100.0, 0.04])).unwrap();
        assert_abs_diff_eq!(d[0], 3.0, epsilon = 1e-8);
        assert_abs_diff_eq!(d[1], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn variance_stays_non_negative_under_extreme_shocks() {
        let p = heston(0.001, 1.5, 0.04, 1.0, -0.9);
        for z in [-6.0, -3.0, 0.0, 3.0, 6.0] {
            let x = p
                .evolve(0.0, &Array::from_slice(&[100.0, 0.001]), 0.1, &Array::from_slice(&[z, z]))
                .unwrap();
            assert!(x[1] >= 0.0, "variance went negative: {}", x[1]);
            assert!(x[0] > 0.0);
        }
    }

    #[test]
    fn vanishing_vol_of_variance_is_deterministic() {
        let p = heston(0.09, 2.0, 0.04, 0.0, 0.0);
        let x = p
            .evolve(0.0, &Array::from_slice(&[100.0, 0.09]), 0.5, &Array::from_slice(&[0.0, 2.0]))
            .unwrap();
        assert_abs_diff_eq!(x[1], 0.04 + 0.05 * (-1.0_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn variance_step_matches_conditional_mean() {
        let p = heston(0.04, 1.0, 0.06, 0.5, 0.0);
        let mut rng = InverseCumulativeNormalRng::new(42);
        let mut stats = IncrementalStatistics::new();
        for _ in 0..100_000 {
            stats.add(p.next_variance(0.04, 0.25, rng.next_real()));
        }
        let expected = 0.06 + (0.04 - 0.06) * (-0.25_f64).exp();
        assert_abs_diff_eq!(
            stats.mean().unwrap(),
            expected,
            epsilon = 5.0 * stats.error_estimate().unwrap()
        );
    }
}
