//! Series engine for European options under the Merton (1976) jump
//! diffusion.
//!
//! With `k = e^{ν+δ²/2} − 1` and `λ' = λ(1 + k)`, the price is the
//! Poisson-weighted sum
//!
//! ```text
//! V = Σᵢ e^{−λ'T} (λ'T)ⁱ / i! · BS(rᵢ, σᵢ)
//! rᵢ  = r − λk + i ln(1 + k)/T
//! σᵢ² T = σ² T + i δ²
//! ```
//!
//! truncated once a term past the Poisson mean contributes less than the
//! relative accuracy.

use std::sync::Arc;

use ql_core::{errors::Result, Error, Real, Size};
use ql_instruments::{PricingEngine, PricingResults, VanillaOptionArguments};
use ql_math::black_formula;
use ql_math::distributions::PoissonDistribution;
use ql_processes::Merton76Process;
use tracing::trace;

/// Default relative accuracy of the series.
pub const DEFAULT_RELATIVE_ACCURACY: Real = 1e-10;
/// Default cap on the number of terms.
pub const DEFAULT_MAX_ITERATIONS: Size = 1000;

/// Poisson-series engine on a [`Merton76Process`].
#[derive(Debug)]
pub struct JumpDiffusionEngine {
    process: Arc<Merton76Process>,
    relative_accuracy: Real,
    max_iterations: Size,
}

impl JumpDiffusionEngine {
    /// Engine with the default accuracy and term cap.
    pub fn new(process: Arc<Merton76Process>) -> Self {
        Self {
            process,
            relative_accuracy: DEFAULT_RELATIVE_ACCURACY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Stop once a term is below `accuracy` times the running value.
    pub fn with_relative_accuracy(mut self, accuracy: Real) -> Self {
        self.relative_accuracy = accuracy;
        self
    }

    /// Fail after `max_iterations` terms.
    pub fn with_max_iterations(mut self, max_iterations: Size) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl PricingEngine<VanillaOptionArguments> for JumpDiffusionEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        let diffusion = self.process.diffusion();
        let option_type = args.payoff.option_type();
        let strike = args.payoff.strike();
        let risk_free = diffusion.risk_free_rate();
        let t = risk_free
            .day_counter()
            .year_fraction(risk_free.reference_date(), args.exercise.last_date());
        if !(t > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "option expiry {} is not after the reference date {}",
                args.exercise.last_date(),
                risk_free.reference_date()
            )));
        }

        let spot = diffusion.spot()?;
        let df_r = risk_free.discount(t, true)?;
        let df_q = diffusion.dividend_yield().discount(t, true)?;
        let variance = diffusion.black_volatility().black_variance(t, strike, true)?;

        let delta = self.process.delta();
        let k = self.process.jump_compensator();
        let lambda = self.process.lambda();
        let lambda_t = lambda * (1.0 + k) * t;
        let log_one_plus_k = (1.0 + k).ln();

        // term i discounts at rᵢ: D_i = D · e^{λkT} (1 + k)^{−i}
        let term = |i: Size| -> Result<Real> {
            let i = i as Real;
            let discount = df_r * (lambda * k * t - i * log_one_plus_k).exp();
            let std_dev = (variance + i * delta * delta).sqrt();
            black_formula(option_type, strike, spot * df_q / discount, std_dev, discount)
        };

        if lambda_t == 0.0 {
            return Ok(PricingResults::from_value(term(0)?));
        }

        let poisson = PoissonDistribution::new(lambda_t)?;
        let mut value = 0.0;
        for i in 0..self.max_iterations {
            let contribution = poisson.pmf(i as u64) * term(i)?;
            value += contribution;
            if i as Real > lambda_t && contribution.abs() <= self.relative_accuracy * value.abs() {
                trace!(terms = i + 1, value, "jump-diffusion series converged");
                return Ok(PricingResults::from_value(value));
            }
        }
        Err(Error::Runtime(format!(
            "{} terms were not enough to reach a relative accuracy of {}",
            self.max_iterations, self.relative_accuracy
        )))
    }
}
