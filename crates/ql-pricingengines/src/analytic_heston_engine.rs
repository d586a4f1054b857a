//! Semi-analytic engine for the Heston model family.
//!
//! European options are priced from the two in-the-money probabilities
//!
//! ```text
//! Pⱼ = ½ + 1/π ∫₀^∞ Re[ exp(Cⱼ + Dⱼ v0 + iφ ln(F/K) + Jⱼ) / (iφ) ] dφ
//! ```
//!
//! with the integral evaluated by Gauss–Laguerre quadrature. `Cⱼ` and `Dⱼ`
//! use the `g = (c − d)/(c + d)` branch, rewritten so that no term divides
//! by `σ²`; the price therefore stays accurate as the volatility of
//! variance goes to zero. `Jⱼ` is the jump term of the model variant.

use std::f64::consts::PI;
use std::sync::Arc;

use num_complex::Complex64;
use ql_core::{ensure, errors::Result, Real, Time};
use ql_instruments::{OptionType, PricingEngine, PricingResults, VanillaOptionArguments};
use ql_math::integrals::GaussLaguerreIntegration;
use ql_models::{HestonFamilyModel, HestonSnapshot, JumpComponent};

/// Default number of Gauss–Laguerre nodes.
pub const DEFAULT_INTEGRATION_ORDER: usize = 64;

/// Below this modulus `ln(1 + w)/w` is taken from its Taylor series.
const SERIES_THRESHOLD: Real = 1e-4;

/// Transform engine for [`HestonFamilyModel`]s.
///
/// The model is read once per valuation through
/// [`HestonFamilyModel::snapshot`], so the engine always prices with the
/// latest calibrated parameters.
#[derive(Debug)]
pub struct AnalyticHestonEngine {
    model: Arc<dyn HestonFamilyModel>,
    integration: GaussLaguerreIntegration,
}

impl AnalyticHestonEngine {
    /// Engine on `model` with [`DEFAULT_INTEGRATION_ORDER`] nodes.
    pub fn new(model: Arc<dyn HestonFamilyModel>) -> Result<Self> {
        Ok(Self {
            model,
            integration: GaussLaguerreIntegration::new(DEFAULT_INTEGRATION_ORDER)?,
        })
    }

    /// Use a Gauss–Laguerre rule with `order` nodes.
    pub fn with_integration_order(mut self, order: usize) -> Result<Self> {
        self.integration = GaussLaguerreIntegration::new(order)?;
        Ok(self)
    }

    /// Number of quadrature nodes.
    pub fn integration_order(&self) -> usize {
        self.integration.order()
    }

    /// The priced model.
    pub fn model(&self) -> &Arc<dyn HestonFamilyModel> {
        &self.model
    }
}

/// Jump contribution to the log characteristic function.
///
/// `g = 1 + iφ` under the share measure (`j = 1`) and `g = iφ` under the
/// money-market measure.
fn jump_term(jumps: &JumpComponent, j: usize, phi: Real, t: Time) -> Complex64 {
    let g = Complex64::new(if j == 1 { 1.0 } else { 0.0 }, phi);
    match *jumps {
        JumpComponent::None => Complex64::new(0.0, 0.0),
        JumpComponent::LogNormal { lambda, nu, delta } => log_normal_jump(g, nu, delta) * (lambda * t),
        JumpComponent::LogNormalDetIntensity {
            lambda,
            nu,
            delta,
            kappa_lambda,
            theta_lambda,
        } => {
            log_normal_jump(g, nu, delta)
                * integrated_intensity(lambda, kappa_lambda, theta_lambda, t)
        }
        JumpComponent::DoubleExponential {
            lambda,
            nu_up,
            nu_down,
            p,
        } => double_exponential_jump(g, nu_up, nu_down, p) * (lambda * t),
        JumpComponent::DoubleExponentialDetIntensity {
            lambda,
            nu_up,
            nu_down,
            p,
            kappa_lambda,
            theta_lambda,
        } => {
            double_exponential_jump(g, nu_up, nu_down, p)
                * integrated_intensity(lambda, kappa_lambda, theta_lambda, t)
        }
    }
}

/// `E[e^{g ln J}] − 1 − g E[J − 1]` for `ln J ~ N(ν, δ²)`.
fn log_normal_jump(g: Complex64, nu: Real, delta: Real) -> Complex64 {
    let half_var = 0.5 * delta * delta;
    (g * nu + g * g * half_var).exp() - 1.0 - g * ((nu + half_var).exp() - 1.0)
}

/// Same compensated transform for double-exponential log-jumps.
fn double_exponential_jump(g: Complex64, nu_up: Real, nu_down: Real, p: Real) -> Complex64 {
    let q = 1.0 - p;
    p / (1.0 - g * nu_up) + q / (1.0 + g * nu_down)
        - 1.0
        - g * (p / (1.0 - nu_up) + q / (1.0 + nu_down) - 1.0)
}

/// `∫₀ᵗ λ(s) ds` for `dλ = κ_λ(θ_λ − λ) dt` started at `lambda`.
fn integrated_intensity(lambda: Real, kappa: Real, theta: Real, t: Time) -> Real {
    let decay = (-kappa * t).exp();
    (kappa * t - 1.0 + decay) * theta / kappa + (1.0 - decay) * lambda / kappa
}

/// `Cⱼ(φ) + Dⱼ(φ) v0 + Jⱼ(φ)` at maturity `t`.
fn log_characteristic(s: &HestonSnapshot, j: usize, phi: Real, t: Time) -> Complex64 {
    let (u, b) = if j == 1 {
        (0.5, s.kappa - s.rho * s.sigma)
    } else {
        (-0.5, s.kappa)
    };
    let sigma2 = s.sigma * s.sigma;

    // a = 2uiφ − φ², c = b − ρσiφ, d² = c² − σ² a
    let a = Complex64::new(-phi * phi, 2.0 * u * phi);
    let c = Complex64::new(b, -s.rho * s.sigma * phi);
    let mut d = (c * c - a * sigma2).sqrt();
    if d.re < 0.0 {
        d = -d;
    }

    let c_plus_d = c + d;
    // (c − d)/σ² and g = (c − d)/(c + d), both without dividing by σ²
    let q = a / c_plus_d;
    let g = q * sigma2 / c_plus_d;
    let e = (-d * t).exp();
    let one_minus_e = 1.0 - e;

    let big_d = q * one_minus_e / (1.0 - g * e);

    // 2/σ² ln((1 − g e)/(1 − g)) = 2 (w/σ²) ln(1 + w)/w
    let w_over_sigma2 = q * one_minus_e / (c_plus_d * (1.0 - g));
    let w = w_over_sigma2 * sigma2;
    let log_ratio = if w.norm() < SERIES_THRESHOLD {
        1.0 - w / 2.0 + w * w / 3.0
    } else {
        (1.0 + w).ln() / w
    };
    let big_c = s.kappa * s.theta * (q * t - 2.0 * w_over_sigma2 * log_ratio);

    big_c + big_d * s.v0 + jump_term(&s.jumps, j, phi, t)
}

/// `Pⱼ` for log-moneyness `x = ln(F/K)`.
fn probability(
    s: &HestonSnapshot,
    j: usize,
    x: Real,
    t: Time,
    integration: &GaussLaguerreIntegration,
) -> Real {
    let integral = integration.integrate(|phi| {
        let f = (log_characteristic(s, j, phi, t) + Complex64::new(0.0, phi * x)).exp();
        // Re[f / (iφ)] = Im[f] / φ
        let value = f.im / phi;
        if value.is_finite() {
            value
        } else {
            0.0
        }
    });
    0.5 + integral / PI
}

/// Value of a European option under the Heston-family parameters `s`.
///
/// `df_r` and `df_q` are the risk-free and dividend discount factors to
/// the maturity `t`.
#[allow(clippy::too_many_arguments)]
pub fn heston_family_price(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    df_r: Real,
    df_q: Real,
    t: Time,
    s: &HestonSnapshot,
    integration: &GaussLaguerreIntegration,
) -> Result<Real> {
    ensure!(spot > 0.0, "spot ({spot}) must be positive");
    ensure!(strike > 0.0, "strike ({strike}) must be positive");
    ensure!(t > 0.0, "time to maturity ({t}) must be positive");

    let forward_spot = spot * df_q;
    let discounted_strike = strike * df_r;
    let x = (forward_spot / discounted_strike).ln();
    let p1 = probability(s, 1, x, t, integration);
    let p2 = probability(s, 2, x, t, integration);

    Ok(match option_type {
        OptionType::Call => forward_spot * p1 - discounted_strike * p2,
        OptionType::Put => forward_spot * (p1 - 1.0) - discounted_strike * (p2 - 1.0),
    })
}

impl PricingEngine<VanillaOptionArguments> for AnalyticHestonEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        let snapshot = self.model.snapshot();
        let process = self.model.process();
        let risk_free = process.risk_free_rate();
        let t = risk_free
            .day_counter()
            .year_fraction(risk_free.reference_date(), args.exercise.last_date());
        let df_r = risk_free.discount(t, true)?;
        let df_q = process.dividend_yield().discount(t, true)?;
        let spot = process.s0().checked_value()?;

        let value = heston_family_price(
            args.payoff.option_type(),
            spot,
            args.payoff.strike(),
            df_r,
            df_q,
            t,
            &snapshot,
            &self.integration,
        )?;
        Ok(PricingResults::from_value(value))
    }
}
