//! Analytic European option engine (Black-Scholes-Merton).
//!
//! Prices European vanilla options in closed form from the spot, the two
//! zero rates and the Black volatility at the option's strike and expiry.
//! Delta, gamma, vega, theta and rho are reported as additional results.

use ql_core::{errors::Result, Real, Time};
use ql_instruments::{OptionType, PricingEngine, PricingResults, VanillaOptionArguments};
use ql_math::distributions::{normal_cdf, normal_pdf};
use ql_processes::BlackScholesMertonProcess;

use std::sync::Arc;

/// Value and sensitivities of a European option under Black-Scholes-Merton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholesValue {
    /// Present value.
    pub value: Real,
    /// `∂V/∂S`.
    pub delta: Real,
    /// `∂²V/∂S²`.
    pub gamma: Real,
    /// `∂V/∂σ` per unit of volatility.
    pub vega: Real,
    /// `∂V/∂t` per year.
    pub theta: Real,
    /// `∂V/∂r` per unit of rate.
    pub rho: Real,
}

/// Black-Scholes-Merton value and Greeks with continuously compounded
/// rate `r`, dividend yield `q` and volatility `sigma` over `t` years.
///
/// A non-positive `t` returns the intrinsic value with zero Greeks; a
/// vanishing standard deviation returns the discounted forward intrinsic.
pub fn black_scholes_merton(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    r: Real,
    q: Real,
    sigma: Real,
    t: Time,
) -> BlackScholesValue {
    let phi = option_type.sign();
    if t <= 0.0 {
        return BlackScholesValue {
            value: (phi * (spot - strike)).max(0.0),
            delta: 0.0,
            gamma: 0.0,
            vega: 0.0,
            theta: 0.0,
            rho: 0.0,
        };
    }

    let sqrt_t = t.sqrt();
    let std_dev = sigma * sqrt_t;
    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();
    let forward = spot * df_q / df_r;

    let (d1, d2) = if std_dev > 1e-15 {
        let d1 = (forward / strike).ln() / std_dev + 0.5 * std_dev;
        (d1, d1 - std_dev)
    } else {
        let big = if forward > strike { 1e15 } else { -1e15 };
        (big, big)
    };

    let nd1 = normal_cdf(phi * d1);
    let nd2 = normal_cdf(phi * d2);
    let npd1 = normal_pdf(d1);

    let value = phi * (spot * df_q * nd1 - strike * df_r * nd2);
    let gamma = if std_dev > 1e-15 {
        df_q * npd1 / (spot * std_dev)
    } else {
        0.0
    };
    BlackScholesValue {
        value: value.max(0.0),
        delta: phi * df_q * nd1,
        gamma,
        vega: spot * df_q * npd1 * sqrt_t,
        theta: -(spot * df_q * npd1 * sigma) / (2.0 * sqrt_t) - phi * r * strike * df_r * nd2
            + phi * q * spot * df_q * nd1,
        rho: phi * strike * t * df_r * nd2,
    }
}

/// Closed-form engine for European vanilla options.
#[derive(Debug)]
pub struct AnalyticEuropeanEngine {
    process: Arc<BlackScholesMertonProcess>,
}

impl AnalyticEuropeanEngine {
    /// Engine on `process`.
    pub fn new(process: Arc<BlackScholesMertonProcess>) -> Self {
        Self { process }
    }
}

impl PricingEngine<VanillaOptionArguments> for AnalyticEuropeanEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        let strike = args.payoff.strike();
        let risk_free = self.process.risk_free_rate();
        let t = risk_free
            .day_counter()
            .year_fraction(risk_free.reference_date(), args.exercise.last_date());

        let spot = self.process.spot()?;
        let (r, q, sigma) = if t > 0.0 {
            (
                risk_free.zero_rate(t, true)?,
                self.process.dividend_yield().zero_rate(t, true)?,
                self.process.black_volatility().black_vol(t, strike, true)?,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let bs = black_scholes_merton(args.payoff.option_type(), spot, strike, r, q, sigma, t);
        Ok(PricingResults::from_value(bs.value)
            .with_result("delta", bs.delta)
            .with_result("gamma", bs.gamma)
            .with_result("vega", bs.vega)
            .with_result("theta", bs.theta)
            .with_result("rho", bs.rho))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_instruments::VanillaOption;
    use ql_quotes::SimpleQuote;
    use ql_termstructures::{BlackConstantVol, FlatForward, TermStructureData};
    use ql_time::{Actual365Fixed, Date, NullCalendar};

    #[test]
    fn call_value_and_greeks() {
        let bs = black_scholes_merton(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0);
        assert_abs_diff_eq!(bs.value, 10.450_583_572_185_565, epsilon = 1e-9);
        assert!(bs.delta > 0.5 && bs.delta < 0.8, "delta = {}", bs.delta);
        assert!(bs.gamma > 0.0);
        assert!(bs.vega > 0.0);
        assert!(bs.rho > 0.0);
    }

    #[test]
    fn put_call_parity_with_dividends() {
        let (s, k, r, q, sigma, t) = (100.0, 105.0, 0.08, 0.03, 0.25, 0.5);
        let call = black_scholes_merton(OptionType::Call, s, k, r, q, sigma, t).value;
        let put = black_scholes_merton(OptionType::Put, s, k, r, q, sigma, t).value;
        let parity = call - s * (-q * t).exp() + k * (-r * t).exp();
        assert_abs_diff_eq!(put, parity, epsilon = 1e-10);
    }

    #[test]
    fn zero_vol_is_discounted_forward_intrinsic() {
        let bs = black_scholes_merton(OptionType::Call, 100.0, 95.0, 0.05, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(bs.value, 100.0 - 95.0 * (-0.05_f64).exp(), epsilon = 1e-12);
        assert_eq!(bs.gamma, 0.0);
    }

    #[test]
    fn expired_option_is_intrinsic() {
        let bs = black_scholes_merton(OptionType::Put, 90.0, 100.0, 0.05, 0.0, 0.2, 0.0);
        assert_eq!(bs.value, 10.0);
        assert_eq!(bs.delta, 0.0);
    }

    #[test]
    fn engine_reads_curves_and_surface() {
        let today = Date::from_ymd(2025, 1, 15).unwrap();
        let data = || TermStructureData::fixed(today, NullCalendar, Actual365Fixed);
        let process = Arc::new(BlackScholesMertonProcess::new(
            Arc::new(SimpleQuote::new(100.0)),
            Arc::new(FlatForward::new(data(), 0.05)),
            Arc::new(FlatForward::new(data(), 0.0)),
            Arc::new(BlackConstantVol::new(data(), 0.20)),
        ));
        let engine = AnalyticEuropeanEngine::new(process);

        let option =
            VanillaOption::european(OptionType::Call, 100.0, Date::from_ymd(2026, 1, 15).unwrap())
                .unwrap();
        let results = option.price(&engine).unwrap();
        assert_abs_diff_eq!(results.value, 10.450_583_572_185_565, epsilon = 1e-8);
        for greek in ["delta", "gamma", "vega", "theta", "rho"] {
            assert!(results.additional_results.contains_key(greek), "{greek} missing");
        }
    }

    proptest::proptest! {
        #[test]
        fn parity_holds_across_markets(
            spot in 20.0f64..200.0,
            strike in 20.0f64..200.0,
            r in -0.02f64..0.10,
            q in 0.0f64..0.08,
            sigma in 0.05f64..1.0,
            t in 0.05f64..5.0,
        ) {
            let call = black_scholes_merton(OptionType::Call, spot, strike, r, q, sigma, t);
            let put = black_scholes_merton(OptionType::Put, spot, strike, r, q, sigma, t);
            let forward_value = spot * (-q * t).exp() - strike * (-r * t).exp();
            proptest::prop_assert!((call.value - put.value - forward_value).abs() < 1e-9);
            proptest::prop_assert!((call.delta - put.delta - (-q * t).exp()).abs() < 1e-12);
            proptest::prop_assert!((call.gamma - put.gamma).abs() < 1e-12);
        }
    }
}
