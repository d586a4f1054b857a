//! Black's formula for European options on a forward.

use crate::distributions::normal_cdf;
use ql_core::{ensure, errors::Result, Real};

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Pays `max(S - K, 0)`.
    Call,
    /// Pays `max(K - S, 0)`.
    Put,
}

impl OptionType {
    /// `+1` for calls, `-1` for puts.
    pub fn sign(self) -> Real {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => f.write_str("Call"),
            Self::Put => f.write_str("Put"),
        }
    }
}

/// Discounted Black price `D · w · (F Φ(w d₁) − K Φ(w d₂))`.
///
/// `std_dev` is the total standard deviation `σ√T`. A zero deviation
/// returns the discounted intrinsic value of the forward.
pub fn black_formula(
    option_type: OptionType,
    strike: Real,
    forward: Real,
    std_dev: Real,
    discount: Real,
) -> Result<Real> {
    ensure!(strike >= 0.0, "strike ({strike}) must be non-negative");
    ensure!(forward > 0.0, "forward ({forward}) must be positive");
    ensure!(std_dev >= 0.0, "standard deviation ({std_dev}) must be non-negative");
    ensure!(discount > 0.0, "discount ({discount}) must be positive");

    let w = option_type.sign();
    if std_dev == 0.0 {
        return Ok(discount * (w * (forward - strike)).max(0.0));
    }
    if strike == 0.0 {
        return Ok(match option_type {
            OptionType::Call => discount * forward,
            OptionType::Put => 0.0,
        });
    }
    let d1 = (forward / strike).ln() / std_dev + 0.5 * std_dev;
    let d2 = d1 - std_dev;
    let value = discount * w * (forward * normal_cdf(w * d1) - strike * normal_cdf(w * d2));
    Ok(value.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn textbook_value() {
        // S = 100, K = 100, r = 5%, σ = 20%, T = 1
        let df = (-0.05_f64).exp();
        let fwd = 100.0 / df;
        let call = black_formula(OptionType::Call, 100.0, fwd, 0.2, df).unwrap();
        assert_abs_diff_eq!(call, 10.450_583_572_185_565, epsilon = 1e-10);
    }

    #[test]
    fn put_call_parity() {
        let (k, f, sd, df) = (95.0, 102.0, 0.31, 0.93);
        let c = black_formula(OptionType::Call, k, f, sd, df).unwrap();
        let p = black_formula(OptionType::Put, k, f, sd, df).unwrap();
        assert_abs_diff_eq!(c - p, df * (f - k), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(black_formula(OptionType::Put, 90.0, 100.0, 0.0, 1.0).unwrap(), 0.0);
        assert_eq!(black_formula(OptionType::Call, 0.0, 100.0, 0.2, 0.5).unwrap(), 50.0);
        assert!(black_formula(OptionType::Call, 100.0, -1.0, 0.2, 1.0).is_err());
    }

    proptest::proptest! {
        #[test]
        fn call_within_no_arbitrage_bounds(
            k in 1.0..200.0_f64,
            f in 1.0..200.0_f64,
            sd in 0.0..2.0_f64,
            df in 0.1..1.0_f64,
        ) {
            let c = black_formula(OptionType::Call, k, f, sd, df).unwrap();
            proptest::prop_assert!(c >= df * (f - k).max(0.0) - 1e-10);
            proptest::prop_assert!(c <= df * f + 1e-10);
        }
    }
}
