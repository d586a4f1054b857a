//! Option payoffs.

use ql_core::{ensure, errors::Result, Real};
use std::fmt;

pub use ql_math::OptionType;

/// Payoff as a function of the underlying at exercise.
pub trait Payoff: fmt::Debug + Send + Sync {
    /// Amount paid when the underlying is at `price`.
    fn value(&self, price: Real) -> Real;

    /// Short description.
    fn name(&self) -> &str;
}

/// A payoff with a strike and a call/put side.
pub trait StrikedPayoff: Payoff {
    /// Strike.
    fn strike(&self) -> Real;

    /// Call or put.
    fn option_type(&self) -> OptionType;
}

/// `max(φ(S − K), 0)` with `φ = +1` for calls and `−1` for puts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainVanillaPayoff {
    option_type: OptionType,
    strike: Real,
}

impl PlainVanillaPayoff {
    /// Payoff with a non-negative strike.
    pub fn new(option_type: OptionType, strike: Real) -> Result<Self> {
        ensure!(
            strike >= 0.0 && strike.is_finite(),
            "strike must be finite and non-negative, got {strike}"
        );
        Ok(Self {
            option_type,
            strike,
        })
    }
}

impl Payoff for PlainVanillaPayoff {
    fn value(&self, price: Real) -> Real {
        (self.option_type.sign() * (price - self.strike)).max(0.0)
    }

    fn name(&self) -> &str {
        "Vanilla"
    }
}

impl StrikedPayoff for PlainVanillaPayoff {
    fn strike(&self) -> Real {
        self.strike
    }

    fn option_type(&self) -> OptionType {
        self.option_type
    }
}

impl fmt::Display for PlainVanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name(), self.option_type, self.strike)
    }
}
