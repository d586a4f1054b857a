//! `VanillaOption`: a striked payoff with European exercise.

use crate::exercise::Exercise;
use crate::instrument::{Instrument, PricingEngine, PricingResults};
use crate::payoff::{OptionType, PlainVanillaPayoff, StrikedPayoff};
use ql_core::{errors::Result, Real};
use ql_time::Date;
use std::sync::Arc;

/// What a pricing engine sees of a vanilla option.
#[derive(Debug, Clone)]
pub struct VanillaOptionArguments {
    /// The payoff.
    pub payoff: Arc<dyn StrikedPayoff>,
    /// The exercise.
    pub exercise: Exercise,
}

/// Option on a single underlying with a striked payoff.
#[derive(Debug, Clone)]
pub struct VanillaOption {
    payoff: Arc<dyn StrikedPayoff>,
    exercise: Exercise,
}

/// Engines able to price a [`VanillaOption`].
pub type VanillaEngine = dyn PricingEngine<VanillaOptionArguments>;

impl VanillaOption {
    /// Option with the given payoff and exercise.
    pub fn new(payoff: Arc<dyn StrikedPayoff>, exercise: Exercise) -> Self {
        Self { payoff, exercise }
    }

    /// European call or put.
    pub fn european(option_type: OptionType, strike: Real, expiry: Date) -> Result<Self> {
        Ok(Self::new(
            Arc::new(PlainVanillaPayoff::new(option_type, strike)?),
            Exercise::european(expiry),
        ))
    }

    /// Strike.
    pub fn strike(&self) -> Real {
        self.payoff.strike()
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.payoff.option_type()
    }

    /// The payoff.
    pub fn payoff(&self) -> &dyn StrikedPayoff {
        &*self.payoff
    }

    /// The exercise.
    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    /// Arguments handed to engines.
    pub fn arguments(&self) -> VanillaOptionArguments {
        VanillaOptionArguments {
            payoff: Arc::clone(&self.payoff),
            exercise: self.exercise,
        }
    }

    /// Full results from `engine`.
    pub fn price(&self, engine: &VanillaEngine) -> Result<PricingResults> {
        engine.calculate(&self.arguments())
    }

    /// Net present value from `engine`.
    pub fn npv(&self, engine: &VanillaEngine) -> Result<Real> {
        Ok(self.price(engine)?.value)
    }
}

impl Instrument for VanillaOption {
    fn maturity_date(&self) -> Date {
        self.exercise.last_date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Intrinsic(Real);

    impl PricingEngine<VanillaOptionArguments> for Intrinsic {
        fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
            Ok(PricingResults::from_value(args.payoff.value(self.0)))
        }
    }

    #[test]
    fn engines_are_interchangeable() {
        let expiry = Date::from_ymd(2003, 1, 6).unwrap();
        let opt = VanillaOption::european(OptionType::Call, 100.0, expiry).unwrap();
        assert_eq!(opt.strike(), 100.0);
        assert_eq!(opt.option_type(), OptionType::Call);
        assert_eq!(opt.npv(&Intrinsic(105.0)).unwrap(), 5.0);
        assert_eq!(opt.npv(&Intrinsic(95.0)).unwrap(), 0.0);
        assert!(!opt.is_expired(expiry));
        assert!(opt.is_expired(expiry + 1));
    }
}
