//! Calibration helper for the Heston family: a European option quoted by
//! its Black volatility.

use crate::calibration_helper::{CalibrationErrorType, CalibrationHelper};
use ql_core::{errors::Result, Error, Real, Time, Volatility};
use ql_instruments::{OptionType, VanillaEngine, VanillaOption};
use ql_math::black_formula;
use ql_quotes::Quote;
use ql_termstructures::YieldTermStructure;
use ql_time::{BusinessDayConvention, Calendar, Date, Period};
use std::fmt;
use std::sync::Arc;

/// An out-of-the-money European option expiring `maturity` after the
/// risk-free curve's reference date.
///
/// The option is a call when the discounted strike is at or above the
/// dividend-discounted spot and a put otherwise.
pub struct HestonModelHelper {
    maturity: Period,
    exercise_date: Date,
    tau: Time,
    s0: Real,
    strike: Real,
    volatility: Arc<dyn Quote>,
    risk_free_rate: Arc<dyn YieldTermStructure>,
    dividend_yield: Arc<dyn YieldTermStructure>,
    option: VanillaOption,
    engine: Option<Arc<VanillaEngine>>,
    error_type: CalibrationErrorType,
}

impl HestonModelHelper {
    /// Helper on an option struck at `strike` with the quoted `volatility`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        maturity: Period,
        calendar: &dyn Calendar,
        s0: Real,
        strike: Real,
        volatility: Arc<dyn Quote>,
        risk_free_rate: Arc<dyn YieldTermStructure>,
        dividend_yield: Arc<dyn YieldTermStructure>,
        error_type: CalibrationErrorType,
    ) -> Result<Self> {
        if !(s0 > 0.0) {
            return Err(Error::InvalidArgument(format!("spot ({s0}) must be positive")));
        }
        if !(strike > 0.0) {
            return Err(Error::InvalidArgument(format!("strike ({strike}) must be positive")));
        }
        let reference = risk_free_rate.reference_date();
        let exercise_date =
            calendar.advance(reference, maturity, BusinessDayConvention::Following, false)?;
        let tau = risk_free_rate
            .day_counter()
            .year_fraction(reference, exercise_date);
        if !(tau > 0.0) {
            return Err(Error::InvalidTenor(format!(
                "maturity {maturity} gives exercise date {exercise_date} not after {reference}"
            )));
        }
        let option_type = if strike * risk_free_rate.discount(tau, false)?
            >= s0 * dividend_yield.discount(tau, false)?
        {
            OptionType::Call
        } else {
            OptionType::Put
        };
        Ok(Self {
            maturity,
            exercise_date,
            tau,
            s0,
            strike,
            volatility,
            risk_free_rate,
            dividend_yield,
            option: VanillaOption::european(option_type, strike, exercise_date)?,
            engine: None,
            error_type,
        })
    }

    /// Time to maturity under the risk-free curve's day counter.
    pub fn maturity(&self) -> Time {
        self.tau
    }

    /// Quoted tenor.
    pub fn tenor(&self) -> Period {
        self.maturity
    }

    /// Exercise date.
    pub fn exercise_date(&self) -> Date {
        self.exercise_date
    }

    /// Strike.
    pub fn strike(&self) -> Real {
        self.strike
    }

    /// The option priced by the engine.
    pub fn option(&self) -> &VanillaOption {
        &self.option
    }
}

impl fmt::Debug for HestonModelHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HestonModelHelper")
            .field("maturity", &self.maturity)
            .field("exercise_date", &self.exercise_date)
            .field("strike", &self.strike)
            .field("option_type", &self.option.option_type())
            .field("error_type", &self.error_type)
            .finish_non_exhaustive()
    }
}

impl CalibrationHelper for HestonModelHelper {
    fn volatility(&self) -> Result<Volatility> {
        self.volatility.checked_value()
    }

    fn black_price(&self, volatility: Volatility) -> Result<Real> {
        let discounted_strike = self.strike * self.risk_free_rate.discount(self.tau, false)?;
        let discounted_spot = self.s0 * self.dividend_yield.discount(self.tau, false)?;
        black_formula(
            self.option.option_type(),
            discounted_strike,
            discounted_spot,
            volatility * self.tau.sqrt(),
            1.0,
        )
    }

    fn model_value(&self) -> Result<Real> {
        match &self.engine {
            Some(engine) => self.option.npv(engine.as_ref()),
            None => Err(Error::Runtime(format!(
                "no pricing engine set for {self:?}"
            ))),
        }
    }

    fn set_pricing_engine(&mut self, engine: Arc<VanillaEngine>) {
        self.engine = Some(engine);
    }

    fn error_type(&self) -> CalibrationErrorType {
        self.error_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_instruments::{PricingEngine, PricingResults, VanillaOptionArguments};
    use ql_quotes::SimpleQuote;
    use ql_termstructures::{FlatForward, TermStructureData};
    use ql_time::{Actual365Fixed, Target, TimeUnit};

    fn curve(rate: Real) -> Arc<dyn YieldTermStructure> {
        let today = Date::from_ymd(2002, 7, 5).unwrap();
        Arc::new(FlatForward::new(
            TermStructureData::fixed(today, Target, Actual365Fixed),
            rate,
        ))
    }

    fn helper(strike: Real, error_type: CalibrationErrorType) -> HestonModelHelper {
        HestonModelHelper::new(
            Period::new(6, TimeUnit::Weeks),
            &Target,
            4468.17,
            strike,
            Arc::new(SimpleQuote::new(0.3)),
            curve(0.035),
            curve(0.0),
            error_type,
        )
        .unwrap()
    }

    /// Prices every option at a fixed Black volatility.
    #[derive(Debug)]
    struct BlackAt(Volatility, Arc<HestonModelHelper>);

    impl PricingEngine<VanillaOptionArguments> for BlackAt {
        fn calculate(&self, _args: &VanillaOptionArguments) -> Result<PricingResults> {
            Ok(PricingResults::from_value(self.1.black_price(self.0)?))
        }
    }

    #[test]
    fn out_of_the_money_option_is_chosen() {
        assert_eq!(
            helper(5000.0, CalibrationErrorType::RelativePriceError).option().option_type(),
            OptionType::Call
        );
        assert_eq!(
            helper(4000.0, CalibrationErrorType::RelativePriceError).option().option_type(),
            OptionType::Put
        );
    }

    #[test]
    fn exercise_follows_the_calendar() {
        let h = helper(4400.0, CalibrationErrorType::RelativePriceError);
        // 5 July 2002 + 6 weeks is Friday 16 August 2002
        assert_eq!(h.exercise_date(), Date::from_ymd(2002, 8, 16).unwrap());
        assert_abs_diff_eq!(h.maturity(), 42.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn errors_vanish_when_the_engine_reproduces_the_quote() {
        for error_type in [
            CalibrationErrorType::RelativePriceError,
            CalibrationErrorType::PriceError,
            CalibrationErrorType::ImpliedVolError,
        ] {
            let mut h = helper(4600.0, error_type);
            assert!(h.model_value().is_err());
            let reference = Arc::new(helper(4600.0, error_type));
            h.set_pricing_engine(Arc::new(BlackAt(0.3, reference)));
            assert_abs_diff_eq!(h.calibration_error().unwrap(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn implied_vol_error_is_in_vol_units() {
        let mut h = helper(4200.0, CalibrationErrorType::ImpliedVolError);
        let reference = Arc::new(helper(4200.0, CalibrationErrorType::ImpliedVolError));
        h.set_pricing_engine(Arc::new(BlackAt(0.32, reference)));
        assert_abs_diff_eq!(h.calibration_error().unwrap(), 0.02, epsilon = 1e-9);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let make = |s0: Real, strike: Real, months: i32| {
            HestonModelHelper::new(
                Period::new(months, TimeUnit::Months),
                &Target,
                s0,
                strike,
                Arc::new(SimpleQuote::new(0.2)),
                curve(0.03),
                curve(0.0),
                CalibrationErrorType::default(),
            )
        };
        assert!(make(0.0, 100.0, 3).is_err());
        assert!(make(100.0, -1.0, 3).is_err());
        assert!(make(100.0, 100.0, 0).is_err());
        assert!(make(100.0, 100.0, 3).is_ok());
    }
}
