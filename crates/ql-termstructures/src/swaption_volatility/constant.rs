//! Flat swaption volatility: one level for every option time, swap length
//! and strike.

use super::SwaptionVolatilityStructure;
use crate::smile_section::{FlatSmileSection, SmileSection};
use crate::term_structure::{TermStructure, TermStructureData};
use crate::volatility_term_structure::VolatilityTermStructure;
use ql_core::{errors::Result, Real, Time, Volatility};
use ql_quotes::{Quote, SimpleQuote};
use ql_time::{BusinessDayConvention, Date, Period, TimeUnit};
use std::sync::Arc;

/// Swaption volatility that is the same everywhere, read from a quote.
///
/// Swap tenors up to 100 years are covered and strikes are unbounded.
#[derive(Debug)]
pub struct ConstantSwaptionVolatility {
    data: TermStructureData,
    convention: BusinessDayConvention,
    volatility: Arc<dyn Quote>,
}

impl ConstantSwaptionVolatility {
    /// Surface with a fixed volatility.
    pub fn new(
        data: TermStructureData,
        convention: BusinessDayConvention,
        volatility: Volatility,
    ) -> Self {
        Self::from_quote(data, convention, Arc::new(SimpleQuote::new(volatility)))
    }

    /// Surface whose level follows `volatility`.
    pub fn from_quote(
        data: TermStructureData,
        convention: BusinessDayConvention,
        volatility: Arc<dyn Quote>,
    ) -> Self {
        Self {
            data,
            convention,
            volatility,
        }
    }
}

impl TermStructure for ConstantSwaptionVolatility {
    fn data(&self) -> &TermStructureData {
        &self.data
    }

    fn max_date(&self) -> Date {
        Date::MAX
    }
}

impl VolatilityTermStructure for ConstantSwaptionVolatility {
    fn business_day_convention(&self) -> BusinessDayConvention {
        self.convention
    }

    fn min_strike(&self) -> Real {
        Real::NEG_INFINITY
    }

    fn max_strike(&self) -> Real {
        Real::INFINITY
    }
}

impl SwaptionVolatilityStructure for ConstantSwaptionVolatility {
    fn max_swap_tenor(&self) -> Period {
        Period::new(100, TimeUnit::Years)
    }

    fn volatility_impl(&self, _t: Time, _l: Time, _strike: Real) -> Result<Volatility> {
        self.volatility.checked_value()
    }

    fn smile_section_impl(&self, option_time: Time, _l: Time) -> Result<Box<dyn SmileSection>> {
        Ok(Box::new(FlatSmileSection::new(
            option_time,
            self.volatility.checked_value()?,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_core::Error;
    use ql_time::{Actual365Fixed, Target};

    fn surface(vol: Arc<SimpleQuote>) -> ConstantSwaptionVolatility {
        ConstantSwaptionVolatility::from_quote(
            TermStructureData::fixed(Date::from_ymd(2002, 7, 5).unwrap(), Target, Actual365Fixed),
            BusinessDayConvention::Following,
            vol,
        )
    }

    #[test]
    fn flat_everywhere_inside_the_domain() {
        let s = surface(Arc::new(SimpleQuote::new(0.2)));
        assert_eq!(s.volatility(1.0, 10.0, 0.05, false).unwrap(), 0.2);
        assert_eq!(s.volatility(30.0, 99.0, -1.0, false).unwrap(), 0.2);
        let smile = s.smile_section(2.0, 5.0, false).unwrap();
        assert_eq!(smile.exercise_time(), 2.0);
        assert_eq!(smile.volatility(0.03), 0.2);
    }

    #[test]
    fn swap_length_beyond_one_hundred_years() {
        let s = surface(Arc::new(SimpleQuote::new(0.2)));
        let err = s.volatility(1.0, 101.0, 0.05, false).unwrap_err();
        assert!(matches!(err, Error::OutOfRange(_)));
        assert!(err.to_string().contains("past max curve swapLength"));
        assert!(s.volatility(1.0, 101.0, 0.05, true).is_ok());
    }

    #[test]
    fn follows_its_quote() {
        let q = Arc::new(SimpleQuote::new(0.2));
        let s = surface(q.clone());
        q.set_value(0.3);
        assert_eq!(s.volatility(1.0, 1.0, 0.0, false).unwrap(), 0.3);
        q.reset();
        assert!(s.volatility(1.0, 1.0, 0.0, false).is_err());
    }
}
