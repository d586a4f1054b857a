//! `VolatilityTermStructure`: strike domain and option-date rolling shared
//! by every volatility structure.

use crate::term_structure::TermStructure;
use ql_core::{
    errors::{Error, Result},
    Real,
};
use ql_time::{BusinessDayConvention, Date, Period};

/// A term structure indexed by strike as well as time.
pub trait VolatilityTermStructure: TermStructure {
    /// Convention used to roll option dates obtained from tenors.
    fn business_day_convention(&self) -> BusinessDayConvention;

    /// Lowest strike in the domain.
    fn min_strike(&self) -> Real;

    /// Highest strike in the domain.
    fn max_strike(&self) -> Real;

    /// Option date `tenor` after the reference date, rolled on the
    /// structure's calendar with its business-day convention.
    fn option_date_from_tenor(&self, tenor: Period) -> Result<Date> {
        self.calendar().advance(
            self.reference_date(),
            tenor,
            self.business_day_convention(),
            false,
        )
    }

    /// Fails unless `strike` lies in `[min_strike, max_strike]` or
    /// extrapolation is permitted.
    fn check_strike(&self, strike: Real, extrapolate: bool) -> Result<()> {
        let (min, max) = (self.min_strike(), self.max_strike());
        if !(extrapolate || self.allows_extrapolation() || (strike >= min && strike <= max)) {
            return Err(Error::OutOfRange(format!(
                "strike ({strike}) is outside the curve domain [{min},{max}]"
            )));
        }
        Ok(())
    }
}
