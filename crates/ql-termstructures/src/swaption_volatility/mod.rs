//! Swaption volatility surfaces: volatility indexed by option expiry,
//! underlying swap length and strike.
//!
//! Every query comes in three forms that agree once normalized:
//!
//! * time based, `(option_time, swap_length)`;
//! * date based, `(option_date, swap_tenor)`, converted through
//!   [`convert_dates`];
//! * tenor based, `(option_tenor, swap_tenor)`, whose option date is
//!   [`option_date_from_tenor`](VolatilityTermStructure::option_date_from_tenor).
//!
//! The date and tenor forms normalize to times first and then share the
//! time-based range check, so all three reject and accept the same
//! queries. [`check_tenor_range`] is available separately for callers
//! that want the bound expressed on tenors.

mod constant;
mod conversion;
mod matrix;
mod range;

pub use constant::ConstantSwaptionVolatility;
pub use conversion::convert_dates;
pub use matrix::SwaptionVolatilityMatrix;
pub use range::{check_swap_length, check_tenor_range, check_time_range};

use crate::smile_section::SmileSection;
use crate::volatility_term_structure::VolatilityTermStructure;
use ql_core::{errors::Result, Real, Time, Volatility};
use ql_time::{Date, Period};

/// Query protocol of a swaption volatility surface.
///
/// Implementors supply the domain bounds and the two time-based hooks;
/// the checked public queries are provided.
pub trait SwaptionVolatilityStructure: VolatilityTermStructure {
    /// Longest underlying swap tenor covered.
    fn max_swap_tenor(&self) -> Period;

    /// Volatility at already range-checked coordinates.
    fn volatility_impl(&self, option_time: Time, swap_length: Time, strike: Real)
        -> Result<Volatility>;

    /// Smile at already range-checked coordinates.
    fn smile_section_impl(
        &self,
        option_time: Time,
        swap_length: Time,
    ) -> Result<Box<dyn SmileSection>>;

    /// Year fraction spanned by [`max_swap_tenor`](Self::max_swap_tenor)
    /// from the current reference date.
    fn max_swap_length(&self) -> Result<Time> {
        let reference = self.reference_date();
        let end = reference.add_period(self.max_swap_tenor())?;
        Ok(self.time_from_reference(end))
    }

    /// `(option_time, swap_length)` for the given calendar coordinates.
    fn convert_dates(&self, option_date: Date, swap_tenor: Period) -> Result<(Time, Time)> {
        convert_dates(
            self.reference_date(),
            option_date,
            swap_tenor,
            self.day_counter(),
        )
    }

    /// Volatility at time coordinates.
    fn volatility(
        &self,
        option_time: Time,
        swap_length: Time,
        strike: Real,
        extrapolate: bool,
    ) -> Result<Volatility> {
        check_time_range(self, option_time, swap_length, strike, extrapolate)?;
        self.volatility_impl(option_time, swap_length, strike)
    }

    /// Volatility for an option date and swap tenor.
    fn volatility_date(
        &self,
        option_date: Date,
        swap_tenor: Period,
        strike: Real,
        extrapolate: bool,
    ) -> Result<Volatility> {
        let (t, l) = self.convert_dates(option_date, swap_tenor)?;
        self.volatility(t, l, strike, extrapolate)
    }

    /// Volatility for an option tenor and swap tenor.
    fn volatility_tenor(
        &self,
        option_tenor: Period,
        swap_tenor: Period,
        strike: Real,
        extrapolate: bool,
    ) -> Result<Volatility> {
        let option_date = self.option_date_from_tenor(option_tenor)?;
        self.volatility_date(option_date, swap_tenor, strike, extrapolate)
    }

    /// Black variance `σ²·T` at time coordinates.
    fn black_variance(
        &self,
        option_time: Time,
        swap_length: Time,
        strike: Real,
        extrapolate: bool,
    ) -> Result<Real> {
        let v = self.volatility(option_time, swap_length, strike, extrapolate)?;
        Ok(v * v * option_time)
    }

    /// Black variance for an option date and swap tenor, using the option
    /// time of the same conversion that produced the volatility.
    fn black_variance_date(
        &self,
        option_date: Date,
        swap_tenor: Period,
        strike: Real,
        extrapolate: bool,
    ) -> Result<Real> {
        let (t, l) = self.convert_dates(option_date, swap_tenor)?;
        self.black_variance(t, l, strike, extrapolate)
    }

    /// Black variance for an option tenor and swap tenor.
    fn black_variance_tenor(
        &self,
        option_tenor: Period,
        swap_tenor: Period,
        strike: Real,
        extrapolate: bool,
    ) -> Result<Real> {
        let option_date = self.option_date_from_tenor(option_tenor)?;
        self.black_variance_date(option_date, swap_tenor, strike, extrapolate)
    }

    /// Smile at time coordinates.
    fn smile_section(
        &self,
        option_time: Time,
        swap_length: Time,
        extrapolate: bool,
    ) -> Result<Box<dyn SmileSection>> {
        self.check_range(option_time, extrapolate)?;
        check_swap_length(self, swap_length, extrapolate)?;
        self.smile_section_impl(option_time, swap_length)
    }

    /// Smile for an option date and swap tenor.
    fn smile_section_date(
        &self,
        option_date: Date,
        swap_tenor: Period,
        extrapolate: bool,
    ) -> Result<Box<dyn SmileSection>> {
        let (t, l) = self.convert_dates(option_date, swap_tenor)?;
        self.smile_section(t, l, extrapolate)
    }
}
