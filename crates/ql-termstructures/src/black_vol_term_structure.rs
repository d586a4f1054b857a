//! `BlackVolTermStructure`: Black volatility by time and strike, and the
//! flat `BlackConstantVol`.

use crate::term_structure::{TermStructure, TermStructureData};
use crate::volatility_term_structure::VolatilityTermStructure;
use ql_core::{errors::Result, Real, Time, Volatility};
use ql_time::{BusinessDayConvention, Date};

/// Equity-style Black volatility surface.
pub trait BlackVolTermStructure: VolatilityTermStructure {
    /// Volatility at `(t, strike)` after range checks.
    fn black_vol_impl(&self, t: Time, strike: Real) -> Volatility;

    /// Black volatility at time `t`.
    fn black_vol(&self, t: Time, strike: Real, extrapolate: bool) -> Result<Volatility> {
        self.check_range(t, extrapolate)?;
        self.check_strike(strike, extrapolate)?;
        Ok(self.black_vol_impl(t, strike))
    }

    /// Black volatility at `date`.
    fn black_vol_date(&self, date: Date, strike: Real, extrapolate: bool) -> Result<Volatility> {
        self.check_range_date(date, extrapolate)?;
        self.black_vol(self.time_from_reference(date), strike, true)
    }

    /// Black variance `σ²·t`.
    fn black_variance(&self, t: Time, strike: Real, extrapolate: bool) -> Result<Real> {
        let v = self.black_vol(t, strike, extrapolate)?;
        Ok(v * v * t)
    }
}

/// Black volatility that is the same at every time and strike.
#[derive(Debug)]
pub struct BlackConstantVol {
    data: TermStructureData,
    volatility: Volatility,
}

impl BlackConstantVol {
    /// Flat surface at `volatility`.
    pub fn new(data: TermStructureData, volatility: Volatility) -> Self {
        Self { data, volatility }
    }

    /// The volatility level.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }
}

impl TermStructure for BlackConstantVol {
    fn data(&self) -> &TermStructureData {
        &self.data
    }

    fn max_date(&self) -> Date {
        Date::MAX
    }
}

impl VolatilityTermStructure for BlackConstantVol {
    fn business_day_convention(&self) -> BusinessDayConvention {
        BusinessDayConvention::Following
    }

    fn min_strike(&self) -> Real {
        Real::NEG_INFINITY
    }

    fn max_strike(&self) -> Real {
        Real::INFINITY
    }
}

impl BlackVolTermStructure for BlackConstantVol {
    fn black_vol_impl(&self, _t: Time, _strike: Real) -> Volatility {
        self.volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_time::{Actual365Fixed, NullCalendar};

    #[test]
    fn constant_vol_and_variance() {
        let today = Date::from_ymd(2007, 3, 30).unwrap();
        let vol = BlackConstantVol::new(
            TermStructureData::fixed(today, NullCalendar, Actual365Fixed),
            0.25,
        );
        assert_eq!(vol.black_vol(3.0, 80.0, false).unwrap(), 0.25);
        assert_abs_diff_eq!(vol.black_variance(2.0, 120.0, false).unwrap(), 0.125, epsilon = 1e-15);
        let later = Date::from_ymd(2008, 3, 30).unwrap();
        assert_eq!(vol.black_vol_date(later, 100.0, false).unwrap(), 0.25);
        assert!(vol.black_vol(-1.0, 100.0, true).is_err());
    }
}
