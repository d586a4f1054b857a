//! `InterpolatedZeroCurve`: continuously compounded zero rates at pillar
//! dates, linear in time between pillars.
//!
//! Beyond the last pillar the curve extends with a flat instantaneous
//! forward equal to the one implied at the last pillar.

use crate::term_structure::{TermStructure, TermStructureData};
use crate::yield_term_structure::YieldTermStructure;
use ql_core::{ensure, errors::Result, DiscountFactor, Rate, Real, Time};
use ql_math::interpolations::{Interpolation1D, LinearInterpolation};
use ql_time::{Calendar, Date, DayCounter};
use std::sync::Arc;

/// Zero curve through `(dates[i], rates[i])`; `dates[0]` is the reference
/// date.
#[derive(Debug)]
pub struct InterpolatedZeroCurve {
    data: TermStructureData,
    dates: Vec<Date>,
    times: Vec<Time>,
    rates: Vec<Rate>,
    interpolation: LinearInterpolation,
}

impl InterpolatedZeroCurve {
    /// Curve through the given pillars.
    pub fn new(
        dates: &[Date],
        rates: &[Rate],
        calendar: impl Calendar + 'static,
        day_counter: impl DayCounter + 'static,
    ) -> Result<Self> {
        ensure!(dates.len() >= 2, "at least two pillar dates required");
        ensure!(
            dates.len() == rates.len(),
            "{} dates but {} rates",
            dates.len(),
            rates.len()
        );
        let reference = dates[0];
        let day_counter: Arc<dyn DayCounter> = Arc::new(day_counter);
        let times: Vec<Time> = dates
            .iter()
            .map(|&d| day_counter.year_fraction(reference, d))
            .collect();
        let interpolation = LinearInterpolation::new(&times, rates)?;
        Ok(Self {
            data: TermStructureData::new(
                crate::term_structure::ReferenceDate::Fixed(reference),
                Arc::new(calendar),
                day_counter,
            ),
            dates: dates.to_vec(),
            times,
            rates: rates.to_vec(),
            interpolation,
        })
    }

    /// Pillar dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Pillar zero rates.
    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }

    fn zero_yield(&self, t: Time) -> Real {
        let t_max = self.times[self.times.len() - 1];
        if t <= t_max {
            return self.interpolation.value(t);
        }
        let z_max = self.rates[self.rates.len() - 1];
        let forward_max = z_max + t_max * self.interpolation.derivative(t_max);
        z_max * t_max / t + forward_max * (1.0 - t_max / t)
    }
}

impl TermStructure for InterpolatedZeroCurve {
    fn data(&self) -> &TermStructureData {
        &self.data
    }

    fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }
}

impl YieldTermStructure for InterpolatedZeroCurve {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        Ok((-self.zero_yield(t) * t).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_core::Error;
    use ql_time::{Actual365Fixed, Target};

    fn dax_curve() -> InterpolatedZeroCurve {
        let settlement = Date::from_ymd(2002, 7, 5).unwrap();
        let t = [13, 41, 75, 165, 256, 345, 524, 703];
        let r = [0.0357, 0.0349, 0.0341, 0.0355, 0.0359, 0.0368, 0.0386, 0.0401];
        let mut dates = vec![settlement];
        let mut rates = vec![0.0357];
        for (ti, ri) in t.iter().zip(r) {
            dates.push(settlement + *ti);
            rates.push(ri);
        }
        InterpolatedZeroCurve::new(&dates, &rates, Target, Actual365Fixed).unwrap()
    }

    #[test]
    fn reproduces_pillars_and_interpolates() {
        let zc = dax_curve();
        assert_abs_diff_eq!(zc.zero_rate(41.0 / 365.0, false).unwrap(), 0.0349, epsilon = 1e-12);
        let mid = (41.0 + 75.0) / 2.0 / 365.0;
        assert_abs_diff_eq!(zc.zero_rate(mid, false).unwrap(), 0.0345, epsilon = 1e-12);
    }

    #[test]
    fn extrapolation_beyond_last_pillar() {
        let zc = dax_curve();
        let t = 800.0 / 365.0;
        assert!(matches!(zc.discount(t, false), Err(Error::OutOfRange(_))));
        let d = zc.discount(t, true).unwrap();
        assert!(d < zc.discount(703.0 / 365.0, false).unwrap());
    }
}
