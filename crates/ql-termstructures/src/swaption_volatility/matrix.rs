use super::SwaptionVolatilityStructure;
use crate::smile_section::{FlatSmileSection, SmileSection};
use crate::term_structure::{TermStructure, TermStructureData};
use crate::volatility_term_structure::VolatilityTermStructure;
use ql_core::{ensure, errors::Result, Real, Time, Volatility};
use ql_math::interpolations::{BilinearInterpolation, Interpolation2D};
use ql_time::{BusinessDayConvention, Date, Period};
use std::cmp::Ordering;

/// At-the-money swaption volatilities on an option-tenor × swap-tenor grid.
///
/// Option times come from rolling each option tenor off the reference
/// date; swap lengths are `year_fraction(ref, ref + swap_tenor)`. Both are
/// recomputed on every query so that a floating reference date is
/// followed. Values between nodes are bilinear in (option time, swap
/// length); the smile at any point is flat.
#[derive(Debug)]
pub struct SwaptionVolatilityMatrix {
    data: TermStructureData,
    convention: BusinessDayConvention,
    option_tenors: Vec<Period>,
    swap_tenors: Vec<Period>,
    /// Row-major, one row per option tenor.
    volatilities: Vec<Volatility>,
}

fn strictly_increasing(tenors: &[Period]) -> bool {
    tenors
        .windows(2)
        .all(|w| w[0].partial_cmp(&w[1]) == Some(Ordering::Less))
}

impl SwaptionVolatilityMatrix {
    /// Matrix with `volatilities[i * swap_tenors.len() + j]` quoted for
    /// option tenor `i` and swap tenor `j`.
    pub fn new(
        data: TermStructureData,
        convention: BusinessDayConvention,
        option_tenors: Vec<Period>,
        swap_tenors: Vec<Period>,
        volatilities: Vec<Volatility>,
    ) -> Result<Self> {
        ensure!(!option_tenors.is_empty(), "no option tenors given");
        ensure!(!swap_tenors.is_empty(), "no swap tenors given");
        ensure!(
            option_tenors[0].length >= 0,
            "negative option tenor ({}) given",
            option_tenors[0]
        );
        ensure!(
            swap_tenors[0].length > 0,
            "non-positive swap tenor ({}) given",
            swap_tenors[0]
        );
        ensure!(
            strictly_increasing(&option_tenors),
            "option tenors must be strictly increasing"
        );
        ensure!(
            strictly_increasing(&swap_tenors),
            "swap tenors must be strictly increasing"
        );
        ensure!(
            volatilities.len() == option_tenors.len() * swap_tenors.len(),
            "{}x{} grid needs {} volatilities, {} given",
            option_tenors.len(),
            swap_tenors.len(),
            option_tenors.len() * swap_tenors.len(),
            volatilities.len()
        );
        ensure!(
            volatilities.iter().all(|v| v.is_finite() && *v >= 0.0),
            "volatilities must be finite and non-negative"
        );
        let matrix = Self {
            data,
            convention,
            option_tenors,
            swap_tenors,
            volatilities,
        };
        matrix.interpolation()?;
        Ok(matrix)
    }

    /// Option tenors of the grid.
    pub fn option_tenors(&self) -> &[Period] {
        &self.option_tenors
    }

    /// Swap tenors of the grid.
    pub fn swap_tenors(&self) -> &[Period] {
        &self.swap_tenors
    }

    /// Option dates implied by the current reference date.
    pub fn option_dates(&self) -> Result<Vec<Date>> {
        self.option_tenors
            .iter()
            .map(|&p| self.option_date_from_tenor(p))
            .collect()
    }

    /// Option times implied by the current reference date.
    pub fn option_times(&self) -> Result<Vec<Time>> {
        Ok(self
            .option_dates()?
            .into_iter()
            .map(|d| self.time_from_reference(d))
            .collect())
    }

    /// Swap lengths implied by the current reference date.
    pub fn swap_lengths(&self) -> Result<Vec<Time>> {
        let reference = self.reference_date();
        self.swap_tenors
            .iter()
            .map(|&p| Ok(self.time_from_reference(reference.add_period(p)?)))
            .collect()
    }

    fn interpolation(&self) -> Result<BilinearInterpolation> {
        // x runs along a row (swap length), y down the rows (option time)
        BilinearInterpolation::new(
            &self.swap_lengths()?,
            &self.option_times()?,
            &self.volatilities,
        )
    }
}

impl TermStructure for SwaptionVolatilityMatrix {
    fn data(&self) -> &TermStructureData {
        &self.data
    }

    fn max_date(&self) -> Date {
        let last = self.option_tenors[self.option_tenors.len() - 1];
        self.option_date_from_tenor(last).unwrap_or(Date::MAX)
    }
}

impl VolatilityTermStructure for SwaptionVolatilityMatrix {
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

impl SwaptionVolatilityStructure for SwaptionVolatilityMatrix {
    fn max_swap_tenor(&self) -> Period {
        self.swap_tenors[self.swap_tenors.len() - 1]
    }

    fn volatility_impl(&self, option_time: Time, swap_length: Time, _strike: Real) -> Result<Volatility> {
        Ok(self.interpolation()?.value(swap_length, option_time))
    }

    fn smile_section_impl(&self, option_time: Time, swap_length: Time) -> Result<Box<dyn SmileSection>> {
        let vol = self.volatility_impl(option_time, swap_length, 0.0)?;
        Ok(Box::new(FlatSmileSection::new(option_time, vol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_core::Error;
    use ql_time::{Actual365Fixed, Target, TimeUnit};

    fn years(n: i32) -> Period {
        Period::new(n, TimeUnit::Years)
    }

    fn matrix() -> SwaptionVolatilityMatrix {
        SwaptionVolatilityMatrix::new(
            TermStructureData::fixed(Date::from_ymd(2002, 7, 5).unwrap(), Target, Actual365Fixed),
            BusinessDayConvention::ModifiedFollowing,
            vec![years(1), years(5)],
            vec![years(2), years(10)],
            vec![0.20, 0.16, 0.18, 0.14],
        )
        .unwrap()
    }

    #[test]
    fn nodes_are_reproduced_through_every_form() {
        let m = matrix();
        assert_abs_diff_eq!(
            m.volatility_tenor(years(1), years(2), 0.0, false).unwrap(),
            0.20,
            epsilon = 1e-12
        );
        let t = m.option_times().unwrap();
        let l = m.swap_lengths().unwrap();
        assert_abs_diff_eq!(m.volatility(t[1], l[1], 0.0, false).unwrap(), 0.14, epsilon = 1e-12);
    }

    #[test]
    fn bilinear_between_nodes() {
        let m = matrix();
        let t = m.option_times().unwrap();
        let l = m.swap_lengths().unwrap();
        let tm = 0.5 * (t[0] + t[1]);
        let lm = 0.5 * (l[0] + l[1]);
        assert_abs_diff_eq!(
            m.volatility(tm, lm, 0.0, false).unwrap(),
            0.25 * (0.20 + 0.16 + 0.18 + 0.14),
            epsilon = 1e-12
        );
    }

    #[test]
    fn domain_ends_at_last_option_date_and_swap_tenor() {
        let m = matrix();
        assert_eq!(m.max_swap_tenor(), years(10));
        let t_max = m.max_time();
        assert!(matches!(
            m.volatility(t_max + 0.1, 2.0, 0.0, false),
            Err(Error::OutOfRange(_))
        ));
        let l_max = m.max_swap_length().unwrap();
        assert!(m.volatility(1.0, l_max, 0.0, false).is_ok());
        assert!(matches!(
            m.volatility(1.0, l_max + 1e-6, 0.0, false),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn rejects_malformed_grids() {
        let data = || {
            TermStructureData::fixed(Date::from_ymd(2002, 7, 5).unwrap(), Target, Actual365Fixed)
        };
        let conv = BusinessDayConvention::Following;
        assert!(SwaptionVolatilityMatrix::new(
            data(),
            conv,
            vec![years(5), years(1)],
            vec![years(2)],
            vec![0.2, 0.2]
        )
        .is_err());
        assert!(SwaptionVolatilityMatrix::new(
            data(),
            conv,
            vec![years(1)],
            vec![years(2), years(10)],
            vec![0.2]
        )
        .is_err());
        assert!(SwaptionVolatilityMatrix::new(
            data(),
            conv,
            vec![years(1)],
            vec![Period::new(0, TimeUnit::Years)],
            vec![0.2]
        )
        .is_err());
    }
}
