//! Query-protocol properties shared by every swaption volatility surface.

use proptest::prelude::*;
use ql_core::{Error, Real, Time, Volatility};
use ql_termstructures::swaption_volatility::{check_tenor_range, convert_dates};
use ql_termstructures::{
    FlatSmileSection, SmileSection, SwaptionVolatilityMatrix, SwaptionVolatilityStructure,
    TermStructure, TermStructureData, VolatilityTermStructure,
};
use ql_time::{Actual365Fixed, BusinessDayConvention, Calendar, Date, Period, Target, TimeUnit};

fn date(y: u16, m: u8, d: u8) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn years(n: i32) -> Period {
    Period::new(n, TimeUnit::Years)
}

fn months(n: i32) -> Period {
    Period::new(n, TimeUnit::Months)
}

/// Matrix with a smooth but non-flat surface over 1M..10Y × 1Y..30Y.
fn matrix(reference: Date) -> SwaptionVolatilityMatrix {
    let option_tenors = vec![months(1), months(6), years(1), years(5), years(10)];
    let swap_tenors = vec![years(1), years(5), years(10), years(30)];
    let vols = option_tenors
        .iter()
        .enumerate()
        .flat_map(|(i, _)| (0..4).map(move |j| 0.25 - 0.01 * i as Real - 0.015 * j as Real))
        .collect();
    SwaptionVolatilityMatrix::new(
        TermStructureData::fixed(reference, Target, Actual365Fixed),
        BusinessDayConvention::ModifiedFollowing,
        option_tenors,
        swap_tenors,
        vols,
    )
    .unwrap()
}

/// Surface with a bounded strike domain and a linear skew.
#[derive(Debug)]
struct SkewedSurface {
    data: TermStructureData,
}

impl SkewedSurface {
    fn new() -> Self {
        Self {
            data: TermStructureData::fixed(date(2002, 7, 5), Target, Actual365Fixed),
        }
    }
}

impl TermStructure for SkewedSurface {
    fn data(&self) -> &TermStructureData {
        &self.data
    }
    fn max_date(&self) -> Date {
        date(2022, 7, 5)
    }
}

impl VolatilityTermStructure for SkewedSurface {
    fn business_day_convention(&self) -> BusinessDayConvention {
        BusinessDayConvention::Following
    }
    fn min_strike(&self) -> Real {
        0.01
    }
    fn max_strike(&self) -> Real {
        0.10
    }
}

impl SwaptionVolatilityStructure for SkewedSurface {
    fn max_swap_tenor(&self) -> Period {
        years(30)
    }
    fn volatility_impl(&self, t: Time, l: Time, k: Real) -> ql_core::Result<Volatility> {
        Ok(0.3 - 0.5 * k + 0.001 * t + 0.0005 * l)
    }
    fn smile_section_impl(&self, t: Time, l: Time) -> ql_core::Result<Box<dyn SmileSection>> {
        Ok(Box::new(FlatSmileSection::new(t, self.volatility_impl(t, l, 0.05)?)))
    }
}

proptest! {
    #[test]
    fn date_form_agrees_with_time_form(
        option_days in 0i32..3000,
        swap_years in 1i32..30,
        strike in 0.01f64..0.10,
    ) {
        let m = matrix(date(2002, 7, 5));
        let option_date = date(2002, 7, 5) + option_days;
        let tenor = years(swap_years);
        let (t, l) = convert_dates(m.reference_date(), option_date, tenor, m.day_counter()).unwrap();
        let by_date = m.volatility_date(option_date, tenor, strike, true).unwrap();
        let by_time = m.volatility(t, l, strike, true).unwrap();
        prop_assert_eq!(by_date, by_time);
    }

    #[test]
    fn tenor_form_agrees_with_date_form(option_months in 1i32..120, swap_years in 1i32..30) {
        let m = matrix(date(2002, 7, 5));
        let option_date = m.option_date_from_tenor(months(option_months)).unwrap();
        let by_tenor = m.volatility_tenor(months(option_months), years(swap_years), 0.0, true).unwrap();
        let by_date = m.volatility_date(option_date, years(swap_years), 0.0, true).unwrap();
        prop_assert_eq!(by_tenor, by_date);
    }

    #[test]
    fn variance_is_squared_volatility_times_option_time(
        t in 0.0f64..20.0,
        l in 0.0f64..30.0,
        strike in 0.01f64..0.10,
    ) {
        let s = SkewedSurface::new();
        let v = s.volatility(t, l, strike, false).unwrap();
        prop_assert_eq!(s.black_variance(t, l, strike, false).unwrap(), v * v * t);
    }

    #[test]
    fn date_variance_uses_the_converted_option_time(option_days in 0i32..7000, swap_years in 1i32..30) {
        let s = SkewedSurface::new();
        let option_date = date(2002, 7, 5) + option_days;
        let (t, _) = s.convert_dates(option_date, years(swap_years)).unwrap();
        let v = s.volatility_date(option_date, years(swap_years), 0.05, true).unwrap();
        let var = s.black_variance_date(option_date, years(swap_years), 0.05, true).unwrap();
        prop_assert_eq!(var, v * v * t);
    }

    #[test]
    fn extrapolation_overrides_every_bound(
        t in 0.0f64..1.0e3,
        l in 0.0f64..1.0e3,
        strike in -10.0f64..10.0,
    ) {
        let s = SkewedSurface::new();
        prop_assert!(s.volatility(t, l, strike, true).is_ok());
        s.enable_extrapolation();
        prop_assert!(s.volatility(t, l, strike, false).is_ok());
    }
}

#[test]
fn strike_bounds_are_inclusive() {
    let s = SkewedSurface::new();
    assert!(s.volatility(1.0, 5.0, 0.10, false).is_ok());
    assert!(s.volatility(1.0, 5.0, 0.01, false).is_ok());
    let err = s.volatility(1.0, 5.0, 0.10 + 1e-12, false).unwrap_err();
    assert!(matches!(err, Error::OutOfRange(_)));
    assert!(err.to_string().contains("outside the curve domain"));
    assert!(s.volatility(1.0, 5.0, 0.01 - 1e-12, false).is_err());
}

#[test]
fn swap_length_bound_is_inclusive() {
    let s = SkewedSurface::new();
    let max = s.max_swap_length().unwrap();
    assert!(s.volatility(1.0, max, 0.05, false).is_ok());
    let err = s.volatility(1.0, max + 1e-9, 0.05, false).unwrap_err();
    assert!(matches!(err, Error::OutOfRange(_)));
    assert!(err.to_string().contains(&format!("past max curve swapLength ({max})")));
}

#[test]
fn negative_inputs_are_invalid_even_with_extrapolation() {
    let s = SkewedSurface::new();
    assert!(matches!(
        s.volatility(1.0, -0.5, 0.05, true),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        s.volatility(-0.5, 1.0, 0.05, true),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        s.volatility_date(date(2003, 1, 1), Period::new(0, TimeUnit::Months), 0.05, true),
        Err(Error::InvalidTenor(_))
    ));
}

#[test]
fn option_time_bound_comes_from_max_date() {
    let s = SkewedSurface::new();
    let t_max = s.max_time();
    assert!(s.volatility(t_max, 1.0, 0.05, false).is_ok());
    assert!(matches!(
        s.volatility(t_max + 0.01, 1.0, 0.05, false),
        Err(Error::OutOfRange(_))
    ));
    assert!(s.volatility(t_max + 0.01, 1.0, 0.05, true).is_ok());
}

#[test]
fn smile_section_matches_point_query() {
    let s = SkewedSurface::new();
    let d = date(2004, 7, 5);
    let smile = s.smile_section_date(d, years(10), false).unwrap();
    let (t, _) = s.convert_dates(d, years(10)).unwrap();
    assert_eq!(smile.exercise_time(), t);
    assert_eq!(
        smile.volatility(0.07),
        s.volatility_date(d, years(10), 0.05, false).unwrap()
    );
}

#[test]
fn tenor_and_time_checks_can_disagree_across_leap_days() {
    // Max swap length from 1 Jan 2001 spans 30Y = 10957 days, while 30Y
    // from 1 Mar 2003 spans 10958 days: the tenor check passes but the
    // year-fraction check does not.
    let m = matrix(date(2001, 1, 1));
    let option_date = date(2003, 3, 1);
    let max = m.max_swap_length().unwrap();
    assert_eq!(max, 10957.0 / 365.0);
    let (_, l) = m.convert_dates(option_date, years(30)).unwrap();
    assert_eq!(l, 10958.0 / 365.0);

    assert!(check_tenor_range(&m, option_date, years(30), 0.05, false).is_ok());
    assert!(matches!(
        m.volatility_date(option_date, years(30), 0.05, false),
        Err(Error::OutOfRange(_))
    ));
    assert!(m.volatility_date(option_date, years(30), 0.05, true).is_ok());
}

#[test]
fn tenor_check_rejects_unordered_and_long_tenors() {
    let m = matrix(date(2001, 1, 1));
    let option_date = date(2003, 3, 3);
    assert!(matches!(
        check_tenor_range(&m, option_date, years(31), 0.05, false),
        Err(Error::OutOfRange(_))
    ));
    assert!(check_tenor_range(&m, option_date, years(31), 0.05, true).is_ok());
    assert!(matches!(
        check_tenor_range(&m, option_date, Period::new(10957, TimeUnit::Days), 0.05, false),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        check_tenor_range(&m, option_date, Period::new(-1, TimeUnit::Years), 0.05, true),
        Err(Error::InvalidTenor(_))
    ));
}

#[test]
fn floating_reference_moves_the_matrix() {
    use ql_time::Settings;
    use std::sync::Arc;

    let settings = Arc::new(Settings::new(date(2002, 7, 5)));
    let m = SwaptionVolatilityMatrix::new(
        TermStructureData::floating(settings.clone(), 0, Target, Actual365Fixed),
        BusinessDayConvention::Following,
        vec![years(1), years(2)],
        vec![years(1), years(10)],
        vec![0.2, 0.2, 0.2, 0.2],
    )
    .unwrap();
    assert_eq!(m.max_date(), date(2004, 7, 5));
    let _guard = settings.scoped(date(2003, 7, 4));
    assert_eq!(m.reference_date(), date(2003, 7, 4));
    assert_eq!(m.max_date(), date(2005, 7, 4));
    assert_eq!(
        m.option_dates().unwrap()[0],
        Target.adjust(date(2004, 7, 4), BusinessDayConvention::Following)
    );
}
