//! Range validation for swaption volatility queries.
//!
//! A query is in range when its option time, swap length and strike all
//! lie inside the surface's domain. Any bound may be exceeded when the
//! per-call flag or the structure-wide switch allows extrapolation.

use super::SwaptionVolatilityStructure;
use ql_core::{
    errors::{Error, Result},
    Real, Time,
};
use ql_time::{Date, Period};
use std::cmp::Ordering;

/// Fails if `swap_length` is negative, or past the maximum swap length
/// without extrapolation.
pub fn check_swap_length<S>(surface: &S, swap_length: Time, extrapolate: bool) -> Result<()>
where
    S: SwaptionVolatilityStructure + ?Sized,
{
    if swap_length < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "negative swapLength ({swap_length}) given"
        )));
    }
    if extrapolate || surface.allows_extrapolation() {
        return Ok(());
    }
    let max = surface.max_swap_length()?;
    if swap_length > max {
        return Err(Error::OutOfRange(format!(
            "swapLength ({swap_length}) is past max curve swapLength ({max})"
        )));
    }
    Ok(())
}

/// Time-coordinate range check: option time, swap length, then strike.
pub fn check_time_range<S>(
    surface: &S,
    option_time: Time,
    swap_length: Time,
    strike: Real,
    extrapolate: bool,
) -> Result<()>
where
    S: SwaptionVolatilityStructure + ?Sized,
{
    surface.check_range(option_time, extrapolate)?;
    check_swap_length(surface, swap_length, extrapolate)?;
    surface.check_strike(strike, extrapolate)
}

/// Calendar-coordinate range check.
///
/// The swap bound is checked on tenors (`swap_tenor <= max_swap_tenor`)
/// instead of on year fractions, so it can disagree with
/// [`check_time_range`] when leap days fall differently in the two swap
/// periods. A tenor that cannot be ordered against the maximum is an
/// invalid argument.
pub fn check_tenor_range<S>(
    surface: &S,
    option_date: Date,
    swap_tenor: Period,
    strike: Real,
    extrapolate: bool,
) -> Result<()>
where
    S: SwaptionVolatilityStructure + ?Sized,
{
    surface.check_range_date(option_date, extrapolate)?;
    if swap_tenor.length <= 0 {
        return Err(Error::InvalidTenor(format!(
            "non-positive swap tenor ({swap_tenor}) given"
        )));
    }
    let max = surface.max_swap_tenor();
    let allowed = extrapolate || surface.allows_extrapolation();
    match swap_tenor.partial_cmp(&max) {
        Some(Ordering::Greater) if !allowed => {
            return Err(Error::OutOfRange(format!(
                "swap tenor ({swap_tenor}) is past max tenor ({max})"
            )));
        }
        None if !allowed => {
            return Err(Error::InvalidArgument(format!(
                "swap tenor ({swap_tenor}) cannot be compared with max tenor ({max})"
            )));
        }
        _ => {}
    }
    surface.check_strike(strike, extrapolate)
}
