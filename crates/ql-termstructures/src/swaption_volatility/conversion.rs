//! Date/tenor to time-coordinate conversion.

use ql_core::{
    errors::{Error, Result},
    Time,
};
use ql_time::{Date, DayCounter, Period};

/// `(option_time, swap_length)` for a swaption expiring on `option_date`
/// whose underlying swap runs for `swap_tenor`.
///
/// Option time is measured from `reference_date`; swap length is the year
/// fraction from the option date to the swap end date. Fails with
/// [`Error::InvalidTenor`] unless the end date is strictly after the option
/// date.
pub fn convert_dates(
    reference_date: Date,
    option_date: Date,
    swap_tenor: Period,
    day_counter: &dyn DayCounter,
) -> Result<(Time, Time)> {
    let end = option_date.add_period(swap_tenor)?;
    if end <= option_date {
        return Err(Error::InvalidTenor(format!(
            "swap tenor ({swap_tenor}) leads to end date ({end}) not after option date ({option_date})"
        )));
    }
    Ok((
        day_counter.year_fraction(reference_date, option_date),
        day_counter.year_fraction(option_date, end),
    ))
}
