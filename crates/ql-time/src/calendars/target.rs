//! TARGET (Trans-European Automated Real-time Gross Settlement) calendar.

use crate::calendar::Calendar;
use crate::date::{days_in_month, Date};

/// TARGET calendar.
///
/// Besides weekends the following days are holidays:
/// * New Year's Day;
/// * Good Friday and Easter Monday (since 2000);
/// * Labour Day, 1 May (since 2000);
/// * Christmas and 26 December;
/// * 31 December in 1998, 1999 and 2001.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

impl Calendar for Target {
    fn name(&self) -> &str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.weekday().is_weekend() {
            return false;
        }
        let (y, m, d) = (date.year(), date.month(), date.day_of_month());
        let dd = date.day_of_year();
        let em = easter_monday(y);
        let holiday = (d == 1 && m == 1)
            || (y >= 2000 && (dd == em - 3 || dd == em))
            || (y >= 2000 && d == 1 && m == 5)
            || (m == 12 && (d == 25 || d == 26))
            || (d == 31 && m == 12 && matches!(y, 1998 | 1999 | 2001));
        !holiday
    }
}

/// Day of the year (1-based) of Easter Monday in `year`.
fn easter_monday(year: u16) -> u16 {
    let y = year as i32;
    let g = y % 19;
    let c = y / 100;
    let h = (c - c / 4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
    let i = h - (h / 28) * (1 - (h / 28) * (29 / (h + 1)) * ((21 - g) / 11));
    let j = (y + y / 4 + i + 2 - c + c / 4) % 7;
    let p = i - j;
    let sunday = 1 + (p + 27 + (p + 6) / 40) % 31;
    let month = 3 + (p + 26) / 30;
    let offset: u16 = (1..month as u8).map(|m| days_in_month(year, m) as u16).sum();
    offset + sunday as u16 + 1
}
