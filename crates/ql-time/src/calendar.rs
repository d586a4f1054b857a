//! `Calendar` trait and the trivial calendars.
//!
//! A calendar knows which dates are business days; on top of that it rolls
//! dates with a [`BusinessDayConvention`] and advances them by periods.

use crate::business_day_convention::BusinessDayConvention;
use crate::date::Date;
use crate::period::Period;
use crate::time_unit::TimeUnit;
use ql_core::errors::Result;

/// A financial calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"TARGET"`).
    fn name(&self) -> &str;

    /// Return `true` if `date` is a business day in this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// Return `true` if `date` is not a business day.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Return `true` if `date` is the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> bool {
        date.month() != self.adjust(date + 1, BusinessDayConvention::Following).month()
    }

    /// Return the last business day of the month containing `date`.
    fn end_of_month(&self, date: Date) -> Date {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Roll `date` onto a business day according to `convention`.
    fn adjust(&self, mut date: Date, convention: BusinessDayConvention) -> Date {
        match convention {
            BusinessDayConvention::Unadjusted => date,
            BusinessDayConvention::Following => {
                while self.is_holiday(date) {
                    date += 1;
                }
                date
            }
            BusinessDayConvention::Preceding => {
                while self.is_holiday(date) {
                    date = date - 1;
                }
                date
            }
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = self.adjust(date, BusinessDayConvention::Following);
                if adjusted.month() != date.month() {
                    self.adjust(date, BusinessDayConvention::Preceding)
                } else {
                    adjusted
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = self.adjust(date, BusinessDayConvention::Preceding);
                if adjusted.month() != date.month() {
                    self.adjust(date, BusinessDayConvention::Following)
                } else {
                    adjusted
                }
            }
        }
    }

    /// Advance `date` by `n` business days.  `n == 0` leaves the date as is.
    fn advance_business_days(&self, mut date: Date, n: i32) -> Date {
        let step: i32 = if n >= 0 { 1 } else { -1 };
        let mut remaining = n.abs();
        while remaining > 0 {
            date += step;
            if self.is_business_day(date) {
                remaining -= 1;
            }
        }
        date
    }

    /// Advance `date` by `period` and roll the result with `convention`.
    ///
    /// * a zero-length period only rolls the date;
    /// * `Days` counts business days;
    /// * `Weeks` adds calendar weeks;
    /// * `Months`/`Years` add calendar months, clamping to month end, and
    ///   with `end_of_month` set a start on the last business day of its
    ///   month lands on the last business day of the target month.
    fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> Result<Date> {
        if period.length == 0 {
            return Ok(self.adjust(date, convention));
        }
        match period.unit {
            TimeUnit::Days => Ok(self.advance_business_days(date, period.length)),
            TimeUnit::Weeks => Ok(self.adjust(date.add_period(period)?, convention)),
            TimeUnit::Months | TimeUnit::Years => {
                let target = date.add_period(period)?;
                if end_of_month && self.is_end_of_month(date) {
                    Ok(self.end_of_month(target))
                } else {
                    Ok(self.adjust(target, convention))
                }
            }
        }
    }
}

/// Every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// Saturdays and Sundays are the only holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.weekday().is_weekend()
    }
}
