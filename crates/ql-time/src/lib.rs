//! # ql-time
//!
//! Dates, periods, calendars, business-day conventions, day counters, and
//! the injectable evaluation-date provider.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Business-day adjustment conventions.
pub mod business_day_convention;

/// Calendar trait and trivial calendars.
pub mod calendar;

/// Concrete settlement calendars.
pub mod calendars;

/// `Date` type.
pub mod date;

/// `DayCounter` trait and day-count conventions.
pub mod day_counter;

/// `Period` — a time span in a `TimeUnit`.
pub mod period;

/// Evaluation-date provider.
pub mod settings;

/// `TimeUnit` — days, weeks, months, years.
pub mod time_unit;

/// `Weekday` — day of the week.
pub mod weekday;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use business_day_convention::BusinessDayConvention;
pub use calendar::{Calendar, NullCalendar, WeekendsOnly};
pub use calendars::Target;
pub use date::Date;
pub use day_counter::{Actual360, Actual365Fixed, ActualActualIsda, DayCounter, Thirty360};
pub use period::Period;
pub use settings::{ScopedEvaluationDate, Settings};
pub use time_unit::TimeUnit;
pub use weekday::Weekday;
