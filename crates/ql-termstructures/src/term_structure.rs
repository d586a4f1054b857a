//! `TermStructure`: reference frame, time conversion and range checks
//! shared by every curve and surface.
//!
//! The reference date is either fixed at construction or floats with an
//! injected [`Settings`] provider plus a settlement lag. Extrapolation is a
//! structure-wide switch that range checks OR with the per-call flag.

use ql_core::{
    errors::{Error, Result},
    Time,
};
use ql_time::{BusinessDayConvention, Calendar, Date, DayCounter, Settings};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a term structure obtains its reference date.
#[derive(Debug, Clone)]
pub enum ReferenceDate {
    /// A date fixed at construction.
    Fixed(Date),
    /// The evaluation date of `settings` advanced by `settlement_days`
    /// business days, recomputed on every query. With no lag the
    /// evaluation date rolls forward to a business day.
    Floating {
        /// Valuation-date provider.
        settings: Arc<Settings>,
        /// Business days between evaluation and reference date.
        settlement_days: u32,
    },
}

/// Reference frame and extrapolation switch held by concrete structures.
#[derive(Debug)]
pub struct TermStructureData {
    reference: ReferenceDate,
    calendar: Arc<dyn Calendar>,
    day_counter: Arc<dyn DayCounter>,
    extrapolate: AtomicBool,
}

impl TermStructureData {
    /// Frame anchored at a fixed reference date.
    pub fn fixed(
        reference_date: Date,
        calendar: impl Calendar + 'static,
        day_counter: impl DayCounter + 'static,
    ) -> Self {
        Self::new(
            ReferenceDate::Fixed(reference_date),
            Arc::new(calendar),
            Arc::new(day_counter),
        )
    }

    /// Frame whose reference date follows `settings`.
    pub fn floating(
        settings: Arc<Settings>,
        settlement_days: u32,
        calendar: impl Calendar + 'static,
        day_counter: impl DayCounter + 'static,
    ) -> Self {
        Self::new(
            ReferenceDate::Floating {
                settings,
                settlement_days,
            },
            Arc::new(calendar),
            Arc::new(day_counter),
        )
    }

    /// Frame from already shared collaborators.
    pub fn new(
        reference: ReferenceDate,
        calendar: Arc<dyn Calendar>,
        day_counter: Arc<dyn DayCounter>,
    ) -> Self {
        Self {
            reference,
            calendar,
            day_counter,
            extrapolate: AtomicBool::new(false),
        }
    }

    /// Set the structure-wide extrapolation switch.
    pub fn with_extrapolation(self, allow: bool) -> Self {
        self.extrapolate.store(allow, Ordering::Relaxed);
        self
    }

    fn reference_date(&self) -> Date {
        match &self.reference {
            ReferenceDate::Fixed(d) => *d,
            ReferenceDate::Floating {
                settings,
                settlement_days,
            } => {
                let today = settings.evaluation_date();
                if *settlement_days == 0 {
                    self.calendar.adjust(today, BusinessDayConvention::Following)
                } else {
                    self.calendar
                        .advance_business_days(today, *settlement_days as i32)
                }
            }
        }
    }
}

/// Base behaviour of every curve and surface.
pub trait TermStructure: std::fmt::Debug + Send + Sync {
    /// The frame this structure is anchored to.
    fn data(&self) -> &TermStructureData;

    /// Latest date for which the structure is defined.
    fn max_date(&self) -> Date;

    /// Date at which time is zero.
    fn reference_date(&self) -> Date {
        self.data().reference_date()
    }

    /// Calendar used for date rolling.
    fn calendar(&self) -> &dyn Calendar {
        self.data().calendar.as_ref()
    }

    /// Shared handle to the calendar.
    fn calendar_arc(&self) -> Arc<dyn Calendar> {
        self.data().calendar.clone()
    }

    /// Day counter used for date → time conversion.
    fn day_counter(&self) -> &dyn DayCounter {
        self.data().day_counter.as_ref()
    }

    /// `true` if queries beyond the domain are answered by extrapolation.
    fn allows_extrapolation(&self) -> bool {
        self.data().extrapolate.load(Ordering::Relaxed)
    }

    /// Allow extrapolation for every subsequent query.
    fn enable_extrapolation(&self) {
        self.data().extrapolate.store(true, Ordering::Relaxed);
    }

    /// Forbid extrapolation unless requested per call.
    fn disable_extrapolation(&self) {
        self.data().extrapolate.store(false, Ordering::Relaxed);
    }

    /// Year fraction from the reference date to `date`.
    fn time_from_reference(&self, date: Date) -> Time {
        self.day_counter().year_fraction(self.reference_date(), date)
    }

    /// Latest time for which the structure is defined.
    fn max_time(&self) -> Time {
        self.time_from_reference(self.max_date())
    }

    /// Fails unless `0 <= t <= max_time()` or extrapolation is permitted.
    fn check_range(&self, t: Time, extrapolate: bool) -> Result<()> {
        if t < 0.0 {
            return Err(Error::InvalidArgument(format!("negative time ({t}) given")));
        }
        let max = self.max_time();
        if !(extrapolate || self.allows_extrapolation() || t <= max) {
            return Err(Error::OutOfRange(format!(
                "time ({t}) is past max curve time ({max})"
            )));
        }
        Ok(())
    }

    /// Fails unless `reference_date() <= date <= max_date()` or
    /// extrapolation is permitted.
    fn check_range_date(&self, date: Date, extrapolate: bool) -> Result<()> {
        let reference = self.reference_date();
        if date < reference {
            return Err(Error::InvalidArgument(format!(
                "date ({date}) before reference date ({reference})"
            )));
        }
        let max = self.max_date();
        if !(extrapolate || self.allows_extrapolation() || date <= max) {
            return Err(Error::OutOfRange(format!(
                "date ({date}) is past max curve date ({max})"
            )));
        }
        Ok(())
    }
}
