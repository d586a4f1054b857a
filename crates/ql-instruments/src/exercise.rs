//! Exercise schedules.

use ql_time::Date;

/// When an option may be exercised. Only European (single-date) exercise
/// is supported by the engines in this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exercise {
    date: Date,
}

impl Exercise {
    /// Exercise on `date` only.
    pub fn european(date: Date) -> Self {
        Self { date }
    }

    /// The exercise date.
    pub fn last_date(&self) -> Date {
        self.date
    }
}
