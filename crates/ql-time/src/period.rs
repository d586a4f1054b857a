//! `Period` — a time span expressed in a [`TimeUnit`].

use crate::time_unit::TimeUnit;
use std::cmp::Ordering;

/// A time span made up of an integer length and a [`TimeUnit`].
///
/// Periods form a partial order.  Months and years compare exactly, as do
/// days and weeks.  A month-based period against a day-based one is
/// compared through the range of day counts it can span (28–31 days per
/// month, 365–366 per year); when those ranges overlap the comparison is
/// undecidable and `partial_cmp` returns `None`.
#[derive(Clone, Copy)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit of time.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a new period.
    pub fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    fn in_months(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Months => Some(self.length),
            TimeUnit::Years => Some(self.length * 12),
            _ => None,
        }
    }

    fn in_days(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Days => Some(self.length),
            TimeUnit::Weeks => Some(self.length * 7),
            _ => None,
        }
    }

    /// Smallest and largest number of calendar days the period can span.
    fn day_range(&self) -> (i32, i32) {
        let (lo, hi) = match self.unit {
            TimeUnit::Days => (self.length, self.length),
            TimeUnit::Weeks => (7 * self.length, 7 * self.length),
            TimeUnit::Months => (28 * self.length, 31 * self.length),
            TimeUnit::Years => (365 * self.length, 366 * self.length),
        };
        (lo.min(hi), lo.max(hi))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.length == 0 || other.length == 0 {
            return Some(self.length.signum().cmp(&other.length.signum()));
        }
        if let (Some(a), Some(b)) = (self.in_months(), other.in_months()) {
            return Some(a.cmp(&b));
        }
        if let (Some(a), Some(b)) = (self.in_days(), other.in_days()) {
            return Some(a.cmp(&b));
        }
        let (a_min, a_max) = self.day_range();
        let (b_min, b_max) = other.day_range();
        if a_max < b_min {
            Some(Ordering::Less)
        } else if a_min > b_max {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Eq for Period {}

impl std::ops::Neg for Period {
    type Output = Self;
    fn neg(self) -> Self {
        Period::new(-self.length, self.unit)
    }
}

impl std::ops::Mul<i32> for Period {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Period::new(self.length * rhs, self.unit)
    }
}

impl std::ops::Mul<Period> for i32 {
    type Output = Period;
    fn mul(self, rhs: Period) -> Period {
        rhs * self
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Period({self})")
    }
}
