//! Valuation-date provider.
//!
//! Structures whose reference date floats with "today" hold an
//! `Arc<Settings>` handed to them at construction; moving the evaluation
//! date moves every such structure at once.  Nothing in the workspace
//! reads a process-wide default.

use crate::date::Date;
use std::sync::{PoisonError, RwLock};

/// Shared evaluation-date configuration.
#[derive(Debug)]
pub struct Settings {
    evaluation_date: RwLock<Date>,
}

impl Settings {
    /// Create settings with the given evaluation date.
    pub fn new(evaluation_date: Date) -> Self {
        Self {
            evaluation_date: RwLock::new(evaluation_date),
        }
    }

    /// Current evaluation date.
    pub fn evaluation_date(&self) -> Date {
        *self
            .evaluation_date
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the evaluation date.
    pub fn set_evaluation_date(&self, date: Date) {
        *self
            .evaluation_date
            .write()
            .unwrap_or_else(PoisonError::into_inner) = date;
    }

    /// Set the evaluation date until the returned guard is dropped.
    pub fn scoped(&self, date: Date) -> ScopedEvaluationDate<'_> {
        let saved = self.evaluation_date();
        self.set_evaluation_date(date);
        ScopedEvaluationDate {
            settings: self,
            saved,
        }
    }
}

/// Restores the previous evaluation date on drop.
#[derive(Debug)]
pub struct ScopedEvaluationDate<'a> {
    settings: &'a Settings,
    saved: Date,
}

impl Drop for ScopedEvaluationDate<'_> {
    fn drop(&mut self) {
        self.settings.set_evaluation_date(self.saved);
    }
}
