//! `Quote` trait and the shareable `SimpleQuote`.

use ql_core::{
    errors::{Error, Result},
    Real,
};
use std::sync::{PoisonError, RwLock};

/// A market-observable value.
pub trait Quote: std::fmt::Debug + Send + Sync {
    /// Current value, `None` while unset.
    fn value(&self) -> Option<Real>;

    /// `true` if a value is set.
    fn is_valid(&self) -> bool {
        self.value().is_some()
    }

    /// Current value, or an error if the quote is unset.
    fn checked_value(&self) -> Result<Real> {
        self.value()
            .ok_or_else(|| Error::Runtime("invalid quote: no value set".into()))
    }
}

/// A quote whose value can be replaced through a shared reference.
///
/// Typically held in an `Arc` by calibration helpers while the market
/// data layer updates it.
#[derive(Debug, Default)]
pub struct SimpleQuote {
    value: RwLock<Option<Real>>,
}

impl SimpleQuote {
    /// Quote holding `value`.
    pub fn new(value: Real) -> Self {
        Self {
            value: RwLock::new(Some(value)),
        }
    }

    /// Quote with no value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the value, returning the previous one.
    pub fn set_value(&self, value: Real) -> Option<Real> {
        self.value
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(value)
    }

    /// Clear the value.
    pub fn reset(&self) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Option<Real> {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }
}
