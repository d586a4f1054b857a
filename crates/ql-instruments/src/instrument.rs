//! `Instrument`, `PricingEngine` and the results an engine produces.
//!
//! Instruments are plain descriptions. Pricing is a function of the
//! instrument's arguments and whatever market data and model the engine
//! was built with, so one instrument can be priced by any number of
//! engines without being rebuilt.

use ql_core::{errors::Result, Real};
use ql_time::Date;
use std::collections::HashMap;

/// Output of a pricing engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingResults {
    /// Net present value.
    pub value: Real,
    /// Statistical error of `value` (Monte Carlo engines only).
    pub error_estimate: Option<Real>,
    /// Engine-specific extras, e.g. `"samples"`.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Results holding only a value.
    pub fn from_value(value: Real) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Attach an error estimate.
    pub fn with_error_estimate(mut self, error: Real) -> Self {
        self.error_estimate = Some(error);
        self
    }

    /// Attach a named extra.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }
}

/// A pricing algorithm for instruments described by `Args`.
pub trait PricingEngine<Args>: std::fmt::Debug + Send + Sync {
    /// Price the instrument described by `args`.
    fn calculate(&self, args: &Args) -> Result<PricingResults>;
}

/// A priceable product.
pub trait Instrument: std::fmt::Debug + Send + Sync {
    /// Last date on which the instrument has value.
    fn maturity_date(&self) -> Date;

    /// `true` once `evaluation_date` is past maturity.
    fn is_expired(&self, evaluation_date: Date) -> bool {
        self.maturity_date() < evaluation_date
    }
}
