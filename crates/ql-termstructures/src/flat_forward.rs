//! `FlatForward`: a yield curve with a constant continuously compounded
//! forward rate, optionally read live from a quote.

use crate::term_structure::{TermStructure, TermStructureData};
use crate::yield_term_structure::YieldTermStructure;
use ql_core::{errors::Result, DiscountFactor, Rate, Time};
use ql_quotes::{Quote, SimpleQuote};
use ql_time::Date;
use std::sync::Arc;

/// Constant-rate yield curve, `P(t) = exp(-r t)`.
#[derive(Debug)]
pub struct FlatForward {
    data: TermStructureData,
    rate: Arc<dyn Quote>,
}

impl FlatForward {
    /// Curve with a fixed rate.
    pub fn new(data: TermStructureData, rate: Rate) -> Self {
        Self::from_quote(data, Arc::new(SimpleQuote::new(rate)))
    }

    /// Curve whose rate is read from `rate` on every query.
    pub fn from_quote(data: TermStructureData, rate: Arc<dyn Quote>) -> Self {
        Self { data, rate }
    }

    /// Current rate.
    pub fn rate(&self) -> Result<Rate> {
        self.rate.checked_value()
    }
}

impl TermStructure for FlatForward {
    fn data(&self) -> &TermStructureData {
        &self.data
    }

    fn max_date(&self) -> Date {
        Date::MAX
    }
}

impl YieldTermStructure for FlatForward {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        Ok((-self.rate()? * t).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_time::{Actual365Fixed, NullCalendar};

    fn curve(rate: Arc<SimpleQuote>) -> FlatForward {
        let today = Date::from_ymd(2002, 7, 5).unwrap();
        FlatForward::from_quote(
            TermStructureData::fixed(today, NullCalendar, Actual365Fixed),
            rate,
        )
    }

    #[test]
    fn discount_and_rates() {
        let ff = curve(Arc::new(SimpleQuote::new(0.04)));
        assert_abs_diff_eq!(ff.discount(2.0, false).unwrap(), (-0.08_f64).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(ff.zero_rate(3.0, false).unwrap(), 0.04, epsilon = 1e-14);
        assert_abs_diff_eq!(ff.forward_rate(1.0, 2.0, false).unwrap(), 0.04, epsilon = 1e-14);
        assert_abs_diff_eq!(ff.zero_rate(0.0, false).unwrap(), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn follows_its_quote() {
        let q = Arc::new(SimpleQuote::new(0.04));
        let ff = curve(q.clone());
        q.set_value(0.0);
        assert_eq!(ff.discount(5.0, false).unwrap(), 1.0);
        q.reset();
        assert!(ff.discount(1.0, false).is_err());
    }
}
