//! `YieldTermStructure`: discount factors, zero rates and forward rates.
//!
//! Implementors provide [`discount_impl`](YieldTermStructure::discount_impl);
//! the public queries range-check first and derive continuously compounded
//! rates from it.

use crate::term_structure::TermStructure;
use ql_core::{errors::Result, DiscountFactor, Rate, Time};
use ql_time::Date;

/// Time step used when a rate is requested at a single instant.
const DT: Time = 1.0e-4;

/// A yield curve.
pub trait YieldTermStructure: TermStructure {
    /// Discount factor at `t`, with `t` already range-checked.
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor>;

    /// Discount factor at time `t`.
    fn discount(&self, t: Time, extrapolate: bool) -> Result<DiscountFactor> {
        self.check_range(t, extrapolate)?;
        self.discount_impl(t)
    }

    /// Discount factor at `date`.
    fn discount_date(&self, date: Date, extrapolate: bool) -> Result<DiscountFactor> {
        self.check_range_date(date, extrapolate)?;
        self.discount_impl(self.time_from_reference(date))
    }

    /// Continuously compounded zero rate to time `t`.
    fn zero_rate(&self, t: Time, extrapolate: bool) -> Result<Rate> {
        let t = if t == 0.0 { DT } else { t };
        Ok(-self.discount(t, extrapolate)?.ln() / t)
    }

    /// Continuously compounded forward rate between `t1` and `t2`.
    fn forward_rate(&self, t1: Time, t2: Time, extrapolate: bool) -> Result<Rate> {
        let (t1, t2) = if t2 - t1 < DT { (t1, t1 + DT) } else { (t1, t2) };
        let d1 = self.discount(t1, extrapolate)?;
        let d2 = self.discount(t2, extrapolate)?;
        Ok((d1 / d2).ln() / (t2 - t1))
    }
}
