//! # ql-quotes
//!
//! Market quotes shared between market data and calibration helpers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Quote` trait and `SimpleQuote`.
pub mod quote;

pub use quote::{Quote, SimpleQuote};
