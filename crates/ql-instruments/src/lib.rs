//! # ql-instruments
//!
//! Vanilla options, payoffs, exercise and the pricing-engine interface.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use exercise::Exercise;
pub use instrument::{Instrument, PricingEngine, PricingResults};
pub use option::{VanillaEngine, VanillaOption, VanillaOptionArguments};
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff, StrikedPayoff};
