//! # volcal
//!
//! Volatility-surface queries and parametric model calibration.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on it rather than on the individual
//! `ql-*` crates.
//!
//! ```rust
//! use volcal::termstructures::{
//!     ConstantSwaptionVolatility, SwaptionVolatilityStructure, TermStructureData,
//! };
//! use volcal::time::{Actual365Fixed, BusinessDayConvention, Date, Period, Target, TimeUnit};
//!
//! let today = Date::from_ymd(2025, 1, 15).unwrap();
//! let surface = ConstantSwaptionVolatility::new(
//!     TermStructureData::fixed(today, Target, Actual365Fixed),
//!     BusinessDayConvention::ModifiedFollowing,
//!     0.2,
//! );
//! let one_year = Period::new(1, TimeUnit::Years);
//! let vol = surface
//!     .volatility_tenor(one_year, Period::new(5, TimeUnit::Years), 0.03, false)
//!     .unwrap();
//! assert!((vol - 0.2).abs() < 1e-15);
//!
//! // swap tenors beyond 100 years need extrapolation
//! let long = Period::new(150, TimeUnit::Years);
//! assert!(surface.volatility_tenor(one_year, long, 0.03, false).is_err());
//! assert!(surface.volatility_tenor(one_year, long, 0.03, true).is_ok());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Numeric aliases and the error type.
pub use ql_core as core;

/// Dates, periods, calendars, day counters and the valuation date.
pub use ql_time as time;

/// Distributions, quadrature, interpolation, solvers and optimisers.
pub use ql_math as math;

/// Market quotes.
pub use ql_quotes as quotes;

/// Yield curves, Black volatility and swaption volatility surfaces.
pub use ql_termstructures as termstructures;

/// Heston, Bates, Merton-76 and Black–Scholes–Merton processes.
pub use ql_processes as processes;

/// Calibrated models and calibration helpers.
pub use ql_models as models;

/// Monte Carlo path generation and sampling.
pub use ql_methods as methods;

/// Payoffs, exercises and vanilla options.
pub use ql_instruments as instruments;

/// Analytic, series and Monte Carlo pricing engines.
pub use ql_pricingengines as pricingengines;
