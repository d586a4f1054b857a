//! # ql-pricingengines
//!
//! Pricing engines for European vanilla options.
//!
//! ## Engines
//!
//! - [`AnalyticEuropeanEngine`]: Black-Scholes-Merton closed form with Greeks
//! - [`AnalyticHestonEngine`]: Gauss-Laguerre transform engine for the
//!   Heston model and its Bates jump extensions
//! - [`JumpDiffusionEngine`]: Poisson series for the Merton-76 jump diffusion
//! - [`MonteCarloHestonEngine`]: Monte Carlo under Heston or Bates dynamics

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod analytic_heston_engine;
pub mod mc_heston_engine;
pub mod merton76_engine;

pub use analytic_european_engine::{black_scholes_merton, AnalyticEuropeanEngine, BlackScholesValue};
pub use analytic_heston_engine::{heston_family_price, AnalyticHestonEngine, DEFAULT_INTEGRATION_ORDER};
pub use mc_heston_engine::MonteCarloHestonEngine;
pub use merton76_engine::JumpDiffusionEngine;
