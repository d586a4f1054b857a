//! # ql-processes
//!
//! Stochastic processes driving the pricing engines: Black–Scholes–Merton,
//! Merton-76 jump diffusion, Heston and Bates.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bates_process;
pub mod black_scholes_process;
pub mod heston_process;
pub mod merton76_process;
pub mod stochastic_process;

pub use bates_process::BatesProcess;
pub use black_scholes_process::BlackScholesMertonProcess;
pub use heston_process::HestonProcess;
pub use merton76_process::Merton76Process;
pub use stochastic_process::{StochasticProcess, StochasticProcess1D};
