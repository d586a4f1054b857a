//! # ql-termstructures
//!
//! Yield curves, Black volatility and the swaption volatility query
//! protocol, all sharing one reference frame and extrapolation policy.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `TermStructure` — reference frame, time conversion and range checks.
pub mod term_structure;

/// `YieldTermStructure` — discount factors and continuously compounded rates.
pub mod yield_term_structure;

/// `FlatForward` — constant-rate yield curve.
pub mod flat_forward;

/// `InterpolatedZeroCurve` — linearly interpolated zero-rate curve.
pub mod interpolated_zero_curve;

/// `VolatilityTermStructure` — strike domain and option-date rolling.
pub mod volatility_term_structure;

/// `BlackVolTermStructure` and `BlackConstantVol`.
pub mod black_vol_term_structure;

/// `SmileSection` and `FlatSmileSection`.
pub mod smile_section;

/// Swaption volatility protocol and surfaces.
pub mod swaption_volatility;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use black_vol_term_structure::{BlackConstantVol, BlackVolTermStructure};
pub use flat_forward::FlatForward;
pub use interpolated_zero_curve::InterpolatedZeroCurve;
pub use smile_section::{FlatSmileSection, SmileSection};
pub use swaption_volatility::{
    ConstantSwaptionVolatility, SwaptionVolatilityMatrix, SwaptionVolatilityStructure,
};
pub use term_structure::{ReferenceDate, TermStructure, TermStructureData};
pub use volatility_term_structure::VolatilityTermStructure;
pub use yield_term_structure::YieldTermStructure;
