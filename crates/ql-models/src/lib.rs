//! # ql-models
//!
//! Calibratable models and the machinery that fits them to market quotes.
//!
//! ```text
//! CalibratedModel ── parameters(), calibrate(helpers, method, end criteria)
//! └── HestonFamilyModel ── process(), snapshot()
//!     ├── HestonModel
//!     ├── BatesModel, BatesDetJumpModel
//!     └── BatesDoubleExpModel, BatesDoubleExpDetJumpModel
//!
//! CalibrationHelper ── market_value(), model_value(), calibration_error()
//! └── HestonModelHelper
//! ```
//!
//! Parameters live behind a lock inside each model, so a model shared via
//! `Arc` with several pricing engines is recalibrated through `&self` and
//! the engines observe the new values on their next valuation.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Infrastructure ───────────────────────────────────────────────────────
pub mod calibrated_model;
pub mod calibration_helper;
pub mod parameter;

// ── Equity models ────────────────────────────────────────────────────────
pub mod bates_model;
pub mod heston_model;
pub mod heston_model_helper;

// ── Re-exports ───────────────────────────────────────────────────────────
pub use bates_model::{
    BatesDetJumpModel, BatesDoubleExpDetJumpModel, BatesDoubleExpModel, BatesModel,
};
pub use calibrated_model::CalibratedModel;
pub use calibration_helper::{calibration_error, CalibrationErrorType, CalibrationHelper};
pub use heston_model::{HestonFamilyModel, HestonModel, HestonSnapshot, JumpComponent};
pub use heston_model_helper::HestonModelHelper;
pub use parameter::{ModelParameters, Parameter, ParameterConstraint, ParametersConstraint};
