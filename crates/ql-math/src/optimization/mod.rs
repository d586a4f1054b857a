//! Optimization framework: cost functions, constraints, end criteria and
//! the least-squares / derivative-free minimizers used by calibration.

mod levenberg_marquardt;
mod projection;
mod simplex;

pub use levenberg_marquardt::LevenbergMarquardt;
pub use projection::{ProjectedConstraint, Projection};
pub use simplex::Simplex;

use crate::array::Array;
use ql_core::{errors::Result, Real};

// ── Cost function ─────────────────────────────────────────────────────────────

/// A least-squares objective expressed as a vector of residuals.
///
/// Evaluation may fail (a pricing error inside a calibration, for
/// instance); minimizers treat a failed evaluation as an infeasible point.
pub trait CostFunction: Send + Sync {
    /// Residual vector at `x`.
    fn values(&self, x: &Array) -> Result<Array>;

    /// Scalar objective `Σ rᵢ²(x)`.
    fn value(&self, x: &Array) -> Result<Real> {
        Ok(self.values(x)?.norm_squared())
    }
}

// ── Constraints ───────────────────────────────────────────────────────────────

/// A feasibility test on the parameter space.
pub trait Constraint: Send + Sync {
    /// Return `true` if `x` is feasible.
    fn test(&self, x: &Array) -> bool;
}

/// Accepts every point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstraint;

impl Constraint for NoConstraint {
    fn test(&self, _x: &Array) -> bool {
        true
    }
}

/// Every coordinate strictly positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositiveConstraint;

impl Constraint for PositiveConstraint {
    fn test(&self, x: &Array) -> bool {
        x.iter().all(|&v| v > 0.0)
    }
}

/// Every coordinate inside the closed interval `[low, high]`.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryConstraint {
    low: Real,
    high: Real,
}

impl BoundaryConstraint {
    /// Constraint on `[low, high]`.
    pub fn new(low: Real, high: Real) -> Self {
        Self { low, high }
    }
}

impl Constraint for BoundaryConstraint {
    fn test(&self, x: &Array) -> bool {
        x.iter().all(|&v| v >= self.low && v <= self.high)
    }
}

// ── End criteria ──────────────────────────────────────────────────────────────

/// Stopping thresholds shared by every minimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndCriteria {
    /// Cap on the number of iterations (trial steps).
    pub max_iterations: usize,
    /// Cap on consecutive iterations without improvement.
    pub max_stationary_state_iterations: usize,
    /// Tolerance on the parameter step.
    pub root_epsilon: Real,
    /// Tolerance on the objective.
    pub function_epsilon: Real,
    /// Tolerance on the gradient norm.
    pub gradient_norm_epsilon: Real,
}

impl EndCriteria {
    /// Build end criteria from the five thresholds.
    pub fn new(
        max_iterations: usize,
        max_stationary_state_iterations: usize,
        root_epsilon: Real,
        function_epsilon: Real,
        gradient_norm_epsilon: Real,
    ) -> Self {
        Self {
            max_iterations,
            max_stationary_state_iterations,
            root_epsilon,
            function_epsilon,
            gradient_norm_epsilon,
        }
    }

    /// `true` once `iteration` has reached the iteration cap.
    pub fn check_max_iterations(&self, iteration: usize) -> bool {
        iteration >= self.max_iterations
    }

    /// `true` once `stationary` consecutive non-improving steps exceed the cap.
    pub fn check_stationary_point(&self, stationary: usize) -> bool {
        stationary > self.max_stationary_state_iterations
    }
}

impl Default for EndCriteria {
    fn default() -> Self {
        Self::new(1000, 100, 1e-8, 1e-8, 1e-8)
    }
}

/// Why a minimization stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndCriteriaType {
    /// No minimization has run yet.
    #[default]
    None,
    /// The iteration cap was hit.
    MaxIterations,
    /// The parameters stopped moving.
    StationaryPoint,
    /// The objective stopped decreasing.
    StationaryFunctionValue,
    /// The objective fell below the function tolerance.
    StationaryFunctionAccuracy,
    /// The gradient vanished.
    ZeroGradientNorm,
    /// The objective could not be evaluated or the step could not be solved.
    NumericalFailure,
    /// Termination for a reason not listed above.
    Unknown,
}

impl EndCriteriaType {
    /// `true` for outcomes that are not a convergence.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::NumericalFailure | Self::Unknown)
    }
}

impl std::fmt::Display for EndCriteriaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "None",
            Self::MaxIterations => "MaxIterations",
            Self::StationaryPoint => "StationaryPoint",
            Self::StationaryFunctionValue => "StationaryFunctionValue",
            Self::StationaryFunctionAccuracy => "StationaryFunctionAccuracy",
            Self::ZeroGradientNorm => "ZeroGradientNorm",
            Self::NumericalFailure => "NumericalFailure",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Outcome of a minimization.
///
/// `x` is always the last point at which the objective was evaluated
/// successfully, even when `end_type` reports a failure.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Final parameters.
    pub x: Array,
    /// Objective at `x` (`+∞` if it could never be evaluated).
    pub value: Real,
    /// Iterations performed.
    pub iterations: usize,
    /// Objective evaluations performed.
    pub function_evaluations: usize,
    /// Termination reason.
    pub end_type: EndCriteriaType,
}

/// A minimizer for [`CostFunction`]s.
pub trait OptimizationMethod: Send + Sync {
    /// Minimize `cost` from `initial` subject to `constraint`.
    ///
    /// Returns `Err` only for malformed input (an empty parameter vector,
    /// an infeasible starting point). Numerical trouble is reported through
    /// [`EndCriteriaType::NumericalFailure`].
    fn minimize(
        &self,
        cost: &dyn CostFunction,
        constraint: &dyn Constraint,
        initial: &Array,
        end_criteria: &EndCriteria,
    ) -> Result<OptimizationResult>;
}
