//! The calibration loop: a least-squares fit of a model's parameters to a
//! set of calibration helpers.
//!
//! Each trial vector proposed by the optimizer is written into the model,
//! every helper is repriced through its engine, and the weighted residuals
//! `100·errᵢ·√wᵢ` are handed back, so the optimizer minimizes
//! `Σ wᵢ (100·errᵢ)²`.

use crate::calibration_helper::{self, CalibrationHelper};
use crate::parameter::ModelParameters;
use ql_core::{errors::Result, Error, Real};
use ql_math::optimization::{
    Constraint, CostFunction, EndCriteria, EndCriteriaType, OptimizationMethod,
    ProjectedConstraint, Projection,
};
use ql_math::Array;
use std::fmt;
use tracing::{info, warn};

/// A model whose parameters can be fitted to market quotes.
pub trait CalibratedModel: fmt::Debug + Send + Sync {
    /// The model's parameter vector.
    fn parameters(&self) -> &ModelParameters;

    /// Copy of the current parameter values.
    fn params(&self) -> Array {
        self.parameters().values()
    }

    /// Overwrite the parameter values.
    fn set_params(&self, params: &Array) -> Result<()> {
        self.parameters().set_values(params)
    }

    /// Joint feasibility constraint of the parameters.
    fn constraint(&self) -> Box<dyn Constraint + '_> {
        Box::new(self.parameters().constraint())
    }

    /// Termination reason of the last calibration.
    fn end_criteria(&self) -> EndCriteriaType {
        self.parameters().end_type()
    }

    /// Fit the parameters to `helpers`.
    ///
    /// `weights` (one per helper, default 1) scale each squared error and
    /// `fixed` (one per parameter, default none) freezes parameters at
    /// their current values. Non-convergence is not an error: the
    /// returned termination reason must be inspected, and the parameters
    /// are left at the last point the optimizer evaluated successfully.
    fn calibrate<H>(
        &self,
        helpers: &[H],
        method: &dyn OptimizationMethod,
        end_criteria: &EndCriteria,
        weights: &[Real],
        fixed: &[bool],
    ) -> Result<EndCriteriaType>
    where
        H: AsRef<dyn CalibrationHelper> + Sync,
        Self: Sized,
    {
        calibrate_parameters(self.parameters(), helpers, method, end_criteria, weights, fixed)
    }

    /// Sum of squared percentage errors of `helpers` at the current
    /// parameters.
    fn calibration_error<H>(&self, helpers: &[H]) -> Result<Real>
    where
        H: AsRef<dyn CalibrationHelper>,
        Self: Sized,
    {
        calibration_helper::calibration_error(helpers)
    }
}

fn calibrate_parameters<H>(
    parameters: &ModelParameters,
    helpers: &[H],
    method: &dyn OptimizationMethod,
    end_criteria: &EndCriteria,
    weights: &[Real],
    fixed: &[bool],
) -> Result<EndCriteriaType>
where
    H: AsRef<dyn CalibrationHelper> + Sync,
{
    if helpers.is_empty() {
        return Err(Error::InvalidArgument("no calibration helpers given".into()));
    }
    let weights = if weights.is_empty() {
        vec![1.0; helpers.len()]
    } else {
        if weights.len() != helpers.len() {
            return Err(Error::InvalidArgument(format!(
                "{} weights given for {} calibration helpers",
                weights.len(),
                helpers.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
            return Err(Error::InvalidArgument(format!(
                "calibration weight ({w}) must be finite and non-negative"
            )));
        }
        weights.to_vec()
    };
    if !fixed.is_empty() && fixed.len() != parameters.len() {
        return Err(Error::InvalidArgument(format!(
            "fixed-parameter mask has {} entries, model has {} parameters",
            fixed.len(),
            parameters.len()
        )));
    }

    let initial = parameters.values();
    let projection = Projection::new(&initial, fixed)?;
    if projection.free_count() == 0 {
        return Err(Error::InvalidArgument("every model parameter is fixed".into()));
    }
    let full_constraint = parameters.constraint();
    let constraint = ProjectedConstraint::new(&full_constraint, &projection);
    let cost = CalibrationFunction {
        parameters,
        helpers,
        weights: &weights,
        projection: &projection,
    };

    let result = method.minimize(&cost, &constraint, &projection.project(&initial), end_criteria)?;

    parameters.set_values(&projection.include(&result.x))?;
    parameters.set_end_type(result.end_type);
    if result.end_type.is_failure() {
        warn!(
            end_type = %result.end_type,
            iterations = result.iterations,
            value = result.value,
            "calibration failed; parameters left at the last evaluated point"
        );
    } else {
        info!(
            end_type = %result.end_type,
            iterations = result.iterations,
            evaluations = result.function_evaluations,
            value = result.value,
            params = %parameters.values(),
            "calibration finished"
        );
    }
    Ok(result.end_type)
}

/// Residual vector seen by the optimizer.
struct CalibrationFunction<'a, H> {
    parameters: &'a ModelParameters,
    helpers: &'a [H],
    weights: &'a [Real],
    projection: &'a Projection,
}

impl<H> CalibrationFunction<'_, H>
where
    H: AsRef<dyn CalibrationHelper> + Sync,
{
    fn residual(helper: &H, weight: Real) -> Result<Real> {
        Ok(100.0 * helper.as_ref().calibration_error()? * weight.sqrt())
    }

    #[cfg(not(feature = "parallel"))]
    fn residuals(&self) -> Result<Vec<Real>> {
        self.helpers
            .iter()
            .zip(self.weights)
            .map(|(h, w)| Self::residual(h, *w))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn residuals(&self) -> Result<Vec<Real>> {
        use rayon::prelude::*;
        self.helpers
            .par_iter()
            .zip(self.weights.par_iter())
            .map(|(h, w)| Self::residual(h, *w))
            .collect()
    }
}

impl<H> CostFunction for CalibrationFunction<'_, H>
where
    H: AsRef<dyn CalibrationHelper> + Sync,
{
    fn values(&self, x: &Array) -> Result<Array> {
        self.parameters.set_values(&self.projection.include(x))?;
        Ok(Array::from_vec(self.residuals()?))
    }

    fn value(&self, x: &Array) -> Result<Real> {
        Ok(self.values(x)?.iter().map(|r| r * r).sum())
    }
}
