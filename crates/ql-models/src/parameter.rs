//! Model parameters: named scalars with their feasibility constraint, and
//! the shared parameter vector a calibrated model owns.

use ql_core::{errors::Result, Error, Real};
use ql_math::optimization::{Constraint, EndCriteriaType};
use ql_math::Array;
use std::sync::{PoisonError, RwLock};

/// Feasible region of one scalar parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterConstraint {
    /// Any real value.
    None,
    /// Strictly positive.
    Positive,
    /// Inside the closed interval `[low, high]`.
    Boundary {
        /// Lower bound (inclusive).
        low: Real,
        /// Upper bound (inclusive).
        high: Real,
    },
}

impl ParameterConstraint {
    /// Whether `value` is feasible.
    pub fn test(self, value: Real) -> bool {
        match self {
            Self::None => value.is_finite(),
            Self::Positive => value > 0.0,
            Self::Boundary { low, high } => value >= low && value <= high,
        }
    }
}

/// A named, constrained scalar parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name used in logs and error messages.
    pub name: &'static str,
    /// Feasible region.
    pub constraint: ParameterConstraint,
}

impl Parameter {
    /// Unconstrained parameter.
    pub fn free(name: &'static str) -> Self {
        Self {
            name,
            constraint: ParameterConstraint::None,
        }
    }

    /// Strictly positive parameter.
    pub fn positive(name: &'static str) -> Self {
        Self {
            name,
            constraint: ParameterConstraint::Positive,
        }
    }

    /// Parameter bounded to `[low, high]`.
    pub fn bounded(name: &'static str, low: Real, high: Real) -> Self {
        Self {
            name,
            constraint: ParameterConstraint::Boundary { low, high },
        }
    }
}

/// The ordered parameter vector of a model.
///
/// Values sit behind a lock so that a model shared by several pricing
/// engines can be recalibrated through `&self`; engines read a consistent
/// copy with [`ModelParameters::values`] once per pricing.
#[derive(Debug)]
pub struct ModelParameters {
    parameters: Vec<Parameter>,
    values: RwLock<Array>,
    end_type: RwLock<EndCriteriaType>,
}

impl ModelParameters {
    /// Parameters with their initial values.
    ///
    /// Fails if the lengths differ or an initial value is infeasible.
    pub fn new(parameters: Vec<Parameter>, initial: &[Real]) -> Result<Self> {
        let values = Array::from_slice(initial);
        check_feasible(&parameters, &values)?;
        Ok(Self {
            parameters,
            values: RwLock::new(values),
            end_type: RwLock::new(EndCriteriaType::None),
        })
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// `true` for a model without parameters.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameter descriptions in vector order.
    pub fn descriptions(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Copy of the current values.
    pub fn values(&self) -> Array {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current value of parameter `i`.
    pub fn value(&self, i: usize) -> Result<Real> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        if i >= values.size() {
            return Err(Error::IndexOutOfRange {
                index: i,
                size: values.size(),
            });
        }
        Ok(values[i])
    }

    /// Replace every value; rejected unless `values` is feasible.
    pub fn set_values(&self, values: &Array) -> Result<()> {
        check_feasible(&self.parameters, values)?;
        *self.values.write().unwrap_or_else(PoisonError::into_inner) = values.clone();
        Ok(())
    }

    /// Outcome of the last calibration.
    pub fn end_type(&self) -> EndCriteriaType {
        *self.end_type.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_end_type(&self, end_type: EndCriteriaType) {
        *self.end_type.write().unwrap_or_else(PoisonError::into_inner) = end_type;
    }

    /// The joint constraint over the full vector.
    pub fn constraint(&self) -> ParametersConstraint<'_> {
        ParametersConstraint {
            parameters: &self.parameters,
        }
    }
}

fn check_feasible(parameters: &[Parameter], values: &Array) -> Result<()> {
    if values.size() != parameters.len() {
        return Err(Error::InvalidArgument(format!(
            "{} values given for {} parameters",
            values.size(),
            parameters.len()
        )));
    }
    for (p, v) in parameters.iter().zip(values.iter()) {
        if !p.constraint.test(*v) {
            return Err(Error::InvalidArgument(format!(
                "{} = {v} violates its constraint {:?}",
                p.name, p.constraint
            )));
        }
    }
    Ok(())
}

/// Per-coordinate constraint over a whole parameter vector.
#[derive(Debug, Clone, Copy)]
pub struct ParametersConstraint<'a> {
    parameters: &'a [Parameter],
}

impl Constraint for ParametersConstraint<'_> {
    fn test(&self, x: &Array) -> bool {
        x.size() == self.parameters.len()
            && self
                .parameters
                .iter()
                .zip(x.iter())
                .all(|(p, v)| p.constraint.test(*v))
    }
}
