//! Projection of a parameter vector onto its free coordinates.

use super::Constraint;
use crate::array::Array;
use ql_core::{ensure, errors::Result};

/// Splits a full parameter vector into fixed and free coordinates.
///
/// The minimizer only sees the free coordinates; [`Projection::include`]
/// rebuilds the full vector with the fixed entries frozen at the values
/// captured on construction.
#[derive(Debug, Clone)]
pub struct Projection {
    actual: Array,
    fixed: Vec<bool>,
    free: usize,
}

impl Projection {
    /// Projection of `parameters` with `fixed[i] == true` freezing entry `i`.
    ///
    /// An empty mask leaves every coordinate free.
    pub fn new(parameters: &Array, fixed: &[bool]) -> Result<Self> {
        let fixed = if fixed.is_empty() {
            vec![false; parameters.size()]
        } else {
            ensure!(
                fixed.len() == parameters.size(),
                "fixed-parameter mask has {} entries, model has {} parameters",
                fixed.len(),
                parameters.size()
            );
            fixed.to_vec()
        };
        let free = fixed.iter().filter(|f| !**f).count();
        Ok(Self {
            actual: parameters.clone(),
            fixed,
            free,
        })
    }

    /// Number of free coordinates.
    pub fn free_count(&self) -> usize {
        self.free
    }

    /// Free coordinates of a full parameter vector.
    pub fn project(&self, parameters: &Array) -> Array {
        parameters
            .iter()
            .zip(&self.fixed)
            .filter(|(_, f)| !**f)
            .map(|(v, _)| *v)
            .collect::<Vec<_>>()
            .into()
    }

    /// Full parameter vector from its free coordinates.
    pub fn include(&self, projected: &Array) -> Array {
        let mut full = self.actual.clone();
        let mut free = projected.iter();
        for (i, fixed) in self.fixed.iter().enumerate() {
            if !fixed {
                if let Some(v) = free.next() {
                    full[i] = *v;
                }
            }
        }
        full
    }
}

/// A constraint on the full vector, tested through a [`Projection`].
pub struct ProjectedConstraint<'a> {
    inner: &'a dyn Constraint,
    projection: &'a Projection,
}

impl<'a> ProjectedConstraint<'a> {
    /// Wrap `inner` so that it accepts free coordinates.
    pub fn new(inner: &'a dyn Constraint, projection: &'a Projection) -> Self {
        Self { inner, projection }
    }
}

impl Constraint for ProjectedConstraint<'_> {
    fn test(&self, x: &Array) -> bool {
        self.inner.test(&self.projection.include(x))
    }
}
