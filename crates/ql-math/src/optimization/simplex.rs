//! Nelder–Mead simplex minimizer.

use super::{
    Constraint, CostFunction, EndCriteria, EndCriteriaType, OptimizationMethod,
    OptimizationResult,
};
use crate::array::Array;
use ql_core::{ensure, errors::Result, Real};
use tracing::debug;

/// Derivative-free simplex minimizer.
///
/// Infeasible or non-evaluable vertices get an objective of `+∞`, so the
/// simplex contracts away from them.
#[derive(Debug, Clone, Copy)]
pub struct Simplex {
    lambda: Real,
}

impl Simplex {
    /// Simplex whose initial vertices sit `lambda` away from the start point.
    pub fn new(lambda: Real) -> Self {
        Self { lambda }
    }
}

struct Objective<'a> {
    cost: &'a dyn CostFunction,
    constraint: &'a dyn Constraint,
    evaluations: usize,
}

impl Objective<'_> {
    fn at(&mut self, x: &Array) -> Real {
        if !self.constraint.test(x) {
            return Real::INFINITY;
        }
        self.evaluations += 1;
        match self.cost.value(x) {
            Ok(v) if v.is_finite() => v,
            _ => Real::INFINITY,
        }
    }
}

impl OptimizationMethod for Simplex {
    fn minimize(
        &self,
        cost: &dyn CostFunction,
        constraint: &dyn Constraint,
        initial: &Array,
        end_criteria: &EndCriteria,
    ) -> Result<OptimizationResult> {
        let n = initial.size();
        ensure!(n > 0, "no parameters to optimize");
        ensure!(
            constraint.test(initial),
            "initial parameters {initial} violate the constraint"
        );

        let mut objective = Objective {
            cost,
            constraint,
            evaluations: 0,
        };

        let mut vertices = Vec::with_capacity(n + 1);
        vertices.push(initial.clone());
        for i in 0..n {
            let mut v = initial.clone();
            v[i] += self.lambda;
            if !constraint.test(&v) {
                v[i] = initial[i] - self.lambda;
            }
            vertices.push(v);
        }
        let mut values: Vec<Real> = vertices.iter().map(|v| objective.at(v)).collect();

        let mut iteration = 0;
        let mut stationary = 0;
        let mut previous_best = Real::INFINITY;

        loop {
            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
            let (lo, next_hi, hi) = (order[0], order[n - 1], order[n]);

            let end_type = if !values[lo].is_finite() {
                Some(EndCriteriaType::NumericalFailure)
            } else if values[lo] <= end_criteria.function_epsilon {
                Some(EndCriteriaType::StationaryFunctionAccuracy)
            } else if values[hi].is_finite()
                && (values[hi] - values[lo]).abs()
                    <= end_criteria.function_epsilon * (values[hi].abs() + values[lo].abs())
            {
                Some(EndCriteriaType::StationaryFunctionValue)
            } else if vertices
                .iter()
                .all(|v| (v - &vertices[lo]).norm() <= end_criteria.root_epsilon)
            {
                Some(EndCriteriaType::StationaryPoint)
            } else if end_criteria.check_max_iterations(iteration) {
                Some(EndCriteriaType::MaxIterations)
            } else {
                if previous_best - values[lo] > end_criteria.function_epsilon * values[lo].abs() {
                    stationary = 0;
                } else {
                    stationary += 1;
                }
                previous_best = previous_best.min(values[lo]);
                end_criteria
                    .check_stationary_point(stationary)
                    .then_some(EndCriteriaType::StationaryPoint)
            };
            if let Some(end_type) = end_type {
                debug!(iterations = iteration, value = values[lo], %end_type, "simplex finished");
                return Ok(OptimizationResult {
                    x: vertices[lo].clone(),
                    value: values[lo],
                    iterations: iteration,
                    function_evaluations: objective.evaluations,
                    end_type,
                });
            }
            iteration += 1;

            let centroid: Array = (0..n)
                .map(|j| {
                    order[..n].iter().map(|&i| vertices[i][j]).sum::<Real>() / n as Real
                })
                .collect();
            let towards = |t: Real| -> Array {
                // centroid + t (centroid - worst)
                &centroid + &(&(&centroid - &vertices[hi]) * t)
            };

            let reflected = towards(1.0);
            let fr = objective.at(&reflected);
            if fr < values[lo] {
                let expanded = towards(2.0);
                let fe = objective.at(&expanded);
                if fe < fr {
                    vertices[hi] = expanded;
                    values[hi] = fe;
                } else {
                    vertices[hi] = reflected;
                    values[hi] = fr;
                }
            } else if fr < values[next_hi] {
                vertices[hi] = reflected;
                values[hi] = fr;
            } else {
                let contracted = if fr < values[hi] { towards(0.5) } else { towards(-0.5) };
                let fc = objective.at(&contracted);
                if fc < values[hi].min(fr) {
                    vertices[hi] = contracted;
                    values[hi] = fc;
                } else {
                    let best = vertices[lo].clone();
                    for i in 0..=n {
                        if i != lo {
                            vertices[i] = &(&best + &vertices[i]) * 0.5;
                            values[i] = objective.at(&vertices[i]);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::NoConstraint;
    use approx::assert_abs_diff_eq;

    struct Quadratic;

    impl CostFunction for Quadratic {
        fn values(&self, x: &Array) -> Result<Array> {
            Ok(Array::from_slice(&[x[0] - 1.0, 2.0 * (x[1] + 0.5)]))
        }
    }

    #[test]
    fn minimizes_a_quadratic_bowl() {
        let res = Simplex::new(0.1)
            .minimize(
                &Quadratic,
                &NoConstraint,
                &Array::from_slice(&[0.0, 0.0]),
                &EndCriteria::new(2000, 200, 1e-10, 1e-14, 1e-10),
            )
            .unwrap();
        assert!(!res.end_type.is_failure());
        assert_abs_diff_eq!(res.x[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(res.x[1], -0.5, epsilon = 1e-4);
    }
}
