//! Levenberg–Marquardt least-squares minimizer.
//!
//! Trust-region formulation after Moré (1978), as in MINPACK's `lmdif`:
//! a forward-difference Jacobian, column-norm scaling `D`, and a damping
//! parameter chosen so that the scaled step `‖D p‖` lands within 10% of
//! the trust radius. The radius grows or shrinks with the ratio of actual
//! to predicted reduction. Every trial step counts as an iteration; trial
//! points that are infeasible or whose residuals cannot be evaluated count
//! as no reduction at all.

use super::{
    Constraint, CostFunction, EndCriteria, EndCriteriaType, OptimizationMethod,
    OptimizationResult,
};
use crate::array::Array;
use nalgebra::{DMatrix, DVector};
use ql_core::{ensure, errors::Result, Real};
use tracing::{debug, warn};

/// Steps with a reduction ratio below this are rejected.
const ACCEPTANCE_RATIO: Real = 1e-4;
/// Relative tolerance on `‖D p‖ − Δ` in the damping search.
const RADIUS_TOLERANCE: Real = 0.1;
const MAX_DAMPING_ITERATIONS: usize = 10;

/// Levenberg–Marquardt minimizer.
#[derive(Debug, Clone, Copy)]
pub struct LevenbergMarquardt {
    epsfcn: Real,
    step_bound_factor: Real,
}

impl Default for LevenbergMarquardt {
    fn default() -> Self {
        Self {
            epsfcn: 1e-8,
            step_bound_factor: 100.0,
        }
    }
}

impl LevenbergMarquardt {
    /// Minimizer with default finite-difference and step-bound settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative accuracy of the residuals; the finite-difference step for
    /// coordinate `j` is `√epsfcn · |x_j|`.
    pub fn with_epsfcn(mut self, epsfcn: Real) -> Self {
        self.epsfcn = epsfcn;
        self
    }

    /// Initial trust radius as a multiple of `‖D x₀‖`.
    pub fn with_step_bound_factor(mut self, factor: Real) -> Self {
        self.step_bound_factor = factor;
        self
    }
}

/// Residual evaluation with bookkeeping; failures and non-finite values
/// come back as `None`.
struct Evaluator<'a> {
    cost: &'a dyn CostFunction,
    evaluations: usize,
}

impl Evaluator<'_> {
    fn residuals(&mut self, x: &Array) -> Option<DVector<Real>> {
        self.evaluations += 1;
        match self.cost.values(x) {
            Ok(r) if r.is_finite() => Some(r.into_inner()),
            Ok(_) => {
                debug!(x = %x, "non-finite residuals");
                None
            }
            Err(e) => {
                debug!(x = %x, error = %e, "residual evaluation failed");
                None
            }
        }
    }

    fn jacobian(
        &mut self,
        constraint: &dyn Constraint,
        x: &Array,
        r: &DVector<Real>,
        epsfcn: Real,
    ) -> Option<DMatrix<Real>> {
        let n = x.size();
        let mut jac = DMatrix::zeros(r.len(), n);
        let eps = epsfcn.max(Real::EPSILON).sqrt();
        for j in 0..n {
            let mut h = eps * x[j].abs();
            if h == 0.0 {
                h = eps;
            }
            let mut shifted = x.clone();
            shifted[j] += h;
            if !constraint.test(&shifted) {
                h = -h;
                shifted[j] = x[j] + h;
            }
            let rj = self.residuals(&shifted)?;
            jac.set_column(j, &((rj - r) / h));
        }
        Some(jac)
    }
}

/// MINPACK-style scaled gradient norm `max_j |gⱼ| / (‖Jⱼ‖ ‖r‖)`.
fn scaled_gradient_norm(col_norms: &DVector<Real>, g: &DVector<Real>, r_norm: Real) -> Real {
    col_norms
        .iter()
        .zip(g.iter())
        .filter(|(c, _)| **c > 0.0)
        .map(|(c, gj)| gj.abs() / (c * r_norm))
        .fold(0.0, Real::max)
}

/// Solve `(JᵀJ + par·D²) p = −g`; also returns the Cholesky factor `L`.
fn damped_step(
    jtj: &DMatrix<Real>,
    g: &DVector<Real>,
    diag: &DVector<Real>,
    par: Real,
) -> Option<(DVector<Real>, DMatrix<Real>)> {
    let mut m = jtj.clone();
    for i in 0..diag.len() {
        m[(i, i)] += par * diag[i] * diag[i];
    }
    let chol = m.cholesky()?;
    let p = chol.solve(&-g);
    p.iter().all(|v| v.is_finite()).then(|| (p, chol.l()))
}

/// Newton correction `(φ/Δ) / ‖L⁻¹ D²p/‖Dp‖‖²` for `φ = ‖Dp‖ − Δ`.
fn newton_correction(
    l: &DMatrix<Real>,
    diag: &DVector<Real>,
    p: &DVector<Real>,
    dx_norm: Real,
    fp: Real,
    delta: Real,
) -> Option<Real> {
    let w = diag.component_mul(&diag.component_mul(p)) / dx_norm;
    let t = l.solve_lower_triangular(&w)?.norm();
    (t > 0.0).then(|| fp / delta / (t * t))
}

/// Damping parameter and step with `‖D p‖` within 10% of `delta`, or the
/// Gauss–Newton step when that is already inside the trust region.
fn damping_search(
    jtj: &DMatrix<Real>,
    g: &DVector<Real>,
    diag: &DVector<Real>,
    delta: Real,
    par: Real,
) -> Option<(Real, DVector<Real>)> {
    // a singular JᵀJ gets a nudge and loses the lower bound on par
    let (mut p, l, full_rank) = match damped_step(jtj, g, diag, 0.0) {
        Some((p, l)) => (p, l, true),
        None => {
            let (p, l) = damped_step(jtj, g, diag, Real::EPSILON.sqrt())?;
            (p, l, false)
        }
    };
    let mut dx_norm = diag.component_mul(&p).norm();
    let mut fp = dx_norm - delta;
    if fp <= RADIUS_TOLERANCE * delta {
        return Some((0.0, p));
    }

    let mut par_low = if full_rank {
        newton_correction(&l, diag, &p, dx_norm, fp, delta)?
    } else {
        0.0
    };
    let g_norm = g.component_div(diag).norm();
    let mut par_high = g_norm / delta;
    if par_high == 0.0 {
        par_high = Real::MIN_POSITIVE / delta.min(0.1);
    }
    let mut par = par.max(par_low).min(par_high);
    if par == 0.0 {
        par = g_norm / dx_norm;
    }

    for iteration in 1..=MAX_DAMPING_ITERATIONS {
        if par == 0.0 {
            par = Real::MIN_POSITIVE.max(1e-3 * par_high);
        }
        let (step, l) = damped_step(jtj, g, diag, par)?;
        p = step;
        dx_norm = diag.component_mul(&p).norm();
        let previous = fp;
        fp = dx_norm - delta;
        if fp.abs() <= RADIUS_TOLERANCE * delta
            || (par_low == 0.0 && fp <= previous && previous < 0.0)
            || iteration == MAX_DAMPING_ITERATIONS
        {
            break;
        }
        let correction = newton_correction(&l, diag, &p, dx_norm, fp, delta)?;
        if fp > 0.0 {
            par_low = par_low.max(par);
        } else if fp < 0.0 {
            par_high = par_high.min(par);
        }
        par = par_low.max(par + correction);
    }
    Some((par, p))
}

impl OptimizationMethod for LevenbergMarquardt {
    fn minimize(
        &self,
        cost: &dyn CostFunction,
        constraint: &dyn Constraint,
        initial: &Array,
        end_criteria: &EndCriteria,
    ) -> Result<OptimizationResult> {
        ensure!(!initial.is_empty(), "no parameters to optimize");
        ensure!(
            constraint.test(initial),
            "initial parameters {initial} violate the constraint"
        );

        let mut ev = Evaluator {
            cost,
            evaluations: 0,
        };
        let finish = |x: Array, r_norm: Real, iterations: usize, evaluations: usize, end_type| {
            OptimizationResult {
                x,
                value: r_norm * r_norm,
                iterations,
                function_evaluations: evaluations,
                end_type,
            }
        };

        let mut x = initial.clone();
        let Some(mut r) = ev.residuals(&x) else {
            warn!(x = %x, "residuals cannot be evaluated at the initial point");
            return Ok(finish(x, Real::INFINITY, 0, ev.evaluations, EndCriteriaType::NumericalFailure));
        };
        ensure!(!r.is_empty(), "cost function returned no residuals");
        let mut r_norm = r.norm();

        let mut diag: DVector<Real> = DVector::zeros(0);
        let mut delta: Real = 0.0;
        let mut x_norm: Real = 0.0;
        let mut par: Real = 0.0;
        let mut iteration = 0;
        let mut stationary = 0;

        loop {
            if r_norm == 0.0 {
                return Ok(finish(x, r_norm, iteration, ev.evaluations, EndCriteriaType::StationaryFunctionAccuracy));
            }
            let Some(jac) = ev.jacobian(constraint, &x, &r, self.epsfcn) else {
                warn!(x = %x, "jacobian evaluation failed");
                return Ok(finish(x, r_norm, iteration, ev.evaluations, EndCriteriaType::NumericalFailure));
            };
            let col_norms = DVector::from_iterator(jac.ncols(), jac.column_iter().map(|c| c.norm()));
            let jtj = jac.tr_mul(&jac);
            let g = jac.tr_mul(&r);

            let first = diag.is_empty();
            if first {
                diag = col_norms.map(|c| if c == 0.0 { 1.0 } else { c });
                x_norm = diag.component_mul(x.inner()).norm();
                delta = if x_norm == 0.0 {
                    self.step_bound_factor
                } else {
                    self.step_bound_factor * x_norm
                };
            }
            if scaled_gradient_norm(&col_norms, &g, r_norm) <= end_criteria.gradient_norm_epsilon {
                return Ok(finish(x, r_norm, iteration, ev.evaluations, EndCriteriaType::ZeroGradientNorm));
            }
            diag = diag.zip_map(&col_norms, Real::max);

            loop {
                if end_criteria.check_max_iterations(iteration) {
                    return Ok(finish(x, r_norm, iteration, ev.evaluations, EndCriteriaType::MaxIterations));
                }
                iteration += 1;

                let Some((damping, p)) = damping_search(&jtj, &g, &diag, delta, par) else {
                    warn!(iteration, "damped normal equations cannot be solved");
                    return Ok(finish(x, r_norm, iteration, ev.evaluations, EndCriteriaType::NumericalFailure));
                };
                par = damping;
                let p_norm = diag.component_mul(&p).norm();
                if first {
                    delta = delta.min(p_norm);
                }

                let trial = &x + &Array::from(p.clone());
                let r_trial = if constraint.test(&trial) {
                    ev.residuals(&trial)
                } else {
                    None
                };
                let r_norm_trial = r_trial.as_ref().map_or(Real::INFINITY, |r| r.norm());

                let actual = if 0.1 * r_norm_trial < r_norm {
                    1.0 - (r_norm_trial / r_norm).powi(2)
                } else {
                    -1.0
                };
                let t1 = (&jac * &p).norm() / r_norm;
                let t2 = par.sqrt() * p_norm / r_norm;
                let predicted = t1 * t1 + 2.0 * t2 * t2;
                let directional = -(t1 * t1 + t2 * t2);
                let ratio = if predicted != 0.0 { actual / predicted } else { 0.0 };

                if ratio <= 0.25 {
                    let mut shrink = if actual >= 0.0 {
                        0.5
                    } else {
                        0.5 * directional / (directional + 0.5 * actual)
                    };
                    if 0.1 * r_norm_trial >= r_norm || shrink < 0.1 {
                        shrink = 0.1;
                    }
                    delta = shrink * delta.min(p_norm / 0.1);
                    par /= shrink;
                } else if par == 0.0 || ratio >= 0.75 {
                    delta = p_norm / 0.5;
                    par *= 0.5;
                }

                let accepted = match r_trial {
                    Some(r_new) if ratio >= ACCEPTANCE_RATIO => {
                        x = trial;
                        r = r_new;
                        r_norm = r_norm_trial;
                        x_norm = diag.component_mul(x.inner()).norm();
                        stationary = 0;
                        debug!(iteration, value = r_norm * r_norm, radius = delta, "step accepted");
                        true
                    }
                    _ => {
                        stationary += 1;
                        false
                    }
                };

                if actual.abs() <= end_criteria.function_epsilon
                    && predicted <= end_criteria.function_epsilon
                    && ratio <= 2.0
                {
                    return Ok(finish(x, r_norm, iteration, ev.evaluations, EndCriteriaType::StationaryFunctionValue));
                }
                if delta <= end_criteria.root_epsilon * x_norm
                    || delta <= Real::EPSILON * x_norm
                    || end_criteria.check_stationary_point(stationary)
                {
                    return Ok(finish(x, r_norm, iteration, ev.evaluations, EndCriteriaType::StationaryPoint));
                }
                if accepted {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{NoConstraint, PositiveConstraint};
    use approx::assert_abs_diff_eq;
    use ql_core::errors::Error;

    /// Residuals of an exponential decay `a·exp(-b·t)` against exact data.
    struct ExpFit {
        t: Vec<Real>,
        y: Vec<Real>,
    }

    impl ExpFit {
        fn new(a: Real, b: Real) -> Self {
            let t: Vec<Real> = (0..12).map(|i| 0.25 * i as Real).collect();
            let y = t.iter().map(|t| a * (-b * t).exp()).collect();
            Self { t, y }
        }
    }

    impl CostFunction for ExpFit {
        fn values(&self, x: &Array) -> Result<Array> {
            Ok(self
                .t
                .iter()
                .zip(&self.y)
                .map(|(t, y)| x[0] * (-x[1] * t).exp() - y)
                .collect())
        }
    }

    struct Rosenbrock;

    impl CostFunction for Rosenbrock {
        fn values(&self, x: &Array) -> Result<Array> {
            Ok(Array::from_slice(&[10.0 * (x[1] - x[0] * x[0]), 1.0 - x[0]]))
        }
    }

    #[test]
    fn fits_exponential_decay() {
        let cost = ExpFit::new(2.5, 1.3);
        let res = LevenbergMarquardt::new()
            .minimize(
                &cost,
                &PositiveConstraint,
                &Array::from_slice(&[1.0, 0.5]),
                &EndCriteria::new(200, 50, 1e-10, 1e-12, 1e-12),
            )
            .unwrap();
        assert!(!res.end_type.is_failure());
        assert_abs_diff_eq!(res.x[0], 2.5, epsilon = 1e-5);
        assert_abs_diff_eq!(res.x[1], 1.3, epsilon = 1e-5);
    }

    #[test]
    fn solves_rosenbrock() {
        let res = LevenbergMarquardt::new()
            .minimize(
                &Rosenbrock,
                &NoConstraint,
                &Array::from_slice(&[-1.2, 1.0]),
                &EndCriteria::new(500, 100, 1e-12, 1e-14, 1e-14),
            )
            .unwrap();
        assert_abs_diff_eq!(res.x[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(res.x[1], 1.0, epsilon = 1e-4);
        assert!(res.value < 1e-8);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let res = LevenbergMarquardt::new()
            .minimize(
                &Rosenbrock,
                &NoConstraint,
                &Array::from_slice(&[-1.2, 1.0]),
                &EndCriteria::new(2, 100, 1e-12, 1e-14, 1e-14),
            )
            .unwrap();
        assert_eq!(res.end_type, EndCriteriaType::MaxIterations);
        assert_eq!(res.iterations, 2);
    }

    struct AlwaysFails;

    impl CostFunction for AlwaysFails {
        fn values(&self, _x: &Array) -> Result<Array> {
            Err(Error::Runtime("pricing failed".into()))
        }
    }

    #[test]
    fn evaluation_failure_keeps_initial_point() {
        let x0 = Array::from_slice(&[0.3]);
        let res = LevenbergMarquardt::new()
            .minimize(&AlwaysFails, &NoConstraint, &x0, &EndCriteria::default())
            .unwrap();
        assert_eq!(res.end_type, EndCriteriaType::NumericalFailure);
        assert_eq!(res.x, x0);
    }

    #[test]
    fn damping_search_respects_the_trust_radius() {
        let jtj = DMatrix::identity(2, 2);
        let g = DVector::from_vec(vec![-10.0, 0.0]);
        let diag = DVector::from_element(2, 1.0);

        let (par, p) = damping_search(&jtj, &g, &diag, 100.0, 0.0).unwrap();
        assert_eq!(par, 0.0);
        assert_abs_diff_eq!(p[0], 10.0, epsilon = 1e-12);

        let (par, p) = damping_search(&jtj, &g, &diag, 1.0, 0.0).unwrap();
        assert!(par > 0.0);
        assert!((p.norm() - 1.0).abs() <= 0.1, "step norm {}", p.norm());
        assert!(p[0] > 0.0);
    }

    #[test]
    fn malformed_input_is_an_error() {
        let lm = LevenbergMarquardt::new();
        let ec = EndCriteria::default();
        assert!(lm.minimize(&Rosenbrock, &NoConstraint, &Array::zeros(0), &ec).is_err());
        assert!(lm
            .minimize(&Rosenbrock, &PositiveConstraint, &Array::from_slice(&[-1.0, 1.0]), &ec)
            .is_err());
    }
}
