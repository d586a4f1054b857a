//! One-dimensional root finding.

use ql_core::{
    errors::{Error, Result},
    Real,
};

/// Brent's method on a bracketing interval.
///
/// Combines bisection, secant and inverse quadratic interpolation; the
/// bracket must straddle the root.
#[derive(Debug, Clone, Copy)]
pub struct Brent {
    accuracy: Real,
    max_evaluations: usize,
}

impl Default for Brent {
    fn default() -> Self {
        Self {
            accuracy: 1e-11,
            max_evaluations: 100,
        }
    }
}

impl Brent {
    /// Solver with the given absolute accuracy on the root.
    pub fn new(accuracy: Real) -> Self {
        Self {
            accuracy,
            ..Self::default()
        }
    }

    /// Cap on objective evaluations.
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Root of `f` inside `[x_min, x_max]`.
    pub fn solve<F>(&self, mut f: F, x_min: Real, x_max: Real) -> Result<Real>
    where
        F: FnMut(Real) -> Real,
    {
        let (mut a, mut b) = (x_min, x_max);
        let (mut fa, mut fb) = (f(a), f(b));
        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }
        if fa * fb > 0.0 {
            return Err(Error::Precondition(format!(
                "root not bracketed: f({a}) = {fa}, f({b}) = {fb}"
            )));
        }

        let (mut c, mut fc) = (a, fa);
        let mut step = b - a;
        let mut last_step = step;

        for _ in 2..self.max_evaluations {
            if fb * fc > 0.0 {
                c = a;
                fc = fa;
                step = b - a;
                last_step = step;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
            let tol = 2.0 * Real::EPSILON * b.abs() + 0.5 * self.accuracy;
            let mid = 0.5 * (c - b);
            if mid.abs() <= tol || fb == 0.0 {
                return Ok(b);
            }
            if last_step.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (2.0 * mid * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * mid * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                } else {
                    p = -p;
                }
                if 2.0 * p < (3.0 * mid * q - (tol * q).abs()).min((last_step * q).abs()) {
                    last_step = step;
                    step = p / q;
                } else {
                    step = mid;
                    last_step = step;
                }
            } else {
                step = mid;
                last_step = step;
            }
            a = b;
            fa = fb;
            b += if step.abs() > tol { step } else { tol.copysign(mid) };
            fb = f(b);
        }
        Err(Error::Runtime(format!(
            "Brent: no convergence within {} evaluations",
            self.max_evaluations
        )))
    }
}
