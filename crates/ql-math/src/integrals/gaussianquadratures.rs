//! Gauss–Laguerre quadrature for integrals over `[0, ∞)`.
//!
//! Nodes are the eigenvalues of the symmetric Jacobi matrix of the Laguerre
//! recurrence (Golub–Welsch), polished by Newton steps on `L_n`. Weights
//! come from `wᵢ = xᵢ / ((n+1)² L_{n+1}(xᵢ)²)` and are stored pre-multiplied
//! by `e^{xᵢ}`, evaluated in log space so high orders neither overflow nor
//! underflow.

use nalgebra::{DMatrix, SymmetricEigen};
use ql_core::{ensure, errors::Result, Real};

const RESCALE: Real = 1e150;

/// Gauss–Laguerre rule of a fixed order.
///
/// [`integrate`](Self::integrate) approximates `∫₀^∞ f(x) dx` directly, so
/// the integrand is passed without its `e^{-x}` weight.
#[derive(Debug, Clone)]
pub struct GaussLaguerreIntegration {
    x: Vec<Real>,
    w: Vec<Real>,
}

/// `(L_m(x), L_{m-1}(x), ln s)` with both polynomial values divided by `s`.
fn laguerre(m: usize, x: Real) -> (Real, Real, Real) {
    let mut prev = 1.0;
    let mut cur = 1.0 - x;
    let mut log_scale = 0.0;
    if m == 0 {
        return (1.0, 0.0, 0.0);
    }
    for k in 1..m {
        let k = k as Real;
        let next = ((2.0 * k + 1.0 - x) * cur - k * prev) / (k + 1.0);
        prev = cur;
        cur = next;
        if cur.abs() > RESCALE {
            cur /= RESCALE;
            prev /= RESCALE;
            log_scale += RESCALE.ln();
        }
    }
    (cur, prev, log_scale)
}

impl GaussLaguerreIntegration {
    /// Rule with `order` nodes.
    pub fn new(order: usize) -> Result<Self> {
        ensure!(order >= 1, "Gauss-Laguerre order must be at least 1");
        let n = order;
        let mut jacobi = DMatrix::<Real>::zeros(n, n);
        for i in 0..n {
            jacobi[(i, i)] = 2.0 * i as Real + 1.0;
            if i + 1 < n {
                jacobi[(i, i + 1)] = (i + 1) as Real;
                jacobi[(i + 1, i)] = (i + 1) as Real;
            }
        }
        let mut x: Vec<Real> = SymmetricEigen::new(jacobi).eigenvalues.iter().copied().collect();
        x.sort_by(Real::total_cmp);

        let nf = n as Real;
        for xi in x.iter_mut() {
            for _ in 0..4 {
                let (ln, ln1, _) = laguerre(n, *xi);
                let derivative = nf * (ln - ln1) / *xi;
                let dx = ln / derivative;
                *xi -= dx;
                if dx.abs() <= Real::EPSILON * xi.abs() {
                    break;
                }
            }
        }

        let w = x
            .iter()
            .map(|&xi| {
                let (l_next, _, log_scale) = laguerre(n + 1, xi);
                (xi.ln() + xi - 2.0 * (nf + 1.0).ln() - 2.0 * (l_next.abs().ln() + log_scale)).exp()
            })
            .collect();
        Ok(Self { x, w })
    }

    /// Number of nodes.
    pub fn order(&self) -> usize {
        self.x.len()
    }

    /// Nodes in increasing order.
    pub fn nodes(&self) -> &[Real] {
        &self.x
    }

    /// Weights multiplied by `e^{xᵢ}`.
    pub fn weights(&self) -> &[Real] {
        &self.w
    }

    /// `∫₀^∞ f(x) dx ≈ Σ wᵢ e^{xᵢ} f(xᵢ)`.
    pub fn integrate<F: Fn(Real) -> Real>(&self, f: F) -> Real {
        self.x.iter().zip(&self.w).map(|(&x, &w)| w * f(x)).sum()
    }
}
