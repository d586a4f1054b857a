//! Piecewise-linear interpolation in one and two dimensions.
//!
//! Both schemes extend their edge segments linearly outside the node
//! range; whether such a query is allowed is decided by the caller.

mod bilinear;

pub use bilinear::{BilinearInterpolation, Interpolation2D};

use ql_core::{ensure, errors::Result, Real};

/// A function of one variable defined from a set of nodes.
pub trait Interpolation1D: std::fmt::Debug + Send + Sync {
    /// Value at `x`.
    fn value(&self, x: Real) -> Real;

    /// First node.
    fn x_min(&self) -> Real;

    /// Last node.
    fn x_max(&self) -> Real;

    /// `true` if `x` lies within `[x_min, x_max]`.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// Checks that `xs` is strictly increasing and has at least `min_len` nodes.
pub(crate) fn check_nodes(xs: &[Real], min_len: usize, axis: &str) -> Result<()> {
    ensure!(
        xs.len() >= min_len,
        "{axis}: at least {min_len} nodes required, {} given",
        xs.len()
    );
    ensure!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "{axis}: nodes must be strictly increasing"
    );
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` used for `x`, clamped to the
/// first and last segments. Requires at least two nodes.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let last = xs.len() - 2;
    match xs.partition_point(|&v| v <= x) {
        0 => 0,
        k => (k - 1).min(last),
    }
}

/// Linear interpolation through `(xs[i], ys[i])`.
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Interpolation through at least two nodes with increasing abscissae.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, 2, "x")?;
        ensure!(
            xs.len() == ys.len(),
            "{} abscissae but {} ordinates",
            xs.len(),
            ys.len()
        );
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Slope of the segment used for `x`.
    pub fn derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolation1D for LinearInterpolation {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.ys[i] + (x - self.xs[i]) * self.derivative(x)
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
