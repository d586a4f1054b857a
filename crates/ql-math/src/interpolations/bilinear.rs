//! Bilinear interpolation on a rectangular grid.

use super::{check_nodes, locate};
use ql_core::{ensure, errors::Result, Real};

/// A function of two variables defined from a grid of nodes.
pub trait Interpolation2D: std::fmt::Debug + Send + Sync {
    /// Value at `(x, y)`.
    fn value(&self, x: Real, y: Real) -> Real;
    /// First x node.
    fn x_min(&self) -> Real;
    /// Last x node.
    fn x_max(&self) -> Real;
    /// First y node.
    fn y_min(&self) -> Real;
    /// Last y node.
    fn y_max(&self) -> Real;
}

/// Bilinear interpolation of `z` over `xs × ys`.
///
/// `z` is row-major with one row per `y` node: `z[j * xs.len() + i]` is the
/// value at `(xs[i], ys[j])`. An axis with a single node is treated as flat
/// along that axis.
#[derive(Debug, Clone)]
pub struct BilinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    z: Vec<Real>,
}

/// Lower node index and weight of the upper node along one axis.
fn bracket(nodes: &[Real], v: Real) -> (usize, Real) {
    if nodes.len() == 1 {
        return (0, 0.0);
    }
    let i = locate(nodes, v);
    (i, (v - nodes[i]) / (nodes[i + 1] - nodes[i]))
}

impl BilinearInterpolation {
    /// Interpolation over the grid `xs × ys`.
    pub fn new(xs: &[Real], ys: &[Real], z: &[Real]) -> Result<Self> {
        check_nodes(xs, 1, "x")?;
        check_nodes(ys, 1, "y")?;
        ensure!(
            z.len() == xs.len() * ys.len(),
            "grid of {}x{} nodes needs {} values, {} given",
            xs.len(),
            ys.len(),
            xs.len() * ys.len(),
            z.len()
        );
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            z: z.to_vec(),
        })
    }

    fn at(&self, i: usize, j: usize) -> Real {
        let i = i.min(self.xs.len() - 1);
        let j = j.min(self.ys.len() - 1);
        self.z[j * self.xs.len() + i]
    }
}

impl Interpolation2D for BilinearInterpolation {
    fn value(&self, x: Real, y: Real) -> Real {
        let (i, t) = bracket(&self.xs, x);
        let (j, u) = bracket(&self.ys, y);
        (1.0 - t) * (1.0 - u) * self.at(i, j)
            + t * (1.0 - u) * self.at(i + 1, j)
            + (1.0 - t) * u * self.at(i, j + 1)
            + t * u * self.at(i + 1, j + 1)
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn y_min(&self) -> Real {
        self.ys[0]
    }

    fn y_max(&self) -> Real {
        self.ys[self.ys.len() - 1]
    }
}
