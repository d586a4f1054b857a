//! Path generation for multi-factor processes.

use super::path::{MultiPath, TimeGrid};
use ql_core::errors::Result;
use ql_math::random_numbers::InverseCumulativeNormalRng;
use ql_math::Array;
use ql_processes::StochasticProcess;

/// Draws paths of `process` on `grid` from a Mersenne-Twister Gaussian
/// sequence.
///
/// Each step consumes `process.factors()` draws. [`Self::antithetic`]
/// replays the draws of the last [`Self::next`] with flipped signs.
#[derive(Debug)]
pub struct MultiPathGenerator<'a, P: StochasticProcess + ?Sized> {
    process: &'a P,
    grid: TimeGrid,
    rng: InverseCumulativeNormalRng,
    draws: Vec<Array>,
}

impl<'a, P: StochasticProcess + ?Sized> MultiPathGenerator<'a, P> {
    /// Generator seeded with `seed`.
    pub fn new(process: &'a P, grid: TimeGrid, seed: u64) -> Self {
        let factors = process.factors();
        let steps = grid.steps();
        Self {
            process,
            grid,
            rng: InverseCumulativeNormalRng::new(seed),
            draws: vec![Array::zeros(factors); steps],
        }
    }

    /// The simulation grid.
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// A fresh path.
    pub fn next(&mut self) -> Result<MultiPath> {
        for dw in &mut self.draws {
            for j in 0..dw.size() {
                dw[j] = self.rng.next_real();
            }
        }
        self.path(1.0)
    }

    /// The mirror image of the last path drawn by [`Self::next`].
    pub fn antithetic(&self) -> Result<MultiPath> {
        self.path(-1.0)
    }

    fn path(&self, sign: f64) -> Result<MultiPath> {
        let mut x = self.process.initial_values()?;
        let mut states = Vec::with_capacity(self.grid.size());
        states.push(x.clone());
        for (i, dw) in self.draws.iter().enumerate() {
            let dw = dw * sign;
            x = self
                .process
                .evolve(self.grid.time(i), &x, self.grid.dt(i), &dw)?;
            states.push(x.clone());
        }
        Ok(MultiPath { states })
    }
}
