//! Time grid and multi-asset sample paths.

use ql_core::{ensure, errors::Result, Real, Time};
use ql_math::Array;

/// A grid of time points starting at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<Time>,
}

impl TimeGrid {
    /// `steps` equal intervals from 0 to `end`.
    pub fn uniform(end: Time, steps: usize) -> Result<Self> {
        ensure!(end > 0.0, "time grid must end after 0, got {end}");
        ensure!(steps > 0, "time grid needs at least one step");
        let dt = end / steps as Real;
        let mut times: Vec<Time> = (0..steps).map(|i| i as Real * dt).collect();
        times.push(end);
        Ok(Self { times })
    }

    /// Number of time points.
    pub fn size(&self) -> usize {
        self.times.len()
    }

    /// Number of intervals.
    pub fn steps(&self) -> usize {
        self.times.len() - 1
    }

    /// Time at index `i`.
    pub fn time(&self, i: usize) -> Time {
        self.times[i]
    }

    /// Length of interval `i`.
    pub fn dt(&self, i: usize) -> Time {
        self.times[i + 1] - self.times[i]
    }

    /// Last time point.
    pub fn end(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// All time points.
    pub fn times(&self) -> &[Time] {
        &self.times
    }
}

/// One realisation of a multi-dimensional process on a [`TimeGrid`]:
/// `states[i]` is the state vector at `grid.time(i)`.
#[derive(Debug, Clone)]
pub struct MultiPath {
    /// State vectors, one per grid point.
    pub states: Vec<Array>,
}

impl MultiPath {
    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// `true` for a path without points.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Initial state.
    pub fn front(&self) -> Option<&Array> {
        self.states.first()
    }

    /// Terminal state.
    pub fn back(&self) -> Option<&Array> {
        self.states.last()
    }

    /// Component `asset` along the path.
    pub fn asset(&self, asset: usize) -> impl Iterator<Item = Real> + '_ {
        self.states.iter().map(move |s| s[asset])
    }
}
