//! Running statistics over a stream of samples.

use ql_core::Real;

/// Accumulates count, mean and variance of a sample stream without
/// storing it (Welford's update).
#[derive(Debug, Clone, Default)]
pub struct IncrementalStatistics {
    count: usize,
    mean: Real,
    m2: Real,
}

impl IncrementalStatistics {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample.
    pub fn add(&mut self, x: Real) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as Real;
        self.m2 += delta * (x - self.mean);
    }

    /// Add every sample of `xs`.
    pub fn add_all(&mut self, xs: &[Real]) {
        for &x in xs {
            self.add(x);
        }
    }

    /// Number of samples.
    pub fn samples(&self) -> usize {
        self.count
    }

    /// Sample mean; `None` when empty.
    pub fn mean(&self) -> Option<Real> {
        (self.count > 0).then_some(self.mean)
    }

    /// Unbiased sample variance; `None` with fewer than two samples.
    pub fn variance(&self) -> Option<Real> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as Real)
    }

    /// Standard error of the mean; `None` with fewer than two samples.
    pub fn error_estimate(&self) -> Option<Real> {
        self.variance().map(|v| (v / self.count as Real).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn moments() {
        let mut s = IncrementalStatistics::new();
        s.add_all(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(s.samples(), 5);
        assert_abs_diff_eq!(s.mean().unwrap(), 3.0, epsilon = 1e-14);
        assert_abs_diff_eq!(s.variance().unwrap(), 2.5, epsilon = 1e-14);
        assert_abs_diff_eq!(s.error_estimate().unwrap(), 0.5_f64.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn empty_and_single() {
        let mut s = IncrementalStatistics::new();
        assert!(s.mean().is_none());
        s.add(4.0);
        assert_eq!(s.mean(), Some(4.0));
        assert!(s.variance().is_none());
    }
}
