//! Poisson distribution and its inverse cumulative.

use ql_core::{ensure, errors::Result, Real};
use statrs::distribution::{Discrete, DiscreteCDF, Poisson};

/// Poisson distribution with mean `λ > 0`.
#[derive(Debug, Clone)]
pub struct PoissonDistribution {
    dist: Poisson,
    lambda: Real,
}

impl PoissonDistribution {
    /// Distribution with mean `lambda`.
    pub fn new(lambda: Real) -> Result<Self> {
        ensure!(lambda > 0.0, "Poisson mean must be positive, got {lambda}");
        let dist = Poisson::new(lambda)
            .map_err(|e| ql_core::Error::InvalidArgument(e.to_string()))?;
        Ok(Self { dist, lambda })
    }

    /// The mean λ.
    pub fn lambda(&self) -> Real {
        self.lambda
    }

    /// `P(N = k)`.
    pub fn pmf(&self, k: u64) -> Real {
        self.dist.pmf(k)
    }

    /// `P(N <= k)`.
    pub fn cdf(&self, k: u64) -> Real {
        self.dist.cdf(k)
    }
}

/// Maps a uniform deviate to a Poisson-distributed count.
///
/// Sums the probability masses `e^{-λ} λᵏ / k!` until they exceed the
/// deviate; a zero mean always yields zero.
#[derive(Debug, Clone, Copy)]
pub struct InverseCumulativePoisson {
    lambda: Real,
}

impl InverseCumulativePoisson {
    /// Inverse cumulative for mean `lambda >= 0`.
    pub fn new(lambda: Real) -> Result<Self> {
        ensure!(lambda >= 0.0, "Poisson mean must be non-negative, got {lambda}");
        Ok(Self { lambda })
    }

    /// Smallest `k` with `P(N <= k) >= u`.
    pub fn value(&self, u: Real) -> Real {
        if self.lambda == 0.0 || u <= 0.0 {
            return 0.0;
        }
        if u >= 1.0 {
            return Real::MAX;
        }
        let mut mass = (-self.lambda).exp();
        let mut sum = mass;
        let mut k = 0u32;
        while u > sum && mass > 0.0 {
            k += 1;
            mass *= self.lambda / Real::from(k);
            sum += mass;
        }
        Real::from(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pmf_and_cdf() {
        let d = PoissonDistribution::new(3.0).unwrap();
        assert_abs_diff_eq!(d.pmf(0), (-3.0_f64).exp(), epsilon = 1e-14);
        assert_abs_diff_eq!(d.pmf(3), (-3.0_f64).exp() * 4.5, epsilon = 1e-14);
        assert_abs_diff_eq!(d.cdf(60), 1.0, epsilon = 1e-12);
        assert!(PoissonDistribution::new(0.0).is_err());
    }

    #[test]
    fn inverse_matches_cdf() {
        let lambda = 2.5;
        let d = PoissonDistribution::new(lambda).unwrap();
        let inv = InverseCumulativePoisson::new(lambda).unwrap();
        for u in [0.01, 0.1, 0.4, 0.7, 0.95, 0.999] {
            let k = inv.value(u) as u64;
            assert!(d.cdf(k) >= u - 1e-14, "u = {u}");
            if k > 0 {
                assert!(d.cdf(k - 1) < u, "u = {u}");
            }
        }
    }

    #[test]
    fn degenerate_means() {
        assert_eq!(InverseCumulativePoisson::new(0.0).unwrap().value(0.99), 0.0);
        assert!(InverseCumulativePoisson::new(-1.0).is_err());
    }
}
