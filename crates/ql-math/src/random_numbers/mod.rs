//! Pseudo-random number generation for Monte Carlo simulation.

use crate::distributions::normal_cdf_inverse;
use ql_core::Real;
use rand_mt::Mt19937GenRand64;

const TWO_POW_MINUS_53: Real = 1.0 / 9_007_199_254_740_992.0;

/// Mersenne Twister (MT19937-64) uniform generator.
#[derive(Clone)]
pub struct MersenneTwisterUniformRng {
    rng: Mt19937GenRand64,
}

impl MersenneTwisterUniformRng {
    /// Generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// Next deviate in the open interval `(0, 1)`.
    pub fn next_real(&mut self) -> Real {
        ((self.rng.next_u64() >> 11) as Real + 0.5) * TWO_POW_MINUS_53
    }
}

impl std::fmt::Debug for MersenneTwisterUniformRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwisterUniformRng").finish_non_exhaustive()
    }
}

/// Standard normal deviates obtained by inverting the cumulative
/// distribution of Mersenne Twister uniforms.
#[derive(Debug, Clone)]
pub struct InverseCumulativeNormalRng {
    uniform: MersenneTwisterUniformRng,
}

impl InverseCumulativeNormalRng {
    /// Generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            uniform: MersenneTwisterUniformRng::new(seed),
        }
    }

    /// Next standard normal deviate.
    pub fn next_real(&mut self) -> Real {
        normal_cdf_inverse(self.uniform.next_real())
    }

    /// Fill `out` with independent standard normal deviates.
    pub fn fill(&mut self, out: &mut [Real]) {
        for v in out.iter_mut() {
            *v = self.next_real();
        }
    }
}
