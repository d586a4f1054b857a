//! `SmileSection`: volatility as a function of strike at one expiry.

use ql_core::{Real, Time, Volatility};

/// Volatility smile at a fixed exercise time.
pub trait SmileSection: std::fmt::Debug + Send + Sync {
    /// Time to exercise.
    fn exercise_time(&self) -> Time;

    /// Lowest strike covered.
    fn min_strike(&self) -> Real;

    /// Highest strike covered.
    fn max_strike(&self) -> Real;

    /// At-the-money level, if known.
    fn atm_level(&self) -> Option<Real>;

    /// Volatility at `strike`.
    fn volatility(&self, strike: Real) -> Volatility;

    /// Total variance `σ²(K)·T`.
    fn variance(&self, strike: Real) -> Real {
        let v = self.volatility(strike);
        v * v * self.exercise_time()
    }
}

/// Smile with the same volatility at every strike.
#[derive(Debug, Clone, Copy)]
pub struct FlatSmileSection {
    exercise_time: Time,
    volatility: Volatility,
    atm_level: Option<Real>,
}

impl FlatSmileSection {
    /// Flat smile at `exercise_time`.
    pub fn new(exercise_time: Time, volatility: Volatility) -> Self {
        Self {
            exercise_time,
            volatility,
            atm_level: None,
        }
    }

    /// Attach an at-the-money level.
    pub fn with_atm_level(mut self, atm_level: Real) -> Self {
        self.atm_level = Some(atm_level);
        self
    }
}

impl SmileSection for FlatSmileSection {
    fn exercise_time(&self) -> Time {
        self.exercise_time
    }

    fn min_strike(&self) -> Real {
        Real::NEG_INFINITY
    }

    fn max_strike(&self) -> Real {
        Real::INFINITY
    }

    fn atm_level(&self) -> Option<Real> {
        self.atm_level
    }

    fn volatility(&self, _strike: Real) -> Volatility {
        self.volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_smile() {
        let s = FlatSmileSection::new(2.0, 0.2);
        assert_eq!(s.volatility(0.01), 0.2);
        assert_eq!(s.volatility(5.0), 0.2);
        assert!((s.variance(1.0) - 0.08).abs() < 1e-15);
        assert_eq!(s.atm_level(), None);
        assert_eq!(s.with_atm_level(0.03).atm_level(), Some(0.03));
    }
}
