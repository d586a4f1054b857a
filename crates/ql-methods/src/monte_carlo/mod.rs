//! Monte Carlo simulation: path generation, path pricing and the sampling
//! loop that adds batches until a target accuracy is met.
//!
//! * [`MultiPathGenerator`] — paths of a multi-factor process
//! * [`PathPricer`] — discounted payoff of one path
//! * [`MonteCarloModel`] — accumulates priced samples, optionally
//!   averaging each path with its antithetic mirror
//! * [`SamplingTarget`] — how many samples to draw

mod path;
mod path_generator;

pub use path::{MultiPath, TimeGrid};
pub use path_generator::MultiPathGenerator;

use ql_core::{errors::Result, Error, Real, Size};
use ql_math::statistics::IncrementalStatistics;
use ql_processes::StochasticProcess;
use tracing::trace;

/// Discounted payoff of a single path.
pub trait PathPricer: Send + Sync {
    /// Value of `path`.
    fn value(&self, path: &MultiPath) -> Result<Real>;
}

impl<F> PathPricer for F
where
    F: Fn(&MultiPath) -> Result<Real> + Send + Sync,
{
    fn value(&self, path: &MultiPath) -> Result<Real> {
        self(path)
    }
}

/// When to stop sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingTarget {
    /// Draw exactly this many samples.
    Samples(Size),
    /// Draw until the error estimate is at most `tolerance`, with at least
    /// `min_samples` and at most `max_samples` samples.
    Tolerance {
        /// Target standard error of the mean.
        tolerance: Real,
        /// First batch size.
        min_samples: Size,
        /// Hard cap on the number of samples.
        max_samples: Size,
    },
}

/// Estimate produced by [`MonteCarloModel::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloResult {
    /// Sample mean.
    pub value: Real,
    /// Standard error of the mean.
    pub error_estimate: Real,
    /// Samples drawn; an antithetic pair counts once.
    pub samples: Size,
}

/// Combines a path generator with a pricer and a sample accumulator.
#[derive(Debug)]
pub struct MonteCarloModel<'a, P: StochasticProcess + ?Sized, Q: PathPricer + ?Sized> {
    generator: MultiPathGenerator<'a, P>,
    pricer: &'a Q,
    antithetic: bool,
    stats: IncrementalStatistics,
}

impl<'a, P, Q> MonteCarloModel<'a, P, Q>
where
    P: StochasticProcess + ?Sized,
    Q: PathPricer + ?Sized,
{
    /// Model drawing from `generator` and valuing each path with `pricer`.
    pub fn new(generator: MultiPathGenerator<'a, P>, pricer: &'a Q, antithetic: bool) -> Self {
        Self {
            generator,
            pricer,
            antithetic,
            stats: IncrementalStatistics::new(),
        }
    }

    /// Accumulated statistics.
    pub fn statistics(&self) -> &IncrementalStatistics {
        &self.stats
    }

    /// Draw and price `samples` more paths (or antithetic pairs).
    pub fn add_samples(&mut self, samples: Size) -> Result<()> {
        for _ in 0..samples {
            let path = self.generator.next()?;
            let mut value = self.pricer.value(&path)?;
            if self.antithetic {
                let mirror = self.generator.antithetic()?;
                value = 0.5 * (value + self.pricer.value(&mirror)?);
            }
            self.stats.add(value);
        }
        Ok(())
    }

    /// Sample until `target` is met.
    ///
    /// With a tolerance target, each new batch is sized from the current
    /// error estimate assuming `error ∝ 1/√n`; exceeding `max_samples`
    /// before reaching the tolerance is an error.
    pub fn run(&mut self, target: SamplingTarget) -> Result<MonteCarloResult> {
        match target {
            SamplingTarget::Samples(n) => {
                let have = self.stats.samples();
                if n > have {
                    self.add_samples(n - have)?;
                }
            }
            SamplingTarget::Tolerance {
                tolerance,
                min_samples,
                max_samples,
            } => self.run_to_tolerance(tolerance, min_samples.max(2), max_samples)?,
        }
        self.result()
    }

    fn run_to_tolerance(&mut self, tolerance: Real, min_samples: Size, max_samples: Size) -> Result<()> {
        if !(tolerance > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "Monte Carlo tolerance ({tolerance}) must be positive"
            )));
        }
        let have = self.stats.samples();
        if have < min_samples {
            self.add_samples(min_samples - have)?;
        }
        let mut order = self.error()? / tolerance;
        while order > 1.0 {
            let samples = self.stats.samples();
            if samples >= max_samples {
                return Err(Error::Runtime(format!(
                    "max number of samples ({max_samples}) reached, error estimate {} above tolerance {tolerance}",
                    self.error()?
                )));
            }
            let wanted = (samples as Real * order * order * 1.1).ceil() as Size;
            let batch = wanted
                .saturating_sub(samples)
                .max(min_samples)
                .min(max_samples - samples);
            trace!(samples, batch, error_ratio = order, "adding Monte Carlo samples");
            self.add_samples(batch)?;
            order = self.error()? / tolerance;
        }
        Ok(())
    }

    fn error(&self) -> Result<Real> {
        self.stats
            .error_estimate()
            .ok_or_else(|| Error::Runtime("at least two samples are needed for an error estimate".into()))
    }

    fn result(&self) -> Result<MonteCarloResult> {
        let value = self
            .stats
            .mean()
            .ok_or_else(|| Error::Runtime("no Monte Carlo samples drawn".into()))?;
        Ok(MonteCarloResult {
            value,
            error_estimate: self.stats.error_estimate().unwrap_or(0.0),
            samples: self.stats.samples(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_processes::BlackScholesMertonProcess;
    use ql_quotes::SimpleQuote;
    use ql_termstructures::{BlackConstantVol, FlatForward, TermStructureData};
    use ql_time::{Actual365Fixed, Date, NullCalendar};
    use std::sync::Arc;

    fn process() -> BlackScholesMertonProcess {
        let today = Date::from_ymd(2025, 1, 15).unwrap();
        let data = || TermStructureData::fixed(today, NullCalendar, Actual365Fixed);
        BlackScholesMertonProcess::new(
            Arc::new(SimpleQuote::new(100.0)),
            Arc::new(FlatForward::new(data(), 0.05)),
            Arc::new(FlatForward::new(data(), 0.0)),
            Arc::new(BlackConstantVol::new(data(), 0.2)),
        )
    }

    fn call(path: &MultiPath) -> Result<Real> {
        let s = path.back().map_or(0.0, |x| x[0]);
        Ok((s - 100.0).max(0.0) * (-0.05_f64).exp())
    }

    #[test]
    fn european_call_converges_to_black_scholes() {
        let p = process();
        let generator = MultiPathGenerator::new(&p, TimeGrid::uniform(1.0, 1).unwrap(), 42);
        let mut model = MonteCarloModel::new(generator, &call, true);
        let res = model.run(SamplingTarget::Samples(50_000)).unwrap();
        assert_eq!(res.samples, 50_000);
        // Black-Scholes value 10.4506
        assert_abs_diff_eq!(res.value, 10.4506, epsilon = 4.0 * res.error_estimate);
    }

    #[test]
    fn tolerance_target_is_met() {
        let p = process();
        let generator = MultiPathGenerator::new(&p, TimeGrid::uniform(1.0, 4).unwrap(), 1234);
        let mut model = MonteCarloModel::new(generator, &call, false);
        let res = model
            .run(SamplingTarget::Tolerance {
                tolerance: 0.1,
                min_samples: 1023,
                max_samples: 1_000_000,
            })
            .unwrap();
        assert!(res.error_estimate <= 0.1);
        assert!(res.samples > 1023);
    }

    #[test]
    fn sample_cap_is_an_error() {
        let p = process();
        let generator = MultiPathGenerator::new(&p, TimeGrid::uniform(1.0, 1).unwrap(), 1);
        let mut model = MonteCarloModel::new(generator, &call, false);
        let err = model
            .run(SamplingTarget::Tolerance {
                tolerance: 1e-4,
                min_samples: 100,
                max_samples: 1000,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));
        assert_eq!(model.statistics().samples(), 1000);
    }

    #[test]
    fn antithetic_pairs_reduce_the_error() {
        let p = process();
        let grid = TimeGrid::uniform(1.0, 1).unwrap();
        let mut plain = MonteCarloModel::new(MultiPathGenerator::new(&p, grid.clone(), 9), &call, false);
        let mut anti = MonteCarloModel::new(MultiPathGenerator::new(&p, grid, 9), &call, true);
        let e_plain = plain.run(SamplingTarget::Samples(20_000)).unwrap().error_estimate;
        let e_anti = anti.run(SamplingTarget::Samples(20_000)).unwrap().error_estimate;
        assert!(e_anti < e_plain, "antithetic {e_anti} vs plain {e_plain}");
    }
}
