//! Monte Carlo engine for European options under Heston or Bates
//! dynamics.
//!
//! Paths are drawn with the quadratic-exponential discretisation of the
//! processes in `ql-processes` on a uniform grid of
//! `max(1, ⌈steps_per_year · T⌉)` steps, from a seeded Mersenne-Twister
//! Gaussian sequence. Each path pays `payoff(S_T)` discounted on the
//! risk-free curve.

use std::sync::Arc;

use ql_core::{errors::Result, Error, Real, Size};
use ql_instruments::{PricingEngine, PricingResults, VanillaOptionArguments};
use ql_methods::{MonteCarloModel, MultiPath, MultiPathGenerator, SamplingTarget, TimeGrid};
use ql_models::{HestonFamilyModel, JumpComponent};
use ql_processes::{BatesProcess, HestonProcess, StochasticProcess};
use ql_termstructures::YieldTermStructure;
use tracing::debug;

/// Smallest batch drawn before a tolerance is tested.
const MIN_SAMPLES: Size = 1023;
/// Default cap on the number of samples for a tolerance target.
const DEFAULT_MAX_SAMPLES: Size = Size::MAX;

/// Where the simulated dynamics come from.
#[derive(Debug, Clone)]
enum Dynamics {
    Model(Arc<dyn HestonFamilyModel>),
    Heston(HestonProcess),
    Bates(BatesProcess),
}

/// The process actually simulated in one valuation.
enum Simulated {
    Heston(HestonProcess),
    Bates(BatesProcess),
}

impl Simulated {
    fn process(&self) -> &dyn StochasticProcess {
        match self {
            Self::Heston(p) => p,
            Self::Bates(p) => p,
        }
    }

    fn heston(&self) -> &HestonProcess {
        match self {
            Self::Heston(p) => p,
            Self::Bates(p) => p.heston(),
        }
    }
}

/// Requested accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Accuracy {
    Samples(Size),
    Tolerance(Real),
}

/// Monte Carlo engine for European vanilla options.
///
/// ```ignore
/// let engine = MonteCarloHestonEngine::from_bates_process(process)
///     .with_steps_per_year(2)
///     .with_antithetic_variate(true)
///     .with_tolerance(0.1)
///     .with_seed(1234);
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarloHestonEngine {
    dynamics: Dynamics,
    steps_per_year: Size,
    antithetic: bool,
    accuracy: Accuracy,
    max_samples: Size,
    seed: u64,
}

impl MonteCarloHestonEngine {
    fn with_dynamics(dynamics: Dynamics) -> Self {
        Self {
            dynamics,
            steps_per_year: 1,
            antithetic: false,
            accuracy: Accuracy::Samples(MIN_SAMPLES + 1),
            max_samples: DEFAULT_MAX_SAMPLES,
            seed: 0,
        }
    }

    /// Simulate the current parameters of `model`.
    ///
    /// Models with log-normal jumps of constant intensity are simulated as
    /// a Bates process; the other jump variants are not supported.
    pub fn new(model: Arc<dyn HestonFamilyModel>) -> Self {
        Self::with_dynamics(Dynamics::Model(model))
    }

    /// Simulate a Heston process.
    pub fn from_heston_process(process: HestonProcess) -> Self {
        Self::with_dynamics(Dynamics::Heston(process))
    }

    /// Simulate a Bates process.
    pub fn from_bates_process(process: BatesProcess) -> Self {
        Self::with_dynamics(Dynamics::Bates(process))
    }

    /// Time steps per year; at least one step is always taken.
    pub fn with_steps_per_year(mut self, steps: Size) -> Self {
        self.steps_per_year = steps;
        self
    }

    /// Average each path with its antithetic mirror.
    pub fn with_antithetic_variate(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Sample until the standard error is at most `tolerance`.
    pub fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.accuracy = Accuracy::Tolerance(tolerance);
        self
    }

    /// Draw exactly `samples` paths (or antithetic pairs).
    pub fn with_samples(mut self, samples: Size) -> Self {
        self.accuracy = Accuracy::Samples(samples);
        self
    }

    /// Fail a tolerance target after `max_samples` samples.
    pub fn with_max_samples(mut self, max_samples: Size) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Seed of the random sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn simulated(&self) -> Result<Simulated> {
        match &self.dynamics {
            Dynamics::Heston(p) => Ok(Simulated::Heston(p.clone())),
            Dynamics::Bates(p) => Ok(Simulated::Bates(p.clone())),
            Dynamics::Model(model) => {
                let snapshot = model.snapshot();
                let heston = snapshot.heston_process(model.process())?;
                match snapshot.jumps {
                    JumpComponent::None => Ok(Simulated::Heston(heston)),
                    JumpComponent::LogNormal { lambda, nu, delta } => {
                        Ok(Simulated::Bates(BatesProcess::new(heston, lambda, nu, delta)?))
                    }
                    other => Err(Error::NotImplemented(format!(
                        "Monte Carlo simulation of {other:?}"
                    ))),
                }
            }
        }
    }

    fn target(&self) -> Result<SamplingTarget> {
        match self.accuracy {
            Accuracy::Samples(n) if n > 0 => Ok(SamplingTarget::Samples(n)),
            Accuracy::Samples(_) => Err(Error::InvalidArgument(
                "number of Monte Carlo samples must be positive".into(),
            )),
            Accuracy::Tolerance(tolerance) => Ok(SamplingTarget::Tolerance {
                tolerance,
                min_samples: MIN_SAMPLES,
                max_samples: self.max_samples,
            }),
        }
    }
}

impl PricingEngine<VanillaOptionArguments> for MonteCarloHestonEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        let simulated = self.simulated()?;
        let risk_free: &Arc<dyn YieldTermStructure> = simulated.heston().risk_free_rate();
        let t = risk_free
            .day_counter()
            .year_fraction(risk_free.reference_date(), args.exercise.last_date());
        if !(t > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "option expiry {} is not after the reference date {}",
                args.exercise.last_date(),
                risk_free.reference_date()
            )));
        }
        let steps = ((self.steps_per_year as Real * t).ceil() as Size).max(1);
        let grid = TimeGrid::uniform(t, steps)?;
        let discount = risk_free.discount(t, true)?;

        let payoff = &args.payoff;
        let pricer = |path: &MultiPath| -> Result<Real> {
            let terminal = path
                .back()
                .ok_or_else(|| Error::Runtime("empty Monte Carlo path".into()))?;
            Ok(payoff.value(terminal[0]) * discount)
        };

        let generator = MultiPathGenerator::new(simulated.process(), grid, self.seed);
        let mut model = MonteCarloModel::new(generator, &pricer, self.antithetic);
        let result = model.run(self.target()?)?;
        debug!(
            value = result.value,
            error = result.error_estimate,
            samples = result.samples,
            steps,
            "Monte Carlo valuation finished"
        );
        Ok(PricingResults::from_value(result.value)
            .with_error_estimate(result.error_estimate)
            .with_result("samples", result.samples as Real))
    }
}
