//! Heston stochastic-volatility model.
//!
//! ```text
//! dS = (r − q) S dt + √v S dW₁
//! dv = κ(θ − v) dt + σ √v dW₂
//! dW₁ dW₂ = ρ dt
//! ```
//!
//! The model owns the calibratable parameters `[θ, κ, σ, ρ, v0]`; the
//! process it is built from only contributes the spot and the two curves.
//! The Bates extensions in [`crate::bates_model`] append their jump
//! parameters to the same vector.

use crate::calibrated_model::CalibratedModel;
use crate::parameter::{ModelParameters, Parameter};
use ql_core::{errors::Result, Real};
use ql_math::Array;
use ql_processes::HestonProcess;

/// Jump component of a model in the Heston family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpComponent {
    /// Pure diffusion.
    None,
    /// Log-normal jumps `ln J ~ N(ν, δ²)` with constant intensity `λ`.
    LogNormal {
        /// Intensity.
        lambda: Real,
        /// Mean log-jump.
        nu: Real,
        /// Log-jump volatility.
        delta: Real,
    },
    /// Log-normal jumps whose intensity mean-reverts deterministically
    /// from `λ` towards `θ_λ` at speed `κ_λ`.
    LogNormalDetIntensity {
        /// Initial intensity.
        lambda: Real,
        /// Mean log-jump.
        nu: Real,
        /// Log-jump volatility.
        delta: Real,
        /// Mean-reversion speed of the intensity.
        kappa_lambda: Real,
        /// Long-run intensity.
        theta_lambda: Real,
    },
    /// Double-exponential log-jumps: up with probability `p` and mean
    /// `ν_up`, down otherwise with mean `ν_down`.
    DoubleExponential {
        /// Intensity.
        lambda: Real,
        /// Mean upward log-jump.
        nu_up: Real,
        /// Mean downward log-jump size.
        nu_down: Real,
        /// Probability of an upward jump.
        p: Real,
    },
    /// Double-exponential log-jumps with deterministic intensity.
    DoubleExponentialDetIntensity {
        /// Initial intensity.
        lambda: Real,
        /// Mean upward log-jump.
        nu_up: Real,
        /// Mean downward log-jump size.
        nu_down: Real,
        /// Probability of an upward jump.
        p: Real,
        /// Mean-reversion speed of the intensity.
        kappa_lambda: Real,
        /// Long-run intensity.
        theta_lambda: Real,
    },
}

/// Parameters of a Heston-family model frozen at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HestonSnapshot {
    /// Initial variance.
    pub v0: Real,
    /// Mean-reversion speed.
    pub kappa: Real,
    /// Long-run variance.
    pub theta: Real,
    /// Volatility of variance.
    pub sigma: Real,
    /// Spot/variance correlation.
    pub rho: Real,
    /// Jump component.
    pub jumps: JumpComponent,
}

impl HestonSnapshot {
    /// Diffusive parameters out of a `[θ, κ, σ, ρ, v0, …]` vector.
    pub(crate) fn from_values(values: &Array, jumps: JumpComponent) -> Self {
        Self {
            theta: values[0],
            kappa: values[1],
            sigma: values[2],
            rho: values[3],
            v0: values[4],
            jumps,
        }
    }

    /// `process` with the diffusive parameters replaced by this snapshot's.
    pub fn heston_process(&self, process: &HestonProcess) -> Result<HestonProcess> {
        process.with_parameters(self.v0, self.kappa, self.theta, self.sigma, self.rho)
    }
}

/// A calibrated model with Heston diffusion and an optional jump term.
///
/// Pricing engines read one [`HestonSnapshot`] per valuation so that a
/// concurrent recalibration never mixes parameter sets within a price.
pub trait HestonFamilyModel: CalibratedModel {
    /// The process supplying spot, risk-free and dividend curves.
    fn process(&self) -> &HestonProcess;

    /// Current parameters.
    fn snapshot(&self) -> HestonSnapshot;
}

/// The five diffusive parameters in calibration order, with their
/// constraints and the process' values.
pub(crate) fn heston_parameters(process: &HestonProcess) -> (Vec<Parameter>, Vec<Real>) {
    (
        vec![
            Parameter::positive("theta"),
            Parameter::positive("kappa"),
            Parameter::positive("sigma"),
            Parameter::bounded("rho", -1.0, 1.0),
            Parameter::positive("v0"),
        ],
        vec![
            process.theta(),
            process.kappa(),
            process.sigma(),
            process.rho(),
            process.v0(),
        ],
    )
}

/// The Heston model.
#[derive(Debug)]
pub struct HestonModel {
    process: HestonProcess,
    params: ModelParameters,
}

impl HestonModel {
    /// Model starting from the parameters of `process`.
    ///
    /// Fails unless `θ, κ, σ, v0 > 0`.
    pub fn new(process: HestonProcess) -> Result<Self> {
        let (parameters, initial) = heston_parameters(&process);
        Ok(Self {
            params: ModelParameters::new(parameters, &initial)?,
            process,
        })
    }

    /// Long-run variance.
    pub fn theta(&self) -> Real {
        self.params()[0]
    }

    /// Mean-reversion speed.
    pub fn kappa(&self) -> Real {
        self.params()[1]
    }

    /// Volatility of variance.
    pub fn sigma(&self) -> Real {
        self.params()[2]
    }

    /// Spot/variance correlation.
    pub fn rho(&self) -> Real {
        self.params()[3]
    }

    /// Initial variance.
    pub fn v0(&self) -> Real {
        self.params()[4]
    }
}

impl CalibratedModel for HestonModel {
    fn parameters(&self) -> &ModelParameters {
        &self.params
    }
}

impl HestonFamilyModel for HestonModel {
    fn process(&self) -> &HestonProcess {
        &self.process
    }

    fn snapshot(&self) -> HestonSnapshot {
        HestonSnapshot::from_values(&self.params(), JumpComponent::None)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ql_math::optimization::Constraint;
    use ql_quotes::SimpleQuote;
    use ql_termstructures::{FlatForward, TermStructureData};
    use ql_time::{Actual365Fixed, Date, NullCalendar};
    use std::sync::Arc;

    pub(crate) fn process(v0: Real, kappa: Real, theta: Real, sigma: Real, rho: Real) -> HestonProcess {
        let today = Date::from_ymd(2002, 7, 5).unwrap();
        let data = || TermStructureData::fixed(today, NullCalendar, Actual365Fixed);
        HestonProcess::new(
            Arc::new(SimpleQuote::new(100.0)),
            Arc::new(FlatForward::new(data(), 0.03)),
            Arc::new(FlatForward::new(data(), 0.01)),
            v0,
            kappa,
            theta,
            sigma,
            rho,
        )
        .unwrap()
    }

    #[test]
    fn parameter_order_and_snapshot() {
        let model = HestonModel::new(process(0.04, 1.5, 0.06, 0.3, -0.7)).unwrap();
        assert_eq!(model.params().as_slice(), &[0.06, 1.5, 0.3, -0.7, 0.04]);
        let snap = model.snapshot();
        assert_eq!((snap.v0, snap.kappa, snap.theta), (0.04, 1.5, 0.06));
        assert_eq!((snap.sigma, snap.rho), (0.3, -0.7));
        assert_eq!(snap.jumps, JumpComponent::None);
    }

    #[test]
    fn updates_flow_into_the_snapshot_and_process() {
        let model = HestonModel::new(process(0.04, 1.5, 0.06, 0.3, -0.7)).unwrap();
        model
            .set_params(&Array::from_slice(&[0.05, 2.0, 0.4, 0.1, 0.03]))
            .unwrap();
        assert_eq!(model.kappa(), 2.0);
        assert_eq!(model.rho(), 0.1);
        let p = model.snapshot().heston_process(model.process()).unwrap();
        assert_eq!((p.v0(), p.theta(), p.sigma()), (0.03, 0.05, 0.4));
        // the base process is left alone
        assert_eq!(model.process().v0(), 0.04);
    }

    #[test]
    fn rejects_infeasible_values() {
        assert!(HestonModel::new(process(0.04, 1.5, 0.06, 0.0, -0.7)).is_err());
        let model = HestonModel::new(process(0.04, 1.5, 0.06, 0.3, -0.7)).unwrap();
        assert!(model
            .set_params(&Array::from_slice(&[0.05, 2.0, 0.4, -1.1, 0.03]))
            .is_err());
        assert!(!model.constraint().test(&Array::from_slice(&[0.05, 2.0, 0.4, 0.0, -0.03])));
    }
}
