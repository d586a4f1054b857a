//! Bates-type extensions of the Heston model.
//!
//! Each model appends its jump parameters to the Heston vector
//! `[θ, κ, σ, ρ, v0]`:
//!
//! | model | appended parameters |
//! |---|---|
//! | [`BatesModel`] | `ν, δ, λ` |
//! | [`BatesDetJumpModel`] | `ν, δ, λ, κ_λ, θ_λ` |
//! | [`BatesDoubleExpModel`] | `p, ν_down, ν_up, λ` |
//! | [`BatesDoubleExpDetJumpModel`] | `p, ν_down, ν_up, λ, κ_λ, θ_λ` |

use crate::calibrated_model::CalibratedModel;
use crate::heston_model::{heston_parameters, HestonFamilyModel, HestonSnapshot, JumpComponent};
use crate::parameter::{ModelParameters, Parameter};
use ql_core::{errors::Result, Real};
use ql_processes::{BatesProcess, HestonProcess};

fn build(process: &HestonProcess, extra: Vec<(Parameter, Real)>) -> Result<ModelParameters> {
    let (mut parameters, mut values) = heston_parameters(process);
    for (p, v) in extra {
        parameters.push(p);
        values.push(v);
    }
    ModelParameters::new(parameters, &values)
}

/// Heston diffusion with log-normal jumps of constant intensity.
#[derive(Debug)]
pub struct BatesModel {
    process: HestonProcess,
    params: ModelParameters,
}

impl BatesModel {
    /// Model on the diffusion of `process` with jump intensity `lambda`,
    /// mean log-jump `nu` and log-jump volatility `delta`.
    pub fn new(process: HestonProcess, lambda: Real, nu: Real, delta: Real) -> Result<Self> {
        let params = build(
            &process,
            vec![
                (Parameter::free("nu"), nu),
                (Parameter::positive("delta"), delta),
                (Parameter::positive("lambda"), lambda),
            ],
        )?;
        Ok(Self { process, params })
    }

    /// Model starting from all parameters of a Bates process.
    pub fn from_process(process: &BatesProcess) -> Result<Self> {
        Self::new(
            process.heston().clone(),
            process.lambda(),
            process.nu(),
            process.delta(),
        )
    }

    /// Mean log-jump.
    pub fn nu(&self) -> Real {
        self.params()[5]
    }

    /// Log-jump volatility.
    pub fn delta(&self) -> Real {
        self.params()[6]
    }

    /// Jump intensity.
    pub fn lambda(&self) -> Real {
        self.params()[7]
    }
}

impl CalibratedModel for BatesModel {
    fn parameters(&self) -> &ModelParameters {
        &self.params
    }
}

impl HestonFamilyModel for BatesModel {
    fn process(&self) -> &HestonProcess {
        &self.process
    }

    fn snapshot(&self) -> HestonSnapshot {
        let v = self.params();
        HestonSnapshot::from_values(
            &v,
            JumpComponent::LogNormal {
                nu: v[5],
                delta: v[6],
                lambda: v[7],
            },
        )
    }
}

/// Bates model whose jump intensity reverts deterministically from `λ`
/// towards `θ_λ` at speed `κ_λ`.
#[derive(Debug)]
pub struct BatesDetJumpModel {
    process: HestonProcess,
    params: ModelParameters,
}

impl BatesDetJumpModel {
    /// Model on the diffusion of `process`.
    pub fn new(
        process: HestonProcess,
        lambda: Real,
        nu: Real,
        delta: Real,
        kappa_lambda: Real,
        theta_lambda: Real,
    ) -> Result<Self> {
        let params = build(
            &process,
            vec![
                (Parameter::free("nu"), nu),
                (Parameter::positive("delta"), delta),
                (Parameter::positive("lambda"), lambda),
                (Parameter::positive("kappa_lambda"), kappa_lambda),
                (Parameter::positive("theta_lambda"), theta_lambda),
            ],
        )?;
        Ok(Self { process, params })
    }

    /// Mean-reversion speed of the intensity.
    pub fn kappa_lambda(&self) -> Real {
        self.params()[8]
    }

    /// Long-run intensity.
    pub fn theta_lambda(&self) -> Real {
        self.params()[9]
    }
}

impl CalibratedModel for BatesDetJumpModel {
    fn parameters(&self) -> &ModelParameters {
        &self.params
    }
}

impl HestonFamilyModel for BatesDetJumpModel {
    fn process(&self) -> &HestonProcess {
        &self.process
    }

    fn snapshot(&self) -> HestonSnapshot {
        let v = self.params();
        HestonSnapshot::from_values(
            &v,
            JumpComponent::LogNormalDetIntensity {
                nu: v[5],
                delta: v[6],
                lambda: v[7],
                kappa_lambda: v[8],
                theta_lambda: v[9],
            },
        )
    }
}

/// Heston diffusion with double-exponential jumps.
#[derive(Debug)]
pub struct BatesDoubleExpModel {
    process: HestonProcess,
    params: ModelParameters,
}

impl BatesDoubleExpModel {
    /// Model on the diffusion of `process`; upward jumps have mean
    /// `nu_up` and occur with probability `p`, downward jumps have mean
    /// size `nu_down`.
    pub fn new(
        process: HestonProcess,
        lambda: Real,
        nu_up: Real,
        nu_down: Real,
        p: Real,
    ) -> Result<Self> {
        let params = build(&process, double_exp_parameters(lambda, nu_up, nu_down, p))?;
        Ok(Self { process, params })
    }

    /// Probability of an upward jump.
    pub fn p(&self) -> Real {
        self.params()[5]
    }

    /// Mean downward log-jump size.
    pub fn nu_down(&self) -> Real {
        self.params()[6]
    }

    /// Mean upward log-jump.
    pub fn nu_up(&self) -> Real {
        self.params()[7]
    }

    /// Jump intensity.
    pub fn lambda(&self) -> Real {
        self.params()[8]
    }
}

fn double_exp_parameters(
    lambda: Real,
    nu_up: Real,
    nu_down: Real,
    p: Real,
) -> Vec<(Parameter, Real)> {
    vec![
        (Parameter::bounded("p", 0.0, 1.0), p),
        (Parameter::positive("nu_down"), nu_down),
        (Parameter::positive("nu_up"), nu_up),
        (Parameter::positive("lambda"), lambda),
    ]
}

impl CalibratedModel for BatesDoubleExpModel {
    fn parameters(&self) -> &ModelParameters {
        &self.params
    }
}

impl HestonFamilyModel for BatesDoubleExpModel {
    fn process(&self) -> &HestonProcess {
        &self.process
    }

    fn snapshot(&self) -> HestonSnapshot {
        let v = self.params();
        HestonSnapshot::from_values(
            &v,
            JumpComponent::DoubleExponential {
                p: v[5],
                nu_down: v[6],
                nu_up: v[7],
                lambda: v[8],
            },
        )
    }
}

/// Double-exponential jumps with deterministic intensity.
#[derive(Debug)]
pub struct BatesDoubleExpDetJumpModel {
    process: HestonProcess,
    params: ModelParameters,
}

impl BatesDoubleExpDetJumpModel {
    /// Model on the diffusion of `process`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        process: HestonProcess,
        lambda: Real,
        nu_up: Real,
        nu_down: Real,
        p: Real,
        kappa_lambda: Real,
        theta_lambda: Real,
    ) -> Result<Self> {
        let mut extra = double_exp_parameters(lambda, nu_up, nu_down, p);
        extra.push((Parameter::positive("kappa_lambda"), kappa_lambda));
        extra.push((Parameter::positive("theta_lambda"), theta_lambda));
        let params = build(&process, extra)?;
        Ok(Self { process, params })
    }
}

impl CalibratedModel for BatesDoubleExpDetJumpModel {
    fn parameters(&self) -> &ModelParameters {
        &self.params
    }
}

impl HestonFamilyModel for BatesDoubleExpDetJumpModel {
    fn process(&self) -> &HestonProcess {
        &self.process
    }

    fn snapshot(&self) -> HestonSnapshot {
        let v = self.params();
        HestonSnapshot::from_values(
            &v,
            JumpComponent::DoubleExponentialDetIntensity {
                p: v[5],
                nu_down: v[6],
                nu_up: v[7],
                lambda: v[8],
                kappa_lambda: v[9],
                theta_lambda: v[10],
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heston_model::tests::process;
    use ql_math::Array;

    #[test]
    fn bates_parameter_layout() {
        let model = BatesModel::new(process(0.04, 1.0, 0.04, 0.5, -0.5), 1.1, -0.13, 0.17).unwrap();
        assert_eq!(model.params().size(), 8);
        assert_eq!((model.nu(), model.delta(), model.lambda()), (-0.13, 0.17, 1.1));
        assert_eq!(
            model.snapshot().jumps,
            JumpComponent::LogNormal {
                lambda: 1.1,
                nu: -0.13,
                delta: 0.17
            }
        );
    }

    #[test]
    fn from_process_keeps_every_parameter() {
        let bates = BatesProcess::new(process(0.04, 1.0, 0.05, 0.5, -0.5), 2.0, -0.2, 0.25).unwrap();
        let model = BatesModel::from_process(&bates).unwrap();
        assert_eq!(
            model.params().as_slice(),
            &[0.05, 1.0, 0.5, -0.5, 0.04, -0.2, 0.25, 2.0]
        );
    }

    #[test]
    fn det_jump_layout() {
        let model =
            BatesDetJumpModel::new(process(0.04, 1.0, 0.04, 0.5, 0.0), 1.0, -0.1, 0.1, 1.0, 0.1)
                .unwrap();
        assert_eq!(model.params().size(), 10);
        assert_eq!((model.kappa_lambda(), model.theta_lambda()), (1.0, 0.1));
        assert!(matches!(
            model.snapshot().jumps,
            JumpComponent::LogNormalDetIntensity { lambda, .. } if lambda == 1.0
        ));
    }

    #[test]
    fn double_exp_layout_and_bounds() {
        let model =
            BatesDoubleExpModel::new(process(0.04, 1.0, 0.04, 0.5, 0.0), 1.0, 0.1, 0.2, 0.5)
                .unwrap();
        assert_eq!(
            model.params().as_slice(),
            &[0.04, 1.0, 0.5, 0.0, 0.04, 0.5, 0.2, 0.1, 1.0]
        );
        assert_eq!((model.p(), model.nu_down(), model.nu_up(), model.lambda()), (0.5, 0.2, 0.1, 1.0));
        let mut v = model.params();
        v[5] = 1.2;
        assert!(model.set_params(&v).is_err());
        assert!(
            BatesDoubleExpModel::new(process(0.04, 1.0, 0.04, 0.5, 0.0), 1.0, -0.1, 0.2, 0.5)
                .is_err()
        );
    }

    #[test]
    fn double_exp_det_jump_layout() {
        let model = BatesDoubleExpDetJumpModel::new(
            process(0.04, 1.0, 0.04, 0.5, 0.0),
            1.0,
            0.1,
            0.1,
            0.5,
            1.0,
            0.1,
        )
        .unwrap();
        let v = model.params();
        assert_eq!(v.size(), 11);
        assert_eq!((v[9], v[10]), (1.0, 0.1));
        model.set_params(&Array::from_slice(&[
            0.04, 1.0, 0.5, 0.0, 0.04, 0.3, 0.1, 0.1, 2.0, 1.0, 0.1,
        ]))
        .unwrap();
        assert!(matches!(
            model.snapshot().jumps,
            JumpComponent::DoubleExponentialDetIntensity { p, lambda, .. } if p == 0.3 && lambda == 2.0
        ));
    }
}
