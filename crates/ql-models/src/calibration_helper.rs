//! Calibration helpers: one market quote plus a swappable pricing engine,
//! reduced to a scalar pricing error under the current model parameters.

use ql_core::{errors::Result, Real, Volatility};
use ql_instruments::VanillaEngine;
use ql_math::solvers1d::Brent;
use std::fmt;
use std::sync::Arc;

/// Lowest volatility tried when inverting a model price.
pub const MIN_IMPLIED_VOL: Volatility = 0.001;
/// Highest volatility tried when inverting a model price.
pub const MAX_IMPLIED_VOL: Volatility = 10.0;
const IMPLIED_VOL_ACCURACY: Real = 1.0e-12;
const IMPLIED_VOL_MAX_EVALUATIONS: usize = 5000;

/// How a helper measures the distance between model and market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationErrorType {
    /// `|market − model| / market`.
    #[default]
    RelativePriceError,
    /// `model − market`.
    PriceError,
    /// Black volatility implied by the model price minus the quoted one.
    ImpliedVolError,
}

/// A market quote the model is fitted to.
pub trait CalibrationHelper: fmt::Debug + Send + Sync {
    /// Quoted Black volatility.
    fn volatility(&self) -> Result<Volatility>;

    /// Black price of the wrapped instrument at `volatility`.
    fn black_price(&self, volatility: Volatility) -> Result<Real>;

    /// Price of the wrapped instrument under the attached engine.
    fn model_value(&self) -> Result<Real>;

    /// Rebind the engine used by [`CalibrationHelper::model_value`].
    fn set_pricing_engine(&mut self, engine: Arc<VanillaEngine>);

    /// Error measure.
    fn error_type(&self) -> CalibrationErrorType;

    /// Market price implied by the quoted volatility.
    fn market_value(&self) -> Result<Real> {
        self.black_price(self.volatility()?)
    }

    /// Black volatility in `[min_vol, max_vol]` reproducing `target_value`.
    fn implied_volatility(
        &self,
        target_value: Real,
        accuracy: Real,
        max_evaluations: usize,
        min_vol: Volatility,
        max_vol: Volatility,
    ) -> Result<Volatility> {
        Brent::new(accuracy)
            .with_max_evaluations(max_evaluations)
            .solve(
                |vol| match self.black_price(vol) {
                    Ok(price) => price - target_value,
                    Err(_) => Real::NAN,
                },
                min_vol,
                max_vol,
            )
    }

    /// Distance between model and market under [`Self::error_type`].
    fn calibration_error(&self) -> Result<Real> {
        match self.error_type() {
            CalibrationErrorType::RelativePriceError => {
                let market = self.market_value()?;
                Ok((market - self.model_value()?).abs() / market)
            }
            CalibrationErrorType::PriceError => Ok(self.model_value()? - self.market_value()?),
            CalibrationErrorType::ImpliedVolError => {
                let lower = self.black_price(MIN_IMPLIED_VOL)?;
                let upper = self.black_price(MAX_IMPLIED_VOL)?;
                let model = self.model_value()?;
                let implied = if model <= lower {
                    MIN_IMPLIED_VOL
                } else if model >= upper {
                    MAX_IMPLIED_VOL
                } else {
                    self.implied_volatility(
                        model,
                        IMPLIED_VOL_ACCURACY,
                        IMPLIED_VOL_MAX_EVALUATIONS,
                        MIN_IMPLIED_VOL,
                        MAX_IMPLIED_VOL,
                    )?
                };
                Ok(implied - self.volatility()?)
            }
        }
    }
}

/// Sum of squared percentage errors `Σ (100·errᵢ)²` over `helpers`.
pub fn calibration_error<H>(helpers: &[H]) -> Result<Real>
where
    H: AsRef<dyn CalibrationHelper>,
{
    helpers.iter().try_fold(0.0, |sum, h| {
        let diff = 100.0 * h.as_ref().calibration_error()?;
        Ok(sum + diff * diff)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_core::Error;
    use ql_math::{black_formula, OptionType};

    /// A 1Y at-the-money call on a forward of 100 with a fixed model price.
    #[derive(Debug)]
    struct FixedPrice {
        vol: Volatility,
        model: Real,
        error_type: CalibrationErrorType,
    }

    impl CalibrationHelper for FixedPrice {
        fn volatility(&self) -> Result<Volatility> {
            Ok(self.vol)
        }
        fn black_price(&self, volatility: Volatility) -> Result<Real> {
            black_formula(OptionType::Call, 100.0, 100.0, volatility, 1.0)
        }
        fn model_value(&self) -> Result<Real> {
            if self.model.is_nan() {
                return Err(Error::Runtime("no engine".into()));
            }
            Ok(self.model)
        }
        fn set_pricing_engine(&mut self, _engine: Arc<VanillaEngine>) {}
        fn error_type(&self) -> CalibrationErrorType {
            self.error_type
        }
    }

    fn helper(model: Real, error_type: CalibrationErrorType) -> FixedPrice {
        FixedPrice {
            vol: 0.2,
            model,
            error_type,
        }
    }

    #[test]
    fn relative_and_absolute_price_errors() {
        let market = helper(0.0, CalibrationErrorType::PriceError).market_value().unwrap();
        let h = helper(market * 1.1, CalibrationErrorType::RelativePriceError);
        assert_abs_diff_eq!(h.calibration_error().unwrap(), 0.1, epsilon = 1e-12);
        let h = helper(market * 0.9, CalibrationErrorType::RelativePriceError);
        assert_abs_diff_eq!(h.calibration_error().unwrap(), 0.1, epsilon = 1e-12);
        let h = helper(market - 0.5, CalibrationErrorType::PriceError);
        assert_abs_diff_eq!(h.calibration_error().unwrap(), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn implied_vol_error_inverts_the_model_price() {
        let at_25 = black_formula(OptionType::Call, 100.0, 100.0, 0.25, 1.0).unwrap();
        let h = helper(at_25, CalibrationErrorType::ImpliedVolError);
        assert_abs_diff_eq!(h.calibration_error().unwrap(), 0.05, epsilon = 1e-10);
    }

    #[test]
    fn implied_vol_error_is_clamped_at_the_search_bounds() {
        let h = helper(0.0, CalibrationErrorType::ImpliedVolError);
        assert_abs_diff_eq!(
            h.calibration_error().unwrap(),
            MIN_IMPLIED_VOL - 0.2,
            epsilon = 1e-15
        );
        let h = helper(100.0, CalibrationErrorType::ImpliedVolError);
        assert_abs_diff_eq!(
            h.calibration_error().unwrap(),
            MAX_IMPLIED_VOL - 0.2,
            epsilon = 1e-15
        );
    }

    #[test]
    fn aggregate_is_the_sum_of_squared_percentages() {
        let market = helper(0.0, CalibrationErrorType::PriceError).market_value().unwrap();
        let helpers: Vec<Box<dyn CalibrationHelper>> = vec![
            Box::new(helper(market * 1.01, CalibrationErrorType::RelativePriceError)),
            Box::new(helper(market * 0.98, CalibrationErrorType::RelativePriceError)),
        ];
        assert_abs_diff_eq!(calibration_error(&helpers).unwrap(), 5.0, epsilon = 1e-9);
        let failing: Vec<Box<dyn CalibrationHelper>> =
            vec![Box::new(helper(Real::NAN, CalibrationErrorType::PriceError))];
        assert!(calibration_error(&failing).is_err());
    }
}
