//! Bisection adapters for sizing one unit attribute.

use std::convert::Infallible;

use tracing::trace;
use twine_core::{EquationProblem, Model};

use crate::models::thermal::hx::core::{
    HxUnit, SizeAttr, UnitError, UnitPerformance, traits::HxThermoModel,
};

/// Evaluates a copy of the unit with the sized attribute set to the input.
///
/// The unit itself is never modified.
pub(super) struct SizingModel<'a, Wf, Sf, ThermoWf, ThermoSf> {
    unit: &'a HxUnit<Wf, Sf>,
    attr: SizeAttr,
    thermo_wf: &'a ThermoWf,
    thermo_sf: &'a ThermoSf,
}

impl<'a, Wf, Sf, ThermoWf, ThermoSf> SizingModel<'a, Wf, Sf, ThermoWf, ThermoSf> {
    pub(super) fn new(
        unit: &'a HxUnit<Wf, Sf>,
        attr: SizeAttr,
        thermo_wf: &'a ThermoWf,
        thermo_sf: &'a ThermoSf,
    ) -> Self {
        Self {
            unit,
            attr,
            thermo_wf,
            thermo_sf,
        }
    }
}

impl<Wf, Sf, ThermoWf, ThermoSf> Model for SizingModel<'_, Wf, Sf, ThermoWf, ThermoSf>
where
    Wf: Clone,
    Sf: Clone,
    ThermoWf: HxThermoModel<Wf>,
    ThermoSf: HxThermoModel<Sf>,
{
    type Input = f64;
    type Output = UnitPerformance;
    type Error = UnitError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let performance = self
            .unit
            .with_attribute(self.attr, *input)?
            .evaluate(self.thermo_wf, self.thermo_sf)?;
        trace!(
            attr = %self.attr,
            x = *input,
            residual = performance.relative_residual,
            "sizing residual"
        );
        Ok(performance)
    }
}

/// Drives the relative area residual `(A_req - A) / A` to zero.
pub(super) struct SizingProblem;

impl EquationProblem<1> for SizingProblem {
    type Input = f64;
    type Output = UnitPerformance;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.relative_residual])
    }
}
