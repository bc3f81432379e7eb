//! Rating: the outlet state a unit of fixed construction delivers.
//!
//! The unknown is the working fluid outlet enthalpy. Each trial sets both
//! outlets and evaluates the area residual, so the root is the outlet at
//! which the unit is exactly large enough for its duty. The secondary outlet
//! follows from the energy balance at the unit effectiveness. Both outlets
//! keep their inlet pressure.

use tracing::{debug, trace};
use twine_core::Model;
use twine_solvers::equation::bisection;
use uom::si::{available_energy::joule_per_kilogram, f64::Power};

use crate::{
    models::thermal::hx::core::{
        ConfigError, FlowState, HxUnit, UnitError, UnitPerformance, UnitUpdate,
        traits::HxThermoModel,
    },
    support::units::SpecificEnthalpy,
};

use super::{SizingError, bisect};

impl<Wf: Clone, Sf: Clone> HxUnit<Wf, Sf> {
    /// Solves for the outlet flows the unit delivers from its inlet flows,
    /// commits them, and returns the performance at them.
    ///
    /// `bounds` bracket the working fluid outlet enthalpy in J/kg. Neither
    /// bound may produce a temperature crossover.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFlowState`] if an inlet is not set,
    /// [`ConfigError::InvalidBounds`] unless the bounds are finite and
    /// increasing, and otherwise the errors of [`HxUnit::size_attr`]. The unit
    /// is unchanged on error.
    pub fn rate(
        &mut self,
        bounds: [f64; 2],
        thermo_wf: &impl HxThermoModel<Wf>,
        thermo_sf: &impl HxThermoModel<Sf>,
    ) -> Result<UnitPerformance, SizingError> {
        let [lo, hi] = bounds;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(ConfigError::InvalidBounds { lo, hi }.into());
        }

        let model = RatingModel::new(self, thermo_wf, thermo_sf)?;
        // Enthalpy has no natural scale, so convergence is judged on the residual.
        let config = bisection::Config {
            x_abs_tol: 0.0,
            x_rel_tol: f64::EPSILON,
            ..self.config().bisection()
        };
        let (h_out, performance) = bisect(&model, &config, &"wf outlet enthalpy", lo, hi)?;

        let rated = model.with_outlets(h_out)?;
        *self = rated;
        debug!(
            h_out,
            duty = performance.duty.value,
            residual = performance.relative_residual,
            "rated unit"
        );
        Ok(performance)
    }
}

/// Evaluates copies of the unit with outlets set from a trial working fluid
/// outlet enthalpy.
struct RatingModel<'a, Wf, Sf, ThermoWf, ThermoSf> {
    unit: &'a HxUnit<Wf, Sf>,
    wf_in: &'a FlowState<Wf>,
    sf_in: &'a FlowState<Sf>,
    thermo_wf: &'a ThermoWf,
    thermo_sf: &'a ThermoSf,
}

impl<'a, Wf, Sf, ThermoWf, ThermoSf> RatingModel<'a, Wf, Sf, ThermoWf, ThermoSf>
where
    Wf: Clone,
    Sf: Clone,
    ThermoWf: HxThermoModel<Wf>,
    ThermoSf: HxThermoModel<Sf>,
{
    fn new(
        unit: &'a HxUnit<Wf, Sf>,
        thermo_wf: &'a ThermoWf,
        thermo_sf: &'a ThermoSf,
    ) -> Result<Self, ConfigError> {
        let missing = |which| ConfigError::MissingFlowState { which };
        Ok(Self {
            unit,
            wf_in: unit.flow_in_wf().ok_or_else(|| missing("flow_in_wf"))?,
            sf_in: unit.flow_in_sf().ok_or_else(|| missing("flow_in_sf"))?,
            thermo_wf,
            thermo_sf,
        })
    }

    /// A validated copy of the unit with both outlets set for `h_wf_out`.
    fn with_outlets(&self, h_wf_out: f64) -> Result<HxUnit<Wf, Sf>, UnitError> {
        let (wf_in, sf_in) = (self.wf_in, self.sf_in);
        let h_wf_out = SpecificEnthalpy::new::<joule_per_kilogram>(h_wf_out);

        let q_wf: Power = wf_in.mass_rate() * (h_wf_out - wf_in.enthalpy());
        let effectiveness = self.unit.effectiveness();
        let q_sf = if q_wf.value < 0.0 {
            -effectiveness * q_wf
        } else {
            -q_wf / effectiveness
        };
        let h_sf_out = sf_in.enthalpy() + q_sf / sf_in.mass_rate();

        let wf_out = FlowState::at(
            self.thermo_wf,
            wf_in.fluid().clone(),
            wf_in.pressure(),
            h_wf_out,
            wf_in.constrained_mass_rate(),
        )
        .map_err(|err| UnitError::thermo_failed("wf outlet state", err))?;
        let sf_out = FlowState::at(
            self.thermo_sf,
            sf_in.fluid().clone(),
            sf_in.pressure(),
            h_sf_out,
            sf_in.constrained_mass_rate(),
        )
        .map_err(|err| UnitError::thermo_failed("sf outlet state", err))?;

        let mut unit = self.unit.clone();
        unit.update(UnitUpdate::new().flow_out_wf(wf_out).flow_out_sf(sf_out))?;
        Ok(unit)
    }
}

impl<Wf, Sf, ThermoWf, ThermoSf> Model for RatingModel<'_, Wf, Sf, ThermoWf, ThermoSf>
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
            .with_outlets(*input)?
            .evaluate(self.thermo_wf, self.thermo_sf)?;
        trace!(
            h_wf_out = *input,
            residual = performance.relative_residual,
            "rating residual"
        );
        Ok(performance)
    }
}
