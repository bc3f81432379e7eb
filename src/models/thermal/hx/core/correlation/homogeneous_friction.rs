use uom::si::{f64::HeatTransfer, ratio::ratio};

use crate::models::thermal::hx::core::{
    geometry::GeometryClass,
    phase::{RegionPhase, Target},
};

use super::{Correlation, CorrelationError, CorrelationInput, finite};

const NAME: &str = "HomogeneousFriction";

/// Two-phase friction from a homogeneous flow model.
///
/// Uses the McAdams mixture viscosity `1/μ = x/μ_v + (1 − x)/μ_l` with the
/// laminar `16/Re` or Blasius `0.079 Re^-0.25` Fanning factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomogeneousFriction;

impl Correlation for HomogeneousFriction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self, _class: GeometryClass, phase: RegionPhase, target: Target) -> bool {
        phase.is_two_phase() && target == Target::Friction
    }

    fn heat_transfer(&self, _input: &CorrelationInput) -> Result<HeatTransfer, CorrelationError> {
        Err(CorrelationError::UnsupportedTarget {
            name: NAME,
            target: Target::Heat,
        })
    }

    fn friction_factor(&self, input: &CorrelationInput) -> Result<f64, CorrelationError> {
        let two_phase = input.two_phase_for(NAME)?;
        let x = two_phase.quality;
        let fluidity = x / two_phase.vapor.viscosity + (1.0 - x) / input.film.viscosity;
        let re = (input.mass_flux * input.hydraulic_diameter * fluidity).get::<ratio>();

        let f = if re < 2000.0 {
            16.0 / re
        } else {
            0.079 * re.powf(-0.25)
        };
        finite(NAME, f, || format!("Re_tp = {re}"))
    }
}
