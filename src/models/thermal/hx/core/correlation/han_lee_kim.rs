use std::f64::consts::FRAC_PI_2;

use uom::si::{angle::radian, f64::HeatTransfer, ratio::ratio};

use crate::models::thermal::hx::core::{
    geometry::{Geometry, GeometryClass},
    phase::{RegionPhase, Target},
};

use super::{Correlation, CorrelationError, CorrelationInput, finite};

const NAME: &str = "HanLeeKim";

/// Condensation in chevron plate channels, after Han, Lee and Kim.
///
/// Coefficients depend on the corrugation pitch over hydraulic diameter and on
/// `π/2 − β`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HanLeeKim;

/// Returns `(p/D_h, π/2 − β)`.
fn shape(input: &CorrelationInput) -> Result<(f64, f64), CorrelationError> {
    match input.geometry {
        Geometry::CorrugatedChevron { beta, pitch, .. } => Ok((
            (pitch / input.hydraulic_diameter).get::<ratio>(),
            FRAC_PI_2 - beta.get::<radian>(),
        )),
        other => Err(CorrelationError::UnsupportedGeometry {
            name: NAME,
            geometry: other.class(),
        }),
    }
}

fn equivalent_reynolds(input: &CorrelationInput) -> Result<f64, CorrelationError> {
    let two_phase = input.two_phase_for(NAME)?;
    Ok(input.reynolds() * (input.equivalent_mass_flux(&two_phase) / input.mass_flux).get::<ratio>())
}

impl Correlation for HanLeeKim {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self, class: GeometryClass, phase: RegionPhase, _target: Target) -> bool {
        class == GeometryClass::CorrugatedChevron && phase == RegionPhase::TwoPhaseCondensing
    }

    fn heat_transfer(&self, input: &CorrelationInput) -> Result<HeatTransfer, CorrelationError> {
        let (pitch_ratio, angle) = shape(input)?;
        let re_eq = equivalent_reynolds(input)?;
        let pr = input.prandtl();

        let ge1 = 11.22 * pitch_ratio.powf(-2.83) * angle.powf(-4.5);
        let ge2 = 0.35 * pitch_ratio.powf(0.23) * angle.powf(1.48);
        let nu = ge1 * re_eq.powf(ge2) * pr.cbrt();

        let nu = finite(NAME, nu, || format!("Re_eq = {re_eq}, Pr = {pr}"))?;
        Ok(input.heat_transfer_from_nusselt(nu))
    }

    fn friction_factor(&self, input: &CorrelationInput) -> Result<f64, CorrelationError> {
        let (pitch_ratio, angle) = shape(input)?;
        let re_eq = equivalent_reynolds(input)?;

        let ge3 = 3521.1 * pitch_ratio.powf(4.17) * angle.powf(-7.75);
        let ge4 = -1.024 * pitch_ratio.powf(0.0925) * angle.powf(-1.3);
        finite(NAME, ge3 * re_eq.powf(ge4), || format!("Re_eq = {re_eq}"))
    }
}
