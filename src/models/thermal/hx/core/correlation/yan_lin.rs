use uom::si::{
    f64::HeatTransfer, heat_flux_density::watt_per_square_meter, ratio::ratio,
};

use crate::models::thermal::hx::core::{
    geometry::GeometryClass,
    phase::{RegionPhase, Target},
};

use super::{Correlation, CorrelationError, CorrelationInput, finite};

const NAME: &str = "YanLin";

/// Evaporation in chevron plate channels, after Yan and Lin.
///
/// Heat transfer depends on the boiling number, so the evaluator supplies the
/// wall heat flux and iterates it to a fixed point.
///
/// ```text
/// Nu = 1.926 Pr_l^⅓ Bo_eq^0.3 Re_l^0.5 [(1 − x) + x (ρ_l/ρ_v)^0.5]
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct YanLin;

impl Correlation for YanLin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self, class: GeometryClass, phase: RegionPhase, _target: Target) -> bool {
        class == GeometryClass::CorrugatedChevron && phase == RegionPhase::TwoPhaseEvaporating
    }

    fn heat_flux_dependent(&self) -> bool {
        true
    }

    fn heat_transfer(&self, input: &CorrelationInput) -> Result<HeatTransfer, CorrelationError> {
        let two_phase = input.two_phase_for(NAME)?;
        let heat_flux = input.heat_flux.ok_or(CorrelationError::MissingInput {
            name: NAME,
            what: "wall heat flux",
        })?;

        let g_eq = input.equivalent_mass_flux(&two_phase);
        let boiling = (heat_flux.abs() / (g_eq * two_phase.latent_heat)).get::<ratio>();
        let re_l = input.reynolds();
        let pr_l = input.prandtl();
        let enhancement = (g_eq / input.mass_flux).get::<ratio>();

        let nu = 1.926 * pr_l.cbrt() * boiling.powf(0.3) * re_l.sqrt() * enhancement;
        let nu = finite(NAME, nu, || {
            format!(
                "Re_l = {re_l}, Bo_eq = {boiling}, q'' = {} W/m2",
                heat_flux.get::<watt_per_square_meter>()
            )
        })?;
        Ok(input.heat_transfer_from_nusselt(nu))
    }

    fn friction_factor(&self, input: &CorrelationInput) -> Result<f64, CorrelationError> {
        let two_phase = input.two_phase_for(NAME)?;
        let re_l = input.reynolds();
        let re_eq =
            re_l * (input.equivalent_mass_flux(&two_phase) / input.mass_flux).get::<ratio>();

        let f = if re_eq < 6000.0 {
            6.947e5 * re_eq.powf(-1.109) * re_l.powf(-0.5)
        } else {
            31.21 * re_eq.powf(0.04557) * re_l.powf(-0.5)
        };
        finite(NAME, f, || format!("Re_l = {re_l}, Re_eq = {re_eq}"))
    }
}
