use uom::si::{f64::HeatTransfer, ratio::ratio};

use crate::models::thermal::hx::core::{
    geometry::GeometryClass,
    phase::{RegionPhase, Target},
};

use super::{Correlation, CorrelationError, CorrelationInput, finite};

const NAME: &str = "AkersDemingCrosser";

/// Condensation heat transfer in plain channels, after Akers, Deming and Crosser.
///
/// ```text
/// Nu = 5.03 Re_eq^⅓ Pr_l^⅓       Re_eq < 50 000
/// Nu = 0.0265 Re_eq^0.8 Pr_l^⅓   otherwise
/// ```
///
/// Only computes heat transfer; pair it with a friction correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AkersDemingCrosser;

impl Correlation for AkersDemingCrosser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self, class: GeometryClass, phase: RegionPhase, target: Target) -> bool {
        class != GeometryClass::CorrugatedChevron
            && phase == RegionPhase::TwoPhaseCondensing
            && target == Target::Heat
    }

    fn heat_transfer(&self, input: &CorrelationInput) -> Result<HeatTransfer, CorrelationError> {
        let two_phase = input.two_phase_for(NAME)?;
        let g_ratio = (input.equivalent_mass_flux(&two_phase) / input.mass_flux).get::<ratio>();
        let re_eq = input.reynolds() * g_ratio;
        let pr = input.prandtl();

        let nu = if re_eq < 50_000.0 {
            5.03 * re_eq.cbrt() * pr.cbrt()
        } else {
            0.0265 * re_eq.powf(0.8) * pr.cbrt()
        };
        let nu = finite(NAME, nu, || format!("Re_eq = {re_eq}, Pr = {pr}"))?;
        Ok(input.heat_transfer_from_nusselt(nu))
    }

    fn friction_factor(&self, _input: &CorrelationInput) -> Result<f64, CorrelationError> {
        Err(CorrelationError::UnsupportedTarget {
            name: NAME,
            target: Target::Friction,
        })
    }
}
