use uom::si::{angle::degree, f64::HeatTransfer};

use crate::models::thermal::hx::core::{
    geometry::{Geometry, GeometryClass},
    phase::{RegionPhase, Target},
};

use super::{Correlation, CorrelationError, CorrelationInput, finite};

const NAME: &str = "ChisholmWanniarachchi";

/// Single-phase chevron plate correlation of Chisholm and Wanniarachchi.
///
/// ```text
/// Nu = 0.72 Re^0.59 Pr^0.4 φ^0.41 (β/30°)^0.66
/// f  = 0.8 Re^-0.25 φ^1.25 (β/30°)^3.6
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ChisholmWanniarachchi;

fn chevron(input: &CorrelationInput) -> Result<(f64, f64), CorrelationError> {
    match input.geometry {
        Geometry::CorrugatedChevron { beta, phi, .. } => Ok((beta.get::<degree>() / 30.0, phi)),
        other => Err(CorrelationError::UnsupportedGeometry {
            name: NAME,
            geometry: other.class(),
        }),
    }
}

impl Correlation for ChisholmWanniarachchi {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self, class: GeometryClass, phase: RegionPhase, _target: Target) -> bool {
        class == GeometryClass::CorrugatedChevron && !phase.is_two_phase()
    }

    fn heat_transfer(&self, input: &CorrelationInput) -> Result<HeatTransfer, CorrelationError> {
        let (beta_ratio, phi) = chevron(input)?;
        let re = input.reynolds();
        let pr = input.prandtl();

        let nu = 0.72 * re.powf(0.59) * pr.powf(0.4) * phi.powf(0.41) * beta_ratio.powf(0.66);
        let nu = finite(NAME, nu, || format!("Re = {re}, Pr = {pr}"))?;
        Ok(input.heat_transfer_from_nusselt(nu))
    }

    fn friction_factor(&self, input: &CorrelationInput) -> Result<f64, CorrelationError> {
        let (beta_ratio, phi) = chevron(input)?;
        let re = input.reynolds();

        let f = 0.8 * re.powf(-0.25) * phi.powf(1.25) * beta_ratio.powf(3.6);
        finite(NAME, f, || format!("Re = {re}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::heat_transfer::watt_per_square_meter_kelvin;

    use crate::models::thermal::hx::core::correlation::fixtures;

    #[test]
    fn nusselt_at_known_point() {
        let input = fixtures::single_phase(fixtures::chevron(), 1000.0);
        let h = ChisholmWanniarachchi.heat_transfer(&input).unwrap();

        let pr = input.prandtl();
        let nu = 0.72 * 1000f64.powf(0.59) * pr.powf(0.4) * 1.117f64.powf(0.41) * 2f64.powf(0.66);
        let expected = nu * 0.607 / input.hydraulic_diameter.value;
        assert_relative_eq!(
            h.get::<watt_per_square_meter_kelvin>(),
            expected,
            max_relative = 1e-9
        );
    }

    #[test]
    fn friction_decreases_with_reynolds() {
        let low = fixtures::single_phase(fixtures::chevron(), 500.0);
        let high = fixtures::single_phase(fixtures::chevron(), 5000.0);
        let f_low = ChisholmWanniarachchi.friction_factor(&low).unwrap();
        let f_high = ChisholmWanniarachchi.friction_factor(&high).unwrap();
        assert!(f_low > f_high);
        assert_relative_eq!(f_low / f_high, 10f64.powf(0.25), max_relative = 1e-9);
    }

    #[test]
    fn rejects_other_geometries() {
        assert!(!ChisholmWanniarachchi.supports(
            GeometryClass::PlainPlate,
            RegionPhase::Liquid,
            Target::Heat
        ));
        assert!(!ChisholmWanniarachchi.supports(
            GeometryClass::CorrugatedChevron,
            RegionPhase::TwoPhaseEvaporating,
            Target::Heat
        ));

        let mut input = fixtures::single_phase(fixtures::chevron(), 1000.0);
        input.geometry = Geometry::PlainPlate {
            b: input.hydraulic_diameter,
        };
        assert!(matches!(
            ChisholmWanniarachchi.heat_transfer(&input),
            Err(CorrelationError::UnsupportedGeometry { .. })
        ));
    }
}
