use uom::si::f64::HeatTransfer;

use crate::models::thermal::hx::core::{
    geometry::GeometryClass,
    phase::{RegionPhase, Target},
};

use super::{Correlation, CorrelationError, CorrelationInput, finite};

const NAME: &str = "Gnielinski";

const RE_LAMINAR: f64 = 2300.0;
const RE_TURBULENT: f64 = 3000.0;

/// Single-phase flow in plain plate channels and tubes.
///
/// Fully developed laminar values below `Re = 2300`, Gnielinski with the
/// Petukhov friction factor above `Re = 3000`, and a linear blend in between.
/// Laminar plate channels use the parallel-plate limits `Nu = 7.54`,
/// `f = 24/Re`; tubes use `Nu = 3.66`, `f = 16/Re`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gnielinski;

/// Laminar `(Nu, f)` for the input's geometry.
fn laminar(input: &CorrelationInput, re: f64) -> (f64, f64) {
    if input.geometry.class().is_plate() {
        (7.54, 24.0 / re)
    } else {
        (3.66, 16.0 / re)
    }
}

/// Turbulent `(Nu, f)` from Gnielinski and Petukhov.
fn turbulent(re: f64, pr: f64) -> (f64, f64) {
    let darcy = (0.79 * re.ln() - 1.64).powi(-2);
    let nu = (darcy / 8.0) * (re - 1000.0) * pr
        / (1.0 + 12.7 * (darcy / 8.0).sqrt() * (pr.powf(2.0 / 3.0) - 1.0));
    (nu, darcy / 4.0)
}

fn evaluate(input: &CorrelationInput) -> Result<(f64, f64), CorrelationError> {
    if input.geometry.class() == GeometryClass::CorrugatedChevron {
        return Err(CorrelationError::UnsupportedGeometry {
            name: NAME,
            geometry: GeometryClass::CorrugatedChevron,
        });
    }

    let re = input.reynolds();
    let pr = input.prandtl();

    let (nu, f) = if re < RE_LAMINAR {
        laminar(input, re)
    } else if re >= RE_TURBULENT {
        turbulent(re, pr)
    } else {
        let w = (re - RE_LAMINAR) / (RE_TURBULENT - RE_LAMINAR);
        let (nu_lam, f_lam) = laminar(input, RE_LAMINAR);
        let (nu_turb, f_turb) = turbulent(RE_TURBULENT, pr);
        (
            nu_lam + w * (nu_turb - nu_lam),
            f_lam + w * (f_turb - f_lam),
        )
    };

    let context = || format!("Re = {re}, Pr = {pr}");
    Ok((finite(NAME, nu, context)?, finite(NAME, f, context)?))
}

impl Correlation for Gnielinski {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self, class: GeometryClass, phase: RegionPhase, _target: Target) -> bool {
        class != GeometryClass::CorrugatedChevron && !phase.is_two_phase()
    }

    fn heat_transfer(&self, input: &CorrelationInput) -> Result<HeatTransfer, CorrelationError> {
        let (nu, _) = evaluate(input)?;
        Ok(input.heat_transfer_from_nusselt(nu))
    }

    fn friction_factor(&self, input: &CorrelationInput) -> Result<f64, CorrelationError> {
        evaluate(input).map(|(_, f)| f)
    }
}
