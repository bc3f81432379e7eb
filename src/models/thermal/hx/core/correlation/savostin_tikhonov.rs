use uom::si::{angle::radian, f64::HeatTransfer};

use crate::models::thermal::hx::core::{
    geometry::{Geometry, GeometryClass},
    phase::{RegionPhase, Target},
};

use super::{Correlation, CorrelationError, CorrelationInput, finite};

const NAME: &str = "SavostinTikhonov";

/// Single-phase chevron plate correlation of Savostin and Tikhonov.
///
/// Uses the chevron angle `ψ` in radians and switches form at `Re/φ = 600`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SavostinTikhonov;

#[derive(Clone, Copy)]
struct Terms {
    psi: f64,
    phi: f64,
    re: f64,
}

impl Terms {
    fn new(input: &CorrelationInput) -> Result<Self, CorrelationError> {
        let Geometry::CorrugatedChevron { beta, phi, .. } = input.geometry else {
            return Err(CorrelationError::UnsupportedGeometry {
                name: NAME,
                geometry: input.geometry.class(),
            });
        };
        Ok(Self {
            psi: beta.get::<radian>(),
            phi,
            re: input.reynolds(),
        })
    }

    fn is_low(&self) -> bool {
        self.re / self.phi < 600.0
    }
}

impl Correlation for SavostinTikhonov {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supports(&self, class: GeometryClass, phase: RegionPhase, _target: Target) -> bool {
        class == GeometryClass::CorrugatedChevron && !phase.is_two_phase()
    }

    fn heat_transfer(&self, input: &CorrelationInput) -> Result<HeatTransfer, CorrelationError> {
        let terms = Terms::new(input)?;
        let Terms { psi, phi, re } = terms;
        let pr = input.prandtl();

        let nu = if terms.is_low() {
            let a1 = 0.22 * (1.0 + 1.1 * psi.powf(1.5));
            1.26 * (0.62 + 0.38 * (2.3 * psi).cos())
                * phi.powf(1.0 - a1)
                * pr.cbrt()
                * re.powf(a1)
        } else {
            let a2 = 0.53 * (0.58 + 0.42 * (1.87 * psi).cos());
            0.072
                * (0.5 * psi + 0.17 * psi * psi).exp()
                * phi.powf(1.0 - a2)
                * pr.cbrt()
                * re.powf(a2)
        };

        let nu = finite(NAME, nu, || format!("Re = {re}, Pr = {pr}"))?;
        Ok(input.heat_transfer_from_nusselt(nu))
    }

    fn friction_factor(&self, input: &CorrelationInput) -> Result<f64, CorrelationError> {
        let terms = Terms::new(input)?;
        let Terms { psi, phi, re } = terms;

        let f = if terms.is_low() {
            6.25 * (1.0 + 0.95 * psi.powf(1.72)) * phi.powf(1.84) * re.powf(-0.84)
        } else {
            0.95 * (0.62 + 0.36 * psi * psi) * phi.powf(1.84) * re.powf(-0.06)
        };
        finite(NAME, f, || format!("Re = {re}"))
    }
}
