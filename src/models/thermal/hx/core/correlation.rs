//! Heat transfer and friction correlations.
//!
//! A [`Correlation`] maps channel flow conditions to a film coefficient and a
//! Fanning friction factor. Correlations are registered in a
//! [`Config`](super::Config) under `(geometry class, phase, target, side)` keys
//! and shared as `Arc<dyn Correlation>`.

mod akers_deming_crosser;
mod chisholm_wanniarachchi;
mod gnielinski;
mod han_lee_kim;
mod homogeneous_friction;
mod savostin_tikhonov;
mod yan_lin;

use std::fmt::Debug;

use thiserror::Error;
use uom::si::{
    f64::{
        DynamicViscosity, HeatFluxDensity, HeatTransfer, Length, MassDensity,
        SpecificHeatCapacity, ThermalConductivity,
    },
    ratio::ratio,
};

use crate::support::units::{MassFlux, SpecificEnthalpy};

use super::{
    geometry::{Geometry, GeometryClass},
    phase::{RegionPhase, Target},
};

pub use akers_deming_crosser::AkersDemingCrosser;
pub use chisholm_wanniarachchi::ChisholmWanniarachchi;
pub use gnielinski::Gnielinski;
pub use han_lee_kim::HanLeeKim;
pub use homogeneous_friction::HomogeneousFriction;
pub use savostin_tikhonov::SavostinTikhonov;
pub use yan_lin::YanLin;

/// A film coefficient and friction factor model for one kind of channel flow.
pub trait Correlation: Debug + Send + Sync {
    /// Short identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Returns `true` if this correlation can compute `target` for the given
    /// geometry class and phase.
    fn supports(&self, class: GeometryClass, phase: RegionPhase, target: Target) -> bool;

    /// Returns `true` if [`Correlation::heat_transfer`] needs
    /// [`CorrelationInput::heat_flux`].
    fn heat_flux_dependent(&self) -> bool {
        false
    }

    /// Film heat transfer coefficient.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError`] if the target is unsupported or the inputs
    /// are outside the correlation's domain.
    fn heat_transfer(&self, input: &CorrelationInput) -> Result<HeatTransfer, CorrelationError>;

    /// Fanning friction factor.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError`] if the target is unsupported or the inputs
    /// are outside the correlation's domain.
    fn friction_factor(&self, input: &CorrelationInput) -> Result<f64, CorrelationError>;
}

/// Errors returned by correlations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrelationError {
    #[error("{name} does not compute {target}")]
    UnsupportedTarget { name: &'static str, target: Target },

    #[error("{name} requires {what}")]
    MissingInput {
        name: &'static str,
        what: &'static str,
    },

    #[error("{name} does not apply to {geometry:?}")]
    UnsupportedGeometry {
        name: &'static str,
        geometry: GeometryClass,
    },

    #[error("{name} produced a non-finite result from {context}")]
    NonFinite { name: &'static str, context: String },
}

/// Properties of a single-phase fluid film.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmProperties {
    pub density: MassDensity,
    pub cp: SpecificHeatCapacity,
    pub viscosity: DynamicViscosity,
    pub conductivity: ThermalConductivity,
}

impl FilmProperties {
    #[must_use]
    pub fn prandtl(&self) -> f64 {
        (self.cp * self.viscosity / self.conductivity).get::<ratio>()
    }
}

/// Extra properties of a two-phase side.
///
/// The enclosing [`CorrelationInput::film`] holds the saturated liquid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPhaseProperties {
    /// Vapor quality at the region mid state.
    pub quality: f64,
    /// Saturated vapor properties.
    pub vapor: FilmProperties,
    /// Latent heat of vaporization.
    pub latent_heat: SpecificEnthalpy,
}

/// Everything a correlation may use to evaluate one side of one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationInput {
    pub geometry: Geometry,
    pub phase: RegionPhase,
    pub hydraulic_diameter: Length,
    pub mass_flux: MassFlux,
    /// Bulk properties at the mid state, or saturated liquid for two-phase sides.
    pub film: FilmProperties,
    pub two_phase: Option<TwoPhaseProperties>,
    /// Wall heat flux, for heat-flux dependent correlations.
    pub heat_flux: Option<HeatFluxDensity>,
}

impl CorrelationInput {
    /// Reynolds number `G·D_h/μ` of the film.
    #[must_use]
    pub fn reynolds(&self) -> f64 {
        (self.mass_flux * self.hydraulic_diameter / self.film.viscosity).get::<ratio>()
    }

    #[must_use]
    pub fn prandtl(&self) -> f64 {
        self.film.prandtl()
    }

    /// Converts a Nusselt number to a film coefficient `Nu·k/D_h`.
    #[must_use]
    pub fn heat_transfer_from_nusselt(&self, nusselt: f64) -> HeatTransfer {
        nusselt * self.film.conductivity / self.hydraulic_diameter
    }

    /// Two-phase properties, or a [`CorrelationError::MissingInput`] naming `name`.
    pub(crate) fn two_phase_for(
        &self,
        name: &'static str,
    ) -> Result<TwoPhaseProperties, CorrelationError> {
        self.two_phase.ok_or(CorrelationError::MissingInput {
            name,
            what: "two-phase properties",
        })
    }

    /// Equivalent mass flux `G·[(1 − x) + x·(ρ_l/ρ_v)^½]` of a two-phase flow.
    pub(crate) fn equivalent_mass_flux(&self, two_phase: &TwoPhaseProperties) -> MassFlux {
        let x = two_phase.quality;
        let density_ratio = (self.film.density / two_phase.vapor.density).get::<ratio>();
        self.mass_flux * ((1.0 - x) + x * density_ratio.sqrt())
    }
}

/// Returns `value` if finite, else [`CorrelationError::NonFinite`].
pub(crate) fn finite(
    name: &'static str,
    value: f64,
    context: impl FnOnce() -> String,
) -> Result<f64, CorrelationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CorrelationError::NonFinite {
            name,
            context: context(),
        })
    }
}
