use uom::si::f64::{DynamicViscosity, ThermalConductivity};

use crate::support::thermo::{PropertyError, State};

use super::ThermoModel;

pub trait HasViscosity: ThermoModel {
    /// Returns the dynamic viscosity for the given state.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the viscosity cannot be calculated,
    /// including inside the vapor dome where it is undefined.
    fn viscosity(&self, state: &State<Self::Fluid>) -> Result<DynamicViscosity, PropertyError>;
}

pub trait HasThermalConductivity: ThermoModel {
    /// Returns the thermal conductivity for the given state.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the conductivity cannot be calculated.
    fn thermal_conductivity(
        &self,
        state: &State<Self::Fluid>,
    ) -> Result<ThermalConductivity, PropertyError>;
}
