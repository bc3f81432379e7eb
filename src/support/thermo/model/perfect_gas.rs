//! Calorically perfect gas model.
//!
//! An air-side stream is modeled with the ideal gas equation of state,
//! constant `cp`, and constant transport properties:
//!
//! ```text
//! p = ρ · R · T
//! h = cp · (T − T_ref)
//! ```
//!
//! The gas never condenses.

use std::{convert::Infallible, marker::PhantomData};

use thiserror::Error;
use uom::si::{
    f64::{
        DynamicViscosity, MassDensity, Pressure, SpecificHeatCapacity, ThermalConductivity,
        ThermodynamicTemperature,
    },
    thermodynamic_temperature::degree_celsius,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{
        Phase, PropertyError, Saturation, State,
        capability::{
            HasCp, HasEnthalpy, HasPressure, HasSaturation, HasThermalConductivity, HasViscosity,
            StateFrom, ThermoModel,
        },
    },
    units::{SpecificEnthalpy, SpecificGasConstant, TemperatureDifference},
};

use super::ConstantTransport;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GasConstantsError {
    #[error("gas {property} must be strictly positive")]
    NotPositive { property: &'static str },
    /// `cv = cp − R` would not be positive.
    #[error("cp must exceed the gas constant")]
    CpBelowGasConstant,
}

/// Fixed properties of a perfect gas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasConstants {
    pub gas_constant: SpecificGasConstant,
    pub cp: SpecificHeatCapacity,
    pub transport: ConstantTransport,
    /// Temperature at which enthalpy is zero.
    pub reference_temperature: ThermodynamicTemperature,
}

impl GasConstants {
    /// Constants with enthalpy referenced to 0 °C.
    #[must_use]
    pub fn new(
        gas_constant: SpecificGasConstant,
        cp: SpecificHeatCapacity,
        viscosity: DynamicViscosity,
        conductivity: ThermalConductivity,
    ) -> Self {
        Self {
            gas_constant,
            cp,
            transport: ConstantTransport {
                viscosity,
                conductivity,
            },
            reference_temperature: ThermodynamicTemperature::new::<degree_celsius>(0.0),
        }
    }

    fn validate(&self) -> Result<(), GasConstantsError> {
        let checks = [
            ("gas constant", self.gas_constant.value),
            ("cp", self.cp.value),
            ("viscosity", self.transport.viscosity.value),
            ("conductivity", self.transport.conductivity.value),
            ("reference temperature", self.reference_temperature.value),
        ];
        if let Some((property, _)) = checks
            .into_iter()
            .find(|(_, value)| StrictlyPositive::check(value).is_err())
        {
            return Err(GasConstantsError::NotPositive { property });
        }
        if self.cp.value <= self.gas_constant.value {
            return Err(GasConstantsError::CpBelowGasConstant);
        }
        Ok(())
    }
}

/// A gas usable with the [`PerfectGas`] model.
pub trait PerfectGasFluid {
    fn constants() -> GasConstants;
}

/// Ideal gas with constant heat capacity and transport properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGas<Fluid> {
    constants: GasConstants,
    _fluid: PhantomData<Fluid>,
}

impl<Fluid> ThermoModel for PerfectGas<Fluid> {
    type Fluid = Fluid;
}

impl<Fluid> PerfectGas<Fluid> {
    /// Builds the model from the constants `Fluid` provides.
    ///
    /// # Errors
    ///
    /// Returns [`GasConstantsError`] if a constant is not positive or if
    /// `cp ≤ R`.
    pub fn new() -> Result<Self, GasConstantsError>
    where
        Fluid: PerfectGasFluid,
    {
        Self::with_constants(Fluid::constants())
    }

    /// Builds the model from explicit constants.
    ///
    /// # Errors
    ///
    /// Returns [`GasConstantsError`] if a constant is not positive or if
    /// `cp ≤ R`.
    pub fn with_constants(constants: GasConstants) -> Result<Self, GasConstantsError> {
        constants.validate()?;
        Ok(Self {
            constants,
            _fluid: PhantomData,
        })
    }

    #[must_use]
    pub fn constants(&self) -> &GasConstants {
        &self.constants
    }

    fn state(
        &self,
        fluid: Fluid,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> State<Fluid> {
        let density: MassDensity = pressure / (self.constants.gas_constant * temperature);
        State::new(temperature, density, fluid)
    }
}

impl<Fluid> HasPressure for PerfectGas<Fluid> {
    fn pressure(&self, state: &State<Fluid>) -> Result<Pressure, PropertyError> {
        Ok(state.density * self.constants.gas_constant * state.temperature)
    }
}

impl<Fluid> HasEnthalpy for PerfectGas<Fluid> {
    fn enthalpy(&self, state: &State<Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        let c = &self.constants;
        Ok(c.cp * state.temperature.minus(c.reference_temperature))
    }
}

impl<Fluid> HasCp for PerfectGas<Fluid> {
    fn cp(&self, _state: &State<Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(self.constants.cp)
    }
}

impl<Fluid> HasViscosity for PerfectGas<Fluid> {
    fn viscosity(&self, _state: &State<Fluid>) -> Result<DynamicViscosity, PropertyError> {
        Ok(self.constants.transport.viscosity)
    }
}

impl<Fluid> HasThermalConductivity for PerfectGas<Fluid> {
    fn thermal_conductivity(
        &self,
        _state: &State<Fluid>,
    ) -> Result<ThermalConductivity, PropertyError> {
        Ok(self.constants.transport.conductivity)
    }
}

impl<Fluid> HasSaturation for PerfectGas<Fluid> {
    fn saturation(
        &self,
        _fluid: &Fluid,
        _pressure: Pressure,
    ) -> Result<Saturation<Fluid>, PropertyError> {
        Ok(Saturation::SinglePhase(Phase::Vapor))
    }
}

impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, Pressure)> for PerfectGas<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (Fluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Fluid>, Self::Error> {
        Ok(self.state(fluid, temperature, pressure))
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEnthalpy)> for PerfectGas<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, pressure, enthalpy): (Fluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<Fluid>, Self::Error> {
        let c = &self.constants;
        let temperature = c.reference_temperature + enthalpy / c.cp;
        Ok(self.state(fluid, temperature, pressure))
    }
}
