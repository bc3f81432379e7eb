//! Constant-property liquid model.
//!
//! Cooling water, brines, and thermal oils on the secondary side of a unit
//! rarely see more than a few tens of kelvin of temperature change, so they
//! are modeled with fixed density, heat capacity, viscosity, and
//! conductivity. Enthalpy is linear in temperature and zero at the reference
//! temperature:
//!
//! ```text
//! h = cp · (T − T_ref)
//! ```
//!
//! Pressure has no effect and the liquid never boils. Working fluids that
//! change phase need [`super::CoolProp`] (when enabled) instead.

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
            HasCp, HasEnthalpy, HasSaturation, HasThermalConductivity, HasViscosity, StateFrom,
            ThermoModel,
        },
    },
    units::{SpecificEnthalpy, TemperatureDifference},
};

use super::ConstantTransport;

/// A liquid constant that is zero, negative, or not a number.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("liquid {property} must be strictly positive")]
pub struct LiquidConstantsError {
    pub property: &'static str,
}

/// Fixed properties of a liquid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidConstants {
    pub cp: SpecificHeatCapacity,
    pub density: MassDensity,
    pub transport: ConstantTransport,
    /// Temperature at which enthalpy is zero.
    pub reference_temperature: ThermodynamicTemperature,
}

impl LiquidConstants {
    /// Constants with enthalpy referenced to 25 °C.
    #[must_use]
    pub fn new(
        cp: SpecificHeatCapacity,
        density: MassDensity,
        viscosity: DynamicViscosity,
        conductivity: ThermalConductivity,
    ) -> Self {
        Self {
            cp,
            density,
            transport: ConstantTransport {
                viscosity,
                conductivity,
            },
            reference_temperature: ThermodynamicTemperature::new::<degree_celsius>(25.0),
        }
    }

    fn validate(&self) -> Result<(), LiquidConstantsError> {
        let checks = [
            ("cp", self.cp.value),
            ("density", self.density.value),
            ("viscosity", self.transport.viscosity.value),
            ("conductivity", self.transport.conductivity.value),
            ("reference temperature", self.reference_temperature.value),
        ];
        match checks
            .into_iter()
            .find(|(_, value)| StrictlyPositive::check(value).is_err())
        {
            Some((property, _)) => Err(LiquidConstantsError { property }),
            None => Ok(()),
        }
    }
}

/// A liquid usable with the [`Incompressible`] model.
pub trait IncompressibleFluid {
    fn constants() -> LiquidConstants;
}

/// Liquid with constant density, heat capacity, and transport properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incompressible<Fluid> {
    constants: LiquidConstants,
    _fluid: PhantomData<Fluid>,
}

impl<Fluid> ThermoModel for Incompressible<Fluid> {
    type Fluid = Fluid;
}

impl<Fluid> Incompressible<Fluid> {
    /// Builds the model from the constants `Fluid` provides.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidConstantsError`] naming the first non-positive constant.
    pub fn new() -> Result<Self, LiquidConstantsError>
    where
        Fluid: IncompressibleFluid,
    {
        Self::with_constants(Fluid::constants())
    }

    /// Builds the model from explicit constants.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidConstantsError`] naming the first non-positive constant.
    pub fn with_constants(constants: LiquidConstants) -> Result<Self, LiquidConstantsError> {
        constants.validate()?;
        Ok(Self {
            constants,
            _fluid: PhantomData,
        })
    }

    #[must_use]
    pub fn constants(&self) -> &LiquidConstants {
        &self.constants
    }

    fn state(&self, fluid: Fluid, temperature: ThermodynamicTemperature) -> State<Fluid> {
        State::new(temperature, self.constants.density, fluid)
    }
}

impl<Fluid> HasEnthalpy for Incompressible<Fluid> {
    fn enthalpy(&self, state: &State<Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        let c = &self.constants;
        Ok(c.cp * state.temperature.minus(c.reference_temperature))
    }
}

impl<Fluid> HasCp for Incompressible<Fluid> {
    fn cp(&self, _state: &State<Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(self.constants.cp)
    }
}

impl<Fluid> HasViscosity for Incompressible<Fluid> {
    fn viscosity(&self, _state: &State<Fluid>) -> Result<DynamicViscosity, PropertyError> {
        Ok(self.constants.transport.viscosity)
    }
}

impl<Fluid> HasThermalConductivity for Incompressible<Fluid> {
    fn thermal_conductivity(
        &self,
        _state: &State<Fluid>,
    ) -> Result<ThermalConductivity, PropertyError> {
        Ok(self.constants.transport.conductivity)
    }
}

impl<Fluid> HasSaturation for Incompressible<Fluid> {
    fn saturation(
        &self,
        _fluid: &Fluid,
        _pressure: Pressure,
    ) -> Result<Saturation<Fluid>, PropertyError> {
        Ok(Saturation::SinglePhase(Phase::Liquid))
    }
}

impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, Pressure)> for Incompressible<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, temperature, _pressure): (Fluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Fluid>, Self::Error> {
        Ok(self.state(fluid, temperature))
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEnthalpy)> for Incompressible<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, _pressure, enthalpy): (Fluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<Fluid>, Self::Error> {
        let c = &self.constants;
        Ok(self.state(fluid, c.reference_temperature + enthalpy / c.cp))
    }
}
