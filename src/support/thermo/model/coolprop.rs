//! CoolProp-backed fluid property model.
//!
//! Working fluids that boil or condense inside a unit need a real saturation
//! curve and transport properties on both sides of the dome. Every query
//! updates a shared `AbstractState` from the `(ρ, T)` of the state and reads
//! one output.

mod error;

use std::{marker::PhantomData, sync::Mutex};

use rfluids::{
    io::{FluidInputPair, FluidParam, FluidTrivialParam},
    native::AbstractState,
};
use uom::si::{
    available_energy::joule_per_kilogram,
    dynamic_viscosity::pascal_second,
    f64::{
        DynamicViscosity, MassDensity, Pressure, SpecificHeatCapacity, ThermalConductivity,
        ThermodynamicTemperature,
    },
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::thermo::{
    Phase, PropertyError, Saturation, State,
    capability::{
        HasCp, HasEnthalpy, HasPressure, HasSaturation, HasThermalConductivity, HasViscosity,
        StateFrom, ThermoModel,
    },
};
use crate::support::units::SpecificEnthalpy;

pub use error::CoolPropError;

/// A fluid known to CoolProp by backend and name, e.g. `("HEOS", "R245fa")`.
#[cfg_attr(docsrs, doc(cfg(feature = "coolprop")))]
pub trait CoolPropFluid: Clone + Default + Send + Sync + 'static {
    const BACKEND: &'static str;
    const NAME: &'static str;
}

/// Real-fluid property model for `F`.
///
/// The `AbstractState` sits behind a mutex so each update and the reads
/// that follow it happen together; the model can be shared between threads.
#[cfg_attr(docsrs, doc(cfg(feature = "coolprop")))]
pub struct CoolProp<F: CoolPropFluid> {
    backend: Mutex<AbstractState>,
    _fluid: PhantomData<F>,
}

impl<F: CoolPropFluid> ThermoModel for CoolProp<F> {
    type Fluid = F;
}

impl<F: CoolPropFluid> CoolProp<F> {
    /// Opens an `AbstractState` for `F`.
    ///
    /// # Errors
    ///
    /// Returns [`CoolPropError`] if CoolProp does not know `F::BACKEND` or
    /// `F::NAME`.
    pub fn new() -> Result<Self, CoolPropError> {
        Ok(Self {
            backend: Mutex::new(AbstractState::new(F::BACKEND, F::NAME)?),
            _fluid: PhantomData,
        })
    }

    /// Reads `param` at the density and temperature of `state`.
    fn output(&self, state: &State<F>, param: FluidParam) -> Result<f64, CoolPropError> {
        let mut backend = self.backend.lock()?;
        backend.update(
            FluidInputPair::DMassT,
            state.density.get::<kilogram_per_cubic_meter>(),
            state.temperature.get::<kelvin>(),
        )?;
        Ok(backend.keyed_output(param)?)
    }

    /// Solves for the state fixed by an input pair.
    fn solve(
        &self,
        fluid: F,
        pair: FluidInputPair,
        first: f64,
        second: f64,
    ) -> Result<State<F>, CoolPropError> {
        let mut backend = self.backend.lock()?;
        backend.update(pair, first, second)?;
        Ok(State::new(
            ThermodynamicTemperature::new::<kelvin>(backend.keyed_output(FluidParam::T)?),
            MassDensity::new::<kilogram_per_cubic_meter>(backend.keyed_output(FluidParam::DMass)?),
            fluid,
        ))
    }
}

impl<F: CoolPropFluid> HasPressure for CoolProp<F> {
    fn pressure(&self, state: &State<F>) -> Result<Pressure, PropertyError> {
        let p = self.output(state, FluidParam::P)?;
        Ok(Pressure::new::<pascal>(p))
    }
}

impl<F: CoolPropFluid> HasEnthalpy for CoolProp<F> {
    fn enthalpy(&self, state: &State<F>) -> Result<SpecificEnthalpy, PropertyError> {
        let h = self.output(state, FluidParam::HMass)?;
        Ok(SpecificEnthalpy::new::<joule_per_kilogram>(h))
    }
}

impl<F: CoolPropFluid> HasCp for CoolProp<F> {
    fn cp(&self, state: &State<F>) -> Result<SpecificHeatCapacity, PropertyError> {
        let cp = self.output(state, FluidParam::CpMass)?;
        Ok(SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp))
    }
}

impl<F: CoolPropFluid> HasViscosity for CoolProp<F> {
    fn viscosity(&self, state: &State<F>) -> Result<DynamicViscosity, PropertyError> {
        let mu = self.output(state, FluidParam::DynamicViscosity)?;
        Ok(DynamicViscosity::new::<pascal_second>(mu))
    }
}

impl<F: CoolPropFluid> HasThermalConductivity for CoolProp<F> {
    fn thermal_conductivity(&self, state: &State<F>) -> Result<ThermalConductivity, PropertyError> {
        let k = self.output(state, FluidParam::Conductivity)?;
        Ok(ThermalConductivity::new::<watt_per_meter_kelvin>(k))
    }
}

impl<F: CoolPropFluid> HasSaturation for CoolProp<F> {
    /// Saturated liquid and vapor at `pressure`, or [`Phase::Supercritical`]
    /// at or above the critical pressure.
    fn saturation(&self, fluid: &F, pressure: Pressure) -> Result<Saturation<F>, PropertyError> {
        let p_crit = {
            let backend = self.backend.lock().map_err(CoolPropError::from)?;
            backend
                .keyed_output(FluidTrivialParam::PCritical)
                .map_err(CoolPropError::Rfluids)?
        };
        let p = pressure.get::<pascal>();
        if p >= p_crit {
            return Ok(Saturation::SinglePhase(Phase::Supercritical));
        }

        let liquid = self.solve(fluid.clone(), FluidInputPair::PQ, p, 0.0)?;
        let vapor = self.solve(fluid.clone(), FluidInputPair::PQ, p, 1.0)?;
        Ok(Saturation::TwoPhase { liquid, vapor })
    }
}

impl<F: CoolPropFluid> StateFrom<(F, ThermodynamicTemperature, Pressure)> for CoolProp<F> {
    type Error = CoolPropError;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (F, ThermodynamicTemperature, Pressure),
    ) -> Result<State<F>, Self::Error> {
        self.solve(
            fluid,
            FluidInputPair::PT,
            pressure.get::<pascal>(),
            temperature.get::<kelvin>(),
        )
    }
}

impl<F: CoolPropFluid> StateFrom<(F, Pressure, SpecificEnthalpy)> for CoolProp<F> {
    type Error = CoolPropError;

    fn state_from(
        &self,
        (fluid, pressure, enthalpy): (F, Pressure, SpecificEnthalpy),
    ) -> Result<State<F>, Self::Error> {
        self.solve(
            fluid,
            FluidInputPair::HMassP,
            enthalpy.get::<joule_per_kilogram>(),
            pressure.get::<pascal>(),
        )
    }
}
