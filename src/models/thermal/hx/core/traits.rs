//! Thermo model bounds required by heat exchanger units.

use uom::si::f64::{Pressure, ThermodynamicTemperature};

use crate::support::{
    thermo::capability::{
        HasCp, HasEnthalpy, HasSaturation, HasThermalConductivity, HasViscosity, StateFrom,
        ThermoModel,
    },
    units::SpecificEnthalpy,
};

/// Required thermo model capabilities for one side of a heat exchanger unit.
///
/// Discretization needs the saturation curve and `(p, h)` state construction.
/// Film correlations need `cp` and transport properties.
pub trait HxThermoModel<Fluid>:
    ThermoModel<Fluid = Fluid>
    + HasEnthalpy
    + HasCp
    + HasViscosity
    + HasThermalConductivity
    + HasSaturation
    + StateFrom<(Fluid, ThermodynamicTemperature, Pressure)>
    + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}

impl<Fluid, T> HxThermoModel<Fluid> for T where
    T: ThermoModel<Fluid = Fluid>
        + HasEnthalpy
        + HasCp
        + HasViscosity
        + HasThermalConductivity
        + HasSaturation
        + StateFrom<(Fluid, ThermodynamicTemperature, Pressure)>
        + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}
