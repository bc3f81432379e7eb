use uom::si::{
    dynamic_viscosity::pascal_second,
    f64::{DynamicViscosity, SpecificHeatCapacity, ThermalConductivity},
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
};

use crate::support::{
    thermo::model::perfect_gas::{GasConstants, PerfectGasFluid},
    units::SpecificGasConstant,
};

/// Dry air, typically the secondary fluid of an evaporator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Air;

/// Transport properties near 25 °C and 1 atm.
impl PerfectGasFluid for Air {
    fn constants() -> GasConstants {
        GasConstants::new(
            SpecificGasConstant::new::<joule_per_kilogram_kelvin>(287.053),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1005.0),
            DynamicViscosity::new::<pascal_second>(1.85e-5),
            ThermalConductivity::new::<watt_per_meter_kelvin>(0.0263),
        )
    }
}

#[cfg(feature = "coolprop")]
impl crate::support::thermo::model::coolprop::CoolPropFluid for Air {
    const BACKEND: &'static str = "HEOS";
    const NAME: &'static str = "Air";
}
