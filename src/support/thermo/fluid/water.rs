use uom::si::{
    dynamic_viscosity::pascal_second,
    f64::{DynamicViscosity, MassDensity, SpecificHeatCapacity, ThermalConductivity},
    mass_density::kilogram_per_cubic_meter,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
};

use crate::support::thermo::model::incompressible::{IncompressibleFluid, LiquidConstants};

/// Water, as a liquid secondary fluid or a CoolProp working fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Water;

/// Saturated liquid water near 25 °C.
impl IncompressibleFluid for Water {
    fn constants() -> LiquidConstants {
        LiquidConstants::new(
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4184.0),
            MassDensity::new::<kilogram_per_cubic_meter>(997.047),
            DynamicViscosity::new::<pascal_second>(8.9e-4),
            ThermalConductivity::new::<watt_per_meter_kelvin>(0.607),
        )
    }
}

#[cfg(feature = "coolprop")]
impl crate::support::thermo::model::coolprop::CoolPropFluid for Water {
    const BACKEND: &'static str = "HEOS";
    const NAME: &'static str = "Water";
}
