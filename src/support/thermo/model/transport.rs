use uom::si::f64::{DynamicViscosity, ThermalConductivity};

/// Fixed viscosity and conductivity of an idealized fluid.
///
/// Film correlations need both alongside `cp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantTransport {
    pub viscosity: DynamicViscosity,
    pub conductivity: ThermalConductivity,
}
