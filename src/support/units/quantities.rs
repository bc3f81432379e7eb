use uom::{
    si::{ISQ, Quantity, SI},
    typenum::{N1, N2, P1, P2, P3, Z0},
};

/// Specific gas constant, J/kg·K in SI.
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Specific enthalpy, J/kg in SI.
pub type SpecificEnthalpy = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Mass flux (mass rate per unit flow area), kg/m²·s in SI.
pub type MassFlux = Quantity<ISQ<N2, P1, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Area-specific thermal resistance, m²·K/W in SI.
///
/// This is the reciprocal of [`HeatTransfer`](uom::si::f64::HeatTransfer) and
/// is the usual unit for fouling factors.
pub type AreaThermalResistance = Quantity<ISQ<Z0, N1, P3, Z0, P1, Z0, Z0>, SI<f64>, f64>;
