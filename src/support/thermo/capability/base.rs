/// Base trait for a thermodynamic property model.
///
/// A model is tied to the `Fluid` type its states carry. Every capability
/// trait in this module extends `ThermoModel`, so a single model value can be
/// asked for any combination of properties it supports.
pub trait ThermoModel {
    type Fluid;
}
