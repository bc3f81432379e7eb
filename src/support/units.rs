//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all physical units (e.g., temperature, pressure, power).
//! This module provides extensions that are useful for modeling but aren't included in [`uom`].
//!
//! ## Temperature differences
//!
//! The [`TemperatureDifference`] trait provides a [`minus`](TemperatureDifference::minus) method
//! for subtracting one absolute temperature from another to get a temperature interval:
//!
//! ```
//! use uom::si::f64::ThermodynamicTemperature;
//! use uom::si::thermodynamic_temperature::kelvin;
//! use twine_hx::support::units::TemperatureDifference;
//!
//! let t1 = ThermodynamicTemperature::new::<kelvin>(300.0);
//! let t2 = ThermodynamicTemperature::new::<kelvin>(250.0);
//! let delta_t = t1.minus(t2);
//! // delta_t is a TemperatureInterval, not a ThermodynamicTemperature
//! ```
//!
//! This extension trait is currently needed due to limitations in [`uom`].
//! See [`TemperatureDifference`] for details.
//!
//! ## Derived quantities
//!
//! Heat exchanger sizing works with a few quantities [`uom`] does not name,
//! such as [`MassFlux`] (channel mass velocity) and [`AreaThermalResistance`]
//! (fouling factors). They are defined here as dimension aliases, so they
//! arise naturally from arithmetic:
//!
//! ```
//! use uom::si::{
//!     f64::{Area, MassRate},
//!     area::square_meter,
//!     mass_rate::kilogram_per_second,
//! };
//! use twine_hx::support::units::MassFlux;
//!
//! let g: MassFlux = MassRate::new::<kilogram_per_second>(0.5) / Area::new::<square_meter>(0.01);
//! assert!((g.value - 50.0).abs() < 1e-12);
//! ```

mod quantities;
mod temperature_difference;

pub use quantities::{AreaThermalResistance, MassFlux, SpecificEnthalpy, SpecificGasConstant};
pub use temperature_difference::TemperatureDifference;
