//! Heat exchanger analysis toolkit.
//!
//! Effectiveness-NTU relations and log-mean temperature difference helpers
//! for sizing a slice of a heat exchanger with uniform properties.
//!
//! The LMTD method sizes a counter-flow slice directly. Other arrangements
//! apply a correction factor `F`, the ratio of the counter-flow NTU to the
//! arrangement's NTU at the same effectiveness and capacity ratio.
//!
//! # Example
//!
//! ```
//! use twine_hx::support::hx::{
//!     CapacitanceRate, CapacityRatio, Effectiveness, arrangement::CrossFlow,
//!     correction_factor,
//! };
//! use uom::si::{f64::ThermalConductance, thermal_conductance::watt_per_kelvin};
//!
//! let rates = [
//!     CapacitanceRate::from_quantity(ThermalConductance::new::<watt_per_kelvin>(500.0))?,
//!     CapacitanceRate::from_quantity(ThermalConductance::new::<watt_per_kelvin>(800.0))?,
//! ];
//! let cr = CapacityRatio::from_capacitance_rates(rates);
//! let eff = Effectiveness::new(0.6)?;
//!
//! let f = correction_factor(&CrossFlow, eff, cr)?;
//! assert!(f > 0.0 && f < 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arrangement;
mod capacitance_rate;
mod effectiveness_ntu;
mod lmtd;

pub use capacitance_rate::{CapacitanceRate, CapacityRatio};
pub use effectiveness_ntu::{Effectiveness, EffectivenessRelation, Ntu, NtuError, NtuRelation};
pub use lmtd::{LmtdError, correction_factor, log_mean_temperature_difference};
