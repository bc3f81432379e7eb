//! Thermodynamic property models.
//!
//! The idealized models ([`Incompressible`], [`PerfectGas`]) suit secondary
//! fluids that never change phase. Working fluids that boil or condense
//! inside the exchanger need a real-fluid backend such as `CoolProp`.

pub mod incompressible;
pub mod perfect_gas;

mod transport;

#[cfg(feature = "coolprop")]
#[cfg_attr(docsrs, doc(cfg(feature = "coolprop")))]
pub mod coolprop;

pub use incompressible::Incompressible;
pub use perfect_gas::PerfectGas;
pub use transport::ConstantTransport;

#[cfg(feature = "coolprop")]
#[cfg_attr(docsrs, doc(cfg(feature = "coolprop")))]
pub use coolprop::CoolProp;
