//! Capability traits used to query and construct thermodynamic states.
//!
//! Heat exchanger evaluation needs more than equilibrium properties: film
//! correlations require transport properties ([`HasViscosity`],
//! [`HasThermalConductivity`]) and the region discretizer requires the
//! saturation curve ([`HasSaturation`]).

mod base;
mod properties;
mod saturation;
mod state_from;
mod transport;

pub use base::ThermoModel;
pub use properties::*;
pub use saturation::HasSaturation;
pub use state_from::StateFrom;
pub use transport::{HasThermalConductivity, HasViscosity};
