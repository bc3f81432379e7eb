//! Supporting utilities used by the heat exchanger models.
//!
//! - [`constraint`]: construction-time numeric invariants.
//! - [`hx`]: LMTD, capacitance rates, and effectiveness-NTU relations.
//! - [`thermo`]: property-backend capability traits and built-in fluid models.
//! - [`units`]: [`uom`] extensions for quantities the models need.

pub mod constraint;
pub mod hx;
pub mod thermo;
pub mod units;
