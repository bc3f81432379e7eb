//! Thermodynamic and fluid property modeling.
//!
//! This is the property-backend interface consumed by the heat exchanger
//! models: capability traits in [`capability`], the [`State`] value they
//! operate on, and a few built-in [`model`]s.

mod error;
mod phase;
mod state;

pub mod capability;
pub mod fluid;
pub mod model;

pub use error::PropertyError;
pub use phase::{Phase, Saturation};
pub use state::State;
