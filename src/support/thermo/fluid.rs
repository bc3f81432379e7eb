//! Canonical fluid identifiers.
//!
//! A fluid type names a substance, and each model defines how that name is
//! interpreted through trait implementations: constants for the idealized
//! models, or a backend identifier for an external property library.
//!
//! Some fluids are simple unit-like types, while others carry state-defining data.

mod air;
mod water;

pub use air::Air;
pub use water::Water;
