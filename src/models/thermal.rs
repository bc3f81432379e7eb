//! Thermal component models.

pub mod hx;
