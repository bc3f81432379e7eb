//! Twine models for heat exchanger units.
//!
//! A model module keeps its computation in an internal `core` submodule and
//! exposes it through thin [`twine_core::Model`] adapters. The `core` types
//! that callers need (unit designs, configuration, results) are re-exported
//! from the model module itself.

pub mod thermal;
