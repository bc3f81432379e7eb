//! # Twine HX
//!
//! Heat exchanger unit discretization and implicit sizing for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! A unit is described by its construction (plates or tubes, channel
//! geometry, wall, flow arrangement) and four boundary flows. Evaluation
//! splits the unit into phase-uniform regions, sizes each region with
//! heat transfer and friction correlations, and reports the area the flows
//! require against the area the unit has. Sizing varies one attribute until
//! the two agree.
//!
//! ## Crate layout
//!
//! - [`models`]: [`twine_core::Model`] implementations and the unit API.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module and moves to
//! [`support`] once it is useful outside that model.

pub mod models;
pub mod support;
