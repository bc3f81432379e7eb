//! Discretized heat exchanger units with implicit sizing.
//!
//! An [`HxUnit`] is evaluated in three steps:
//!
//! 1. The boundary flows are split into regions of uniform phase on both
//!    sides, optionally subdivided by temperature or quality change.
//! 2. Each region is sized for its share of the duty,
//!    `A_req = Q / (U · F · LMTD)`, with film coefficients and friction
//!    factors from the correlations registered in [`Config`].
//! 3. Region results are summed into a [`UnitPerformance`] whose area
//!    residual compares the required and actual area.
//!
//! Sizing drives that residual to zero by bisection on one [`SizeAttr`].

mod aggregate;
mod config;
mod correlation;
mod discretize;
mod error;
mod evaluate;
mod flow_state;
mod geometry;
mod phase;
mod sizing;
mod traits;
mod unit;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::UnitPerformance;
pub use config::{Config, ConfigBuilder};
pub use correlation::{
    AkersDemingCrosser, ChisholmWanniarachchi, Correlation, CorrelationError, CorrelationInput,
    FilmProperties, Gnielinski, HanLeeKim, HomogeneousFriction, SavostinTikhonov,
    TwoPhaseProperties, YanLin,
};
pub use error::{ConfigError, UnitError};
pub use evaluate::{PressureDrop, RegionResult};
pub use flow_state::{FlowState, FlowStateError};
pub use geometry::{Geometry, GeometryClass, GeometryField};
pub use phase::{PhaseSelector, RegionPhase, Side, Target};
pub use sizing::{SizeAttr, SizingError};
pub use traits::HxThermoModel;
pub use unit::{
    AreaRatios, FlowConfig, FlowSense, HxUnit, Material, PortDiameters, UnitDesign, UnitUpdate,
    Wall,
};
