//! Heat exchanger models.
//!
//! [`HxUnitModel`] adapts a heat exchanger unit to [`twine_core::Model`].
//! The computational core lives in the internal `core` module; the types a
//! caller needs to build, update, evaluate, and size a unit are re-exported
//! here.

pub(crate) mod core;
mod unit_model;

pub use self::core::{
    AreaRatios, Config, ConfigBuilder, ConfigError, Correlation, CorrelationError,
    CorrelationInput, FilmProperties, FlowConfig, FlowSense, FlowState, FlowStateError, Geometry,
    GeometryClass, GeometryField, HxThermoModel, HxUnit, Material, PhaseSelector, PortDiameters,
    PressureDrop, RegionPhase, RegionResult, Side, SizeAttr, SizingError, Target,
    TwoPhaseProperties, UnitDesign, UnitError, UnitPerformance, UnitUpdate, Wall,
};
pub use unit_model::{HxUnitModel, HxUnitOutput};

/// Built-in correlations registered by [`Config::default`].
pub mod correlations {
    pub use super::core::{
        AkersDemingCrosser, ChisholmWanniarachchi, Gnielinski, HanLeeKim, HomogeneousFriction,
        SavostinTikhonov, YanLin,
    };
}
