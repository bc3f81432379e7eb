use thiserror::Error;
use uom::si::f64::{Power, TemperatureInterval};

use crate::support::hx::NtuError;

use super::{
    correlation::CorrelationError,
    geometry::GeometryClass,
    phase::{RegionPhase, Side, Target},
};

/// Errors caused by an inconsistent unit, config, or set of boundary flows.
///
/// These are never retried: the caller must change its inputs.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No correlation is registered for the requested key.
    #[error("no {target} correlation registered for {class:?} / {phase} / {side}")]
    MissingCorrelation {
        class: GeometryClass,
        phase: RegionPhase,
        target: Target,
        side: Side,
    },

    /// A registered correlation does not support the key it was registered under.
    #[error("correlation {name} does not support {target} for {class:?} / {phase}")]
    IncompatibleCorrelation {
        name: &'static str,
        class: GeometryClass,
        phase: RegionPhase,
        target: Target,
    },

    /// A boundary flow needed for evaluation has not been set.
    #[error("boundary flow {which} has not been set")]
    MissingFlowState { which: &'static str },

    /// One side has no enthalpy change.
    #[error("no heat transfer on the {side} side")]
    NoHeatTransfer { side: Side },

    /// Inlet and outlet mass rates of one side differ.
    #[error("mass imbalance on the {side} side: inlet {inlet} kg/s, outlet {outlet} kg/s")]
    MassImbalance { side: Side, inlet: f64, outlet: f64 },

    /// Cold-side duty does not equal the effectiveness times the hot-side duty.
    #[error("energy imbalance: hot side {q_hot:?}, cold side {q_cold:?}")]
    EnergyImbalance { q_hot: Power, q_cold: Power },

    /// Both sides gain heat or both sides lose heat.
    #[error("inconsistent heat direction: wf {q_wf:?}, sf {q_sf:?}")]
    HeatDirection { q_wf: Power, q_sf: Power },

    /// The hot stream is not hotter than the cold stream at a region boundary.
    #[error("temperature crossover at duty fraction {fraction}: hot - cold = {delta_t:?}")]
    TemperatureCrossover {
        fraction: f64,
        delta_t: TemperatureInterval,
    },

    #[error("invalid geometry: {context}")]
    InvalidGeometry { context: String },

    #[error("invalid dimension: {context}")]
    InvalidDimension { context: String },

    /// Only single-pass units are modeled.
    #[error("unsupported pass arrangement {wf}/{sf}; only 1/1 is supported")]
    UnsupportedPasses { wf: u32, sf: u32 },

    /// The two sides' descriptors cannot form one unit.
    #[error("incompatible geometries: wf {wf:?}, sf {sf:?}")]
    IncompatibleGeometry { wf: GeometryClass, sf: GeometryClass },

    /// The attribute cannot be read, set, or sized on this unit.
    #[error("unsupported attribute {attribute}: {reason}")]
    UnsupportedAttribute { attribute: String, reason: String },

    /// A subdivision limit is not a positive, finite step.
    #[error("{limit} subdivision limit must be positive and finite, got {value}")]
    InvalidSubdivision { limit: &'static str, value: f64 },

    /// Sizing bounds must be finite, positive, and increasing.
    #[error("invalid sizing bounds [{lo}, {hi}]")]
    InvalidBounds { lo: f64, hi: f64 },

    /// Sizing was requested without a stored attribute and bounds.
    #[error("no sizing attribute has been selected")]
    NoSizeSelection,

    /// An attribute path could not be parsed.
    #[error("unknown attribute path {path:?}")]
    UnknownAttribute { path: String },
}

impl ConfigError {
    pub(super) fn invalid_geometry(context: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            context: context.into(),
        }
    }

    pub(super) fn invalid_dimension(context: impl Into<String>) -> Self {
        Self::InvalidDimension {
            context: context.into(),
        }
    }
}

/// Errors that can occur while evaluating a unit.
#[derive(Debug, Error)]
pub enum UnitError {
    /// The unit or its inputs are inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A thermodynamic model operation failed.
    ///
    /// This failure can be from property evaluation or state construction.
    #[error("thermodynamic model failed: {context}")]
    ThermoModelFailed {
        /// Operation context for the thermodynamic model failure.
        context: String,

        /// Underlying thermodynamic model error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A correlation rejected its inputs.
    #[error("correlation failed")]
    Correlation(#[from] CorrelationError),

    /// The heat-flux fixed point of a boiling region did not settle.
    #[error("heat flux iteration did not converge in region {region} after {iters} iterations")]
    HeatFluxNotConverged { region: usize, iters: usize },

    /// The cross-flow correction factor of a region is undefined.
    #[error("cross-flow correction failed in region {region}")]
    CorrectionFactor {
        region: usize,
        #[source]
        source: NtuError,
    },

    /// Region duties do not add up to the unit duty.
    #[error("region duties sum to {sum:?}, unit duty is {total:?}")]
    DutyClosure { sum: Power, total: Power },
}

impl UnitError {
    /// Creates a thermo model failure error with context.
    pub(super) fn thermo_failed(
        context: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ThermoModelFailed {
            context: context.into(),
            source: Box::new(err),
        }
    }
}
