//! Flow arrangement and construction of a unit.

use std::borrow::Cow;

use uom::si::{
    f64::{Length, ThermalConductivity},
    length::meter,
    thermal_conductivity::watt_per_meter_kelvin,
};

use crate::models::thermal::hx::core::ConfigError;

/// Relative direction of the two streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FlowSense {
    #[default]
    Counter,
    Parallel,
    /// Single-pass cross-flow, both fluids unmixed.
    Cross,
}

impl FlowSense {
    /// Returns `true` if the secondary fluid runs against the duty fraction axis.
    #[must_use]
    pub fn sf_reversed(self) -> bool {
        !matches!(self, FlowSense::Parallel)
    }
}

/// Stream arrangement of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    pub sense: FlowSense,
    pub passes_wf: u32,
    pub passes_sf: u32,
    /// Working fluid flows vertically (static head applies).
    pub vertical_wf: bool,
    /// Secondary fluid flows vertically (static head applies).
    pub vertical_sf: bool,
}

impl FlowConfig {
    #[must_use]
    pub fn new(sense: FlowSense) -> Self {
        Self {
            sense,
            passes_wf: 1,
            passes_sf: 1,
            vertical_wf: false,
            vertical_sf: false,
        }
    }

    /// Marks both sides as vertical.
    #[must_use]
    pub fn vertical(self) -> Self {
        Self {
            vertical_wf: true,
            vertical_sf: true,
            ..self
        }
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.passes_wf == 1 && self.passes_sf == 1 {
            Ok(())
        } else {
            Err(ConfigError::UnsupportedPasses {
                wf: self.passes_wf,
                sf: self.passes_sf,
            })
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self::new(FlowSense::Counter)
    }
}

/// Wall material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Cow<'static, str>,
    pub conductivity: ThermalConductivity,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, conductivity: ThermalConductivity) -> Self {
        Self {
            name: name.into(),
            conductivity,
        }
    }

    /// Stainless steel 316 at room temperature, 16.3 W/m·K.
    #[must_use]
    pub fn stainless_steel_316() -> Self {
        Self::new(
            "stainless steel 316",
            ThermalConductivity::new::<watt_per_meter_kelvin>(16.3),
        )
    }
}

/// Plate or tube wall separating the two fluids.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub material: Material,
    pub thickness: Length,
}

impl Wall {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let t = self.thickness.get::<meter>();
        if !(t > 0.0 && t.is_finite()) {
            return Err(ConfigError::invalid_dimension(format!(
                "wall thickness must be positive, got {t} m"
            )));
        }
        let k = self.material.conductivity.get::<watt_per_meter_kelvin>();
        if !(k > 0.0 && k.is_finite()) {
            return Err(ConfigError::invalid_dimension(format!(
                "{} conductivity must be positive, got {k} W/m-K",
                self.material.name
            )));
        }
        Ok(())
    }
}

/// Surface area multipliers relative to the nominal wall area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaRatios {
    pub wf: f64,
    pub sf: f64,
    /// Scales the geometric wall area.
    pub wall: f64,
}

impl AreaRatios {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("wf", self.wf), ("sf", self.sf), ("wall", self.wall)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::invalid_dimension(format!(
                    "{name} area ratio must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for AreaRatios {
    fn default() -> Self {
        Self {
            wf: 1.0,
            sf: 1.0,
            wall: 1.0,
        }
    }
}

/// Inlet and outlet port bore of each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortDiameters {
    pub wf: Length,
    pub sf: Length,
}
