//! A single heat exchanger unit.
//!
//! An [`HxUnit`] owns its construction, its boundary flows, and an optional
//! sizing selection. Evaluating it splits the unit into regions, sizes each
//! region for its share of the duty, and compares the required area with the
//! area the unit actually has.

mod boundary;
mod layout;
mod update;

pub(crate) use boundary::BoundaryFlows;
pub use layout::{AreaRatios, FlowConfig, FlowSense, Material, PortDiameters, Wall};
pub use update::UnitUpdate;

use std::{f64::consts::PI, sync::Arc};

use tracing::debug;
use uom::{
    ConstZero,
    si::{
        f64::{Area, Length, MassRate, Pressure},
        length::meter,
    },
};

use crate::support::{
    constraint::{Constrained, NonNegative, UnitIntervalLowerOpen},
    units::AreaThermalResistance,
};

use super::{
    ConfigError, UnitError,
    aggregate::{UnitPerformance, UnitTotals, aggregate, port_pressure_drop},
    config::Config,
    discretize::discretize,
    evaluate::{RegionContext, SideChannel},
    flow_state::FlowState,
    geometry::{Geometry, GeometryField},
    phase::Side,
    sizing::SizeAttr,
    traits::HxThermoModel,
};

/// Construction parameters of an [`HxUnit`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDesign {
    pub flow: FlowConfig,
    /// Plates for plate geometries, tubes for tube-in-tube.
    pub element_count: u32,
    pub wall: Wall,
    pub geometry_wf: Geometry,
    pub geometry_sf: Geometry,
    pub length: Length,
    /// Plate width. Ignored by tube units.
    pub width: Length,
    pub area_ratios: AreaRatios,
    pub fouling_wf: AreaThermalResistance,
    pub fouling_sf: AreaThermalResistance,
    /// Fraction of the hot-side heat release that reaches the cold side.
    pub effectiveness: f64,
    pub ports: Option<PortDiameters>,
}

impl UnitDesign {
    /// A clean, single-pass counter-flow design without ports.
    #[must_use]
    pub fn new(
        geometry_wf: Geometry,
        geometry_sf: Geometry,
        element_count: u32,
        length: Length,
        width: Length,
        wall: Wall,
    ) -> Self {
        Self {
            flow: FlowConfig::default(),
            element_count,
            wall,
            geometry_wf,
            geometry_sf,
            length,
            width,
            area_ratios: AreaRatios::default(),
            fouling_wf: AreaThermalResistance::ZERO,
            fouling_sf: AreaThermalResistance::ZERO,
            effectiveness: 1.0,
            ports: None,
        }
    }
}

/// A two-stream heat exchanger unit.
///
/// The working fluid (`Wf`) and secondary fluid (`Sf`) each flow through one
/// side. Every mutation goes through [`HxUnit::update`] or a successful sizing
/// call, and is validated before it is committed.
#[derive(Debug, Clone)]
pub struct HxUnit<Wf, Sf> {
    flow: FlowConfig,
    element_count: u32,
    wall: Wall,
    geometry_wf: Geometry,
    geometry_sf: Geometry,
    length: Length,
    width: Length,
    area_ratios: AreaRatios,
    fouling_wf: Constrained<AreaThermalResistance, NonNegative>,
    fouling_sf: Constrained<AreaThermalResistance, NonNegative>,
    effectiveness: Constrained<f64, UnitIntervalLowerOpen>,
    ports: Option<PortDiameters>,
    config: Arc<Config>,
    flow_in_wf: Option<FlowState<Wf>>,
    flow_out_wf: Option<FlowState<Wf>>,
    flow_in_sf: Option<FlowState<Sf>>,
    flow_out_sf: Option<FlowState<Sf>>,
    size_attr: Option<SizeAttr>,
    size_bounds: Option<[f64; 2]>,
}

impl<Wf, Sf> HxUnit<Wf, Sf> {
    /// Creates a unit without boundary flows.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the design is inconsistent: mixed plate and
    /// tube geometries, unsupported pass counts, too few elements, or
    /// non-positive dimensions.
    pub fn new(design: UnitDesign, config: Arc<Config>) -> Result<Self, ConfigError> {
        let fouling = |side: Side, value: AreaThermalResistance| {
            NonNegative::new(value).map_err(|err| {
                ConfigError::invalid_dimension(format!("{side} fouling resistance: {err}"))
            })
        };

        let unit = Self {
            flow: design.flow,
            element_count: design.element_count,
            wall: design.wall,
            geometry_wf: design.geometry_wf,
            geometry_sf: design.geometry_sf,
            length: design.length,
            width: design.width,
            area_ratios: design.area_ratios,
            fouling_wf: fouling(Side::WorkingFluid, design.fouling_wf)?,
            fouling_sf: fouling(Side::SecondaryFluid, design.fouling_sf)?,
            effectiveness: UnitIntervalLowerOpen::new(design.effectiveness).map_err(|err| {
                ConfigError::invalid_dimension(format!(
                    "effectiveness {}: {err}",
                    design.effectiveness
                ))
            })?,
            ports: design.ports,
            config,
            flow_in_wf: None,
            flow_out_wf: None,
            flow_in_sf: None,
            flow_out_sf: None,
            size_attr: None,
            size_bounds: None,
        };
        unit.validate()?;
        Ok(unit)
    }

    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    #[must_use]
    pub fn flow_config(&self) -> FlowConfig {
        self.flow
    }

    #[must_use]
    pub fn length(&self) -> Length {
        self.length
    }

    #[must_use]
    pub fn width(&self) -> Length {
        self.width
    }

    #[must_use]
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    #[must_use]
    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    #[must_use]
    pub fn geometry_wf(&self) -> &Geometry {
        &self.geometry_wf
    }

    #[must_use]
    pub fn geometry_sf(&self) -> &Geometry {
        &self.geometry_sf
    }

    #[must_use]
    pub fn effectiveness(&self) -> f64 {
        self.effectiveness.into_inner()
    }

    #[must_use]
    pub fn flow_in_wf(&self) -> Option<&FlowState<Wf>> {
        self.flow_in_wf.as_ref()
    }

    #[must_use]
    pub fn flow_out_wf(&self) -> Option<&FlowState<Wf>> {
        self.flow_out_wf.as_ref()
    }

    #[must_use]
    pub fn flow_in_sf(&self) -> Option<&FlowState<Sf>> {
        self.flow_in_sf.as_ref()
    }

    #[must_use]
    pub fn flow_out_sf(&self) -> Option<&FlowState<Sf>> {
        self.flow_out_sf.as_ref()
    }

    /// The stored sizing attribute and bounds, if both are set.
    #[must_use]
    pub fn size_selection(&self) -> Option<(SizeAttr, [f64; 2])> {
        self.size_attr.zip(self.size_bounds)
    }

    #[must_use]
    pub fn is_plate(&self) -> bool {
        self.geometry_wf.class().is_plate()
    }

    /// Nominal heat transfer area.
    ///
    /// Plate units count `N - 2` heat transferring plates. Tube units use the
    /// mean of the tube's inner and outer diameters.
    #[must_use]
    pub fn area(&self) -> Area {
        let count = f64::from(self.element_count);
        let area = match self.geometry_wf {
            Geometry::TubeInTube { tube_diameter, .. } => {
                count * PI * (tube_diameter + self.wall.thickness) * self.length
            }
            _ => (count - 2.0) * self.length * self.width,
        };
        area * self.area_ratios.wall
    }

    /// Number of parallel flow passages on one side.
    #[must_use]
    pub fn channels(&self, side: Side) -> u32 {
        if !self.is_plate() {
            return self.element_count;
        }
        let gaps = self.element_count - 1;
        match side {
            Side::WorkingFluid => gaps.div_ceil(2),
            Side::SecondaryFluid => gaps / 2,
        }
    }

    /// Reads an attribute in its sizing unit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedAttribute`] if this unit has no such
    /// attribute, such as the width of a tube unit.
    pub fn attribute(&self, attr: SizeAttr) -> Result<f64, ConfigError> {
        match attr {
            SizeAttr::Length => Ok(self.length.get::<meter>()),
            SizeAttr::Width if self.is_plate() => Ok(self.width.get::<meter>()),
            SizeAttr::Width => Err(unsupported(attr, "tube units have no width")),
            SizeAttr::ElementCount => Ok(f64::from(self.element_count)),
            SizeAttr::WfGeometry(field) => self
                .geometry_wf
                .field(field)
                .ok_or_else(|| missing_field(attr, &self.geometry_wf)),
            SizeAttr::SfGeometry(field) => self
                .geometry_sf
                .field(field)
                .ok_or_else(|| missing_field(attr, &self.geometry_sf)),
        }
    }

    fn set_attribute(&mut self, attr: SizeAttr, value: f64) -> Result<(), ConfigError> {
        match attr {
            SizeAttr::Length => self.length = Length::new::<meter>(value),
            SizeAttr::Width if self.is_plate() => self.width = Length::new::<meter>(value),
            SizeAttr::Width => return Err(unsupported(attr, "tube units have no width")),
            SizeAttr::ElementCount => self.element_count = element_count(value)?,
            SizeAttr::WfGeometry(GeometryField::TubeDiameter)
            | SizeAttr::SfGeometry(GeometryField::TubeDiameter)
                if !self.is_plate() =>
            {
                // Bore and annulus share one tube.
                self.geometry_wf.set_field(GeometryField::TubeDiameter, value)?;
                self.geometry_sf.set_field(GeometryField::TubeDiameter, value)?;
            }
            SizeAttr::WfGeometry(field) => self.geometry_wf.set_field(field, value)?,
            SizeAttr::SfGeometry(field) => self.geometry_sf.set_field(field, value)?,
        }
        Ok(())
    }

    /// Borrows the four boundary flows.
    pub(crate) fn boundary_flows(&self) -> Result<BoundaryFlows<'_, Wf, Sf>, ConfigError> {
        let missing = |which| ConfigError::MissingFlowState { which };
        Ok(BoundaryFlows {
            wf_in: self
                .flow_in_wf
                .as_ref()
                .ok_or_else(|| missing("flow_in_wf"))?,
            wf_out: self
                .flow_out_wf
                .as_ref()
                .ok_or_else(|| missing("flow_out_wf"))?,
            sf_in: self
                .flow_in_sf
                .as_ref()
                .ok_or_else(|| missing("flow_in_sf"))?,
            sf_out: self
                .flow_out_sf
                .as_ref()
                .ok_or_else(|| missing("flow_out_sf"))?,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let (class_wf, class_sf) = (self.geometry_wf.class(), self.geometry_sf.class());
        if class_wf.is_plate() != class_sf.is_plate() {
            return Err(ConfigError::IncompatibleGeometry {
                wf: class_wf,
                sf: class_sf,
            });
        }

        if let (
            Geometry::TubeInTube {
                tube_diameter: bore,
                ..
            },
            Geometry::TubeInTube {
                tube_diameter: annulus,
                ..
            },
        ) = (self.geometry_wf, self.geometry_sf)
        {
            if bore != annulus {
                return Err(ConfigError::invalid_geometry(format!(
                    "tube diameter differs between sides: wf {bore:?}, sf {annulus:?}"
                )));
            }
        }

        self.flow.validate()?;
        self.wall.validate()?;
        self.area_ratios.validate()?;
        self.geometry_wf.validate(self.wall.thickness)?;
        self.geometry_sf.validate(self.wall.thickness)?;

        let min_count = if self.is_plate() { 3 } else { 1 };
        if self.element_count < min_count {
            return Err(ConfigError::invalid_dimension(format!(
                "{} elements, at least {min_count} required",
                self.element_count
            )));
        }

        positive("length", self.length)?;
        if self.is_plate() {
            positive("width", self.width)?;
        }
        if let Some(ports) = self.ports {
            positive("wf port diameter", ports.wf)?;
            positive("sf port diameter", ports.sf)?;
        }

        if let Some([lo, hi]) = self.size_bounds {
            check_bounds(lo, hi)?;
        }
        if let Some(attr) = self.size_attr {
            self.attribute(attr)?;
        }

        if let Ok(flows) = self.boundary_flows() {
            flows.validate(self.effectiveness(), self.config.balance_tolerance)?;
        }

        Ok(())
    }

    fn channel(&self, side: Side, mass_rate: MassRate) -> SideChannel {
        let t = self.wall.thickness;
        let (geometry, area_ratio, fouling, vertical) = match side {
            Side::WorkingFluid => (
                self.geometry_wf,
                self.area_ratios.wf,
                self.fouling_wf.into_inner(),
                self.flow.vertical_wf,
            ),
            Side::SecondaryFluid => (
                self.geometry_sf,
                self.area_ratios.sf,
                self.fouling_sf.into_inner(),
                self.flow.vertical_sf,
            ),
        };
        let flow_area = f64::from(self.channels(side)) * geometry.flow_area(side, self.width, t);

        SideChannel {
            side,
            geometry,
            hydraulic_diameter: geometry.hydraulic_diameter(side, t),
            mass_flux: mass_rate / flow_area,
            area_ratio,
            fouling,
            vertical,
        }
    }

    fn port_losses(&self, flows: &BoundaryFlows<'_, Wf, Sf>) -> (Pressure, Pressure) {
        match self.ports {
            Some(ports) if self.config.dp_port => (
                port_pressure_drop(
                    &self.config,
                    flows.wf_in.mass_rate(),
                    ports.wf,
                    flows.wf_in.density(),
                    flows.wf_out.density(),
                ),
                port_pressure_drop(
                    &self.config,
                    flows.sf_in.mass_rate(),
                    ports.sf,
                    flows.sf_in.density(),
                    flows.sf_out.density(),
                ),
            ),
            _ => (Pressure::ZERO, Pressure::ZERO),
        }
    }
}

impl<Wf: Clone, Sf: Clone> HxUnit<Wf, Sf> {
    /// Applies a batch of changes atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the updated unit would be invalid. The unit
    /// is unchanged on error.
    pub fn update(&mut self, update: UnitUpdate<Wf, Sf>) -> Result<(), ConfigError> {
        let mut candidate = self.clone();

        let UnitUpdate {
            flow_in_wf,
            flow_out_wf,
            flow_in_sf,
            flow_out_sf,
            size_attr,
            size_bounds,
            attributes,
        } = update;

        if flow_in_wf.is_some() {
            candidate.flow_in_wf = flow_in_wf;
        }
        if flow_out_wf.is_some() {
            candidate.flow_out_wf = flow_out_wf;
        }
        if flow_in_sf.is_some() {
            candidate.flow_in_sf = flow_in_sf;
        }
        if flow_out_sf.is_some() {
            candidate.flow_out_sf = flow_out_sf;
        }
        if size_attr.is_some() {
            candidate.size_attr = size_attr;
        }
        if size_bounds.is_some() {
            candidate.size_bounds = size_bounds;
        }
        for (attr, value) in attributes {
            candidate.set_attribute(attr, value)?;
        }

        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// A validated copy with one attribute changed.
    pub(super) fn with_attribute(&self, attr: SizeAttr, value: f64) -> Result<Self, ConfigError> {
        let mut candidate = self.clone();
        candidate.set_attribute(attr, value)?;
        candidate.validate()?;
        Ok(candidate)
    }

    /// Evaluates the unit at its current boundary flows without changing it.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError`] if a boundary flow is missing, the flows are
    /// inconsistent, or any region fails to evaluate.
    pub fn evaluate(
        &self,
        thermo_wf: &impl HxThermoModel<Wf>,
        thermo_sf: &impl HxThermoModel<Sf>,
    ) -> Result<UnitPerformance, UnitError> {
        let flows = self.boundary_flows()?;
        flows.validate(self.effectiveness(), self.config.balance_tolerance)?;

        let regions = discretize(&flows, self.flow.sense, &self.config, thermo_wf, thermo_sf)?;

        let area = self.area();
        let context = RegionContext {
            config: &self.config,
            sense: self.flow.sense,
            wf: self.channel(Side::WorkingFluid, flows.wf_in.mass_rate()),
            sf: self.channel(Side::SecondaryFluid, flows.sf_in.mass_rate()),
            wall_resistance: self.wall.thickness
                / (self.wall.material.conductivity * self.area_ratios.wall),
            area,
            area_per_length: area / self.length,
            duty: flows.duty().abs(),
            wf_hot: flows.wf_is_hot(),
        };

        let results = regions
            .iter()
            .enumerate()
            .map(|(index, region)| context.evaluate(index, region, thermo_wf, thermo_sf))
            .collect::<Result<Vec<_>, _>>()?;

        let (port_wf, port_sf) = self.port_losses(&flows);
        let totals = UnitTotals {
            duty: context.duty,
            area,
            length: self.length,
            port_wf,
            port_sf,
        };
        let performance = aggregate(results, &totals, self.config.tol_rel)?;

        debug!(
            regions = performance.regions.len(),
            area_required = performance.area_required.value,
            area_actual = performance.area_actual.value,
            relative_residual = performance.relative_residual,
            "evaluated unit"
        );
        Ok(performance)
    }
}

fn positive(name: &str, value: Length) -> Result<(), ConfigError> {
    let v = value.get::<meter>();
    if v > 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid_dimension(format!(
            "{name} must be positive, got {v} m"
        )))
    }
}

/// Checks sizing bounds: finite, positive, and increasing.
pub(super) fn check_bounds(lo: f64, hi: f64) -> Result<(), ConfigError> {
    if lo.is_finite() && hi.is_finite() && lo > 0.0 && lo < hi {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds { lo, hi })
    }
}

fn element_count(value: f64) -> Result<u32, ConfigError> {
    let count = value.round();
    if (value - count).abs() > 1e-9 || !(1.0..=f64::from(u32::MAX)).contains(&count) {
        return Err(ConfigError::invalid_dimension(format!(
            "element count must be a positive whole number, got {value}"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = count as u32;
    Ok(count)
}

fn unsupported(attr: SizeAttr, reason: &str) -> ConfigError {
    ConfigError::UnsupportedAttribute {
        attribute: attr.to_string(),
        reason: reason.to_owned(),
    }
}

fn missing_field(attr: SizeAttr, geometry: &Geometry) -> ConfigError {
    ConfigError::UnsupportedAttribute {
        attribute: attr.to_string(),
        reason: format!("{:?} geometry has no such field", geometry.class()),
    }
}
