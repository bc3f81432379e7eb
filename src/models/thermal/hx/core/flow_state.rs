//! Immutable boundary and region flow states.

use thiserror::Error;
use uom::si::{
    f64::{
        DynamicViscosity, MassDensity, MassRate, Pressure, SpecificHeatCapacity,
        ThermalConductivity, ThermodynamicTemperature,
    },
    ratio::ratio,
};

use crate::support::{
    constraint::{Constrained, ConstraintError, StrictlyPositive, UnitInterval},
    thermo::{
        Phase, PropertyError, Saturation, State,
        capability::{
            HasCp, HasEnthalpy, HasSaturation, HasThermalConductivity, HasViscosity, StateFrom,
            ThermoModel,
        },
    },
    units::SpecificEnthalpy,
};

/// Errors that can occur while constructing a [`FlowState`].
#[derive(Debug, Error)]
pub enum FlowStateError {
    /// The mass rate is zero, negative, or NaN.
    #[error("invalid mass rate")]
    MassRate(#[source] ConstraintError),

    /// The quality is outside `[0, 1]`.
    #[error("invalid quality")]
    Quality(#[source] ConstraintError),

    /// A state on the saturation curve was requested where the fluid has none.
    #[error("fluid has no two-phase region at {pressure:?} ({phase:?})")]
    NotSaturated { pressure: Pressure, phase: Phase },

    /// A thermodynamic model operation failed.
    #[error("thermodynamic model failed: {context}")]
    ThermoModelFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FlowStateError {
    fn thermo_failed(
        context: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ThermoModelFailed {
            context: context.into(),
            source: Box::new(err),
        }
    }
}

/// A fluid stream at one point: thermodynamic state plus mass rate.
///
/// The defining pressure and enthalpy are stored alongside the state so the
/// discretizer can interpolate them without re-querying the thermo model.
/// Derived properties are computed on demand from the thermo model passed to
/// each accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowState<Fluid> {
    state: State<Fluid>,
    pressure: Pressure,
    enthalpy: SpecificEnthalpy,
    m_dot: Constrained<MassRate, StrictlyPositive>,
}

impl<Fluid: Clone> FlowState<Fluid> {
    /// Creates a flow state from pressure and temperature.
    ///
    /// # Errors
    ///
    /// Returns [`FlowStateError`] if the mass rate is not strictly positive or
    /// the thermo model rejects the state.
    pub fn from_pressure_temperature<Thermo>(
        thermo: &Thermo,
        fluid: Fluid,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
        m_dot: MassRate,
    ) -> Result<Self, FlowStateError>
    where
        Thermo: StateFrom<(Fluid, ThermodynamicTemperature, Pressure)>
            + HasEnthalpy
            + ?Sized,
        Thermo: ThermoModel<Fluid = Fluid>,
    {
        let m_dot = StrictlyPositive::new(m_dot).map_err(FlowStateError::MassRate)?;
        let state = thermo
            .state_from((fluid, temperature, pressure))
            .map_err(|err| FlowStateError::thermo_failed("state from (T, p)", err))?;
        let enthalpy = thermo
            .enthalpy(&state)
            .map_err(|err| FlowStateError::thermo_failed("enthalpy", err))?;

        Ok(Self {
            state,
            pressure,
            enthalpy,
            m_dot,
        })
    }

    /// Creates a flow state from pressure and specific enthalpy.
    ///
    /// # Errors
    ///
    /// Returns [`FlowStateError`] if the mass rate is not strictly positive or
    /// the thermo model rejects the state.
    pub fn from_pressure_enthalpy<Thermo>(
        thermo: &Thermo,
        fluid: Fluid,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
        m_dot: MassRate,
    ) -> Result<Self, FlowStateError>
    where
        Thermo: StateFrom<(Fluid, Pressure, SpecificEnthalpy)> + ?Sized,
        Thermo: ThermoModel<Fluid = Fluid>,
    {
        let m_dot = StrictlyPositive::new(m_dot).map_err(FlowStateError::MassRate)?;
        let state = thermo
            .state_from((fluid, pressure, enthalpy))
            .map_err(|err| FlowStateError::thermo_failed("state from (p, h)", err))?;

        Ok(Self {
            state,
            pressure,
            enthalpy,
            m_dot,
        })
    }

    /// Creates a flow state on the saturation curve from pressure and quality.
    ///
    /// # Errors
    ///
    /// Returns [`FlowStateError`] if the quality is outside `[0, 1]`, the fluid
    /// has no two-phase region at `pressure`, or the thermo model fails.
    pub fn from_pressure_quality<Thermo>(
        thermo: &Thermo,
        fluid: Fluid,
        pressure: Pressure,
        quality: f64,
        m_dot: MassRate,
    ) -> Result<Self, FlowStateError>
    where
        Thermo: StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
            + HasSaturation
            + HasEnthalpy
            + ?Sized,
        Thermo: ThermoModel<Fluid = Fluid>,
    {
        let quality = UnitInterval::new(quality)
            .map_err(FlowStateError::Quality)?
            .into_inner();

        let (liquid, vapor) = match thermo
            .saturation(&fluid, pressure)
            .map_err(|err| FlowStateError::thermo_failed("saturation", err))?
        {
            Saturation::TwoPhase { liquid, vapor } => (liquid, vapor),
            Saturation::SinglePhase(phase) => {
                return Err(FlowStateError::NotSaturated { pressure, phase });
            }
        };

        let h_liquid = thermo
            .enthalpy(&liquid)
            .map_err(|err| FlowStateError::thermo_failed("saturated liquid enthalpy", err))?;
        let h_vapor = thermo
            .enthalpy(&vapor)
            .map_err(|err| FlowStateError::thermo_failed("saturated vapor enthalpy", err))?;

        let enthalpy = h_liquid + quality * (h_vapor - h_liquid);
        Self::from_pressure_enthalpy(thermo, fluid, pressure, enthalpy, m_dot)
    }

    /// Builds a state at `(pressure, enthalpy)` with an already validated mass rate.
    pub(super) fn at<Thermo>(
        thermo: &Thermo,
        fluid: Fluid,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
        m_dot: Constrained<MassRate, StrictlyPositive>,
    ) -> Result<Self, <Thermo as StateFrom<(Fluid, Pressure, SpecificEnthalpy)>>::Error>
    where
        Thermo: StateFrom<(Fluid, Pressure, SpecificEnthalpy)> + ?Sized,
        Thermo: ThermoModel<Fluid = Fluid>,
    {
        let state = thermo.state_from((fluid, pressure, enthalpy))?;
        Ok(Self {
            state,
            pressure,
            enthalpy,
            m_dot,
        })
    }

    /// Returns a copy of this flow with a different mass rate.
    ///
    /// # Errors
    ///
    /// Returns [`FlowStateError::MassRate`] if `m_dot` is not strictly positive.
    pub fn with_mass_rate(&self, m_dot: MassRate) -> Result<Self, FlowStateError> {
        let m_dot = StrictlyPositive::new(m_dot).map_err(FlowStateError::MassRate)?;
        Ok(Self {
            m_dot,
            ..self.clone()
        })
    }
}

impl<Fluid> FlowState<Fluid> {
    #[must_use]
    pub fn state(&self) -> &State<Fluid> {
        &self.state
    }

    #[must_use]
    pub fn fluid(&self) -> &Fluid {
        &self.state.fluid
    }

    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.state.temperature
    }

    #[must_use]
    pub fn density(&self) -> MassDensity {
        self.state.density
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    #[must_use]
    pub fn enthalpy(&self) -> SpecificEnthalpy {
        self.enthalpy
    }

    #[must_use]
    pub fn mass_rate(&self) -> MassRate {
        self.m_dot.into_inner()
    }

    pub(super) fn constrained_mass_rate(&self) -> Constrained<MassRate, StrictlyPositive> {
        self.m_dot
    }

    /// Specific heat at constant pressure.
    ///
    /// # Errors
    ///
    /// Propagates the thermo model's [`PropertyError`].
    pub fn cp(
        &self,
        thermo: &(impl HasCp<Fluid = Fluid> + ?Sized),
    ) -> Result<SpecificHeatCapacity, PropertyError> {
        thermo.cp(&self.state)
    }

    /// Dynamic viscosity.
    ///
    /// # Errors
    ///
    /// Propagates the thermo model's [`PropertyError`].
    pub fn viscosity(
        &self,
        thermo: &(impl HasViscosity<Fluid = Fluid> + ?Sized),
    ) -> Result<DynamicViscosity, PropertyError> {
        thermo.viscosity(&self.state)
    }

    /// Thermal conductivity.
    ///
    /// # Errors
    ///
    /// Propagates the thermo model's [`PropertyError`].
    pub fn conductivity(
        &self,
        thermo: &(impl HasThermalConductivity<Fluid = Fluid> + ?Sized),
    ) -> Result<ThermalConductivity, PropertyError> {
        thermo.thermal_conductivity(&self.state)
    }

    /// Prandtl number `cp·μ/k`.
    ///
    /// # Errors
    ///
    /// Propagates the thermo model's [`PropertyError`].
    pub fn prandtl<Thermo>(&self, thermo: &Thermo) -> Result<f64, PropertyError>
    where
        Thermo: HasCp<Fluid = Fluid> + HasViscosity + HasThermalConductivity + ?Sized,
    {
        let pr = self.cp(thermo)? * self.viscosity(thermo)? / self.conductivity(thermo)?;
        Ok(pr.get::<ratio>())
    }

    /// Saturation curve at this flow's pressure.
    ///
    /// # Errors
    ///
    /// Propagates the thermo model's [`PropertyError`].
    pub fn saturation(
        &self,
        thermo: &(impl HasSaturation<Fluid = Fluid> + ?Sized),
    ) -> Result<Saturation<Fluid>, PropertyError> {
        thermo.saturation(&self.state.fluid, self.pressure)
    }

    /// Phase of this flow, judged from its enthalpy against the saturation curve.
    ///
    /// # Errors
    ///
    /// Propagates the thermo model's [`PropertyError`].
    pub fn phase<Thermo>(&self, thermo: &Thermo) -> Result<Phase, PropertyError>
    where
        Thermo: HasSaturation<Fluid = Fluid> + HasEnthalpy + ?Sized,
    {
        Ok(match self.saturation_position(thermo)? {
            SaturationPosition::SinglePhase(phase) => phase,
            SaturationPosition::Dome(_) => Phase::TwoPhase,
            SaturationPosition::BelowDome => Phase::Liquid,
            SaturationPosition::AboveDome => Phase::Vapor,
        })
    }

    /// Vapor quality, if this flow is inside the vapor dome.
    ///
    /// # Errors
    ///
    /// Propagates the thermo model's [`PropertyError`].
    pub fn quality<Thermo>(&self, thermo: &Thermo) -> Result<Option<f64>, PropertyError>
    where
        Thermo: HasSaturation<Fluid = Fluid> + HasEnthalpy + ?Sized,
    {
        Ok(match self.saturation_position(thermo)? {
            SaturationPosition::Dome(x) => Some(x),
            _ => None,
        })
    }

    fn saturation_position<Thermo>(
        &self,
        thermo: &Thermo,
    ) -> Result<SaturationPosition, PropertyError>
    where
        Thermo: HasSaturation<Fluid = Fluid> + HasEnthalpy + ?Sized,
    {
        match self.saturation(thermo)? {
            Saturation::SinglePhase(phase) => Ok(SaturationPosition::SinglePhase(phase)),
            Saturation::TwoPhase { liquid, vapor } => {
                let h_l = thermo.enthalpy(&liquid)?;
                let h_v = thermo.enthalpy(&vapor)?;
                if h_v <= h_l {
                    return Err(PropertyError::out_of_domain(format!(
                        "no latent heat at {:?}",
                        self.pressure
                    )));
                }
                Ok(SaturationPosition::of(self.enthalpy, h_l, h_v))
            }
        }
    }
}

/// Where an enthalpy sits relative to the vapor dome at one pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum SaturationPosition {
    SinglePhase(Phase),
    BelowDome,
    Dome(f64),
    AboveDome,
}

impl SaturationPosition {
    pub(super) fn of(h: SpecificEnthalpy, h_l: SpecificEnthalpy, h_v: SpecificEnthalpy) -> Self {
        if h < h_l {
            Self::BelowDome
        } else if h > h_v {
            Self::AboveDome
        } else {
            Self::Dome(((h - h_l) / (h_v - h_l)).get::<ratio>())
        }
    }
}
