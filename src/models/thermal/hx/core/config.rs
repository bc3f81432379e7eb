use std::{collections::HashMap, fmt, sync::Arc};

use twine_solvers::equation::bisection;
use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin as delta_kelvin};

use super::{
    ConfigError,
    correlation::{
        AkersDemingCrosser, ChisholmWanniarachchi, Correlation, Gnielinski, HanLeeKim,
        HomogeneousFriction, YanLin,
    },
    geometry::GeometryClass,
    phase::{PhaseSelector, RegionPhase, Side, Target},
};

type Key = (GeometryClass, PhaseSelector, Target, Side);

/// Correlation registry and solver settings shared by heat exchanger units.
///
/// Build one with [`Config::builder`] or start from [`Config::default`], then
/// share it between units behind an `Arc`.
#[derive(Clone)]
pub struct Config {
    methods: HashMap<Key, Arc<dyn Correlation>>,

    /// Relative tolerance on the sizing residual and attribute.
    pub tol_rel: f64,

    /// Absolute tolerance on the sizing attribute.
    pub tol_abs_x: f64,

    /// Maximum bisection iterations for sizing.
    pub max_iters: usize,

    /// Maximum fixed-point iterations for heat-flux dependent correlations.
    pub heat_flux_max_iters: usize,

    /// Relative tolerance for the boundary energy balance.
    pub balance_tolerance: f64,

    /// Largest single-phase temperature change within one region.
    pub div_temperature: Option<TemperatureInterval>,

    /// Largest two-phase quality change within one region.
    pub div_quality: Option<f64>,

    /// Include the acceleration pressure drop.
    pub dp_acceleration: bool,

    /// Include the static head on vertical sides.
    pub dp_head: bool,

    /// Include port losses when the unit has port diameters.
    pub dp_port: bool,

    /// Port entry loss coefficient.
    pub port_factor_in: f64,

    /// Port exit loss coefficient.
    pub port_factor_out: f64,

    /// Gravitational acceleration, m/s².
    pub gravity: f64,
}

impl Config {
    /// Starts an empty registry with default settings.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            config: Self::empty(),
        }
    }

    fn empty() -> Self {
        Self {
            methods: HashMap::new(),
            tol_rel: 1e-7,
            tol_abs_x: 1e-10,
            max_iters: 100,
            heat_flux_max_iters: 50,
            balance_tolerance: 1e-3,
            div_temperature: Some(TemperatureInterval::new::<delta_kelvin>(5.0)),
            div_quality: Some(0.1),
            dp_acceleration: false,
            dp_head: false,
            dp_port: false,
            port_factor_in: 1.0,
            port_factor_out: 0.4,
            gravity: 9.806_65,
        }
    }

    /// Resolves the correlation for a key.
    ///
    /// Tries the exact phase, then the phase's group, then [`PhaseSelector::Any`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCorrelation`] if nothing is registered.
    pub fn method(
        &self,
        class: GeometryClass,
        phase: RegionPhase,
        target: Target,
        side: Side,
    ) -> Result<&Arc<dyn Correlation>, ConfigError> {
        self.resolve(class, phase, target, side)
            .map(|(_, method)| method)
            .ok_or(ConfigError::MissingCorrelation {
                class,
                phase,
                target,
                side,
            })
    }

    /// The registration a lookup lands on and the selector it was stored under.
    fn resolve(
        &self,
        class: GeometryClass,
        phase: RegionPhase,
        target: Target,
        side: Side,
    ) -> Option<(PhaseSelector, &Arc<dyn Correlation>)> {
        [
            PhaseSelector::Exact(phase),
            phase.group(),
            PhaseSelector::Any,
        ]
        .into_iter()
        .find_map(|selector| {
            self.methods
                .get(&(class, selector, target, side))
                .map(|method| (selector, method))
        })
    }

    /// Converts the sizing settings into a bisection solver configuration.
    ///
    /// The sizing residual is relative, so `tol_rel` also bounds it.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.tol_abs_x,
            x_rel_tol: self.tol_rel,
            residual_tol: self.tol_rel,
        }
    }

    /// Checks that every registration supports the phases it serves, that
    /// each registered geometry class has single-phase coverage, and that the
    /// subdivision limits are usable.
    ///
    /// A wildcard registration serves only the phases no narrower selector
    /// claims for the same key.
    fn validate(&self) -> Result<(), ConfigError> {
        self.check_subdivision()?;

        for (&(class, selector, target, side), method) in &self.methods {
            for phase in selector.phases() {
                let served = self
                    .resolve(class, phase, target, side)
                    .is_some_and(|(by, _)| by == selector);
                if served && !method.supports(class, phase, target) {
                    return Err(ConfigError::IncompatibleCorrelation {
                        name: method.name(),
                        class,
                        phase,
                        target,
                    });
                }
            }
        }

        let mut classes: Vec<GeometryClass> = self.methods.keys().map(|key| key.0).collect();
        classes.sort_by_key(|class| *class as u8);
        classes.dedup();

        for class in classes {
            for side in Side::BOTH {
                for target in Target::BOTH {
                    for phase in RegionPhase::SINGLE_PHASE {
                        self.method(class, phase, target, side)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Checks that enabled subdivision limits are positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSubdivision`] for a zero, negative, or
    /// non-finite limit.
    pub fn check_subdivision(&self) -> Result<(), ConfigError> {
        let usable = |value: f64| value > 0.0 && value.is_finite();
        if let Some(limit) = self.div_temperature {
            let value = limit.get::<delta_kelvin>();
            if !usable(value) {
                return Err(ConfigError::InvalidSubdivision {
                    limit: "temperature",
                    value,
                });
            }
        }
        if let Some(value) = self.div_quality {
            if !usable(value) {
                return Err(ConfigError::InvalidSubdivision {
                    limit: "quality",
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for Config {
    /// Registers the built-in correlations for every geometry class.
    fn default() -> Self {
        let chevron = [GeometryClass::CorrugatedChevron];
        let plain = [GeometryClass::PlainPlate, GeometryClass::TubeInTube];

        Self::builder()
            .set_method(
                Arc::new(ChisholmWanniarachchi),
                &chevron,
                &[PhaseSelector::SinglePhase],
                &Target::BOTH,
                &Side::BOTH,
            )
            .set_method(
                Arc::new(YanLin),
                &chevron,
                &[RegionPhase::TwoPhaseEvaporating.into()],
                &Target::BOTH,
                &Side::BOTH,
            )
            .set_method(
                Arc::new(HanLeeKim),
                &chevron,
                &[RegionPhase::TwoPhaseCondensing.into()],
                &Target::BOTH,
                &Side::BOTH,
            )
            .set_method(
                Arc::new(Gnielinski),
                &plain,
                &[PhaseSelector::SinglePhase],
                &Target::BOTH,
                &Side::BOTH,
            )
            .set_method(
                Arc::new(AkersDemingCrosser),
                &plain,
                &[RegionPhase::TwoPhaseCondensing.into()],
                &[Target::Heat],
                &Side::BOTH,
            )
            .set_method(
                Arc::new(HomogeneousFriction),
                &plain,
                &[PhaseSelector::TwoPhase],
                &[Target::Friction],
                &Side::BOTH,
            )
            .config
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("methods", &self.methods.len())
            .field("tol_rel", &self.tol_rel)
            .field("max_iters", &self.max_iters)
            .field("div_temperature", &self.div_temperature)
            .field("div_quality", &self.div_quality)
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`Config::builder`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Registers `method` for every combination of the given keys.
    ///
    /// Later registrations replace earlier ones for the same key.
    pub fn set_method(
        mut self,
        method: Arc<dyn Correlation>,
        classes: &[GeometryClass],
        phases: &[PhaseSelector],
        targets: &[Target],
        sides: &[Side],
    ) -> Self {
        for &class in classes {
            for &phase in phases {
                for &target in targets {
                    for &side in sides {
                        self.config
                            .methods
                            .insert((class, phase, target, side), Arc::clone(&method));
                    }
                }
            }
        }
        self
    }

    /// Sets the subdivision limits.
    pub fn subdivision(
        mut self,
        temperature: Option<TemperatureInterval>,
        quality: Option<f64>,
    ) -> Self {
        self.config.div_temperature = temperature;
        self.config.div_quality = quality;
        self
    }

    /// Validates the registry and returns the config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IncompatibleCorrelation`] if a correlation is
    /// registered under a key it does not support,
    /// [`ConfigError::MissingCorrelation`] if a registered geometry class lacks
    /// single-phase heat or friction coverage on either side, or
    /// [`ConfigError::InvalidSubdivision`] for an unusable subdivision limit.
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
