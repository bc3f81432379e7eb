//! Splits a unit into regions of uniform phase regime.
//!
//! Positions along the unit are measured by the duty fraction `f ∈ [0, 1]` in
//! the working-fluid flow direction. Both sides' enthalpies and pressures are
//! linear in `f`. The secondary fluid enters at `f = 1` for counter and cross
//! flow and at `f = 0` for parallel flow.

use tracing::{debug, trace};
use uom::si::{
    f64::{Pressure, TemperatureInterval},
    ratio::ratio,
    temperature_interval::kelvin as delta_kelvin,
};

use crate::support::{
    thermo::{Phase, Saturation, State},
    units::{SpecificEnthalpy, TemperatureDifference},
};

use super::{
    ConfigError, UnitError,
    config::Config,
    flow_state::{FlowState, SaturationPosition},
    phase::{RegionPhase, Side},
    traits::HxThermoModel,
    unit::{BoundaryFlows, FlowSense},
};

/// Two fractions closer than this are the same break point.
const FRACTION_EPS: f64 = 1e-9;

/// Saturated end states bounding a two-phase side.
#[derive(Debug, Clone, PartialEq)]
pub struct SaturatedStates<Fluid> {
    pub liquid: State<Fluid>,
    pub vapor: State<Fluid>,
    pub h_liquid: SpecificEnthalpy,
    pub h_vapor: SpecificEnthalpy,
}

/// One side of a region.
///
/// `start` and `end` are the states at the region's lower and upper duty
/// fractions, whichever way the fluid flows.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSide<Fluid> {
    pub start: FlowState<Fluid>,
    pub end: FlowState<Fluid>,
    pub phase: RegionPhase,
    /// Present for two-phase sides.
    pub saturated: Option<SaturatedStates<Fluid>>,
    /// The fluid flows from `end` to `start`.
    pub reversed: bool,
}

impl<Fluid> RegionSide<Fluid> {
    #[must_use]
    pub fn inlet(&self) -> &FlowState<Fluid> {
        if self.reversed { &self.end } else { &self.start }
    }

    #[must_use]
    pub fn outlet(&self) -> &FlowState<Fluid> {
        if self.reversed { &self.start } else { &self.end }
    }

    /// Vapor quality at `h`, for two-phase sides.
    pub(super) fn quality_at(&self, h: SpecificEnthalpy) -> Option<f64> {
        self.saturated
            .as_ref()
            .map(|sat| ((h - sat.h_liquid) / (sat.h_vapor - sat.h_liquid)).get::<ratio>())
    }
}

/// A slice of the unit where both sides stay in one phase regime.
#[derive(Debug, Clone, PartialEq)]
pub struct Region<Wf, Sf> {
    pub wf: RegionSide<Wf>,
    pub sf: RegionSide<Sf>,
    pub fraction_start: f64,
    pub fraction_end: f64,
}

impl<Wf, Sf> Region<Wf, Sf> {
    /// Fraction of the unit duty carried by this region.
    #[must_use]
    pub fn duty_fraction(&self) -> f64 {
        self.fraction_end - self.fraction_start
    }
}

/// Linear profile of one side along the duty fraction.
struct Profile<'a, Fluid> {
    inlet: &'a FlowState<Fluid>,
    outlet: &'a FlowState<Fluid>,
    reversed: bool,
}

impl<'a, Fluid: Clone> Profile<'a, Fluid> {
    fn new(inlet: &'a FlowState<Fluid>, outlet: &'a FlowState<Fluid>, reversed: bool) -> Self {
        Self {
            inlet,
            outlet,
            reversed,
        }
    }

    /// Position along this side's own flow direction.
    ///
    /// The mapping is its own inverse, so it also converts a position back to
    /// a duty fraction.
    fn progress(&self, f: f64) -> f64 {
        if self.reversed { 1.0 - f } else { f }
    }

    fn enthalpy(&self, f: f64) -> SpecificEnthalpy {
        let s = self.progress(f);
        self.inlet.enthalpy() + s * (self.outlet.enthalpy() - self.inlet.enthalpy())
    }

    fn pressure(&self, f: f64) -> Pressure {
        let s = self.progress(f);
        self.inlet.pressure() + s * (self.outlet.pressure() - self.inlet.pressure())
    }

    fn rising(&self) -> bool {
        self.outlet.enthalpy() > self.inlet.enthalpy()
    }

    /// Flow state at fraction `f`, reusing the boundary flows at the ends.
    fn state_at(
        &self,
        thermo: &impl HxThermoModel<Fluid>,
        side: Side,
        f: f64,
    ) -> Result<FlowState<Fluid>, UnitError> {
        let s = self.progress(f);
        if s <= 0.0 {
            return Ok(self.inlet.clone());
        }
        if s >= 1.0 {
            return Ok(self.outlet.clone());
        }

        let (p, h) = (self.pressure(f), self.enthalpy(f));
        FlowState::at(
            thermo,
            self.inlet.fluid().clone(),
            p,
            h,
            self.inlet.constrained_mass_rate(),
        )
        .map_err(|err| {
            UnitError::thermo_failed(format!("{side} state at p = {p:?}, h = {h:?}"), err)
        })
    }

    /// Saturated enthalpies at the inlet pressure, if the fluid has a dome there.
    fn dome(
        &self,
        thermo: &impl HxThermoModel<Fluid>,
        side: Side,
    ) -> Result<Option<SaturatedStates<Fluid>>, UnitError> {
        match dome_at(thermo, side, self.inlet.fluid(), self.inlet.pressure())? {
            Dome::Present(sat) => Ok(Some(sat)),
            Dome::Absent(_) => Ok(None),
        }
    }

    /// Break fractions where this side crosses a saturation enthalpy.
    fn break_points(&self, dome: Option<&SaturatedStates<Fluid>>) -> Vec<f64> {
        let Some(dome) = dome else {
            return Vec::new();
        };

        let h_in = self.inlet.enthalpy();
        let dh = self.outlet.enthalpy() - h_in;
        [dome.h_liquid, dome.h_vapor]
            .into_iter()
            .map(|h| ((h - h_in) / dh).get::<ratio>())
            .filter(|s| *s > FRACTION_EPS && *s < 1.0 - FRACTION_EPS)
            .map(|s| self.progress(s))
            .collect()
    }

    /// Phase regime of the side over `range`, judged at its midpoint.
    fn classify(
        &self,
        thermo: &impl HxThermoModel<Fluid>,
        side: Side,
        (f0, f1): (f64, f64),
    ) -> Result<(RegionPhase, Option<SaturatedStates<Fluid>>), UnitError> {
        let f_mid = 0.5 * (f0 + f1);
        let h_mid = self.enthalpy(f_mid);

        let sat = match dome_at(thermo, side, self.inlet.fluid(), self.pressure(f_mid))? {
            Dome::Absent(Phase::Vapor) => return Ok((RegionPhase::Vapor, None)),
            Dome::Absent(Phase::Supercritical) => return Ok((RegionPhase::Supercritical, None)),
            Dome::Absent(_) => return Ok((RegionPhase::Liquid, None)),
            Dome::Present(sat) => sat,
        };

        Ok(match SaturationPosition::of(h_mid, sat.h_liquid, sat.h_vapor) {
            SaturationPosition::BelowDome => (RegionPhase::Liquid, None),
            SaturationPosition::AboveDome => (RegionPhase::Vapor, None),
            SaturationPosition::SinglePhase(_) | SaturationPosition::Dome(_) => {
                let phase = if self.rising() {
                    RegionPhase::TwoPhaseEvaporating
                } else {
                    RegionPhase::TwoPhaseCondensing
                };
                (phase, Some(sat))
            }
        })
    }

    /// Number of equal-duty slices this side needs over `range`.
    fn steps(
        &self,
        config: &Config,
        thermo: &impl HxThermoModel<Fluid>,
        side: Side,
        phase: RegionPhase,
        saturated: Option<&SaturatedStates<Fluid>>,
        (f0, f1): (f64, f64),
    ) -> Result<usize, UnitError> {
        let steps = |change: f64, limit: f64| {
            ((change.abs() / limit) * (1.0 - 1e-9)).ceil().max(1.0) as usize
        };

        if phase.is_two_phase() {
            let (Some(limit), Some(sat)) = (config.div_quality, saturated) else {
                return Ok(1);
            };
            let dx = ((self.enthalpy(f1) - self.enthalpy(f0)) / (sat.h_vapor - sat.h_liquid))
                .get::<ratio>();
            return Ok(steps(dx, limit));
        }

        let Some(limit) = config.div_temperature else {
            return Ok(1);
        };
        let t0 = self.state_at(thermo, side, f0)?.temperature();
        let t1 = self.state_at(thermo, side, f1)?.temperature();
        let dt: TemperatureInterval = t1.minus(t0);
        Ok(steps(dt.get::<delta_kelvin>(), limit.get::<delta_kelvin>()))
    }
}

/// The saturation curve at one pressure, resolved to enthalpies.
enum Dome<Fluid> {
    Absent(Phase),
    Present(SaturatedStates<Fluid>),
}

fn dome_at<Fluid>(
    thermo: &impl HxThermoModel<Fluid>,
    side: Side,
    fluid: &Fluid,
    pressure: Pressure,
) -> Result<Dome<Fluid>, UnitError> {
    let saturation = thermo
        .saturation(fluid, pressure)
        .map_err(|err| {
            UnitError::thermo_failed(format!("{side} saturation at {pressure:?}"), err)
        })?;

    match saturation {
        Saturation::SinglePhase(phase) => Ok(Dome::Absent(phase)),
        Saturation::TwoPhase { liquid, vapor } => {
            let enthalpy = |state: &State<Fluid>| {
                thermo.enthalpy(state).map_err(|err| {
                    UnitError::thermo_failed(format!("{side} saturated enthalpy"), err)
                })
            };
            Ok(Dome::Present(SaturatedStates {
                h_liquid: enthalpy(&liquid)?,
                h_vapor: enthalpy(&vapor)?,
                liquid,
                vapor,
            }))
        }
    }
}

/// Splits the unit bounded by `flows` into regions in working-fluid flow order.
///
/// # Errors
///
/// Returns [`ConfigError::TemperatureCrossover`] if the hot side is not hotter
/// than the cold side at a region boundary, and propagates thermo model
/// failures.
pub(super) fn discretize<Wf: Clone, Sf: Clone>(
    flows: &BoundaryFlows<'_, Wf, Sf>,
    sense: FlowSense,
    config: &Config,
    thermo_wf: &impl HxThermoModel<Wf>,
    thermo_sf: &impl HxThermoModel<Sf>,
) -> Result<Vec<Region<Wf, Sf>>, UnitError> {
    config.check_subdivision()?;

    let wf = Profile::new(flows.wf_in, flows.wf_out, false);
    let sf = Profile::new(flows.sf_in, flows.sf_out, sense.sf_reversed());

    let dome_wf = wf.dome(thermo_wf, Side::WorkingFluid)?;
    let dome_sf = sf.dome(thermo_sf, Side::SecondaryFluid)?;

    let mut fractions = vec![0.0, 1.0];
    fractions.extend(wf.break_points(dome_wf.as_ref()));
    fractions.extend(sf.break_points(dome_sf.as_ref()));
    fractions.sort_by(f64::total_cmp);
    fractions.dedup_by(|a, b| (*a - *b).abs() < FRACTION_EPS);
    let breaks = fractions.len() - 2;

    let wf_hot = flows.wf_is_hot();
    let mut regions = Vec::new();

    for pair in fractions.windows(2) {
        let (f0, f1) = (pair[0], pair[1]);
        let range = (f0, f1);
        let (phase_wf, sat_wf) = wf.classify(thermo_wf, Side::WorkingFluid, range)?;
        let (phase_sf, sat_sf) = sf.classify(thermo_sf, Side::SecondaryFluid, range)?;

        let slices_wf =
            wf.steps(config, thermo_wf, Side::WorkingFluid, phase_wf, sat_wf.as_ref(), range)?;
        let slices_sf =
            sf.steps(config, thermo_sf, Side::SecondaryFluid, phase_sf, sat_sf.as_ref(), range)?;
        let slices = slices_wf.max(slices_sf).max(1);
        trace!(f0, f1, %phase_wf, %phase_sf, slices, "region");

        let mut start_wf = wf.state_at(thermo_wf, Side::WorkingFluid, f0)?;
        let mut start_sf = sf.state_at(thermo_sf, Side::SecondaryFluid, f0)?;
        check_crossover(&start_wf, &start_sf, wf_hot, f0)?;

        for k in 0..slices {
            let lo = f0 + (f1 - f0) * k as f64 / slices as f64;
            let hi = if k + 1 == slices {
                f1
            } else {
                f0 + (f1 - f0) * (k + 1) as f64 / slices as f64
            };

            let end_wf = wf.state_at(thermo_wf, Side::WorkingFluid, hi)?;
            let end_sf = sf.state_at(thermo_sf, Side::SecondaryFluid, hi)?;
            check_crossover(&end_wf, &end_sf, wf_hot, hi)?;

            regions.push(Region {
                wf: RegionSide {
                    start: start_wf,
                    end: end_wf.clone(),
                    phase: phase_wf,
                    saturated: sat_wf.clone(),
                    reversed: false,
                },
                sf: RegionSide {
                    start: start_sf,
                    end: end_sf.clone(),
                    phase: phase_sf,
                    saturated: sat_sf.clone(),
                    reversed: sf.reversed,
                },
                fraction_start: lo,
                fraction_end: hi,
            });

            start_wf = end_wf;
            start_sf = end_sf;
        }
    }

    debug!(regions = regions.len(), breaks, "discretized unit");
    Ok(regions)
}

fn check_crossover<Wf, Sf>(
    wf: &FlowState<Wf>,
    sf: &FlowState<Sf>,
    wf_hot: bool,
    fraction: f64,
) -> Result<(), ConfigError> {
    let delta_t = if wf_hot {
        wf.temperature().minus(sf.temperature())
    } else {
        sf.temperature().minus(wf.temperature())
    };

    if delta_t.get::<delta_kelvin>() > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::TemperatureCrossover { fraction, delta_t })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{MassRate, ThermodynamicTemperature},
        mass_rate::kilogram_per_second,
        pressure::pascal,
        thermodynamic_temperature::{degree_celsius, kelvin},
    };

    use crate::models::thermal::hx::core::{
        Config,
        test_support::{Refrigerant, TestRefrigerant, air, water},
    };
    use crate::support::thermo::fluid::{Air, Water};

    fn water_flow(celsius: f64, kg_per_s: f64) -> FlowState<Water> {
        FlowState::from_pressure_temperature(
            &water(),
            Water,
            Pressure::new::<pascal>(2e5),
            ThermodynamicTemperature::new::<degree_celsius>(celsius),
            MassRate::new::<kilogram_per_second>(kg_per_s),
        )
        .expect("water flow should succeed")
    }

    fn no_subdivision() -> Config {
        let mut config = Config::default();
        config.div_temperature = None;
        config.div_quality = None;
        config
    }

    #[test]
    fn single_phase_liquids_form_one_region() {
        let (wf_in, wf_out) = (water_flow(60.0, 0.3), water_flow(40.0, 0.3));
        let (sf_in, sf_out) = (water_flow(20.0, 0.4), water_flow(35.0, 0.4));
        let flows = BoundaryFlows {
            wf_in: &wf_in,
            wf_out: &wf_out,
            sf_in: &sf_in,
            sf_out: &sf_out,
        };

        let regions =
            discretize(&flows, FlowSense::Counter, &no_subdivision(), &water(), &water())
                .expect("discretization should succeed");

        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert_eq!(region.wf.phase, RegionPhase::Liquid);
        assert_eq!(region.sf.phase, RegionPhase::Liquid);
        assert_relative_eq!(region.duty_fraction(), 1.0);
        assert_eq!(region.sf.inlet(), &sf_in);
        assert_eq!(region.sf.start, sf_out);
    }

    #[test]
    fn subdivision_limits_temperature_change() {
        let (wf_in, wf_out) = (water_flow(60.0, 0.3), water_flow(40.0, 0.3));
        let (sf_in, sf_out) = (water_flow(20.0, 0.4), water_flow(35.0, 0.4));
        let flows = BoundaryFlows {
            wf_in: &wf_in,
            wf_out: &wf_out,
            sf_in: &sf_in,
            sf_out: &sf_out,
        };

        // 20 K on the working fluid at 5 K per slice.
        let regions = discretize(&flows, FlowSense::Counter, &Config::default(), &water(), &water())
            .expect("discretization should succeed");
        assert_eq!(regions.len(), 4);

        let total: f64 = regions.iter().map(Region::duty_fraction).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        for pair in regions.windows(2) {
            assert_eq!(pair[0].wf.end, pair[1].wf.start);
            assert_eq!(pair[0].sf.end, pair[1].sf.start);
        }
    }

    #[test]
    fn parallel_flow_starts_at_secondary_inlet() {
        let (wf_in, wf_out) = (water_flow(80.0, 0.3), water_flow(60.0, 0.3));
        let (sf_in, sf_out) = (water_flow(20.0, 0.4), water_flow(35.0, 0.4));
        let flows = BoundaryFlows {
            wf_in: &wf_in,
            wf_out: &wf_out,
            sf_in: &sf_in,
            sf_out: &sf_out,
        };

        let regions =
            discretize(&flows, FlowSense::Parallel, &no_subdivision(), &water(), &water())
                .expect("discretization should succeed");
        assert_eq!(regions[0].sf.start, sf_in);
        assert!(!regions[0].sf.reversed);
    }

    #[test]
    fn crossover_is_rejected() {
        let (wf_in, wf_out) = (water_flow(60.0, 0.3), water_flow(40.0, 0.3));
        let (sf_in, sf_out) = (water_flow(30.0, 0.4), water_flow(45.0, 0.4));
        let flows = BoundaryFlows {
            wf_in: &wf_in,
            wf_out: &wf_out,
            sf_in: &sf_in,
            sf_out: &sf_out,
        };

        let result = discretize(&flows, FlowSense::Parallel, &no_subdivision(), &water(), &water());
        assert!(matches!(
            result,
            Err(UnitError::Config(ConfigError::TemperatureCrossover { .. }))
        ));
    }

    #[test]
    fn evaporator_splits_at_the_dome() {
        let refrigerant = TestRefrigerant::new();
        let p = Pressure::new::<pascal>(2e5);
        let m_wf = MassRate::new::<kilogram_per_second>(0.01);
        let wf_in = FlowState::from_pressure_temperature(
            &refrigerant,
            Refrigerant,
            p,
            ThermodynamicTemperature::new::<kelvin>(310.0),
            m_wf,
        )
        .unwrap();
        let wf_out = FlowState::from_pressure_temperature(
            &refrigerant,
            Refrigerant,
            p,
            ThermodynamicTemperature::new::<kelvin>(330.0),
            m_wf,
        )
        .unwrap();

        let gas = air();
        let p_air = Pressure::new::<pascal>(111_600.0);
        let m_sf = MassRate::new::<kilogram_per_second>(0.09);
        let sf_in = FlowState::from_pressure_temperature(
            &gas,
            Air,
            p_air,
            ThermodynamicTemperature::new::<kelvin>(400.0),
            m_sf,
        )
        .unwrap();
        let q = m_wf * (wf_out.enthalpy() - wf_in.enthalpy());
        let sf_out =
            FlowState::from_pressure_enthalpy(&gas, Air, p_air, sf_in.enthalpy() - q / m_sf, m_sf)
                .unwrap();

        let flows = BoundaryFlows {
            wf_in: &wf_in,
            wf_out: &wf_out,
            sf_in: &sf_in,
            sf_out: &sf_out,
        };
        let regions =
            discretize(&flows, FlowSense::Counter, &no_subdivision(), &refrigerant, &gas)
                .expect("discretization should succeed");

        let phases: Vec<_> = regions.iter().map(|region| region.wf.phase).collect();
        assert_eq!(
            phases,
            [
                RegionPhase::Liquid,
                RegionPhase::TwoPhaseEvaporating,
                RegionPhase::Vapor
            ]
        );
        assert!(regions.iter().all(|region| region.sf.phase == RegionPhase::Vapor));

        let (h_l, _) = refrigerant.saturation_enthalpies(p);
        assert_relative_eq!(regions[0].wf.end.enthalpy().value, h_l.value, max_relative = 1e-9);

        let with_quality =
            discretize(&flows, FlowSense::Counter, &Config::default(), &refrigerant, &gas)
                .expect("discretization should succeed");
        let two_phase = with_quality
            .iter()
            .filter(|region| region.wf.phase.is_two_phase())
            .count();
        assert_eq!(two_phase, 10);
    }

    #[test]
    fn rejects_unusable_subdivision_limits() {
        let (wf_in, wf_out) = (water_flow(60.0, 0.3), water_flow(40.0, 0.3));
        let (sf_in, sf_out) = (water_flow(20.0, 0.4), water_flow(35.0, 0.4));
        let flows = BoundaryFlows {
            wf_in: &wf_in,
            wf_out: &wf_out,
            sf_in: &sf_in,
            sf_out: &sf_out,
        };

        let mut config = Config::default();
        config.div_temperature = Some(TemperatureInterval::new::<delta_kelvin>(0.0));
        assert!(matches!(
            discretize(&flows, FlowSense::Counter, &config, &water(), &water()),
            Err(UnitError::Config(ConfigError::InvalidSubdivision {
                limit: "temperature",
                ..
            }))
        ));

        let mut config = Config::default();
        config.div_quality = Some(f64::NAN);
        assert!(matches!(
            discretize(&flows, FlowSense::Counter, &config, &water(), &water()),
            Err(UnitError::Config(ConfigError::InvalidSubdivision {
                limit: "quality",
                ..
            }))
        ));
    }
}
