//! Evaluates one region: film coefficients, required area, flow length, and
//! pressure drop.
//!
//! The region is sized as a slice with uniform properties taken at its mid
//! state. Its duty is fixed by the boundary flows, so the only unknown is the
//! area needed to carry it:
//!
//! ```text
//! A_req = Q / (U · F · LMTD)
//! ```

use std::sync::Arc;

use tracing::trace;
use uom::{
    ConstZero,
    si::{
        acceleration::meter_per_second_squared,
        f64::{
            Acceleration, Area, HeatFluxDensity, HeatTransfer, Length, MassDensity, Power,
            Pressure, TemperatureInterval,
        },
        ratio::ratio,
    },
};

use crate::support::{
    hx::{
        CapacitanceRate, CapacityRatio, Effectiveness, NtuError, arrangement::CrossFlow,
        correction_factor, log_mean_temperature_difference,
    },
    thermo::{PropertyError, State},
    units::{AreaThermalResistance, MassFlux, TemperatureDifference},
};

use super::{
    ConfigError, UnitError,
    config::Config,
    correlation::{Correlation, CorrelationInput, FilmProperties, TwoPhaseProperties},
    discretize::{Region, RegionSide},
    flow_state::FlowState,
    geometry::Geometry,
    phase::{RegionPhase, Side, Target},
    traits::HxThermoModel,
    unit::FlowSense,
};

/// Pressure drop components of one side of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureDrop {
    pub friction: Pressure,
    pub acceleration: Pressure,
    pub head: Pressure,
}

impl PressureDrop {
    #[must_use]
    pub fn total(&self) -> Pressure {
        self.friction + self.acceleration + self.head
    }
}

/// Results of evaluating one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionResult {
    pub fraction_start: f64,
    pub fraction_end: f64,
    pub phase_wf: RegionPhase,
    pub phase_sf: RegionPhase,
    /// Heat delivered to the cold side within this region.
    pub duty: Power,
    pub h_wf: HeatTransfer,
    pub h_sf: HeatTransfer,
    /// Overall coefficient referenced to the nominal wall area.
    pub u: HeatTransfer,
    pub lmtd: TemperatureInterval,
    /// LMTD correction factor, 1 except for cross-flow.
    pub correction: f64,
    /// Required nominal wall area.
    pub area: Area,
    /// Flow length needed to provide `area`.
    pub length: Length,
    pub dp_wf: PressureDrop,
    pub dp_sf: PressureDrop,
}

/// Fixed channel description of one side of a unit.
#[derive(Debug, Clone, Copy)]
pub(super) struct SideChannel {
    pub side: Side,
    pub geometry: Geometry,
    pub hydraulic_diameter: Length,
    pub mass_flux: MassFlux,
    pub area_ratio: f64,
    pub fouling: AreaThermalResistance,
    pub vertical: bool,
}

impl SideChannel {
    fn input(&self, phase: RegionPhase, film: &SideFilm) -> CorrelationInput {
        CorrelationInput {
            geometry: self.geometry,
            phase,
            hydraulic_diameter: self.hydraulic_diameter,
            mass_flux: self.mass_flux,
            film: film.film,
            two_phase: film.two_phase,
            heat_flux: None,
        }
    }
}

/// Everything about a unit that stays fixed across its regions.
#[derive(Debug)]
pub(super) struct RegionContext<'a> {
    pub config: &'a Config,
    pub sense: FlowSense,
    pub wf: SideChannel,
    pub sf: SideChannel,
    /// Conduction resistance `t / (k · r_wall)`.
    pub wall_resistance: AreaThermalResistance,
    /// Actual nominal wall area of the unit.
    pub area: Area,
    pub area_per_length: Length,
    /// Heat delivered to the cold side by the whole unit.
    pub duty: Power,
    pub wf_hot: bool,
}

/// Film and bulk properties of one side at the region mid state.
#[derive(Debug, Clone, Copy)]
struct SideFilm {
    film: FilmProperties,
    two_phase: Option<TwoPhaseProperties>,
    /// Bulk density, homogeneous for two-phase sides.
    density: MassDensity,
}

impl RegionContext<'_> {
    /// Sizes region `index`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError`] if a correlation is missing or fails, a property
    /// evaluation fails, or a heat-flux dependent correlation does not settle.
    pub(super) fn evaluate<Wf: Clone, Sf: Clone>(
        &self,
        index: usize,
        region: &Region<Wf, Sf>,
        thermo_wf: &impl HxThermoModel<Wf>,
        thermo_sf: &impl HxThermoModel<Sf>,
    ) -> Result<RegionResult, UnitError> {
        let duty = self.duty * region.duty_fraction();

        let film_wf = side_film(thermo_wf, Side::WorkingFluid, &region.wf)?;
        let film_sf = side_film(thermo_sf, Side::SecondaryFluid, &region.sf)?;
        let input_wf = self.wf.input(region.wf.phase, &film_wf);
        let input_sf = self.sf.input(region.sf.phase, &film_sf);

        let lmtd = self.lmtd(region)?;
        let correction = self.correction(index, region, duty)?;

        let heat_wf = self.method(&self.wf, region.wf.phase, Target::Heat)?;
        let heat_sf = self.method(&self.sf, region.sf.phase, Target::Heat)?;
        let flux_dependent = heat_wf.heat_flux_dependent() || heat_sf.heat_flux_dependent();

        let mut flux: HeatFluxDensity = self.duty / self.area;
        let mut iters = 0;
        let (h_wf, h_sf, u, area) = loop {
            iters += 1;
            let h_wf = heat_wf.heat_transfer(&CorrelationInput {
                heat_flux: Some(flux),
                ..input_wf
            })?;
            let h_sf = heat_sf.heat_transfer(&CorrelationInput {
                heat_flux: Some(flux),
                ..input_sf
            })?;
            let u = self.overall_coefficient(h_wf, h_sf);
            let area: Area = duty / (u * correction * lmtd);

            if !flux_dependent {
                break (h_wf, h_sf, u, area);
            }

            let next: HeatFluxDensity = duty / area;
            let change = ((next - flux) / next).get::<ratio>().abs();
            flux = next;
            trace!(region = index, iters, change, "heat flux iteration");

            if change <= self.config.tol_rel {
                break (h_wf, h_sf, u, area);
            }
            if iters >= self.config.heat_flux_max_iters {
                return Err(UnitError::HeatFluxNotConverged {
                    region: index,
                    iters,
                });
            }
        };

        let length = area / self.area_per_length;
        let input_wf = CorrelationInput {
            heat_flux: Some(flux),
            ..input_wf
        };
        let input_sf = CorrelationInput {
            heat_flux: Some(flux),
            ..input_sf
        };
        let dp_wf = self.pressure_drop(&self.wf, &region.wf, &film_wf, &input_wf, length)?;
        let dp_sf = self.pressure_drop(&self.sf, &region.sf, &film_sf, &input_sf, length)?;

        trace!(
            region = index,
            phase_wf = %region.wf.phase,
            phase_sf = %region.sf.phase,
            area = area.value,
            length = length.value,
            "evaluated region"
        );

        Ok(RegionResult {
            fraction_start: region.fraction_start,
            fraction_end: region.fraction_end,
            phase_wf: region.wf.phase,
            phase_sf: region.sf.phase,
            duty,
            h_wf,
            h_sf,
            u,
            lmtd,
            correction,
            area,
            length,
            dp_wf,
            dp_sf,
        })
    }

    fn method(
        &self,
        channel: &SideChannel,
        phase: RegionPhase,
        target: Target,
    ) -> Result<&Arc<dyn Correlation>, ConfigError> {
        self.config
            .method(channel.geometry.class(), phase, target, channel.side)
    }

    fn overall_coefficient(&self, h_wf: HeatTransfer, h_sf: HeatTransfer) -> HeatTransfer {
        let (wf, sf) = (&self.wf, &self.sf);
        let resistance: AreaThermalResistance = 1.0 / (h_wf * wf.area_ratio)
            + wf.fouling / wf.area_ratio
            + self.wall_resistance
            + 1.0 / (h_sf * sf.area_ratio)
            + sf.fouling / sf.area_ratio;
        1.0 / resistance
    }

    /// Log-mean of the hot-minus-cold differences at the region boundaries.
    fn lmtd<Wf, Sf>(&self, region: &Region<Wf, Sf>) -> Result<TemperatureInterval, UnitError> {
        let delta = |wf: &FlowState<Wf>, sf: &FlowState<Sf>| {
            if self.wf_hot {
                wf.temperature().minus(sf.temperature())
            } else {
                sf.temperature().minus(wf.temperature())
            }
        };
        let dt_start = delta(&region.wf.start, &region.sf.start);
        let dt_end = delta(&region.wf.end, &region.sf.end);

        log_mean_temperature_difference(dt_start, dt_end).map_err(|_| {
            let (fraction, delta_t) = if dt_start <= dt_end {
                (region.fraction_start, dt_start)
            } else {
                (region.fraction_end, dt_end)
            };
            ConfigError::TemperatureCrossover { fraction, delta_t }.into()
        })
    }

    /// Cross-flow correction factor of a region, 1 for other arrangements.
    ///
    /// A side changing phase has an unbounded capacitance rate, which makes
    /// every arrangement equivalent.
    fn correction<Wf, Sf>(
        &self,
        index: usize,
        region: &Region<Wf, Sf>,
        duty: Power,
    ) -> Result<f64, UnitError> {
        if self.sense != FlowSense::Cross
            || region.wf.phase.is_two_phase()
            || region.sf.phase.is_two_phase()
        {
            return Ok(1.0);
        }

        // A side without duty in this region leaves nothing to correct.
        let (Some(c_wf), Some(c_sf)) = (capacitance_rate(&region.wf), capacitance_rate(&region.sf))
        else {
            return Ok(1.0);
        };

        let (hot_in, cold_in) = if self.wf_hot {
            (region.wf.inlet().temperature(), region.sf.inlet().temperature())
        } else {
            (region.sf.inlet().temperature(), region.wf.inlet().temperature())
        };
        let c_min = if c_wf <= c_sf { *c_wf } else { *c_sf };
        let q_max = c_min * hot_in.minus(cold_in);
        let eff = (duty / q_max).get::<ratio>();
        let cr = CapacityRatio::from_capacitance_rates([c_wf, c_sf]);

        cross_flow_correction(eff, cr).map_err(|source| UnitError::CorrectionFactor {
            region: index,
            source,
        })
    }

    fn pressure_drop<Fluid>(
        &self,
        channel: &SideChannel,
        side: &RegionSide<Fluid>,
        film: &SideFilm,
        input: &CorrelationInput,
        length: Length,
    ) -> Result<PressureDrop, UnitError> {
        let f = self
            .method(channel, side.phase, Target::Friction)?
            .friction_factor(input)?;
        let g = channel.mass_flux;
        let l_over_d = (length / channel.hydraulic_diameter).get::<ratio>();

        let friction: Pressure = 2.0 * f * l_over_d * g * g / film.density;

        let acceleration: Pressure = if self.config.dp_acceleration {
            g * g * (1.0 / side.outlet().density() - 1.0 / side.inlet().density())
        } else {
            Pressure::ZERO
        };

        let head: Pressure = if self.config.dp_head && channel.vertical {
            film.density
                * Acceleration::new::<meter_per_second_squared>(self.config.gravity)
                * length
        } else {
            Pressure::ZERO
        };

        Ok(PressureDrop {
            friction,
            acceleration,
            head,
        })
    }
}

/// LMTD correction factor of an unmixed/unmixed cross-flow slice.
///
/// # Errors
///
/// Returns [`NtuError::Unreachable`] for an effectiveness outside `[0, 1)`.
fn cross_flow_correction(eff: f64, cr: CapacityRatio) -> Result<f64, NtuError> {
    let effectiveness = Effectiveness::new(eff).map_err(|_| NtuError::Unreachable {
        effectiveness: eff,
        capacity_ratio: cr.get::<ratio>(),
    })?;
    correction_factor(&CrossFlow, effectiveness, cr)
}

/// Effective capacitance rate `ṁ·|Δh|/|ΔT|` of one side over a region.
fn capacitance_rate<Fluid>(side: &RegionSide<Fluid>) -> Option<CapacitanceRate> {
    let q = side.start.mass_rate() * (side.end.enthalpy() - side.start.enthalpy());
    let dt = side.end.temperature().minus(side.start.temperature());
    CapacitanceRate::from_heat_rate(q, dt).ok()
}

fn side_film<Fluid: Clone>(
    thermo: &impl HxThermoModel<Fluid>,
    side: Side,
    region: &RegionSide<Fluid>,
) -> Result<SideFilm, UnitError> {
    let h_mid = (region.start.enthalpy() + region.end.enthalpy()) * 0.5;

    match &region.saturated {
        Some(sat) if region.phase.is_two_phase() => {
            let liquid = film_at(thermo, side, &sat.liquid, "saturated liquid")?;
            let vapor = film_at(thermo, side, &sat.vapor, "saturated vapor")?;
            let quality = region.quality_at(h_mid).unwrap_or(0.0).clamp(0.0, 1.0);
            let density = 1.0 / (quality / vapor.density + (1.0 - quality) / liquid.density);

            Ok(SideFilm {
                film: liquid,
                two_phase: Some(TwoPhaseProperties {
                    quality,
                    vapor,
                    latent_heat: sat.h_vapor - sat.h_liquid,
                }),
                density,
            })
        }
        _ => {
            let p_mid = (region.start.pressure() + region.end.pressure()) * 0.5;
            let mid = FlowState::at(
                thermo,
                region.start.fluid().clone(),
                p_mid,
                h_mid,
                region.start.constrained_mass_rate(),
            )
            .map_err(|err| UnitError::thermo_failed(format!("{side} mid state"), err))?;
            let film = film_at(thermo, side, mid.state(), "mid state")?;

            Ok(SideFilm {
                film,
                two_phase: None,
                density: film.density,
            })
        }
    }
}

fn film_at<Fluid>(
    thermo: &impl HxThermoModel<Fluid>,
    side: Side,
    state: &State<Fluid>,
    what: &str,
) -> Result<FilmProperties, UnitError> {
    let failed =
        |err: PropertyError| UnitError::thermo_failed(format!("{side} {what} properties"), err);
    Ok(FilmProperties {
        density: state.density,
        cp: thermo.cp(state).map_err(failed)?,
        viscosity: thermo.viscosity(state).map_err(failed)?,
        conductivity: thermo.thermal_conductivity(state).map_err(failed)?,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{
        f64::{MassRate, ThermodynamicTemperature},
        heat_transfer::watt_per_square_meter_kelvin,
        mass_rate::kilogram_per_second,
        pressure::pascal,
        temperature_interval::kelvin,
        thermodynamic_temperature,
    };

    use crate::models::thermal::hx::core::{
        FlowConfig, HxUnit, UnitDesign, UnitPerformance, UnitUpdate,
        test_support::{air, plate_design, water, water_flow, water_flows},
    };
    use crate::support::thermo::fluid::{Air, Water};

    use super::*;

    fn evaluate_design(
        design: UnitDesign,
        config: Config,
        flows: UnitUpdate<Water, Water>,
    ) -> UnitPerformance {
        let mut config = config;
        config.div_temperature = None;

        let mut unit = HxUnit::new(design, Arc::new(config)).expect("unit should succeed");
        unit.update(flows).expect("update should succeed");
        unit.evaluate(&water(), &water())
            .expect("evaluation should succeed")
    }

    fn single_region(sense: FlowSense, config: Config) -> UnitPerformance {
        let mut design = plate_design(23, 0.25);
        design.flow = FlowConfig {
            sense,
            ..design.flow
        };
        evaluate_design(design, config, water_flows())
    }

    fn log_mean(dt_a: f64, dt_b: f64) -> f64 {
        (dt_a - dt_b) / (dt_a / dt_b).ln()
    }

    #[test]
    fn area_closes_the_rate_equation() {
        let performance = single_region(FlowSense::Counter, Config::default());
        assert_eq!(performance.regions.len(), 1);

        let region = &performance.regions[0];
        assert_relative_eq!(region.correction, 1.0);
        assert_relative_eq!(
            region.lmtd.get::<kelvin>(),
            log_mean(25.0, 20.0),
            max_relative = 1e-9
        );

        let area: Area = region.duty / (region.u * region.lmtd);
        assert_relative_eq!(area.value, region.area.value, max_relative = 1e-12);
        assert!(region.u < region.h_wf && region.u < region.h_sf);
    }

    #[test]
    fn cross_flow_needs_more_area() {
        let counter = single_region(FlowSense::Counter, Config::default());
        let cross = single_region(FlowSense::Cross, Config::default());

        let correction = cross.regions[0].correction;
        assert!(correction > 0.5 && correction < 1.0, "F = {correction}");
        assert_relative_eq!(
            cross.area_required.value,
            counter.area_required.value / correction,
            max_relative = 1e-9
        );
    }

    #[test]
    fn unreachable_effectiveness_is_an_error() {
        let cr = CapacityRatio::new(0.5).expect("capacity ratio should succeed");

        for eff in [1.2, 1.0] {
            assert!(matches!(
                cross_flow_correction(eff, cr),
                Err(NtuError::Unreachable { effectiveness, capacity_ratio })
                    if (effectiveness - eff).abs() < 1e-12
                        && (capacity_ratio - 0.5).abs() < 1e-12
            ));
        }

        let correction = cross_flow_correction(0.5, cr).expect("correction should succeed");
        assert!(correction > 0.0 && correction < 1.0);
    }

    #[test]
    fn fouling_adds_to_the_overall_resistance() {
        let mut design = plate_design(23, 0.25);
        design.area_ratios.sf = 2.0;
        let clean = evaluate_design(design.clone(), Config::default(), water_flows());

        design.fouling_wf = 1.0 / HeatTransfer::new::<watt_per_square_meter_kelvin>(5000.0);
        design.fouling_sf = 1.0 / HeatTransfer::new::<watt_per_square_meter_kelvin>(10_000.0);
        let fouled = evaluate_design(design, Config::default(), water_flows());

        let resistance = |performance: &UnitPerformance| {
            1.0 / performance.regions[0]
                .u
                .get::<watt_per_square_meter_kelvin>()
        };
        assert_relative_eq!(
            resistance(&fouled) - resistance(&clean),
            1.0 / 5000.0 + 1.0 / (2.0 * 10_000.0),
            max_relative = 1e-9
        );
        assert_relative_eq!(
            fouled.area_required.value / clean.area_required.value,
            resistance(&fouled) / resistance(&clean),
            max_relative = 1e-9
        );
    }

    #[test]
    fn partial_effectiveness_sizes_for_the_delivered_duty() {
        // 90 % of the heat the working fluid releases reaches the water.
        let q_hot = 0.3 * 4184.0 * 20.0;
        let t_sf_out = 20.0 + 0.9 * q_hot / (0.4 * 4184.0);
        let flows = UnitUpdate::new()
            .flow_in_wf(water_flow(60.0, 0.3))
            .flow_out_wf(water_flow(40.0, 0.3))
            .flow_in_sf(water_flow(20.0, 0.4))
            .flow_out_sf(water_flow(t_sf_out, 0.4));

        let mut design = plate_design(23, 0.25);
        design.effectiveness = 0.9;
        let performance = evaluate_design(design.clone(), Config::default(), flows.clone());

        assert_relative_eq!(performance.duty.value, 0.9 * q_hot, max_relative = 1e-9);
        let region = &performance.regions[0];
        assert_relative_eq!(
            region.lmtd.get::<kelvin>(),
            log_mean(60.0 - t_sf_out, 20.0),
            max_relative = 1e-9
        );
        assert_relative_eq!(
            performance.area_required.value,
            (region.duty / (region.u * region.lmtd)).value,
            max_relative = 1e-9
        );

        design.effectiveness = 1.0;
        let mut lossless =
            HxUnit::new(design, Arc::new(Config::default())).expect("unit should succeed");
        lossless.update(flows).expect("update should succeed");
        assert!(matches!(
            lossless.evaluate(&water(), &water()),
            Err(UnitError::Config(ConfigError::EnergyImbalance { .. }))
        ));
    }

    #[test]
    fn acceleration_follows_the_density_change() {
        let gas = air();
        let m_air = MassRate::new::<kilogram_per_second>(0.02);
        let at = |t: f64| {
            FlowState::from_pressure_temperature(
                &gas,
                Air,
                Pressure::new::<pascal>(111_600.0),
                ThermodynamicTemperature::new::<thermodynamic_temperature::kelvin>(t),
                m_air,
            )
            .expect("air flow should succeed")
        };
        let (wf_in, wf_out) = (at(400.0), at(360.0));
        let (rho_in, rho_out) = (wf_in.density().value, wf_out.density().value);

        let sf_in = water_flow(20.0, 0.3);
        let q = m_air * (wf_in.enthalpy() - wf_out.enthalpy());
        let sf_out = FlowState::from_pressure_enthalpy(
            &water(),
            Water,
            sf_in.pressure(),
            sf_in.enthalpy() + q / sf_in.mass_rate(),
            sf_in.mass_rate(),
        )
        .expect("water flow should succeed");

        let mut config = Config::default();
        config.dp_acceleration = true;
        let mut unit =
            HxUnit::new(plate_design(23, 0.25), Arc::new(config)).expect("unit should succeed");
        unit.update(
            UnitUpdate::new()
                .flow_in_wf(wf_in)
                .flow_out_wf(wf_out)
                .flow_in_sf(sf_in)
                .flow_out_sf(sf_out),
        )
        .expect("update should succeed");
        let performance = unit
            .evaluate(&gas, &water())
            .expect("evaluation should succeed");
        assert!(performance.regions.len() > 1);

        // Region terms telescope to the inlet-to-outlet change.
        let g = 0.02 / (11.0 * 1.096e-3 * 0.095);
        let expected = g * g * (1.0 / rho_out - 1.0 / rho_in);
        assert!(expected < 0.0);

        let acceleration: f64 = performance
            .regions
            .iter()
            .map(|region| region.dp_wf.acceleration.get::<pascal>())
            .sum();
        assert_relative_eq!(acceleration, expected, max_relative = 1e-9);
        assert_relative_eq!(
            (performance.dp_wf - performance.dp_friction_wf).get::<pascal>(),
            expected,
            max_relative = 1e-9
        );
        assert!(
            performance
                .regions
                .iter()
                .all(|region| region.dp_sf.acceleration == Pressure::ZERO)
        );
    }

    #[test]
    fn static_head_needs_vertical_flow() {
        let mut config = Config::default();
        config.dp_head = true;
        let horizontal = single_region(FlowSense::Counter, config.clone());
        assert_eq!(horizontal.regions[0].dp_wf.head, Pressure::ZERO);

        let mut design = plate_design(23, 0.25);
        design.flow.vertical_wf = true;
        let vertical = evaluate_design(design, config, water_flows());

        let region = &vertical.regions[0];
        assert_relative_eq!(
            region.dp_wf.head.value,
            997.047 * 9.80665 * region.length.value,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            region.dp_wf.total().value,
            region.dp_wf.friction.value + region.dp_wf.head.value
        );
    }
}
