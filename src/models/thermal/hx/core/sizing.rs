//! Implicit sizing of a unit attribute.
//!
//! Sizing finds the attribute value at which the area the boundary flows
//! require equals the area the unit provides. The residual is evaluated on
//! copies of the unit; the unit changes only once a solution is found.
//! Rating solves the same residual for the outlet state of a fixed unit.

mod attr;
mod error;
mod problem;
mod rating;

pub use attr::SizeAttr;
pub use error::SizingError;

use std::fmt;

use tracing::{debug, warn};
use twine_core::Model;
use twine_solvers::equation::bisection;

use super::{
    ConfigError, HxUnit, UnitError, UnitPerformance, traits::HxThermoModel, unit::check_bounds,
};

use problem::{SizingModel, SizingProblem};

impl<Wf: Clone, Sf: Clone> HxUnit<Wf, Sf> {
    /// Sizes the attribute selected by the last [`UnitUpdate::size_attr`].
    ///
    /// [`UnitUpdate::size_attr`]: super::UnitUpdate::size_attr
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoSizeSelection`] if no attribute is selected,
    /// and otherwise the errors of [`HxUnit::size_attr`].
    pub fn size_units(
        &mut self,
        thermo_wf: &impl HxThermoModel<Wf>,
        thermo_sf: &impl HxThermoModel<Sf>,
    ) -> Result<UnitPerformance, SizingError> {
        let (attr, bounds) = self
            .size_selection()
            .ok_or(ConfigError::NoSizeSelection)?;
        self.size_attr(attr, bounds, thermo_wf, thermo_sf)
    }

    /// Finds the value of `attr` within `bounds` that zeroes the area residual,
    /// commits it, and returns the performance at that value.
    ///
    /// [`SizeAttr::ElementCount`] is sized to the smallest count whose
    /// required area does not exceed the actual area.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError`] if the bounds are invalid or do not bracket a
    /// solution, if evaluation fails at a bound, or if the solver does not
    /// converge. The unit is unchanged on error.
    pub fn size_attr(
        &mut self,
        attr: SizeAttr,
        bounds: [f64; 2],
        thermo_wf: &impl HxThermoModel<Wf>,
        thermo_sf: &impl HxThermoModel<Sf>,
    ) -> Result<UnitPerformance, SizingError> {
        let [lo, hi] = bounds;
        check_bounds(lo, hi)?;
        self.attribute(attr)?;

        let model = SizingModel::new(self, attr, thermo_wf, thermo_sf);
        let (x, performance) = if attr.is_integer() {
            smallest_count(&model, attr, lo, hi)?
        } else {
            bisect(&model, &self.config().bisection(), &attr, lo, hi)?
        };

        *self = self.with_attribute(attr, x)?;
        debug!(
            %attr,
            x,
            residual = performance.relative_residual,
            "sized unit"
        );
        Ok(performance)
    }
}

/// A sized attribute value and the performance at it.
type Found = (f64, UnitPerformance);

fn bisect<M>(
    model: &M,
    config: &bisection::Config,
    label: &dyn fmt::Display,
    lo: f64,
    hi: f64,
) -> Result<Found, SizingError>
where
    M: Model<Input = f64, Output = UnitPerformance, Error = UnitError>,
{
    let at_lo = model.call(&lo)?;
    if at_lo.relative_residual.abs() <= config.residual_tol {
        return Ok((lo, at_lo));
    }
    let at_hi = model.call(&hi)?;
    if at_hi.relative_residual.abs() <= config.residual_tol {
        return Ok((hi, at_hi));
    }

    let (residual_lo, residual_hi) = (at_lo.relative_residual, at_hi.relative_residual);
    debug!(%label, lo, hi, residual_lo, residual_hi, "sizing bracket");
    if residual_lo.signum() == residual_hi.signum() {
        warn!(%label, lo, hi, residual_lo, residual_hi, "bounds do not bracket a solution");
        return Err(SizingError::Infeasible {
            lo,
            hi,
            residual_lo,
            residual_hi,
        });
    }

    let solution = bisection::solve_unobserved(model, &SizingProblem, [lo, hi], config)?;

    if solution.status != bisection::Status::Converged
        || solution.residual.abs() > config.residual_tol
    {
        warn!(
            %label,
            status = ?solution.status,
            iters = solution.iters,
            residual = solution.residual,
            "sizing did not converge"
        );
        return Err(SizingError::NonConvergence {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    debug!(%label, x = solution.x, iters = solution.iters, "sizing converged");
    Ok((solution.x, solution.snapshot.output))
}

/// Integer bisection for the smallest count with a non-positive residual.
fn smallest_count<M>(model: &M, attr: SizeAttr, lo: f64, hi: f64) -> Result<Found, SizingError>
where
    M: Model<Input = f64, Output = UnitPerformance, Error = UnitError>,
{
    let (mut lo, mut hi) = (lo.ceil(), hi.floor());
    if lo > hi {
        return Err(ConfigError::InvalidBounds { lo, hi }.into());
    }

    let at_lo = model.call(&lo)?;
    if at_lo.relative_residual <= 0.0 {
        return Ok((lo, at_lo));
    }
    let mut at_hi = model.call(&hi)?;
    if at_hi.relative_residual > 0.0 {
        warn!(
            %attr,
            lo,
            hi,
            residual_lo = at_lo.relative_residual,
            residual_hi = at_hi.relative_residual,
            "no count within bounds is large enough"
        );
        return Err(SizingError::Infeasible {
            lo,
            hi,
            residual_lo: at_lo.relative_residual,
            residual_hi: at_hi.relative_residual,
        });
    }

    while hi - lo > 1.0 {
        let mid = ((lo + hi) / 2.0).floor();
        let at_mid = model.call(&mid)?;
        if at_mid.relative_residual <= 0.0 {
            hi = mid;
            at_hi = at_mid;
        } else {
            lo = mid;
        }
    }

    debug!(%attr, count = hi, "sized element count");
    Ok((hi, at_hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{convert::Infallible, sync::Arc};

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::joule_per_kilogram,
        f64::{
            DynamicViscosity, HeatTransfer, MassRate, Pressure, SpecificHeatCapacity,
            ThermalConductivity, ThermodynamicTemperature,
        },
        heat_transfer::watt_per_square_meter_kelvin,
        length::meter,
        mass_rate::kilogram_per_second,
        pressure::pascal,
        thermodynamic_temperature::kelvin,
    };

    use crate::models::thermal::hx::core::{
        ChisholmWanniarachchi, Config, Correlation, CorrelationError, CorrelationInput, FlowState,
        GeometryClass, GeometryField, PhaseSelector, RegionPhase, Side, Target, UnitUpdate,
        test_support::{
            CP_VAPOR, GAS_CONSTANT, K_VAPOR, MU_VAPOR, Refrigerant, TestRefrigerant, air,
            plate_design, water, water_flow, water_flows,
        },
    };
    use crate::support::{
        thermo::{
            PropertyError, Saturation, State,
            capability::{
                HasCp, HasEnthalpy, HasSaturation, HasThermalConductivity, HasViscosity,
                StateFrom, ThermoModel,
            },
            fluid::{Air, Water},
            model::Incompressible,
        },
        units::SpecificEnthalpy,
    };

    const B: f64 = 1.096e-3;
    const W: f64 = 0.095;
    const PHI: f64 = 1.117;
    const MU: f64 = 8.9e-4;
    const K: f64 = 0.607;
    const CP: f64 = 4184.0;
    const RHO: f64 = 997.047;
    const WALL: f64 = 0.424e-3 / 16.3;

    fn tight_config() -> Arc<Config> {
        let mut config = Config::default();
        config.tol_rel = 1e-9;
        config.div_temperature = None;
        Arc::new(config)
    }

    fn water_unit(length: f64) -> HxUnit<Water, Water> {
        let mut unit = HxUnit::new(plate_design(23, length), tight_config())
            .expect("unit should succeed");
        unit.update(water_flows()).expect("update should succeed");
        unit
    }

    /// Chisholm-Wanniarachchi mass flux and film coefficient for one side
    /// of the 23-plate pack.
    fn film_of(m_dot: f64, mu: f64, k: f64, cp: f64) -> (f64, f64) {
        let dh = 2.0 * B / PHI;
        let g = m_dot / (11.0 * B * W);
        let re = g * dh / mu;
        let pr = cp * mu / k;
        let nu = 0.72 * re.powf(0.59) * pr.powf(0.4) * PHI.powf(0.41) * 2f64.powf(0.66);
        (g, nu * k / dh)
    }

    fn film(m_dot: f64) -> (f64, f64) {
        film_of(m_dot, MU, K, CP)
    }

    /// Chisholm-Wanniarachchi Fanning friction factor at mass flux `g`.
    fn friction(g: f64, mu: f64) -> f64 {
        let re = g * (2.0 * B / PHI) / mu;
        0.8 * re.powf(-0.25) * PHI.powf(1.25) * 2f64.powf(3.6)
    }

    fn lmtd(dt_a: f64, dt_b: f64) -> f64 {
        (dt_a - dt_b) / (dt_a / dt_b).ln()
    }

    fn hand_length() -> f64 {
        let (_, h_wf) = film(0.3);
        let (_, h_sf) = film(0.4);
        let resistance = 1.0 / h_wf + 1.0 / h_sf + WALL;
        let duty = 0.4 * CP * 15.0;
        duty * resistance / lmtd(25.0, 20.0) / (21.0 * W)
    }

    #[test]
    fn liquid_length_matches_hand_calculation() {
        let mut unit = water_unit(0.2);
        let performance = unit
            .size_attr(SizeAttr::Length, [0.005, 0.5], &water(), &water())
            .expect("sizing should succeed");

        let expected = hand_length();
        assert_relative_eq!(unit.length().get::<meter>(), expected, max_relative = 1e-4);
        assert!(performance.relative_residual.abs() <= 1e-6);

        let (g, _) = film(0.3);
        let dh = 2.0 * B / PHI;
        let dp = 2.0 * friction(g, MU) * (expected / dh) * g * g / RHO;
        assert_relative_eq!(
            performance.dp_friction_wf.get::<pascal>(),
            dp,
            max_relative = 0.02
        );
    }

    #[test]
    fn width_and_gap_recover_the_design() {
        let mut unit = water_unit(hand_length());
        unit.size_attr(SizeAttr::Length, [0.005, 0.5], &water(), &water())
            .expect("length sizing should succeed");

        unit.update(UnitUpdate::new().attribute(SizeAttr::Width, 0.2))
            .expect("update should succeed");
        unit.size_attr(SizeAttr::Width, [0.05, 0.5], &water(), &water())
            .expect("width sizing should succeed");
        assert_relative_eq!(unit.width().get::<meter>(), W, epsilon = 1e-7);

        let gap = SizeAttr::SfGeometry(GeometryField::ChannelGap);
        unit.update(UnitUpdate::new().attribute(gap, 2e-3))
            .expect("update should succeed");
        unit.size_attr(gap, [0.5e-3, 3e-3], &water(), &water())
            .expect("gap sizing should succeed");
        assert_relative_eq!(
            unit.attribute(gap).expect("gap should succeed"),
            B,
            max_relative = 1e-2
        );
    }

    #[test]
    fn sizing_is_idempotent() {
        let mut unit = water_unit(0.2);
        unit.update(UnitUpdate::new().size_attr(SizeAttr::Length, [0.005, 0.5]))
            .expect("update should succeed");

        unit.size_units(&water(), &water())
            .expect("first sizing should succeed");
        let first = unit.length();
        unit.size_units(&water(), &water())
            .expect("second sizing should succeed");

        assert_relative_eq!(
            unit.length().get::<meter>(),
            first.get::<meter>(),
            max_relative = 1e-6
        );
    }

    #[test]
    fn infeasible_bounds_leave_unit_unchanged() {
        let mut unit = water_unit(0.2);
        let result = unit.size_attr(SizeAttr::Length, [0.1, 0.5], &water(), &water());

        assert!(matches!(
            result,
            Err(SizingError::Infeasible { residual_lo, residual_hi, .. })
                if residual_lo < 0.0 && residual_hi < 0.0
        ));
        assert_relative_eq!(unit.length().get::<meter>(), 0.2);
    }

    #[test]
    fn rejects_bad_requests() {
        let mut unit = water_unit(0.2);
        assert!(matches!(
            unit.size_units(&water(), &water()),
            Err(SizingError::Unit(UnitError::Config(ConfigError::NoSizeSelection)))
        ));
        assert!(matches!(
            unit.size_attr(SizeAttr::Length, [0.5, 0.005], &water(), &water()),
            Err(SizingError::Unit(UnitError::Config(ConfigError::InvalidBounds { .. })))
        ));
        assert!(matches!(
            unit.size_attr(
                SizeAttr::WfGeometry(GeometryField::TubeDiameter),
                [0.005, 0.05],
                &water(),
                &water()
            ),
            Err(SizingError::Unit(UnitError::Config(
                ConfigError::UnsupportedAttribute { .. }
            )))
        ));
    }

    #[test]
    fn plate_count_is_smallest_adequate() {
        let mut unit = water_unit(0.04);
        let performance = unit
            .size_attr(SizeAttr::ElementCount, [3.0, 200.0], &water(), &water())
            .expect("plate sizing should succeed");

        let count = unit.element_count();
        assert!(performance.relative_residual <= 0.0);

        let smaller = unit
            .with_attribute(SizeAttr::ElementCount, f64::from(count - 1))
            .expect("smaller unit should succeed")
            .evaluate(&water(), &water())
            .expect("evaluation should succeed");
        assert!(smaller.relative_residual > 0.0);
    }

    #[test]
    fn iteration_limit_is_non_convergence() {
        let mut config = Config::default();
        config.max_iters = 1;
        config.div_temperature = None;
        let mut unit = HxUnit::new(plate_design(23, 0.2), Arc::new(config))
            .expect("unit should succeed");
        unit.update(water_flows()).expect("update should succeed");

        let result = unit.size_attr(SizeAttr::Length, [0.005, 0.5], &water(), &water());
        assert!(matches!(
            result,
            Err(SizingError::NonConvergence { iters: 1, residual }) if residual.abs() > 1e-7
        ));
        assert_relative_eq!(unit.length().get::<meter>(), 0.2);
    }

    #[test]
    fn narrow_bracket_alone_is_not_convergence() {
        let mut config = Config::default();
        config.tol_abs_x = 0.1;
        config.div_temperature = None;
        let mut unit = HxUnit::new(plate_design(23, 0.2), Arc::new(config))
            .expect("unit should succeed");
        unit.update(water_flows()).expect("update should succeed");

        let result = unit.size_attr(SizeAttr::Length, [0.005, 0.5], &water(), &water());
        assert!(matches!(
            result,
            Err(SizingError::NonConvergence { residual, .. }) if residual.abs() > 1e-7
        ));
        assert_relative_eq!(unit.length().get::<meter>(), 0.2);
    }

    /// Chisholm-Wanniarachchi that fails for mass fluxes between 226 and
    /// 311 kg/m²·s, which a 0.3 kg/s stream reaches at widths of 80 to 110 mm.
    #[derive(Debug)]
    struct Banded;

    impl Banded {
        const NAME: &'static str = "Banded";

        fn check(input: &CorrelationInput) -> Result<(), CorrelationError> {
            let g = input.mass_flux.value;
            if (226.0..311.0).contains(&g) {
                return Err(CorrelationError::NonFinite {
                    name: Self::NAME,
                    context: format!("G = {g}"),
                });
            }
            Ok(())
        }
    }

    impl Correlation for Banded {
        fn name(&self) -> &'static str {
            Self::NAME
        }

        fn supports(&self, class: GeometryClass, phase: RegionPhase, target: Target) -> bool {
            ChisholmWanniarachchi.supports(class, phase, target)
        }

        fn heat_transfer(
            &self,
            input: &CorrelationInput,
        ) -> Result<HeatTransfer, CorrelationError> {
            Self::check(input)?;
            ChisholmWanniarachchi.heat_transfer(input)
        }

        fn friction_factor(&self, input: &CorrelationInput) -> Result<f64, CorrelationError> {
            Self::check(input)?;
            ChisholmWanniarachchi.friction_factor(input)
        }
    }

    #[test]
    fn correlation_failure_inside_the_bracket_is_returned() {
        let chevron = [GeometryClass::CorrugatedChevron];
        let config = Config::builder()
            .set_method(
                Arc::new(Banded),
                &chevron,
                &[PhaseSelector::SinglePhase],
                &Target::BOTH,
                &[Side::WorkingFluid],
            )
            .set_method(
                Arc::new(ChisholmWanniarachchi),
                &chevron,
                &[PhaseSelector::SinglePhase],
                &Target::BOTH,
                &[Side::SecondaryFluid],
            )
            .subdivision(None, None)
            .build()
            .expect("config should succeed");
        let mut unit = HxUnit::new(plate_design(23, hand_length()), Arc::new(config))
            .expect("unit should succeed");
        unit.update(water_flows()).expect("update should succeed");

        let result = unit.size_attr(SizeAttr::Width, [0.05, 0.5], &water(), &water());
        assert!(matches!(
            result,
            Err(SizingError::Unit(UnitError::Correlation(CorrelationError::NonFinite {
                name: "Banded",
                ..
            })))
        ));
        assert_relative_eq!(unit.width().get::<meter>(), W);
    }

    /// Water whose viscosity lookup is out of range everywhere.
    #[derive(Debug)]
    struct NoViscosity(Incompressible<Water>);

    impl ThermoModel for NoViscosity {
        type Fluid = Water;
    }

    impl HasEnthalpy for NoViscosity {
        fn enthalpy(&self, state: &State<Water>) -> Result<SpecificEnthalpy, PropertyError> {
            self.0.enthalpy(state)
        }
    }

    impl HasCp for NoViscosity {
        fn cp(&self, state: &State<Water>) -> Result<SpecificHeatCapacity, PropertyError> {
            self.0.cp(state)
        }
    }

    impl HasViscosity for NoViscosity {
        fn viscosity(&self, _state: &State<Water>) -> Result<DynamicViscosity, PropertyError> {
            Err(PropertyError::OutOfDomain {
                context: "viscosity table is empty".to_owned(),
            })
        }
    }

    impl HasThermalConductivity for NoViscosity {
        fn thermal_conductivity(
            &self,
            state: &State<Water>,
        ) -> Result<ThermalConductivity, PropertyError> {
            self.0.thermal_conductivity(state)
        }
    }

    impl HasSaturation for NoViscosity {
        fn saturation(
            &self,
            fluid: &Water,
            pressure: Pressure,
        ) -> Result<Saturation<Water>, PropertyError> {
            self.0.saturation(fluid, pressure)
        }
    }

    impl StateFrom<(Water, ThermodynamicTemperature, Pressure)> for NoViscosity {
        type Error = Infallible;

        fn state_from(
            &self,
            input: (Water, ThermodynamicTemperature, Pressure),
        ) -> Result<State<Water>, Self::Error> {
            self.0.state_from(input)
        }
    }

    impl StateFrom<(Water, Pressure, SpecificEnthalpy)> for NoViscosity {
        type Error = Infallible;

        fn state_from(
            &self,
            input: (Water, Pressure, SpecificEnthalpy),
        ) -> Result<State<Water>, Self::Error> {
            self.0.state_from(input)
        }
    }

    #[test]
    fn property_failure_surfaces_from_size_units() {
        let mut unit = water_unit(0.2);
        unit.update(UnitUpdate::new().size_attr(SizeAttr::Length, [0.005, 0.5]))
            .expect("update should succeed");

        match unit.size_units(&NoViscosity(water()), &water()) {
            Err(SizingError::Unit(UnitError::ThermoModelFailed { source, .. })) => {
                assert!(matches!(
                    source.downcast_ref::<PropertyError>(),
                    Some(PropertyError::OutOfDomain { .. })
                ));
            }
            other => panic!("expected a property failure, got {other:?}"),
        }
        assert_relative_eq!(unit.length().get::<meter>(), 0.2);
    }

    const P_WF: f64 = 2e5;
    const P_AIR: f64 = 111_600.0;
    const M_WF: f64 = 0.01;
    const M_AIR: f64 = 0.09;

    /// Refrigerant boiled from 310 K liquid to 330 K vapor by air at 400 K.
    fn evaporator(config: Config) -> HxUnit<Refrigerant, Air> {
        let refrigerant = TestRefrigerant::new();
        let gas = air();
        let p = Pressure::new::<pascal>(P_WF);
        let m_wf = MassRate::new::<kilogram_per_second>(M_WF);
        let at = |t: f64| {
            FlowState::from_pressure_temperature(
                &refrigerant,
                Refrigerant,
                p,
                ThermodynamicTemperature::new::<kelvin>(t),
                m_wf,
            )
            .expect("refrigerant flow should succeed")
        };
        let (wf_in, wf_out) = (at(310.0), at(330.0));

        let p_air = Pressure::new::<pascal>(P_AIR);
        let m_sf = MassRate::new::<kilogram_per_second>(M_AIR);
        let sf_in = FlowState::from_pressure_temperature(
            &gas,
            Air,
            p_air,
            ThermodynamicTemperature::new::<kelvin>(400.0),
            m_sf,
        )
        .expect("air flow should succeed");
        let q = m_wf * (wf_out.enthalpy() - wf_in.enthalpy());
        let sf_out =
            FlowState::from_pressure_enthalpy(&gas, Air, p_air, sf_in.enthalpy() - q / m_sf, m_sf)
                .expect("air flow should succeed");

        let mut unit =
            HxUnit::new(plate_design(23, 0.1), Arc::new(config)).expect("unit should succeed");
        unit.update(
            UnitUpdate::new()
                .flow_in_wf(wf_in)
                .flow_out_wf(wf_out)
                .flow_in_sf(sf_in)
                .flow_out_sf(sf_out),
        )
        .expect("update should succeed");
        unit
    }

    #[test]
    fn evaporator_length_converges() {
        let refrigerant = TestRefrigerant::new();
        let gas = air();
        let mut unit = evaporator(Config::default());

        let performance = unit
            .size_attr(SizeAttr::Length, [0.001, 1.0], &refrigerant, &gas)
            .expect("sizing should succeed");
        assert!(performance.regions.len() >= 2);
        assert!(
            performance
                .regions
                .iter()
                .any(|region| region.phase_wf == RegionPhase::TwoPhaseEvaporating)
        );
        assert!(
            performance
                .regions
                .iter()
                .any(|region| !region.phase_wf.is_two_phase())
        );
        assert!(performance.relative_residual.abs() <= 1e-6);

        let first = unit.length().get::<meter>();
        unit.size_attr(SizeAttr::Length, [0.001, 1.0], &refrigerant, &gas)
            .expect("repeat sizing should succeed");
        assert_relative_eq!(unit.length().get::<meter>(), first, max_relative = 1e-4);
    }

    /// Fixed film coefficient and friction factor whatever the phase.
    #[derive(Debug)]
    struct FixedFilm {
        h: f64,
        f: f64,
    }

    impl Correlation for FixedFilm {
        fn name(&self) -> &'static str {
            "FixedFilm"
        }

        fn supports(&self, _class: GeometryClass, _phase: RegionPhase, _target: Target) -> bool {
            true
        }

        fn heat_transfer(
            &self,
            _input: &CorrelationInput,
        ) -> Result<HeatTransfer, CorrelationError> {
            Ok(HeatTransfer::new::<watt_per_square_meter_kelvin>(self.h))
        }

        fn friction_factor(&self, _input: &CorrelationInput) -> Result<f64, CorrelationError> {
            Ok(self.f)
        }
    }

    const FILM_WF: FixedFilm = FixedFilm { h: 2000.0, f: 0.05 };
    const FILM_AIR: FixedFilm = FixedFilm { h: 100.0, f: 0.2 };

    /// Fixed films on both sides, one region per phase.
    fn fixed_film_config() -> Config {
        let chevron = [GeometryClass::CorrugatedChevron];
        let mut config = Config::builder()
            .set_method(
                Arc::new(FILM_WF),
                &chevron,
                &[PhaseSelector::Any],
                &Target::BOTH,
                &[Side::WorkingFluid],
            )
            .set_method(
                Arc::new(FILM_AIR),
                &chevron,
                &[PhaseSelector::Any],
                &Target::BOTH,
                &[Side::SecondaryFluid],
            )
            .subdivision(None, None)
            .build()
            .expect("config should succeed");
        config.tol_rel = 1e-9;
        config
    }

    #[test]
    fn evaporator_matches_segment_sums() {
        let refrigerant = TestRefrigerant::new();
        let gas = air();
        let mut unit = evaporator(fixed_film_config());

        let performance = unit
            .size_attr(SizeAttr::Length, [0.001, 1.0], &refrigerant, &gas)
            .expect("sizing should succeed");
        let phases: Vec<_> = performance
            .regions
            .iter()
            .map(|region| region.phase_wf)
            .collect();
        assert_eq!(phases.len(), 3);
        assert_eq!(phases[1], RegionPhase::TwoPhaseEvaporating);

        let p = Pressure::new::<pascal>(P_WF);
        let p_air = Pressure::new::<pascal>(P_AIR);
        let t_sat = refrigerant.saturation_temperature(p).get::<kelvin>();
        let (h_l, h_v) = refrigerant.saturation_enthalpies(p);
        let enthalpy = |flow: Option<&FlowState<_>>| {
            flow.expect("flow should be set")
                .enthalpy()
                .get::<joule_per_kilogram>()
        };
        let h_in = enthalpy(unit.flow_in_wf());
        let h_out = enthalpy(unit.flow_out_wf());
        let h_air_in = unit
            .flow_in_sf()
            .expect("flow should be set")
            .enthalpy()
            .get::<joule_per_kilogram>();

        // Working fluid enthalpy and temperature at the phase boundaries.
        let ends = [
            (h_in, 310.0),
            (h_l.get::<joule_per_kilogram>(), t_sat),
            (h_v.get::<joule_per_kilogram>(), t_sat),
            (h_out, 330.0),
        ];
        // Counter-flow: air leaves where the working fluid enters.
        let total = M_WF * (h_out - h_in);
        let air_h = |h_wf: f64| h_air_in - (total - M_WF * (h_wf - h_in)) / M_AIR;
        let air_state = |h: f64| {
            gas.state_from((Air, p_air, SpecificEnthalpy::new::<joule_per_kilogram>(h)))
                .expect("air state should succeed")
        };

        let resistance = 1.0 / FILM_WF.h + 1.0 / FILM_AIR.h + WALL;
        let (g_wf, g_air) = (M_WF / (11.0 * B * W), M_AIR / (11.0 * B * W));
        let dh = 2.0 * B / PHI;

        let (mut length, mut dp_wf, mut dp_air) = (0.0, 0.0, 0.0);
        for pair in ends.windows(2) {
            let [(h_0, t_0), (h_1, t_1)] = [pair[0], pair[1]];
            let dt_0 = air_state(air_h(h_0)).temperature.get::<kelvin>() - t_0;
            let dt_1 = air_state(air_h(h_1)).temperature.get::<kelvin>() - t_1;
            let segment = M_WF * (h_1 - h_0) * resistance / lmtd(dt_0, dt_1) / (21.0 * W);

            let h_mid = 0.5 * (h_0 + h_1);
            let rho_wf = refrigerant
                .state_from((
                    Refrigerant,
                    p,
                    SpecificEnthalpy::new::<joule_per_kilogram>(h_mid),
                ))
                .expect("refrigerant state should succeed")
                .density
                .value;
            let rho_air = air_state(air_h(h_mid)).density.value;

            length += segment;
            dp_wf += 2.0 * FILM_WF.f * (segment / dh) * g_wf * g_wf / rho_wf;
            dp_air += 2.0 * FILM_AIR.f * (segment / dh) * g_air * g_air / rho_air;
        }

        assert_relative_eq!(unit.length().get::<meter>(), length, max_relative = 1e-4);
        assert_relative_eq!(
            performance.dp_friction_wf.get::<pascal>(),
            dp_wf,
            max_relative = 1e-4
        );
        assert_relative_eq!(
            performance.dp_friction_sf.get::<pascal>(),
            dp_air,
            max_relative = 1e-4
        );
    }

    /// Refrigerant vapor cooled from 360 K to 335 K by water at 20 °C.
    fn desuperheater() -> HxUnit<Refrigerant, Water> {
        let refrigerant = TestRefrigerant::new();
        let m_wf = MassRate::new::<kilogram_per_second>(0.02);
        let at = |t: f64| {
            FlowState::from_pressure_temperature(
                &refrigerant,
                Refrigerant,
                Pressure::new::<pascal>(P_WF),
                ThermodynamicTemperature::new::<kelvin>(t),
                m_wf,
            )
            .expect("vapor flow should succeed")
        };
        let (wf_in, wf_out) = (at(360.0), at(335.0));

        let sf_in = water_flow(20.0, 0.05);
        let q = m_wf * (wf_in.enthalpy() - wf_out.enthalpy());
        let sf_out = FlowState::from_pressure_enthalpy(
            &water(),
            Water,
            sf_in.pressure(),
            sf_in.enthalpy() + q / sf_in.mass_rate(),
            sf_in.mass_rate(),
        )
        .expect("water flow should succeed");

        let mut unit = HxUnit::new(plate_design(23, 0.1), tight_config())
            .expect("unit should succeed");
        unit.update(
            UnitUpdate::new()
                .flow_in_wf(wf_in)
                .flow_out_wf(wf_out)
                .flow_in_sf(sf_in)
                .flow_out_sf(sf_out),
        )
        .expect("update should succeed");
        unit
    }

    #[test]
    fn vapor_length_and_pressure_drop_match_hand_calculation() {
        let refrigerant = TestRefrigerant::new();
        let mut unit = desuperheater();

        let performance = unit
            .size_attr(SizeAttr::Length, [0.005, 1.0], &refrigerant, &water())
            .expect("sizing should succeed");
        assert_eq!(performance.regions.len(), 1);
        assert!(!performance.regions[0].phase_wf.is_two_phase());

        let (g_wf, h_wf) = film_of(0.02, MU_VAPOR, K_VAPOR, CP_VAPOR);
        let (g_sf, h_sf) = film(0.05);
        let duty = 0.02 * CP_VAPOR * 25.0;
        let t_sf_out = 293.15 + duty / (0.05 * CP);
        let mean = lmtd(360.0 - t_sf_out, 335.0 - 293.15);
        let length = duty * (1.0 / h_wf + 1.0 / h_sf + WALL) / mean / (21.0 * W);
        assert_relative_eq!(unit.length().get::<meter>(), length, max_relative = 1e-4);

        // Vapor density at the mid temperature, 347.5 K.
        let dh = 2.0 * B / PHI;
        let rho_wf = P_WF / (GAS_CONSTANT * 347.5);
        let dp_wf = 2.0 * friction(g_wf, MU_VAPOR) * (length / dh) * g_wf * g_wf / rho_wf;
        let dp_sf = 2.0 * friction(g_sf, MU) * (length / dh) * g_sf * g_sf / RHO;
        assert_relative_eq!(
            performance.dp_friction_wf.get::<pascal>(),
            dp_wf,
            max_relative = 1e-4
        );
        assert_relative_eq!(
            performance.dp_friction_sf.get::<pascal>(),
            dp_sf,
            max_relative = 1e-4
        );
    }
}
