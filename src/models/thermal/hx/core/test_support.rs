//! Thermo models used by the heat exchanger tests.
//!
//! [`TestRefrigerant`] is a pure fluid with a liquid/vapor dome whose
//! saturation curve follows Clausius–Clapeyron with a constant latent heat:
//!
//! ```text
//! 1/T_sat(p) = 1/T_ref − (R/h_fg)·ln(p/p_ref)
//! ```
//!
//! The liquid is incompressible with constant `c_p`, the vapor is an ideal gas
//! with constant `c_p`, and two-phase states use the homogeneous density.
//! Every property is closed form, so tests can compute expected values by hand.

use uom::si::{
    angle::degree,
    available_energy::joule_per_kilogram,
    dynamic_viscosity::pascal_second,
    f64::{
        Angle, DynamicViscosity, Length, MassDensity, MassRate, Pressure, SpecificHeatCapacity,
        ThermalConductivity, ThermodynamicTemperature,
    },
    length::{meter, millimeter},
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::{degree_celsius, kelvin},
};

use crate::support::{
    thermo::{
        PropertyError, Saturation, State,
        capability::{
            HasCp, HasEnthalpy, HasSaturation, HasThermalConductivity, HasViscosity, StateFrom,
            ThermoModel,
        },
        fluid::{Air, Water},
        model::{Incompressible, PerfectGas},
    },
    units::SpecificEnthalpy,
};

use super::{
    FlowState, Geometry, UnitDesign, UnitUpdate,
    unit::{Material, Wall},
};

pub(crate) const GAS_CONSTANT: f64 = 54.37;
const LATENT_HEAT: f64 = 170_000.0;
const P_REF: f64 = 101_325.0;
const T_REF: f64 = 300.9;
const T_ZERO: f64 = 273.15;
const RHO_LIQUID: f64 = 1300.0;
const CP_LIQUID: f64 = 1000.0;
pub(crate) const CP_VAPOR: f64 = 800.0;
const MU_LIQUID: f64 = 4e-4;
const K_LIQUID: f64 = 0.075;
pub(crate) const MU_VAPOR: f64 = 1.3e-5;
pub(crate) const K_VAPOR: f64 = 0.012;

/// Marker fluid for [`TestRefrigerant`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Refrigerant;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TestRefrigerant;

/// Where a `(T, ρ)` state sits relative to the dome, in SI values.
enum Decoded {
    Liquid { t: f64 },
    TwoPhase { t: f64, quality: f64 },
    Vapor { t: f64, p: f64 },
}

impl TestRefrigerant {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn saturation_temperature(&self, pressure: Pressure) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(t_sat(pressure.get::<pascal>()))
    }

    /// Saturated liquid and vapor enthalpy at `pressure`.
    pub(crate) fn saturation_enthalpies(
        &self,
        pressure: Pressure,
    ) -> (SpecificEnthalpy, SpecificEnthalpy) {
        let h_l = h_liquid(t_sat(pressure.get::<pascal>()));
        (
            SpecificEnthalpy::new::<joule_per_kilogram>(h_l),
            SpecificEnthalpy::new::<joule_per_kilogram>(h_l + LATENT_HEAT),
        )
    }

    fn decode(state: &State<Refrigerant>) -> Result<Decoded, PropertyError> {
        let t = state.temperature.get::<kelvin>();
        let rho = state.density.get::<kilogram_per_cubic_meter>();
        if !(t > 0.0 && rho > 0.0) {
            return Err(PropertyError::out_of_domain(format!(
                "test refrigerant needs positive T and density, got {t} K, {rho} kg/m3"
            )));
        }

        if rho >= RHO_LIQUID * (1.0 - 1e-12) {
            return Ok(Decoded::Liquid { t });
        }

        let rho_v = p_sat(t) / (GAS_CONSTANT * t);
        if rho > rho_v * (1.0 + 1e-10) {
            let quality = (1.0 / rho - 1.0 / RHO_LIQUID) / (1.0 / rho_v - 1.0 / RHO_LIQUID);
            Ok(Decoded::TwoPhase { t, quality })
        } else {
            Ok(Decoded::Vapor {
                t,
                p: rho * GAS_CONSTANT * t,
            })
        }
    }
}

fn t_sat(p: f64) -> f64 {
    1.0 / (1.0 / T_REF - GAS_CONSTANT / LATENT_HEAT * (p / P_REF).ln())
}

fn p_sat(t: f64) -> f64 {
    P_REF * (LATENT_HEAT / GAS_CONSTANT * (1.0 / T_REF - 1.0 / t)).exp()
}

fn h_liquid(t: f64) -> f64 {
    CP_LIQUID * (t - T_ZERO)
}

fn state(t: f64, rho: f64) -> State<Refrigerant> {
    State::new(
        ThermodynamicTemperature::new::<kelvin>(t),
        MassDensity::new::<kilogram_per_cubic_meter>(rho),
        Refrigerant,
    )
}

impl ThermoModel for TestRefrigerant {
    type Fluid = Refrigerant;
}

impl HasEnthalpy for TestRefrigerant {
    fn enthalpy(&self, state: &State<Refrigerant>) -> Result<SpecificEnthalpy, PropertyError> {
        let h = match Self::decode(state)? {
            Decoded::Liquid { t } => h_liquid(t),
            Decoded::TwoPhase { t, quality } => h_liquid(t) + quality * LATENT_HEAT,
            Decoded::Vapor { t, p } => {
                let t_s = t_sat(p);
                h_liquid(t_s) + LATENT_HEAT + CP_VAPOR * (t - t_s)
            }
        };
        Ok(SpecificEnthalpy::new::<joule_per_kilogram>(h))
    }
}

impl HasCp for TestRefrigerant {
    fn cp(&self, state: &State<Refrigerant>) -> Result<SpecificHeatCapacity, PropertyError> {
        let cp = match Self::decode(state)? {
            Decoded::Liquid { .. } => CP_LIQUID,
            Decoded::Vapor { .. } => CP_VAPOR,
            Decoded::TwoPhase { .. } => {
                return Err(undefined("cp inside the vapor dome"));
            }
        };
        Ok(SpecificHeatCapacity::new::<
            uom::si::specific_heat_capacity::joule_per_kilogram_kelvin,
        >(cp))
    }
}

impl HasViscosity for TestRefrigerant {
    fn viscosity(&self, state: &State<Refrigerant>) -> Result<DynamicViscosity, PropertyError> {
        match Self::decode(state)? {
            Decoded::Liquid { .. } => Ok(DynamicViscosity::new::<pascal_second>(MU_LIQUID)),
            Decoded::Vapor { .. } => Ok(DynamicViscosity::new::<pascal_second>(MU_VAPOR)),
            Decoded::TwoPhase { .. } => Err(undefined(
                "viscosity inside the vapor dome",
            )),
        }
    }
}

impl HasThermalConductivity for TestRefrigerant {
    fn thermal_conductivity(
        &self,
        state: &State<Refrigerant>,
    ) -> Result<ThermalConductivity, PropertyError> {
        let k = match Self::decode(state)? {
            Decoded::Liquid { .. } => K_LIQUID,
            Decoded::Vapor { .. } => K_VAPOR,
            Decoded::TwoPhase { .. } => {
                return Err(undefined(
                    "conductivity inside the vapor dome",
                ));
            }
        };
        Ok(ThermalConductivity::new::<watt_per_meter_kelvin>(k))
    }
}

impl HasSaturation for TestRefrigerant {
    fn saturation(
        &self,
        _fluid: &Refrigerant,
        pressure: Pressure,
    ) -> Result<Saturation<Refrigerant>, PropertyError> {
        let p = pressure.get::<pascal>();
        if !(p > 0.0) {
            return Err(PropertyError::out_of_domain(format!(
                "saturation needs a positive pressure, got {p} Pa"
            )));
        }
        let t = t_sat(p);
        Ok(Saturation::TwoPhase {
            liquid: state(t, RHO_LIQUID),
            vapor: state(t, p / (GAS_CONSTANT * t)),
        })
    }
}

impl StateFrom<(Refrigerant, Pressure, SpecificEnthalpy)> for TestRefrigerant {
    type Error = PropertyError;

    fn state_from(
        &self,
        (_, pressure, enthalpy): (Refrigerant, Pressure, SpecificEnthalpy),
    ) -> Result<State<Refrigerant>, Self::Error> {
        let p = pressure.get::<pascal>();
        if !(p > 0.0) {
            return Err(PropertyError::out_of_domain(format!(
                "state needs a positive pressure, got {p} Pa"
            )));
        }

        let h = enthalpy.get::<joule_per_kilogram>();
        let t_s = t_sat(p);
        let h_l = h_liquid(t_s);
        let h_v = h_l + LATENT_HEAT;
        let rho_v = p / (GAS_CONSTANT * t_s);

        Ok(if h <= h_l {
            state(T_ZERO + h / CP_LIQUID, RHO_LIQUID)
        } else if h >= h_v {
            let t = t_s + (h - h_v) / CP_VAPOR;
            state(t, p / (GAS_CONSTANT * t))
        } else {
            let x = (h - h_l) / LATENT_HEAT;
            state(t_s, 1.0 / (x / rho_v + (1.0 - x) / RHO_LIQUID))
        })
    }
}

impl StateFrom<(Refrigerant, ThermodynamicTemperature, Pressure)> for TestRefrigerant {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (Refrigerant, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Refrigerant>, Self::Error> {
        let t = temperature.get::<kelvin>();
        let t_s = t_sat(pressure.get::<pascal>());
        if (t - t_s).abs() < 1e-9 {
            return Err(undefined(
                "temperature and pressure do not fix a saturated state",
            ));
        }

        let h = if t < t_s {
            h_liquid(t)
        } else {
            h_liquid(t_s) + LATENT_HEAT + CP_VAPOR * (t - t_s)
        };
        self.state_from((fluid, pressure, SpecificEnthalpy::new::<joule_per_kilogram>(h)))
    }
}

fn undefined(context: &str) -> PropertyError {
    PropertyError::Undefined {
        context: context.to_owned(),
    }
}

/// Incompressible water with transport properties.
pub(crate) fn water() -> Incompressible<Water> {
    Incompressible::new().expect("water parameters should be valid")
}

/// Perfect-gas air with transport properties.
pub(crate) fn air() -> PerfectGas<Air> {
    PerfectGas::new().expect("air parameters should be valid")
}

/// Chevron plates with a 60° corrugation angle.
pub(crate) fn chevron() -> Geometry {
    Geometry::CorrugatedChevron {
        b: Length::new::<millimeter>(1.096),
        beta: Angle::new::<degree>(60.0),
        pitch: Length::new::<millimeter>(10.0),
        phi: 1.117,
    }
}

/// A chevron plate pack, 95 mm wide with 0.424 mm stainless plates.
pub(crate) fn plate_design(plates: u32, length: f64) -> UnitDesign {
    UnitDesign::new(
        chevron(),
        chevron(),
        plates,
        Length::new::<meter>(length),
        Length::new::<millimeter>(95.0),
        Wall {
            material: Material::stainless_steel_316(),
            thickness: Length::new::<millimeter>(0.424),
        },
    )
}

/// Liquid water at 2 bar.
pub(crate) fn water_flow(celsius: f64, kg_per_s: f64) -> FlowState<Water> {
    FlowState::from_pressure_temperature(
        &water(),
        Water,
        Pressure::new::<pascal>(2e5),
        ThermodynamicTemperature::new::<degree_celsius>(celsius),
        MassRate::new::<kilogram_per_second>(kg_per_s),
    )
    .expect("water flow should succeed")
}

/// Balanced water/water flows: 60 → 40 °C at 0.3 kg/s against 20 → 35 °C
/// at 0.4 kg/s.
pub(crate) fn water_flows() -> UnitUpdate<Water, Water> {
    UnitUpdate::new()
        .flow_in_wf(water_flow(60.0, 0.3))
        .flow_out_wf(water_flow(40.0, 0.3))
        .flow_in_sf(water_flow(20.0, 0.4))
        .flow_out_sf(water_flow(35.0, 0.4))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn saturation_curve_passes_through_reference() {
        let thermo = TestRefrigerant::new();
        let t = thermo.saturation_temperature(Pressure::new::<pascal>(P_REF));
        assert_relative_eq!(t.get::<kelvin>(), T_REF, epsilon = 1e-12);
        assert_relative_eq!(t_sat(p_sat(330.0)), 330.0, max_relative = 1e-12);
    }

    #[test]
    fn enthalpy_roundtrip_across_the_dome() -> Result<(), PropertyError> {
        let thermo = TestRefrigerant::new();
        let p = Pressure::new::<pascal>(2e5);
        let (h_l, h_v) = thermo.saturation_enthalpies(p);

        for h in [
            h_l.value - 10_000.0,
            h_l.value + 0.3 * LATENT_HEAT,
            h_v.value + 15_000.0,
        ] {
            let state =
                thermo.state_from((p, SpecificEnthalpy::new::<joule_per_kilogram>(h)))?;
            assert_relative_eq!(thermo.enthalpy(&state)?.value, h, max_relative = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn saturated_states_decode_to_their_phase() -> Result<(), PropertyError> {
        let thermo = TestRefrigerant::new();
        let p = Pressure::new::<pascal>(2e5);
        let Saturation::TwoPhase { liquid, vapor } = thermo.saturation(&Refrigerant, p)? else {
            panic!("test refrigerant always has a dome");
        };
        let (h_l, h_v) = thermo.saturation_enthalpies(p);

        assert_relative_eq!(thermo.enthalpy(&liquid)?.value, h_l.value, max_relative = 1e-9);
        assert_relative_eq!(thermo.enthalpy(&vapor)?.value, h_v.value, max_relative = 1e-9);
        assert_relative_eq!(thermo.viscosity(&liquid)?.value, MU_LIQUID);
        assert_relative_eq!(thermo.viscosity(&vapor)?.value, MU_VAPOR);
        Ok(())
    }

    #[test]
    fn two_phase_transport_is_undefined() -> Result<(), PropertyError> {
        let thermo = TestRefrigerant::new();
        let p = Pressure::new::<pascal>(2e5);
        let (h_l, _) = thermo.saturation_enthalpies(p);
        let state = thermo.state_from((
            p,
            SpecificEnthalpy::new::<joule_per_kilogram>(h_l.value + 0.5 * LATENT_HEAT),
        ))?;
        assert!(matches!(
            thermo.viscosity(&state),
            Err(PropertyError::Undefined { .. })
        ));
        Ok(())
    }

    #[test]
    fn subcooled_state_from_temperature() -> Result<(), PropertyError> {
        let thermo = TestRefrigerant::new();
        let state = thermo.state_from((
            ThermodynamicTemperature::new::<kelvin>(310.0),
            Pressure::new::<pascal>(2e5),
        ))?;
        assert_relative_eq!(state.temperature.get::<kelvin>(), 310.0, epsilon = 1e-9);
        assert_relative_eq!(state.density.get::<kilogram_per_cubic_meter>(), RHO_LIQUID);
        Ok(())
    }
}
