//! Combines region results into whole-unit performance.

use std::f64::consts::PI;

use uom::{
    ConstZero,
    si::f64::{
        Area, HeatTransfer, Length, MassDensity, MassRate, Power, Pressure, ThermalConductance,
    },
};

use crate::support::units::MassFlux;

use super::{UnitError, config::Config, evaluate::RegionResult};

/// Performance of a unit at fixed boundary flows.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPerformance {
    /// Region results in working-fluid flow order.
    pub regions: Vec<RegionResult>,
    /// Heat delivered to the cold side.
    pub duty: Power,
    pub area_required: Area,
    pub area_actual: Area,
    /// `area_required - area_actual`.
    pub residual: Area,
    /// `(area_required - area_actual) / area_actual`.
    pub relative_residual: f64,
    pub dp_friction_wf: Pressure,
    pub dp_friction_sf: Pressure,
    /// Total working-fluid pressure drop, including enabled optional terms.
    pub dp_wf: Pressure,
    /// Total secondary-fluid pressure drop, including enabled optional terms.
    pub dp_sf: Pressure,
    /// Area-weighted overall heat transfer coefficient.
    pub u_effective: HeatTransfer,
    /// Flow length of the unit.
    pub length: Length,
}

/// Unit-level quantities the aggregator checks region results against.
#[derive(Debug, Clone, Copy)]
pub(super) struct UnitTotals {
    pub duty: Power,
    pub area: Area,
    pub length: Length,
    pub port_wf: Pressure,
    pub port_sf: Pressure,
}

/// Sums region results.
///
/// # Errors
///
/// Returns [`UnitError::DutyClosure`] if the region duties do not add up to
/// the unit duty within `tol_rel`.
pub(super) fn aggregate(
    regions: Vec<RegionResult>,
    totals: &UnitTotals,
    tol_rel: f64,
) -> Result<UnitPerformance, UnitError> {
    let duty = regions.iter().fold(Power::ZERO, |sum, r| sum + r.duty);
    if (duty - totals.duty).abs() > tol_rel * totals.duty.abs() {
        return Err(UnitError::DutyClosure {
            sum: duty,
            total: totals.duty,
        });
    }

    let area_required = regions.iter().fold(Area::ZERO, |sum, r| sum + r.area);
    let conductance = regions
        .iter()
        .fold(ThermalConductance::ZERO, |sum, r| sum + r.u * r.area);
    let dp_friction_wf = regions
        .iter()
        .fold(Pressure::ZERO, |sum, r| sum + r.dp_wf.friction);
    let dp_friction_sf = regions
        .iter()
        .fold(Pressure::ZERO, |sum, r| sum + r.dp_sf.friction);
    let dp_wf = regions
        .iter()
        .fold(totals.port_wf, |sum, r| sum + r.dp_wf.total());
    let dp_sf = regions
        .iter()
        .fold(totals.port_sf, |sum, r| sum + r.dp_sf.total());

    let residual = area_required - totals.area;

    Ok(UnitPerformance {
        regions,
        duty: totals.duty,
        area_required,
        area_actual: totals.area,
        residual,
        relative_residual: (residual / totals.area).value,
        dp_friction_wf,
        dp_friction_sf,
        dp_wf,
        dp_sf,
        u_effective: conductance / area_required,
        length: totals.length,
    })
}

/// Entry and exit loss of one side's ports,
/// `(k_in / (2 ρ_in) + k_out / (2 ρ_out)) · G_port²`.
pub(super) fn port_pressure_drop(
    config: &Config,
    mass_rate: MassRate,
    diameter: Length,
    density_in: MassDensity,
    density_out: MassDensity,
) -> Pressure {
    let g: MassFlux = mass_rate / (PI / 4.0 * diameter * diameter);
    (config.port_factor_in / (2.0 * density_in) + config.port_factor_out / (2.0 * density_out))
        * g
        * g
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        area::square_meter, f64::TemperatureInterval, heat_transfer::watt_per_square_meter_kelvin,
        length::meter, mass_density::kilogram_per_cubic_meter, mass_rate::kilogram_per_second,
        power::watt, pressure::pascal, temperature_interval::kelvin as delta_kelvin,
    };

    use crate::models::thermal::hx::core::{PressureDrop, phase::RegionPhase};

    fn pa(value: f64) -> Pressure {
        Pressure::new::<pascal>(value)
    }

    fn region(duty: f64, area: f64, u: f64, dp: f64) -> RegionResult {
        let drop = PressureDrop {
            friction: pa(dp),
            acceleration: pa(1.0),
            head: Pressure::ZERO,
        };
        RegionResult {
            fraction_start: 0.0,
            fraction_end: 1.0,
            phase_wf: RegionPhase::Liquid,
            phase_sf: RegionPhase::Liquid,
            duty: Power::new::<watt>(duty),
            h_wf: HeatTransfer::new::<watt_per_square_meter_kelvin>(5000.0),
            h_sf: HeatTransfer::new::<watt_per_square_meter_kelvin>(5000.0),
            u: HeatTransfer::new::<watt_per_square_meter_kelvin>(u),
            lmtd: TemperatureInterval::new::<delta_kelvin>(10.0),
            correction: 1.0,
            area: Area::new::<square_meter>(area),
            length: Length::new::<meter>(0.1),
            dp_wf: drop,
            dp_sf: drop,
        }
    }

    fn totals(duty: f64) -> UnitTotals {
        UnitTotals {
            duty: Power::new::<watt>(duty),
            area: Area::new::<square_meter>(2.0),
            length: Length::new::<meter>(0.5),
            port_wf: pa(10.0),
            port_sf: Pressure::ZERO,
        }
    }

    #[test]
    fn sums_regions() {
        let regions = vec![
            region(600.0, 1.0, 1000.0, 100.0),
            region(400.0, 1.5, 2000.0, 50.0),
        ];
        let performance =
            aggregate(regions, &totals(1000.0), 1e-7).expect("aggregate should succeed");

        assert_relative_eq!(performance.area_required.get::<square_meter>(), 2.5);
        assert_relative_eq!(performance.relative_residual, 0.25);
        assert_relative_eq!(
            performance.u_effective.get::<watt_per_square_meter_kelvin>(),
            (1000.0 + 3000.0) / 2.5
        );
        assert_relative_eq!(performance.dp_friction_wf.get::<pascal>(), 150.0);
        assert_relative_eq!(performance.dp_wf.get::<pascal>(), 150.0 + 2.0 + 10.0);
        assert_relative_eq!(performance.dp_sf.get::<pascal>(), 152.0);
    }

    #[test]
    fn rejects_open_duty() {
        let regions = vec![region(600.0, 1.0, 1000.0, 100.0)];
        assert!(matches!(
            aggregate(regions, &totals(1000.0), 1e-7),
            Err(UnitError::DutyClosure { .. })
        ));
    }

    #[test]
    fn port_loss() {
        let config = Config::default();
        let d = Length::new::<meter>(0.02);
        let rho = MassDensity::new::<kilogram_per_cubic_meter>(1000.0);
        let dp = port_pressure_drop(
            &config,
            MassRate::new::<kilogram_per_second>(0.5),
            d,
            rho,
            rho,
        );

        let g = 0.5 / (PI / 4.0 * 0.02 * 0.02);
        assert_relative_eq!(dp.get::<pascal>(), 1.4 / 2000.0 * g * g, max_relative = 1e-12);
    }
}
