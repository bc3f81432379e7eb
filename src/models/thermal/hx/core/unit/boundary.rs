//! The four boundary flows of a unit and their consistency rules.

use uom::si::{f64::Power, mass_rate::kilogram_per_second, power::watt};

use crate::models::thermal::hx::core::{ConfigError, Side, flow_state::FlowState};

/// Borrowed inlet and outlet flows of both sides.
#[derive(Debug)]
pub(crate) struct BoundaryFlows<'a, Wf, Sf> {
    pub wf_in: &'a FlowState<Wf>,
    pub wf_out: &'a FlowState<Wf>,
    pub sf_in: &'a FlowState<Sf>,
    pub sf_out: &'a FlowState<Sf>,
}

impl<Wf, Sf> Clone for BoundaryFlows<'_, Wf, Sf> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Wf, Sf> Copy for BoundaryFlows<'_, Wf, Sf> {}

impl<Wf, Sf> BoundaryFlows<'_, Wf, Sf> {
    /// Heat gained by the working fluid, negative when it cools.
    pub(crate) fn q_wf(&self) -> Power {
        self.wf_in.mass_rate() * (self.wf_out.enthalpy() - self.wf_in.enthalpy())
    }

    /// Heat gained by the secondary fluid, negative when it cools.
    pub(crate) fn q_sf(&self) -> Power {
        self.sf_in.mass_rate() * (self.sf_out.enthalpy() - self.sf_in.enthalpy())
    }

    pub(crate) fn wf_is_hot(&self) -> bool {
        self.q_wf() < Power::new::<watt>(0.0)
    }

    /// Heat delivered to the cold side.
    pub(crate) fn duty(&self) -> Power {
        if self.wf_is_hot() {
            self.q_sf()
        } else {
            self.q_wf()
        }
    }

    /// Checks mass conservation, heat direction, and the energy balance
    /// `|Q_cold| = effectiveness · |Q_hot|`.
    pub(crate) fn validate(&self, effectiveness: f64, tolerance: f64) -> Result<(), ConfigError> {
        let mass_balance = |side, inlet: f64, outlet: f64| {
            if (inlet - outlet).abs() <= tolerance * inlet.abs().max(outlet.abs()) {
                Ok(())
            } else {
                Err(ConfigError::MassImbalance {
                    side,
                    inlet,
                    outlet,
                })
            }
        };
        mass_balance(
            Side::WorkingFluid,
            self.wf_in.mass_rate().get::<kilogram_per_second>(),
            self.wf_out.mass_rate().get::<kilogram_per_second>(),
        )?;
        mass_balance(
            Side::SecondaryFluid,
            self.sf_in.mass_rate().get::<kilogram_per_second>(),
            self.sf_out.mass_rate().get::<kilogram_per_second>(),
        )?;

        let (q_wf, q_sf) = (self.q_wf(), self.q_sf());
        if q_wf.value == 0.0 {
            return Err(ConfigError::NoHeatTransfer {
                side: Side::WorkingFluid,
            });
        }
        if q_sf.value == 0.0 {
            return Err(ConfigError::NoHeatTransfer {
                side: Side::SecondaryFluid,
            });
        }
        if q_wf.value.signum() == q_sf.value.signum() {
            return Err(ConfigError::HeatDirection { q_wf, q_sf });
        }

        let (q_hot, q_cold) = if q_wf.value < 0.0 {
            (q_wf, q_sf)
        } else {
            (q_sf, q_wf)
        };
        let expected = effectiveness * q_hot.abs();
        if (q_cold.abs() - expected).abs() > tolerance * q_hot.abs() {
            return Err(ConfigError::EnergyImbalance { q_hot, q_cold });
        }

        Ok(())
    }
}
