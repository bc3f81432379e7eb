use uom::si::f64::Pressure;

use crate::support::thermo::{PropertyError, Saturation};

use super::ThermoModel;

/// Capability for locating the saturation curve at a pressure.
///
/// Models without phase change report [`Saturation::SinglePhase`] with the
/// phase every state of the model has.
pub trait HasSaturation: ThermoModel {
    /// Returns the saturated liquid and vapor states at `pressure`, or the
    /// single phase the fluid is in when no liquid/vapor coexistence exists.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the pressure is outside the model's domain.
    fn saturation(
        &self,
        fluid: &Self::Fluid,
        pressure: Pressure,
    ) -> Result<Saturation<Self::Fluid>, PropertyError>;
}
