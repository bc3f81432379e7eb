use twine_core::Model;

use super::core::{HxThermoModel, HxUnit, SizingError, UnitPerformance, UnitUpdate};

/// A heat exchanger unit as a [`Model`].
///
/// Each call applies a [`UnitUpdate`] to a copy of the unit. If a sizing
/// attribute is selected, the copy is sized; otherwise it is evaluated at its
/// boundary flows. The model's own unit never changes.
#[derive(Debug, Clone)]
pub struct HxUnitModel<Wf, Sf, ThermoWf, ThermoSf> {
    unit: HxUnit<Wf, Sf>,
    thermo_wf: ThermoWf,
    thermo_sf: ThermoSf,
}

/// Output of [`HxUnitModel`].
#[derive(Debug, Clone)]
pub struct HxUnitOutput<Wf, Sf> {
    /// The updated, and possibly sized, unit.
    pub unit: HxUnit<Wf, Sf>,
    pub performance: UnitPerformance,
}

impl<Wf, Sf, ThermoWf, ThermoSf> HxUnitModel<Wf, Sf, ThermoWf, ThermoSf> {
    pub fn new(unit: HxUnit<Wf, Sf>, thermo_wf: ThermoWf, thermo_sf: ThermoSf) -> Self {
        Self {
            unit,
            thermo_wf,
            thermo_sf,
        }
    }

    #[must_use]
    pub fn unit(&self) -> &HxUnit<Wf, Sf> {
        &self.unit
    }
}

impl<Wf, Sf, ThermoWf, ThermoSf> Model for HxUnitModel<Wf, Sf, ThermoWf, ThermoSf>
where
    Wf: Clone,
    Sf: Clone,
    ThermoWf: HxThermoModel<Wf>,
    ThermoSf: HxThermoModel<Sf>,
{
    type Input = UnitUpdate<Wf, Sf>;
    type Output = HxUnitOutput<Wf, Sf>;
    type Error = SizingError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let mut unit = self.unit.clone();
        unit.update(input.clone())?;

        let performance = if unit.size_selection().is_some() {
            unit.size_units(&self.thermo_wf, &self.thermo_sf)?
        } else {
            unit.evaluate(&self.thermo_wf, &self.thermo_sf)?
        };

        Ok(HxUnitOutput { unit, performance })
    }
}
