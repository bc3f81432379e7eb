use std::ops::Deref;

use uom::si::{
    f64::{Power, Ratio, TemperatureInterval, ThermalConductance},
    ratio::ratio,
};

use crate::support::constraint::{Constrained, ConstraintResult, StrictlyPositive, UnitInterval};

/// Capacitance rate `ṁ·c_p` of a stream, strictly positive.
///
/// A stream changing phase has an unbounded capacitance rate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CapacitanceRate(Constrained<ThermalConductance, StrictlyPositive>);

impl CapacitanceRate {
    /// # Errors
    ///
    /// Returns `Err` if the quantity is not strictly positive.
    pub fn from_quantity(quantity: ThermalConductance) -> ConstraintResult<Self> {
        Ok(Self(StrictlyPositive::new(quantity)?))
    }

    /// Effective capacitance rate `|Q|/|ΔT|` of a stream over a slice.
    ///
    /// A zero temperature change gives an infinite rate.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the heat rate is zero or either operand is NaN.
    pub fn from_heat_rate(
        heat_rate: Power,
        temperature_change: TemperatureInterval,
    ) -> ConstraintResult<Self> {
        Self::from_quantity(heat_rate.abs() / temperature_change.abs())
    }

    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.0.as_ref().value.is_infinite()
    }
}

impl Deref for CapacitanceRate {
    type Target = ThermalConductance;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Capacity ratio `C_min / C_max`, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityRatio(Constrained<Ratio, UnitInterval>);

impl CapacityRatio {
    /// # Errors
    ///
    /// Returns `Err` if the value lies outside `[0, 1]`.
    pub fn new(value: f64) -> ConstraintResult<Self> {
        Ok(Self(UnitInterval::new(Ratio::new::<ratio>(value))?))
    }

    /// Ratio of the smaller to the larger of two capacitance rates.
    #[must_use]
    pub fn from_capacitance_rates(rates: [CapacitanceRate; 2]) -> Self {
        let [a, b] = rates;
        let (c_min, c_max) = if a <= b { (*a, *b) } else { (*b, *a) };
        let value = if c_max.value.is_infinite() {
            0.0
        } else {
            (c_min / c_max).get::<ratio>()
        };
        Self(Constrained::new_unchecked(Ratio::new::<ratio>(value)))
    }
}

impl Deref for CapacityRatio {
    type Target = Ratio;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
