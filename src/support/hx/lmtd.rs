use thiserror::Error;
use uom::si::{f64::TemperatureInterval, ratio::ratio, temperature_interval::kelvin};

use super::{
    CapacityRatio, Effectiveness, NtuError,
    arrangement::CounterFlow,
    effectiveness_ntu::NtuRelation,
};

/// The end temperature differences cannot form a log mean.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("temperature differences must be positive, got {dt_a:?} and {dt_b:?}")]
pub struct LmtdError {
    pub dt_a: TemperatureInterval,
    pub dt_b: TemperatureInterval,
}

/// Log-mean of the hot-minus-cold differences at the two ends of a slice.
///
/// Equal differences give their arithmetic mean.
///
/// # Errors
///
/// Returns [`LmtdError`] unless both differences are positive and finite.
pub fn log_mean_temperature_difference(
    dt_a: TemperatureInterval,
    dt_b: TemperatureInterval,
) -> Result<TemperatureInterval, LmtdError> {
    let (a, b) = (dt_a.get::<kelvin>(), dt_b.get::<kelvin>());
    if !(a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite()) {
        return Err(LmtdError { dt_a, dt_b });
    }

    if (a - b).abs() <= 1e-9 * a.max(b) {
        return Ok(TemperatureInterval::new::<kelvin>(0.5 * (a + b)));
    }
    Ok(TemperatureInterval::new::<kelvin>((a - b) / (a / b).ln()))
}

/// LMTD correction factor `F = NTU_counter / NTU_arrangement`.
///
/// # Errors
///
/// Propagates [`NtuError`] from either relation.
pub fn correction_factor(
    arrangement: &impl NtuRelation,
    effectiveness: Effectiveness,
    capacity_ratio: CapacityRatio,
) -> Result<f64, NtuError> {
    let actual = arrangement.ntu(effectiveness, capacity_ratio)?.get::<ratio>();
    if actual == 0.0 {
        return Ok(1.0);
    }
    let counter = CounterFlow.ntu(effectiveness, capacity_ratio)?.get::<ratio>();
    Ok(counter / actual)
}
