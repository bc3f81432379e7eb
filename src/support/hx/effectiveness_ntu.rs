use std::ops::Deref;

use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::{f64::Ratio, ratio::ratio};

use crate::support::constraint::{Constrained, ConstraintResult, NonNegative, UnitInterval};

use super::CapacityRatio;

/// Effectiveness as a function of NTU for one flow arrangement.
pub trait EffectivenessRelation {
    fn effectiveness(&self, ntu: Ntu, capacity_ratio: CapacityRatio) -> Effectiveness;
}

/// NTU required to reach an effectiveness for one flow arrangement.
pub trait NtuRelation {
    /// # Errors
    ///
    /// Returns [`NtuError::Unreachable`] if no finite NTU reaches
    /// `effectiveness`, or a solver error for arrangements inverted numerically.
    fn ntu(&self, effectiveness: Effectiveness, capacity_ratio: CapacityRatio)
    -> Result<Ntu, NtuError>;
}

/// Errors returned by [`NtuRelation::ntu`].
#[derive(Debug, Error)]
pub enum NtuError {
    #[error("effectiveness {effectiveness} is unreachable at capacity ratio {capacity_ratio}")]
    Unreachable {
        effectiveness: f64,
        capacity_ratio: f64,
    },

    #[error("ntu inversion failed")]
    Bisection(#[from] bisection::Error),

    #[error("ntu inversion did not converge in {iters} iterations")]
    MaxIters { iters: usize },
}

/// Heat exchanger effectiveness, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effectiveness(Constrained<Ratio, UnitInterval>);

impl Effectiveness {
    /// # Errors
    ///
    /// Returns `Err` if the value lies outside `[0, 1]`.
    pub fn new(value: f64) -> ConstraintResult<Self> {
        Ok(Self(UnitInterval::new(Ratio::new::<ratio>(value))?))
    }

    /// Clamps a closed-form result into `[0, 1]`.
    pub(super) fn saturating(value: f64) -> Self {
        Self(Constrained::new_unchecked(Ratio::new::<ratio>(
            value.clamp(0.0, 1.0),
        )))
    }
}

impl Deref for Effectiveness {
    type Target = Ratio;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Number of transfer units `UA / C_min`, non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ntu(Constrained<Ratio, NonNegative>);

impl Ntu {
    /// # Errors
    ///
    /// Returns `Err` if the value is negative or NaN.
    pub fn new(value: f64) -> ConstraintResult<Self> {
        Ok(Self(NonNegative::new(Ratio::new::<ratio>(value))?))
    }

    pub(super) fn saturating(value: f64) -> Self {
        Self(Constrained::new_unchecked(Ratio::new::<ratio>(value.max(0.0))))
    }
}

impl Deref for Ntu {
    type Target = Ratio;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// An NTU query after the limits shared by every arrangement are handled.
pub(super) enum NtuQuery {
    /// Zero effectiveness or a zero capacity ratio, answered in closed form.
    Known(Ntu),
    /// Raw effectiveness and capacity ratio left for the arrangement.
    Open { eff: f64, cr: f64 },
}

impl NtuQuery {
    /// # Errors
    ///
    /// Returns [`NtuError::Unreachable`] for an effectiveness of one.
    pub(super) fn new(
        effectiveness: Effectiveness,
        capacity_ratio: CapacityRatio,
    ) -> Result<Self, NtuError> {
        let eff = effectiveness.get::<ratio>();
        let cr = capacity_ratio.get::<ratio>();

        if eff >= 1.0 {
            return Err(NtuError::Unreachable {
                effectiveness: eff,
                capacity_ratio: cr,
            });
        }
        if eff == 0.0 {
            return Ok(Self::Known(Ntu::saturating(0.0)));
        }
        if cr == 0.0 {
            return Ok(Self::Known(Ntu::saturating(-(1.0 - eff).ln())));
        }
        Ok(Self::Open { eff, cr })
    }
}
