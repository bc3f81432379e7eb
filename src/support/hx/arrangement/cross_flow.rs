//! Single-pass cross-flow with both streams unmixed.
//!
//! The effectiveness uses the standard closed-form approximation. It has no
//! closed-form inverse, so NTU is found by bisection.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;
use uom::si::ratio::ratio;

use crate::support::hx::{
    CapacityRatio, Effectiveness, Ntu, NtuError,
    arrangement::CounterFlow,
    effectiveness_ntu::{EffectivenessRelation, NtuRelation, NtuQuery},
};

/// Cross-flow arrangement, both streams unmixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossFlow;

fn unmixed_effectiveness(ntu: f64, cr: f64) -> f64 {
    if cr == 0.0 {
        return 1.0 - (-ntu).exp();
    }
    1.0 - ((ntu.powf(0.22) / cr) * ((-cr * ntu.powf(0.78)).exp() - 1.0)).exp()
}

impl EffectivenessRelation for CrossFlow {
    fn effectiveness(&self, ntu: Ntu, capacity_ratio: CapacityRatio) -> Effectiveness {
        Effectiveness::saturating(unmixed_effectiveness(
            ntu.get::<ratio>(),
            capacity_ratio.get::<ratio>(),
        ))
    }
}

impl NtuRelation for CrossFlow {
    fn ntu(
        &self,
        effectiveness: Effectiveness,
        capacity_ratio: CapacityRatio,
    ) -> Result<Ntu, NtuError> {
        let (eff, cr) = match NtuQuery::new(effectiveness, capacity_ratio)? {
            NtuQuery::Known(ntu) => return Ok(ntu),
            NtuQuery::Open { eff, cr } => (eff, cr),
        };

        // Cross-flow never beats counter-flow, so its NTU is a lower bound.
        let lo = CounterFlow.ntu(effectiveness, capacity_ratio)?.get::<ratio>();
        if unmixed_effectiveness(lo, cr) >= eff {
            return Ok(Ntu::saturating(lo));
        }

        let mut hi = 2.0 * lo.max(0.05);
        let mut doublings = 0;
        while unmixed_effectiveness(hi, cr) < eff {
            doublings += 1;
            if doublings > 64 {
                return Err(NtuError::Unreachable {
                    effectiveness: eff,
                    capacity_ratio: cr,
                });
            }
            hi *= 2.0;
        }

        let model = UnmixedModel { cr };
        let problem = TargetEffectiveness { eff };
        let config = bisection::Config {
            max_iters: 200,
            x_abs_tol: 1e-14,
            x_rel_tol: 1e-12,
            residual_tol: 1e-14,
        };

        let solution = bisection::solve(
            &model,
            &problem,
            [lo, hi],
            &config,
            |_event: &bisection::Event<'_, _, _>| None,
        )?;

        if solution.status != bisection::Status::Converged {
            return Err(NtuError::MaxIters {
                iters: solution.iters,
            });
        }

        Ok(Ntu::saturating(solution.x))
    }
}

/// Maps NTU to effectiveness at a fixed capacity ratio.
struct UnmixedModel {
    cr: f64,
}

impl Model for UnmixedModel {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, ntu: &f64) -> Result<f64, Self::Error> {
        Ok(unmixed_effectiveness(*ntu, self.cr))
    }
}

/// Residual `ε(NTU) - ε_target`.
struct TargetEffectiveness {
    eff: f64,
}

impl EquationProblem<1> for TargetEffectiveness {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, Self::Error> {
        Ok(x[0])
    }

    fn residuals(&self, _ntu: &f64, eff: &f64) -> Result<[f64; 1], Self::Error> {
        Ok([eff - self.eff])
    }
}
