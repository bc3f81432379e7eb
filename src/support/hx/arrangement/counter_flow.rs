//! Counter-flow effectiveness-NTU relations.

use uom::si::ratio::ratio;

use crate::support::hx::{
    CapacityRatio, Effectiveness, Ntu, NtuError,
    effectiveness_ntu::{EffectivenessRelation, NtuRelation, NtuQuery},
};

/// Counter-flow arrangement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterFlow;

impl EffectivenessRelation for CounterFlow {
    fn effectiveness(&self, ntu: Ntu, capacity_ratio: CapacityRatio) -> Effectiveness {
        let (ntu, cr) = (ntu.get::<ratio>(), capacity_ratio.get::<ratio>());
        let eff = if cr < 1.0 {
            let e = (-ntu * (1.0 - cr)).exp();
            (1.0 - e) / (1.0 - cr * e)
        } else {
            ntu / (1.0 + ntu)
        };
        Effectiveness::saturating(eff)
    }
}

impl NtuRelation for CounterFlow {
    fn ntu(
        &self,
        effectiveness: Effectiveness,
        capacity_ratio: CapacityRatio,
    ) -> Result<Ntu, NtuError> {
        let (eff, cr) = match NtuQuery::new(effectiveness, capacity_ratio)? {
            NtuQuery::Known(ntu) => return Ok(ntu),
            NtuQuery::Open { eff, cr } => (eff, cr),
        };

        let ntu = if cr < 1.0 {
            ((1.0 - eff * cr) / (1.0 - eff)).ln() / (1.0 - cr)
        } else {
            eff / (1.0 - eff)
        };
        Ok(Ntu::saturating(ntu))
    }
}
