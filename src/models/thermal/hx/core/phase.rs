//! Phase regimes and correlation dispatch keys.

use std::fmt;

/// Phase regime of one side of a region.
///
/// Two-phase regimes carry the direction of phase change, which selects
/// between boiling and condensation correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionPhase {
    Liquid,
    Vapor,
    TwoPhaseEvaporating,
    TwoPhaseCondensing,
    Supercritical,
}

impl RegionPhase {
    /// Phases that use single-phase correlations.
    pub const SINGLE_PHASE: [RegionPhase; 3] = [
        RegionPhase::Liquid,
        RegionPhase::Vapor,
        RegionPhase::Supercritical,
    ];

    /// Phases that use two-phase correlations.
    pub const TWO_PHASE: [RegionPhase; 2] = [
        RegionPhase::TwoPhaseEvaporating,
        RegionPhase::TwoPhaseCondensing,
    ];

    #[must_use]
    pub fn is_two_phase(self) -> bool {
        matches!(
            self,
            RegionPhase::TwoPhaseEvaporating | RegionPhase::TwoPhaseCondensing
        )
    }

    /// Returns the group selector this phase falls back to.
    #[must_use]
    pub fn group(self) -> PhaseSelector {
        if self.is_two_phase() {
            PhaseSelector::TwoPhase
        } else {
            PhaseSelector::SinglePhase
        }
    }
}

impl fmt::Display for RegionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionPhase::Liquid => "liquid",
            RegionPhase::Vapor => "vapor",
            RegionPhase::TwoPhaseEvaporating => "two-phase evaporating",
            RegionPhase::TwoPhaseCondensing => "two-phase condensing",
            RegionPhase::Supercritical => "supercritical",
        };
        f.write_str(name)
    }
}

/// Phase key used when registering correlations.
///
/// Lookups try the exact phase first, then its group, then [`PhaseSelector::Any`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseSelector {
    Exact(RegionPhase),
    SinglePhase,
    TwoPhase,
    Any,
}

impl PhaseSelector {
    /// Returns every phase this selector covers.
    #[must_use]
    pub fn phases(self) -> Vec<RegionPhase> {
        match self {
            PhaseSelector::Exact(phase) => vec![phase],
            PhaseSelector::SinglePhase => RegionPhase::SINGLE_PHASE.to_vec(),
            PhaseSelector::TwoPhase => RegionPhase::TWO_PHASE.to_vec(),
            PhaseSelector::Any => RegionPhase::SINGLE_PHASE
                .into_iter()
                .chain(RegionPhase::TWO_PHASE)
                .collect(),
        }
    }
}

impl From<RegionPhase> for PhaseSelector {
    fn from(phase: RegionPhase) -> Self {
        PhaseSelector::Exact(phase)
    }
}

/// Side of the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    WorkingFluid,
    SecondaryFluid,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::WorkingFluid, Side::SecondaryFluid];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::WorkingFluid => "wf",
            Side::SecondaryFluid => "sf",
        })
    }
}

/// Quantity a correlation computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Heat,
    Friction,
}

impl Target {
    pub const BOTH: [Target; 2] = [Target::Heat, Target::Friction];
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::Heat => "heat",
            Target::Friction => "friction",
        })
    }
}
