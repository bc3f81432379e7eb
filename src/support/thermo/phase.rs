use super::State;

/// Thermodynamic phase of a fluid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Subcooled or compressed liquid.
    Liquid,
    /// Saturated liquid/vapor mixture.
    TwoPhase,
    /// Superheated vapor or gas.
    Vapor,
    /// Above the critical pressure, where no phase boundary exists.
    Supercritical,
}

/// The saturation curve of a fluid at one pressure.
#[derive(Debug, Clone, PartialEq)]
pub enum Saturation<Fluid> {
    /// Liquid and vapor coexist; both saturated states are provided.
    TwoPhase {
        liquid: State<Fluid>,
        vapor: State<Fluid>,
    },
    /// No coexistence at this pressure; every state is in the given phase.
    SinglePhase(Phase),
}
