use crate::support::thermo::State;

use super::ThermoModel;

/// Capability for constructing a [`State`] from a typed input.
///
/// `StateFrom<Input>` expresses at compile time which input combinations a
/// model can use to construct a state. Heat exchanger boundary flows are
/// usually built from `(Fluid, ThermodynamicTemperature, Pressure)` or
/// `(Fluid, Pressure, SpecificEnthalpy)`; region states inside the exchanger
/// are always built from pressure and enthalpy, since enthalpy is the
/// variable that stays well defined across a phase change.
///
/// A `Fluid` may carry state-defining data such as mixture composition, which
/// is why it is part of the input. When the fluid is a marker type with a
/// [`Default`], the blanket impl below also accepts the shorter `(A, B)` form.
pub trait StateFrom<Input>: ThermoModel {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a thermodynamic state from the provided input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be created from `input`.
    fn state_from(&self, input: Input) -> Result<State<Self::Fluid>, Self::Error>;
}

/// Default-fluid convenience impl: `(A, B)` becomes `(Fluid::default(), A, B)`.
impl<M, A, B> StateFrom<(A, B)> for M
where
    M: ThermoModel + StateFrom<(<M as ThermoModel>::Fluid, A, B)>,
    <M as ThermoModel>::Fluid: Default,
{
    type Error = <M as StateFrom<(<M as ThermoModel>::Fluid, A, B)>>::Error;

    fn state_from(&self, (a, b): (A, B)) -> Result<State<Self::Fluid>, Self::Error> {
        self.state_from((<M as ThermoModel>::Fluid::default(), a, b))
    }
}
