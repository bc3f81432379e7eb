use uom::si::f64::{MassDensity, ThermodynamicTemperature};

/// A fluid state fixed by temperature and density.
///
/// Temperature and density pin down a pure fluid everywhere, including
/// inside the vapor dome where temperature and pressure are coupled, so
/// every property capability takes a `State` as input.
///
/// `Fluid` is usually a marker such as [`Water`](crate::support::thermo::fluid::Water);
/// a CoolProp fluid carries its own identifier.
///
/// ```
/// use twine_hx::support::thermo::{State, fluid::Water};
/// use uom::si::{
///     f64::{MassDensity, ThermodynamicTemperature},
///     mass_density::kilogram_per_cubic_meter,
///     thermodynamic_temperature::degree_celsius,
/// };
///
/// let inlet = State::new(
///     ThermodynamicTemperature::new::<degree_celsius>(60.0),
///     MassDensity::new::<kilogram_per_cubic_meter>(983.2),
///     Water,
/// );
/// assert_eq!(inlet.fluid, Water);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<Fluid> {
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
    pub fluid: Fluid,
}

impl<Fluid> State<Fluid> {
    /// Builds a state from its three parts.
    #[must_use]
    pub fn new(temperature: ThermodynamicTemperature, density: MassDensity, fluid: Fluid) -> Self {
        Self {
            temperature,
            density,
            fluid,
        }
    }

    /// Replaces the density, keeping temperature and fluid.
    #[must_use]
    pub fn with_density(self, density: MassDensity) -> Self {
        Self { density, ..self }
    }
}
