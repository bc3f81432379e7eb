//! Channel geometry descriptors.

use std::f64::consts::PI;

use uom::si::{
    angle::degree,
    f64::{Angle, Area, Length},
    length::meter,
};

use super::{ConfigError, Side};

/// Geometry class used as a correlation dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryClass {
    CorrugatedChevron,
    PlainPlate,
    TubeInTube,
}

impl GeometryClass {
    pub const ALL: [GeometryClass; 3] = [
        GeometryClass::CorrugatedChevron,
        GeometryClass::PlainPlate,
        GeometryClass::TubeInTube,
    ];

    #[must_use]
    pub fn is_plate(self) -> bool {
        !matches!(self, GeometryClass::TubeInTube)
    }
}

/// Numeric geometry fields that sizing may vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryField {
    /// Plate channel gap `b`, in meters.
    ChannelGap,
    /// Chevron angle `β`, in degrees.
    ChevronAngle,
    /// Corrugation pitch, in meters.
    CorrugationPitch,
    /// Area enlargement factor `φ`, dimensionless.
    AreaEnlargement,
    /// Tube bore diameter, in meters.
    TubeDiameter,
    /// Shell bore diameter, in meters.
    ShellDiameter,
}

impl GeometryField {
    pub(super) fn from_key(key: &str) -> Option<Self> {
        match key {
            "b" => Some(Self::ChannelGap),
            "beta" => Some(Self::ChevronAngle),
            "pitch" | "pitchCorr" | "pitch_corr" => Some(Self::CorrugationPitch),
            "phi" => Some(Self::AreaEnlargement),
            "Di" | "d_tube" | "tube_diameter" => Some(Self::TubeDiameter),
            "Do" | "d_shell" | "shell_diameter" => Some(Self::ShellDiameter),
            _ => None,
        }
    }

    /// Canonical attribute path segment.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::ChannelGap => "b",
            Self::ChevronAngle => "beta",
            Self::CorrugationPitch => "pitch",
            Self::AreaEnlargement => "phi",
            Self::TubeDiameter => "Di",
            Self::ShellDiameter => "Do",
        }
    }
}

/// Flow passage geometry of one side of a unit.
///
/// For [`Geometry::TubeInTube`] the working fluid flows in the tube bore and
/// the secondary fluid in the annulus. The annulus inner boundary is the bore
/// plus twice the wall thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    CorrugatedChevron {
        b: Length,
        beta: Angle,
        pitch: Length,
        phi: f64,
    },
    PlainPlate {
        b: Length,
    },
    TubeInTube {
        tube_diameter: Length,
        shell_diameter: Length,
    },
}

impl Geometry {
    #[must_use]
    pub fn class(&self) -> GeometryClass {
        match self {
            Geometry::CorrugatedChevron { .. } => GeometryClass::CorrugatedChevron,
            Geometry::PlainPlate { .. } => GeometryClass::PlainPlate,
            Geometry::TubeInTube { .. } => GeometryClass::TubeInTube,
        }
    }

    /// Checks the descriptor's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGeometry`] for non-positive lengths, a
    /// chevron angle outside `(0°, 90°)`, an area enlargement below one, or a
    /// tube-in-tube annulus with no gap.
    pub fn validate(&self, wall_thickness: Length) -> Result<(), ConfigError> {
        let positive = |name: &str, value: Length| {
            if value.get::<meter>() > 0.0 && value.get::<meter>().is_finite() {
                Ok(())
            } else {
                Err(ConfigError::invalid_geometry(format!(
                    "{name} must be positive, got {value:?}"
                )))
            }
        };

        match *self {
            Geometry::CorrugatedChevron {
                b,
                beta,
                pitch,
                phi,
            } => {
                positive("channel gap", b)?;
                positive("corrugation pitch", pitch)?;
                let beta = beta.get::<degree>();
                if !(beta > 0.0 && beta < 90.0) {
                    return Err(ConfigError::invalid_geometry(format!(
                        "chevron angle must be within (0, 90) degrees, got {beta}"
                    )));
                }
                if !(phi >= 1.0 && phi.is_finite()) {
                    return Err(ConfigError::invalid_geometry(format!(
                        "area enlargement factor must be at least 1, got {phi}"
                    )));
                }
                Ok(())
            }
            Geometry::PlainPlate { b } => positive("channel gap", b),
            Geometry::TubeInTube {
                tube_diameter,
                shell_diameter,
            } => {
                positive("tube diameter", tube_diameter)?;
                positive("shell diameter", shell_diameter)?;
                if shell_diameter <= tube_diameter + 2.0 * wall_thickness {
                    return Err(ConfigError::invalid_geometry(format!(
                        "annulus has no gap: shell {shell_diameter:?} <= tube {tube_diameter:?} + 2 * wall"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Hydraulic diameter of the passage this descriptor forms on `side`.
    #[must_use]
    pub fn hydraulic_diameter(&self, side: Side, wall_thickness: Length) -> Length {
        match *self {
            Geometry::CorrugatedChevron { b, phi, .. } => 2.0 * b / phi,
            Geometry::PlainPlate { b } => 2.0 * b,
            Geometry::TubeInTube {
                tube_diameter,
                shell_diameter,
            } => match side {
                Side::WorkingFluid => tube_diameter,
                Side::SecondaryFluid => shell_diameter - (tube_diameter + 2.0 * wall_thickness),
            },
        }
    }

    /// Flow area of a single channel (plates) or a single tube passage.
    #[must_use]
    pub fn flow_area(&self, side: Side, width: Length, wall_thickness: Length) -> Area {
        match *self {
            Geometry::CorrugatedChevron { b, .. } | Geometry::PlainPlate { b } => b * width,
            Geometry::TubeInTube {
                tube_diameter,
                shell_diameter,
            } => match side {
                Side::WorkingFluid => PI / 4.0 * tube_diameter * tube_diameter,
                Side::SecondaryFluid => {
                    let outer = tube_diameter + 2.0 * wall_thickness;
                    PI / 4.0 * (shell_diameter * shell_diameter - outer * outer)
                }
            },
        }
    }

    /// Returns a sizing field in its attribute unit, if this descriptor has it.
    #[must_use]
    pub fn field(&self, field: GeometryField) -> Option<f64> {
        match (*self, field) {
            (
                Geometry::CorrugatedChevron { b, .. } | Geometry::PlainPlate { b },
                GeometryField::ChannelGap,
            ) => Some(b.get::<meter>()),
            (Geometry::CorrugatedChevron { beta, .. }, GeometryField::ChevronAngle) => {
                Some(beta.get::<degree>())
            }
            (Geometry::CorrugatedChevron { pitch, .. }, GeometryField::CorrugationPitch) => {
                Some(pitch.get::<meter>())
            }
            (Geometry::CorrugatedChevron { phi, .. }, GeometryField::AreaEnlargement) => Some(phi),
            (Geometry::TubeInTube { tube_diameter, .. }, GeometryField::TubeDiameter) => {
                Some(tube_diameter.get::<meter>())
            }
            (Geometry::TubeInTube { shell_diameter, .. }, GeometryField::ShellDiameter) => {
                Some(shell_diameter.get::<meter>())
            }
            _ => None,
        }
    }

    /// Sets a sizing field from its attribute unit.
    ///
    /// The result is not validated; callers validate the whole unit afterwards.
    pub(super) fn set_field(
        &mut self,
        field: GeometryField,
        value: f64,
    ) -> Result<(), ConfigError> {
        let class = self.class();
        match (self, field) {
            (
                Geometry::CorrugatedChevron { b, .. } | Geometry::PlainPlate { b },
                GeometryField::ChannelGap,
            ) => *b = Length::new::<meter>(value),
            (Geometry::CorrugatedChevron { beta, .. }, GeometryField::ChevronAngle) => {
                *beta = Angle::new::<degree>(value);
            }
            (Geometry::CorrugatedChevron { pitch, .. }, GeometryField::CorrugationPitch) => {
                *pitch = Length::new::<meter>(value);
            }
            (Geometry::CorrugatedChevron { phi, .. }, GeometryField::AreaEnlargement) => {
                *phi = value;
            }
            (Geometry::TubeInTube { tube_diameter, .. }, GeometryField::TubeDiameter) => {
                *tube_diameter = Length::new::<meter>(value);
            }
            (Geometry::TubeInTube { shell_diameter, .. }, GeometryField::ShellDiameter) => {
                *shell_diameter = Length::new::<meter>(value);
            }
            _ => {
                return Err(ConfigError::UnsupportedAttribute {
                    attribute: format!("{field:?}"),
                    reason: format!("{class:?} geometry has no such field"),
                });
            }
        }
        Ok(())
    }
}
