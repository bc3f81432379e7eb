use std::{fmt, str::FromStr};

use crate::models::thermal::hx::core::{ConfigError, geometry::GeometryField};

/// A unit attribute that sizing can vary.
///
/// Values are exchanged as `f64` in the attribute's unit: meters for lengths,
/// degrees for the chevron angle, a count for [`SizeAttr::ElementCount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeAttr {
    Length,
    Width,
    ElementCount,
    WfGeometry(GeometryField),
    SfGeometry(GeometryField),
}

impl SizeAttr {
    /// Returns `true` for attributes that only take whole values.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, SizeAttr::ElementCount)
    }
}

impl FromStr for SizeAttr {
    type Err = ConfigError;

    /// Parses `"L"`, `"W"`, `"N"`, or a dotted geometry path such as
    /// `"geom_wf.b"` or `"geomSf.beta"`.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigError::UnknownAttribute {
            path: path.to_owned(),
        };

        match path {
            "L" | "length" => return Ok(SizeAttr::Length),
            "W" | "width" => return Ok(SizeAttr::Width),
            "N" | "NPlate" | "element_count" => return Ok(SizeAttr::ElementCount),
            _ => {}
        }

        let (head, key) = path.split_once('.').ok_or_else(unknown)?;
        let field = GeometryField::from_key(key).ok_or_else(unknown)?;
        match head {
            "geom_wf" | "geomWf" => Ok(SizeAttr::WfGeometry(field)),
            "geom_sf" | "geomSf" => Ok(SizeAttr::SfGeometry(field)),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for SizeAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeAttr::Length => write!(f, "L"),
            SizeAttr::Width => write!(f, "W"),
            SizeAttr::ElementCount => write!(f, "N"),
            SizeAttr::WfGeometry(field) => write!(f, "geom_wf.{}", field.key()),
            SizeAttr::SfGeometry(field) => write!(f, "geom_sf.{}", field.key()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths() {
        assert_eq!("L".parse(), Ok(SizeAttr::Length));
        assert_eq!("W".parse(), Ok(SizeAttr::Width));
        assert_eq!("N".parse(), Ok(SizeAttr::ElementCount));
        assert_eq!(
            "geom_wf.b".parse(),
            Ok(SizeAttr::WfGeometry(GeometryField::ChannelGap))
        );
        assert_eq!(
            "geomSf.beta".parse(),
            Ok(SizeAttr::SfGeometry(GeometryField::ChevronAngle))
        );
    }

    #[test]
    fn rejects_unknown_paths() {
        for path in ["", "X", "geom_wf", "geom_wf.gap", "geom_xx.b"] {
            assert_eq!(
                path.parse::<SizeAttr>(),
                Err(ConfigError::UnknownAttribute {
                    path: path.to_owned()
                }),
                "{path:?}"
            );
        }
    }

    #[test]
    fn display_parses_back() {
        for attr in [
            SizeAttr::Length,
            SizeAttr::ElementCount,
            SizeAttr::WfGeometry(GeometryField::CorrugationPitch),
            SizeAttr::SfGeometry(GeometryField::ShellDiameter),
        ] {
            assert_eq!(attr.to_string().parse(), Ok(attr));
        }
    }
}
