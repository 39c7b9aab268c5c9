//! Coordinate space marker types and the runtime coordinate-space tag.
//!
//! The marker types are zero-sized types (ZSTs) used as type parameters to
//! distinguish pixel and percentage values at compile time. Region geometry
//! itself is loaded from documents where the space is only known at runtime,
//! so it carries a [`CoordsType`] tag instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker type for pixel coordinates (absolute values on the stage).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for percentage coordinates (0.0 to 100.0 of the display size).
///
/// Percentages are what the export record carries, making it
/// resolution-independent.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Percent {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Pixel has no variants
    }
}

impl fmt::Debug for Percent {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Percent has no variants
    }
}

/// The space a region's stored geometry is expressed in.
///
/// `Percent` only exists between deserialization and the first image-size
/// update; after that the region is always in `Pixel` space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordsType {
    #[default]
    #[serde(rename = "px")]
    Pixel,
    #[serde(rename = "perc")]
    Percent,
}

impl CoordsType {
    /// Returns the short tag used in session documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordsType::Pixel => "px",
            CoordsType::Percent => "perc",
        }
    }
}

impl fmt::Display for CoordsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_type_uses_short_tags() {
        assert_eq!(
            serde_json::to_string(&CoordsType::Percent).unwrap(),
            "\"perc\""
        );
        let parsed: CoordsType = serde_json::from_str("\"px\"").unwrap();
        assert_eq!(parsed, CoordsType::Pixel);
        assert_eq!(CoordsType::default(), CoordsType::Pixel);
    }
}
