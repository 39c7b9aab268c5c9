//! Typed coordinate values and the pixel/percentage conversions.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::space::{Percent, Pixel};

/// Converts a percentage of `extent` into pixels.
///
/// `to_pixel(v, extent) = v * extent / 100`.
#[inline]
pub fn percent_to_pixel(value: f64, extent: f64) -> f64 {
    value * extent / 100.0
}

/// Converts a pixel value into a percentage of `extent`.
///
/// Callers must reject a zero `extent` first; the result is non-finite
/// otherwise.
#[inline]
pub fn pixel_to_percent(value: f64, extent: f64) -> f64 {
    value * 100.0 / extent
}

/// Returns true if `extent` can be used as a conversion denominator.
#[inline]
pub fn is_usable_extent(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}

/// A 2D coordinate with a type-level marker for the coordinate space.
///
/// The `TSpace` parameter should be either [`Pixel`](super::Pixel) or
/// [`Percent`](super::Percent), ensuring that coordinates from
/// different spaces cannot be accidentally mixed.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Coord<Pixel> {
    /// Drag-bound policy for in-progress drags: the position may not leave
    /// the stage through the top or left edge.
    ///
    /// Only x/y are clamped; sizes and the committed position are left alone.
    #[inline]
    pub fn clamp_drag(self) -> Self {
        Self::new(self.x.max(0.0), self.y.max(0.0))
    }

    /// Expresses this point as percentages of the given display extents.
    pub fn to_percent(&self, display_width: f64, display_height: f64) -> Coord<Percent> {
        Coord::new(
            pixel_to_percent(self.x, display_width),
            pixel_to_percent(self.y, display_height),
        )
    }
}

impl Coord<Percent> {
    /// Resolves this point against the given display extents.
    pub fn to_pixel(&self, display_width: f64, display_height: f64) -> Coord<Pixel> {
        Coord::new(
            percent_to_pixel(self.x, display_width),
            percent_to_pixel(self.y, display_height),
        )
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TSpace> Default for Coord<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

// Custom serde implementation to avoid TSpace: Serialize/Deserialize bounds
impl<TSpace> Serialize for Coord<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Coord", 2)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for Coord<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct CoordData {
            x: f64,
            y: f64,
        }
        let data = CoordData::deserialize(deserializer)?;
        Ok(Coord::new(data.x, data.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_pixel() {
        assert_eq!(percent_to_pixel(50.0, 200.0), 100.0);
        assert_eq!(percent_to_pixel(0.0, 200.0), 0.0);
        assert_eq!(percent_to_pixel(12.5, 800.0), 100.0);
    }

    #[test]
    fn test_pixel_to_percent() {
        assert_eq!(pixel_to_percent(100.0, 1000.0), 10.0);
        assert_eq!(pixel_to_percent(25.0, 1000.0), 2.5);
    }

    #[test]
    fn test_usable_extent() {
        assert!(is_usable_extent(1.0));
        assert!(!is_usable_extent(0.0));
        assert!(!is_usable_extent(-3.0));
        assert!(!is_usable_extent(f64::NAN));
        assert!(!is_usable_extent(f64::INFINITY));
    }

    #[test]
    fn test_drag_clamp_only_touches_negative_axes() {
        let clamped = Coord::<Pixel>::new(-5.0, 12.0).clamp_drag();
        assert_eq!(clamped, Coord::new(0.0, 12.0));

        let clamped = Coord::<Pixel>::new(40.0, -0.5).clamp_drag();
        assert_eq!(clamped, Coord::new(40.0, 0.0));
    }

    #[test]
    fn test_coord_space_conversion() {
        let pct: Coord<Percent> = Coord::new(50.0, 25.0);
        let px = pct.to_pixel(200.0, 400.0);
        assert_eq!(px, Coord::new(100.0, 100.0));
        assert_eq!(px.to_percent(200.0, 400.0), pct);
    }

    #[test]
    fn test_coord_is_finite() {
        let finite: Coord<Pixel> = Coord::new(10.0, 20.0);
        assert!(finite.is_finite());

        let nan: Coord<Pixel> = Coord::new(f64::NAN, 20.0);
        assert!(!nan.is_finite());
    }
}
