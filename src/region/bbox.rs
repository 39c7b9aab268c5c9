//! Axis-aligned bounds of a region, typed by coordinate space.

use super::coord::Coord;

/// An axis-aligned box stored as its min and max corners.
///
/// Like the rest of the region model this type does NOT enforce
/// min <= max; a negative scale produces a flipped box and validation
/// is expected to report it.
#[derive(Clone, Copy, PartialEq)]
pub struct Bounds<TSpace> {
    pub min: Coord<TSpace>,
    pub max: Coord<TSpace>,
}

impl<TSpace> Bounds<TSpace> {
    /// Creates bounds from explicit corner coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    /// Creates bounds from a top-left origin and a size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Width; negative for a flipped box.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height; negative for a flipped box.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Returns true if min <= max on both axes.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Strict containment: points on any edge are outside.
    #[inline]
    pub fn contains_strict(&self, px: f64, py: f64) -> bool {
        px > self.min.x && px < self.max.x && py > self.min.y && py < self.max.y
    }

    /// Returns true if the whole box lies within `[0, width] x [0, height]`,
    /// allowing each edge to overshoot by `tolerance`.
    pub fn is_within(&self, width: f64, height: f64, tolerance: f64) -> bool {
        self.min.x >= -tolerance
            && self.min.y >= -tolerance
            && self.max.x <= width + tolerance
            && self.max.y <= height + tolerance
    }

    /// Returns a copy with min and max swapped where needed.
    pub fn ordered(&self) -> Self {
        Self::from_xyxy(
            self.min.x.min(self.max.x),
            self.min.y.min(self.max.y),
            self.min.x.max(self.max.x),
            self.min.y.max(self.max.y),
        )
    }

    /// Axis-aligned envelope of this box rotated by `rotation_deg` degrees
    /// about `pivot`. The result is always ordered.
    pub fn rotated_about(&self, pivot: Coord<TSpace>, rotation_deg: f64) -> Self {
        if rotation_deg == 0.0 {
            return self.ordered();
        }

        let theta = rotation_deg.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();

        let corners = [
            (self.min.x, self.min.y),
            (self.max.x, self.min.y),
            (self.max.x, self.max.y),
            (self.min.x, self.max.y),
        ];

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for (x, y) in corners {
            let dx = x - pivot.x;
            let dy = y - pivot.y;
            let rx = pivot.x + (dx * cos_t) - (dy * sin_t);
            let ry = pivot.y + (dx * sin_t) + (dy * cos_t);

            min_x = min_x.min(rx);
            min_y = min_y.min(ry);
            max_x = max_x.max(rx);
            max_y = max_y.max(ry);
        }

        Self::from_xyxy(min_x, min_y, max_x, max_y)
    }
}

impl<TSpace> std::fmt::Debug for Bounds<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bounds")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}
