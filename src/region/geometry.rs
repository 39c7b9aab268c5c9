//! Geometric state of a rectangle region.
//!
//! Geometry is stored unscaled: `x`/`y` is the top-left origin and
//! `width`/`height` the size before scaling. The on-screen size is
//! `width * scale_x` by `height * scale_y`, rotated by `rotation` degrees
//! about the origin.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::bbox::Bounds;
use super::coord::{is_usable_extent, percent_to_pixel, Coord};
use super::space::{CoordsType, Pixel};
use crate::error::RegionError;

/// Last known sizing of the owning image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageSizeSnapshot {
    pub natural_width: f64,
    pub natural_height: f64,
    pub display_width: f64,
    pub display_height: f64,
}

impl ImageSizeSnapshot {
    /// Displayed-to-natural ratio along x.
    pub fn width_ratio(&self) -> f64 {
        self.display_width / self.natural_width
    }

    /// Displayed-to-natural ratio along y.
    pub fn height_ratio(&self) -> f64 {
        self.display_height / self.natural_height
    }
}

/// Position, size, scale and rotation of a region, plus the space the
/// values are stored in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,

    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,

    #[serde(default)]
    pub coords_type: CoordsType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSizeSnapshot>,
}

fn unit_scale() -> f64 {
    1.0
}

/// A scale of zero or NaN is treated as unset.
#[inline]
fn effective_scale(scale: f64) -> f64 {
    if scale == 0.0 || scale.is_nan() {
        1.0
    } else {
        scale
    }
}

impl RegionGeometry {
    /// Creates pixel-space geometry with unit scale and no rotation.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            coords_type: CoordsType::Pixel,
            image_size: None,
        }
    }

    /// Creates percentage-space geometry that will be resolved against the
    /// display size on the first [`update_image_size`](Self::update_image_size).
    pub fn from_percent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            coords_type: CoordsType::Percent,
            ..Self::new(x, y, width, height)
        }
    }

    /// Sets the rotation in degrees.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the scale factors.
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Overwrites position, size and rotation.
    ///
    /// Negative (or NaN) sizes coming from gesture callbacks are clamped to
    /// zero; the position and rotation are taken as given.
    pub fn set_position(&mut self, x: f64, y: f64, width: f64, height: f64, rotation: f64) {
        if width < 0.0 || height < 0.0 {
            warn!("clamping negative region size {width}x{height} to zero");
        }
        self.x = x;
        self.y = y;
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.rotation = rotation;
    }

    /// Overwrites the scale factors. Negative values flip the rectangle.
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    /// Effective horizontal scale factor.
    #[inline]
    pub fn effective_scale_x(&self) -> f64 {
        effective_scale(self.scale_x)
    }

    /// Effective vertical scale factor.
    #[inline]
    pub fn effective_scale_y(&self) -> f64 {
        effective_scale(self.scale_y)
    }

    /// On-screen width (`width * scale_x`).
    #[inline]
    pub fn scaled_width(&self) -> f64 {
        self.width * self.effective_scale_x()
    }

    /// On-screen height (`height * scale_y`).
    #[inline]
    pub fn scaled_height(&self) -> f64 {
        self.height * self.effective_scale_y()
    }

    /// The origin as a pixel coordinate.
    #[inline]
    pub fn origin(&self) -> Coord<Pixel> {
        Coord::new(self.x, self.y)
    }

    /// Unrotated on-screen bounds.
    pub fn bounds(&self) -> Bounds<Pixel> {
        Bounds::from_xywh(self.x, self.y, self.scaled_width(), self.scaled_height())
    }

    /// Axis-aligned envelope of the rotated rectangle.
    pub fn envelope(&self) -> Bounds<Pixel> {
        self.bounds().rotated_about(self.origin(), self.rotation)
    }

    /// Hit test with strict inequality on all four sides.
    ///
    /// Rotation is ignored. Points on the boundary are outside, so a region
    /// drawn later wins where edges coincide.
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        self.bounds().contains_strict(px, py)
    }

    /// Returns true if every stored number is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.x,
            self.y,
            self.width,
            self.height,
            self.scale_x,
            self.scale_y,
            self.rotation,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Records a new image size and, on the first call for percentage-space
    /// geometry, resolves the geometry into pixels.
    ///
    /// Zero, negative or non-finite extents are rejected before anything is
    /// touched. The migration and the `coords_type` flip happen together;
    /// later calls only update the snapshot.
    pub fn update_image_size(
        &mut self,
        natural_width: f64,
        natural_height: f64,
        display_width: f64,
        display_height: f64,
    ) -> Result<(), RegionError> {
        let extents = [natural_width, natural_height, display_width, display_height];
        if !extents.iter().all(|extent| is_usable_extent(*extent)) {
            warn!(
                "rejecting image size update natural={natural_width}x{natural_height} display={display_width}x{display_height}"
            );
            return Err(RegionError::InvalidImageSize {
                natural_width,
                natural_height,
                display_width,
                display_height,
            });
        }

        self.image_size = Some(ImageSizeSnapshot {
            natural_width,
            natural_height,
            display_width,
            display_height,
        });

        if self.coords_type == CoordsType::Percent {
            self.x = percent_to_pixel(self.x, display_width);
            self.y = percent_to_pixel(self.y, display_height);
            self.width = percent_to_pixel(self.width, display_width);
            self.height = percent_to_pixel(self.height, display_height);
            self.coords_type = CoordsType::Pixel;
            debug!(
                "migrated region geometry to pixels against {display_width}x{display_height}"
            );
        }

        Ok(())
    }

    /// Display-to-natural ratios, falling back to `stage / natural` of the
    /// owning image before the first size update.
    pub fn display_ratios(
        &self,
        stage_width: f64,
        stage_height: f64,
        natural_width: f64,
        natural_height: f64,
    ) -> (f64, f64) {
        match &self.image_size {
            Some(snapshot) => (snapshot.width_ratio(), snapshot.height_ratio()),
            None => (stage_width / natural_width, stage_height / natural_height),
        }
    }
}
