//! Presentation attributes of a region and their projection into the
//! properties a rendering surface draws with.

use serde::{Deserialize, Serialize};

/// Stroke colour used while a region is highlighted.
pub const HIGHLIGHT_STROKE: &str = "#ff0000";

/// Presentation-only attributes.
///
/// Expected ranges are `opacity` in `[0, 1]` and `stroke_width >= 0`;
/// out-of-range values are representable and reported by validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionStyle {
    pub opacity: f64,
    pub stroke_width: f64,
    pub stroke_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

impl Default for RegionStyle {
    fn default() -> Self {
        Self {
            opacity: 0.6,
            stroke_width: 1.0,
            stroke_color: "#00ff00".to_string(),
            fill_color: None,
        }
    }
}

impl RegionStyle {
    pub fn new(opacity: f64, stroke_width: f64, stroke_color: impl Into<String>) -> Self {
        Self {
            opacity,
            stroke_width,
            stroke_color: stroke_color.into(),
            fill_color: None,
        }
    }

    /// Sets the fill colour.
    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    /// Replaces the fill colour.
    pub fn set_fill(&mut self, color: impl Into<String>) {
        self.fill_color = Some(color.into());
    }

    pub fn opacity_in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.opacity)
    }

    pub fn stroke_width_in_range(&self) -> bool {
        self.stroke_width >= 0.0
    }
}

/// What a rendering surface needs to draw one region.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShapeProps {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub stroke: String,
    pub stroke_width: f64,
    /// Stroke width stays constant in screen space when the shape scales.
    pub stroke_scale_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub draggable: bool,
}
