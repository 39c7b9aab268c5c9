//! Export of regions as annotation result records.
//!
//! Geometry is normalized against the owning image's *current* stage size,
//! so exported values are percentages regardless of the size the stored
//! pixel geometry was captured at. Geometry still in percentage space is
//! already relative and is exported unchanged (scale applied). A region
//! with attachments fans out into one record per attachment; a bare region
//! exports a single `"rectangle"` record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::coord::{is_usable_extent, pixel_to_percent};
use super::ids::RegionId;
use super::model::{ImageContext, Region, Session};
use super::space::CoordsType;
use crate::error::RegionError;

/// Record `type` of a region exported without attachments.
pub const RECTANGLE_TYPE: &str = "rectangle";

/// Normalized geometry plus, for attachment records, the selected names
/// keyed by attachment kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportValue {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    #[serde(flatten)]
    pub labels: BTreeMap<String, Vec<String>>,
}

/// One exported annotation result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub id: String,
    pub from_name: String,
    pub to_name: String,
    pub source: String,
    #[serde(rename = "type")]
    pub result_type: String,
    pub value: ExportValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<serde_json::Value>,
}

impl ExportRecord {
    /// Geometry part of the value, without label names.
    pub fn geometry(&self) -> (f64, f64, f64, f64, f64) {
        let v = &self.value;
        (v.x, v.y, v.width, v.height, v.rotation)
    }
}

/// Result of exporting one region: a single record for a bare region, one
/// record per attachment otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exported {
    Single(ExportRecord),
    FanOut(Vec<ExportRecord>),
}

impl Exported {
    pub fn len(&self) -> usize {
        match self {
            Exported::Single(_) => 1,
            Exported::FanOut(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_records(self) -> Vec<ExportRecord> {
        match self {
            Exported::Single(record) => vec![record],
            Exported::FanOut(records) => records,
        }
    }
}

impl Region {
    /// Projects this region into export records against `parent`.
    ///
    /// Fails if the parent declares no labeling control (no `from_name`) or
    /// if its stage size cannot be used as a denominator.
    pub fn to_export(&self, parent: &ImageContext) -> Result<Exported, RegionError> {
        let from_name = parent
            .first_control()
            .ok_or_else(|| RegionError::MissingControlTag {
                image: parent.name.clone(),
                region: self.id().to_string(),
            })?;

        let (stage_width, stage_height) = (parent.stage_width, parent.stage_height);
        if !is_usable_extent(stage_width) || !is_usable_extent(stage_height) {
            return Err(RegionError::InvalidStageSize {
                image: parent.name.clone(),
                width: stage_width,
                height: stage_height,
            });
        }

        let geometry = &self.geometry;
        let (x, y, width, height) = match geometry.coords_type {
            CoordsType::Pixel => (
                pixel_to_percent(geometry.x, stage_width),
                pixel_to_percent(geometry.y, stage_height),
                pixel_to_percent(geometry.scaled_width(), stage_width),
                pixel_to_percent(geometry.scaled_height(), stage_height),
            ),
            // Never resolved against a display size; the values are already relative.
            CoordsType::Percent => (
                geometry.x,
                geometry.y,
                geometry.scaled_width(),
                geometry.scaled_height(),
            ),
        };
        let base = ExportRecord {
            id: self.id().to_string(),
            from_name: from_name.to_string(),
            to_name: parent.name.clone(),
            source: parent.value.clone(),
            result_type: RECTANGLE_TYPE.to_string(),
            value: ExportValue {
                x,
                y,
                width,
                height,
                rotation: geometry.rotation,
                labels: BTreeMap::new(),
            },
            normalization: self.normalization.clone(),
        };

        if self.attachments.is_empty() {
            return Ok(Exported::Single(base));
        }

        let records = self
            .attachments
            .iter()
            .map(|attachment| {
                let kind = attachment.kind().as_str();
                let mut record = base.clone();
                record
                    .value
                    .labels
                    .insert(kind.to_string(), attachment.selected_names());
                record.result_type = kind.to_string();
                record
            })
            .collect();

        Ok(Exported::FanOut(records))
    }
}

impl ImageContext {
    /// Exports one region of this image.
    pub fn export_region(&self, id: &RegionId) -> Result<Exported, RegionError> {
        self.region(id)
            .ok_or_else(|| RegionError::RegionNotFound(id.to_string()))?
            .to_export(self)
    }

    /// Exports every region in drawing order, flattened.
    pub fn export_all(&self) -> Result<Vec<ExportRecord>, RegionError> {
        let mut records = Vec::new();
        for region in self.regions() {
            records.extend(region.to_export(self)?.into_records());
        }
        Ok(records)
    }
}

impl Session {
    /// Exports every region of every image, flattened.
    pub fn export_all(&self) -> Result<Vec<ExportRecord>, RegionError> {
        let mut records = Vec::new();
        for image in self.images() {
            records.extend(image.export_all()?);
        }
        Ok(records)
    }
}

/// Serializes records as a pretty JSON array.
pub fn to_records_string(records: &[ExportRecord]) -> Result<String, RegionError> {
    serde_json::to_string_pretty(records).map_err(RegionError::RecordWrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{Attachment, LabelSet, Rating, RegionGeometry};

    fn stage_1000() -> ImageContext {
        ImageContext::new("image", "https://example.com/a.jpg", 2000.0, 2000.0)
            .with_stage(1000.0, 1000.0)
            .with_control("label")
    }

    #[test]
    fn test_bare_region_exports_single_rectangle() {
        let image = stage_1000().with_region(Region::with_id(
            "r1",
            RegionGeometry::new(100.0, 200.0, 50.0, 25.0),
        ));
        let exported = image.export_region(&RegionId::new("r1")).unwrap();

        let Exported::Single(record) = exported else {
            panic!("expected a single record");
        };
        assert_eq!(record.result_type, "rectangle");
        assert_eq!(record.from_name, "label");
        assert_eq!(record.to_name, "image");
        assert_eq!(record.source, "https://example.com/a.jpg");
        assert_eq!(record.geometry(), (10.0, 20.0, 5.0, 2.5, 0.0));
        assert!(record.value.labels.is_empty());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("normalization").is_none());
        assert_eq!(json["value"].as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_scale_x_doubles_width_only() {
        let image = stage_1000().with_region(Region::with_id(
            "r1",
            RegionGeometry::new(100.0, 200.0, 50.0, 25.0).with_scale(2.0, 1.0),
        ));
        let record = image.export_all().unwrap().remove(0);
        assert_eq!(record.value.width, 10.0);
        assert_eq!(record.value.height, 2.5);
    }

    #[test]
    fn test_attachments_fan_out() {
        let mut labels = LabelSet::new("label").with_label("cat").with_label("dog");
        labels.select("cat");
        let mut rating = Rating::new("quality");
        rating.set_rating(4);

        let geometry = RegionGeometry::new(100.0, 200.0, 50.0, 25.0).with_rotation(30.0);
        let region = Region::with_id("r1", geometry)
            .with_attachment(Attachment::Labels(labels))
            .with_attachment(Attachment::Rating(rating));
        let image = stage_1000().with_region(region);

        let exported = image.export_region(&RegionId::new("r1")).unwrap();
        assert_eq!(exported.len(), 2);
        let records = exported.into_records();

        let (first, second) = (&records[0], &records[1]);
        assert_eq!(first.id, second.id);
        assert_eq!(first.from_name, second.from_name);
        assert_eq!(first.to_name, second.to_name);
        assert_eq!(first.source, second.source);
        assert_eq!(first.geometry(), second.geometry());
        assert_eq!(first.geometry().4, 30.0);

        assert_eq!(first.result_type, "labels");
        assert_eq!(first.value.labels.get("labels"), Some(&vec!["cat".to_string()]));
        assert!(!first.value.labels.contains_key("rating"));

        assert_eq!(second.result_type, "rating");
        assert_eq!(second.value.labels.get("rating"), Some(&vec!["4".to_string()]));
        assert!(!second.value.labels.contains_key("labels"));
    }

    #[test]
    fn test_fan_out_serializes_as_array() {
        let region = Region::with_id("r1", RegionGeometry::new(0.0, 0.0, 10.0, 10.0))
            .with_attachment(Attachment::RectangleLabels(LabelSet::new("box")));
        let image = stage_1000().with_region(region);
        let json = serde_json::to_value(image.export_region(&RegionId::new("r1")).unwrap()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["type"], "rectanglelabels");
        assert_eq!(json[0]["value"]["rectanglelabels"], serde_json::json!([]));
    }

    #[test]
    fn test_normalization_is_copied() {
        let region = Region::with_id("r1", RegionGeometry::new(0.0, 0.0, 10.0, 10.0))
            .with_normalization(serde_json::json!("shared-config"));
        let image = stage_1000().with_region(region);
        let json = serde_json::to_value(image.export_all().unwrap()).unwrap();
        assert_eq!(json[0]["normalization"], "shared-config");
    }

    #[test]
    fn test_export_uses_current_stage_size() {
        let mut image = stage_1000().with_region(Region::with_id(
            "r1",
            RegionGeometry::new(100.0, 100.0, 100.0, 100.0),
        ));
        image.resize(2000.0, 2000.0, 500.0, 500.0).unwrap();
        let record = image.export_all().unwrap().remove(0);
        assert_eq!(record.value.x, 20.0);
        assert_eq!(record.value.width, 20.0);
    }

    #[test]
    fn test_percent_geometry_exports_unchanged() {
        let image = ImageContext::new("image", "a.jpg", 800.0, 600.0)
            .with_control("label")
            .with_region(Region::with_id(
                "p",
                RegionGeometry::from_percent(50.0, 50.0, 10.0, 20.0).with_scale(2.0, 1.0),
            ));
        let record = image.export_all().unwrap().remove(0);
        assert_eq!(record.geometry(), (50.0, 50.0, 20.0, 20.0, 0.0));

        // Resolving against any display size gives the same export.
        let mut resolved = image.clone();
        resolved.resize(800.0, 600.0, 400.0, 300.0).unwrap();
        assert_eq!(resolved.export_all().unwrap()[0].geometry(), record.geometry());
    }

    #[test]
    fn test_missing_control_fails_loudly() {
        let image = ImageContext::new("image", "a.jpg", 10.0, 10.0)
            .with_region(Region::with_id("r1", RegionGeometry::new(0.0, 0.0, 1.0, 1.0)));
        let err = image.export_all().expect_err("no control tag");
        match err {
            RegionError::MissingControlTag { image, region } => {
                assert_eq!(image, "image");
                assert_eq!(region, "r1");
            }
            other => panic!("expected MissingControlTag, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_stage_fails() {
        let image = stage_1000()
            .with_stage(0.0, 100.0)
            .with_region(Region::with_id("r1", RegionGeometry::new(0.0, 0.0, 1.0, 1.0)));
        assert!(matches!(
            image.export_all(),
            Err(RegionError::InvalidStageSize { .. })
        ));
    }
}
