//! Import of exported annotation records back into regions.
//!
//! This reverses the export fan-out: records sharing an `id` describe the
//! same rectangle and are folded into one region with one attachment per
//! record. Imported geometry is in percent space and is resolved to pixels
//! by the first image-size update.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::attachment::{Attachment, AttachmentKind};
use super::export::{ExportRecord, RECTANGLE_TYPE};
use super::geometry::RegionGeometry;
use super::model::{ImageContext, Region};
use crate::error::RegionError;

/// Accepts a single record, a flat array, or an array of per-region
/// exports (objects or arrays).
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsInput {
    One(ExportRecord),
    Many(Vec<RecordsInput>),
}

impl RecordsInput {
    fn flatten_into(self, out: &mut Vec<ExportRecord>) {
        match self {
            RecordsInput::One(record) => out.push(record),
            RecordsInput::Many(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

/// Reads export records from a JSON file.
pub fn read_records(path: &Path) -> Result<Vec<ExportRecord>, RegionError> {
    let file = File::open(path).map_err(RegionError::Io)?;
    let reader = BufReader::new(file);

    let input: RecordsInput =
        serde_json::from_reader(reader).map_err(|source| RegionError::RecordParse {
            path: path.to_path_buf(),
            source,
        })?;
    let mut records = Vec::new();
    input.flatten_into(&mut records);
    Ok(records)
}

/// Parses export records from a JSON string.
pub fn from_records_str(json: &str) -> Result<Vec<ExportRecord>, RegionError> {
    let input: RecordsInput =
        serde_json::from_str(json).map_err(|source| RegionError::RecordParse {
            path: Path::new("<string>").to_path_buf(),
            source,
        })?;
    let mut records = Vec::new();
    input.flatten_into(&mut records);
    Ok(records)
}

/// Parses export records from JSON bytes.
pub fn from_records_slice(bytes: &[u8]) -> Result<Vec<ExportRecord>, RegionError> {
    let input: RecordsInput =
        serde_json::from_slice(bytes).map_err(|source| RegionError::RecordParse {
            path: Path::new("<bytes>").to_path_buf(),
            source,
        })?;
    let mut records = Vec::new();
    input.flatten_into(&mut records);
    Ok(records)
}

/// Folds records into regions, first-seen order.
///
/// Records of one id must agree on geometry and may not mix the bare
/// `"rectangle"` type with attachment types.
pub fn regions_from_records(records: &[ExportRecord]) -> Result<Vec<Region>, RegionError> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<(usize, &ExportRecord)>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        let group = groups.entry(record.id.as_str()).or_default();
        if group.is_empty() {
            order.push(record.id.as_str());
        }
        group.push((index, record));
    }

    let mut regions = Vec::with_capacity(order.len());
    for id in order {
        let group = &groups[id];
        let (first_index, first) = group[0];

        for (index, record) in group.iter().skip(1) {
            if record.geometry() != first.geometry() {
                return Err(invalid(
                    *index,
                    format!("region '{id}' has geometry differing from record {first_index}"),
                ));
            }
        }

        let (x, y, width, height, rotation) = first.geometry();
        let geometry = RegionGeometry::from_percent(x, y, width, height).with_rotation(rotation);
        let mut region = Region::with_id(id, geometry);
        region.normalization = first.normalization.clone();

        for (index, record) in group {
            if record.result_type == RECTANGLE_TYPE {
                if group.len() > 1 {
                    return Err(invalid(
                        *index,
                        format!("region '{id}' mixes '{RECTANGLE_TYPE}' with labeled records"),
                    ));
                }
                continue;
            }

            let kind = AttachmentKind::parse(&record.result_type).ok_or_else(|| {
                invalid(
                    *index,
                    format!("unsupported record type '{}'", record.result_type),
                )
            })?;
            let names = record
                .value
                .labels
                .get(kind.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let attachment = Attachment::from_selected(kind, record.from_name.clone(), names)
                .map_err(|source| RegionError::InvalidAttachment {
                    index: *index,
                    source,
                })?;
            region.add_state(attachment);
        }

        regions.push(region);
    }

    Ok(regions)
}

/// Builds an image context holding the regions described by `records`.
///
/// Control names are taken from the records' `from_name`s in first-seen
/// order; `value` comes from the first record's `source`.
pub fn image_from_records(
    name: impl Into<String>,
    natural_width: f64,
    natural_height: f64,
    records: &[ExportRecord],
) -> Result<ImageContext, RegionError> {
    let source = records
        .first()
        .map(|record| record.source.clone())
        .unwrap_or_default();
    let mut image = ImageContext::new(name, source, natural_width, natural_height);
    for record in records {
        if !image.controls.contains(&record.from_name) {
            image.controls.push(record.from_name.clone());
        }
    }
    for region in regions_from_records(records)? {
        image.add_region(region);
    }
    Ok(image)
}

fn invalid(index: usize, message: impl Into<String>) -> RegionError {
    RegionError::InvalidRecord {
        index,
        message: message.into(),
    }
}
