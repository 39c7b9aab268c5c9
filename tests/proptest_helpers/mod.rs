#![allow(dead_code)]

use rectregion::region::{
    Attachment, ExportRecord, ImageContext, LabelSet, Rating, Region, RegionGeometry,
};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Tolerance for geometry that passes through a percent round trip.
pub const EPS_PERCENT: f64 = 1e-6;

const LABEL_POOL: &[&str] = &["cat", "dog", "bird", "car", "person"];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps * a.abs().max(b.abs()).max(1.0)
}

pub fn arb_pixel_geometry() -> BoxedStrategy<RegionGeometry> {
    (
        0.0f64..1000.0,
        0.0f64..1000.0,
        0.0f64..500.0,
        0.0f64..500.0,
        -180.0f64..180.0,
        0.5f64..2.0,
        0.5f64..2.0,
    )
        .prop_map(|(x, y, w, h, rotation, sx, sy)| {
            RegionGeometry::new(x, y, w, h)
                .with_rotation(rotation)
                .with_scale(sx, sy)
        })
        .boxed()
}

pub fn arb_percent_geometry() -> BoxedStrategy<RegionGeometry> {
    (0.0f64..100.0, 0.0f64..100.0, 0.0f64..100.0, 0.0f64..100.0)
        .prop_map(|(x, y, w, h)| RegionGeometry::from_percent(x, y, w, h))
        .boxed()
}

pub fn arb_label_set() -> BoxedStrategy<LabelSet> {
    (
        proptest::sample::subsequence(LABEL_POOL.to_vec(), 0..=LABEL_POOL.len()),
        any::<bool>(),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(values, multiple, pick)| {
            let mut set = LabelSet::new("label");
            if multiple {
                set = set.multiple();
            }
            for value in &values {
                set = set.with_label(*value);
            }
            if multiple {
                for value in values.iter().step_by(2) {
                    set.select(value);
                }
            } else if !values.is_empty() {
                set.select(values[pick.index(values.len())]);
            }
            set
        })
        .boxed()
}

pub fn arb_attachment() -> BoxedStrategy<Attachment> {
    prop_oneof![
        arb_label_set().prop_map(Attachment::Labels),
        arb_label_set().prop_map(Attachment::RectangleLabels),
        (1u32..10, 0u32..10).prop_map(|(max, value)| {
            let mut rating = Rating::new("quality").with_max(max);
            rating.set_rating(value);
            Attachment::Rating(rating)
        }),
    ]
    .boxed()
}

pub fn arb_image(max_regions: usize, max_attachments: usize) -> BoxedStrategy<ImageContext> {
    (
        100.0f64..2000.0,
        100.0f64..2000.0,
        prop::collection::vec(
            (
                arb_pixel_geometry(),
                prop::collection::vec(arb_attachment(), 0..=max_attachments),
            ),
            0..=max_regions,
        ),
    )
        .prop_map(|(stage_w, stage_h, regions)| {
            let mut image = ImageContext::new("image", "img.jpg", stage_w * 2.0, stage_h * 2.0)
                .with_stage(stage_w, stage_h)
                .with_control("label");
            for (i, (geometry, attachments)) in regions.into_iter().enumerate() {
                let mut region = Region::with_id(format!("r{i}"), geometry);
                for attachment in attachments {
                    region.add_state(attachment);
                }
                image.add_region(region);
            }
            image
        })
        .boxed()
}

/// Geometry and selected names of one record, in record order.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSem {
    pub id: String,
    pub result_type: String,
    pub names: Vec<Vec<String>>,
    pub geometry: (f64, f64, f64, f64, f64),
}

pub fn record_semantics(records: &[ExportRecord]) -> Vec<RecordSem> {
    records
        .iter()
        .map(|record| RecordSem {
            id: record.id.clone(),
            result_type: record.result_type.clone(),
            names: record.value.labels.values().cloned().collect(),
            geometry: record.geometry(),
        })
        .collect()
}

pub fn assert_records_close(left: &[RecordSem], right: &[RecordSem]) -> Result<(), String> {
    if left.len() != right.len() {
        return Err(format!("record count {} != {}", left.len(), right.len()));
    }
    for (a, b) in left.iter().zip(right) {
        if a.id != b.id || a.result_type != b.result_type || a.names != b.names {
            return Err(format!("record mismatch: {a:?} vs {b:?}"));
        }
        let (ax, ay, aw, ah, ar) = a.geometry;
        let (bx, by, bw, bh, br) = b.geometry;
        let pairs = [(ax, bx), (ay, by), (aw, bw), (ah, bh), (ar, br)];
        if !pairs.iter().all(|(l, r)| approx_eq(*l, *r, EPS_PERCENT)) {
            return Err(format!("geometry mismatch: {a:?} vs {b:?}"));
        }
    }
    Ok(())
}
