//! Criterion microbenches for rectregion export and import.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Session JSON parsing (from_session_str)
//! - Region export with attachment fan-out (export_all)
//! - Export record parsing and folding (from_records_str, regions_from_records)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use rectregion::region::io_json::from_session_str;
use rectregion::region::io_results::{from_records_str, regions_from_records};
use rectregion::region::{
    Attachment, ExportRecord, ImageContext, LabelSet, Rating, Region, RegionGeometry, Session,
};

// Include test fixtures at compile time (no file I/O during benchmark)
const SESSION_FIXTURE: &str = include_str!("../tests/fixtures/sample_valid.session.json");
const RECORDS_FIXTURE: &str = include_str!("../tests/fixtures/sample_records.json");

const GRID_REGIONS: usize = 1000;

/// Builds a session with `count` labeled and rated regions on a grid.
fn grid_session(count: usize) -> Session {
    let mut image = ImageContext::new("image", "img.jpg", 4000.0, 3000.0)
        .with_stage(1000.0, 750.0)
        .with_control("label");
    for i in 0..count {
        let mut labels = LabelSet::new("label").with_label("cat").with_label("dog");
        labels.select(if i % 2 == 0 { "cat" } else { "dog" });
        let mut rating = Rating::new("quality");
        rating.set_rating((i % 5) as u32 + 1);

        let geometry =
            RegionGeometry::new((i % 40) as f64 * 25.0, (i / 40) as f64 * 25.0, 20.0, 20.0);
        image.add_region(
            Region::with_id(format!("r{i}"), geometry)
                .with_attachment(Attachment::Labels(labels))
                .with_attachment(Attachment::Rating(rating)),
        );
    }
    Session::from_images(vec![image])
}

/// Benchmark session JSON parsing from string.
fn bench_session_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_parse");
    group.throughput(Throughput::Bytes(SESSION_FIXTURE.len() as u64));

    group.bench_function("from_session_str", |b| {
        b.iter(|| {
            let session = from_session_str(black_box(SESSION_FIXTURE)).unwrap();
            black_box(session)
        })
    });

    group.finish();
}

/// Benchmark exporting a session with two attachments per region.
fn bench_export(c: &mut Criterion) {
    // Build the session once (outside the timed region)
    let session = grid_session(GRID_REGIONS);

    let mut group = c.benchmark_group("export");
    // Throughput based on number of regions
    group.throughput(Throughput::Elements(GRID_REGIONS as u64));

    group.bench_function("export_all", |b| {
        b.iter(|| {
            let records = black_box(&session).export_all().unwrap();
            black_box(records)
        })
    });

    group.finish();
}

/// Benchmark parsing export records and folding them back into regions.
fn bench_records_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("records_import");
    group.throughput(Throughput::Bytes(RECORDS_FIXTURE.len() as u64));

    group.bench_function("from_records_str", |b| {
        b.iter(|| {
            let records = from_records_str(black_box(RECORDS_FIXTURE)).unwrap();
            black_box(records)
        })
    });

    // Export once to get records, then benchmark folding them
    let records: Vec<ExportRecord> = grid_session(GRID_REGIONS)
        .export_all()
        .expect("Failed to export grid session");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("regions_from_records", |b| {
        b.iter(|| {
            let regions = regions_from_records(black_box(&records)).unwrap();
            black_box(regions)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_session_parse,
    bench_export,
    bench_records_import,
);
criterion_main!(benches);
