//! Fuzz target for export record parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the record parser and
//! folds whatever parses back into regions.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rectregion::region::io_results::{from_records_slice, regions_from_records};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(records) = from_records_slice(data) {
        let _ = regions_from_records(&records);
    }
});
