//! Fuzz target for session JSON parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the session parser and
//! exports whatever parses, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rectregion::region::io_json::from_session_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(session) = from_session_slice(data) {
        let _ = session.export_all();
    }
});
