#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &str| {
    // Flattening arbitrary JSON documents should error, never panic
    if let Ok(document) = serde_json::from_str::<serde_json::Value>(data) {
        let _ = mdframe::record::flatten(&document, Path::new("fuzz.json"));
    }
});
