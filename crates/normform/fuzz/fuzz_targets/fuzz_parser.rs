//! Fuzz target for the data loader.
//!
//! This fuzzer tests that the CSV/TSV loader:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Reports ragged rows as errors instead of repairing them

#![no_main]

use libfuzzer_sys::fuzz_target;
use normform::{Parser, ParserConfig};
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = Parser::new().parse_file(temp_file.path());

            let composite = Parser::with_config(ParserConfig {
                composite_values: true,
                ..Default::default()
            });
            let _ = composite.parse_file(temp_file.path());
        }
    }
});
