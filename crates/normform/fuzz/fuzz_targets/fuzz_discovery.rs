//! Fuzz target for dependency discovery and classification.
//!
//! Any table the loader accepts must go through discovery and classification
//! without panicking. Wide tables are skipped since discovery is exponential
//! in the attribute count.

#![no_main]

use libfuzzer_sys::fuzz_target;
use normform::{DependencyRule, DiscoveryConfig, Parser, PrimaryKey, classify, discover};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(dataset) = Parser::new().parse_str("fuzz.csv", text) else {
        return;
    };
    if dataset.attribute_count() > 8 {
        return;
    }

    for rule in [DependencyRule::RowUniqueness, DependencyRule::ValueConsistency] {
        let config = DiscoveryConfig {
            rule,
            ..Default::default()
        };
        if let Ok(dependencies) = discover(&dataset, &config) {
            if let Some(key) = PrimaryKey::new(dataset.attributes().iter().take(1).cloned()) {
                let _ = classify(&dataset, &dependencies, &key);
            }
        }
    }
});
