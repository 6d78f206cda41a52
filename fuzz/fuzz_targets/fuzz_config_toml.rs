//! Fuzz target for analysis configuration parsing.
//!
//! TOML text from any source must either load into a validated config or
//! return an error, never panic.

#![no_main]

use eq_common::AnalysisConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(config) = AnalysisConfig::from_toml_str(data) {
        // Anything that loads must also serialize.
        let _ = config.to_json_pretty();
    }
});
