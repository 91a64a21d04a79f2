//! Fuzz target for TOML configuration parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sc_config::{validate_config, CalibrationConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = CalibrationConfig::from_toml_str(content) {
        let _ = validate_config(&config);
    }
});
