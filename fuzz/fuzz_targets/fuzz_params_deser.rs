#![no_main]

use libfuzzer_sys::fuzz_target;
use tractsynth_spec::{validate_params, TractParams};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(params) = TractParams::from_json(text) {
        // Validation must never panic, whatever the values.
        let _ = validate_params(&params);
        if let Ok(json) = params.to_json() {
            let _ = TractParams::from_json(&json);
        }
    }
});
