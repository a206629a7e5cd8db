#![no_main]

use libfuzzer_sys::fuzz_target;
use tractsynth_backend_audio::render;
use tractsynth_spec::TractParams;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut params) = TractParams::from_json(text) else {
        return;
    };
    // Keep each run short.
    params.render_duration = params.render_duration.clamp(0.0, 0.01);
    if let Ok(output) = render(&params) {
        assert!(output.channels.iter().flatten().all(|s| s.is_finite()));
    }
});
