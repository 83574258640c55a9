#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Config surgery must never panic on arbitrary input
    let _ = vorschau::patch::source::set_field(data, "base", "'/preview'");
    let _ = vorschau::patch::source::find_matching_brace(data, 0);
});
