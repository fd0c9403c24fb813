#![no_main]
use libfuzzer_sys::fuzz_target;
use oneaifw_core::codec::decode;
use oneaifw_core::restore::restore;

fuzz_target!(|data: &[u8]| {
    // An arbitrary byte blob must never panic the decoder, truncated or
    // otherwise malformed (spec §4.H tolerant-truncation requirement).
    let decoded = decode(data);
    // Nor should restoring against it over arbitrary masked text, even text
    // containing partial/garbled placeholder-like substrings.
    if let Ok(masked_text) = std::str::from_utf8(data) {
        let _ = restore(masked_text, &decoded);
    }
});
