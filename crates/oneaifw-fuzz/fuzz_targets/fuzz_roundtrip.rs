#![no_main]
use libfuzzer_sys::fuzz_target;
use oneaifw_core::entity::NerRecognizerKind;
use oneaifw_core::Pipeline;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let pipeline = Pipeline::new(NerRecognizerKind::TokenClassification).unwrap();
    let result = pipeline.mask(text, &[]);
    let restored = pipeline.restore(&result.masked_text, &result.metadata_blob);
    assert_eq!(restored, text, "mask/restore must be the identity for any valid UTF-8 input");
});
