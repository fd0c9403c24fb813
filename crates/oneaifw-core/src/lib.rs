//! Safe core of the reversible PII masking engine.
//!
//! This crate holds every subsystem that does not need `unsafe` or
//! `extern "C"`: entity model, regex/NER recognizers, span merging, the
//! Chinese address fuser, the masker, the metadata codec, and the restorer.
//! The `oneaifw-abi` crate wires a [`Pipeline`] to a C ABI session.

#![forbid(unsafe_code)]

pub mod address;
pub mod codec;
pub mod entity;
pub mod error;
pub mod mask;
pub mod merge;
pub mod recognizer;
pub mod regex_engine;
pub mod restore;

use std::sync::Arc;

use entity::{EntityKind, NerEntry, NerRecognizerKind, RecognitionSpan};
use error::CoreResult;
use merge::KindFilter;
use recognizer::{NerRecognizer, RegexRecognizer, PRESET_PATTERNS};
use regex_engine::CompiledPattern;

/// The assembled per-session pipeline: the regex recognizers for every
/// preset pattern (spec §4.C) plus a configured NER aggregator (spec §4.D).
/// Owned by value, never via a back-pointer into a session (spec §9's first
/// re-architecture note).
pub struct Pipeline {
    regex: RegexRecognizer,
    ner: NerRecognizer,
}

/// Final `mask` output: the rewritten text and its self-contained metadata
/// blob, ready to cross the ABI.
pub struct MaskResult {
    pub masked_text: String,
    pub metadata_blob: Vec<u8>,
}

impl Pipeline {
    /// Compile every preset pattern and build a pipeline for `ner_mode`.
    /// Fails only if a preset pattern fails to compile (should never happen
    /// for the fixed table in `recognizer::regex_recognizer`, but a
    /// reimplementation must not assume that).
    pub fn new(ner_mode: NerRecognizerKind) -> CoreResult<Pipeline> {
        let mut regex = RegexRecognizer::new();
        for spec in PRESET_PATTERNS {
            let compiled = Arc::new(CompiledPattern::compile(spec.name, spec.pattern)?);
            regex.add_pattern(spec.entity_type, spec.default_score, spec.group_index, compiled, None);
        }
        Ok(Pipeline { regex, ner: NerRecognizer::new(ner_mode) })
    }

    /// Build a pipeline from an already-assembled recognizer, e.g. one
    /// populated from patterns shared via a process-wide cache (spec §4.K)
    /// instead of compiling a private copy of every preset.
    #[must_use]
    pub fn with_patterns(ner_mode: NerRecognizerKind, regex: RegexRecognizer) -> Pipeline {
        Pipeline { regex, ner: NerRecognizer::new(ner_mode) }
    }

    /// Run the full detection pipeline (spec §2 "Data flow for mask", steps
    /// before masking) and return the final, merged, non-overlapping spans.
    /// This is also what the `get_pii_spans` ABI entry point exposes.
    #[must_use]
    pub fn detect(&self, text: &str, ner_entries: &[(NerEntry, &str)]) -> Vec<RecognitionSpan> {
        let mut candidates = self.regex.run(text);
        let ner_spans = self.ner.run(ner_entries);

        let mut address_seeds = Vec::new();
        for span in ner_spans {
            if matches!(span.entity_type, EntityKind::PhysicalAddress | EntityKind::Organization) {
                address_seeds.push(span);
            } else {
                candidates.push(span);
            }
        }
        candidates.extend(address::fuse_addresses(text, &address_seeds));

        merge::merge_spans(candidates, &KindFilter::default())
    }

    /// Detect, mask, and serialize metadata in one call (spec §4.G/§4.H).
    #[must_use]
    pub fn mask(&self, text: &str, ner_entries: &[(NerEntry, &str)]) -> MaskResult {
        let spans = self.detect(text, ner_entries);
        let output = mask::mask(text, &spans);
        let metadata_blob = codec::encode(text, &output.records);
        MaskResult { masked_text: output.masked_text, metadata_blob }
    }

    /// Restore the original text from masked text plus a metadata blob
    /// (spec §4.I). Stateless with respect to the pipeline itself — kept as
    /// a method only for API symmetry with `mask`.
    #[must_use]
    pub fn restore(&self, masked_text: &str, metadata_blob: &[u8]) -> String {
        let decoded = codec::decode(metadata_blob);
        restore::restore(masked_text, &decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_email_url_and_ner_name_round_trip() {
        let pipeline = Pipeline::new(NerRecognizerKind::TokenClassification).unwrap();
        let text = "Contact me: a.b+1@test.io and visit https://ziglang.org, my name is John Doe.";
        let name_start = text.find("John Doe").unwrap() as u32;
        let name_end = name_start + "John Doe".len() as u32;
        let entry = NerEntry {
            entity_type: EntityKind::UserName,
            bio_tag: entity::BioTag::Begin,
            score: 0.98,
            token_index: 10,
            start_byte: name_start,
            end_byte: name_end,
            is_subword_continuation: false,
        };
        let entries = vec![(entry, "John Doe")];

        let spans = pipeline.detect(text, &entries);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].entity_type, EntityKind::EmailAddress);
        assert_eq!(spans[1].entity_type, EntityKind::UrlAddress);
        assert_eq!(spans[2].entity_type, EntityKind::UserName);

        let result = pipeline.mask(text, &entries);
        assert!(result.masked_text.contains("__PII_EMAIL_ADDRESS_00000001__"));
        assert!(result.masked_text.contains("__PII_URL_ADDRESS_00000002__"));
        assert!(result.masked_text.contains("__PII_USER_NAME_00000003__"));

        let restored = pipeline.restore(&result.masked_text, &result.metadata_blob);
        assert_eq!(restored, text);
    }

    #[test]
    fn s2_verification_code_and_password_round_trip() {
        let pipeline = Pipeline::new(NerRecognizerKind::TokenClassification).unwrap();
        let text = "use this temporary verification code: 9F4T2A. For the sandbox box, the pwd: S3cure!Passw0rd (I'll reset it after your tests, promise!).";
        let result = pipeline.mask(text, &[]);
        assert!(result.masked_text.contains("__PII_VERIFICATION_CODE_"));
        assert!(result.masked_text.contains("__PII_PASSWORD_"));
        let restored = pipeline.restore(&result.masked_text, &result.metadata_blob);
        assert_eq!(restored, text);
    }

    #[test]
    fn s4_empty_masked_text_restores_to_empty() {
        let pipeline = Pipeline::new(NerRecognizerKind::TokenClassification).unwrap();
        let text = "Contact me: a.b+1@test.io and visit https://ziglang.org, bye.";
        let result = pipeline.mask(text, &[]);
        let restored = pipeline.restore("", &result.metadata_blob);
        assert_eq!(restored, "");
    }

    #[test]
    fn s6_bank_wins_over_contained_verification_code() {
        let pipeline = Pipeline::new(NerRecognizerKind::TokenClassification).unwrap();
        let text = "account 123456789012 on file";
        let spans = pipeline.detect(text, &[]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].entity_type, EntityKind::BankNumber);
    }
}
