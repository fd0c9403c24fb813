//! Fixture types and scenario runners shared between the `harness` binary
//! and the conformance/property test suites.
//!
//! Grounded on the teacher's `frankenlibc-harness`: a thin library crate
//! backing a `clap` binary, with JSON fixtures (`serde_json`) instead of a
//! bespoke text format.

use oneaifw_core::entity::{BioTag, EntityKind, NerEntry, NerRecognizerKind};
use oneaifw_core::Pipeline;

/// One NER entry as it appears in a fixture file: human-readable entity and
/// BIO tag names instead of the ABI's raw ordinals.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FixtureNerEntry {
    pub entity_type: String,
    pub bio_tag: String,
    pub score: f32,
    pub token_index: u32,
    pub start_byte: u32,
    pub end_byte: u32,
    #[serde(default)]
    pub is_subword_continuation: bool,
}

impl FixtureNerEntry {
    fn to_core(&self) -> Option<NerEntry> {
        Some(NerEntry {
            entity_type: EntityKind::from_name(&self.entity_type)?,
            bio_tag: match self.bio_tag.as_str() {
                "Begin" => BioTag::Begin,
                "Inside" => BioTag::Inside,
                _ => BioTag::None,
            },
            score: self.score,
            token_index: self.token_index,
            start_byte: self.start_byte,
            end_byte: self.end_byte,
            is_subword_continuation: self.is_subword_continuation,
        })
    }
}

/// A single named conformance scenario: input text, the NER entries a host
/// would have supplied alongside it, and the NER recognizer mode to use.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub ner_entries: Vec<FixtureNerEntry>,
    #[serde(default)]
    pub sequence_mode: bool,
}

/// Outcome of running a scenario end to end: masked text, hex-encoded
/// metadata blob, and whether `restore(mask(text))` reproduced `text`
/// exactly (spec §4.I invariant 1, "mask then restore is the identity").
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub masked_text: String,
    pub metadata_hex: String,
    pub restored_matches_original: bool,
}

/// Parse a `fixtures/*.json` file (an array of [`Scenario`]) and run every
/// scenario through a fresh [`Pipeline`].
pub fn run_fixture_file(contents: &str) -> serde_json::Result<Vec<ScenarioReport>> {
    let scenarios: Vec<Scenario> = serde_json::from_str(contents)?;
    Ok(scenarios.iter().map(run_scenario).collect())
}

#[must_use]
pub fn run_scenario(scenario: &Scenario) -> ScenarioReport {
    let mode = if scenario.sequence_mode {
        NerRecognizerKind::SequenceClassification
    } else {
        NerRecognizerKind::TokenClassification
    };
    let pipeline = Pipeline::new(mode).expect("preset patterns always compile");

    let entries: Vec<(NerEntry, &str)> = scenario
        .ner_entries
        .iter()
        .filter_map(|e| {
            let core = e.to_core()?;
            let surface = scenario.text.get(e.start_byte as usize..e.end_byte as usize)?;
            Some((core, surface))
        })
        .collect();

    let result = pipeline.mask(&scenario.text, &entries);
    let restored = pipeline.restore(&result.masked_text, &result.metadata_blob);

    ScenarioReport {
        name: scenario.name.clone(),
        masked_text: result.masked_text,
        metadata_hex: hex_encode(&result.metadata_blob),
        restored_matches_original: restored == scenario.text,
    }
}

#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
