//! Regex recognizer (spec §4.C): one recognizer per entity kind, holding an
//! ordered list of compiled patterns with default scores and optional
//! capture-group indices.

use std::sync::Arc;

use crate::entity::{EntityKind, RecognitionSpan};
use crate::regex_engine::CompiledPattern;

/// Optional post-match validator. May override the pattern's default score
/// by returning `Some(score)`, or reject the match entirely by returning
/// `None` (in which case the default score stands per spec §4.C — a
/// validator can only raise/lower confidence, it cannot veto a hit outright;
/// callers that need outright rejection filter the returned spans instead).
pub type Validator = Arc<dyn Fn(&str) -> Option<f32> + Send + Sync>;

/// A single preset or user-supplied pattern specification.
#[derive(Clone)]
pub struct PresetPatternSpec {
    pub entity_type: EntityKind,
    pub name: &'static str,
    pub pattern: &'static str,
    pub default_score: f32,
    pub group_index: usize,
}

/// The fixed preset pattern table from spec §4.C. Values are part of the
/// external contract and must not drift.
pub const PRESET_PATTERNS: &[PresetPatternSpec] = &[
    PresetPatternSpec {
        entity_type: EntityKind::EmailAddress,
        name: "EMAIL",
        pattern: r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
        default_score: 0.90,
        group_index: 0,
    },
    PresetPatternSpec {
        entity_type: EntityKind::UrlAddress,
        name: "URL",
        pattern: r"https?://[A-Za-z0-9._~:/?#\[\]@!$&'()*+,;=%-]+",
        default_score: 0.80,
        group_index: 0,
    },
    PresetPatternSpec {
        entity_type: EntityKind::PhoneNumber,
        name: "PHONE",
        pattern: r"\+?\d[\d -]{7,}\d",
        default_score: 0.70,
        group_index: 0,
    },
    PresetPatternSpec {
        entity_type: EntityKind::BankNumber,
        name: "BANK",
        pattern: r"\b\d{12,19}\b",
        default_score: 0.60,
        group_index: 0,
    },
    PresetPatternSpec {
        entity_type: EntityKind::PrivateKey,
        name: "PEM_PRIVKEY",
        pattern: r"-----BEGIN (?:OPENSSH|RSA|EC|DSA) PRIVATE KEY-----[\s\S]*?-----END (?:OPENSSH|RSA|EC|DSA) PRIVATE KEY-----",
        default_score: 0.95,
        group_index: 0,
    },
    PresetPatternSpec {
        entity_type: EntityKind::PrivateKey,
        name: "HEX_PRIVKEY",
        pattern: r"\b[0-9a-fA-F]{64}\b",
        default_score: 0.75,
        group_index: 0,
    },
    PresetPatternSpec {
        entity_type: EntityKind::VerificationCode,
        name: "VCODE",
        pattern: r"\b\d{4,8}\b",
        default_score: 0.50,
        group_index: 0,
    },
    PresetPatternSpec {
        entity_type: EntityKind::VerificationCode,
        name: "VCODE_LABELED_ALNUM",
        pattern: r"(?i)\b(?:verification\s*code|verify\s*code|otp|2fa\s*code|auth(?:entication)?\s*code)\s*[:=\-]?\s*([A-Za-z0-9]{4,12})",
        default_score: 0.80,
        group_index: 1,
    },
    PresetPatternSpec {
        entity_type: EntityKind::Password,
        name: "PASSWORD_LITERAL",
        pattern: r"(?i)\bpassword\s*[:=]\s*(\S+)",
        default_score: 0.40,
        group_index: 1,
    },
    PresetPatternSpec {
        entity_type: EntityKind::Password,
        name: "PWD_LITERAL",
        pattern: r"(?i)\b(?:pwd|pass|passwd|passcode)\s*[:=]\s*(\S+)",
        default_score: 0.60,
        group_index: 1,
    },
    PresetPatternSpec {
        entity_type: EntityKind::RandomSeed,
        name: "SEED_PHRASE",
        pattern: r"(?i)(seed|mnemonic)\s*[:=]?\s*([a-z]+\s+){11,23}[a-z]+",
        default_score: 0.70,
        group_index: 0,
    },
];

struct Entry {
    entity_type: EntityKind,
    group_index: usize,
    default_score: f32,
    pattern: Arc<CompiledPattern>,
    validator: Option<Validator>,
}

/// Holds every compiled pattern relevant to one entity kind and scans text
/// for all of them.
pub struct RegexRecognizer {
    entries: Vec<Entry>,
}

impl RegexRecognizer {
    #[must_use]
    pub fn new() -> RegexRecognizer {
        RegexRecognizer { entries: Vec::new() }
    }

    /// Register a compiled pattern (already interned/shared via the
    /// process-wide cache by the caller — this recognizer never frees it).
    pub fn add_pattern(
        &mut self,
        entity_type: EntityKind,
        default_score: f32,
        group_index: usize,
        pattern: Arc<CompiledPattern>,
        validator: Option<Validator>,
    ) {
        self.entries.push(Entry {
            entity_type,
            group_index,
            default_score,
            pattern,
            validator,
        });
    }

    /// Scan `text` with every held pattern, advancing each independently
    /// from offset 0 until exhausted. The cursor for a pattern advances to
    /// `max(end, cursor + 1)` after each hit to avoid infinite loops on
    /// zero-length matches (spec §4.C).
    #[must_use]
    pub fn run(&self, text: &str) -> Vec<RecognitionSpan> {
        let mut spans = Vec::new();
        for entry in &self.entries {
            let mut cursor = 0usize;
            while cursor <= text.len() {
                let Some((start, end)) = entry.pattern.find_group(text, cursor, entry.group_index)
                else {
                    break;
                };
                let score = entry
                    .validator
                    .as_ref()
                    .and_then(|v| v(&text[start..end]))
                    .unwrap_or(entry.default_score);
                spans.push(RecognitionSpan {
                    entity_type: entry.entity_type,
                    start: start as u32,
                    end: end as u32,
                    score,
                    description: Some(entry.pattern.name()),
                });
                cursor = std::cmp::max(end, cursor + 1);
            }
        }
        spans
    }
}

impl Default for RegexRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
