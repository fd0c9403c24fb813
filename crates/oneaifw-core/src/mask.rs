//! Masker (spec §4.G): walks final sorted, non-overlapping spans and
//! rewrites the original text with deterministic reversible placeholders.

use crate::entity::{EntityKind, RecognitionSpan};

/// A span that was actually emitted as a placeholder, recording where it
/// came from in the *original* text. The codec later rewrites these offsets
/// into blob-local ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRecord {
    pub entity_id: u32,
    pub entity_type: EntityKind,
    pub orig_start: u32,
    pub orig_end: u32,
}

#[derive(Debug, Clone)]
pub struct MaskOutput {
    pub masked_text: String,
    pub records: Vec<MaskRecord>,
}

/// Build the placeholder string `__PII_<NAME>_<ID8HEX>__` (spec §3/§6).
#[must_use]
pub fn placeholder(entity_type: EntityKind, entity_id: u32) -> String {
    format!("__PII_{}_{:08X}__", entity_type.name(), entity_id)
}

/// Rewrite `text` by replacing each span with its placeholder, in order.
/// `spans` must already be sorted ascending by `(start, end)` and
/// non-overlapping (the merger's job); any span with `start >= end` or
/// `end > text.len()` is skipped defensively rather than trusted.
#[must_use]
pub fn mask(text: &str, spans: &[RecognitionSpan]) -> MaskOutput {
    let mut masked_text = String::with_capacity(text.len());
    let mut records = Vec::with_capacity(spans.len());
    let mut cursor = 0usize;
    let mut next_id = 1u32;

    for span in spans {
        let start = span.start as usize;
        let end = span.end as usize;
        if start >= end || end > text.len() || start < cursor {
            continue;
        }
        masked_text.push_str(&text[cursor..start]);
        masked_text.push_str(&placeholder(span.entity_type, next_id));
        records.push(MaskRecord {
            entity_id: next_id,
            entity_type: span.entity_type,
            orig_start: span.start,
            orig_end: span.end,
        });
        next_id += 1;
        cursor = end;
    }
    masked_text.push_str(&text[cursor..]);

    MaskOutput { masked_text, records }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(kind: EntityKind, start: u32, end: u32) -> RecognitionSpan {
        RecognitionSpan { entity_type: kind, start, end, score: 0.9, description: None }
    }

    #[test]
    fn placeholder_matches_grammar() {
        let ph = placeholder(EntityKind::EmailAddress, 1);
        assert_eq!(ph, "__PII_EMAIL_ADDRESS_00000001__");
    }

    #[test]
    fn masks_two_disjoint_spans_in_order() {
        let text = "Contact me: a.b+1@test.io and visit https://ziglang.org, bye.";
        let email_start = text.find("a.b+1@test.io").unwrap();
        let email_end = email_start + "a.b+1@test.io".len();
        let url_start = text.find("https://ziglang.org").unwrap();
        let url_end = url_start + "https://ziglang.org".len();
        let spans = vec![
            span(EntityKind::EmailAddress, email_start as u32, email_end as u32),
            span(EntityKind::UrlAddress, url_start as u32, url_end as u32),
        ];
        let out = mask(text, &spans);
        assert!(out.masked_text.contains("__PII_EMAIL_ADDRESS_00000001__"));
        assert!(out.masked_text.contains("__PII_URL_ADDRESS_00000002__"));
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].entity_id, 1);
        assert_eq!(out.records[1].entity_id, 2);
    }

    #[test]
    fn invalid_span_is_skipped_defensively() {
        let text = "short";
        let spans = vec![span(EntityKind::EmailAddress, 3, 100)];
        let out = mask(text, &spans);
        assert_eq!(out.masked_text, "short");
        assert!(out.records.is_empty());
    }
}
