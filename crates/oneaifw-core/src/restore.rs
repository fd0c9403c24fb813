//! Restorer (spec §4.I).
//!
//! The source walks placeholders with a per-placeholder `indexOf`, which is
//! quadratic in the span count; spec §9 explicitly prefers the equivalent
//! single forward scan that jointly recognizes `__PII_` triggers in the
//! masked text and looks up the matching span by `(entity_type, entity_id)`
//! as it goes, rather than re-searching the whole string once per
//! placeholder. External behavior is identical either way, including the
//! out-of-order-metadata and missing-placeholder edge cases.

use std::collections::HashMap;

use crate::codec::DecodedMeta;
use crate::entity::EntityKind;

const PREFIX: &[u8] = b"__PII_";
const SUFFIX: &[u8] = b"__";
const HEX_LEN: usize = 8;

/// Reconstruct the original text from `masked_text` and a decoded metadata
/// view. Placeholders that can't be matched against a known span (dropped
/// by an intermediate LLM, or simply absent) are left untouched in place —
/// that is not an error (spec §4.I edge case (a)).
#[must_use]
pub fn restore(masked_text: &str, meta: &DecodedMeta) -> String {
    let mut lookup: HashMap<(EntityKind, u32), &[u8]> = HashMap::with_capacity(meta.spans.len());
    for span in &meta.spans {
        let start = span.matched_start as usize;
        let end = span.matched_end as usize;
        if start <= end && end <= meta.referenced_text.len() {
            lookup.insert((span.entity_type, span.entity_id), &meta.referenced_text[start..end]);
        }
    }

    let bytes = masked_text.as_bytes();
    let mut out = String::with_capacity(masked_text.len());
    let mut pos = 0usize;

    while pos < bytes.len() {
        if bytes[pos..].starts_with(PREFIX) {
            if let Some((kind, id, end)) = try_parse_placeholder(bytes, pos) {
                if let Some(original) = lookup.get(&(kind, id)).copied() {
                    if let Ok(s) = std::str::from_utf8(original) {
                        out.push_str(s);
                        pos = end;
                        continue;
                    }
                }
                // Not found (or not valid UTF-8, which never happens on the
                // happy path): keep the placeholder text verbatim.
                out.push_str(&masked_text[pos..end]);
                pos = end;
                continue;
            }
        }
        let ch_len = masked_text[pos..].chars().next().map_or(1, char::len_utf8);
        out.push_str(&masked_text[pos..pos + ch_len]);
        pos += ch_len;
    }

    out
}

/// Parse a placeholder starting exactly at `pos` (which is known to begin
/// with `__PII_`). Returns `(entity_kind, entity_id, end_byte_exclusive)`.
fn try_parse_placeholder(bytes: &[u8], pos: usize) -> Option<(EntityKind, u32, usize)> {
    let after_prefix = pos + PREFIX.len();
    for kind in EntityKind::ALL {
        let name = kind.name().as_bytes();
        let name_end = after_prefix + name.len();
        if bytes.get(after_prefix..name_end) != Some(name) {
            continue;
        }
        if bytes.get(name_end) != Some(&b'_') {
            continue;
        }
        let hex_start = name_end + 1;
        let hex_end = hex_start + HEX_LEN;
        let Some(hex_bytes) = bytes.get(hex_start..hex_end) else {
            continue;
        };
        if !hex_bytes.iter().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(b)) {
            continue;
        }
        let Ok(hex_str) = std::str::from_utf8(hex_bytes) else {
            continue;
        };
        let Ok(id) = u32::from_str_radix(hex_str, 16) else {
            continue;
        };
        let suffix_end = hex_end + SUFFIX.len();
        if bytes.get(hex_end..suffix_end) != Some(SUFFIX) {
            continue;
        }
        return Some((kind, id, suffix_end));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::mask::{mask, MaskRecord};
    use crate::entity::RecognitionSpan;

    fn span(kind: EntityKind, start: u32, end: u32) -> RecognitionSpan {
        RecognitionSpan { entity_type: kind, start, end, score: 0.9, description: None }
    }

    #[test]
    fn round_trips_a_simple_mask() {
        let text = "Contact me: a.b+1@test.io and visit https://ziglang.org, bye.";
        let email_start = text.find("a.b+1@test.io").unwrap() as u32;
        let email_end = email_start + "a.b+1@test.io".len() as u32;
        let url_start = text.find("https://ziglang.org").unwrap() as u32;
        let url_end = url_start + "https://ziglang.org".len() as u32;
        let spans = vec![
            span(EntityKind::EmailAddress, email_start, email_end),
            span(EntityKind::UrlAddress, url_start, url_end),
        ];
        let masked = mask(text, &spans);
        let blob = codec::encode(text, &masked.records);
        let decoded = codec::decode(&blob);
        let restored = restore(&masked.masked_text, &decoded);
        assert_eq!(restored, text);
    }

    #[test]
    fn permuted_metadata_restores_identically() {
        let text = "aaa bbb ccc";
        let spans = vec![span(EntityKind::UserName, 0, 3), span(EntityKind::UserName, 8, 11)];
        let masked = mask(text, &spans);
        let mut swapped: Vec<MaskRecord> = masked.records.clone();
        swapped.swap(0, 1);
        let blob_a = codec::encode(text, &masked.records);
        let blob_b = codec::encode(text, &swapped);
        let restored_a = restore(&masked.masked_text, &codec::decode(&blob_a));
        let restored_b = restore(&masked.masked_text, &codec::decode(&blob_b));
        assert_eq!(restored_a, text);
        assert_eq!(restored_a, restored_b);
    }

    #[test]
    fn missing_placeholder_is_left_untouched() {
        let decoded = codec::DecodedMeta::default();
        let masked_text = "hello __PII_EMAIL_ADDRESS_00000001__ world";
        let restored = restore(masked_text, &decoded);
        assert_eq!(restored, masked_text);
    }

    #[test]
    fn empty_masked_text_restores_to_empty() {
        let decoded = codec::DecodedMeta::default();
        assert_eq!(restore("", &decoded), "");
    }
}
