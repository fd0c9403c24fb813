//! Metadata blob codec (spec §4.H). Bit-exact: this blob crosses the ABI.
//!
//! ```text
//! [0..4)     u32 total_len
//! [4..8)     u32 referenced_text_len N
//! [8..8+N)   N bytes of referenced text, matched substrings back-to-back
//! [align]    zero padding up to a 16-byte boundary (measured from blob start)
//! [...]      array of 16-byte span records
//! ```
//! Span record: `u32 entity_id, u8 entity_type, [u8; 3] pad, u32 matched_start, u32 matched_end`,
//! little-endian throughout. `matched_start`/`matched_end` index into the
//! referenced text *inside the blob*, not the original input — the blob is
//! self-contained.

use crate::entity::EntityKind;
use crate::mask::MaskRecord;

const RECORD_LEN: usize = 16;
const HEADER_LEN: usize = 8;

/// One decoded span record, offsets relative to the decoded referenced text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedSpan {
    pub entity_id: u32,
    pub entity_type: EntityKind,
    pub matched_start: u32,
    pub matched_end: u32,
}

#[derive(Debug, Default, Clone)]
pub struct DecodedMeta {
    pub referenced_text: Vec<u8>,
    pub spans: Vec<MatchedSpan>,
}

fn align16(n: usize) -> usize {
    (n + 15) & !15
}

/// Encode `records` (offsets into `original_text`) into a self-contained blob.
#[must_use]
pub fn encode(original_text: &str, records: &[MaskRecord]) -> Vec<u8> {
    let bytes = original_text.as_bytes();
    let referenced_len: usize = records
        .iter()
        .map(|r| (r.orig_end - r.orig_start) as usize)
        .sum();

    let span_array_offset = align16(HEADER_LEN + referenced_len);
    let total_len = span_array_offset + RECORD_LEN * records.len();

    let mut blob = Vec::with_capacity(total_len);
    blob.extend_from_slice(&(total_len as u32).to_le_bytes());
    blob.extend_from_slice(&(referenced_len as u32).to_le_bytes());

    let mut rewritten = Vec::with_capacity(records.len());
    let mut cursor = 0u32;
    for r in records {
        let slice = &bytes[r.orig_start as usize..r.orig_end as usize];
        blob.extend_from_slice(slice);
        let len = slice.len() as u32;
        rewritten.push(MatchedSpan {
            entity_id: r.entity_id,
            entity_type: r.entity_type,
            matched_start: cursor,
            matched_end: cursor + len,
        });
        cursor += len;
    }

    while blob.len() < span_array_offset {
        blob.push(0);
    }

    for span in &rewritten {
        blob.extend_from_slice(&span.entity_id.to_le_bytes());
        blob.push(span.entity_type as u8);
        blob.extend_from_slice(&[0u8; 3]);
        blob.extend_from_slice(&span.matched_start.to_le_bytes());
        blob.extend_from_slice(&span.matched_end.to_le_bytes());
    }

    debug_assert_eq!(blob.len(), total_len);
    blob
}

/// Decode a blob. Tolerates truncation by returning whatever can be read
/// (an empty view for a blob too short to contain a header) rather than
/// erroring — the happy path trusts the producer's own `total_len`/`n` field
/// (spec §4.H/§9: the `available / 16` record-count heuristic is kept as-is,
/// flagged rather than fixed).
#[must_use]
pub fn decode(blob: &[u8]) -> DecodedMeta {
    if blob.len() < HEADER_LEN {
        return DecodedMeta::default();
    }
    let total_len = u32::from_le_bytes(blob[0..4].try_into().unwrap()) as usize;
    let referenced_len = u32::from_le_bytes(blob[4..8].try_into().unwrap()) as usize;

    let text_end = HEADER_LEN + referenced_len;
    if text_end > blob.len() {
        return DecodedMeta::default();
    }
    let usable_len = total_len.min(blob.len());
    if text_end > usable_len {
        return DecodedMeta::default();
    }
    let referenced_text = blob[HEADER_LEN..text_end].to_vec();

    let span_array_offset = align16(text_end);
    if span_array_offset > usable_len {
        return DecodedMeta { referenced_text, spans: Vec::new() };
    }

    let available = usable_len - span_array_offset;
    let n_spans = available / RECORD_LEN;

    let mut spans = Vec::with_capacity(n_spans);
    for i in 0..n_spans {
        let base = span_array_offset + i * RECORD_LEN;
        let record = &blob[base..base + RECORD_LEN];
        let entity_id = u32::from_le_bytes(record[0..4].try_into().unwrap());
        let entity_type = EntityKind::from_ordinal(record[4]).unwrap_or(EntityKind::None);
        let matched_start = u32::from_le_bytes(record[8..12].try_into().unwrap());
        let matched_end = u32::from_le_bytes(record[12..16].try_into().unwrap());
        spans.push(MatchedSpan { entity_id, entity_type, matched_start, matched_end });
    }

    DecodedMeta { referenced_text, spans }
}
