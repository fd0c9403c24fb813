//! Wire-layout structs and the small numeric error taxonomy (spec §6/§7).

use oneaifw_core::entity::{BioTag, EntityKind, NerEntry};

/// `session_init_args` (spec §6): `{ u8 ner_recog_type }`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SessionInitArgs {
    pub ner_recog_type: u8,
}

/// External NER entry, 20 bytes (spec §6).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NerEntryAbi {
    pub entity_type: u8,
    pub bio_tag: u8,
    pub pad: u16,
    pub score: f32,
    pub token_index: u32,
    pub start_byte: u32,
    pub end_byte: u32,
}

impl NerEntryAbi {
    /// Convert into the core's `NerEntry`. Unknown `entity_type`/`bio_tag`
    /// ordinals map to `None`, which the aggregator already treats as a
    /// closing/skip signal rather than a panic.
    #[must_use]
    pub fn to_core(self, surface_is_subword: bool) -> NerEntry {
        NerEntry {
            entity_type: EntityKind::from_ordinal(self.entity_type).unwrap_or(EntityKind::None),
            bio_tag: bio_tag_from_ordinal(self.bio_tag),
            score: self.score,
            token_index: self.token_index,
            start_byte: self.start_byte,
            end_byte: self.end_byte,
            is_subword_continuation: surface_is_subword,
        }
    }
}

fn bio_tag_from_ordinal(tag: u8) -> BioTag {
    match tag {
        1 => BioTag::Begin,
        2 => BioTag::Inside,
        _ => BioTag::None,
    }
}

/// PII span record, 16 bytes (spec §6): `u32 entity_id; u8 entity_type;
/// u8[3] pad; u32 start; u32 end;`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PiiSpanAbi {
    pub entity_id: u32,
    pub entity_type: u8,
    pub pad: [u8; 3],
    pub start: u32,
    pub end: u32,
}

/// Numeric error taxonomy (spec §7). `rc = 0` is success and is never a
/// member of this enum; callers see it only via a bare `0` return.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidSessionPtr = 1,
    RegexCompileFailed = 2,
    AllocatorFailure = 3,
    InvalidMetadata = 4,
}

impl ErrorCode {
    #[must_use]
    pub const fn rc(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::InvalidSessionPtr => "InvalidSessionPtr",
            ErrorCode::RegexCompileFailed => "RegexCompileFailed",
            ErrorCode::AllocatorFailure => "AllocatorFailure",
            ErrorCode::InvalidMetadata => "InvalidMetadata",
        }
    }

    #[must_use]
    pub fn from_rc(rc: i32) -> Option<ErrorCode> {
        match rc {
            1 => Some(ErrorCode::InvalidSessionPtr),
            2 => Some(ErrorCode::RegexCompileFailed),
            3 => Some(ErrorCode::AllocatorFailure),
            4 => Some(ErrorCode::InvalidMetadata),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn ner_entry_abi_is_20_bytes() {
        assert_eq!(size_of::<NerEntryAbi>(), 20);
    }

    #[test]
    fn pii_span_abi_is_16_bytes() {
        assert_eq!(size_of::<PiiSpanAbi>(), 16);
    }

    #[test]
    fn error_code_round_trips_through_rc() {
        for code in [ErrorCode::InvalidSessionPtr, ErrorCode::RegexCompileFailed, ErrorCode::AllocatorFailure, ErrorCode::InvalidMetadata] {
            assert_eq!(ErrorCode::from_rc(code.rc()), Some(code));
        }
        assert_eq!(ErrorCode::from_rc(0), None);
    }
}
