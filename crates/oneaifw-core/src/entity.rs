//! Closed entity-kind taxonomy and BIO tagging.
//!
//! The ordinal value of [`EntityKind`] is the wire value across the C ABI and
//! the stringified name is baked into every placeholder (`__PII_<NAME>_...`).
//! Both are part of the external contract: renumbering or renaming a variant
//! is a breaking change, not a refactor.

#[cfg_attr(feature = "fixtures", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityKind {
    None = 0,
    PhysicalAddress = 1,
    EmailAddress = 2,
    Organization = 3,
    UserName = 4,
    PhoneNumber = 5,
    BankNumber = 6,
    Payment = 7,
    VerificationCode = 8,
    Password = 9,
    RandomSeed = 10,
    PrivateKey = 11,
    UrlAddress = 12,
}

impl EntityKind {
    /// All kinds in wire-ordinal order, `None` excluded.
    pub const ALL: [EntityKind; 12] = [
        EntityKind::PhysicalAddress,
        EntityKind::EmailAddress,
        EntityKind::Organization,
        EntityKind::UserName,
        EntityKind::PhoneNumber,
        EntityKind::BankNumber,
        EntityKind::Payment,
        EntityKind::VerificationCode,
        EntityKind::Password,
        EntityKind::RandomSeed,
        EntityKind::PrivateKey,
        EntityKind::UrlAddress,
    ];

    /// Stringified name as it appears inside placeholders. Stable forever.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::None => "NONE",
            EntityKind::PhysicalAddress => "PHYSICAL_ADDRESS",
            EntityKind::EmailAddress => "EMAIL_ADDRESS",
            EntityKind::Organization => "ORGANIZATION",
            EntityKind::UserName => "USER_NAME",
            EntityKind::PhoneNumber => "PHONE_NUMBER",
            EntityKind::BankNumber => "BANK_NUMBER",
            EntityKind::Payment => "PAYMENT",
            EntityKind::VerificationCode => "VERIFICATION_CODE",
            EntityKind::Password => "PASSWORD",
            EntityKind::RandomSeed => "RANDOM_SEED",
            EntityKind::PrivateKey => "PRIVATE_KEY",
            EntityKind::UrlAddress => "URL_ADDRESS",
        }
    }

    /// Recover a kind from its placeholder name. Used by the restorer's
    /// grammar scan and by fixture loaders; never guesses on unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .chain(std::iter::once(EntityKind::None))
            .find(|k| k.name() == name)
    }

    /// Construct from the wire ordinal (`u8` tag used by the C ABI).
    #[must_use]
    pub fn from_ordinal(tag: u8) -> Option<EntityKind> {
        match tag {
            0 => Some(EntityKind::None),
            1 => Some(EntityKind::PhysicalAddress),
            2 => Some(EntityKind::EmailAddress),
            3 => Some(EntityKind::Organization),
            4 => Some(EntityKind::UserName),
            5 => Some(EntityKind::PhoneNumber),
            6 => Some(EntityKind::BankNumber),
            7 => Some(EntityKind::Payment),
            8 => Some(EntityKind::VerificationCode),
            9 => Some(EntityKind::Password),
            10 => Some(EntityKind::RandomSeed),
            11 => Some(EntityKind::PrivateKey),
            12 => Some(EntityKind::UrlAddress),
            _ => None,
        }
    }
}

/// BIO tag as reduced from whatever label scheme the host's NER model uses.
#[cfg_attr(feature = "fixtures", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BioTag {
    None = 0,
    Begin = 1,
    Inside = 2,
}

impl BioTag {
    /// Map a raw label prefix (`B-`, `S-`, `I-`, `E-`, anything else) onto
    /// the reduced three-value tag per spec §3.
    #[must_use]
    pub fn from_label(label: &str) -> BioTag {
        if label.starts_with("B-") || label.starts_with("S-") {
            BioTag::Begin
        } else if label.starts_with("I-") || label.starts_with("E-") {
            BioTag::Inside
        } else {
            BioTag::None
        }
    }
}

/// NER recognizer mode. Only affects the `description` tag attached to
/// aggregated spans (spec §3/§4.D); carries no other behavior.
#[cfg_attr(feature = "fixtures", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NerRecognizerKind {
    TokenClassification = 0,
    SequenceClassification = 1,
}

impl NerRecognizerKind {
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            NerRecognizerKind::TokenClassification => "token",
            NerRecognizerKind::SequenceClassification => "sequence",
        }
    }
}

/// An externally supplied NER token entry (spec §3 "External NER entry").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NerEntry {
    pub entity_type: EntityKind,
    pub bio_tag: BioTag,
    pub score: f32,
    pub token_index: u32,
    pub start_byte: u32,
    pub end_byte: u32,
    /// Whether the token's surface text starts with the `##` subword
    /// continuation marker. The host's tokenizer owns subword splitting;
    /// the core only needs this one bit (spec §4.D step 4).
    pub is_subword_continuation: bool,
}

/// Internal recognition span, produced by every recognizer and consumed by
/// the merger. Invariants (spec §3): `start <= end <= len(text)`, `score in
/// [0,1]`, and the byte range respects UTF-8 boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionSpan {
    pub entity_type: EntityKind,
    pub start: u32,
    pub end: u32,
    pub score: f32,
    pub description: Option<&'static str>,
}

impl RecognitionSpan {
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[must_use]
    pub fn overlaps(&self, other: &RecognitionSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trips_through_ordinal() {
        for kind in EntityKind::ALL {
            let ord = kind as u8;
            assert_eq!(EntityKind::from_ordinal(ord), Some(kind));
            assert_eq!(EntityKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn bio_tag_prefixes() {
        assert_eq!(BioTag::from_label("B-PER"), BioTag::Begin);
        assert_eq!(BioTag::from_label("S-ORG"), BioTag::Begin);
        assert_eq!(BioTag::from_label("I-PER"), BioTag::Inside);
        assert_eq!(BioTag::from_label("E-PER"), BioTag::Inside);
        assert_eq!(BioTag::from_label("O"), BioTag::None);
    }

    #[test]
    fn overlap_definition_excludes_touching_spans() {
        let a = RecognitionSpan {
            entity_type: EntityKind::EmailAddress,
            start: 0,
            end: 5,
            score: 0.9,
            description: None,
        };
        let b = RecognitionSpan {
            entity_type: EntityKind::EmailAddress,
            start: 5,
            end: 10,
            score: 0.9,
            description: None,
        };
        assert!(!a.overlaps(&b));
        let c = RecognitionSpan { start: 4, ..b.clone() };
        assert!(a.overlaps(&c));
    }
}
