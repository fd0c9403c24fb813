//! NER recognizer (spec §4.D): aggregates a sequence of BIO-tagged token
//! entries into contiguous entity spans.

use crate::entity::{BioTag, EntityKind, NerEntry, NerRecognizerKind, RecognitionSpan};

pub struct NerRecognizer {
    mode: NerRecognizerKind,
}

struct OpenEntity {
    entity_type: EntityKind,
    start: u32,
    end: u32,
    score: f32,
    /// Running count of entries averaged into `score`, for the running mean.
    count: u32,
}

impl NerRecognizer {
    #[must_use]
    pub fn new(mode: NerRecognizerKind) -> NerRecognizer {
        NerRecognizer { mode }
    }

    /// Aggregate `entries` (already ordered by position) into entity spans.
    /// Implements the five-step linear scan from spec §4.D exactly,
    /// including the `##` subword-continuation special case.
    #[must_use]
    pub fn run(&self, entries: &[(NerEntry, &str)]) -> Vec<RecognitionSpan> {
        let mut spans = Vec::new();
        let mut open: Option<OpenEntity> = None;

        for (entry, surface) in entries {
            if entry.entity_type == EntityKind::None || entry.bio_tag == BioTag::None {
                if let Some(o) = open.take() {
                    spans.push(self.finish(o));
                }
                continue;
            }

            match entry.bio_tag {
                BioTag::Begin => {
                    let is_subword_continuation =
                        entry.is_subword_continuation || surface.starts_with("##");
                    if is_subword_continuation {
                        if let Some(o) = open.as_mut() {
                            if o.entity_type == entry.entity_type {
                                o.end = entry.end_byte;
                                o.score = running_mean(o.score, o.count, entry.score);
                                o.count += 1;
                                continue;
                            }
                        }
                    }
                    if let Some(o) = open.take() {
                        spans.push(self.finish(o));
                    }
                    open = Some(OpenEntity {
                        entity_type: entry.entity_type,
                        start: entry.start_byte,
                        end: entry.end_byte,
                        score: entry.score,
                        count: 1,
                    });
                }
                BioTag::Inside => {
                    let extends = open
                        .as_ref()
                        .is_some_and(|o| o.entity_type == entry.entity_type);
                    if extends {
                        let o = open.as_mut().unwrap();
                        o.end = entry.end_byte;
                        o.score = running_mean(o.score, o.count, entry.score);
                        o.count += 1;
                    } else {
                        if let Some(o) = open.take() {
                            spans.push(self.finish(o));
                        }
                        open = Some(OpenEntity {
                            entity_type: entry.entity_type,
                            start: entry.start_byte,
                            end: entry.end_byte,
                            score: entry.score,
                            count: 1,
                        });
                    }
                }
                BioTag::None => unreachable!("filtered above"),
            }
        }

        if let Some(o) = open.take() {
            spans.push(self.finish(o));
        }
        spans
    }

    fn finish(&self, open: OpenEntity) -> RecognitionSpan {
        RecognitionSpan {
            entity_type: open.entity_type,
            start: open.start,
            end: open.end,
            score: open.score,
            description: Some(self.mode.description()),
        }
    }
}

/// Running mean of two scores, weighted by how many samples already went
/// into `current` (spec §4.D step 3: "average of the two scores").
fn running_mean(current: f32, count: u32, next: f32) -> f32 {
    let count = count.max(1) as f32;
    (current * count + next) / (count + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: EntityKind, tag: BioTag, score: f32, start: u32, end: u32) -> NerEntry {
        NerEntry {
            entity_type: kind,
            bio_tag: tag,
            score,
            token_index: 0,
            start_byte: start,
            end_byte: end,
            is_subword_continuation: false,
        }
    }

    #[test]
    fn single_begin_produces_one_span() {
        let rec = NerRecognizer::new(NerRecognizerKind::TokenClassification);
        let entries = vec![(entry(EntityKind::UserName, BioTag::Begin, 0.98, 68, 77), "John")];
        let spans = rec.run(&entries);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 68);
        assert_eq!(spans[0].end, 77);
        assert_eq!(spans[0].description, Some("token"));
    }

    #[test]
    fn begin_then_inside_extends_and_averages() {
        let rec = NerRecognizer::new(NerRecognizerKind::SequenceClassification);
        let entries = vec![
            (entry(EntityKind::UserName, BioTag::Begin, 1.0, 0, 4), "John"),
            (entry(EntityKind::UserName, BioTag::Inside, 0.5, 4, 8), "Doe"),
        ];
        let spans = rec.run(&entries);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 8);
        assert!((spans[0].score - 0.75).abs() < 1e-6);
        assert_eq!(spans[0].description, Some("sequence"));
    }

    #[test]
    fn subword_begin_continues_entity() {
        let rec = NerRecognizer::new(NerRecognizerKind::TokenClassification);
        let entries = vec![
            (entry(EntityKind::Organization, BioTag::Begin, 1.0, 0, 5), "Acme"),
            (entry(EntityKind::Organization, BioTag::Begin, 0.6, 5, 8), "##Co"),
        ];
        let spans = rec.run(&entries);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, 8);
    }

    #[test]
    fn unrelated_entry_closes_open_entity() {
        let rec = NerRecognizer::new(NerRecognizerKind::TokenClassification);
        let entries = vec![
            (entry(EntityKind::UserName, BioTag::Begin, 1.0, 0, 4), "John"),
            (entry(EntityKind::None, BioTag::None, 0.0, 4, 5), " "),
            (entry(EntityKind::Organization, BioTag::Begin, 0.9, 5, 9), "Acme"),
        ];
        let spans = rec.run(&entries);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].entity_type, EntityKind::UserName);
        assert_eq!(spans[1].entity_type, EntityKind::Organization);
    }
}
