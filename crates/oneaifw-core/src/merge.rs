//! Span merger / deduplicator (spec §4.E).

use std::collections::HashSet;

use crate::entity::{EntityKind, RecognitionSpan};

/// Optional entity-kind filter applied before scoring/sorting.
#[derive(Default, Clone)]
pub struct KindFilter {
    pub whitelist: Option<HashSet<EntityKind>>,
    pub blacklist: Option<HashSet<EntityKind>>,
}

impl KindFilter {
    fn allows(&self, kind: EntityKind) -> bool {
        if let Some(wl) = &self.whitelist {
            if !wl.contains(&kind) {
                return false;
            }
        }
        if let Some(bl) = &self.blacklist {
            if bl.contains(&kind) {
                return false;
            }
        }
        true
    }
}

/// Score floor below which a candidate span is dropped outright (spec §4.E
/// step 1).
pub const SCORE_FLOOR: f32 = 0.5;

/// Merge and deduplicate candidate spans per spec §4.E:
/// 1. filter by `score >= 0.5`,
/// 2. apply the optional whitelist/blacklist,
/// 3. sort ascending by `(start, end)`,
/// 4. collapse exact `(start, end)` duplicates keeping the highest score,
/// 5. resolve overlaps by `(score desc, length desc, start asc)` greedy
///    acceptance, then re-sort accepted spans by `(start, end)` ascending.
#[must_use]
pub fn merge_spans(candidates: Vec<RecognitionSpan>, filter: &KindFilter) -> Vec<RecognitionSpan> {
    let mut spans: Vec<RecognitionSpan> = candidates
        .into_iter()
        .filter(|s| s.score >= SCORE_FLOOR && filter.allows(s.entity_type))
        .collect();

    spans.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));

    let mut deduped: Vec<RecognitionSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match deduped.last_mut() {
            Some(last) if last.start == span.start && last.end == span.end => {
                if span.score > last.score {
                    *last = span;
                }
            }
            _ => deduped.push(span),
        }
    }

    let mut priority: Vec<usize> = (0..deduped.len()).collect();
    priority.sort_by(|&a, &b| {
        let sa = &deduped[a];
        let sb = &deduped[b];
        sb.score
            .partial_cmp(&sa.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| sb.len().cmp(&sa.len()))
            .then_with(|| sa.start.cmp(&sb.start))
    });

    let mut accepted: Vec<RecognitionSpan> = Vec::new();
    for idx in priority {
        let candidate = &deduped[idx];
        if accepted.iter().any(|a| a.overlaps(candidate)) {
            continue;
        }
        accepted.push(candidate.clone());
    }

    accepted.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
    accepted
}
