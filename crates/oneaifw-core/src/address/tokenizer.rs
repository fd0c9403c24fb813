//! Level tokenizer (spec §4.F "Tokenization contract").
//!
//! Scans a byte window of valid UTF-8 text and recognizes level-tagged
//! tokens in priority order (country > province > city > district >
//! township > road > house > POI > building > floor > room). Unlike the
//! source's manual leading-byte bookkeeping (flagged in spec §9 as a UTF-8
//! safety hazard to re-architect), this walks `char_indices` throughout so
//! every boundary is guaranteed to land on a code point edge.

use super::levels::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub level: Level,
    pub start: usize,
    pub end: usize,
}

/// Tokenize the window `[win_start, win_end)` of `text`. `floor` is the
/// earliest byte offset any token's left edge may reach back to (used to
/// stop a token from crossing an already-accepted coarser token, per spec
/// §4.F's "must not cross an earlier country match" rule, generalized to
/// any previously emitted token in this scan).
#[must_use]
pub fn tokenize_window(text: &str, win_start: usize, win_end: usize, floor: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = win_start;
    let mut floor = floor.max(0);

    while cursor < win_end {
        match first_token_at_or_after(text, cursor, win_end, floor) {
            Some(tok) => {
                floor = tok.end;
                cursor = tok.end;
                tokens.push(tok);
            }
            None => break,
        }
    }
    tokens
}

/// Find the earliest token whose trigger position is `>= cursor` and whose
/// end is `<= win_end`, preferring the highest-priority level when several
/// levels trigger at the same position.
fn first_token_at_or_after(text: &str, cursor: usize, win_end: usize, floor: usize) -> Option<Token> {
    let mut pos = cursor;
    while pos < win_end {
        if let Some(tok) = try_match_at(text, pos, win_end, floor) {
            return Some(tok);
        }
        pos += next_char_len(text, pos);
    }
    None
}

fn next_char_len(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(1, char::len_utf8)
}

fn try_match_at(text: &str, pos: usize, win_end: usize, floor: usize) -> Option<Token> {
    for level in Level::PRIORITY {
        if let Some(tok) = try_match_level_at(text, level, pos, win_end, floor) {
            return Some(tok);
        }
    }
    None
}

fn try_match_level_at(text: &str, level: Level, pos: usize, win_end: usize, floor: usize) -> Option<Token> {
    match level {
        Level::L11 => match_phrase(text, pos, win_end, COUNTRY_NAMES, level),
        Level::L10 => match_phrase(text, pos, win_end, PROVINCE_NAMES, level)
            .or_else(|| match_backward_suffix(text, pos, win_end, floor, PROVINCE_SUFFIXES, level)),
        Level::L9 => {
            let tok = match_backward_suffix(text, pos, win_end, floor, &[CITY_SUFFIX], level)?;
            if preceded_by(text, tok.start, CITY_SUFFIX_EXCLUDE_PRECEDING) {
                None
            } else {
                Some(tok)
            }
        }
        Level::L8 => match_phrase(text, pos, win_end, DISTRICT_NAMES, level)
            .or_else(|| match_backward_suffix(text, pos, win_end, floor, DISTRICT_SUFFIXES, level)),
        Level::L7 => match_phrase(text, pos, win_end, TOWNSHIP_NAMES, level)
            .or_else(|| match_backward_suffix(text, pos, win_end, floor, TOWNSHIP_SUFFIXES, level)),
        Level::L6 => match_backward_suffix(text, pos, win_end, floor, ROAD_SUFFIXES, level),
        Level::L5 => match_house_number(text, pos, win_end),
        Level::L4 => {
            let tok = match_digit_or_alpha_suffix(text, pos, win_end, POI_SUFFIXES, level)
                .or_else(|| match_backward_suffix(text, pos, win_end, floor, POI_SUFFIXES, level))?;
            if is_poi_city_demoted(text, &tok) {
                None
            } else {
                Some(tok)
            }
        }
        Level::L3 => match_digit_or_alpha_suffix(text, pos, win_end, BUILDING_SUFFIXES, level),
        Level::L2 => match_floor(text, pos, win_end),
        Level::L1 => match_unit(text, pos, win_end),
    }
}

/// Exact-phrase gazetteer match anchored at `pos` (longest phrase wins when
/// several share a prefix, since `phrases` is listed longest-first).
fn match_phrase(text: &str, pos: usize, win_end: usize, phrases: &[&str], level: Level) -> Option<Token> {
    for phrase in phrases {
        let end = pos + phrase.len();
        if end <= win_end && text.get(pos..end) == Some(*phrase) {
            return Some(Token { level, start: pos, end });
        }
    }
    None
}

/// Suffix matches at `pos`, with the left edge computed by walking backward
/// from `pos`, skipping ASCII-light separators (not counted against the
/// budget), stopping at a heavy separator, `floor`, or the per-level
/// character budget.
fn match_backward_suffix(
    text: &str,
    pos: usize,
    win_end: usize,
    floor: usize,
    suffixes: &[&str],
    level: Level,
) -> Option<Token> {
    for suffix in suffixes {
        let end = pos + suffix.len();
        if end > win_end || text.get(pos..end) != Some(*suffix) {
            continue;
        }
        let start = backward_boundary(text, pos, floor, max_chars_for(level));
        return Some(Token { level, start, end });
    }
    None
}

fn backward_boundary(text: &str, pos: usize, floor: usize, max_chars: usize) -> usize {
    let mut start = pos;
    let mut consumed = 0usize;
    for (idx, ch) in text[floor..pos].char_indices().rev() {
        let byte_idx = floor + idx;
        if is_heavy_separator(ch) {
            break;
        }
        if is_ascii_light(ch) {
            // Skipped, doesn't count against the budget, but still moves
            // the boundary left past the separator itself.
            start = byte_idx;
            continue;
        }
        if consumed >= max_chars {
            break;
        }
        consumed += 1;
        start = byte_idx;
    }
    start.max(floor)
}

fn preceded_by(text: &str, start: usize, needle: &str) -> bool {
    start >= needle.len() && text.get(start - needle.len()..start) == Some(needle)
}

/// House number: a run of ASCII digits immediately followed by "号"/"號",
/// optionally extended by a "-N" tail (the "之N" tail form is reserved for
/// the standalone L1 unit pattern per spec §4.F/§4.F house-number note).
fn match_house_number(text: &str, pos: usize, win_end: usize) -> Option<Token> {
    for suffix in ["号", "號"] {
        let end = pos + suffix.len();
        if end > win_end || text.get(pos..end) != Some(suffix) {
            continue;
        }
        let start = backward_digits(text, pos);
        if start == pos {
            continue; // no digits precede the suffix, not a house number
        }
        let mut final_end = end;
        if let Some(tail_end) = match_dash_tail(text, end, win_end) {
            final_end = tail_end;
        }
        return Some(Token { level: Level::L5, start, end: final_end });
    }
    None
}

fn match_dash_tail(text: &str, pos: usize, win_end: usize) -> Option<usize> {
    let rest = text.get(pos..win_end)?;
    let mut chars = rest.char_indices();
    let (_, first) = chars.next()?;
    if first != '-' {
        return None;
    }
    let mut end = pos + first.len_utf8();
    let mut any_digit = false;
    for (idx, ch) in chars {
        if ch.is_ascii_digit() {
            any_digit = true;
            end = pos + idx + ch.len_utf8();
        } else {
            break;
        }
    }
    any_digit.then_some(end)
}

fn backward_digits(text: &str, pos: usize) -> usize {
    let mut start = pos;
    for (idx, ch) in text[..pos].char_indices().rev() {
        if ch.is_ascii_digit() {
            start = idx;
        } else {
            break;
        }
    }
    start
}

fn backward_digits_or_ascii_letters(text: &str, pos: usize) -> usize {
    let mut start = pos;
    for (idx, ch) in text[..pos].char_indices().rev() {
        if ch.is_ascii_digit() || ch.is_ascii_alphabetic() {
            start = idx;
        } else {
            break;
        }
    }
    start
}

/// Building (L3): digits/ASCII letters + a building suffix.
fn match_digit_or_alpha_suffix(text: &str, pos: usize, win_end: usize, suffixes: &[&str], level: Level) -> Option<Token> {
    for suffix in suffixes {
        let end = pos + suffix.len();
        if end > win_end || text.get(pos..end) != Some(*suffix) {
            continue;
        }
        let start = backward_digits_or_ascii_letters(text, pos);
        if start == pos {
            continue;
        }
        return Some(Token { level, start, end });
    }
    None
}

fn is_poi_city_demoted(text: &str, tok: &Token) -> bool {
    if text.get(tok.end.saturating_sub(POI_CITY_SUFFIX.len())..tok.end) != Some(POI_CITY_SUFFIX) {
        return false;
    }
    text[tok.end..]
        .chars()
        .next()
        .is_some_and(|c| POI_CITY_EXCLUDE_FOLLOWING.contains(&c))
}

/// Floor (L2): digits + a floor suffix, or `F`/`f` + digits.
fn match_floor(text: &str, pos: usize, win_end: usize) -> Option<Token> {
    for suffix in FLOOR_SUFFIXES {
        let end = pos + suffix.len();
        if end > win_end || text.get(pos..end) != Some(*suffix) {
            continue;
        }
        let start = backward_digits(text, pos);
        if start != pos {
            return Some(Token { level: Level::L2, start, end });
        }
    }
    // `F` + digits, e.g. "F3".
    let rest = text.get(pos..win_end)?;
    let mut chars = rest.char_indices();
    let (_, f) = chars.next()?;
    if f != 'F' && f != 'f' {
        return None;
    }
    let mut end = pos + f.len_utf8();
    let mut any_digit = false;
    for (idx, ch) in chars {
        if ch.is_ascii_digit() {
            any_digit = true;
            end = pos + idx + ch.len_utf8();
        } else {
            break;
        }
    }
    any_digit.then_some(Token { level: Level::L2, start: pos, end })
}

/// Unit/room (L1): digits/letters + a unit suffix, or a standalone
/// "之"+digits tail.
fn match_unit(text: &str, pos: usize, win_end: usize) -> Option<Token> {
    for suffix in UNIT_SUFFIXES {
        let end = pos + suffix.len();
        if end > win_end || text.get(pos..end) != Some(*suffix) {
            continue;
        }
        let start = backward_digits_or_ascii_letters(text, pos);
        if start != pos {
            return Some(Token { level: Level::L1, start, end });
        }
    }
    let rest = text.get(pos..win_end)?;
    let mut chars = rest.char_indices();
    let (_, marker) = chars.next()?;
    if marker != UNIT_TAIL_MARKER {
        return None;
    }
    let mut end = pos + marker.len_utf8();
    let mut any_digit = false;
    for (idx, ch) in chars {
        if ch.is_ascii_digit() {
            any_digit = true;
            end = pos + idx + ch.len_utf8();
        } else {
            break;
        }
    }
    any_digit.then_some(Token { level: Level::L1, start: pos, end })
}
