//! Regex engine binding (spec §4.B).
//!
//! A thin, safe wrapper around the `regex` crate. The preset pattern set
//! (§4.C) needs only character classes, `{n,m}` quantifiers, non-capturing
//! groups, alternation, `\s`/`\d`/`\b`, the inline `(?i)` flag, and
//! `[\s\S]` for DOTALL-like matching — all of which `regex` supports without
//! backtracking or lookaround, so no `fancy_regex`-style engine is needed.
//!
//! `find`/`find_group` return byte offsets into the haystack starting the
//! search no earlier than `start_offset`, exactly like the three-operation
//! contract the spec describes (compile / find / find_group), just shaped
//! as `Result<Option<..>>` instead of the ABI's `{-1, 0, 1}` tri-state — the
//! ABI crate narrows that at the boundary.

use crate::error::{CoreError, CoreResult};

/// A compiled pattern, ready to search from any starting offset.
#[derive(Debug)]
pub struct CompiledPattern {
    name: &'static str,
    inner: regex::Regex,
}

impl CompiledPattern {
    /// Compile `pattern`. `name` is carried only for error messages and
    /// cache bookkeeping — it does not affect matching.
    pub fn compile(name: &'static str, pattern: &str) -> CoreResult<CompiledPattern> {
        let inner = regex::Regex::new(pattern).map_err(|source| CoreError::RegexCompile {
            name,
            source,
        })?;
        Ok(CompiledPattern { name, inner })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Find the next non-overlapping match at or after `start_offset`.
    /// Returns `(start, end)` byte offsets into `haystack`, or `None` if
    /// there is no further match. Callers are responsible for operating on
    /// valid UTF-8; this binding does not re-validate boundaries.
    #[must_use]
    pub fn find(&self, haystack: &str, start_offset: usize) -> Option<(usize, usize)> {
        if start_offset > haystack.len() {
            return None;
        }
        self.inner
            .find_at(haystack, start_offset)
            .map(|m| (m.start(), m.end()))
    }

    /// Like [`find`](Self::find), but returns the span of capture group
    /// `group_index` (>= 1) instead of the whole match. `group_index == 0`
    /// is equivalent to [`find`](Self::find).
    #[must_use]
    pub fn find_group(
        &self,
        haystack: &str,
        start_offset: usize,
        group_index: usize,
    ) -> Option<(usize, usize)> {
        if group_index == 0 {
            return self.find(haystack, start_offset);
        }
        if start_offset > haystack.len() {
            return None;
        }
        let caps = self.inner.captures_at(haystack, start_offset)?;
        let group = caps.get(group_index)?;
        Some((group.start(), group.end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_advances_across_offsets() {
        let p = CompiledPattern::compile("digits", r"\d+").unwrap();
        let text = "a1 b22 c333";
        let first = p.find(text, 0).unwrap();
        assert_eq!(&text[first.0..first.1], "1");
        let second = p.find(text, first.1).unwrap();
        assert_eq!(&text[second.0..second.1], "22");
    }

    #[test]
    fn find_group_returns_capture_span() {
        let p = CompiledPattern::compile("labeled", r"(?i)\bpwd\s*[:=]\s*(\S+)").unwrap();
        let text = "the pwd: S3cure!";
        let (s, e) = p.find_group(text, 0, 1).unwrap();
        assert_eq!(&text[s..e], "S3cure!");
    }

    #[test]
    fn invalid_pattern_fails_to_compile() {
        assert!(CompiledPattern::compile("bad", r"(unterminated").is_err());
    }
}
