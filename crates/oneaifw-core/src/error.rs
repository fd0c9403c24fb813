//! Core-level error taxonomy.
//!
//! This is the rich, `thiserror`-derived error the safe core returns from
//! fallible constructors. The ABI crate narrows it down to the small numeric
//! `rc` taxonomy from spec §7 — the core itself never knows about error
//! codes, matching the split the teacher keeps between `frankenlibc-core`'s
//! `Result`-returning functions and `frankenlibc-abi`'s POSIX-errno layer.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("pattern {name:?} failed to compile: {source}")]
    RegexCompile {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("byte offset {offset} is not a UTF-8 code point boundary")]
    Utf8Boundary { offset: usize },

    #[error("span range [{start}, {end}) is out of bounds for text of length {len}")]
    SpanOutOfBounds { start: u32, end: u32, len: usize },
}

pub type CoreResult<T> = Result<T, CoreError>;
