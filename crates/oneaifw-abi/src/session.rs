//! Session handle lifecycle (spec §4.J).
//!
//! A session owns its regex recognizer list and NER configuration by value
//! (never a back-pointer into itself — spec §9's first re-architecture
//! note); compiled regex handles inside are `Arc`-shared with the global
//! pattern cache.

use std::sync::Mutex as StdMutex;

use oneaifw_core::entity::NerRecognizerKind;
use oneaifw_core::Pipeline;
use parking_lot::Mutex;

use crate::ffi_types::{ErrorCode, SessionInitArgs};
use crate::pattern_cache;

/// Process-wide API mutex (spec §5). Every exported entry point acquires
/// this before touching the allocator, regex cache, or any session, so WASM
/// hosts (whose page allocator isn't inherently thread-safe) get the same
/// serialization native hosts pay for as a cheap uncontended lock.
static API_MUTEX: Mutex<()> = Mutex::new(());

/// RAII guard type alias so call sites read as "while holding the API
/// lock" without naming the lock type twice.
pub type ApiGuard<'a> = parking_lot::MutexGuard<'a, ()>;

#[must_use]
pub fn lock_api() -> ApiGuard<'static> {
    API_MUTEX.lock()
}

pub struct Session {
    pipeline: Pipeline,
    /// Serializes `detect`/`mask`/`restore` calls against one session even
    /// though the API mutex already serializes ABI entry points globally;
    /// kept so a safe-Rust consumer of this crate (not just the cdylib)
    /// gets the same guarantee without relying on the process mutex.
    guard: StdMutex<()>,
}

impl Session {
    fn new(ner_mode: NerRecognizerKind) -> Result<Session, ErrorCode> {
        let regex = pattern_cache::build_recognizer().map_err(|_| ErrorCode::RegexCompileFailed)?;
        Ok(Session {
            pipeline: Pipeline::with_patterns(ner_mode, regex),
            guard: StdMutex::new(()),
        })
    }

    pub fn pipeline(&self) -> &Pipeline {
        let _serialize = self.guard.lock().unwrap_or_else(|poison| poison.into_inner());
        &self.pipeline
    }
}

fn ner_mode_from_args(args: SessionInitArgs) -> NerRecognizerKind {
    match args.ner_recog_type {
        1 => NerRecognizerKind::SequenceClassification,
        _ => NerRecognizerKind::TokenClassification,
    }
}

/// Allocate a new session and return an opaque, non-null, well-aligned
/// pointer to it.
pub fn create(args: SessionInitArgs) -> Result<*mut Session, ErrorCode> {
    let session = Session::new(ner_mode_from_args(args))?;
    Ok(Box::into_raw(Box::new(session)))
}

/// Consume and drop the session behind `ptr`.
///
/// # Safety
/// `ptr` must be a pointer previously returned by [`create`] and not
/// already destroyed.
pub unsafe fn destroy(ptr: *mut Session) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(ptr) });
}

/// Validate `ptr` is non-null and correctly aligned, then borrow it.
///
/// # Safety
/// `ptr`, if non-null, must point to a live `Session` allocated by
/// [`create`].
pub unsafe fn as_ref<'a>(ptr: *const Session) -> Result<&'a Session, ErrorCode> {
    if ptr.is_null() || !ptr.is_aligned() {
        return Err(ErrorCode::InvalidSessionPtr);
    }
    Ok(unsafe { &*ptr })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_destroy_round_trip() {
        let ptr = create(SessionInitArgs { ner_recog_type: 0 }).unwrap();
        unsafe {
            assert!(as_ref(ptr).is_ok());
            destroy(ptr);
        }
    }

    #[test]
    fn null_pointer_is_invalid() {
        unsafe {
            let result = as_ref(std::ptr::null());
            assert_eq!(result.err(), Some(ErrorCode::InvalidSessionPtr));
        }
    }
}
