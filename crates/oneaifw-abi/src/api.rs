//! Exported C ABI entry points (spec §4.J/§6). Every symbol name here is
//! part of the external contract.

use std::ffi::{c_char, CStr, CString};
use std::slice;

use crate::ffi_types::{ErrorCode, NerEntryAbi, PiiSpanAbi, SessionInitArgs};
use crate::macros::oneaifw_abi_fn;
use crate::session::{self, Session};
use crate::{log_bridge, pattern_cache};

/// Read a host-supplied UTF-8 C-string. The host is contractually required
/// to supply valid UTF-8 (spec §3); invalid bytes degrade to an empty
/// string rather than panicking the ABI boundary.
unsafe fn read_cstr<'a>(ptr: *const c_char) -> &'a str {
    if ptr.is_null() {
        return "";
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

unsafe fn read_ner_entries<'a>(
    text: &'a str,
    ptr: *const NerEntryAbi,
    n: usize,
) -> Vec<(oneaifw_core::entity::NerEntry, &'a str)> {
    if ptr.is_null() || n == 0 {
        return Vec::new();
    }
    let raw = unsafe { slice::from_raw_parts(ptr, n) };
    raw.iter()
        .filter_map(|e| {
            let start = e.start_byte as usize;
            let end = e.end_byte as usize;
            let surface = text.get(start..end)?;
            Some((e.to_core(false), surface))
        })
        .collect()
}

fn c_string_out(s: &str) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

oneaifw_abi_fn! {
    /// Create a session. `init_args` selects the NER aggregation mode.
    /// Returns null on a preset pattern compile failure.
    fn oneaifw_session_create(init_args: SessionInitArgs) -> *mut Session {
        let _api = session::lock_api();
        match session::create(init_args) {
            Ok(ptr) => ptr,
            Err(_) => std::ptr::null_mut(),
        }
    }
}

oneaifw_abi_fn! {
    /// Destroy a session previously returned by `oneaifw_session_create`.
    fn oneaifw_session_destroy(handle: *mut Session) {
        let _api = session::lock_api();
        session::destroy(handle);
    }
}

oneaifw_abi_fn! {
    /// Detect, mask, and serialize metadata in one call. On success writes
    /// non-null NUL-terminated `*out_masked` and `*out_meta_blob` (the blob's
    /// own first 4 little-endian bytes encode its total length) and returns
    /// 0. On failure leaves both out-pointers untouched (spec §7).
    fn oneaifw_mask_and_out_meta(
        handle: *const Session,
        text: *const c_char,
        ner_entries: *const NerEntryAbi,
        n_entries: usize,
        out_masked: *mut *mut c_char,
        out_meta_blob: *mut *mut u8
    ) -> i32 {
        let _api = session::lock_api();
        let session = match session::as_ref(handle) {
            Ok(s) => s,
            Err(e) => return e.rc(),
        };
        let text = read_cstr(text);
        let entries = read_ner_entries(text, ner_entries, n_entries);

        let result = session.pipeline().mask(text, &entries);
        let masked_cstr = c_string_out(&result.masked_text);
        let blob_ptr = result.metadata_blob.into_boxed_slice();
        let blob_ptr = Box::into_raw(blob_ptr) as *mut u8;

        *out_masked = masked_cstr;
        *out_meta_blob = blob_ptr;
        0
    }
}

oneaifw_abi_fn! {
    /// Run detection only (no masking) and report the merged PII spans.
    fn oneaifw_get_pii_spans(
        handle: *const Session,
        text: *const c_char,
        ner_entries: *const NerEntryAbi,
        n_entries: usize,
        out_spans: *mut *mut PiiSpanAbi,
        out_count: *mut usize
    ) -> i32 {
        let _api = session::lock_api();
        let session = match session::as_ref(handle) {
            Ok(s) => s,
            Err(e) => return e.rc(),
        };
        let text_str = read_cstr(text);
        let entries = read_ner_entries(text_str, ner_entries, n_entries);

        let spans = session.pipeline().detect(text_str, &entries);
        let abi_spans: Vec<PiiSpanAbi> = spans
            .iter()
            .enumerate()
            .map(|(idx, s)| PiiSpanAbi {
                entity_id: (idx + 1) as u32,
                entity_type: s.entity_type as u8,
                pad: [0; 3],
                start: s.start,
                end: s.end,
            })
            .collect();

        let count = abi_spans.len();
        let boxed = abi_spans.into_boxed_slice();
        let ptr = Box::into_raw(boxed) as *mut PiiSpanAbi;

        *out_spans = ptr;
        *out_count = count;
        0
    }
}

oneaifw_abi_fn! {
    /// Restore original text from masked text plus a metadata blob. The
    /// blob is always consumed (freed) by this call, mask does not free it
    /// (spec §9 buffer-ownership asymmetry). Empty `masked` text is not an
    /// error: `*out_restored` is left null and 0 is returned (spec §4.I
    /// edge case (b) / S4).
    fn oneaifw_restore_with_meta(
        handle: *const Session,
        masked: *const c_char,
        meta_blob: *mut u8,
        out_restored: *mut *mut c_char
    ) -> i32 {
        let _api = session::lock_api();
        let session = match session::as_ref(handle) {
            Ok(s) => s,
            Err(e) => return e.rc(),
        };

        let blob_len = if meta_blob.is_null() {
            0
        } else {
            let header = slice::from_raw_parts(meta_blob, 4);
            u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize
        };
        let blob: Vec<u8> = if meta_blob.is_null() || blob_len == 0 {
            Vec::new()
        } else {
            let boxed = Box::from_raw(std::ptr::slice_from_raw_parts_mut(meta_blob, blob_len));
            boxed.into_vec()
        };

        let masked_str = read_cstr(masked);
        if masked_str.is_empty() {
            *out_restored = std::ptr::null_mut();
            return 0;
        }

        let restored = session.pipeline().restore(masked_str, &blob);
        *out_restored = c_string_out(&restored);
        0
    }
}

oneaifw_abi_fn! {
    /// Free a string returned by any of this crate's entry points.
    fn oneaifw_string_free(s: *mut c_char) {
        if !s.is_null() {
            drop(CString::from_raw(s));
        }
    }
}

oneaifw_abi_fn! {
    /// Free the span array returned by `oneaifw_get_pii_spans`.
    fn oneaifw_spans_free(spans: *mut PiiSpanAbi, count: usize) {
        if !spans.is_null() {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(spans, count)));
        }
    }
}

oneaifw_abi_fn! {
    /// Allocate `n` bytes the host owns until passed to `oneaifw_free_sized`.
    fn oneaifw_malloc(n: usize) -> *mut u8 {
        let _api = session::lock_api();
        let boxed = vec![0u8; n].into_boxed_slice();
        Box::into_raw(boxed) as *mut u8
    }
}

oneaifw_abi_fn! {
    /// Free a buffer previously returned by `oneaifw_malloc` (or a metadata
    /// blob the host chose to free manually instead of via restore).
    fn oneaifw_free_sized(ptr: *mut u8, n: usize) {
        if !ptr.is_null() {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, n)));
        }
    }
}

oneaifw_abi_fn! {
    /// Free every compiled pattern handle and clear the global cache.
    /// Idempotent; callers must not race other entry points against it.
    fn oneaifw_shutdown() {
        let _api = session::lock_api();
        pattern_cache::shutdown();
    }
}

oneaifw_abi_fn! {
    /// Map an `rc` to its stable error name. The returned pointer is a
    /// `'static` string and must not be freed.
    fn oneaifw_get_error_string(rc: i32) -> *const c_char {
        let name: &CStr = match ErrorCode::from_rc(rc) {
            Some(ErrorCode::InvalidSessionPtr) => c"InvalidSessionPtr",
            Some(ErrorCode::RegexCompileFailed) => c"RegexCompileFailed",
            Some(ErrorCode::AllocatorFailure) => c"AllocatorFailure",
            Some(ErrorCode::InvalidMetadata) => c"InvalidMetadata",
            None => c"Unknown",
        };
        name.as_ptr()
    }
}

/// Host-visible log level passthrough, exposed for completeness with the
/// single-import log contract (spec §6); not an exported symbol itself.
pub fn emit_log(level: log_bridge::LogLevel, message: &str) {
    log_bridge::log(level, message);
}
