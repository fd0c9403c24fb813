//! Exercises the exported C ABI surface directly (not the safe `Pipeline`
//! API), the way a real FFI host would: raw pointers, manual buffer
//! ownership, explicit `free` calls. Spec §6/§7.

use std::ffi::{CStr, CString};

use oneaifw_abi::{
    oneaifw_free_sized, oneaifw_get_error_string, oneaifw_mask_and_out_meta, oneaifw_restore_with_meta,
    oneaifw_session_create, oneaifw_session_destroy, oneaifw_string_free, SessionInitArgs,
};

#[test]
fn mask_and_restore_round_trip_through_the_c_abi() {
    unsafe {
        let session = oneaifw_session_create(SessionInitArgs { ner_recog_type: 0 });
        assert!(!session.is_null());

        let text = CString::new("contact a@b.com for details").unwrap();
        let mut out_masked = std::ptr::null_mut();
        let mut out_meta = std::ptr::null_mut();
        let rc = oneaifw_mask_and_out_meta(
            session,
            text.as_ptr(),
            std::ptr::null(),
            0,
            &mut out_masked,
            &mut out_meta,
        );
        assert_eq!(rc, 0);
        assert!(!out_masked.is_null());
        assert!(!out_meta.is_null());

        let masked = CStr::from_ptr(out_masked).to_str().unwrap().to_string();
        assert!(masked.contains("__PII_EMAIL_ADDRESS_"));

        // The blob's own first 4 little-endian bytes are its total length.
        let header = std::slice::from_raw_parts(out_meta, 4);
        let blob_len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let blob_copy = std::slice::from_raw_parts(out_meta, blob_len).to_vec();

        let masked_cstr = CString::new(masked.clone()).unwrap();
        let mut out_restored = std::ptr::null_mut();
        let rc = oneaifw_restore_with_meta(session, masked_cstr.as_ptr(), out_meta, &mut out_restored);
        assert_eq!(rc, 0);
        assert!(!out_restored.is_null());
        let restored = CStr::from_ptr(out_restored).to_str().unwrap();
        assert_eq!(restored, "contact a@b.com for details");

        // `restore` consumed `out_meta`; only the free'd copy's length matters now.
        let _ = blob_copy;
        oneaifw_string_free(out_masked);
        oneaifw_string_free(out_restored);
        oneaifw_session_destroy(session);
    }
}

#[test]
fn empty_masked_text_leaves_out_restored_null() {
    unsafe {
        let session = oneaifw_session_create(SessionInitArgs { ner_recog_type: 0 });
        let empty = CString::new("").unwrap();
        let mut out_restored: *mut std::os::raw::c_char = std::ptr::null_mut();
        let rc = oneaifw_restore_with_meta(session, empty.as_ptr(), std::ptr::null_mut(), &mut out_restored);
        assert_eq!(rc, 0);
        assert!(out_restored.is_null());
        oneaifw_session_destroy(session);
    }
}

#[test]
fn null_session_pointer_reports_invalid_session_rc() {
    unsafe {
        let text = CString::new("x").unwrap();
        let mut out_masked = std::ptr::null_mut();
        let mut out_meta = std::ptr::null_mut();
        let rc = oneaifw_mask_and_out_meta(
            std::ptr::null(),
            text.as_ptr(),
            std::ptr::null(),
            0,
            &mut out_masked,
            &mut out_meta,
        );
        assert_eq!(rc, 1); // ErrorCode::InvalidSessionPtr
        let name = CStr::from_ptr(oneaifw_get_error_string(rc)).to_str().unwrap();
        assert_eq!(name, "InvalidSessionPtr");
    }
}

#[test]
fn malloc_and_free_sized_round_trip() {
    unsafe {
        let ptr = oneaifw_abi::oneaifw_malloc(16);
        assert!(!ptr.is_null());
        oneaifw_free_sized(ptr, 16);
    }
}
