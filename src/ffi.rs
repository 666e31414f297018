//! C ABI for hosts that load hexseal as a shared library.
//!
//! Strings cross the boundary as NUL-terminated C strings. Every pointer
//! returned here is a fresh allocation owned by the caller, who must hand it
//! back to [`hexseal_free`]. Failures, including null or non-UTF-8
//! arguments, return an allocated empty string.

use std::ffi::{CStr, CString, c_char};
use std::panic::{self, AssertUnwindSafe};

use crate::boundary::{open_hex, seal_hex};

/// Seal hex-encoded cleartext under `secret_key`.
///
/// # Safety
///
/// Both arguments must be null or point to valid NUL-terminated strings
/// that stay alive for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hexseal_encrypt(
    secret_key: *const c_char,
    cleartext_hex: *const c_char,
) -> *mut c_char {
    // SAFETY: forwarded from the caller's contract.
    unsafe { call(secret_key, cleartext_hex, seal_hex) }
}

/// Open a hex-encoded container under `secret_key`.
///
/// # Safety
///
/// Same contract as [`hexseal_encrypt`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hexseal_decrypt(
    secret_key: *const c_char,
    ciphertext_hex: *const c_char,
) -> *mut c_char {
    // SAFETY: forwarded from the caller's contract.
    unsafe { call(secret_key, ciphertext_hex, open_hex) }
}

/// Release a string returned by this library. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from [`hexseal_encrypt`] or
/// [`hexseal_decrypt`] that has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hexseal_free(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: ptr came from CString::into_raw in `into_raw` below.
    drop(unsafe { CString::from_raw(ptr) });
}

unsafe fn call(
    secret_key: *const c_char,
    payload_hex: *const c_char,
    op: fn(&str, &str) -> String,
) -> *mut c_char {
    // SAFETY: forwarded from the caller's contract.
    let (key, payload) = match unsafe { (to_str(secret_key), to_str(payload_hex)) } {
        (Some(key), Some(payload)) => (key, payload),
        _ => return into_raw(String::new()),
    };

    let out = panic::catch_unwind(AssertUnwindSafe(|| op(key, payload))).unwrap_or_default();
    into_raw(out)
}

unsafe fn to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract.
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn into_raw(s: String) -> *mut c_char {
    // hex output never contains NUL
    CString::new(s).unwrap_or_default().into_raw()
}
