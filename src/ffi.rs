//! FFI bindings for Typesense
//!
//! This module provides C-compatible functions for calling the analyzer from other
//! languages. All functions use C strings (null-terminated) and return allocated
//! memory that must be freed by the caller using `typesense_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::AnalyzerConfig;
use crate::pipeline::{analyze_json, SessionAnalyzer};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Analyze session JSON with the default thresholds and return analysis JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `typesense_free_string`.
/// - Returns NULL on error; call `typesense_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn typesense_analyze(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match analyze_json(json_str) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Analyze session JSON with custom gap thresholds (milliseconds).
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `typesense_free_string`.
/// - Returns NULL on error (including a burst threshold above the pause threshold);
///   call `typesense_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn typesense_analyze_with_thresholds(
    json: *const c_char,
    pause_threshold_ms: u64,
    burst_threshold_ms: u64,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let analyzer = match SessionAnalyzer::with_config(AnalyzerConfig {
        pause_threshold_ms,
        burst_threshold_ms,
    }) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match analyzer.analyze_json(&json_str) {
        Ok(result) => string_to_cstr(&result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a static string that is valid until the next call on
///   this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if there was no error.
#[no_mangle]
pub unsafe extern "C" fn typesense_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Free a string returned by Typesense functions.
///
/// # Safety
/// - `s` must be a pointer returned by a Typesense function, or NULL.
/// - Must not be called twice on the same pointer.
#[no_mangle]
pub unsafe extern "C" fn typesense_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
