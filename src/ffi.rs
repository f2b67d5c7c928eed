//! FFI bindings for Lifealign
//!
//! This module provides C-compatible functions for calling the alignment
//! engine from other languages. All functions use C strings (null-terminated)
//! and return allocated memory that must be freed by the caller using
//! `lifealign_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{Local, NaiveDate};

use crate::pipeline::{alignments_from_json_on, AlignmentEngine};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
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

/// Parse an optional `as_of` date argument. NULL means the local calendar
/// date; otherwise the string must be YYYY-MM-DD.
unsafe fn cstr_to_date(ptr: *const c_char) -> Result<NaiveDate, String> {
    if ptr.is_null() {
        return Ok(Local::now().date_naive());
    }
    match cstr_to_string(ptr) {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| format!("Invalid as_of date: {}", s)),
        None => Err("Invalid as_of string pointer".to_string()),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Score an align.input.v1 document and return the report JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - `as_of` must be a valid null-terminated C string (YYYY-MM-DD) or NULL
///   to use the local calendar date.
/// - Returns a newly allocated string that must be freed with `lifealign_free_string`.
/// - Returns NULL on error; call `lifealign_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifealign_compute_report(
    json: *const c_char,
    as_of: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let today = match cstr_to_date(as_of) {
        Ok(date) => date,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    match alignments_from_json_on(&json_str, today) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Engine API
// ============================================================================

/// Opaque handle to an AlignmentEngine
pub struct AlignmentEngineHandle {
    engine: AlignmentEngine,
}

/// Create a new AlignmentEngine with an empty snapshot store.
///
/// # Safety
/// - Returns a pointer to a newly allocated AlignmentEngine.
/// - Must be freed with `lifealign_engine_free`.
#[no_mangle]
pub unsafe extern "C" fn lifealign_engine_new() -> *mut AlignmentEngineHandle {
    clear_last_error();

    let engine = AlignmentEngine::new();
    let handle = Box::new(AlignmentEngineHandle { engine });
    Box::into_raw(handle)
}

/// Free an AlignmentEngine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `lifealign_engine_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn lifealign_engine_free(engine: *mut AlignmentEngineHandle) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Run a review pass with a stateful engine and return the report JSON.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `lifealign_engine_new`.
/// - `json` must be a valid null-terminated C string.
/// - `as_of` must be a valid null-terminated C string (YYYY-MM-DD) or NULL
///   to use the local calendar date.
/// - Returns a newly allocated string that must be freed with `lifealign_free_string`.
/// - Returns NULL on error; call `lifealign_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifealign_engine_review(
    engine: *mut AlignmentEngineHandle,
    json: *const c_char,
    as_of: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }

    let handle = &mut *engine;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let today = match cstr_to_date(as_of) {
        Ok(date) => date,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    match handle.engine.review_json_on(&json_str, today) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Save engine snapshots to JSON.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `lifealign_engine_new`.
/// - Returns a newly allocated string that must be freed with `lifealign_free_string`.
/// - Returns NULL on error; call `lifealign_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifealign_engine_save_snapshots(
    engine: *mut AlignmentEngineHandle,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }

    let handle = &*engine;

    match handle.engine.save_snapshots() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load engine snapshots from JSON.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `lifealign_engine_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `lifealign_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifealign_engine_load_snapshots(
    engine: *mut AlignmentEngineHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return -1;
    }

    let handle = &mut *engine;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.engine.load_snapshots(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Lifealign functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Lifealign function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn lifealign_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Lifealign function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn lifealign_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        match &*e.borrow() {
            Some(cstr) => cstr.as_ptr(),
            None => ptr::null(),
        }
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Lifealign library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn lifealign_version() -> *const c_char {
    // Use a static CString to avoid allocation
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
