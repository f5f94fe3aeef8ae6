//! FFI bindings for the life grid
//!
//! This module provides C-compatible functions for calling the life grid from
//! other languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using
//! `lifegrid_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::Utc;

use crate::allocation::allocate_at;
use crate::error::GridError;
use crate::pipeline::LifeGridProcessor;
use crate::schema::InputAdapter;
use crate::types::DisplayMode;

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

/// NULL selects normal mode
unsafe fn parse_mode(mode: *const c_char) -> Result<DisplayMode, GridError> {
    if mode.is_null() {
        return Ok(DisplayMode::Normal);
    }
    match cstr_to_string(mode) {
        Some(s) => s.parse(),
        None => Err(GridError::InvalidInput(
            "Mode is not valid UTF-8".to_string(),
        )),
    }
}

fn allocate_json(input_json: &str, mode: DisplayMode) -> Result<String, GridError> {
    let now = Utc::now();
    let processor = LifeGridProcessor::at(now);
    let input = InputAdapter::parse_json(input_json)?;
    let params = processor.parameters(input)?;

    let grid = allocate_at(&params, mode, now);
    serde_json::to_string(&grid).map_err(|e| GridError::EncodingError(e.to_string()))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Process questionnaire JSON and return a report JSON document.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - `mode` must be a valid null-terminated C string or NULL (normal mode).
/// - Returns a newly allocated string that must be freed with `lifegrid_free_string`.
/// - Returns NULL on error; call `lifegrid_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifegrid_report(json: *const c_char, mode: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let mode = match parse_mode(mode) {
        Ok(m) => m,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match LifeGridProcessor::new().process(&json_str, mode) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Process questionnaire JSON and return the week grid as a JSON array of
/// category ids.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - `mode` must be a valid null-terminated C string or NULL (normal mode).
/// - Returns a newly allocated string that must be freed with `lifegrid_free_string`.
/// - Returns NULL on error; call `lifegrid_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lifegrid_allocate(
    json: *const c_char,
    mode: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let mode = match parse_mode(mode) {
        Ok(m) => m,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match allocate_json(&json_str, mode) {
        Ok(cells) => string_to_cstr(&cells),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by life grid functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a life grid function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn lifegrid_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next life grid call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn lifegrid_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn lifegrid_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
