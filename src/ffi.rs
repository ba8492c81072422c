//! FFI bindings for Synheart Proctor
//!
//! This module provides C-compatible functions for driving the monitor from
//! a host application (browser shell, mobile app, native wrapper). All
//! functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `proctor_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{DateTime, Utc};

use crate::config::MonitorConfig;
use crate::error::ComputeError;
use crate::pipeline::{replay_to_alerts, MonitorProcessor};
use crate::schema::{FrameEventAdapter, TimedInput};
use crate::types::AlertRecord;

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

/// Serialize records as a JSON array and hand ownership to the caller
fn records_to_cstr(records: &[AlertRecord]) -> *mut c_char {
    match serde_json::to_string(records) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// NULL config means defaults
unsafe fn config_from_ptr(config_json: *const c_char) -> Result<MonitorConfig, ComputeError> {
    if config_json.is_null() {
        return Ok(MonitorConfig::default());
    }
    match cstr_to_string(config_json) {
        Some(json) => MonitorConfig::from_json(&json),
        None => Err(ComputeError::InvalidConfig(
            "config is not valid UTF-8".to_string(),
        )),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Replay NDJSON frame events and return a JSON array of alert records.
///
/// # Safety
/// - `ndjson` must be a valid null-terminated C string.
/// - `config_json` must be a valid null-terminated C string, or NULL for defaults.
/// - Returns a newly allocated string that must be freed with `proctor_free_string`.
/// - Returns NULL on error; call `proctor_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn proctor_replay(
    ndjson: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let input = match cstr_to_string(ndjson) {
        Some(s) => s,
        None => {
            set_last_error("Invalid NDJSON string pointer");
            return ptr::null_mut();
        }
    };

    let config = match config_from_ptr(config_json) {
        Ok(c) => c,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match replay_to_alerts(&input, &config) {
        Ok(records) => records_to_cstr(&records),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Monitor API
// ============================================================================

/// Opaque handle to a MonitorProcessor
pub struct ProctorMonitorHandle {
    processor: MonitorProcessor,
}

/// Create a new monitor.
///
/// # Safety
/// - `config_json` must be a valid null-terminated C string, or NULL for defaults.
/// - Returns a pointer to a newly allocated monitor.
/// - Must be freed with `proctor_monitor_free`.
/// - Returns NULL on error; call `proctor_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn proctor_monitor_new(
    config_json: *const c_char,
) -> *mut ProctorMonitorHandle {
    clear_last_error();

    let processor = match config_from_ptr(config_json).and_then(MonitorProcessor::new) {
        Ok(p) => p,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    Box::into_raw(Box::new(ProctorMonitorHandle { processor }))
}

/// Free a monitor.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `proctor_monitor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn proctor_monitor_free(monitor: *mut ProctorMonitorHandle) {
    if !monitor.is_null() {
        drop(Box::from_raw(monitor));
    }
}

/// Push one frame event and return the alert records it produced.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `proctor_monitor_new`.
/// - `event_json` must be a valid null-terminated C string holding one
///   proctor.frame_event.v1 record.
/// - Returns a newly allocated string (JSON array, possibly empty) that must be
///   freed with `proctor_free_string`.
/// - Returns NULL on error; call `proctor_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn proctor_monitor_push(
    monitor: *mut ProctorMonitorHandle,
    event_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *monitor;

    let json_str = match cstr_to_string(event_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid event string pointer");
            return ptr::null_mut();
        }
    };

    let event = match FrameEventAdapter::parse_line(&json_str) {
        Ok(event) => event,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };
    if let Err(e) = event.validate() {
        set_last_error(&ComputeError::from(e).to_string());
        return ptr::null_mut();
    }

    let records = handle.processor.ingest(TimedInput::from(event));
    records_to_cstr(&records)
}

/// Advance the monitor clock to `timestamp` (RFC 3339), firing due ticks and
/// auto-clears.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `proctor_monitor_new`.
/// - `timestamp` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `proctor_free_string`.
/// - Returns NULL on error; call `proctor_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn proctor_monitor_advance(
    monitor: *mut ProctorMonitorHandle,
    timestamp: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *monitor;

    let ts_str = match cstr_to_string(timestamp) {
        Some(s) => s,
        None => {
            set_last_error("Invalid timestamp string pointer");
            return ptr::null_mut();
        }
    };

    let now = match DateTime::parse_from_rfc3339(&ts_str) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(e) => {
            set_last_error(&format!("Invalid timestamp '{}': {}", ts_str, e));
            return ptr::null_mut();
        }
    };

    let records = handle.processor.advance_to(now);
    records_to_cstr(&records)
}

/// Return the monitor state as a JSON object.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `proctor_monitor_new`.
/// - Returns a newly allocated string that must be freed with `proctor_free_string`.
/// - Returns NULL on error; call `proctor_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn proctor_monitor_snapshot(
    monitor: *mut ProctorMonitorHandle,
) -> *mut c_char {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return ptr::null_mut();
    }

    let handle = &*monitor;

    match serde_json::to_string(&handle.processor.snapshot()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// End the current session, cancelling any pending auto-clear.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `proctor_monitor_new`.
/// - Returns 0 on success, non-zero on error.
#[no_mangle]
pub unsafe extern "C" fn proctor_monitor_end_session(monitor: *mut ProctorMonitorHandle) -> i32 {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return -1;
    }

    (*monitor).processor.end_session();
    0
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Proctor functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Proctor function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn proctor_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next Proctor function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn proctor_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Proctor library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn proctor_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
