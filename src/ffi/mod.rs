//! FFI module - Safe wrappers around Win32 handles and string conversion
//!
//! This module provides RAII wrappers for Windows handles to ensure
//! proper cleanup when handles go out of scope, plus the UTF-16
//! conversion helpers every Win32 call site needs.

mod handles;

pub use handles::{ProcessHandle, RegKey, ScHandle, SnapshotHandle};

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;

/// Converts a Rust string to a NUL-terminated UTF-16 buffer for Win32 APIs.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Converts a UTF-16 buffer back to a String, stopping at the first NUL.
pub fn wide_to_string(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    OsString::from_wide(&buf[..len]).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_round_trip_stops_at_nul() {
        let wide = to_wide("Spooler");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(wide_to_string(&wide), "Spooler");
    }
}
