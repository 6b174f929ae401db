//! Clipboard text placement
//!
//! The export pipeline renders payloads; this module owns the Win32 side
//! of the copy verbs: open the clipboard, move the UTF-16 payload into a
//! global allocation and hand ownership to the clipboard.

use core::ffi::c_void;

use windows::Win32::Foundation::{HANDLE, HWND};
use windows::Win32::System::DataExchange::{
    CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData,
};
use windows::Win32::System::Memory::{GlobalAlloc, GlobalLock, GlobalUnlock, GMEM_MOVEABLE};

use crate::core::ActionError;
use crate::ffi::to_wide;
use crate::system::os_error;

// CF_UNICODETEXT
const UNICODE_TEXT_FORMAT: u32 = 13;

/// Closes the clipboard even on early error returns.
struct ClipboardGuard;

impl Drop for ClipboardGuard {
    fn drop(&mut self) {
        // SAFETY: the guard only exists while the clipboard is open.
        unsafe {
            let _ = CloseClipboard();
        }
    }
}

/// Places `text` on the OS clipboard as Unicode text.
pub fn set_clipboard_text(text: &str) -> Result<(), ActionError> {
    let wide = to_wide(text);
    let bytes = wide.len() * 2;

    // SAFETY: no owner window; the clipboard is released by the guard.
    unsafe { OpenClipboard(HWND::default()) }.map_err(|e| os_error("OpenClipboard", e))?;
    let _guard = ClipboardGuard;

    // SAFETY: the clipboard is open and owned by this thread.
    unsafe { EmptyClipboard() }.map_err(|e| os_error("EmptyClipboard", e))?;

    // SAFETY: a movable allocation sized for the NUL-terminated payload.
    let hmem = unsafe { GlobalAlloc(GMEM_MOVEABLE, bytes) }.map_err(|e| os_error("GlobalAlloc", e))?;

    // SAFETY: the lock pins the allocation while the payload is copied.
    unsafe {
        let dest = GlobalLock(hmem) as *mut u16;
        if dest.is_null() {
            return Err(ActionError::Os {
                operation: "GlobalLock",
                reason: "failed to lock clipboard allocation".into(),
            });
        }
        std::ptr::copy_nonoverlapping(wide.as_ptr(), dest, wide.len());
        let _ = GlobalUnlock(hmem);
    }

    // SAFETY: on success the clipboard takes ownership of the allocation;
    // it must not be freed here.
    unsafe { SetClipboardData(UNICODE_TEXT_FORMAT, HANDLE(hmem.0 as *mut c_void)) }
        .map_err(|e| os_error("SetClipboardData", e))?;

    Ok(())
}
