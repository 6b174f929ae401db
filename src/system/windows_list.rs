//! Top-level window enumeration and control
//!
//! EnumWindows drives a callback that collects every titled top-level
//! window. Closing posts WM_CLOSE rather than destroying the window, so
//! the target application keeps its save-prompt behavior.

use core::ffi::c_void;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowTextW, GetWindowThreadProcessId, IsIconic, IsWindow, IsWindowVisible,
    PostMessageW, SetForegroundWindow, ShowWindow, SW_MINIMIZE, SW_RESTORE, WM_CLOSE,
};

use crate::core::{ActionError, ActionOutcome, Provider, RefreshError, Verb};
use crate::ffi::wide_to_string;
use crate::model::WindowEntry;
use crate::system::{enumerate_error, os_error, processes::process_name_map};

/// EnumWindows callback; `lparam` carries the output vector.
unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = &mut *(lparam.0 as *mut Vec<WindowEntry>);

    let mut title_buf = [0u16; 512];
    let len = GetWindowTextW(hwnd, &mut title_buf);
    let title = wide_to_string(&title_buf[..len.max(0) as usize]);
    // Untitled windows are message-only helpers and owner shells; the
    // inventory lists windows a user could recognize.
    if title.is_empty() {
        return BOOL(1);
    }

    let mut pid = 0u32;
    GetWindowThreadProcessId(hwnd, Some(&mut pid));

    windows.push(WindowEntry {
        hwnd: hwnd.0 as isize,
        title,
        pid,
        process_name: None,
        visible: IsWindowVisible(hwnd).as_bool(),
        minimized: IsIconic(hwnd).as_bool(),
    });
    BOOL(1)
}

/// Enumerates titled top-level windows with their owning processes.
pub struct WindowProvider;

impl Provider<WindowEntry> for WindowProvider {
    fn snapshot(&mut self) -> Result<Vec<WindowEntry>, RefreshError> {
        let mut windows: Vec<WindowEntry> = Vec::new();
        // SAFETY: the callback only dereferences `windows`, which outlives
        // the call.
        unsafe {
            EnumWindows(
                Some(collect_window),
                LPARAM(&mut windows as *mut _ as isize),
            )
        }
        .map_err(|e| enumerate_error("windows", e))?;

        let names = process_name_map();
        for window in &mut windows {
            window.process_name = names.get(&window.pid).cloned();
        }
        Ok(windows)
    }
}

/// Resolves a stored handle, mapping a destroyed window to the vanished
/// class before any message is sent.
fn live_handle(target: &WindowEntry) -> Result<HWND, ActionError> {
    let hwnd = HWND(target.hwnd as *mut c_void);
    // SAFETY: IsWindow tolerates stale handle values.
    if unsafe { IsWindow(hwnd) }.as_bool() {
        Ok(hwnd)
    } else {
        Err(ActionError::TargetVanished {
            id: format!("0x{:X}", target.hwnd),
        })
    }
}

/// Posts close/restore/minimize requests to windows.
pub struct WindowExecutor;

impl crate::core::Executor<WindowEntry> for WindowExecutor {
    fn run(&mut self, verb: Verb, target: &WindowEntry) -> Result<ActionOutcome, ActionError> {
        let hwnd = live_handle(target)?;
        match verb {
            Verb::CloseWindow => {
                // SAFETY: posting to a window we just validated; the target
                // may still decline to close.
                unsafe { PostMessageW(hwnd, WM_CLOSE, WPARAM(0), LPARAM(0)) }
                    .map_err(|e| os_error("PostMessage(WM_CLOSE)", e))?;
                Ok(ActionOutcome::Requested(format!(
                    "Close requested for {}",
                    target.title
                )))
            }
            Verb::BringToFront => {
                // SAFETY: both calls tolerate any valid window handle.
                unsafe {
                    let _ = ShowWindow(hwnd, SW_RESTORE);
                    let _ = SetForegroundWindow(hwnd);
                }
                Ok(ActionOutcome::Requested(format!(
                    "Brought {} to front",
                    target.title
                )))
            }
            Verb::MinimizeWindow => {
                // SAFETY: same as above.
                unsafe {
                    let _ = ShowWindow(hwnd, SW_MINIMIZE);
                }
                Ok(ActionOutcome::Requested(format!(
                    "Minimized {}",
                    target.title
                )))
            }
            _ => Err(ActionError::NotApplicable {
                action: "action",
                target: target.title.clone(),
            }),
        }
    }
}
