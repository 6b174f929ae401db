//! Safe RAII wrappers for Windows HANDLEs
//!
//! These wrappers ensure that handles are properly closed when they
//! go out of scope, preventing resource leaks.

use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Security::SC_HANDLE;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Registry::{
    RegCloseKey, RegOpenKeyExW, HKEY, REG_SAM_FLAGS,
};
use windows::Win32::System::Services::{CloseServiceHandle, OpenSCManagerW, OpenServiceW};
use windows::Win32::System::Threading::{OpenProcess, PROCESS_ACCESS_RIGHTS};

use crate::ffi::to_wide;

/// A safe wrapper around a Windows process HANDLE.
/// Automatically closes the handle when dropped.
pub struct ProcessHandle(HANDLE);

impl ProcessHandle {
    /// Opens a process by PID with the specified access rights.
    ///
    /// # Returns
    /// * `Ok(ProcessHandle)` - A wrapped handle to the process
    /// * `Err` - If the process cannot be opened (access denied, process exited, etc.)
    pub fn open(pid: u32, access: PROCESS_ACCESS_RIGHTS) -> windows::core::Result<Self> {
        // SAFETY: OpenProcess is safe to call with valid parameters.
        // We handle the error case where the handle is invalid.
        let handle = unsafe { OpenProcess(access, false, pid)? };
        Ok(Self(handle))
    }

    /// Returns the raw HANDLE for use with Win32 APIs.
    ///
    /// # Safety
    /// The caller must ensure the handle is not used after the ProcessHandle is dropped.
    pub fn as_raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: We own this handle and it's valid (we got it from OpenProcess).
        // CloseHandle is safe to call on a valid handle exactly once.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// A safe wrapper around a ToolHelp32 snapshot HANDLE.
/// Automatically closes the handle when dropped.
pub struct SnapshotHandle(HANDLE);

impl SnapshotHandle {
    /// Creates a snapshot of all processes in the system.
    pub fn create_process_snapshot() -> windows::core::Result<Self> {
        // SAFETY: CreateToolhelp32Snapshot is safe to call.
        // TH32CS_SNAPPROCESS captures all processes.
        // The second parameter (0) is ignored for process snapshots.
        let handle = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)? };
        Ok(Self(handle))
    }

    /// Creates a snapshot of the modules loaded into a single process.
    /// Fails for protected processes and for bitness mismatches.
    pub fn create_module_snapshot(pid: u32) -> windows::core::Result<Self> {
        // SAFETY: CreateToolhelp32Snapshot is safe to call.
        // TH32CS_SNAPMODULE32 includes 32-bit modules when inspecting
        // a WOW64 process from a 64-bit caller.
        let handle =
            unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid)? };
        Ok(Self(handle))
    }

    /// Returns the raw HANDLE for use with Win32 APIs.
    pub fn as_raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for SnapshotHandle {
    fn drop(&mut self) {
        // SAFETY: We own this handle and it's valid.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// A safe wrapper around a Service Control Manager SC_HANDLE.
/// Automatically closes the handle when dropped.
pub struct ScHandle(SC_HANDLE);

impl ScHandle {
    /// Connects to the local Service Control Manager.
    pub fn open_manager(access: u32) -> windows::core::Result<Self> {
        // SAFETY: OpenSCManagerW with null machine and database names
        // connects to the active database on the local machine.
        let handle = unsafe { OpenSCManagerW(PCWSTR::null(), PCWSTR::null(), access)? };
        Ok(Self(handle))
    }

    /// Opens a named service under this SCM handle.
    pub fn open_service(&self, name: &str, access: u32) -> windows::core::Result<Self> {
        let wide = to_wide(name);
        // SAFETY: `wide` outlives the call and is NUL-terminated.
        let handle = unsafe { OpenServiceW(self.0, PCWSTR(wide.as_ptr()), access)? };
        Ok(Self(handle))
    }

    /// Returns the raw SC_HANDLE for use with Win32 APIs.
    pub fn as_raw(&self) -> SC_HANDLE {
        self.0
    }
}

impl Drop for ScHandle {
    fn drop(&mut self) {
        // SAFETY: We own this handle and it's valid.
        unsafe {
            let _ = CloseServiceHandle(self.0);
        }
    }
}

/// A safe wrapper around a registry HKEY.
/// Automatically closes the key when dropped.
pub struct RegKey(HKEY);

impl RegKey {
    /// Opens a subkey of `root` with the given access rights.
    pub fn open(root: HKEY, subkey: &str, access: REG_SAM_FLAGS) -> windows::core::Result<Self> {
        let wide = to_wide(subkey);
        let mut key = HKEY::default();
        // SAFETY: `wide` outlives the call; `key` receives the opened handle
        // only when the call succeeds.
        unsafe { RegOpenKeyExW(root, PCWSTR(wide.as_ptr()), 0, access, &mut key).ok()? };
        Ok(Self(key))
    }

    /// Returns the raw HKEY for use with Win32 APIs.
    pub fn as_raw(&self) -> HKEY {
        self.0
    }
}

impl Drop for RegKey {
    fn drop(&mut self) {
        // SAFETY: We own this key and it's valid.
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}
