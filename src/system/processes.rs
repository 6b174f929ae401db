//! Process enumeration using the ToolHelp32 API
//!
//! The ToolHelp snapshot gives the cheap fields for every process; the
//! per-process details (image path, working set) need an opened handle
//! and degrade the individual record when access is denied.

use std::collections::HashMap;
use std::mem;

use windows::core::PWSTR;
use windows::Win32::Foundation::{ERROR_INVALID_PARAMETER, MAX_PATH};
use windows::Win32::System::Diagnostics::ToolHelp::{
    Process32FirstW, Process32NextW, PROCESSENTRY32W,
};
use windows::Win32::System::ProcessStatus::{GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS};
use windows::Win32::System::Threading::{
    QueryFullProcessImageNameW, TerminateProcess, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE,
};

use crate::core::{ActionError, ActionOutcome, Provider, RefreshError, Verb};
use crate::ffi::{wide_to_string, ProcessHandle, SnapshotHandle};
use crate::model::ProcessEntry;
use crate::system::{enumerate_error, open_in_explorer, os_error};

/// The cheap ToolHelp fields for one process.
pub(crate) struct RawProcess {
    pub pid: u32,
    pub parent_pid: u32,
    pub thread_count: u32,
    pub name: String,
}

/// Walks a ToolHelp process snapshot.
pub(crate) fn raw_process_list() -> windows::core::Result<Vec<RawProcess>> {
    let snapshot = SnapshotHandle::create_process_snapshot()?;
    let mut processes = Vec::new();

    // dwSize must be set before the first call.
    let mut entry = PROCESSENTRY32W {
        dwSize: mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    // SAFETY: valid snapshot handle and properly initialized entry.
    let mut success = unsafe { Process32FirstW(snapshot.as_raw(), &mut entry) };
    while success.is_ok() {
        processes.push(RawProcess {
            pid: entry.th32ProcessID,
            parent_pid: entry.th32ParentProcessID,
            thread_count: entry.cntThreads,
            name: wide_to_string(&entry.szExeFile),
        });
        // SAFETY: same as above.
        success = unsafe { Process32NextW(snapshot.as_raw(), &mut entry) };
    }

    Ok(processes)
}

/// PID-to-name lookup shared by the connection and window inventories.
pub(crate) fn process_name_map() -> HashMap<u32, String> {
    raw_process_list()
        .map(|list| list.into_iter().map(|p| (p.pid, p.name)).collect())
        .unwrap_or_default()
}

/// Full executable path of an opened process.
fn query_image_path(handle: &ProcessHandle) -> Option<String> {
    let mut buf = [0u16; MAX_PATH as usize];
    let mut len = buf.len() as u32;
    // SAFETY: `len` is the buffer capacity in characters and receives the
    // written length on success.
    unsafe {
        QueryFullProcessImageNameW(
            handle.as_raw(),
            PROCESS_NAME_WIN32,
            PWSTR(buf.as_mut_ptr()),
            &mut len,
        )
    }
    .ok()?;
    Some(wide_to_string(&buf[..len as usize]))
}

/// Working-set size of an opened process, in bytes.
fn query_working_set(handle: &ProcessHandle) -> Option<u64> {
    let mut counters = PROCESS_MEMORY_COUNTERS {
        cb: mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32,
        ..Default::default()
    };
    // SAFETY: `counters` is properly sized via its cb field.
    unsafe {
        GetProcessMemoryInfo(
            handle.as_raw(),
            &mut counters,
            mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32,
        )
    }
    .ok()?;
    Some(counters.WorkingSetSize as u64)
}

/// Enumerates all running processes with per-process detail where allowed.
pub struct ProcessProvider;

impl Provider<ProcessEntry> for ProcessProvider {
    fn snapshot(&mut self) -> Result<Vec<ProcessEntry>, RefreshError> {
        let raw = raw_process_list().map_err(|e| enumerate_error("processes", e))?;
        let mut entries = Vec::with_capacity(raw.len());

        for proc in raw {
            // The Idle and System pseudo-processes cannot be opened.
            let handle = if proc.pid == 0 || proc.pid == 4 {
                None
            } else {
                ProcessHandle::open(proc.pid, PROCESS_QUERY_LIMITED_INFORMATION).ok()
            };

            let (path, memory_bytes, access_denied) = match &handle {
                Some(h) => (query_image_path(h), query_working_set(h).unwrap_or(0), false),
                None => (None, 0, true),
            };

            entries.push(ProcessEntry {
                pid: proc.pid,
                parent_pid: proc.parent_pid,
                name: proc.name,
                thread_count: proc.thread_count,
                memory_bytes,
                path,
                access_denied,
            });
        }

        Ok(entries)
    }
}

/// Terminates processes and reveals their images in Explorer.
pub struct ProcessExecutor;

impl crate::core::Executor<ProcessEntry> for ProcessExecutor {
    fn run(&mut self, verb: Verb, target: &ProcessEntry) -> Result<ActionOutcome, ActionError> {
        match verb {
            Verb::TerminateProcess => {
                let handle = ProcessHandle::open(target.pid, PROCESS_TERMINATE).map_err(|e| {
                    // OpenProcess reports a nonexistent PID as an invalid
                    // parameter, not as a not-found error.
                    if e.code() == ERROR_INVALID_PARAMETER.to_hresult() {
                        ActionError::TargetVanished {
                            id: target.pid.to_string(),
                        }
                    } else {
                        os_error("OpenProcess", e)
                    }
                })?;
                // SAFETY: we own a handle opened with PROCESS_TERMINATE.
                unsafe { TerminateProcess(handle.as_raw(), 1) }
                    .map_err(|e| os_error("TerminateProcess", e))?;
                Ok(ActionOutcome::Requested(format!(
                    "Termination of {} (PID {}) requested",
                    target.name, target.pid
                )))
            }
            Verb::OpenFileLocation => {
                let path = target.path.as_deref().ok_or(ActionError::Os {
                    operation: "OpenFileLocation",
                    reason: "no image path is known for this process".into(),
                })?;
                open_in_explorer(path)?;
                Ok(ActionOutcome::Requested(format!("Opened location of {}", target.name)))
            }
            _ => Err(ActionError::NotApplicable {
                action: "action",
                target: target.name.clone(),
            }),
        }
    }
}
