//! System module - enumeration and control of Windows objects
//!
//! This module provides safe abstractions over Win32 system APIs and the
//! schtasks utility: one provider/executor pair per inventory kind, built
//! on the RAII handle wrappers in `crate::ffi`.

pub mod clipboard;
pub mod connections;
pub mod env_vars;
pub mod modules;
pub mod processes;
pub mod programs;
pub mod services;
pub mod tasks;
pub mod windows_list;

use std::process::Command;

use crate::core::{ActionError, RefreshError};

/// Maps a Win32 failure from `operation` into the OS-rejection class.
pub(crate) fn os_error(operation: &'static str, err: windows::core::Error) -> ActionError {
    ActionError::Os {
        operation,
        reason: err.to_string(),
    }
}

/// Maps a Win32 failure during enumeration into a degraded-refresh error.
pub(crate) fn enumerate_error(kind: &'static str, err: windows::core::Error) -> RefreshError {
    RefreshError::Enumerate {
        kind,
        reason: err.to_string(),
    }
}

/// Opens an Explorer window with `path` selected.
///
/// Explorer ignores the selection when the file has vanished, so this
/// only fails when the process cannot be spawned at all.
pub(crate) fn open_in_explorer(path: &str) -> Result<(), ActionError> {
    Command::new("explorer.exe")
        .arg(format!("/select,{path}"))
        .spawn()
        .map_err(|e| ActionError::Os {
            operation: "explorer.exe /select",
            reason: e.to_string(),
        })?;
    Ok(())
}
