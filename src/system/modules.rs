//! System-wide loaded-module enumeration using the ToolHelp32 API
//!
//! ToolHelp only snapshots modules per process, so the system-wide view
//! aggregates per-process snapshots: one record per distinct image path,
//! counting how many processes have it loaded. Processes that refuse a
//! module snapshot (protected, exited, bitness mismatch) are skipped;
//! only a failed process walk fails the refresh.

use std::collections::HashMap;
use std::mem;

use windows::Win32::System::Diagnostics::ToolHelp::{
    Module32FirstW, Module32NextW, MODULEENTRY32W,
};

use crate::core::{ActionError, ActionOutcome, Provider, RefreshError, Verb};
use crate::ffi::{wide_to_string, SnapshotHandle};
use crate::model::ModuleEntry;
use crate::system::{enumerate_error, open_in_explorer, processes::raw_process_list};

/// Aggregates the modules of every enumerable process.
pub struct ModuleProvider;

impl Provider<ModuleEntry> for ModuleProvider {
    fn snapshot(&mut self) -> Result<Vec<ModuleEntry>, RefreshError> {
        let raw = raw_process_list().map_err(|e| enumerate_error("modules", e))?;

        // First-seen order, deduped case-insensitively by path.
        let mut order: Vec<ModuleEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for proc in raw {
            if proc.pid == 0 || proc.pid == 4 {
                continue;
            }
            let snapshot = match SnapshotHandle::create_module_snapshot(proc.pid) {
                Ok(s) => s,
                Err(_) => continue,
            };

            let mut entry = MODULEENTRY32W {
                dwSize: mem::size_of::<MODULEENTRY32W>() as u32,
                ..Default::default()
            };
            // SAFETY: valid snapshot handle and properly initialized entry.
            let mut success = unsafe { Module32FirstW(snapshot.as_raw(), &mut entry) };
            while success.is_ok() {
                let path = wide_to_string(&entry.szExePath);
                let key = path.to_lowercase();
                match index.get(&key) {
                    Some(&i) => order[i].ref_count += 1,
                    None => {
                        index.insert(key, order.len());
                        order.push(ModuleEntry {
                            name: wide_to_string(&entry.szModule),
                            path,
                            base_size: entry.modBaseSize,
                            ref_count: 1,
                        });
                    }
                }
                // SAFETY: same as above.
                success = unsafe { Module32NextW(snapshot.as_raw(), &mut entry) };
            }
        }

        Ok(order)
    }
}

/// Reveals module images in Explorer.
pub struct ModuleExecutor;

impl crate::core::Executor<ModuleEntry> for ModuleExecutor {
    fn run(&mut self, verb: Verb, target: &ModuleEntry) -> Result<ActionOutcome, ActionError> {
        match verb {
            Verb::OpenFileLocation => {
                open_in_explorer(&target.path)?;
                Ok(ActionOutcome::Requested(format!(
                    "Opened location of {}",
                    target.name
                )))
            }
            _ => Err(ActionError::NotApplicable {
                action: "action",
                target: target.name.clone(),
            }),
        }
    }
}
