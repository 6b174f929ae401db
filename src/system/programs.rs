//! Installed-program enumeration from the registry Uninstall keys
//!
//! Reads the three Uninstall locations a program can register under: the
//! 64-bit and 32-bit HKLM views and the per-user HKCU key. Entries
//! without a DisplayName and entries marked SystemComponent are skipped,
//! matching what the Programs and Features applet shows.

use std::process::Command;

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::ERROR_NO_MORE_ITEMS;
use windows::Win32::System::Registry::{
    RegEnumKeyExW, RegQueryValueExW, HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ,
    KEY_WOW64_32KEY, KEY_WOW64_64KEY, REG_SAM_FLAGS,
};

use crate::core::{ActionError, ActionOutcome, Provider, RefreshError, Verb};
use crate::ffi::{to_wide, wide_to_string, RegKey};
use crate::model::ProgramEntry;

const UNINSTALL_PATH: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";

/// The three registry views a program can register its uninstall entry in.
const HIVES: [(&str, HKEY, REG_SAM_FLAGS); 3] = [
    ("HKLM64", HKEY_LOCAL_MACHINE, KEY_WOW64_64KEY),
    ("HKLM32", HKEY_LOCAL_MACHINE, KEY_WOW64_32KEY),
    ("HKCU", HKEY_CURRENT_USER, REG_SAM_FLAGS(0)),
];

/// Reads a REG_SZ / REG_EXPAND_SZ value as a String.
fn read_string_value(key: &RegKey, name: &str) -> Option<String> {
    let wide_name = to_wide(name);
    let mut size = 0u32;
    // SAFETY: probe call reports the value size in bytes.
    unsafe {
        RegQueryValueExW(
            key.as_raw(),
            PCWSTR(wide_name.as_ptr()),
            None,
            None,
            None,
            Some(&mut size),
        )
    }
    .ok()
    .ok()?;

    let mut buf = vec![0u16; (size as usize).div_ceil(2)];
    // SAFETY: the buffer covers `size` bytes as reported by the probe.
    unsafe {
        RegQueryValueExW(
            key.as_raw(),
            PCWSTR(wide_name.as_ptr()),
            None,
            None,
            Some(buf.as_mut_ptr() as *mut u8),
            Some(&mut size),
        )
    }
    .ok()
    .ok()?;

    let value = wide_to_string(&buf);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Reads a REG_DWORD value.
fn read_u32_value(key: &RegKey, name: &str) -> Option<u32> {
    let wide_name = to_wide(name);
    let mut data = [0u8; 4];
    let mut size = data.len() as u32;
    // SAFETY: a REG_DWORD is exactly four bytes.
    unsafe {
        RegQueryValueExW(
            key.as_raw(),
            PCWSTR(wide_name.as_ptr()),
            None,
            None,
            Some(data.as_mut_ptr()),
            Some(&mut size),
        )
    }
    .ok()
    .ok()?;
    (size == 4).then(|| u32::from_ne_bytes(data))
}

/// Names the subkeys directly under `key`.
fn subkey_names(key: &RegKey) -> Vec<String> {
    let mut names = Vec::new();
    let mut index = 0u32;
    loop {
        let mut buf = [0u16; 256];
        let mut len = buf.len() as u32;
        // SAFETY: `len` is the buffer capacity in characters and receives
        // the name length on success.
        let status = unsafe {
            RegEnumKeyExW(
                key.as_raw(),
                index,
                PWSTR(buf.as_mut_ptr()),
                &mut len,
                None,
                PWSTR::null(),
                None,
                None,
            )
        };
        if status == ERROR_NO_MORE_ITEMS {
            break;
        }
        if status.is_ok() {
            names.push(wide_to_string(&buf[..len as usize]));
        }
        index += 1;
    }
    names
}

fn read_program(hive_tag: &str, key: &RegKey, subkey: &str) -> Option<ProgramEntry> {
    let name = read_string_value(key, "DisplayName")?;
    if read_u32_value(key, "SystemComponent") == Some(1) {
        return None;
    }
    Some(ProgramEntry {
        key: format!("{hive_tag}\\{subkey}"),
        name,
        version: read_string_value(key, "DisplayVersion"),
        publisher: read_string_value(key, "Publisher"),
        install_date: read_string_value(key, "InstallDate"),
        install_location: read_string_value(key, "InstallLocation"),
        uninstall_command: read_string_value(key, "UninstallString"),
        estimated_size_kb: read_u32_value(key, "EstimatedSize"),
    })
}

/// Resolves an entry's hive-qualified key back to an open registry key.
fn open_program_key(id: &str) -> Option<RegKey> {
    let (tag, subkey) = id.split_once('\\')?;
    let (_, root, view) = HIVES.iter().find(|(t, _, _)| *t == tag)?;
    RegKey::open(*root, &format!("{UNINSTALL_PATH}\\{subkey}"), KEY_READ | *view).ok()
}

/// Enumerates installed programs across all three Uninstall views.
pub struct ProgramProvider;

impl Provider<ProgramEntry> for ProgramProvider {
    fn snapshot(&mut self) -> Result<Vec<ProgramEntry>, RefreshError> {
        let mut programs = Vec::new();
        let mut opened_any = false;

        for (tag, root, view) in HIVES {
            // A missing view (32-bit HKLM on a 32-bit OS) is not a failure.
            let Ok(parent) = RegKey::open(root, UNINSTALL_PATH, KEY_READ | view) else {
                continue;
            };
            opened_any = true;
            for subkey in subkey_names(&parent) {
                let path = format!("{UNINSTALL_PATH}\\{subkey}");
                let Ok(key) = RegKey::open(root, &path, KEY_READ | view) else {
                    continue;
                };
                if let Some(program) = read_program(tag, &key, &subkey) {
                    programs.push(program);
                }
            }
        }

        if !opened_any {
            return Err(RefreshError::Enumerate {
                kind: "programs",
                reason: "no Uninstall registry key could be opened".into(),
            });
        }
        Ok(programs)
    }
}

/// Launches uninstallers and opens install folders.
pub struct ProgramExecutor;

impl crate::core::Executor<ProgramEntry> for ProgramExecutor {
    fn run(&mut self, verb: Verb, target: &ProgramEntry) -> Result<ActionOutcome, ActionError> {
        match verb {
            Verb::UninstallProgram => {
                // The entry disappears from the registry once uninstalled;
                // verify it is still there before launching anything.
                if open_program_key(&target.key).is_none() {
                    return Err(ActionError::TargetVanished {
                        id: target.key.clone(),
                    });
                }
                let command = target.uninstall_command.as_deref().ok_or(ActionError::Os {
                    operation: "Uninstall",
                    reason: "the installer recorded no uninstall command".into(),
                })?;
                // Uninstall strings are full command lines, so they go
                // through the shell rather than being split by hand.
                Command::new("cmd")
                    .args(["/C", command])
                    .spawn()
                    .map_err(|e| ActionError::Os {
                        operation: "Uninstall",
                        reason: e.to_string(),
                    })?;
                Ok(ActionOutcome::Requested(format!(
                    "Uninstall of {} started",
                    target.name
                )))
            }
            Verb::OpenInstallLocation => {
                let location = target.install_location.as_deref().ok_or_else(|| {
                    ActionError::NotApplicable {
                        action: "Open Install Location",
                        target: target.name.clone(),
                    }
                })?;
                Command::new("explorer.exe")
                    .arg(location)
                    .spawn()
                    .map_err(|e| ActionError::Os {
                        operation: "explorer.exe",
                        reason: e.to_string(),
                    })?;
                Ok(ActionOutcome::Requested(format!(
                    "Opened install location of {}",
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
