//! Persisted environment variables from the registry
//!
//! Reads the user hive (HKCU\Environment) and the machine hive (Session
//! Manager\Environment). Deletion removes the registry value and then
//! broadcasts WM_SETTINGCHANGE so running shells notice; processes that
//! inherited the variable keep their copy until they restart.

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{
    ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS, LPARAM, WPARAM,
};
use windows::Win32::System::Registry::{
    RegDeleteValueW, RegEnumValueW, HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ,
    KEY_SET_VALUE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    SendMessageTimeoutW, HWND_BROADCAST, SMTO_ABORTIFHUNG, WM_SETTINGCHANGE,
};

use crate::core::{ActionError, ActionOutcome, Provider, RefreshError, Verb};
use crate::ffi::{to_wide, wide_to_string, RegKey};
use crate::model::{EnvVarEntry, VarScope};
use crate::system::os_error;

const MACHINE_ENV_PATH: &str = r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";

fn hive(scope: VarScope) -> (HKEY, &'static str) {
    match scope {
        VarScope::User => (HKEY_CURRENT_USER, "Environment"),
        VarScope::Machine => (HKEY_LOCAL_MACHINE, MACHINE_ENV_PATH),
    }
}

/// Enumerates the name/value pairs of one environment hive.
fn enum_values(key: &RegKey, scope: VarScope, out: &mut Vec<EnvVarEntry>) {
    let mut index = 0u32;
    loop {
        let mut name_buf = [0u16; 512];
        let mut name_len = name_buf.len() as u32;
        let mut data = vec![0u8; 4096];
        let mut data_len = data.len() as u32;

        // SAFETY: both buffers cover the capacities passed alongside them.
        let status = unsafe {
            RegEnumValueW(
                key.as_raw(),
                index,
                PWSTR(name_buf.as_mut_ptr()),
                &mut name_len,
                None,
                None,
                Some(data.as_mut_ptr()),
                Some(&mut data_len),
            )
        };
        if status == ERROR_NO_MORE_ITEMS {
            break;
        }
        if status == ERROR_MORE_DATA {
            // Retry the same index with the reported size.
            data.resize(data_len as usize, 0);
            name_len = name_buf.len() as u32;
            // SAFETY: same as above, with the enlarged data buffer.
            let retry = unsafe {
                RegEnumValueW(
                    key.as_raw(),
                    index,
                    PWSTR(name_buf.as_mut_ptr()),
                    &mut name_len,
                    None,
                    None,
                    Some(data.as_mut_ptr()),
                    Some(&mut data_len),
                )
            };
            if retry.is_err() {
                index += 1;
                continue;
            }
        } else if status.is_err() {
            index += 1;
            continue;
        }

        let wide: Vec<u16> = data[..data_len as usize]
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect();
        out.push(EnvVarEntry {
            scope,
            name: wide_to_string(&name_buf[..name_len as usize]),
            value: wide_to_string(&wide),
        });
        index += 1;
    }
}

/// Enumerates user and machine environment variables.
pub struct EnvVarProvider;

impl Provider<EnvVarEntry> for EnvVarProvider {
    fn snapshot(&mut self) -> Result<Vec<EnvVarEntry>, RefreshError> {
        let mut vars = Vec::new();
        let mut opened_any = false;

        for scope in [VarScope::User, VarScope::Machine] {
            let (root, path) = hive(scope);
            // A denied machine hive degrades to the user view only.
            if let Ok(key) = RegKey::open(root, path, KEY_READ) {
                opened_any = true;
                enum_values(&key, scope, &mut vars);
            }
        }

        if !opened_any {
            return Err(RefreshError::Enumerate {
                kind: "env",
                reason: "no environment registry key could be opened".into(),
            });
        }
        Ok(vars)
    }
}

/// Tells interested top-level windows that the environment changed.
fn broadcast_environment_change() {
    let section = to_wide("Environment");
    // SAFETY: fire-and-forget broadcast; the timeout keeps a hung window
    // from blocking us and the result is irrelevant.
    unsafe {
        SendMessageTimeoutW(
            HWND_BROADCAST,
            WM_SETTINGCHANGE,
            WPARAM(0),
            LPARAM(section.as_ptr() as isize),
            SMTO_ABORTIFHUNG,
            1000,
            None,
        );
    }
}

/// Deletes persisted environment variables.
pub struct EnvVarExecutor;

impl crate::core::Executor<EnvVarEntry> for EnvVarExecutor {
    fn run(&mut self, verb: Verb, target: &EnvVarEntry) -> Result<ActionOutcome, ActionError> {
        match verb {
            Verb::DeleteVariable => {
                let (root, path) = hive(target.scope);
                let key = RegKey::open(root, path, KEY_SET_VALUE)
                    .map_err(|e| os_error("RegOpenKey", e))?;
                let wide_name = to_wide(&target.name);
                // SAFETY: `wide_name` outlives the call and is NUL-terminated.
                unsafe { RegDeleteValueW(key.as_raw(), PCWSTR(wide_name.as_ptr())) }
                    .ok()
                    .map_err(|e| {
                        if e.code() == ERROR_FILE_NOT_FOUND.to_hresult() {
                            ActionError::TargetVanished {
                                id: target.name.clone(),
                            }
                        } else {
                            os_error("RegDeleteValue", e)
                        }
                    })?;
                broadcast_environment_change();
                Ok(ActionOutcome::Requested(format!(
                    "Deleted {} variable {}",
                    target.scope.label().to_lowercase(),
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
