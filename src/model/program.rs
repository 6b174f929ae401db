//! Installed-program records (registry Uninstall entries)

use serde::Serialize;

use crate::actions;
use crate::core::{Action, ManagedEntity, VisualState};

/// One entry under a registry Uninstall key.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramEntry {
    /// Hive-qualified registry subkey, e.g. `HKLM64\{guid}` (identity)
    pub key: String,
    /// DisplayName value
    pub name: String,
    pub version: Option<String>,
    pub publisher: Option<String>,
    /// InstallDate as recorded, typically `yyyymmdd`
    pub install_date: Option<String>,
    pub install_location: Option<String>,
    /// Command line recorded by the installer for removal
    pub uninstall_command: Option<String>,
    /// EstimatedSize value, in kilobytes
    pub estimated_size_kb: Option<u32>,
}

impl ManagedEntity for ProgramEntry {
    type Key = String;

    fn key(&self) -> String {
        self.key.clone()
    }

    fn id(&self) -> String {
        self.key.clone()
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Version", "Publisher", "Size (MB)", "Installed"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.version.clone().unwrap_or_default(),
            self.publisher.clone().unwrap_or_default(),
            self.estimated_size_kb
                .map(|kb| format!("{:.1}", kb as f64 / 1024.0))
                .unwrap_or_default(),
            self.install_date.clone().unwrap_or_default(),
        ]
    }

    fn visual_state(&self) -> VisualState {
        VisualState::Neutral
    }

    fn eligible_actions(&self) -> Vec<Action> {
        actions::program::eligible(self)
    }

    fn catalog() -> &'static [Action] {
        &actions::program::CATALOG
    }
}
