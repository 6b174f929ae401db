//! Loaded-module records

use serde::Serialize;

use crate::actions;
use crate::constants::BYTES_PER_KB;
use crate::core::{Action, ManagedEntity, VisualState};

/// One module (DLL/EXE image) loaded by at least one process. Modules are
/// deduplicated by path across the process set; `ref_count` is the number
/// of processes that have the image mapped.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleEntry {
    /// Full image path (identity, compared case-insensitively)
    pub path: String,
    /// File name of the image
    pub name: String,
    /// Image size in bytes
    pub base_size: u32,
    /// Number of processes the image was seen in
    pub ref_count: u32,
}

impl ManagedEntity for ModuleEntry {
    type Key = String;

    fn key(&self) -> String {
        self.path.to_lowercase()
    }

    fn id(&self) -> String {
        self.path.clone()
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Refs", "Size (KB)", "Path"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.ref_count.to_string(),
            format!("{:.0}", self.base_size as f64 / BYTES_PER_KB),
            self.path.clone(),
        ]
    }

    fn visual_state(&self) -> VisualState {
        VisualState::Neutral
    }

    fn eligible_actions(&self) -> Vec<Action> {
        actions::module::eligible(self)
    }

    fn catalog() -> &'static [Action] {
        &actions::module::CATALOG
    }
}
