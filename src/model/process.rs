//! Process records

use serde::Serialize;

use crate::actions;
use crate::constants::BYTES_PER_MB;
use crate::core::{Action, ManagedEntity, VisualState};

/// One running process.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessEntry {
    /// Process ID (stable identity for the process lifetime)
    pub pid: u32,
    /// Parent process ID
    pub parent_pid: u32,
    /// Executable name (e.g. "notepad.exe")
    pub name: String,
    /// Number of threads
    pub thread_count: u32,
    /// Working-set size in bytes
    pub memory_bytes: u64,
    /// Full executable path; `None` when the query failed
    pub path: Option<String>,
    /// True when the details query was denied (record is degraded)
    pub access_denied: bool,
}

impl ManagedEntity for ProcessEntry {
    type Key = u32;

    fn key(&self) -> u32 {
        self.pid
    }

    fn id(&self) -> String {
        self.pid.to_string()
    }

    fn label(&self) -> String {
        format!("{} (PID {})", self.name, self.pid)
    }

    fn columns() -> &'static [&'static str] {
        &["PID", "Name", "Threads", "Memory (MB)", "Path"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.pid.to_string(),
            self.name.clone(),
            self.thread_count.to_string(),
            format!("{:.1}", self.memory_bytes as f64 / BYTES_PER_MB),
            self.path.clone().unwrap_or_default(),
        ]
    }

    fn visual_state(&self) -> VisualState {
        if self.access_denied {
            VisualState::Unavailable
        } else {
            VisualState::Neutral
        }
    }

    fn eligible_actions(&self) -> Vec<Action> {
        actions::process::eligible(self)
    }

    fn catalog() -> &'static [Action] {
        &actions::process::CATALOG
    }
}
