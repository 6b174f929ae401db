//! Top-level window records

use serde::Serialize;

use crate::actions;
use crate::core::{Action, ManagedEntity, VisualState};

/// One top-level window. The handle is stable for the window's lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct WindowEntry {
    /// Raw window handle value
    pub hwnd: isize,
    /// Window title (may be empty)
    pub title: String,
    /// Owning process
    pub pid: u32,
    /// Name of the owning process, when resolvable
    pub process_name: Option<String>,
    pub visible: bool,
    pub minimized: bool,
}

impl WindowEntry {
    fn state_label(&self) -> &'static str {
        if !self.visible {
            "Hidden"
        } else if self.minimized {
            "Minimized"
        } else {
            "Visible"
        }
    }
}

impl ManagedEntity for WindowEntry {
    type Key = isize;

    fn key(&self) -> isize {
        self.hwnd
    }

    fn id(&self) -> String {
        format!("0x{:X}", self.hwnd)
    }

    fn label(&self) -> String {
        if self.title.is_empty() {
            self.id()
        } else {
            self.title.clone()
        }
    }

    fn columns() -> &'static [&'static str] {
        &["Handle", "Title", "PID", "Process", "State"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id(),
            self.title.clone(),
            self.pid.to_string(),
            self.process_name.clone().unwrap_or_default(),
            self.state_label().to_string(),
        ]
    }

    fn visual_state(&self) -> VisualState {
        if !self.visible {
            VisualState::Inactive
        } else if self.minimized {
            VisualState::Neutral
        } else {
            VisualState::Active
        }
    }

    fn eligible_actions(&self) -> Vec<Action> {
        actions::window::eligible(self)
    }

    fn catalog() -> &'static [Action] {
        &actions::window::CATALOG
    }
}
