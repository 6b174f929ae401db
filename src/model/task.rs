//! Scheduled-task records

use serde::Serialize;

use crate::actions;
use crate::core::{Action, ManagedEntity, VisualState};

/// One task registered with the Task Scheduler.
#[derive(Debug, Clone, Serialize)]
pub struct TaskEntry {
    /// Full folder path of the task (stable identity), e.g.
    /// `\Microsoft\Windows\Defrag\ScheduledDefrag`
    pub path: String,
    /// Task name (last path segment)
    pub name: String,
    /// Enabled flag; independent of the running state
    pub enabled: bool,
    /// True while an instance of the task is running
    pub running: bool,
    /// Raw scheduler status text
    pub status: String,
    pub last_run: Option<String>,
    pub next_run: Option<String>,
    /// Exit code of the last run, when one is recorded
    pub last_result: Option<i32>,
}

impl ManagedEntity for TaskEntry {
    type Key = String;

    fn key(&self) -> String {
        self.path.clone()
    }

    fn id(&self) -> String {
        self.path.clone()
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [&'static str] {
        &["Task", "Status", "Enabled", "Last Run", "Next Run"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.path.clone(),
            self.status.clone(),
            if self.enabled { "Yes" } else { "No" }.to_string(),
            self.last_run.clone().unwrap_or_default(),
            self.next_run.clone().unwrap_or_default(),
        ]
    }

    fn visual_state(&self) -> VisualState {
        if self.running {
            VisualState::Active
        } else if !self.enabled {
            VisualState::Inactive
        } else {
            VisualState::Neutral
        }
    }

    fn eligible_actions(&self) -> Vec<Action> {
        actions::task::eligible(self)
    }

    fn catalog() -> &'static [Action] {
        &actions::task::CATALOG
    }
}
