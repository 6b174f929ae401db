//! Application state and logic for the interactive front-end
//!
//! One tab per inventory. Each tab keeps its own selection, scroll offset
//! and filter so switching tabs never loses context. All OS access goes
//! through the [`Inventory`] trait objects built by [`build_inventories`].

use std::path::Path;
use std::rc::Rc;

use crate::constants::{DEFAULT_REFRESH_MS, MAX_REFRESH_MS, MIN_REFRESH_MS};
use crate::core::{
    Action, ActionOutcome, DataController, EntityKind, Inventory, RefreshMode, Verb,
};
use crate::export::ExporterRegistry;
use crate::system::clipboard::set_clipboard_text;
use crate::system::connections::{ConnectionExecutor, ConnectionProvider};
use crate::system::env_vars::{EnvVarExecutor, EnvVarProvider};
use crate::system::modules::{ModuleExecutor, ModuleProvider};
use crate::system::processes::{ProcessExecutor, ProcessProvider};
use crate::system::programs::{ProgramExecutor, ProgramProvider};
use crate::system::services::{ServiceExecutor, ServiceProvider};
use crate::system::tasks::{TaskExecutor, TaskProvider};
use crate::system::windows_list::{WindowExecutor, WindowProvider};

/// Builds the full set of inventories in tab order. Shared by the
/// interactive and console front-ends.
pub fn build_inventories() -> Vec<Box<dyn Inventory>> {
    let exporters = Rc::new(ExporterRegistry::with_defaults());
    vec![
        Box::new(DataController::new(
            EntityKind::Service,
            "Services",
            Box::new(ServiceProvider),
            Box::new(ServiceExecutor),
            exporters.clone(),
        )
        .with_filter(|s| !s.is_driver)),
        Box::new(
            DataController::new(
                EntityKind::Driver,
                "Drivers",
                Box::new(ServiceProvider),
                Box::new(ServiceExecutor),
                exporters.clone(),
            )
            .with_filter(|s| s.is_driver),
        ),
        Box::new(DataController::new(
            EntityKind::Process,
            "Processes",
            Box::new(ProcessProvider),
            Box::new(ProcessExecutor),
            exporters.clone(),
        )),
        Box::new(DataController::new(
            EntityKind::Module,
            "Modules",
            Box::new(ModuleProvider),
            Box::new(ModuleExecutor),
            exporters.clone(),
        )),
        Box::new(DataController::new(
            EntityKind::Connection,
            "Connections",
            Box::new(ConnectionProvider),
            Box::new(ConnectionExecutor),
            exporters.clone(),
        )),
        Box::new(DataController::new(
            EntityKind::ScheduledTask,
            "Scheduled Tasks",
            Box::new(TaskProvider),
            Box::new(TaskExecutor),
            exporters.clone(),
        )),
        Box::new(DataController::new(
            EntityKind::InstalledProgram,
            "Programs",
            Box::new(ProgramProvider),
            Box::new(ProgramExecutor),
            exporters.clone(),
        )),
        Box::new(DataController::new(
            EntityKind::EnvironmentVariable,
            "Environment",
            Box::new(EnvVarProvider),
            Box::new(EnvVarExecutor),
            exporters.clone(),
        )),
        Box::new(DataController::new(
            EntityKind::Window,
            "Windows",
            Box::new(WindowProvider),
            Box::new(WindowExecutor),
            exporters,
        )),
    ]
}

/// Input mode of the interactive front-end.
pub enum Mode {
    Normal,
    /// Editing the current tab's filter string
    Filter,
    /// Choosing from the selected entity's action menu
    ActionMenu { actions: Vec<Action>, selected: usize },
    /// Entering a destination path for a file-export action
    FilenamePrompt { verb: Verb, input: String },
    Help,
}

/// Per-tab view state.
pub struct TabState {
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub filter: String,
    /// Container indexes of rows passing the filter, in container order
    pub visible: Vec<usize>,
}

impl TabState {
    fn new() -> Self {
        Self {
            selected_index: 0,
            scroll_offset: 0,
            filter: String::new(),
            visible: Vec::new(),
        }
    }
}

/// Application state.
pub struct App {
    pub inventories: Vec<Box<dyn Inventory>>,
    pub tabs: Vec<TabState>,
    pub active_tab: usize,
    pub mode: Mode,
    /// Status/error line content
    pub message: Option<String>,
    pub refresh_interval_ms: u64,
}

impl App {
    pub fn new(inventories: Vec<Box<dyn Inventory>>) -> Self {
        let tabs = (0..inventories.len()).map(|_| TabState::new()).collect();
        Self {
            inventories,
            tabs,
            active_tab: 0,
            mode: Mode::Normal,
            message: None,
            refresh_interval_ms: DEFAULT_REFRESH_MS,
        }
    }

    pub fn active_inventory(&self) -> &dyn Inventory {
        self.inventories[self.active_tab].as_ref()
    }

    pub fn active_tab_state(&self) -> &TabState {
        &self.tabs[self.active_tab]
    }

    /// Refreshes the active tab. Enumeration failure is reported on the
    /// message line; the last good snapshot stays on screen.
    pub fn refresh_active(&mut self, mode: RefreshMode) {
        if let Err(e) = self.inventories[self.active_tab].refresh(mode) {
            self.message = Some(e.to_string());
        }
        self.rebuild_visible();
    }

    /// Recomputes the filtered row set and clamps the selection.
    pub fn rebuild_visible(&mut self) {
        let inventory = self.inventories[self.active_tab].as_ref();
        let tab = &mut self.tabs[self.active_tab];
        let needle = tab.filter.to_lowercase();
        tab.visible = (0..inventory.len())
            .filter(|&i| {
                needle.is_empty()
                    || inventory
                        .row(i)
                        .map(|cells| cells.iter().any(|c| c.to_lowercase().contains(&needle)))
                        .unwrap_or(false)
            })
            .collect();
        if tab.selected_index >= tab.visible.len() {
            tab.selected_index = tab.visible.len().saturating_sub(1);
        }
    }

    /// Container index of the selected row, if any row is selected.
    pub fn selected_container_index(&self) -> Option<usize> {
        let tab = self.active_tab_state();
        tab.visible.get(tab.selected_index).copied()
    }

    pub fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.inventories.len();
        self.refresh_active(RefreshMode::Full);
    }

    pub fn previous_tab(&mut self) {
        self.active_tab = (self.active_tab + self.inventories.len() - 1) % self.inventories.len();
        self.refresh_active(RefreshMode::Full);
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.inventories.len() {
            self.active_tab = index;
            self.refresh_active(RefreshMode::Full);
        }
    }

    /// Opens the action menu for the selected entity.
    pub fn open_action_menu(&mut self) {
        let Some(index) = self.selected_container_index() else {
            return;
        };
        let actions = self.inventories[self.active_tab].actions(index);
        if !actions.is_empty() {
            self.mode = Mode::ActionMenu {
                actions,
                selected: 0,
            };
        }
    }

    /// Runs the action currently highlighted in the menu. File exports
    /// detour through the filename prompt first.
    pub fn confirm_menu_action(&mut self) {
        let Mode::ActionMenu { actions, selected } = &self.mode else {
            return;
        };
        let action = actions[*selected];
        if action.verb.writes_file() {
            self.mode = Mode::FilenamePrompt {
                verb: action.verb,
                input: String::new(),
            };
            return;
        }
        self.mode = Mode::Normal;
        self.run_verb(action.verb, None);
    }

    /// Submits the filename prompt. An empty input cancels silently.
    pub fn confirm_filename(&mut self) {
        let Mode::FilenamePrompt { verb, input } = &self.mode else {
            return;
        };
        let verb = *verb;
        let path = input.trim().to_string();
        self.mode = Mode::Normal;
        if path.is_empty() {
            return;
        }
        self.run_verb(verb, Some(path));
    }

    fn run_verb(&mut self, verb: Verb, out: Option<String>) {
        // Export actions cover the whole inventory; everything else needs
        // the selected entity.
        let index = if verb.is_export() {
            None
        } else {
            match self.selected_container_index() {
                Some(i) => Some(i),
                None => return,
            }
        };
        let result = self.inventories[self.active_tab].execute(
            verb,
            index,
            out.as_deref().map(Path::new),
        );
        match result {
            Ok(ActionOutcome::Clipboard { payload, count }) => {
                self.message = Some(match set_clipboard_text(&payload) {
                    Ok(()) => format!("Copied {count} entries to clipboard"),
                    Err(e) => e.to_string(),
                });
            }
            Ok(outcome) => self.message = Some(outcome.summary()),
            Err(e) => self.message = Some(e.to_string()),
        }
        self.refresh_active(RefreshMode::Full);
    }

    pub fn slow_down_refresh(&mut self) {
        self.refresh_interval_ms = (self.refresh_interval_ms * 2).min(MAX_REFRESH_MS);
    }

    pub fn speed_up_refresh(&mut self) {
        self.refresh_interval_ms = (self.refresh_interval_ms / 2).max(MIN_REFRESH_MS);
    }

    pub fn move_up(&mut self) {
        let tab = &mut self.tabs[self.active_tab];
        tab.selected_index = tab.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let tab = &mut self.tabs[self.active_tab];
        if tab.selected_index + 1 < tab.visible.len() {
            tab.selected_index += 1;
        }
    }

    pub fn page_up(&mut self, visible_rows: usize) {
        let tab = &mut self.tabs[self.active_tab];
        tab.selected_index = tab.selected_index.saturating_sub(visible_rows);
    }

    pub fn page_down(&mut self, visible_rows: usize) {
        let tab = &mut self.tabs[self.active_tab];
        tab.selected_index =
            (tab.selected_index + visible_rows).min(tab.visible.len().saturating_sub(1));
    }

    pub fn jump_to_start(&mut self) {
        self.tabs[self.active_tab].selected_index = 0;
    }

    pub fn jump_to_end(&mut self) {
        let tab = &mut self.tabs[self.active_tab];
        tab.selected_index = tab.visible.len().saturating_sub(1);
    }
}
