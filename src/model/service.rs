//! Service records (shared by the service and driver inventories)

use serde::Serialize;

use crate::actions;
use crate::core::{Action, ManagedEntity, VisualState};

/// SERVICE_ACCEPT_STOP bit in the accepted-controls mask
pub const ACCEPT_STOP: u32 = 0x0000_0001;

/// SERVICE_ACCEPT_PAUSE_CONTINUE bit in the accepted-controls mask
pub const ACCEPT_PAUSE_CONTINUE: u32 = 0x0000_0002;

/// Service run-state as reported by the Service Control Manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
}

impl ServiceState {
    /// Maps a raw SERVICE_STATUS current-state value. Values outside the
    /// documented range are treated as stopped.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => ServiceState::Stopped,
            2 => ServiceState::StartPending,
            3 => ServiceState::StopPending,
            4 => ServiceState::Running,
            5 => ServiceState::ContinuePending,
            6 => ServiceState::PausePending,
            7 => ServiceState::Paused,
            _ => ServiceState::Stopped,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceState::Stopped => "Stopped",
            ServiceState::StartPending => "Start Pending",
            ServiceState::StopPending => "Stop Pending",
            ServiceState::Running => "Running",
            ServiceState::ContinuePending => "Continue Pending",
            ServiceState::PausePending => "Pause Pending",
            ServiceState::Paused => "Paused",
        }
    }

    /// A transition the OS has accepted but not finished.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            ServiceState::StartPending
                | ServiceState::StopPending
                | ServiceState::ContinuePending
                | ServiceState::PausePending
        )
    }
}

/// How the service is configured to start. Configuration, not runtime
/// state: startup changes are always offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StartupType {
    BootStart,
    SystemStart,
    Automatic,
    Manual,
    Disabled,
}

impl StartupType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => StartupType::BootStart,
            1 => StartupType::SystemStart,
            2 => StartupType::Automatic,
            3 => StartupType::Manual,
            _ => StartupType::Disabled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StartupType::BootStart => "Boot",
            StartupType::SystemStart => "System",
            StartupType::Automatic => "Auto",
            StartupType::Manual => "Manual",
            StartupType::Disabled => "Disabled",
        }
    }
}

/// One service or kernel driver registered with the SCM.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEntry {
    /// Key name in the SCM database (stable identity)
    pub name: String,
    /// Friendly display name
    pub display_name: String,
    /// Run-state snapshot
    pub state: ServiceState,
    /// SERVICE_ACCEPT_* bitmask from the last status query
    pub accepted_controls: u32,
    /// Startup configuration; `None` when the config query was denied
    pub startup: Option<StartupType>,
    /// True for kernel/file-system drivers
    pub is_driver: bool,
    /// Hosting process, when running in one
    pub pid: Option<u32>,
}

impl ManagedEntity for ServiceEntry {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn id(&self) -> String {
        self.name.clone()
    }

    fn label(&self) -> String {
        if self.display_name.is_empty() {
            self.name.clone()
        } else {
            self.display_name.clone()
        }
    }

    fn columns() -> &'static [&'static str] {
        &["Name", "Display Name", "State", "Startup", "PID"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.display_name.clone(),
            self.state.label().to_string(),
            self.startup.map(|s| s.label().to_string()).unwrap_or_else(|| "?".to_string()),
            self.pid.map(|p| p.to_string()).unwrap_or_default(),
        ]
    }

    fn visual_state(&self) -> VisualState {
        if self.startup.is_none() {
            return VisualState::Unavailable;
        }
        match self.state {
            ServiceState::Running => VisualState::Active,
            ServiceState::Stopped => VisualState::Inactive,
            ServiceState::Paused => VisualState::Neutral,
            _ => VisualState::Transitional,
        }
    }

    fn eligible_actions(&self) -> Vec<Action> {
        actions::service::eligible(self)
    }

    fn catalog() -> &'static [Action] {
        &actions::service::CATALOG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_state_mapping_defaults_out_of_range_to_stopped() {
        assert_eq!(ServiceState::from_raw(4), ServiceState::Running);
        assert_eq!(ServiceState::from_raw(7), ServiceState::Paused);
        assert_eq!(ServiceState::from_raw(99), ServiceState::Stopped);
    }

    #[test]
    fn degraded_config_shows_unavailable() {
        let svc = ServiceEntry {
            name: "x".into(),
            display_name: String::new(),
            state: ServiceState::Running,
            accepted_controls: 0,
            startup: None,
            is_driver: false,
            pid: None,
        };
        assert_eq!(svc.visual_state(), VisualState::Unavailable);
        assert_eq!(svc.label(), "x");
    }
}
