//! Action descriptors
//!
//! Every operation the tool can perform is identified by a [`Verb`] and
//! described by an [`Action`]: an immutable, comparable descriptor carrying
//! the display name and a one-line description. Descriptors are plain `Copy`
//! values handed out from static catalogs, so there is never a question of
//! who owns an action object.

/// Identifies one operation across all inventory kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    // Services and drivers
    StartService,
    StopService,
    PauseService,
    ResumeService,
    DeleteService,
    SetStartupAuto,
    SetStartupManual,
    SetStartupDisabled,

    // Processes
    TerminateProcess,
    OpenFileLocation,

    // Connections
    CloseConnection,

    // Scheduled tasks
    RunTask,
    EndTask,
    EnableTask,
    DisableTask,

    // Installed programs
    UninstallProgram,
    OpenInstallLocation,

    // Environment variables
    DeleteVariable,

    // Windows
    CloseWindow,
    BringToFront,
    MinimizeWindow,

    // Common export actions, appended to every inventory
    ExportJsonFile,
    ExportTextFile,
    CopyJson,
    CopyText,
}

impl Verb {
    /// Exporter format name for export/copy verbs, `None` for OS mutations.
    pub fn export_format(self) -> Option<&'static str> {
        match self {
            Verb::ExportJsonFile | Verb::CopyJson => Some("JSON"),
            Verb::ExportTextFile | Verb::CopyText => Some("Text"),
            _ => None,
        }
    }

    /// Returns true for the common export/copy verbs.
    pub fn is_export(self) -> bool {
        self.export_format().is_some()
    }

    /// Returns true for export verbs that write to a file (as opposed to
    /// rendering a clipboard payload).
    pub fn writes_file(self) -> bool {
        matches!(self, Verb::ExportJsonFile | Verb::ExportTextFile)
    }
}

/// An immutable description of one executable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    /// Operation identity
    pub verb: Verb,
    /// Display name shown in the action menu
    pub name: &'static str,
    /// One-line description for catalogs and help
    pub description: &'static str,
}

impl Action {
    /// Creates an action descriptor (const-friendly for static catalogs).
    pub const fn new(verb: Verb, name: &'static str, description: &'static str) -> Self {
        Self {
            verb,
            name,
            description,
        }
    }

    /// Stable lowercase identifier used by the console front-end to select
    /// an action by name, e.g. "Set Startup: Auto" -> "set-startup-auto".
    pub fn slug(&self) -> String {
        self.name
            .chars()
            .filter_map(|c| match c {
                ' ' => Some('-'),
                c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
                _ => None,
            })
            .collect()
    }
}

/// The common export actions appended to every inventory's action list and
/// catalog, regardless of entity kind.
pub const EXPORT_ACTIONS: [Action; 4] = [
    Action::new(
        Verb::ExportJsonFile,
        "Export to JSON File",
        "Write the entries to a JSON file",
    ),
    Action::new(
        Verb::ExportTextFile,
        "Export to Text File",
        "Write the entries to an aligned text file",
    ),
    Action::new(
        Verb::CopyJson,
        "Copy as JSON",
        "Copy the entries to the clipboard as JSON",
    ),
    Action::new(
        Verb::CopyText,
        "Copy as Text",
        "Copy the entries to the clipboard as text",
    ),
];

/// What an executed action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The OS accepted the request; the message describes what was asked.
    /// The resulting state is observed by the next refresh.
    Requested(String),

    /// Entities were written to a file.
    Exported {
        /// Destination path as given by the caller
        path: String,
        /// Number of exported records
        count: usize,
    },

    /// Entities were rendered for the clipboard; the front-end owns placing
    /// the payload on the OS clipboard.
    Clipboard {
        /// Rendered export payload
        payload: String,
        /// Number of rendered records
        count: usize,
    },
}

impl ActionOutcome {
    /// Short human-readable summary for the message line.
    pub fn summary(&self) -> String {
        match self {
            ActionOutcome::Requested(msg) => msg.clone(),
            ActionOutcome::Exported { path, count } => {
                format!("Exported {} entries to {}", count, path)
            }
            ActionOutcome::Clipboard { count, .. } => {
                format!("Copied {} entries to clipboard", count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_dashes() {
        let a = Action::new(Verb::SetStartupAuto, "Set Startup: Auto", "x");
        assert_eq!(a.slug(), "set-startup-auto");
    }

    #[test]
    fn export_verbs_carry_format() {
        assert_eq!(Verb::ExportJsonFile.export_format(), Some("JSON"));
        assert_eq!(Verb::CopyText.export_format(), Some("Text"));
        assert_eq!(Verb::StartService.export_format(), None);
        assert!(Verb::CopyJson.is_export());
        assert!(!Verb::CopyJson.writes_file());
        assert!(Verb::ExportTextFile.writes_file());
    }
}
