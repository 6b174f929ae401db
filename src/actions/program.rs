//! Installed-program eligibility
//!
//! Uninstall is always offered and fails at execution time when the
//! installer recorded no removal command. Open Install Location is only
//! offered when a location was recorded.

use crate::core::{Action, Verb};
use crate::model::ProgramEntry;

pub const UNINSTALL: Action = Action::new(
    Verb::UninstallProgram,
    "Uninstall",
    "Run the program's uninstaller",
);
pub const OPEN_LOCATION: Action = Action::new(
    Verb::OpenInstallLocation,
    "Open Install Location",
    "Open the install folder in Explorer",
);

pub const CATALOG: [Action; 2] = [UNINSTALL, OPEN_LOCATION];

pub fn eligible(program: &ProgramEntry) -> Vec<Action> {
    let mut actions = vec![UNINSTALL];
    if program.install_location.is_some() {
        actions.push(OPEN_LOCATION);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(location: Option<&str>) -> ProgramEntry {
        ProgramEntry {
            key: "HKLM64\\TestApp".into(),
            name: "Test App".into(),
            version: None,
            publisher: None,
            install_date: None,
            install_location: location.map(String::from),
            uninstall_command: None,
            estimated_size_kb: None,
        }
    }

    #[test]
    fn open_location_needs_a_recorded_location() {
        let with = eligible(&program(Some("C:\\Apps\\Test")));
        assert!(with.contains(&OPEN_LOCATION));

        let without = eligible(&program(None));
        assert!(!without.contains(&OPEN_LOCATION));
        // Uninstall stays offered; a missing command fails at execution.
        assert!(without.contains(&UNINSTALL));
    }
}
