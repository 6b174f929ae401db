//! Service/driver eligibility
//!
//! The run-state machine: Start only from Stopped; Stop from Running or
//! Paused when the service accepts STOP; Pause/Resume gated on the
//! PAUSE_CONTINUE control and the matching state. Delete and the three
//! startup-type changes mutate configuration, not runtime state, and are
//! always offered (the OS may still refuse them at execution time).

use crate::core::{Action, Verb};
use crate::model::{ServiceEntry, ServiceState, ACCEPT_PAUSE_CONTINUE, ACCEPT_STOP};

pub const START: Action = Action::new(Verb::StartService, "Start", "Start the service");
pub const STOP: Action = Action::new(Verb::StopService, "Stop", "Stop the service");
pub const PAUSE: Action = Action::new(Verb::PauseService, "Pause", "Pause the service");
pub const RESUME: Action = Action::new(Verb::ResumeService, "Resume", "Resume the paused service");
pub const DELETE: Action = Action::new(
    Verb::DeleteService,
    "Delete",
    "Remove the service from the SCM database",
);
pub const SET_AUTO: Action = Action::new(
    Verb::SetStartupAuto,
    "Set Startup: Auto",
    "Start the service automatically at boot",
);
pub const SET_MANUAL: Action = Action::new(
    Verb::SetStartupManual,
    "Set Startup: Manual",
    "Start the service on demand only",
);
pub const SET_DISABLED: Action = Action::new(
    Verb::SetStartupDisabled,
    "Set Startup: Disabled",
    "Prevent the service from starting",
);

pub const CATALOG: [Action; 8] = [
    START,
    STOP,
    PAUSE,
    RESUME,
    DELETE,
    SET_AUTO,
    SET_MANUAL,
    SET_DISABLED,
];

/// Actions applicable to the service's current snapshot, in menu order.
pub fn eligible(service: &ServiceEntry) -> Vec<Action> {
    let mut actions = Vec::new();
    let controls = service.accepted_controls;

    if service.state == ServiceState::Stopped {
        actions.push(START);
    }
    if matches!(service.state, ServiceState::Running | ServiceState::Paused)
        && controls & ACCEPT_STOP != 0
    {
        actions.push(STOP);
    }
    if service.state == ServiceState::Running && controls & ACCEPT_PAUSE_CONTINUE != 0 {
        actions.push(PAUSE);
    }
    if service.state == ServiceState::Paused && controls & ACCEPT_PAUSE_CONTINUE != 0 {
        actions.push(RESUME);
    }

    actions.push(DELETE);
    actions.push(SET_AUTO);
    actions.push(SET_MANUAL);
    actions.push(SET_DISABLED);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StartupType;

    fn service(state: ServiceState, controls: u32) -> ServiceEntry {
        ServiceEntry {
            name: "Spooler".into(),
            display_name: "Print Spooler".into(),
            state,
            accepted_controls: controls,
            startup: Some(StartupType::Automatic),
            is_driver: false,
            pid: None,
        }
    }

    fn verbs(state: ServiceState, controls: u32) -> Vec<Verb> {
        eligible(&service(state, controls))
            .iter()
            .map(|a| a.verb)
            .collect()
    }

    #[test]
    fn start_only_from_stopped() {
        for state in [
            ServiceState::Stopped,
            ServiceState::Running,
            ServiceState::Paused,
            ServiceState::StartPending,
            ServiceState::StopPending,
            ServiceState::ContinuePending,
            ServiceState::PausePending,
        ] {
            let offered = verbs(state, ACCEPT_STOP).contains(&Verb::StartService);
            assert_eq!(offered, state == ServiceState::Stopped, "{:?}", state);
        }
    }

    #[test]
    fn stop_requires_state_and_accepted_control() {
        assert!(verbs(ServiceState::Running, ACCEPT_STOP).contains(&Verb::StopService));
        assert!(verbs(ServiceState::Paused, ACCEPT_STOP).contains(&Verb::StopService));
        // Right state, missing control
        assert!(!verbs(ServiceState::Running, 0).contains(&Verb::StopService));
        // Right control, wrong state
        assert!(!verbs(ServiceState::Stopped, ACCEPT_STOP).contains(&Verb::StopService));
        assert!(!verbs(ServiceState::StopPending, ACCEPT_STOP).contains(&Verb::StopService));
    }

    #[test]
    fn pause_and_resume_follow_the_pause_continue_control() {
        assert!(verbs(ServiceState::Running, ACCEPT_PAUSE_CONTINUE).contains(&Verb::PauseService));
        assert!(!verbs(ServiceState::Running, ACCEPT_PAUSE_CONTINUE).contains(&Verb::ResumeService));
        assert!(verbs(ServiceState::Paused, ACCEPT_PAUSE_CONTINUE).contains(&Verb::ResumeService));
        assert!(!verbs(ServiceState::Paused, ACCEPT_PAUSE_CONTINUE).contains(&Verb::PauseService));
        assert!(!verbs(ServiceState::Running, ACCEPT_STOP).contains(&Verb::PauseService));
        assert!(!verbs(ServiceState::Paused, ACCEPT_STOP).contains(&Verb::ResumeService));
    }

    #[test]
    fn pending_states_offer_no_runtime_transitions() {
        for state in [
            ServiceState::StartPending,
            ServiceState::StopPending,
            ServiceState::ContinuePending,
            ServiceState::PausePending,
        ] {
            let offered = verbs(state, ACCEPT_STOP | ACCEPT_PAUSE_CONTINUE);
            assert!(!offered.contains(&Verb::StartService), "{:?}", state);
            assert!(!offered.contains(&Verb::StopService), "{:?}", state);
            assert!(!offered.contains(&Verb::PauseService), "{:?}", state);
            assert!(!offered.contains(&Verb::ResumeService), "{:?}", state);
        }
    }

    #[test]
    fn configuration_actions_are_always_offered() {
        for state in [
            ServiceState::Stopped,
            ServiceState::Running,
            ServiceState::StopPending,
        ] {
            let offered = verbs(state, 0);
            assert!(offered.contains(&Verb::DeleteService));
            assert!(offered.contains(&Verb::SetStartupAuto));
            assert!(offered.contains(&Verb::SetStartupManual));
            assert!(offered.contains(&Verb::SetStartupDisabled));
        }
    }

    #[test]
    fn stopped_spooler_scenario() {
        let offered = verbs(ServiceState::Stopped, ACCEPT_STOP | ACCEPT_PAUSE_CONTINUE);
        assert_eq!(
            offered,
            vec![
                Verb::StartService,
                Verb::DeleteService,
                Verb::SetStartupAuto,
                Verb::SetStartupManual,
                Verb::SetStartupDisabled,
            ]
        );
    }
}
