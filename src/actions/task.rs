//! Scheduled-task eligibility
//!
//! Run and End are mutually exclusive on the running flag; Enable and
//! Disable are mutually exclusive on the enabled flag. The two pairs are
//! independent of each other.

use crate::core::{Action, Verb};
use crate::model::TaskEntry;

pub const RUN: Action = Action::new(Verb::RunTask, "Run", "Start the task now");
pub const END: Action = Action::new(Verb::EndTask, "End", "Stop the running task instance");
pub const ENABLE: Action = Action::new(Verb::EnableTask, "Enable", "Allow the task to be triggered");
pub const DISABLE: Action = Action::new(
    Verb::DisableTask,
    "Disable",
    "Prevent the task from being triggered",
);

pub const CATALOG: [Action; 4] = [RUN, END, ENABLE, DISABLE];

pub fn eligible(task: &TaskEntry) -> Vec<Action> {
    let mut actions = Vec::new();
    if task.running {
        actions.push(END);
    } else {
        actions.push(RUN);
    }
    if task.enabled {
        actions.push(DISABLE);
    } else {
        actions.push(ENABLE);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(enabled: bool, running: bool) -> TaskEntry {
        TaskEntry {
            path: "\\Maintenance\\Cleanup".into(),
            name: "Cleanup".into(),
            enabled,
            running,
            status: "Ready".into(),
            last_run: None,
            next_run: None,
            last_result: None,
        }
    }

    #[test]
    fn run_and_end_are_mutually_exclusive_on_running() {
        for enabled in [false, true] {
            let idle: Vec<Verb> = eligible(&task(enabled, false)).iter().map(|a| a.verb).collect();
            assert!(idle.contains(&Verb::RunTask) && !idle.contains(&Verb::EndTask));

            let running: Vec<Verb> =
                eligible(&task(enabled, true)).iter().map(|a| a.verb).collect();
            assert!(running.contains(&Verb::EndTask) && !running.contains(&Verb::RunTask));
        }
    }

    #[test]
    fn enable_and_disable_are_mutually_exclusive_on_enabled() {
        for running in [false, true] {
            let enabled: Vec<Verb> =
                eligible(&task(true, running)).iter().map(|a| a.verb).collect();
            assert!(enabled.contains(&Verb::DisableTask) && !enabled.contains(&Verb::EnableTask));

            let disabled: Vec<Verb> =
                eligible(&task(false, running)).iter().map(|a| a.verb).collect();
            assert!(disabled.contains(&Verb::EnableTask) && !disabled.contains(&Verb::DisableTask));
        }
    }
}
