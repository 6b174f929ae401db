//! Process eligibility
//!
//! State-independent: both actions are always offered. The OS may still
//! reject them (protected process, missing path) — those are failure-time
//! concerns, not eligibility-time ones.

use crate::core::{Action, Verb};
use crate::model::ProcessEntry;

pub const TERMINATE: Action = Action::new(
    Verb::TerminateProcess,
    "Terminate",
    "Forcibly end the process",
);
pub const OPEN_LOCATION: Action = Action::new(
    Verb::OpenFileLocation,
    "Open File Location",
    "Reveal the executable in Explorer",
);

pub const CATALOG: [Action; 2] = [TERMINATE, OPEN_LOCATION];

pub fn eligible(_process: &ProcessEntry) -> Vec<Action> {
    CATALOG.to_vec()
}
