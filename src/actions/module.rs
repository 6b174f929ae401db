//! Loaded-module eligibility (state-independent)

use crate::core::{Action, Verb};
use crate::model::ModuleEntry;

pub const OPEN_LOCATION: Action = Action::new(
    Verb::OpenFileLocation,
    "Open File Location",
    "Reveal the image in Explorer",
);

pub const CATALOG: [Action; 1] = [OPEN_LOCATION];

pub fn eligible(_module: &ModuleEntry) -> Vec<Action> {
    CATALOG.to_vec()
}
