//! Environment-variable eligibility (state-independent)

use crate::core::{Action, Verb};
use crate::model::EnvVarEntry;

pub const DELETE: Action = Action::new(
    Verb::DeleteVariable,
    "Delete",
    "Remove the variable from its hive",
);

pub const CATALOG: [Action; 1] = [DELETE];

pub fn eligible(_var: &EnvVarEntry) -> Vec<Action> {
    CATALOG.to_vec()
}
