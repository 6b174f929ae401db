//! Window eligibility (state-independent)

use crate::core::{Action, Verb};
use crate::model::WindowEntry;

pub const CLOSE: Action = Action::new(Verb::CloseWindow, "Close", "Ask the window to close");
pub const BRING_TO_FRONT: Action = Action::new(
    Verb::BringToFront,
    "Bring To Front",
    "Restore and focus the window",
);
pub const MINIMIZE: Action = Action::new(Verb::MinimizeWindow, "Minimize", "Minimize the window");

pub const CATALOG: [Action; 3] = [CLOSE, BRING_TO_FRONT, MINIMIZE];

pub fn eligible(_window: &WindowEntry) -> Vec<Action> {
    CATALOG.to_vec()
}
