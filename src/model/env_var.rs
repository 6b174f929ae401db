//! Environment-variable records

use serde::Serialize;

use crate::actions;
use crate::core::{Action, ManagedEntity, VisualState};

/// Which registry hive a variable is defined in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VarScope {
    /// Current user (HKCU\Environment)
    User,
    /// System-wide (Session Manager\Environment)
    Machine,
}

impl VarScope {
    pub fn label(self) -> &'static str {
        match self {
            VarScope::User => "User",
            VarScope::Machine => "Machine",
        }
    }
}

/// One persisted environment variable. Identity is scope + name: the same
/// name may exist in both scopes.
#[derive(Debug, Clone, Serialize)]
pub struct EnvVarEntry {
    pub scope: VarScope,
    pub name: String,
    pub value: String,
}

impl ManagedEntity for EnvVarEntry {
    type Key = (VarScope, String);

    fn key(&self) -> (VarScope, String) {
        (self.scope, self.name.clone())
    }

    fn id(&self) -> String {
        format!("{}:{}", self.scope.label().to_lowercase(), self.name)
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn columns() -> &'static [&'static str] {
        &["Scope", "Name", "Value"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.scope.label().to_string(),
            self.name.clone(),
            self.value.clone(),
        ]
    }

    fn visual_state(&self) -> VisualState {
        VisualState::Neutral
    }

    fn eligible_actions(&self) -> Vec<Action> {
        actions::env_var::eligible(self)
    }

    fn catalog() -> &'static [Action] {
        &actions::env_var::CATALOG
    }
}
