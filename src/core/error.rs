//! Error taxonomy for refresh and action execution
//!
//! Refresh failures and action failures are kept apart, and the action
//! failures distinguish the cases the front-ends react to differently:
//! an ineligible action, a vanished target, and an OS rejection. None of
//! these are retried by the core; retry is a user-initiated re-invocation.

use thiserror::Error;

/// Whole-subsystem enumeration failure. Per-entity failures never surface
/// here; they degrade the individual record instead.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("failed to enumerate {kind}: {reason}")]
    Enumerate {
        /// Inventory kind being refreshed
        kind: &'static str,
        /// OS-provided reason where available
        reason: String,
    },
}

/// Action execution failure.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The action exists in the catalog but does not apply to the entity's
    /// current snapshot state. Reachable through the enumeration-only
    /// catalog path, which bypasses eligibility by design.
    #[error("'{action}' is not applicable to the current state of {target}")]
    NotApplicable {
        action: &'static str,
        target: String,
    },

    /// The target entity no longer exists (stale snapshot or OS-side
    /// removal between refresh and execution).
    #[error("target '{id}' no longer exists")]
    TargetVanished { id: String },

    /// An entity-bound verb was invoked without a target.
    #[error("'{action}' requires a target entity")]
    MissingTarget { action: &'static str },

    /// A file-export verb was invoked without an output path. The
    /// front-ends treat a cancelled destination prompt as a silent no-op
    /// and never reach this; it guards the scriptable path.
    #[error("'{action}' requires an output path")]
    MissingDestination { action: &'static str },

    /// No exporter registered under the requested format name.
    #[error("no exporter registered for format '{0}'")]
    UnknownFormat(String),

    /// The OS rejected the request (access denied, busy, invalid
    /// transition). Carries the OS-provided reason where available.
    #[error("{operation} failed: {reason}")]
    Os {
        operation: &'static str,
        reason: String,
    },

    /// Rendering the export payload failed.
    #[error(transparent)]
    Export(#[from] crate::export::ExportError),

    /// Writing the export file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ActionError {
    /// Console exit code for this failure class. Zero is reserved for
    /// success; distinct codes let scripts tell an eligibility violation
    /// from a vanished target or an OS rejection.
    pub fn exit_code(&self) -> i32 {
        match self {
            ActionError::NotApplicable { .. } => 3,
            ActionError::TargetVanished { .. } => 4,
            ActionError::Os { .. } => 5,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_class() {
        let not_applicable = ActionError::NotApplicable {
            action: "Start",
            target: "Spooler".into(),
        };
        let vanished = ActionError::TargetVanished { id: "1234".into() };
        let os = ActionError::Os {
            operation: "StartService",
            reason: "access denied".into(),
        };
        assert_eq!(not_applicable.exit_code(), 3);
        assert_eq!(vanished.exit_code(), 4);
        assert_eq!(os.exit_code(), 5);
        assert_eq!(
            ActionError::UnknownFormat("XML".into()).exit_code(),
            1
        );
    }

    #[test]
    fn messages_name_the_failure() {
        let err = ActionError::NotApplicable {
            action: "Stop",
            target: "Spooler".into(),
        };
        assert!(err.to_string().contains("not applicable"));
        assert!(err.to_string().contains("Spooler"));
    }
}
