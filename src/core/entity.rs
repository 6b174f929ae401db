//! The contract every inventory record implements
//!
//! A managed entity is a snapshot of one OS object: a stable identity, a
//! kind-specific state, and display attributes. Snapshots are expected to go
//! stale between refreshes; the eligibility factories always work off the
//! snapshot the container currently holds.

use std::hash::Hash;

use serde::Serialize;

use super::action::Action;

/// Presentation-only projection of entity state (row colour/icon severity).
/// Behavioural decisions never read this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    /// Running / established / live
    Active,
    /// Stopped / disabled / hidden
    Inactive,
    /// Pending OS transition; expected to settle by a later refresh
    Transitional,
    /// The record is degraded (e.g. access denied to part of its details)
    Unavailable,
    /// No meaningful state to colour
    Neutral,
}

/// One managed OS object, snapshotted at refresh time.
pub trait ManagedEntity: Clone + Serialize {
    /// Stable identity within one container (PID, service name, etc.)
    type Key: Eq + Hash + Clone;

    /// Identity used for container membership.
    fn key(&self) -> Self::Key;

    /// Identity rendered as a string, as accepted by the console front-end
    /// to address this entity.
    fn id(&self) -> String;

    /// Human-readable name for messages ("Print Spooler", "notepad.exe").
    fn label(&self) -> String;

    /// Column headers for table presentation.
    fn columns() -> &'static [&'static str];

    /// One display cell per column, same order as [`Self::columns`].
    fn row(&self) -> Vec<String>;

    /// Total projection of the current state into a presentation hint.
    fn visual_state(&self) -> VisualState;

    /// The actions applicable to this snapshot state, in menu order.
    /// Delegates to the kind's eligibility factory.
    fn eligible_actions(&self) -> Vec<Action>;

    /// The complete, state-independent action catalog for this kind.
    /// Enumeration only; execution through this surface still validates
    /// eligibility.
    fn catalog() -> &'static [Action];

    /// Fold a freshly enumerated snapshot of the same identity into this
    /// record. Used by auto-refresh, which updates fields in place.
    fn absorb(&mut self, fresh: Self) {
        *self = fresh;
    }
}
