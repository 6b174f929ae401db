//! The data-controller / action framework
//!
//! This layer is portable: OS enumeration and mutation are injected through
//! the [`Provider`] and [`Executor`] traits, so the whole framework builds
//! and tests without a live Windows system.

mod action;
mod container;
mod controller;
mod entity;
mod error;

pub use action::{Action, ActionOutcome, Verb, EXPORT_ACTIONS};
pub use container::EntityContainer;
pub use controller::{DataController, EntityKind, Executor, Inventory, Provider, RefreshMode};
pub use entity::{ManagedEntity, VisualState};
pub use error::{ActionError, RefreshError};
