//! Per-kind action factories
//!
//! One module per inventory kind. Each exposes `eligible(entity)` — the
//! pure mapping from a snapshot state to the actions that apply right now —
//! and `CATALOG`, the complete state-independent verb surface used by the
//! console front-end for discovery. The common export actions live in
//! [`crate::core::EXPORT_ACTIONS`] and are appended by the controller, not
//! by the factories.

pub mod connection;
pub mod env_var;
pub mod module;
pub mod process;
pub mod program;
pub mod service;
pub mod task;
pub mod window;
