//! Typed records for each inventory kind
//!
//! Each record is a snapshot: identity, kind-specific state, and display
//! attributes. The `ManagedEntity` impls delegate eligibility to the
//! matching factory in [`crate::actions`].

mod connection;
mod env_var;
mod module;
mod process;
mod program;
mod service;
mod task;
mod window;

pub use connection::{ConnectionEntry, Protocol, TcpState};
pub use env_var::{EnvVarEntry, VarScope};
pub use module::ModuleEntry;
pub use process::ProcessEntry;
pub use program::ProgramEntry;
pub use service::{ServiceEntry, ServiceState, StartupType, ACCEPT_PAUSE_CONTINUE, ACCEPT_STOP};
pub use task::TaskEntry;
pub use window::WindowEntry;
