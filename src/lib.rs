//! Windows system inventories with a state-driven action framework.
//!
//! The crate splits into a portable core and a Win32 shell:
//!
//! - [`core`] holds the entity container, the action descriptors and the
//!   generic data controller. It never touches the OS; enumeration and
//!   mutation are injected, so this layer builds and tests on any target.
//! - [`model`] defines one typed record per inventory kind (service,
//!   process, module, connection, scheduled task, installed program,
//!   environment variable, window).
//! - [`actions`] maps each record's snapshot state to the set of operations
//!   that apply to it right now, plus the full static catalog per kind.
//! - [`export`] provides the JSON/text exporters and their registry.
//! - `system` and `ffi` (Windows only) wrap the raw Win32 calls that feed
//!   and mutate the inventories.

pub mod actions;
pub mod constants;
pub mod core;
pub mod export;
pub mod model;

#[cfg(windows)]
pub mod app;
#[cfg(windows)]
pub mod console;
#[cfg(windows)]
pub mod ffi;
#[cfg(windows)]
pub mod system;
#[cfg(windows)]
pub mod ui;
