//! User interface rendering
//!
//! This module provides all terminal UI rendering functionality:
//! - `render` - Main rendering entry point (tabs, table, footer)
//! - `menu` - Action menu and filename prompt overlays
//! - `help` - Help overlay

mod help;
mod menu;
mod render;

pub use render::render;
