//! Centralized constants for the application
//!
//! This module contains all magic numbers and configuration constants
//! used throughout the application, making them easy to find and modify.

// ============================================================================
// Application Info
// ============================================================================

/// Application name displayed in the header
pub const DISPLAY_NAME: &str = "Windows System Admin CLI";

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Application version from Cargo.toml
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Refresh Rate (milliseconds)
// ============================================================================

/// Default auto-refresh interval in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 2000;

/// Minimum allowed refresh interval
pub const MIN_REFRESH_MS: u64 = 250;

/// Maximum allowed refresh interval
pub const MAX_REFRESH_MS: u64 = 10000;

// ============================================================================
// Navigation
// ============================================================================

/// Lines subtracted from terminal height to calculate visible rows
/// (accounts for header, tab bar, column header and footer)
pub const VISIBLE_ROWS_OVERHEAD: usize = 6;

// ============================================================================
// Byte Size Conversions
// ============================================================================

/// Bytes in a kilobyte
pub const BYTES_PER_KB: f64 = 1024.0;

/// Bytes in a megabyte
pub const BYTES_PER_MB: f64 = 1_048_576.0;

// ============================================================================
// UI Dialog Dimensions
// ============================================================================

/// Width of the action menu dialog box
pub const ACTION_MENU_WIDTH: usize = 46;

/// Width of the help dialog box
pub const HELP_DIALOG_WIDTH: usize = 52;

/// Minimum margin from screen edge for dialogs
pub const DIALOG_MARGIN: usize = 4;
