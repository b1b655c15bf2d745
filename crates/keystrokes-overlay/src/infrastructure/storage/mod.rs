//! Storage infrastructure: settings file persistence.
//!
//! This module provides a thin adapter between the overlay and the file
//! system.  The `settings` sub-module handles:
//!
//! - Reading `keystrokes.json` from the directory the overlay was given.
//! - Writing the current settings, plus the live custom keys, back to disk
//!   when the user closes the settings screen.
//! - Regenerating a default file on first run or when the file is unreadable.

pub mod settings;

pub use settings::{
    settings_dir, CustomKeyEntry, CustomKeySource, KeystrokesSettings, LoadOutcome,
    SettingsDocument, SettingsError, SETTINGS_FILE_NAME,
};
