//! JSON-based settings persistence for the keystrokes overlay.
//!
//! Reads and writes `keystrokes.json` inside the directory the overlay was
//! constructed with.  When no directory is supplied, the platform default is
//! used:
//! - Windows:  `%APPDATA%\Keystrokes\keystrokes.json`
//! - Linux:    `~/.config/keystrokes/keystrokes.json`
//! - macOS:    `~/Library/Application Support/Keystrokes/keystrokes.json`
//!
//! # File format
//!
//! A single JSON object.  Every field is optional; a missing field takes the
//! default from [`OverlaySettings::default`], and unknown fields are ignored:
//!
//! ```json
//! {
//!   "x": 0, "y": 0, "leftClick": true,
//!   "red": 255, "green": 255, "blue": 255,
//!   "pressedRed": 0, "pressedGreen": 0, "pressedBlue": 0,
//!   "scale": 1.0, "fadeTime": 1.0,
//!   "enabled": true, "chroma": false, "mouseButtons": false,
//!   "showCPS": false, "showCPSOnButtons": false, "showSpacebar": false,
//!   "showSneak": false, "showFps": false, "keyBackground": true,
//!   "custom": [ { "key": 57, "type": 0, "xOffset": 0, "yOffset": 74 } ]
//! }
//! ```
//!
//! # Failure policy
//!
//! Persistence never fails loudly.  A file that cannot be read or parsed is
//! logged and replaced with defaults; a file that cannot be written is logged
//! and the in-memory settings stay authoritative.  [`KeystrokesSettings::try_save`]
//! is available for callers that want the error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use keystrokes_core::{CustomKeyWrapper, OverlaySettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the settings file inside the settings directory.
pub const SETTINGS_FILE_NAME: &str = "keystrokes.json";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The JSON could not be parsed or produced.
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Document schema ───────────────────────────────────────────────────────────

/// On-disk shape of the settings file.
///
/// Field order here is the order fields are written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsDocument {
    pub x: i32,
    pub y: i32,
    pub left_click: bool,
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub pressed_red: i32,
    pub pressed_green: i32,
    pub pressed_blue: i32,
    pub scale: f64,
    pub fade_time: f64,
    pub enabled: bool,
    pub chroma: bool,
    pub mouse_buttons: bool,
    #[serde(rename = "showCPS")]
    pub show_cps: bool,
    #[serde(rename = "showCPSOnButtons")]
    pub show_cps_on_buttons: bool,
    pub show_spacebar: bool,
    pub show_sneak: bool,
    pub show_fps: bool,
    pub key_background: bool,
    pub custom: Vec<CustomKeyEntry>,
}

/// One element of the `custom` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomKeyEntry {
    pub key: i32,
    #[serde(rename = "type")]
    pub kind: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self::from_parts(&OverlaySettings::default(), &[])
    }
}

impl SettingsDocument {
    /// Builds the document for `settings` plus the given custom keys.
    ///
    /// Clamped values are written as read through their getters.
    pub fn from_parts(settings: &OverlaySettings, keys: &[CustomKeyWrapper]) -> Self {
        Self {
            x: settings.x(),
            y: settings.y(),
            left_click: settings.is_left_click(),
            red: settings.red(),
            green: settings.green(),
            blue: settings.blue(),
            pressed_red: settings.pressed_red(),
            pressed_green: settings.pressed_green(),
            pressed_blue: settings.pressed_blue(),
            scale: settings.scale(),
            fade_time: settings.fade_time(),
            enabled: settings.is_enabled(),
            chroma: settings.is_chroma(),
            mouse_buttons: settings.is_showing_mouse_buttons(),
            show_cps: settings.is_showing_cps(),
            show_cps_on_buttons: settings.is_showing_cps_on_buttons(),
            show_spacebar: settings.is_showing_spacebar(),
            show_sneak: settings.is_showing_sneak(),
            show_fps: settings.is_showing_fps(),
            key_background: settings.is_key_background_enabled(),
            custom: keys.iter().map(CustomKeyEntry::from).collect(),
        }
    }

    /// Splits the document into domain settings and the custom key sequence.
    pub fn into_parts(self) -> (OverlaySettings, Vec<CustomKeyWrapper>) {
        let mut settings = OverlaySettings::default();
        settings.set_x(self.x);
        settings.set_y(self.y);
        settings.set_left_click(self.left_click);
        settings.set_red(self.red);
        settings.set_green(self.green);
        settings.set_blue(self.blue);
        settings.set_pressed_red(self.pressed_red);
        settings.set_pressed_green(self.pressed_green);
        settings.set_pressed_blue(self.pressed_blue);
        settings.set_scale(self.scale);
        settings.set_fade_time(self.fade_time);
        settings.set_enabled(self.enabled);
        settings.set_chroma(self.chroma);
        settings.set_showing_mouse_buttons(self.mouse_buttons);
        settings.set_showing_cps(self.show_cps);
        settings.set_showing_cps_on_buttons(self.show_cps_on_buttons);
        settings.set_showing_spacebar(self.show_spacebar);
        settings.set_showing_sneak(self.show_sneak);
        settings.set_showing_fps(self.show_fps);
        settings.set_key_background_enabled(self.key_background);

        let keys = self
            .custom
            .into_iter()
            .map(|entry| {
                CustomKeyWrapper::from_persisted(entry.key, entry.kind, entry.x_offset, entry.y_offset)
            })
            .collect();
        (settings, keys)
    }
}

impl From<&CustomKeyWrapper> for CustomKeyEntry {
    fn from(wrapper: &CustomKeyWrapper) -> Self {
        Self {
            key: wrapper.key().code(),
            kind: wrapper.key().category().as_raw(),
            x_offset: wrapper.x_offset(),
            y_offset: wrapper.y_offset(),
        }
    }
}

// ── Live custom key source ────────────────────────────────────────────────────

/// Supplies the custom keys that are live at save time.
///
/// The renderer owns the authoritative custom key list; the settings store
/// only asks for a snapshot when it writes.
#[cfg_attr(test, mockall::automock)]
pub trait CustomKeySource {
    fn live_custom_keys(&self) -> Vec<CustomKeyWrapper>;
}

impl CustomKeySource for Vec<CustomKeyWrapper> {
    fn live_custom_keys(&self) -> Vec<CustomKeyWrapper> {
        self.clone()
    }
}

// ── Settings store ────────────────────────────────────────────────────────────

/// What [`KeystrokesSettings::load`] found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was parsed and applied.
    Loaded,
    /// The file was missing or empty; defaults were written.
    CreatedDefaults,
    /// The file could not be read or parsed; defaults were written over it.
    RecoveredDefaults,
}

/// The overlay's settings plus the file they persist to.
#[derive(Debug)]
pub struct KeystrokesSettings {
    config_file: PathBuf,
    settings: OverlaySettings,
    config_wrappers: Vec<CustomKeyWrapper>,
}

impl KeystrokesSettings {
    /// Creates a store backed by `directory/keystrokes.json`, holding defaults.
    ///
    /// The directory is created if it does not exist.  A failure to create it
    /// is only logged; the following save will report it again.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        if let Err(e) = fs::create_dir_all(&directory) {
            warn!(
                "could not create settings directory {}: {e}",
                directory.display()
            );
        }
        Self {
            config_file: directory.join(SETTINGS_FILE_NAME),
            settings: OverlaySettings::default(),
            config_wrappers: Vec::new(),
        }
    }

    /// Creates a store in the platform-appropriate settings directory.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoPlatformConfigDir`] when the base directory
    /// cannot be determined from the environment.
    pub fn in_platform_dir() -> Result<Self, SettingsError> {
        Ok(Self::new(settings_dir()?))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut OverlaySettings {
        &mut self.settings
    }

    /// Custom keys read by the last successful [`load`](Self::load), in file order.
    pub fn config_wrappers(&self) -> &[CustomKeyWrapper] {
        &self.config_wrappers
    }

    /// Reads the settings file into memory.
    ///
    /// A missing or empty file is replaced with defaults.  A file that cannot
    /// be read or parsed is logged and replaced with defaults; the in-memory
    /// settings are left untouched in that case.
    pub fn load(&mut self) -> LoadOutcome {
        match self.read_document() {
            Ok(Some(document)) => {
                let (settings, wrappers) = document.into_parts();
                self.settings = settings;
                self.config_wrappers = wrappers;
                debug!(
                    "loaded settings from {} ({} custom keys)",
                    self.config_file.display(),
                    self.config_wrappers.len()
                );
                LoadOutcome::Loaded
            }
            Ok(None) => {
                info!(
                    "no settings found at {}, writing defaults",
                    self.config_file.display()
                );
                self.write_or_log(&self.config_wrappers);
                LoadOutcome::CreatedDefaults
            }
            Err(e) => {
                warn!("could not load config file (\"{}\"): {e}", self.file_name());
                self.write_or_log(&self.config_wrappers);
                LoadOutcome::RecoveredDefaults
            }
        }
    }

    /// Writes the current settings plus the custom keys live in `source`.
    ///
    /// Failures are logged and swallowed.
    pub fn save(&self, source: &dyn CustomKeySource) {
        self.write_or_log(&source.live_custom_keys());
    }

    /// Like [`save`](Self::save), but returns the failure.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the directory or file cannot be
    /// written, or [`SettingsError::Json`] if serialization fails.
    pub fn try_save(&self, source: &dyn CustomKeySource) -> Result<(), SettingsError> {
        self.write(&source.live_custom_keys())
    }

    /// The document that a save with `keys` would write.
    pub fn document(&self, keys: &[CustomKeyWrapper]) -> SettingsDocument {
        SettingsDocument::from_parts(&self.settings, keys)
    }

    fn read_document(&self) -> Result<Option<SettingsDocument>, SettingsError> {
        let content = match fs::read_to_string(&self.config_file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.config_file.clone(),
                    source,
                })
            }
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(trimmed)?))
    }

    fn write_or_log(&self, keys: &[CustomKeyWrapper]) {
        if let Err(e) = self.write(keys) {
            warn!("could not save config file (\"{}\"): {e}", self.file_name());
        }
    }

    fn write(&self, keys: &[CustomKeyWrapper]) -> Result<(), SettingsError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.config_file.parent() {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&self.document(keys))?;
        fs::write(&self.config_file, content).map_err(|source| SettingsError::Io {
            path: self.config_file.clone(),
            source,
        })?;
        debug!(
            "saved settings to {} ({} custom keys)",
            self.config_file.display(),
            keys.len()
        );
        Ok(())
    }

    fn file_name(&self) -> String {
        self.config_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| SETTINGS_FILE_NAME.to_string())
    }
}

// ── Settings directory ────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn settings_dir() -> Result<PathBuf, SettingsError> {
    platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Keystrokes"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("keystrokes"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Keystrokes")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use keystrokes_core::{CustomKey, KeyCategory};
    use uuid::Uuid;

    /// Fresh scratch directory path; not created.
    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("keystrokes_test_{}", Uuid::new_v4()))
    }

    fn sample_keys() -> Vec<CustomKeyWrapper> {
        vec![
            CustomKeyWrapper::new(CustomKey::new(57, KeyCategory::Keyboard), 0, 74),
            CustomKeyWrapper::new(CustomKey::new(0, KeyCategory::Mouse), -12, 30),
            CustomKeyWrapper::new(CustomKey::new(57, KeyCategory::Keyboard), 40, 0),
            CustomKeyWrapper::new(CustomKey::new(3, KeyCategory::Other(9)), 5, 5),
        ]
    }

    // ── Construction ─────────────────────────────────────────────────────────

    #[test]
    fn test_new_creates_directory_and_targets_keystrokes_json() {
        // Arrange
        let dir = scratch_dir().join("nested");

        // Act
        let store = KeystrokesSettings::new(&dir);

        // Assert
        assert!(dir.is_dir());
        assert!(store.config_file().ends_with(SETTINGS_FILE_NAME));
        assert_eq!(*store.settings(), OverlaySettings::default());

        std::fs::remove_dir_all(dir.parent().unwrap()).ok();
    }

    // ── load ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file_writes_defaults() {
        // Arrange
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);

        // Act
        let outcome = store.load();

        // Assert
        assert_eq!(outcome, LoadOutcome::CreatedDefaults);
        assert_eq!(*store.settings(), OverlaySettings::default());
        assert!(store.config_wrappers().is_empty());
        let written = std::fs::read_to_string(store.config_file()).expect("defaults written");
        let document: SettingsDocument = serde_json::from_str(&written).unwrap();
        assert_eq!(document, SettingsDocument::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_empty_file_writes_defaults() {
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        std::fs::write(store.config_file(), "  \n\t").unwrap();

        let outcome = store.load();

        assert_eq!(outcome, LoadOutcome::CreatedDefaults);
        assert_eq!(*store.settings(), OverlaySettings::default());
        let written = std::fs::read_to_string(store.config_file()).unwrap();
        assert!(written.contains("\"keyBackground\""));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_malformed_file_recovers_with_defaults() {
        // Arrange
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        std::fs::write(store.config_file(), "{ this is not json").unwrap();

        // Act
        let outcome = store.load();

        // Assert: defaults in memory and a parseable file on disk.
        assert_eq!(outcome, LoadOutcome::RecoveredDefaults);
        assert_eq!(*store.settings(), OverlaySettings::default());
        let rewritten = std::fs::read_to_string(store.config_file()).unwrap();
        assert!(serde_json::from_str::<SettingsDocument>(&rewritten).is_ok());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_wrong_field_type_recovers_with_defaults() {
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        std::fs::write(store.config_file(), r#"{"x": "left", "red": 12}"#).unwrap();

        let outcome = store.load();

        assert_eq!(outcome, LoadOutcome::RecoveredDefaults);
        assert_eq!(store.settings().red(), 255);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_partial_document_uses_field_defaults() {
        // Arrange
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        std::fs::write(
            store.config_file(),
            r#"{"x": 12, "showCPS": true, "futureField": [1, 2, 3]}"#,
        )
        .unwrap();

        // Act
        let outcome = store.load();

        // Assert
        assert_eq!(outcome, LoadOutcome::Loaded);
        let settings = store.settings();
        assert_eq!(settings.x(), 12);
        assert_eq!(settings.y(), 0);
        assert!(settings.is_showing_cps());
        assert_eq!(settings.red(), 255);
        assert_eq!(settings.pressed_red(), 0);
        assert!(settings.is_enabled());
        assert!(settings.is_left_click());
        assert!(settings.is_key_background_enabled());
        assert_eq!(settings.scale(), 1.0);
        assert_eq!(settings.height(), 68);
        assert!(store.config_wrappers().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_clamps_out_of_range_scale_and_fade_time() {
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        std::fs::write(store.config_file(), r#"{"scale": 9.0, "fadeTime": 0.0}"#).unwrap();

        store.load();

        assert_eq!(store.settings().scale(), 1.5);
        assert_eq!(store.settings().fade_time(), 0.1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rebuilds_custom_keys_in_file_order() {
        // Arrange
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        std::fs::write(
            store.config_file(),
            r#"{"custom": [
                {"key": 30, "type": 0, "xOffset": 1, "yOffset": 2},
                {"key": 1, "type": 1},
                {"key": 30, "type": 0, "xOffset": -4, "yOffset": 8}
            ]}"#,
        )
        .unwrap();

        // Act
        store.load();

        // Assert
        let keys = store.config_wrappers();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], CustomKeyWrapper::from_persisted(30, 0, 1, 2));
        assert_eq!(keys[1], CustomKeyWrapper::from_persisted(1, 1, 0, 0));
        assert_eq!(keys[2], CustomKeyWrapper::from_persisted(30, 0, -4, 8));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_unusable_directory_recovers_without_panicking() {
        // Arrange: the "directory" is actually a regular file.
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let blocked = dir.join("blocked");
        std::fs::write(&blocked, "not a directory").unwrap();
        let mut store = KeystrokesSettings::new(&blocked);

        // Act
        let outcome = store.load();

        // Assert
        assert_eq!(outcome, LoadOutcome::RecoveredDefaults);
        assert_eq!(*store.settings(), OverlaySettings::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    // ── save ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_and_load_round_trip_via_temp_dir() {
        // Arrange
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        {
            let settings = store.settings_mut();
            settings.set_x(-40);
            settings.set_y(220);
            settings.set_red(10);
            settings.set_green(20);
            settings.set_blue(30);
            settings.set_pressed_red(200);
            settings.set_pressed_green(210);
            settings.set_pressed_blue(220);
            settings.set_scale(1.25);
            settings.set_fade_time(2.5);
            settings.set_enabled(false);
            settings.set_chroma(true);
            settings.set_showing_mouse_buttons(true);
            settings.set_showing_cps(true);
            settings.set_showing_cps_on_buttons(true);
            settings.set_showing_spacebar(true);
            settings.set_left_click(false);
            settings.set_showing_sneak(true);
            settings.set_showing_fps(true);
            settings.set_key_background_enabled(false);
        }
        let keys = sample_keys();

        // Act
        store.save(&keys);
        let mut reloaded = KeystrokesSettings::new(&dir);
        let outcome = reloaded.load();

        // Assert
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(reloaded.settings(), store.settings());
        assert_eq!(reloaded.config_wrappers(), keys.as_slice());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_default_round_trip_reproduces_defaults() {
        let dir = scratch_dir();
        let store = KeystrokesSettings::new(&dir);
        store.save(&Vec::<CustomKeyWrapper>::new());

        let mut reloaded = KeystrokesSettings::new(&dir);
        assert_eq!(reloaded.load(), LoadOutcome::Loaded);
        assert_eq!(*reloaded.settings(), OverlaySettings::default());
        assert!(reloaded.config_wrappers().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_writes_every_documented_field_name() {
        // Arrange
        let dir = scratch_dir();
        let store = KeystrokesSettings::new(&dir);

        // Act
        store.save(&sample_keys());

        // Assert
        let text = std::fs::read_to_string(store.config_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let object = value.as_object().expect("top level must be an object");
        let mut names: Vec<&str> = object.keys().map(String::as_str).collect();
        names.sort_unstable();
        let mut expected = vec![
            "x",
            "y",
            "leftClick",
            "red",
            "green",
            "blue",
            "pressedRed",
            "pressedGreen",
            "pressedBlue",
            "scale",
            "fadeTime",
            "enabled",
            "chroma",
            "mouseButtons",
            "showCPS",
            "showCPSOnButtons",
            "showSpacebar",
            "showSneak",
            "showFps",
            "keyBackground",
            "custom",
        ];
        expected.sort_unstable();
        assert_eq!(names, expected);

        let first = &object["custom"][0];
        assert_eq!(first["key"], 57);
        assert_eq!(first["type"], 0);
        assert_eq!(first["xOffset"], 0);
        assert_eq!(first["yOffset"], 74);
        assert_eq!(object["custom"][3]["type"], 9);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_takes_fresh_snapshot_from_live_source() {
        // Arrange: the file holds one key, the live source holds another.
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        store.save(&vec![CustomKeyWrapper::from_persisted(17, 0, 0, 0)]);
        store.load();
        assert_eq!(store.config_wrappers().len(), 1);

        let mut source = MockCustomKeySource::new();
        source
            .expect_live_custom_keys()
            .times(1)
            .returning(|| vec![CustomKeyWrapper::from_persisted(31, 0, 25, 0)]);

        // Act
        store.save(&source);

        // Assert
        let mut reloaded = KeystrokesSettings::new(&dir);
        reloaded.load();
        assert_eq!(
            reloaded.config_wrappers(),
            &[CustomKeyWrapper::from_persisted(31, 0, 25, 0)]
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_try_save_reports_io_error_and_save_swallows_it() {
        // Arrange
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let blocked = dir.join("blocked");
        std::fs::write(&blocked, "not a directory").unwrap();
        let store = KeystrokesSettings::new(&blocked);

        // Act
        let result = store.try_save(&Vec::<CustomKeyWrapper>::new());
        store.save(&Vec::<CustomKeyWrapper>::new());

        // Assert
        assert!(matches!(result, Err(SettingsError::Io { .. })));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_writes_clamped_values() {
        let dir = scratch_dir();
        let mut store = KeystrokesSettings::new(&dir);
        store.settings_mut().set_scale(0.01);
        store.settings_mut().set_fade_time(12.0);

        store.save(&Vec::<CustomKeyWrapper>::new());

        let document = store.document(&[]);
        assert_eq!(document.scale, 0.5);
        assert_eq!(document.fade_time, 3.0);
        let text = std::fs::read_to_string(store.config_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["scale"], 0.5);
        assert_eq!(value["fadeTime"], 3.0);

        std::fs::remove_dir_all(&dir).ok();
    }

    // ── Document conversions ─────────────────────────────────────────────────

    #[test]
    fn test_document_default_matches_domain_defaults() {
        let document = SettingsDocument::default();
        assert_eq!(document.red, 255);
        assert_eq!(document.scale, 1.0);
        assert!(document.key_background);
        assert!(document.custom.is_empty());

        let (settings, keys) = document.into_parts();
        assert_eq!(settings, OverlaySettings::default());
        assert!(keys.is_empty());
    }

    #[test]
    fn test_custom_entry_missing_fields_default_to_zero() {
        let entry: CustomKeyEntry = serde_json::from_str(r#"{"key": 42}"#).unwrap();
        assert_eq!(
            entry,
            CustomKeyEntry {
                key: 42,
                kind: 0,
                x_offset: 0,
                y_offset: 0
            }
        );
    }

    // ── settings_dir path formation ──────────────────────────────────────────

    #[test]
    fn test_platform_config_dir_returns_some_on_this_platform() {
        // Only asserted when the relevant env var is available.
        let result = platform_config_dir();
        #[cfg(target_os = "windows")]
        if std::env::var_os("APPDATA").is_some() {
            assert!(result.is_some());
        }
        #[cfg(target_os = "linux")]
        {
            let has_xdg = std::env::var_os("XDG_CONFIG_HOME").is_some();
            let has_home = std::env::var_os("HOME").is_some();
            if has_xdg || has_home {
                assert!(result.is_some());
            }
        }
        #[cfg(target_os = "macos")]
        if std::env::var_os("HOME").is_some() {
            assert!(result.is_some());
        }
        let _ = result;
    }
}
