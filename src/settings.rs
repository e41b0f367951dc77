//! Persisted flashlight settings.
//!
//! The whole document is written back on every change. Keys missing from
//! the file resolve to their defaults, unknown keys survive a save.

use std::path::{Path, PathBuf};

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::contacts::Contact;
use crate::error::Result;

pub const DEFAULT_SETTINGS_FILE: &str = "flashlight_settings.json";
pub const DEFAULT_THEME_COLOR: &str = "#2c3e50";
pub const DEFAULT_LIGHT_COLOR: &str = "#FFFFFF";
pub const MAX_BRIGHTNESS: u8 = 100;

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_string()
}

fn default_brightness() -> u8 {
    MAX_BRIGHTNESS
}

fn brightness_in_range<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    if value > MAX_BRIGHTNESS {
        return Err(D::Error::invalid_value(
            Unexpected::Unsigned(value.into()),
            &"a brightness between 0 and 100",
        ));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    /// Percent, 0..=100. Anything else makes the document malformed.
    #[serde(
        default = "default_brightness",
        deserialize_with = "brightness_in_range"
    )]
    pub brightness: u8,
    /// Only written once a color has been picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_color: Option<String>,
    #[serde(default)]
    pub emergency_contacts: Vec<Contact>,
    /// Minutes the light has been on.
    #[serde(default)]
    pub usage_time: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme_color: default_theme_color(),
            brightness: default_brightness(),
            light_color: None,
            emergency_contacts: vec![],
            usage_time: 0,
            extra: Map::new(),
        }
    }
}

impl Settings {
    pub fn light_color(&self) -> &str {
        self.light_color.as_deref().unwrap_or(DEFAULT_LIGHT_COLOR)
    }
}

/// Reads and writes the settings document at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_FILE)
    }
}

impl SettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document. A missing file yields the defaults, a file that
    /// cannot be parsed is an error.
    pub async fn load(&self) -> Result<Settings> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let settings = serde_json::from_str(&content)?;
                debug!("Loaded settings from {}", self.path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No settings file at {}, using default settings",
                    self.path.display()
                );
                Ok(Settings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(&self.path, bytes).await?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlashlightError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("missing.json"));
        let settings = store.load().await.unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.theme_color, "#2c3e50");
        assert_eq!(settings.brightness, 100);
        assert_eq!(settings.light_color(), "#FFFFFF");
        assert!(settings.emergency_contacts.is_empty());
        assert_eq!(settings.usage_time, 0);
    }

    #[tokio::test]
    async fn test_partial_document_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r##"{"brightness": 40, "light_color": "#ff0000"}"##).unwrap();
        let settings = SettingsStore::new(&path).load().await.unwrap();
        assert_eq!(settings.brightness, 40);
        assert_eq!(settings.light_color(), "#ff0000");
        assert_eq!(settings.theme_color, DEFAULT_THEME_COLOR);
        assert_eq!(settings.usage_time, 0);
    }

    #[tokio::test]
    async fn test_malformed_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = SettingsStore::new(&path).load().await;
        assert!(matches!(result, Err(FlashlightError::Settings(_))));
    }

    #[tokio::test]
    async fn test_brightness_above_100_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(&path);

        std::fs::write(&path, r#"{"brightness": 150}"#).unwrap();
        assert!(matches!(store.load().await, Err(FlashlightError::Settings(_))));

        std::fs::write(&path, r#"{"brightness": 300}"#).unwrap();
        assert!(matches!(store.load().await, Err(FlashlightError::Settings(_))));

        std::fs::write(&path, r#"{"brightness": 100}"#).unwrap();
        assert_eq!(store.load().await.unwrap().brightness, 100);
        std::fs::write(&path, r#"{"brightness": 0}"#).unwrap();
        assert_eq!(store.load().await.unwrap().brightness, 0);
    }

    #[tokio::test]
    async fn test_save_then_load_is_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r##"{"theme_color":"#000000","brightness":55,"usage_time":12,
                "emergency_contacts":[{"name":"Alice","phone":"555-1234"}],
                "window_size":"400x600"}"##,
        )
        .unwrap();
        let store = SettingsStore::new(&path);

        let first = store.load().await.unwrap();
        store.save(&first).await.unwrap();
        let second = store.load().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.extra.get("window_size"), Some(&Value::from("400x600")));
        assert_eq!(second.emergency_contacts.len(), 1);
    }

    #[tokio::test]
    async fn test_light_color_not_written_until_chosen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(&path);
        store.save(&Settings::default()).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("light_color"));
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("nope").join("settings.json"));
        let result = store.save(&Settings::default()).await;
        assert!(matches!(result, Err(FlashlightError::Io(_))));
    }
}
