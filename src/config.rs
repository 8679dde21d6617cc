//! Application configuration.
//!
//! Settings live in `config.json` next to the executable, grouped into the
//! `settings`, `renderer` and `style` sections. Values are available through
//! typed section structs, or by `section:key` lookup on the raw document.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::logging::Logger;

/// Virtual-key code of F7, the default cancel/capture hotkey.
pub const DEFAULT_HOTKEY_VK: u16 = 0x76;

/// General behaviour settings (`settings` section).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Shows the debug information panel.
    pub debug: bool,
    /// Virtual-key code polled for cancel and coordinate capture.
    pub hotkey_vk: u16,
    /// Repaint cadence while something is being polled (milliseconds).
    pub poll_interval_ms: u64,
    /// Maximum number of on-screen log lines. 0 keeps everything.
    pub log_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: cfg!(debug_assertions),
            hotkey_vk: DEFAULT_HOTKEY_VK,
            poll_interval_ms: 16,
            log_capacity: 0,
        }
    }
}

/// Window settings (`renderer` section).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RendererSettings {
    pub vsync: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            width: 850,
            height: 500,
        }
    }
}

/// Font and spacing settings (`style` section).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StyleSettings {
    /// Font file name, looked up in the system font directory.
    pub font_family: String,
    pub font_size: f32,
    pub window_padding: [f32; 2],
    pub frame_padding: [f32; 2],
    pub item_spacing: [f32; 2],
    pub window_rounding: f32,
    pub frame_rounding: f32,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            font_family: "segoeuib.ttf".to_string(),
            font_size: 19.0,
            window_padding: [15.0, 15.0],
            frame_padding: [5.0, 5.0],
            item_spacing: [12.0, 8.0],
            window_rounding: 5.0,
            frame_rounding: 4.0,
        }
    }
}

/// The full document as written to disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub settings: Settings,
    pub renderer: RendererSettings,
    pub style: StyleSettings,
}

/// Loaded configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    document: ConfigDocument,
    raw: Value,
}

impl Default for AppConfig {
    fn default() -> Self {
        let document = ConfigDocument::default();
        let raw = serde_json::to_value(&document).unwrap_or(Value::Null);
        Self { document, raw }
    }
}

impl AppConfig {
    /// Parses a JSON document. Sections that are missing or malformed fall
    /// back to their defaults; malformed sections are reported to `logger`.
    pub fn from_json_str(contents: &str, logger: &Logger) -> Result<Self> {
        let raw: Value = serde_json::from_str(contents).context("config is not valid JSON")?;
        let document = ConfigDocument {
            settings: read_section(&raw, "settings", logger),
            renderer: read_section(&raw, "renderer", logger),
            style: read_section(&raw, "style", logger),
        };
        Ok(Self { document, raw })
    }

    /// Loads `path`, or writes and returns the default configuration if the
    /// file does not exist. Read or parse failures fall back to defaults.
    pub fn load_or_create(path: &Path, logger: &Logger) -> Self {
        logger.info(format!("Looking for config at: {}", path.display()));

        if !path.exists() {
            logger.info("The configuration file does not exist, creating the default.");
            let config = Self::default();
            if let Err(e) = config.save(path) {
                logger.warn(format!("Could not write the default configuration: {:#}", e));
            }
            return config;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json_str(&contents, logger) {
                Ok(config) => {
                    logger.info("Found configuration file.");
                    config
                }
                Err(e) => {
                    logger.warn(format!("Failed to parse {}: {:#}. Using defaults.", path.display(), e));
                    Self::default()
                }
            },
            Err(e) => {
                logger.warn(format!("Failed to read {}: {}. Using defaults.", path.display(), e));
                Self::default()
            }
        }
    }

    /// Writes the typed document to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(&self.document).context("failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn settings(&self) -> &Settings {
        &self.document.settings
    }

    pub fn renderer(&self) -> &RendererSettings {
        &self.document.renderer
    }

    pub fn style(&self) -> &StyleSettings {
        &self.document.style
    }

    /// Looks up a raw value by `section:key`, e.g. `settings:debug`.
    ///
    /// Returns `None` if the syntax has no `:`, or the section or key is missing.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let (section, name) = key.split_once(':')?;
        self.raw.get(section)?.as_object()?.get(name)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.lookup(key)?.as_bool()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.lookup(key)?.as_i64()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.lookup(key)?.as_str()
    }
}

fn read_section<T: DeserializeOwned + Default>(raw: &Value, name: &str, logger: &Logger) -> T {
    let Some(section) = raw.get(name) else {
        return T::default();
    };
    match serde_json::from_value(section.clone()) {
        Ok(value) => value,
        Err(e) => {
            logger.warn(format!("The config section '{}' is invalid ({}). Using defaults.", name, e));
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(json: &str) -> AppConfig {
        AppConfig::from_json_str(json, &Logger::stdout_only()).unwrap()
    }

    #[test]
    fn test_lookup_section_key() {
        let config = parse(r#"{"settings": {"debug": true}, "renderer": {"width": 1024}}"#);
        assert_eq!(config.get_bool("settings:debug"), Some(true));
        assert_eq!(config.get_i64("renderer:width"), Some(1024));
    }

    #[test]
    fn test_lookup_rejects_bad_syntax_and_missing_keys() {
        let config = parse(r#"{"settings": {"debug": true}}"#);
        assert!(config.lookup("settings.debug").is_none());
        assert!(config.lookup("nosuch:debug").is_none());
        assert!(config.lookup("settings:nosuch").is_none());
    }

    #[test]
    fn test_lookup_type_mismatch_is_none() {
        let config = parse(r#"{"renderer": {"vsync": "yes"}}"#);
        assert_eq!(config.get_bool("renderer:vsync"), None);
        assert_eq!(config.get_str("renderer:vsync"), Some("yes"));
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = parse(r#"{"renderer": {"width": 640}}"#);
        assert_eq!(config.renderer().width, 640);
        assert_eq!(config.renderer().height, RendererSettings::default().height);
        assert_eq!(config.settings().hotkey_vk, DEFAULT_HOTKEY_VK);
        assert_eq!(config.style(), &StyleSettings::default());
    }

    #[test]
    fn test_malformed_section_falls_back_and_warns() {
        let logger = Logger::stdout_only();
        let config =
            AppConfig::from_json_str(r#"{"settings": {"hotkey-vk": "F7"}}"#, &logger).unwrap();
        assert_eq!(config.settings(), &Settings::default());
        assert!(logger.captured().iter().any(|l| l.contains("'settings' is invalid")));
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig::load_or_create(&path, &Logger::stdout_only());
        assert!(path.exists());
        assert_eq!(config.settings(), &Settings::default());

        let reloaded = AppConfig::load_or_create(&path, &Logger::stdout_only());
        assert_eq!(reloaded.renderer(), config.renderer());
        assert_eq!(reloaded.get_i64("settings:hotkey-vk"), Some(DEFAULT_HOTKEY_VK as i64));
    }

    #[test]
    fn test_load_invalid_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let logger = Logger::stdout_only();
        let config = AppConfig::load_or_create(&path, &logger);
        assert_eq!(config.renderer(), &RendererSettings::default());
        assert!(logger.captured().iter().any(|l| l.contains("Failed to parse")));
    }
}
