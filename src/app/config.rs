//! Application configuration
//!
//! TOML config with display dimensions, per-plugin entries and keybind
//! tables. An explicitly given path must exist and parse; the default
//! location is optional and silently falls back to defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::error_handling::ContextualError;
use crate::input::api::{BindCategory, Key, KeybindRegistry};
use crate::plugin::api::PluginConfig;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },
    #[error("Cannot read configuration file {path}: {cause}")]
    Io { path: PathBuf, cause: String },
    #[error("Invalid configuration in {path}: {cause}")]
    Parse { path: PathBuf, cause: String },
}

impl ContextualError for AppConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

pub type AppConfigResult<T> = Result<T, AppConfigError>;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// One `[[plugins]]` entry: identity and load-time state plus the
/// instance config fields inline in the same table
#[derive(Debug, Clone, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(flatten)]
    pub config: PluginConfig,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub plugins: Vec<PluginEntry>,
    /// `[keybinds.<category>]` tables of key name -> action name
    pub keybinds: HashMap<String, HashMap<String, String>>,
}

impl AppConfig {
    /// Load from `path` if given, otherwise from the default location.
    ///
    /// An explicit path that is missing or malformed is an error; a
    /// missing default file yields `AppConfig::default()`.
    pub fn load(path: Option<&Path>) -> AppConfigResult<AppConfig> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::parse_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::parse_file(&path),
                _ => Ok(AppConfig::default()),
            },
        }
    }

    /// `<config-dir>/scopehud/scopehud.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scopehud").join("scopehud.toml"))
    }

    fn parse_file(path: &Path) -> AppConfigResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| AppConfigError::Io {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        let config: AppConfig = toml::from_str(&content).map_err(|e| AppConfigError::Parse {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Keybind registry with the built-in app bindings, then the config's
    /// `[keybinds.*]` entries on top (same key replaces)
    pub fn build_keybinds(&self) -> KeybindRegistry {
        let mut registry = KeybindRegistry::new();
        registry.register(Key::Char('q'), "quit", "Quit", BindCategory::System);
        registry.register(Key::Escape, "quit", "Quit", BindCategory::System);
        registry.register(Key::Char('h'), "help", "Show keybind help", BindCategory::System);
        registry.register(
            Key::Char('s'),
            "snapshot",
            "Save frame snapshot",
            BindCategory::Display,
        );

        for (category_name, bindings) in &self.keybinds {
            let category = BindCategory::parse(category_name);
            for (key_name, action) in bindings {
                match Key::parse(key_name) {
                    Some(key) => {
                        registry.register(key, action.clone(), action.clone(), category.clone())
                    }
                    None => log::warn!(
                        "Ignoring unparseable key '{}' in [keybinds.{}]",
                        key_name,
                        category_name
                    ),
                }
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::api::AnchorPosition;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.display.width, 1280);
        assert_eq!(config.display.height, 720);
        assert!(config.plugins.is_empty());
        assert!(config.keybinds.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [display]
            width = 1920
            height = 1080

            [[plugins]]
            name = "fps_counter"
            visible = false
            position = "top_right"
            x = -120
            z_index = 50

            [plugins.settings]
            fps_update_interval = 0.25

            [[plugins]]
            name = "compass"

            [keybinds.display]
            b = "toggle_boundaries"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.width, 1920);
        assert_eq!(config.plugins.len(), 2);

        let fps = &config.plugins[0];
        assert_eq!(fps.name, "fps_counter");
        assert!(fps.enabled);
        assert!(!fps.visible);
        assert_eq!(fps.config.position, AnchorPosition::TopRight);
        assert_eq!(fps.config.x, -120);
        assert_eq!(fps.config.z_index, 50);
        assert_eq!(fps.config.get_f64("fps_update_interval", 0.0), 0.25);

        let compass = &config.plugins[1];
        assert!(compass.enabled);
        assert!(compass.visible);
        assert_eq!(compass.config, PluginConfig::default());

        assert_eq!(config.keybinds["display"]["b"], "toggle_boundaries");
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/scopehud.toml"))).unwrap_err();
        assert!(matches!(err, AppConfigError::NotFound { .. }));
        assert!(err.is_user_actionable());
        assert!(err.user_message().unwrap().contains("/nonexistent"));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scopehud.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[display]\nwidth = 640\nheight = 480").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.display.width, 640);
        assert_eq!(config.display.height, 480);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scopehud.toml");
        std::fs::write(&path, "not [ valid toml").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, AppConfigError::Parse { .. }));
    }

    #[test]
    fn test_build_keybinds_defaults_and_overrides() {
        let config = AppConfig::default();
        let registry = config.build_keybinds();
        assert_eq!(registry.resolve(Key::Char('q')), Some("quit"));
        assert_eq!(registry.resolve(Key::Escape), Some("quit"));
        assert_eq!(registry.resolve(Key::Char('s')), Some("snapshot"));

        let config: AppConfig = toml::from_str(
            r#"
            [keybinds.system]
            q = "quit_fast"
            bogus_key = "ignored"
            "#,
        )
        .unwrap();
        let registry = config.build_keybinds();
        // config entry replaced the built-in binding on the same key
        assert_eq!(registry.resolve(Key::Char('q')), Some("quit_fast"));
    }
}
