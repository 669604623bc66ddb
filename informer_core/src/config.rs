//! Configuration file support for Informer.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/informer/config.toml`.
//! Every field is optional; [`Configuration::resolve`] fills the gaps with
//! the defaults below.

use crate::{Level, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENABLE_CONSOLE: bool = true;
pub const DEFAULT_CONSOLE_JSON_FORMAT: bool = false;
pub const DEFAULT_CONSOLE_LEVEL: Level = Level::Debug;
pub const DEFAULT_ENABLE_FILE: bool = true;
pub const DEFAULT_FILE_JSON_FORMAT: bool = true;
pub const DEFAULT_FILE_LEVEL: Level = Level::Debug;
pub const DEFAULT_FILE_LOCATION: &str = "log.log";

/// Caller-supplied logger configuration.
///
/// `None` means "not given". An explicit `Some(false)` is kept as is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub enable_console: Option<bool>,
    pub console_json_format: Option<bool>,
    pub console_level: Option<Level>,
    pub enable_file: Option<bool>,
    pub file_json_format: Option<bool>,
    pub file_level: Option<Level>,
    pub file_location: Option<PathBuf>,
}

/// Configuration with every field populated
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    pub enable_console: bool,
    pub console_json_format: bool,
    pub console_level: Level,
    pub enable_file: bool,
    pub file_json_format: bool,
    pub file_level: Level,
    pub file_location: PathBuf,
}

impl Default for ResolvedConfiguration {
    fn default() -> Self {
        Configuration::default().resolve()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_console(mut self, enabled: bool) -> Self {
        self.enable_console = Some(enabled);
        self
    }

    pub fn console_json_format(mut self, json: bool) -> Self {
        self.console_json_format = Some(json);
        self
    }

    pub fn console_level(mut self, level: Level) -> Self {
        self.console_level = Some(level);
        self
    }

    pub fn enable_file(mut self, enabled: bool) -> Self {
        self.enable_file = Some(enabled);
        self
    }

    pub fn file_json_format(mut self, json: bool) -> Self {
        self.file_json_format = Some(json);
        self
    }

    pub fn file_level(mut self, level: Level) -> Self {
        self.file_level = Some(level);
        self
    }

    pub fn file_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_location = Some(path.into());
        self
    }

    /// Fill every unset field with its default. Explicit values are never
    /// overridden.
    pub fn resolve(self) -> ResolvedConfiguration {
        ResolvedConfiguration {
            enable_console: self.enable_console.unwrap_or(DEFAULT_ENABLE_CONSOLE),
            console_json_format: self
                .console_json_format
                .unwrap_or(DEFAULT_CONSOLE_JSON_FORMAT),
            console_level: self.console_level.unwrap_or(DEFAULT_CONSOLE_LEVEL),
            enable_file: self.enable_file.unwrap_or(DEFAULT_ENABLE_FILE),
            file_json_format: self.file_json_format.unwrap_or(DEFAULT_FILE_JSON_FORMAT),
            file_level: self.file_level.unwrap_or(DEFAULT_FILE_LEVEL),
            file_location: self
                .file_location
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_LOCATION)),
        }
    }

    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Configuration = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("informer").join("config.toml")
    }
}

impl ResolvedConfiguration {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_resolves_to_defaults() {
        let resolved = Configuration::default().resolve();
        assert_eq!(
            resolved,
            ResolvedConfiguration {
                enable_console: true,
                console_json_format: false,
                console_level: Level::Debug,
                enable_file: true,
                file_json_format: true,
                file_level: Level::Debug,
                file_location: PathBuf::from("log.log"),
            }
        );
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let resolved = Configuration::new()
            .enable_console(false)
            .console_json_format(true)
            .console_level(Level::Warn)
            .enable_file(false)
            .file_json_format(false)
            .file_level(Level::Error)
            .file_location("/var/log/app.log")
            .resolve();

        assert!(!resolved.enable_console);
        assert!(resolved.console_json_format);
        assert_eq!(resolved.console_level, Level::Warn);
        assert!(!resolved.enable_file);
        assert!(!resolved.file_json_format);
        assert_eq!(resolved.file_level, Level::Error);
        assert_eq!(resolved.file_location, PathBuf::from("/var/log/app.log"));
    }

    #[test]
    fn test_each_field_independently() {
        // Setting one field leaves every other field at its default
        let only_level = Configuration::new().console_level(Level::Info).resolve();
        let defaults = ResolvedConfiguration::default();
        assert_eq!(only_level.console_level, Level::Info);
        assert_eq!(
            ResolvedConfiguration {
                console_level: Level::Debug,
                ..only_level
            },
            defaults
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
enable_file = false
console_level = "warn"
"#;
        let config: Configuration = toml::from_str(toml_str).unwrap();
        assert_eq!(config.enable_file, Some(false));
        assert_eq!(config.console_level, Some(Level::Warn));
        assert_eq!(config.file_location, None);

        let resolved = config.resolve();
        assert!(!resolved.enable_file);
        assert!(resolved.enable_console); // default
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<Configuration, _> = toml::from_str("enable_consol = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let result: std::result::Result<Configuration, _> = toml::from_str("file_level = \"loud\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let resolved = Configuration::new()
            .file_level(Level::Info)
            .file_location("app.log")
            .resolve();
        resolved.save_to(&path).unwrap();

        let loaded = Configuration::load_from(&path).unwrap().resolve();
        assert_eq!(loaded, resolved);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Configuration::load_from(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
