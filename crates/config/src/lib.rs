//! Configuration loading and validation for PromptDeck.
//!
//! Loads configuration from `~/.promptdeck/config.toml` with environment
//! variable overrides and turns it into core `DeckSettings`.

use promptdeck_core::{BlockKind, CostRange, DeckSettings, InitialBlock, SourceTemplate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.promptdeck/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Token budget the usage ratio is measured against
    #[serde(default = "default_capacity")]
    pub capacity: u64,

    /// Seed for synthetic token costs (unset = fresh randomness each run)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Cost range for blocks created from the palette
    #[serde(default)]
    pub token_cost_range: CostRangeConfig,

    /// The system block a fresh or reset deck starts with
    #[serde(default)]
    pub initial_block: InitialBlockConfig,

    /// Palette contents per kind
    #[serde(default)]
    pub templates: TemplatesConfig,
}

fn default_capacity() -> u64 {
    promptdeck_core::settings::DEFAULT_CAPACITY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRangeConfig {
    #[serde(default = "default_min_cost")]
    pub min: u32,

    #[serde(default = "default_max_cost")]
    pub max: u32,
}

fn default_min_cost() -> u32 {
    CostRange::default().min
}
fn default_max_cost() -> u32 {
    CostRange::default().max
}

impl Default for CostRangeConfig {
    fn default() -> Self {
        Self {
            min: default_min_cost(),
            max: default_max_cost(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialBlockConfig {
    #[serde(default = "default_initial_content")]
    pub content: String,

    #[serde(default = "default_initial_cost")]
    pub token_cost: u32,
}

fn default_initial_content() -> String {
    InitialBlock::default().content
}
fn default_initial_cost() -> u32 {
    InitialBlock::default().token_cost
}

impl Default for InitialBlockConfig {
    fn default() -> Self {
        Self {
            content: default_initial_content(),
            token_cost: default_initial_cost(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default = "default_user_template")]
    pub user: String,

    #[serde(default = "default_assistant_template")]
    pub assistant: String,

    #[serde(default = "default_system_template")]
    pub system: String,
}

fn default_template(kind: BlockKind) -> String {
    promptdeck_core::settings::default_templates()
        .into_iter()
        .find(|t| t.kind == kind)
        .map(|t| t.content)
        .unwrap_or_default()
}
fn default_user_template() -> String {
    default_template(BlockKind::User)
}
fn default_assistant_template() -> String {
    default_template(BlockKind::Assistant)
}
fn default_system_template() -> String {
    default_template(BlockKind::System)
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            user: default_user_template(),
            assistant: default_assistant_template(),
            system: default_system_template(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.promptdeck/config.toml).
    ///
    /// Environment overrides:
    /// - `PROMPTDECK_CAPACITY`
    /// - `PROMPTDECK_SEED`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(&Self::config_path(), |key| std::env::var(key).ok())
    }

    /// Load from `path`, then apply overrides read through `lookup` and
    /// validate the result.
    pub fn load_with(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `PROMPTDECK_*` overrides. Does not validate.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = lookup("PROMPTDECK_CAPACITY") {
            self.capacity = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "PROMPTDECK_CAPACITY must be a positive integer, got {raw:?}"
                ))
            })?;
        }

        if let Some(raw) = lookup("PROMPTDECK_SEED") {
            self.seed = Some(raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "PROMPTDECK_SEED must be an unsigned integer, got {raw:?}"
                ))
            })?);
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".promptdeck")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "capacity must be greater than zero".into(),
            ));
        }

        if self.token_cost_range.min > self.token_cost_range.max {
            return Err(ConfigError::ValidationError(format!(
                "token_cost_range.min ({}) must not exceed token_cost_range.max ({})",
                self.token_cost_range.min, self.token_cost_range.max
            )));
        }

        Ok(())
    }

    /// Build the core settings this configuration describes.
    pub fn to_settings(&self) -> Result<DeckSettings, ConfigError> {
        let cost_range = CostRange::new(self.token_cost_range.min, self.token_cost_range.max)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        DeckSettings::new(
            self.capacity,
            cost_range,
            InitialBlock {
                content: self.initial_block.content.clone(),
                token_cost: self.initial_block.token_cost,
            },
            vec![
                SourceTemplate::new(BlockKind::User, &self.templates.user),
                SourceTemplate::new(BlockKind::Assistant, &self.templates.assistant),
                SourceTemplate::new(BlockKind::System, &self.templates.system),
            ],
        )
        .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Write the default config file unless one already exists.
    /// Returns `false` when a file was already there.
    pub fn write_default(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        let write_err = |e: std::io::Error| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, Self::default_toml()).map_err(write_err)?;
        Ok(true)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            seed: None,
            token_cost_range: CostRangeConfig::default(),
            initial_block: InitialBlockConfig::default(),
            templates: TemplatesConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity, 4096);
        assert_eq!(config.token_cost_range.min, 5);
        assert_eq!(config.token_cost_range.max, 24);
        assert_eq!(config.initial_block.token_cost, 7);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.capacity, config.capacity);
        assert_eq!(parsed.templates.user, config.templates.user);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let toml_str = r#"
capacity = 128

[token_cost_range]
max = 40
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.capacity, 128);
        assert_eq!(config.token_cost_range.min, 5);
        assert_eq!(config.token_cost_range.max, 40);
        assert_eq!(config.initial_block.content, "You are a helpful AI assistant.");
    }

    #[test]
    fn inverted_cost_range_rejected() {
        let config = AppConfig {
            token_cost_range: CostRangeConfig { min: 30, max: 10 },
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(config.to_settings().is_err());
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = AppConfig {
            capacity: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn settings_carry_config_values() {
        let config = AppConfig {
            capacity: 512,
            templates: TemplatesConfig {
                user: "hi".into(),
                ..TemplatesConfig::default()
            },
            ..AppConfig::default()
        };
        let settings = config.to_settings().unwrap();
        assert_eq!(settings.capacity, 512);
        assert_eq!(settings.template(BlockKind::User).unwrap().content, "hi");
        assert_eq!(settings.templates.len(), 3);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().capacity, 4096);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "capacity = 64\nseed = 3\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "capacity = \"lots\"").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn overrides_replace_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "capacity = 64\nseed = 3\n").unwrap();

        let config = AppConfig::load_with(
            &path,
            vars(&[("PROMPTDECK_CAPACITY", " 2048 "), ("PROMPTDECK_SEED", "42")]),
        )
        .unwrap();
        assert_eq!(config.capacity, 2048);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn no_overrides_keeps_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "capacity = 64\nseed = 3\n").unwrap();

        let config = AppConfig::load_with(&path, vars(&[])).unwrap();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn non_numeric_override_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(vars(&[("PROMPTDECK_CAPACITY", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("PROMPTDECK_CAPACITY"));

        let err = config
            .apply_overrides(vars(&[("PROMPTDECK_SEED", "-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn zero_capacity_override_fails_validation() {
        let err = AppConfig::load_with(
            Path::new("/nonexistent/config.toml"),
            vars(&[("PROMPTDECK_CAPACITY", "0")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(AppConfig::write_default(&path).unwrap());
        std::fs::write(&path, "capacity = 10").unwrap();
        assert!(!AppConfig::write_default(&path).unwrap());
        assert_eq!(AppConfig::load_from(&path).unwrap().capacity, 10);
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("capacity = 4096"));
        assert!(toml_str.contains("[token_cost_range]"));
    }
}
