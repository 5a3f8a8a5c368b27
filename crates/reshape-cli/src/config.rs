//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Environment variables (`RESHAPE_*`)
//!
//! Command-line flags are applied last, by the command handlers.

use crate::cli::FormatArg;
use crate::error::{Error, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule set used when `--rule-set` is not given
    pub rule_set: Option<String>,

    /// Transform settings
    pub transform: TransformConfig,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Transform defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Input format (auto, json, xml)
    pub format: FormatArg,

    /// Pretty-print output documents
    pub pretty: bool,

    /// Validate output documents against the schema
    pub validate: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level used when no `-v` flag is given
    pub level: String,

    /// Log format (compact, full, json)
    pub format: LogFormat,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            format: FormatArg::Auto,
            pretty: false,
            validate: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Config file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::config(format!(
                "Unsupported config file '{}'. Expected .toml, .yaml, .yml or .json",
                path.display()
            ))),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_with_source(format!("Failed to read {}", path.display()), e)
        })?;

        let parsed: std::result::Result<Self, anyhow::Error> = match format {
            FileFormat::Toml => toml::from_str(&content).map_err(anyhow::Error::from),
            FileFormat::Yaml => serde_yaml::from_str(&content).map_err(anyhow::Error::from),
            FileFormat::Json => serde_json::from_str(&content).map_err(anyhow::Error::from),
        };

        parsed.map_err(|e| Error::config_with_source(format!("Failed to parse {}", path.display()), e))
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading configuration");
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations, then
    /// apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("reshape.toml"),
            PathBuf::from(".reshape.toml"),
            PathBuf::from(".reshape.yaml"),
            PathBuf::from(".reshape.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let reshape_dir = config_dir.join("reshape");
            paths.push(reshape_dir.join("config.toml"));
            paths.push(reshape_dir.join("config.yaml"));
        }

        paths
    }

    /// Apply `RESHAPE_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `RESHAPE_*` overrides read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rule_set) = lookup("RESHAPE_RULE_SET") {
            self.rule_set = Some(rule_set);
        }

        if let Some(format) = lookup("RESHAPE_FORMAT") {
            self.transform.format = match format.to_lowercase().as_str() {
                "auto" => FormatArg::Auto,
                "json" => FormatArg::Json,
                "xml" => FormatArg::Xml,
                _ => {
                    return Err(Error::config(format!(
                        "RESHAPE_FORMAT must be auto, json or xml, got '{}'",
                        format
                    )))
                }
            };
        }

        if let Some(pretty) = lookup("RESHAPE_PRETTY") {
            self.transform.pretty = parse_flag("RESHAPE_PRETTY", &pretty)?;
        }

        if let Some(validate) = lookup("RESHAPE_VALIDATE") {
            self.transform.validate = parse_flag("RESHAPE_VALIDATE", &validate)?;
        }

        if let Some(level) = lookup("RESHAPE_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Serialize in the format implied by the path's extension
    pub fn to_file_string(&self, path: &Path) -> Result<String> {
        match FileFormat::from_path(path)? {
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config_with_source("Failed to serialize as TOML", e)),
            FileFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            FileFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_file_string(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rule_set, None);
        assert_eq!(config.transform.format, FormatArg::Auto);
        assert!(config.transform.validate);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reshape.toml");
        std::fs::write(&path, "rule_set = \"cms\"\n\n[transform]\npretty = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.rule_set.as_deref(), Some("cms"));
        assert!(config.transform.pretty);
        assert!(config.transform.validate);
    }

    #[test]
    fn test_yaml_and_json_files() {
        let dir = TempDir::new().unwrap();

        let yaml = dir.path().join("config.yaml");
        std::fs::write(&yaml, "transform:\n  format: xml\nlogging:\n  format: json\n").unwrap();
        let config = Config::from_file(&yaml).unwrap();
        assert_eq!(config.transform.format, FormatArg::Xml);
        assert_eq!(config.logging.format, LogFormat::Json);

        let json = dir.path().join("config.json");
        std::fs::write(&json, r#"{"transform": {"validate": false}}"#).unwrap();
        assert!(!Config::from_file(&json).unwrap().transform.validate);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::from_file(Path::new("config.ini")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_malformed_file_keeps_parse_cause() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reshape.toml");
        std::fs::write(&path, "rule_set = ").unwrap();

        match Config::from_file(&path).unwrap_err() {
            Error::Config { source, .. } => assert!(source.is_some()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_with(env(&[
                ("RESHAPE_RULE_SET", "rss"),
                ("RESHAPE_FORMAT", "XML"),
                ("RESHAPE_PRETTY", "1"),
                ("RESHAPE_VALIDATE", "off"),
                ("RESHAPE_LOG_LEVEL", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.rule_set.as_deref(), Some("rss"));
        assert_eq!(config.transform.format, FormatArg::Xml);
        assert!(config.transform.pretty);
        assert!(!config.transform.validate);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = Config::default();
        assert!(config.apply_env_with(env(&[("RESHAPE_FORMAT", "csv")])).is_err());
        assert!(config.apply_env_with(env(&[("RESHAPE_PRETTY", "maybe")])).is_err());
    }

    #[test]
    fn test_save_and_reload_every_format() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.rule_set = Some("cms".to_string());
        config.transform.format = FormatArg::Json;

        for name in ["out.toml", "out.yaml", "nested/out.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config);
        }
    }
}
