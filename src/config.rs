//! Optional JSON configuration file.
//!
//! Every field has a default, so an empty `{}` file is valid. Command-line
//! flags take precedence over values read here.

use crate::error::{Result, SizerError};
use crate::report::OutputFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Inventory snapshot used when `--inventory` is not given.
    pub inventory: Option<PathBuf>,
    /// Cluster used when `--cluster` is not given.
    pub cluster: Option<String>,
    pub format: OutputFormat,
    pub log_level: String,
    /// VM names always included, merged with `--include`.
    pub include: Vec<String>,
    /// VM names always excluded, merged with `--exclude`.
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory: None,
            cluster: None,
            format: OutputFormat::Text,
            log_level: "warn".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SizerError::InvalidConfig {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| SizerError::InvalidConfig {
            reason: format!("Failed to parse config: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.format, OutputFormat::Text);
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.inventory.is_none());
        assert!(cfg.include.is_empty());
    }

    #[test]
    fn reads_all_fields() {
        let cfg = Config::from_json(
            r#"{
                "inventory": "/var/lib/sizer/inventory.json",
                "cluster": "prod",
                "format": "json",
                "logLevel": "debug",
                "include": ["web01"],
                "exclude": ["template-linux"]
            }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.inventory.as_deref(),
            Some(Path::new("/var/lib/sizer/inventory.json"))
        );
        assert_eq!(cfg.cluster.as_deref(), Some("prod"));
        assert_eq!(cfg.format, OutputFormat::Json);
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.exclude, vec!["template-linux".to_string()]);
    }

    #[test]
    fn rejects_unknown_fields_and_formats() {
        assert!(matches!(
            Config::from_json(r#"{ "clusterName": "prod" }"#),
            Err(SizerError::InvalidConfig { .. })
        ));
        assert!(Config::from_json(r#"{ "format": "yaml" }"#).is_err());
    }

    #[test]
    fn missing_file_is_invalid_config() {
        let err = Config::load("/nonexistent/sizer.json").unwrap_err();
        assert!(matches!(err, SizerError::InvalidConfig { .. }));
    }
}
