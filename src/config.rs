//! Editor configuration: validation limits, sync timing and computation defaults.
//!
//! Every field has a default, so a partial (or missing) TOML file is valid:
//!
//! ```toml
//! [limits]
//! max_identifier_length = 20
//!
//! [sync]
//! debounce_ms = 250
//! ```

use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    error::DesignerError,
    semantics::{Aggregation, GradualSemantics},
};

/// Inclusive numeric bounds for a weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl Default for WeightRange {
    fn default() -> Self {
        WeightRange { min: 0.0, max: 1.0 }
    }
}

impl WeightRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_identifier_length: usize,
    pub node_weight: WeightRange,
    pub edge_weight: WeightRange,
    pub max_description_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_identifier_length: 50,
            node_weight: WeightRange::default(),
            edge_weight: WeightRange::default(),
            max_description_length: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Quiet window before a description edit is reparsed.
    pub debounce_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings { debounce_ms: 100 }
    }
}

impl SyncSettings {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradualDefaults {
    pub semantics: GradualSemantics,
    pub aggregation: Aggregation,
    pub gamma: f64,
    pub epsilon: f64,
}

impl Default for GradualDefaults {
    fn default() -> Self {
        GradualDefaults {
            semantics: GradualSemantics::Drl,
            aggregation: Aggregation::Sum,
            gamma: 1.0,
            epsilon: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub project_name: String,
    pub layout: String,
    pub extension_semantics: String,
    pub gradual: GradualDefaults,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            project_name: "graph".to_string(),
            layout: "cose".to_string(),
            extension_semantics: "grounded".to_string(),
            gradual: GradualDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    pub limits: Limits,
    pub sync: SyncSettings,
    pub defaults: Defaults,
}

impl DesignerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, DesignerError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, DesignerError> {
        Ok(toml::to_string(self)?)
    }

    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DesignerError> {
        TomlConfigProvider::new(path.as_ref().to_path_buf()).get_config()
    }
}

pub trait ConfigProvider {
    fn get_config(&self) -> Result<DesignerConfig, DesignerError>;
    fn set_config(&self, config: &DesignerConfig) -> Result<(), DesignerError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_config(&self) -> Result<DesignerConfig, DesignerError> {
        tracing::debug!("Attempting to read config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(DesignerConfig::default());
        }
        let content = read_to_string(&self.path)?;
        DesignerConfig::from_toml_str(&content)
    }

    fn set_config(&self, config: &DesignerConfig) -> Result<(), DesignerError> {
        tracing::debug!("Attempting to write config to: {:?}", &self.path);
        write(&self.path, config.to_toml_string()?)?;
        Ok(())
    }
}

pub fn get_content<P: AsRef<Path>>(path: P) -> Result<String, DesignerError> {
    tracing::debug!("Reading {:?}", path.as_ref());
    Ok(read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DesignerConfig::from_toml_str(
            r#"
[limits]
max_identifier_length = 8

[defaults.gradual]
semantics = "qen"
"#,
        )
        .unwrap();
        assert_eq!(config.limits.max_identifier_length, 8);
        assert_eq!(config.limits.max_description_length, 500);
        assert_eq!(config.defaults.gradual.semantics, GradualSemantics::Qen);
        assert_eq!(config.defaults.gradual.aggregation, Aggregation::Sum);
        assert_eq!(config.sync.debounce_window(), Duration::from_millis(100));
    }

    #[test]
    fn provider_round_trip() {
        let dir = tempdir().unwrap();
        let provider = TomlConfigProvider::new(dir.path().join("designer.toml"));
        assert_eq!(provider.get_config().unwrap(), DesignerConfig::default());

        let mut config = DesignerConfig::default();
        config.sync.debounce_ms = 250;
        config.defaults.layout = "grid".to_string();
        provider.set_config(&config).unwrap();
        assert_eq!(provider.get_config().unwrap(), config);
        assert_eq!(DesignerConfig::load(provider.path()).unwrap(), config);
    }
}
