//! Engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

/// What a loader does with a rule whose requirement vector fails sanity
/// checking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanityPolicy {
    /// Fail the whole ruleset load.
    RejectRuleset,
    /// Disable the offending rule and keep loading.
    #[default]
    DisableRule,
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on distinct tiles a vector's terrain requirements may
    /// name. -1 disables the check.
    pub max_tiles: i32,
    pub sanity_policy: SanityPolicy,
    /// Warn (once per kind and range) when evaluation meets a combination
    /// it has no evaluator for.
    pub log_unsupported: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_tiles: -1,
            sanity_policy: SanityPolicy::default(),
            log_unsupported: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EngineConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, EngineConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }
}
