use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use gangsched_core::{DEFAULT_GROUP_ANNOTATION, DEFAULT_PRIORITY_ANNOTATION};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub scheduler_name: String,
    #[serde(default = "default_group_annotation")]
    pub group_annotation: String,
    #[serde(default = "default_priority_annotation")]
    pub priority_annotation: String,
    #[serde(default)]
    pub cluster: ClusterConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Path to a kubeconfig file. `None` selects in-cluster configuration
    /// via `kube::Client::try_default()`.
    pub kubeconfig: Option<String>,
}

fn default_group_annotation() -> String {
    DEFAULT_GROUP_ANNOTATION.to_string()
}

fn default_priority_annotation() -> String {
    DEFAULT_PRIORITY_ANNOTATION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scheduler_name: "foobar".to_string(),
            group_annotation: default_group_annotation(),
            priority_annotation: default_priority_annotation(),
            cluster: ClusterConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let cfg: Config =
            serde_yaml::from_str(&content).context("failed to parse YAML config")?;
        Ok(cfg)
    }
}
