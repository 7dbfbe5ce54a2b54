//! Configuration loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings of the bundled executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Resolve sibling fields of a query concurrently
    ///
    /// Mutation root fields are always resolved one after the other.
    pub parallel_fields: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallel_fields: true,
        }
    }
}

/// Settings of the post-pass driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostPassConfig {
    /// Check the query's cancellation token before each plugin execution
    ///
    /// Off by default: every registered execution runs even when the query
    /// was cancelled, and plugins decide for themselves.
    pub check_cancellation: bool,

    /// Attach the originating field path to formatted plugin errors
    pub attach_paths: bool,
}

impl Default for PostPassConfig {
    fn default() -> Self {
        Self {
            check_cancellation: false,
            attach_paths: true,
        }
    }
}

/// Complete configuration of the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub execution: ExecutionConfig,
    pub post_pass: PostPassConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
