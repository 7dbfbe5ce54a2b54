//! Typed error handling for the plugin pipeline
//!
//! # Error Categories
//!
//! - [`PluginError`]: failures raised while draining the plugin registry
//! - [`GraphQLError`]: failures of the bundled executor (parse, operation selection, fields)
//! - [`ConfigError`]: configuration loading failures
//!
//! [`PipelineError`] wraps all of them. None of these reach the client
//! directly: anything that belongs in a GraphQL response is converted into a
//! [`FormattedError`], the shape of an entry in the response `errors` list.

use crate::core::path::ResponsePath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Extension code attached to errors produced by plugin executions
pub const PLUGIN_EXECUTION_CODE: &str = "PLUGIN_EXECUTION";

/// The main error type of the crate
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    GraphQL(#[from] GraphQLError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Plugin(e) => e.error_code(),
            PipelineError::GraphQL(e) => e.error_code(),
            PipelineError::Config(_) => "CONFIG_ERROR",
        }
    }
}

// =============================================================================
// Plugin Errors
// =============================================================================

/// Errors produced by the post-pass driver
#[derive(Debug, Error)]
pub enum PluginError {
    /// A plugin's `execute` reported a failure
    ///
    /// `message` is the plugin error with its whole context chain.
    #[error("{plugin}.PluginExecution: {message}")]
    Execution {
        plugin: String,
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The query was cancelled before these executions could run
    #[error("PostPass.Cancelled: {skipped} plugin execution(s) skipped")]
    Cancelled { skipped: usize },
}

impl PluginError {
    pub fn execution(plugin: impl Into<String>, source: anyhow::Error) -> Self {
        PluginError::Execution {
            plugin: plugin.into(),
            message: format!("{:#}", source),
            source: source.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PluginError::Execution { .. } => PLUGIN_EXECUTION_CODE,
            PluginError::Cancelled { .. } => "POST_PASS_CANCELLED",
        }
    }
}

// =============================================================================
// GraphQL Errors
// =============================================================================

/// Errors related to GraphQL execution
#[derive(Debug, Error)]
pub enum GraphQLError {
    /// Query parsing error
    #[error("GraphQL parse error: {message}")]
    ParseError { message: String },

    /// No operation could be selected from the document
    #[error("Invalid GraphQL operation '{operation}': {message}")]
    InvalidOperation { operation: String, message: String },

    /// Operation kind the executor does not run
    #[error("{kind} operations are not supported")]
    Unsupported { kind: String },

    /// Field resolution error
    #[error("Failed to resolve field '{field}': {message}")]
    FieldResolutionError { field: String, message: String },
}

impl GraphQLError {
    pub fn error_code(&self) -> &'static str {
        match self {
            GraphQLError::ParseError { .. } => "GRAPHQL_PARSE_ERROR",
            GraphQLError::InvalidOperation { .. } => "GRAPHQL_INVALID_OPERATION",
            GraphQLError::Unsupported { .. } => "GRAPHQL_UNSUPPORTED_OPERATION",
            GraphQLError::FieldResolutionError { .. } => "GRAPHQL_FIELD_RESOLUTION_ERROR",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// =============================================================================
// Formatted Errors
// =============================================================================

/// An entry of the `errors` list of a GraphQL response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedError {
    /// Human-readable error message
    pub message: String,

    /// Path of the field the error is attributed to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<ResponsePath>,

    /// Additional machine-readable details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl FormattedError {
    /// Create a formatted error from anything printable
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
            path: None,
            extensions: None,
        }
    }

    pub fn with_path(mut self, path: ResponsePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// The `code` extension, if one was set
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(Value::as_str)
    }
}

impl fmt::Display for FormattedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&PluginError> for FormattedError {
    fn from(err: &PluginError) -> Self {
        let formatted = FormattedError::new(err).with_extension("code", err.error_code());
        match err {
            PluginError::Execution { plugin, .. } => {
                formatted.with_extension("plugin", plugin.as_str())
            }
            PluginError::Cancelled { .. } => formatted,
        }
    }
}

impl From<&GraphQLError> for FormattedError {
    fn from(err: &GraphQLError) -> Self {
        FormattedError::new(err).with_extension("code", err.error_code())
    }
}
