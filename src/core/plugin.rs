//! Plugin contract
//!
//! Plugins post-process a GraphQL response once it is fully resolved. They
//! differ from resolvers in when they run and in what they see: during
//! resolution a plugin only *declares interest* in a field through
//! [`Plugin::is_compatible`]; once every field is resolved, each declared
//! interest is replayed through [`Plugin::execute`] against the complete
//! response, addressed by the field's pointer.

use crate::core::context::QueryContext;
use crate::core::resolve_info::ResolveInfo;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Result of a plugin execution
pub type PluginResult = Result<Value, PluginFailure>;

/// A failed plugin execution
///
/// Carries the response value the pipeline continues with alongside the
/// error. Return the input unchanged (see [`PluginFailure::unchanged`]) to get
/// no-op semantics on failure.
#[derive(Debug)]
pub struct PluginFailure {
    pub data: Value,
    pub error: anyhow::Error,
}

impl PluginFailure {
    /// Fail, continuing the pipeline with `data`
    ///
    /// `data` may carry partial changes; the next plugin receives it as is.
    pub fn new(data: Value, error: impl Into<anyhow::Error>) -> Self {
        Self {
            data,
            error: error.into(),
        }
    }

    /// Fail without having modified the response
    ///
    /// Same as [`PluginFailure::new`]; spells out at the call site that
    /// `data` is the value the plugin received.
    pub fn unchanged(data: Value, error: impl Into<anyhow::Error>) -> Self {
        Self::new(data, error)
    }
}

impl fmt::Display for PluginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Post-execution plugin
///
/// Plugins are registered on the [`Schema`](crate::core::schema::Schema) and
/// shared across queries, hence `Send + Sync`.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Stable, non-empty name used to attribute errors
    fn name(&self) -> &str;

    /// Whether this plugin wants to process the given field
    ///
    /// Called exactly once per resolved field instance, possibly from
    /// concurrently resolving fields. The response does not exist yet, so the
    /// decision can only depend on `info` and `ctx`.
    fn is_compatible(&self, ctx: &QueryContext, info: &ResolveInfo) -> bool;

    /// Process the response at `pointer`
    ///
    /// `data` is the *whole* response as transformed by every earlier
    /// execution; the returned value replaces it. Plugins are trusted to only
    /// touch the subtree at `pointer`.
    async fn execute(
        &self,
        ctx: &QueryContext,
        pointer: &str,
        data: Value,
        info: &ResolveInfo,
    ) -> PluginResult;
}

impl fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin").field("name", &self.name()).finish()
    }
}
