//! Plugin execution registry
//!
//! The registry is filled while a query resolves (one [`PendingExecution`] per
//! field a plugin declared interest in) and drained exactly once after the
//! response is assembled.
//!
//! # Ordering
//!
//! Entries run in insertion order. With concurrent field resolution that is
//! the order in which resolutions completed, not document order. Appends from
//! concurrent resolvers are serialized by a mutex, so there is a single total
//! order and no append is ever lost.

use crate::config::PostPassConfig;
use crate::core::context::QueryContext;
use crate::core::error::{FormattedError, PluginError};
use crate::core::plugin::Plugin;
use crate::core::resolve_info::ResolveInfo;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A plugin execution queued for the post-pass
#[derive(Debug, Clone)]
pub struct PendingExecution {
    info: Arc<ResolveInfo>,
    plugin: Arc<dyn Plugin>,
}

impl PendingExecution {
    pub fn new(info: Arc<ResolveInfo>, plugin: Arc<dyn Plugin>) -> Self {
        Self { info, plugin }
    }

    pub fn info(&self) -> &ResolveInfo {
        &self.info
    }

    pub fn plugin_name(&self) -> &str {
        self.plugin.name()
    }
}

/// Ordered, append-only collection of pending executions for one query
#[derive(Debug, Default)]
pub struct PluginExecutionRegistry {
    entries: Mutex<Vec<PendingExecution>>,
}

impl PluginExecutionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an execution; safe to call from concurrently resolving fields
    pub fn register(&self, execution: PendingExecution) {
        tracing::debug!(
            plugin = %execution.plugin_name(),
            path = %execution.info.path,
            "Plugin execution registered"
        );
        self.lock().push(execution);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the registered entries, in order
    pub fn snapshot(&self) -> Vec<PendingExecution> {
        self.lock().clone()
    }

    // A panic in another resolver must not lose registrations.
    fn lock(&self) -> MutexGuard<'_, Vec<PendingExecution>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn into_entries(self) -> Vec<PendingExecution> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run every registered execution against the assembled response
    ///
    /// Executions run sequentially in registry order; each receives the value
    /// returned by the previous one. A failing plugin does not stop the pass:
    /// its error is formatted as `"<PluginName>.PluginExecution: <error>"` and
    /// the data it returned becomes the new working value.
    ///
    /// Consumes the registry, so a query's executions can only be drained once.
    pub async fn execute(
        self,
        ctx: &QueryContext,
        data: Value,
        config: &PostPassConfig,
    ) -> (Value, Vec<FormattedError>) {
        let entries = self.into_entries();
        let total = entries.len();
        let mut data = data;
        let mut errors = Vec::new();

        for (position, entry) in entries.iter().enumerate() {
            if config.check_cancellation && ctx.is_cancelled() {
                let err = PluginError::Cancelled {
                    skipped: total - position,
                };
                tracing::warn!(skipped = total - position, "Post-pass cancelled");
                errors.push(FormattedError::from(&err));
                break;
            }

            let pointer = entry.info.path.to_pointer();
            tracing::debug!(
                plugin = %entry.plugin_name(),
                pointer = %pointer,
                "Executing plugin"
            );

            data = match entry.plugin.execute(ctx, &pointer, data, &entry.info).await {
                Ok(data) => data,
                Err(failure) => {
                    let err = PluginError::execution(entry.plugin_name(), failure.error);
                    tracing::warn!(
                        plugin = %entry.plugin_name(),
                        pointer = %pointer,
                        error = %err,
                        "Plugin execution failed"
                    );
                    let mut formatted = FormattedError::from(&err);
                    if config.attach_paths {
                        formatted = formatted.with_path(entry.info.path.clone());
                    }
                    errors.push(formatted);
                    failure.data
                }
            };
        }

        tracing::debug!(
            executions = total,
            failures = errors.len(),
            "Post-pass finished"
        );

        (data, errors)
    }
}
