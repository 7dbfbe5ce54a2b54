//! Query-scoped context handed to plugins

use tokio_util::sync::CancellationToken;

/// Ambient context of one query execution
///
/// Passed to both [`Plugin::is_compatible`](crate::core::plugin::Plugin::is_compatible)
/// and [`Plugin::execute`](crate::core::plugin::Plugin::execute). The pipeline
/// itself never enforces cancellation unless configured to; plugins that do
/// long-running work should watch the token themselves.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    cancellation: CancellationToken,
    operation_name: Option<String>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context bound to an existing cancellation token
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            operation_name: None,
        }
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Cancel the query; every clone of this context observes it
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}
