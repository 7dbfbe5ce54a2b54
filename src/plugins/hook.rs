//! Field resolution hook
//!
//! The executor calls [`on_field_resolved`] after every field's resolver has
//! produced a value. The hook asks each schema plugin whether it is
//! interested in that field and queues the interested ones.

use crate::core::context::QueryContext;
use crate::core::resolve_info::ResolveInfo;
use crate::plugins::registry::{PendingExecution, PluginExecutionRegistry};
use std::sync::Arc;

/// In-flight state of one query execution
#[derive(Debug, Default)]
pub struct ExecutionContext {
    pub context: QueryContext,
    pub registry: PluginExecutionRegistry,
}

impl ExecutionContext {
    pub fn new(context: QueryContext) -> Self {
        Self {
            context,
            registry: PluginExecutionRegistry::new(),
        }
    }

    /// Split into the query context and the (now frozen) registry
    pub fn into_parts(self) -> (QueryContext, PluginExecutionRegistry) {
        (self.context, self.registry)
    }
}

/// Queue every schema plugin compatible with the field described by `info`
///
/// Plugins are tested in schema declaration order, so a field matched by
/// several plugins gets its entries in that order.
pub fn on_field_resolved(ectx: &ExecutionContext, info: &ResolveInfo) {
    let mut captured: Option<Arc<ResolveInfo>> = None;

    for plugin in info.schema.plugins() {
        if !plugin.is_compatible(&ectx.context, info) {
            continue;
        }
        let info = captured
            .get_or_insert_with(|| Arc::new(info.clone()))
            .clone();
        ectx.registry
            .register(PendingExecution::new(info, plugin.clone()));
    }
}
