//! Schema-level plugin list

use crate::core::plugin::Plugin;
use std::sync::Arc;

/// The part of a GraphQL schema the plugin pipeline cares about
///
/// Owns the ordered list of registered plugins. The list is fixed once the
/// schema is built; every [`ResolveInfo`](crate::core::resolve_info::ResolveInfo)
/// carries a reference back to it.
#[derive(Debug, Default)]
pub struct Schema {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Registered plugins, in declaration order
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }
}

/// Builder for [`Schema`]
#[derive(Default)]
pub struct SchemaBuilder {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl SchemaBuilder {
    /// Append a plugin; declaration order is evaluation order
    pub fn plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Append an already shared plugin
    pub fn shared_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn build(self) -> Arc<Schema> {
        tracing::debug!(
            plugins = ?self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "Schema built"
        );
        Arc::new(Schema {
            plugins: self.plugins,
        })
    }
}
