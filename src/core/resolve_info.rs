//! Per-field resolution context

use crate::core::path::ResponsePath;
use crate::core::schema::Schema;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Argument values of a field, in the order they were written
pub type ArgumentValues = IndexMap<String, Value>;

/// What the executor knows about a field at the moment it was resolved
///
/// Captured by the registry when a plugin declares interest, and handed back
/// to that plugin during the post-pass.
#[derive(Debug, Clone)]
pub struct ResolveInfo {
    /// Field name as declared in the schema (never the alias)
    pub field_name: String,

    /// Location of the field in the response (uses the alias when present)
    pub path: ResponsePath,

    /// Argument values supplied to the field, variables already substituted
    pub argument_values: ArgumentValues,

    /// The schema the field was resolved against
    pub schema: Arc<Schema>,
}

impl ResolveInfo {
    pub fn new(
        field_name: impl Into<String>,
        path: ResponsePath,
        argument_values: ArgumentValues,
        schema: Arc<Schema>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            path,
            argument_values,
            schema,
        }
    }

    /// Get an argument value by name
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.argument_values.get(name)
    }

    /// Pointer addressing this field in the response
    pub fn pointer(&self) -> String {
        self.path.to_pointer()
    }
}
