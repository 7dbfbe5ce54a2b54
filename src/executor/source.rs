//! Root field data sources

use crate::core::resolve_info::ArgumentValues;
use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::Value;

use super::utils;

/// Kind of operation a root field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// Trait for resolving root fields
///
/// Nested fields are read from the value returned here, so a source only
/// needs to know about the top level of the response.
#[async_trait]
pub trait FieldSource: Send + Sync {
    /// Resolve a root field of the given operation kind
    ///
    /// # Arguments
    /// * `kind` - Whether the field was selected by a query or a mutation
    /// * `field_name` - Schema name of the field (never the alias)
    /// * `args` - Argument values, variables already substituted
    async fn resolve_root_field(
        &self,
        kind: OperationKind,
        field_name: &str,
        args: &ArgumentValues,
    ) -> Result<Value>;
}

/// Serves queries from a fixed JSON object
///
/// Useful for testing and for post-processing data that was fetched
/// elsewhere. Mutations are rejected.
#[derive(Debug, Clone)]
pub struct JsonSource {
    root: Value,
}

impl JsonSource {
    pub fn new(root: Value) -> Self {
        Self { root }
    }
}

#[async_trait]
impl FieldSource for JsonSource {
    async fn resolve_root_field(
        &self,
        kind: OperationKind,
        field_name: &str,
        _args: &ArgumentValues,
    ) -> Result<Value> {
        if kind == OperationKind::Mutation {
            bail!("JsonSource is read-only, cannot run mutation '{}'", field_name);
        }

        Ok(self
            .root
            .as_object()
            .and_then(|root| utils::lookup_field(root, field_name))
            .cloned()
            .unwrap_or(Value::Null))
    }
}
