//! Core GraphQL executor orchestration

use graphql_parser::query::{
    Definition, Document, FragmentDefinition, OperationDefinition, Selection, VariableDefinition,
    parse_query,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::field_resolver::{FieldResolver, Parent};
use super::source::{FieldSource, OperationKind};
use super::utils;
use crate::config::PipelineConfig;
use crate::core::context::QueryContext;
use crate::core::error::{FormattedError, GraphQLError};
use crate::core::path::ResponsePath;
use crate::core::schema::Schema;
use crate::plugins::hook::ExecutionContext;

/// Response envelope of an executed operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub data: Value,

    /// Field resolution errors followed by plugin execution errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FormattedError>,
}

/// The operation picked out of a document
struct SelectedOperation<'a, 'q> {
    kind: OperationKind,
    variable_definitions: &'a [VariableDefinition<'q, String>],
    selections: &'a [Selection<'q, String>],
}

/// GraphQL executor running the plugin pipeline around field resolution
pub struct GraphQLExecutor {
    schema: Arc<Schema>,
    source: Arc<dyn FieldSource>,
    config: PipelineConfig,
}

impl GraphQLExecutor {
    /// Create a new executor with the default configuration
    pub fn new(schema: Arc<Schema>, source: Arc<dyn FieldSource>) -> Self {
        Self {
            schema,
            source,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute a GraphQL query with a fresh context
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<HashMap<String, Value>>,
    ) -> Result<ExecutionResult, GraphQLError> {
        self.execute_with_context(QueryContext::new(), query, variables)
            .await
    }

    /// Execute a GraphQL query within the given context
    ///
    /// The context's operation name selects the operation when the document
    /// holds more than one. Request-level problems (parse errors, no runnable
    /// operation) are returned as `Err`; field and plugin failures end up in
    /// [`ExecutionResult::errors`] next to the data.
    pub async fn execute_with_context(
        &self,
        ctx: QueryContext,
        query: &str,
        variables: Option<HashMap<String, Value>>,
    ) -> Result<ExecutionResult, GraphQLError> {
        let doc = parse_query::<String>(query).map_err(|e| GraphQLError::ParseError {
            message: e.to_string(),
        })?;

        let operation = select_operation(&doc, ctx.operation_name())?;
        let fragments = collect_fragments(&doc);
        let variables =
            utils::coerce_variables(operation.variable_definitions, variables.unwrap_or_default());

        let ectx = ExecutionContext::new(ctx);
        let resolver = FieldResolver::new(
            &ectx,
            &self.schema,
            self.source.as_ref(),
            fragments,
            &variables,
            self.config.execution.parallel_fields,
        );

        let root_path = ResponsePath::root();
        let selection_sets = [operation.selections];
        let data = resolver
            .resolve_object(Parent::Root(operation.kind), &root_path, &selection_sets)
            .await;
        let mut errors = resolver.into_errors();

        // Resolution is complete: no more registrations can happen.
        let (ctx, registry) = ectx.into_parts();
        tracing::debug!(
            pending = registry.len(),
            field_errors = errors.len(),
            "Resolution finished, running plugins"
        );
        let (data, plugin_errors) = registry.execute(&ctx, data, &self.config.post_pass).await;
        errors.extend(plugin_errors);

        Ok(ExecutionResult { data, errors })
    }
}

/// Pick the operation to run, by name when one is given
fn select_operation<'a, 'q>(
    doc: &'a Document<'q, String>,
    operation_name: Option<&str>,
) -> Result<SelectedOperation<'a, 'q>, GraphQLError> {
    let operations: Vec<&OperationDefinition<'q, String>> = doc
        .definitions
        .iter()
        .filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
        .collect();

    let operation = match operation_name {
        Some(name) => operations
            .iter()
            .copied()
            .find(|op| operation_name_of(op) == Some(name))
            .ok_or_else(|| GraphQLError::InvalidOperation {
                operation: name.to_string(),
                message: "Unknown operation name".to_string(),
            })?,
        None => match operations.as_slice() {
            [single] => *single,
            [] => {
                return Err(GraphQLError::InvalidOperation {
                    operation: "<anonymous>".to_string(),
                    message: "No operation found in query".to_string(),
                });
            }
            _ => {
                return Err(GraphQLError::InvalidOperation {
                    operation: "<anonymous>".to_string(),
                    message: "Operation name required when the query holds several operations"
                        .to_string(),
                });
            }
        },
    };

    match operation {
        OperationDefinition::SelectionSet(set) => Ok(SelectedOperation {
            kind: OperationKind::Query,
            variable_definitions: &[],
            selections: &set.items,
        }),
        OperationDefinition::Query(query) => Ok(SelectedOperation {
            kind: OperationKind::Query,
            variable_definitions: &query.variable_definitions,
            selections: &query.selection_set.items,
        }),
        OperationDefinition::Mutation(mutation) => Ok(SelectedOperation {
            kind: OperationKind::Mutation,
            variable_definitions: &mutation.variable_definitions,
            selections: &mutation.selection_set.items,
        }),
        OperationDefinition::Subscription(_) => Err(GraphQLError::Unsupported {
            kind: "Subscription".to_string(),
        }),
    }
}

fn operation_name_of<'a>(operation: &'a OperationDefinition<'_, String>) -> Option<&'a str> {
    match operation {
        OperationDefinition::SelectionSet(_) => None,
        OperationDefinition::Query(query) => query.name.as_deref(),
        OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
        OperationDefinition::Subscription(subscription) => subscription.name.as_deref(),
    }
}

fn collect_fragments<'a, 'q>(
    doc: &'a Document<'q, String>,
) -> HashMap<&'a str, &'a FragmentDefinition<'q, String>> {
    doc.definitions
        .iter()
        .filter_map(|def| match def {
            Definition::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
            Definition::Operation(_) => None,
        })
        .collect()
}
