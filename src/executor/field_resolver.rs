//! Field resolution
//!
//! Walks the selection sets of an operation, resolving root fields through
//! the [`FieldSource`] and nested fields from their parent object. Every
//! successfully resolved field is reported to the plugin hook before its
//! sub-selections are completed.

use futures::future::{BoxFuture, FutureExt, join_all};
use graphql_parser::query::{Field, FragmentDefinition, Selection};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use super::source::{FieldSource, OperationKind};
use super::utils;
use crate::core::error::{FormattedError, GraphQLError};
use crate::core::path::ResponsePath;
use crate::core::resolve_info::ResolveInfo;
use crate::core::schema::Schema;
use crate::plugins::hook::{ExecutionContext, on_field_resolved};

/// Fields sharing a response key, in document order
type FieldGroup<'a, 'q> = Vec<&'a Field<'q, String>>;

/// Where the fields of a selection set read their values from
#[derive(Clone, Copy)]
pub(super) enum Parent<'f> {
    Root(OperationKind),
    Object(&'f Map<String, Value>),
}

/// Resolution state of one operation
pub(super) struct FieldResolver<'a, 'q> {
    ectx: &'a ExecutionContext,
    schema: &'a Arc<Schema>,
    source: &'a dyn FieldSource,
    fragments: HashMap<&'a str, &'a FragmentDefinition<'q, String>>,
    variables: &'a HashMap<String, Value>,
    parallel: bool,
    errors: Mutex<Vec<FormattedError>>,
}

impl<'a, 'q> FieldResolver<'a, 'q> {
    pub fn new(
        ectx: &'a ExecutionContext,
        schema: &'a Arc<Schema>,
        source: &'a dyn FieldSource,
        fragments: HashMap<&'a str, &'a FragmentDefinition<'q, String>>,
        variables: &'a HashMap<String, Value>,
        parallel: bool,
    ) -> Self {
        Self {
            ectx,
            schema,
            source,
            fragments,
            variables,
            parallel,
            errors: Mutex::new(Vec::new()),
        }
    }

    /// Field errors recorded so far
    pub fn into_errors(self) -> Vec<FormattedError> {
        self.errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve a selection set into a JSON object
    ///
    /// Siblings run concurrently unless parallel resolution is disabled or the
    /// parent is a mutation root.
    pub fn resolve_object<'f>(
        &'f self,
        parent: Parent<'f>,
        path: &'f ResponsePath,
        selection_sets: &'f [&'a [Selection<'q, String>]],
    ) -> BoxFuture<'f, Value> {
        async move {
            let grouped = self.collect_fields(selection_sets);
            let serial =
                !self.parallel || matches!(parent, Parent::Root(OperationKind::Mutation));

            let mut result = Map::new();
            if serial {
                for (key, fields) in &grouped {
                    let value = self.resolve_field(parent, path, fields).await;
                    result.insert((*key).to_string(), value);
                }
            } else {
                let values = join_all(
                    grouped
                        .values()
                        .map(|fields| self.resolve_field(parent, path, fields)),
                )
                .await;
                for (key, value) in grouped.keys().zip(values) {
                    result.insert((*key).to_string(), value);
                }
            }

            Value::Object(result)
        }
        .boxed()
    }

    /// Resolve one response key
    fn resolve_field<'f>(
        &'f self,
        parent: Parent<'f>,
        parent_path: &'f ResponsePath,
        fields: &'f [&'a Field<'q, String>],
    ) -> BoxFuture<'f, Value> {
        async move {
            let field = fields[0];
            let field_name = field.name.as_str();
            let key = field.alias.as_deref().unwrap_or(field_name);
            let path = parent_path.child_field(key);
            let args = utils::argument_values(field, self.variables);

            let resolved = match parent {
                Parent::Root(kind) => {
                    self.source
                        .resolve_root_field(kind, field_name, &args)
                        .await
                }
                Parent::Object(object) => Ok(utils::lookup_field(object, field_name)
                    .cloned()
                    .unwrap_or(Value::Null)),
            };

            let value = match resolved {
                Ok(value) => value,
                Err(err) => {
                    self.record_error(
                        GraphQLError::FieldResolutionError {
                            field: field_name.to_string(),
                            message: err.to_string(),
                        },
                        path,
                    );
                    return Value::Null;
                }
            };

            let info = ResolveInfo::new(field_name, path.clone(), args, self.schema.clone());
            on_field_resolved(self.ectx, &info);

            let selection_sets: Vec<&'a [Selection<'q, String>]> = fields
                .iter()
                .copied()
                .map(|f| f.selection_set.items.as_slice())
                .filter(|items| !items.is_empty())
                .collect();
            if selection_sets.is_empty() {
                return value;
            }

            self.complete_value(value, &path, &selection_sets).await
        }
        .boxed()
    }

    /// Apply sub-selections to a resolved value, descending into lists
    fn complete_value<'f>(
        &'f self,
        value: Value,
        path: &'f ResponsePath,
        selection_sets: &'f [&'a [Selection<'q, String>]],
    ) -> BoxFuture<'f, Value> {
        async move {
            match value {
                Value::Array(items) => {
                    let paths: Vec<ResponsePath> =
                        (0..items.len()).map(|i| path.child_index(i)).collect();
                    let pending = items.into_iter().zip(paths.iter()).map(
                        move |(item, item_path)| {
                            self.complete_value(item, item_path, selection_sets)
                        },
                    );

                    let completed = if self.parallel {
                        join_all(pending).await
                    } else {
                        let mut completed = Vec::new();
                        for item in pending {
                            completed.push(item.await);
                        }
                        completed
                    };
                    Value::Array(completed)
                }
                Value::Object(object) => {
                    self.resolve_object(Parent::Object(&object), path, selection_sets)
                        .await
                }
                other => other,
            }
        }
        .boxed()
    }

    /// Group the fields of some selection sets by response key
    ///
    /// Fragment spreads and inline fragments are flattened; there is no type
    /// system to evaluate type conditions against.
    fn collect_fields(
        &self,
        selection_sets: &[&'a [Selection<'q, String>]],
    ) -> IndexMap<&'a str, FieldGroup<'a, 'q>> {
        let mut grouped = IndexMap::new();
        let mut visited = HashSet::new();
        for selections in selection_sets.iter().copied() {
            self.collect_into(selections, &mut grouped, &mut visited);
        }
        grouped
    }

    fn collect_into(
        &self,
        selections: &'a [Selection<'q, String>],
        grouped: &mut IndexMap<&'a str, FieldGroup<'a, 'q>>,
        visited: &mut HashSet<&'a str>,
    ) {
        for selection in selections {
            match selection {
                Selection::Field(field) => {
                    if !utils::should_include(&field.directives, self.variables) {
                        continue;
                    }
                    let key = field.alias.as_deref().unwrap_or(field.name.as_str());
                    grouped.entry(key).or_default().push(field);
                }
                Selection::FragmentSpread(spread) => {
                    if !utils::should_include(&spread.directives, self.variables) {
                        continue;
                    }
                    let name = spread.fragment_name.as_str();
                    if !visited.insert(name) {
                        continue;
                    }
                    match self.fragments.get(name).copied() {
                        Some(fragment) => {
                            self.collect_into(&fragment.selection_set.items, grouped, visited)
                        }
                        None => tracing::debug!(fragment = %name, "Unknown fragment ignored"),
                    }
                }
                Selection::InlineFragment(inline) => {
                    if utils::should_include(&inline.directives, self.variables) {
                        self.collect_into(&inline.selection_set.items, grouped, visited);
                    }
                }
            }
        }
    }

    fn record_error(&self, err: GraphQLError, path: ResponsePath) {
        tracing::warn!(path = %path, error = %err, "Field resolution failed");
        let formatted = FormattedError::from(&err).with_path(path);
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(formatted);
    }
}
