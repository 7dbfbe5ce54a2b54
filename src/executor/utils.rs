//! Utility functions for GraphQL execution

use crate::core::resolve_info::ArgumentValues;
use graphql_parser::query::{Directive, Field, Value as GqlValue, VariableDefinition};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Convert a GraphQL value to JSON, substituting variables
///
/// Unknown variables become `null`.
pub fn gql_value_to_json(
    value: &GqlValue<'_, String>,
    variables: &HashMap<String, Value>,
) -> Value {
    match value {
        GqlValue::Null => Value::Null,
        GqlValue::Int(i) => json!(i.as_i64().unwrap_or(0)),
        GqlValue::Float(f) => json!(f),
        GqlValue::String(s) => json!(s),
        GqlValue::Boolean(b) => json!(b),
        GqlValue::Enum(e) => json!(e),
        GqlValue::List(list) => Value::Array(
            list.iter()
                .map(|item| gql_value_to_json(item, variables))
                .collect(),
        ),
        GqlValue::Object(obj) => {
            let mut map = serde_json::Map::new();
            for (k, v) in obj {
                map.insert(k.clone(), gql_value_to_json(v, variables));
            }
            Value::Object(map)
        }
        GqlValue::Variable(name) => variables.get(name).cloned().unwrap_or(Value::Null),
    }
}

/// Argument values of a field, in the order they were written
pub fn argument_values(
    field: &Field<'_, String>,
    variables: &HashMap<String, Value>,
) -> ArgumentValues {
    field
        .arguments
        .iter()
        .map(|(name, value)| (name.clone(), gql_value_to_json(value, variables)))
        .collect()
}

/// Merge provided variables with the defaults declared by the operation
pub fn coerce_variables(
    definitions: &[VariableDefinition<'_, String>],
    provided: HashMap<String, Value>,
) -> HashMap<String, Value> {
    let mut variables = provided;
    for definition in definitions {
        if variables.contains_key(&definition.name) {
            continue;
        }
        if let Some(default) = &definition.default_value {
            let value = gql_value_to_json(default, &HashMap::new());
            variables.insert(definition.name.clone(), value);
        }
    }
    variables
}

/// Evaluate `@skip(if:)` and `@include(if:)`
pub fn should_include(
    directives: &[Directive<'_, String>],
    variables: &HashMap<String, Value>,
) -> bool {
    for directive in directives {
        let condition = directive
            .arguments
            .iter()
            .find(|(name, _)| name.as_str() == "if")
            .map(|(_, value)| gql_value_to_json(value, variables))
            .and_then(|value| value.as_bool());

        match (directive.name.as_str(), condition) {
            ("skip", Some(true)) => return false,
            ("include", Some(false)) => return false,
            _ => {}
        }
    }
    true
}

/// Convert camelCase to snake_case
pub fn camel_to_snake(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Read a field from a JSON object, falling back to its snake_case name
pub fn lookup_field<'v>(
    object: &'v serde_json::Map<String, Value>,
    field_name: &str,
) -> Option<&'v Value> {
    object
        .get(field_name)
        .or_else(|| object.get(&camel_to_snake(field_name)))
}
