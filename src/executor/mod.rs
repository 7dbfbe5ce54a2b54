//! GraphQL executor module
//!
//! A small schemaless executor that drives the plugin pipeline: it resolves
//! an operation against a [`FieldSource`], reports every resolved field to
//! the plugin hook, and runs the post-pass on the assembled response.
//!
//! - `core`: operation selection and orchestration
//! - `field_resolver`: selection set walking and field resolution
//! - `source`: root field data sources
//! - `utils`: argument, variable and directive helpers

#[cfg(feature = "executor")]
mod core;
#[cfg(feature = "executor")]
mod field_resolver;
#[cfg(feature = "executor")]
pub mod source;
#[cfg(feature = "executor")]
pub mod utils;

#[cfg(feature = "executor")]
pub use self::core::{ExecutionResult, GraphQLExecutor};
#[cfg(feature = "executor")]
pub use source::{FieldSource, JsonSource, OperationKind};
