//! # This-RS Plugins
//!
//! A post-execution plugin pipeline for GraphQL executors.
//!
//! Plugins observe which fields were resolved during a query, decide per
//! field whether they are interested, and once the whole response is
//! assembled transform it at the location of every field they claimed.
//!
//! ## Features
//!
//! - **Two-phase protocol**: compatibility is decided during resolution, data
//!   is only touched after the response is complete
//! - **Ordered post-pass**: executions run in registration order, each one
//!   seeing the output of the previous
//! - **Partial success**: a failing plugin is reported in the `errors` list
//!   without stopping the others
//! - **Pointer addressing**: fields are located by `/`-separated paths
//! - **Bundled executor**: a schemaless executor over `serde_json` values
//!   (feature `executor`, on by default)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use this_plugins::prelude::*;
//!
//! let schema = Schema::builder()
//!     .plugin(Redact::new(["ssn"]).into_plugin())
//!     .build();
//!
//! let source = Arc::new(JsonSource::new(json!({
//!     "user": {"name": "Ada", "ssn": "078-05-1120"}
//! })));
//!
//! let result = GraphQLExecutor::new(schema, source)
//!     .execute("{ user { name ssn } }", None)
//!     .await?;
//!
//! assert_eq!(result.data["user"]["ssn"], "***");
//! ```

pub mod config;
pub mod core;
pub mod executor;
pub mod plugins;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        context::QueryContext,
        error::{FormattedError, GraphQLError, PipelineError, PluginError},
        path::{PathSegment, ResponsePath, construct_pointer},
        plugin::{Plugin, PluginFailure, PluginResult},
        resolve_info::{ArgumentValues, ResolveInfo},
        schema::{Schema, SchemaBuilder},
    };

    // === Pipeline ===
    pub use crate::plugins::{
        ExecutionContext, FieldTransform, PendingExecution, PluginExecutionRegistry, Redact,
        RedactPlugin, SubtreePlugin, on_field_resolved,
    };

    // === Config ===
    pub use crate::config::{ExecutionConfig, PipelineConfig, PostPassConfig};

    // === Executor ===
    #[cfg(feature = "executor")]
    pub use crate::executor::{
        ExecutionResult, FieldSource, GraphQLExecutor, JsonSource, OperationKind,
    };

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
    pub use tokio_util::sync::CancellationToken;
}
