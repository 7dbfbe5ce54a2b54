//! Core module containing the plugin contract and the types it is built on

pub mod context;
pub mod error;
pub mod path;
pub mod plugin;
pub mod resolve_info;
pub mod schema;

pub use context::QueryContext;
pub use error::{ConfigError, FormattedError, GraphQLError, PipelineError, PluginError};
pub use path::{PathSegment, ResponsePath, construct_pointer};
pub use plugin::{Plugin, PluginFailure, PluginResult};
pub use resolve_info::{ArgumentValues, ResolveInfo};
pub use schema::{Schema, SchemaBuilder};
