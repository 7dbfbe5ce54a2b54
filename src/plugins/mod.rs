//! Post-execution plugin pipeline
//!
//! - `hook`: per-field collection of compatible plugins
//! - `registry`: ordered pending executions and the post-pass driver
//! - `subtree`: adapter for plugins that only transform their own field
//! - `redact`: built-in field redaction

pub mod hook;
pub mod redact;
pub mod registry;
pub mod subtree;

pub use hook::{ExecutionContext, on_field_resolved};
pub use redact::{Redact, RedactPlugin};
pub use registry::{PendingExecution, PluginExecutionRegistry};
pub use subtree::{FieldTransform, SubtreePlugin};
