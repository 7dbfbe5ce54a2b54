//! Subtree-scoped plugins
//!
//! [`Plugin::execute`] sees the whole response and is trusted to touch only
//! its own pointer. Most plugins only care about the value at that pointer;
//! [`SubtreePlugin`] lets them implement [`FieldTransform`] instead and takes
//! care of locating the value and splicing the result back in.

use crate::core::context::QueryContext;
use crate::core::path::locate_mut;
use crate::core::plugin::{Plugin, PluginFailure, PluginResult};
use crate::core::resolve_info::ResolveInfo;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;

/// A transformation of the value of a single field
#[async_trait]
pub trait FieldTransform: Send + Sync {
    /// See [`Plugin::name`]
    fn name(&self) -> &str;

    /// See [`Plugin::is_compatible`]
    fn is_compatible(&self, ctx: &QueryContext, info: &ResolveInfo) -> bool;

    /// Map the field's current value to its new value
    async fn transform(&self, ctx: &QueryContext, value: Value, info: &ResolveInfo)
    -> Result<Value>;
}

/// Adapts a [`FieldTransform`] into a [`Plugin`]
///
/// When the pointer does not resolve (the field was nulled out, or an earlier
/// plugin restructured the response) or the transform fails, the response is
/// returned unchanged together with the error.
pub struct SubtreePlugin<T> {
    inner: T,
}

impl<T: FieldTransform> SubtreePlugin<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: FieldTransform> Plugin for SubtreePlugin<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_compatible(&self, ctx: &QueryContext, info: &ResolveInfo) -> bool {
        self.inner.is_compatible(ctx, info)
    }

    async fn execute(
        &self,
        ctx: &QueryContext,
        pointer: &str,
        mut data: Value,
        info: &ResolveInfo,
    ) -> PluginResult {
        let Some(slot) = locate_mut(&mut data, pointer) else {
            return Err(PluginFailure::unchanged(
                data,
                anyhow!("no value at '{}'", pointer),
            ));
        };

        match self.inner.transform(ctx, slot.clone(), info).await {
            Ok(transformed) => {
                *slot = transformed;
                Ok(data)
            }
            Err(err) => Err(PluginFailure::unchanged(data, err)),
        }
    }
}
