//! Field redaction plugin

use crate::core::context::QueryContext;
use crate::core::resolve_info::ResolveInfo;
use crate::plugins::subtree::{FieldTransform, SubtreePlugin};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;

pub const DEFAULT_MASK: &str = "***";

/// Replaces the value of sensitive fields with a mask
///
/// A field is sensitive when its schema name (aliases do not matter) is one
/// of the configured names. `null` values stay `null`.
#[derive(Debug, Clone)]
pub struct Redact {
    fields: HashSet<String>,
    mask: Value,
}

impl Redact {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            mask: Value::String(DEFAULT_MASK.to_string()),
        }
    }

    pub fn with_mask(mut self, mask: impl Into<Value>) -> Self {
        self.mask = mask.into();
        self
    }

    /// Wrap into a plugin ready to be registered on a schema
    pub fn into_plugin(self) -> RedactPlugin {
        SubtreePlugin::new(self)
    }
}

pub type RedactPlugin = SubtreePlugin<Redact>;

#[async_trait]
impl FieldTransform for Redact {
    fn name(&self) -> &str {
        "Redact"
    }

    fn is_compatible(&self, _ctx: &QueryContext, info: &ResolveInfo) -> bool {
        self.fields.contains(&info.field_name)
    }

    async fn transform(
        &self,
        _ctx: &QueryContext,
        value: Value,
        _info: &ResolveInfo,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }
        Ok(self.mask.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::path::ResponsePath;
    use crate::core::plugin::Plugin;
    use crate::core::resolve_info::ArgumentValues;
    use crate::core::schema::Schema;
    use serde_json::json;
    use std::sync::Arc;

    fn info(field_name: &str, path: ResponsePath) -> ResolveInfo {
        ResolveInfo::new(
            field_name,
            path,
            ArgumentValues::new(),
            Arc::new(Schema::default()),
        )
    }

    #[test]
    fn test_compatible_by_field_name_not_alias() {
        let plugin = Redact::new(["ssn"]).into_plugin();
        let ctx = QueryContext::new();

        let aliased = info("ssn", ResponsePath::root().child_field("secret"));
        let other = info("name", ResponsePath::root().child_field("ssn"));

        assert!(plugin.is_compatible(&ctx, &aliased));
        assert!(!plugin.is_compatible(&ctx, &other));
    }

    #[tokio::test]
    async fn test_masks_value_and_keeps_null() {
        let plugin = Redact::new(["ssn"]).with_mask(json!(null)).into_plugin();
        let ctx = QueryContext::new();
        let path = ResponsePath::root().child_field("user").child_field("ssn");

        let data = plugin
            .execute(
                &ctx,
                "/user/ssn",
                json!({"user": {"ssn": "123"}}),
                &info("ssn", path.clone()),
            )
            .await
            .expect("redaction should succeed");
        assert_eq!(data, json!({"user": {"ssn": null}}));

        let plugin = Redact::new(["ssn"]).into_plugin();
        let data = plugin
            .execute(
                &ctx,
                "/user/ssn",
                json!({"user": {"ssn": null}}),
                &info("ssn", path),
            )
            .await
            .expect("redaction should succeed");
        assert_eq!(data, json!({"user": {"ssn": null}}));
        assert_eq!(plugin.name(), "Redact");
    }
}
