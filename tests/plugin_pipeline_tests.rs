//! Tests for the plugin pipeline
//!
//! These tests verify that:
//! - Compatibility gating decides which executions get registered
//! - Executions run in registration order, threading the response through
//! - A failing plugin is attributed and never stops the others
//! - Redaction works end to end through the executor

use anyhow::Context;
use std::sync::Mutex;
use this_plugins::prelude::*;

// =============================================================================
// Test plugins
// =============================================================================

/// Writes a marker at its pointer, appending to whatever is already there
struct Stamp {
    name: &'static str,
    field: &'static str,
}

#[async_trait]
impl Plugin for Stamp {
    fn name(&self) -> &str {
        self.name
    }

    fn is_compatible(&self, _ctx: &QueryContext, info: &ResolveInfo) -> bool {
        info.field_name == self.field
    }

    async fn execute(
        &self,
        _ctx: &QueryContext,
        pointer: &str,
        mut data: Value,
        _info: &ResolveInfo,
    ) -> PluginResult {
        if let Some(slot) = data.pointer_mut(pointer) {
            let current = slot.as_str().unwrap_or_default().to_string();
            *slot = json!(format!("{}+{}", current, self.name));
        }
        Ok(data)
    }
}

/// Replaces the value at its pointer with `***`, failing for one pointer
struct WholeResponseRedact {
    fail_at: Option<&'static str>,
}

#[async_trait]
impl Plugin for WholeResponseRedact {
    fn name(&self) -> &str {
        "Redact"
    }

    fn is_compatible(&self, _ctx: &QueryContext, info: &ResolveInfo) -> bool {
        info.field_name == "ssn"
    }

    async fn execute(
        &self,
        _ctx: &QueryContext,
        pointer: &str,
        mut data: Value,
        _info: &ResolveInfo,
    ) -> PluginResult {
        if self.fail_at == Some(pointer) {
            return Err(PluginFailure::unchanged(
                data,
                anyhow::anyhow!("refusing to redact {}", pointer),
            ));
        }
        match data.pointer_mut(pointer) {
            Some(slot) => {
                *slot = json!("***");
                Ok(data)
            }
            None => Err(PluginFailure::unchanged(
                data,
                anyhow::anyhow!("nothing at {}", pointer),
            )),
        }
    }
}

/// Fails with a context-wrapped error at every `ssn` field
struct MaskTableLoader;

#[async_trait]
impl Plugin for MaskTableLoader {
    fn name(&self) -> &str {
        "MaskTableLoader"
    }

    fn is_compatible(&self, _ctx: &QueryContext, info: &ResolveInfo) -> bool {
        info.field_name == "ssn"
    }

    async fn execute(
        &self,
        _ctx: &QueryContext,
        _pointer: &str,
        data: Value,
        _info: &ResolveInfo,
    ) -> PluginResult {
        let loaded: anyhow::Result<()> =
            Err(anyhow::anyhow!("connection refused")).context("loading mask table");
        match loaded {
            Ok(()) => Ok(data),
            Err(err) => Err(PluginFailure::unchanged(data, err)),
        }
    }
}

/// Never interested in anything
struct Never;

#[async_trait]
impl Plugin for Never {
    fn name(&self) -> &str {
        "Never"
    }

    fn is_compatible(&self, _ctx: &QueryContext, _info: &ResolveInfo) -> bool {
        false
    }

    async fn execute(
        &self,
        _ctx: &QueryContext,
        _pointer: &str,
        _data: Value,
        _info: &ResolveInfo,
    ) -> PluginResult {
        panic!("an incompatible plugin must never execute");
    }
}

/// Records the pointers it is executed at, in order
struct Recorder {
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Plugin for Recorder {
    fn name(&self) -> &str {
        "Recorder"
    }

    fn is_compatible(&self, _ctx: &QueryContext, info: &ResolveInfo) -> bool {
        info.path.len() == 1
    }

    async fn execute(
        &self,
        _ctx: &QueryContext,
        pointer: &str,
        data: Value,
        _info: &ResolveInfo,
    ) -> PluginResult {
        self.seen
            .lock()
            .expect("lock poisoned")
            .push(pointer.to_string());
        Ok(data)
    }
}

fn people() -> Value {
    json!({
        "user": {"name": "Ada", "ssn": "111-11-1111"},
        "admin": {"name": "Grace", "ssn": "222-22-2222"}
    })
}

fn serial_config() -> PipelineConfig {
    PipelineConfig {
        execution: ExecutionConfig {
            parallel_fields: false,
        },
        ..PipelineConfig::default()
    }
}

// =============================================================================
// Registration Tests
// =============================================================================

mod registration_tests {
    use super::*;

    #[tokio::test]
    async fn test_incompatible_plugin_never_registered() {
        let schema = Schema::builder().plugin(Never).build();
        let executor = GraphQLExecutor::new(schema, Arc::new(JsonSource::new(people())));

        let result = executor
            .execute("{ user { name ssn } admin { name ssn } }", None)
            .await
            .expect("query should succeed");

        assert!(result.errors.is_empty());
        assert_eq!(result.data, people());
    }

    #[test]
    fn test_two_compatible_plugins_create_two_entries_in_schema_order() {
        let schema = Schema::builder()
            .plugin(Stamp {
                name: "P1",
                field: "ssn",
            })
            .plugin(Never)
            .plugin(Stamp {
                name: "P2",
                field: "ssn",
            })
            .build();
        let ectx = ExecutionContext::default();
        let info = ResolveInfo::new(
            "ssn",
            ResponsePath::root().child_field("user").child_field("ssn"),
            ArgumentValues::new(),
            schema.clone(),
        );

        on_field_resolved(&ectx, &info);

        let entries = ectx.registry.snapshot();
        let names: Vec<&str> = entries.iter().map(|e| e.plugin_name()).collect();
        assert_eq!(names, vec!["P1", "P2"]);
        assert!(entries.iter().all(|e| e.info().pointer() == "/user/ssn"));
    }

    #[tokio::test]
    async fn test_list_items_register_one_entry_each() {
        let schema = Schema::builder().plugin(Redact::new(["ssn"]).into_plugin()).build();
        let source = JsonSource::new(json!({
            "users": [
                {"ssn": "1"},
                {"ssn": "2"},
                {"ssn": null}
            ]
        }));
        let executor = GraphQLExecutor::new(schema, Arc::new(source));

        let result = executor
            .execute("{ users { ssn } }", None)
            .await
            .expect("query should succeed");

        assert!(result.errors.is_empty());
        assert_eq!(
            result.data,
            json!({"users": [{"ssn": "***"}, {"ssn": "***"}, {"ssn": null}]})
        );
    }
}

// =============================================================================
// Post-Pass Tests
// =============================================================================

mod post_pass_tests {
    use super::*;

    #[tokio::test]
    async fn test_second_plugin_sees_first_plugins_output() {
        let schema = Schema::builder()
            .plugin(Stamp {
                name: "P1",
                field: "ssn",
            })
            .plugin(Stamp {
                name: "P2",
                field: "ssn",
            })
            .build();
        let source = JsonSource::new(json!({"user": {"ssn": "raw"}}));
        let executor = GraphQLExecutor::new(schema, Arc::new(source));

        let result = executor
            .execute("{ user { ssn } }", None)
            .await
            .expect("query should succeed");

        assert_eq!(result.data, json!({"user": {"ssn": "raw+P1+P2"}}));
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_attributed() {
        let schema = Schema::builder()
            .plugin(WholeResponseRedact {
                fail_at: Some("/user/ssn"),
            })
            .plugin(Stamp {
                name: "P2",
                field: "name",
            })
            .build();
        let executor = GraphQLExecutor::new(schema, Arc::new(JsonSource::new(people())))
            .with_config(serial_config());

        let result = executor
            .execute("{ user { name ssn } }", None)
            .await
            .expect("query should succeed");

        assert_eq!(result.data["user"]["name"], json!("Ada+P2"));
        assert_eq!(result.data["user"]["ssn"], json!("111-11-1111"));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "Redact.PluginExecution: refusing to redact /user/ssn"
        );
    }

    #[tokio::test]
    async fn test_error_message_keeps_the_cause_chain() {
        let schema = Schema::builder().plugin(MaskTableLoader).build();
        let executor = GraphQLExecutor::new(schema, Arc::new(JsonSource::new(people())));

        let result = executor
            .execute("{ user { ssn } }", None)
            .await
            .expect("query should succeed");

        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "MaskTableLoader.PluginExecution: loading mask table: connection refused"
        );
    }

    #[tokio::test]
    async fn test_no_registration_returns_input_unchanged() {
        let registry = PluginExecutionRegistry::new();
        let (data, errors) = registry
            .execute(&QueryContext::new(), people(), &PostPassConfig::default())
            .await;

        assert_eq!(data, people());
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_serial_resolution_registers_in_document_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let schema = Schema::builder()
            .plugin(Recorder { seen: seen.clone() })
            .build();
        let executor = GraphQLExecutor::new(schema, Arc::new(JsonSource::new(people())))
            .with_config(serial_config());

        executor
            .execute("{ admin { name } user { name } }", None)
            .await
            .expect("query should succeed");

        let seen = seen.lock().expect("lock poisoned").clone();
        assert_eq!(seen, vec!["/admin", "/user"]);
    }
}

// =============================================================================
// End-to-End Redaction Tests
// =============================================================================

mod redaction_tests {
    use super::*;

    const QUERY: &str = "{ user { name ssn } admin { name ssn } }";

    #[tokio::test]
    async fn test_both_locations_redacted() {
        let schema = Schema::builder()
            .plugin(WholeResponseRedact { fail_at: None })
            .build();
        let executor = GraphQLExecutor::new(schema, Arc::new(JsonSource::new(people())));

        let result = executor.execute(QUERY, None).await.expect("query should succeed");

        assert!(result.errors.is_empty());
        assert_eq!(
            result.data,
            json!({
                "user": {"name": "Ada", "ssn": "***"},
                "admin": {"name": "Grace", "ssn": "***"}
            })
        );
    }

    #[tokio::test]
    async fn test_admin_failure_keeps_user_redaction() {
        let schema = Schema::builder()
            .plugin(WholeResponseRedact {
                fail_at: Some("/admin/ssn"),
            })
            .build();
        let executor = GraphQLExecutor::new(schema, Arc::new(JsonSource::new(people())));

        let result = executor.execute(QUERY, None).await.expect("query should succeed");

        assert_eq!(result.data["user"]["ssn"], json!("***"));
        assert_eq!(result.data["admin"]["ssn"], json!("222-22-2222"));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "Redact.PluginExecution: refusing to redact /admin/ssn"
        );
        assert_eq!(
            result.errors[0].path,
            Some(ResponsePath::root().child_field("admin").child_field("ssn"))
        );
    }

    #[tokio::test]
    async fn test_builtin_redact_follows_aliases() {
        let schema = Schema::builder()
            .plugin(Redact::new(["ssn"]).into_plugin())
            .build();
        let executor = GraphQLExecutor::new(schema, Arc::new(JsonSource::new(people())));

        let result = executor
            .execute("{ boss: admin { secret: ssn name } }", None)
            .await
            .expect("query should succeed");

        assert!(result.errors.is_empty());
        assert_eq!(
            result.data,
            json!({"boss": {"secret": "***", "name": "Grace"}})
        );
    }
}
