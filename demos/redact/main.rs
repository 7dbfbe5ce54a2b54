//! Redaction example: a query resolves user data, the post-pass masks
//! every `ssn` field before the response leaves the executor.
//!
//! Run with `RUST_LOG=this_plugins=debug` to watch registrations and
//! plugin executions.

use this_plugins::prelude::*;
use tracing_subscriber::EnvFilter;

/// Fails on purpose for admins, to show partial success
struct AuditTrail;

#[async_trait]
impl Plugin for AuditTrail {
    fn name(&self) -> &str {
        "AuditTrail"
    }

    fn is_compatible(&self, _ctx: &QueryContext, info: &ResolveInfo) -> bool {
        info.field_name == "admin"
    }

    async fn execute(
        &self,
        _ctx: &QueryContext,
        pointer: &str,
        data: Value,
        _info: &ResolveInfo,
    ) -> PluginResult {
        Err(PluginFailure::unchanged(
            data,
            anyhow::anyhow!("audit sink unreachable for {}", pointer),
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = Schema::builder()
        .plugin(Redact::new(["ssn"]).into_plugin())
        .plugin(AuditTrail)
        .build();

    let source = Arc::new(JsonSource::new(json!({
        "user": {"name": "Ada Lovelace", "ssn": "078-05-1120"},
        "admin": {"name": "Grace Hopper", "ssn": "219-09-9999"},
        "team": [
            {"name": "Alan", "ssn": "123-45-6789"},
            {"name": "Edsger", "ssn": null}
        ]
    })));

    let executor = GraphQLExecutor::new(schema, source);
    let result = executor
        .execute(
            "{ user { name ssn } admin { name ssn } team { name ssn } }",
            None,
        )
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
