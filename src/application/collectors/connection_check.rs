use super::Collector;
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::events::unix_now;
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::info;

pub const GLOBAL_PATH: &str = "/api/1.0/global";

#[derive(Debug, Serialize)]
struct ConnectionCheckEvent {
    event_type: &'static str,
    status: &'static str,
    message: &'static str,
    latency_ms: f64,
    proxy_used: bool,
    retrieved_at: i64,
}

/// Verifies credentials and proxy settings against a cheap endpoint.
pub struct ConnectionCheckCollector;

#[async_trait]
impl Collector for ConnectionCheckCollector {
    fn name(&self) -> &'static str {
        "check"
    }

    fn error_event_type(&self) -> &'static str {
        "asm_connection_check_error"
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        _config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let start = Instant::now();
        api.get(GLOBAL_PATH, &[]).await?;
        let latency_ms = (start.elapsed().as_secs_f64() * 100_000.0).round() / 100.0;

        info!("ASM connection check succeeded in {}ms", latency_ms);

        let event = ConnectionCheckEvent {
            event_type: "asm_connection_check",
            status: "success",
            message: "Connection successful",
            latency_ms,
            proxy_used: api.proxy_used(),
            retrieved_at: unix_now(),
        };
        Ok(vec![serde_json::to_value(event)?])
    }
}
