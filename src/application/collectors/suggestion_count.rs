use super::{Collector, expect_object};
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::events::unix_now;
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};

pub const SUGGESTION_COUNT_PATH: &str = "/api/1.0/suggestions/count";

#[derive(Debug, Serialize)]
struct SuggestionCountEvent {
    event_type: &'static str,
    is_archived: bool,
    count: Value,
    retrieved_at: i64,
}

/// Number of active (non-archived) suggestions.
pub struct SuggestionCountCollector;

#[async_trait]
impl Collector for SuggestionCountCollector {
    fn name(&self) -> &'static str {
        "suggestion-count"
    }

    fn error_event_type(&self) -> &'static str {
        "asm_suggestion_count_error"
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        _config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let payload = api
            .post(SUGGESTION_COUNT_PATH, &[], Some(json!({"is_archived": false})))
            .await?;
        let data = expect_object(&payload, SUGGESTION_COUNT_PATH)?;

        let event = SuggestionCountEvent {
            event_type: "asm_suggestion_count",
            is_archived: false,
            // absent means none; an explicit null is passed through
            count: data.get("count").cloned().unwrap_or(json!(0)),
            retrieved_at: unix_now(),
        };

        Ok(vec![serde_json::to_value(event)?])
    }
}
