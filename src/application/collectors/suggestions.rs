use super::{Collector, expect_object};
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

pub const SUGGESTIONS_PATH: &str = "/api/1.0/suggestions/list";

/// Active and archived suggestions, one event per suggestion.
///
/// Suggestion objects are emitted as returned, plus `is_archived`.
pub struct SuggestionsCollector;

impl SuggestionsCollector {
    async fn fetch(&self, api: &dyn AsmApi, is_archived: bool) -> Result<Vec<Value>, CollectorError> {
        let payload = api
            .post(
                SUGGESTIONS_PATH,
                &[("is_archived", is_archived.to_string())],
                None,
            )
            .await?;

        let suggestions = expect_object(&payload, SUGGESTIONS_PATH)?
            .get("suggestions")
            .and_then(Value::as_array)
            .ok_or_else(|| CollectorError::shape("'suggestions' list not found"))?;

        Ok(suggestions
            .iter()
            .filter_map(Value::as_object)
            .map(|suggestion| {
                let mut event = suggestion.clone();
                event.insert("is_archived".to_string(), Value::Bool(is_archived));
                Value::Object(event)
            })
            .collect())
    }
}

#[async_trait]
impl Collector for SuggestionsCollector {
    fn name(&self) -> &'static str {
        "suggestions"
    }

    fn error_event_type(&self) -> &'static str {
        "asm_suggestion_error"
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        _config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let mut events = self.fetch(api, false).await?;
        let active = events.len();
        events.extend(self.fetch(api, true).await?);

        info!(
            "Collected {} active and {} archived suggestions",
            active,
            events.len() - active
        );
        Ok(events)
    }
}
