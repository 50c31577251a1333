use super::{Collector, object_items};
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::events::unix_now;
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::info;

pub const TXT_RECORDS_PATH: &str = "/api/1.0/txt-records/search";

/// All searchable TXT records. An empty search body matches everything.
pub struct TxtRecordsCollector;

#[async_trait]
impl Collector for TxtRecordsCollector {
    fn name(&self) -> &'static str {
        "txt-records"
    }

    fn error_event_type(&self) -> &'static str {
        "asm_txt_record_search_error"
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        _config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let payload = api.post(TXT_RECORDS_PATH, &[], Some(json!({}))).await?;
        let now = unix_now();

        let events: Vec<Value> = object_items(&payload, "txt_records", TXT_RECORDS_PATH)?
            .into_iter()
            .map(|record| {
                // record fields override the envelope on collision
                let mut event = Map::new();
                event.insert("event_type".to_string(), json!("asm_txt_record_search"));
                event.insert("retrieved_at".to_string(), json!(now));
                event.extend(record.clone());
                Value::Object(event)
            })
            .collect();

        info!("Collected {} TXT records", events.len());
        Ok(events)
    }
}
