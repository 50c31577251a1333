use super::{Collector, expect_object};
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

pub const USER_ACTION_LOGS_PATH: &str = "/api/1.0/user-action-logs";

/// Audit log of user actions, paged with `offset`/`limit`. Records are
/// emitted as returned.
///
/// Paging stops on an empty page, a short page, or once the reported
/// `total` has been reached.
pub struct UserActionLogsCollector;

#[async_trait]
impl Collector for UserActionLogsCollector {
    fn name(&self) -> &'static str {
        "user-action-logs"
    }

    fn error_event_type(&self) -> &'static str {
        "tenable_asm_user_action_logs_error"
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let limit = config.user_action_limit;
        let mut offset = 0usize;
        let mut events = Vec::new();

        loop {
            let payload = api
                .get(
                    USER_ACTION_LOGS_PATH,
                    &[("offset", offset.to_string()), ("limit", limit.to_string())],
                )
                .await?;
            let page = expect_object(&payload, USER_ACTION_LOGS_PATH)?;

            let records = match page.get("list") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items.clone(),
                Some(_) => {
                    return Err(CollectorError::shape(
                        "'list' in user action logs response is not a list",
                    ));
                }
            };
            let total = page.get("total").and_then(Value::as_u64);
            let received = records.len();

            debug!("User action logs page: offset={} received={}", offset, received);
            events.extend(records);

            if received == 0 || received < limit {
                break;
            }
            if total.is_some_and(|total| events.len() as u64 >= total) {
                break;
            }
            offset += received;
        }

        info!("Collected {} user action log records", events.len());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockAsmApi;
    use crate::infrastructure::settings::MemorySettings;
    use serde_json::json;

    fn config(limit: &str) -> AsmConfig {
        AsmConfig::from_source(
            &MemorySettings::new()
                .with("api_key", "k")
                .with("user_action_limit", limit),
        )
        .unwrap()
    }

    fn records(start: usize, count: usize) -> Vec<Value> {
        (start..start + count).map(|i| json!({"id": i})).collect()
    }

    fn offsets(api: &MockAsmApi) -> Vec<String> {
        api.calls()
            .iter()
            .map(|call| call.query[0].1.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_stops_on_short_page() {
        let api = MockAsmApi::new()
            .with_response(json!({"list": records(0, 2)}))
            .with_response(json!({"list": records(2, 2)}))
            .with_response(json!({"list": records(4, 1)}));

        let events = UserActionLogsCollector.collect(&api, &config("2")).await.unwrap();

        assert_eq!(events.len(), 5);
        assert_eq!(events[4], json!({"id": 4}));
        assert_eq!(offsets(&api), vec!["0", "2", "4"]);
        assert_eq!(api.calls()[0].query[1], ("limit".to_string(), "2".to_string()));
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let api = MockAsmApi::new()
            .with_response(json!({"list": records(0, 2)}))
            .with_response(json!({"list": []}));

        let events = UserActionLogsCollector.collect(&api, &config("2")).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_stops_when_total_reached() {
        let api = MockAsmApi::new()
            .with_response(json!({"list": records(0, 2), "total": 4}))
            .with_response(json!({"list": records(2, 2), "total": 4}));

        let events = UserActionLogsCollector.collect(&api, &config("2")).await.unwrap();

        assert_eq!(events.len(), 4);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_error_mid_pagination_fails_whole_run() {
        let api = MockAsmApi::new()
            .with_response(json!({"list": records(0, 2)}))
            .with_error(CollectorError::Http {
                status: 502,
                reason: "Bad Gateway".to_string(),
                url: USER_ACTION_LOGS_PATH.to_string(),
            });

        let err = UserActionLogsCollector.collect(&api, &config("2")).await.unwrap_err();
        assert!(matches!(err, CollectorError::Http { status: 502, .. }));
    }
}
