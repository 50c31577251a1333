//! ASM collectors.
//!
//! Each collector turns one or more API calls into a batch of events. A
//! collector never writes anything itself: the runner decides what reaches
//! stdout, so a failed run produces only its error event.

pub mod asset_limit;
pub mod connection_check;
pub mod inventories;
pub mod inventory_stats;
pub mod suggestion_count;
pub mod suggestions;
pub mod txt_records;
pub mod user_action_logs;
pub mod users;

pub use asset_limit::AssetLimitCollector;
pub use connection_check::ConnectionCheckCollector;
pub use inventories::InventoriesCollector;
pub use inventory_stats::InventoryStatsCollector;
pub use suggestion_count::SuggestionCountCollector;
pub use suggestions::SuggestionsCollector;
pub use txt_records::TxtRecordsCollector;
pub use user_action_logs::UserActionLogsCollector;
pub use users::UsersCollector;

use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

#[async_trait]
pub trait Collector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// `event_type` of the event written when the run fails.
    fn error_event_type(&self) -> &'static str;

    /// Fetch and shape all events for this run.
    async fn collect(
        &self,
        api: &dyn AsmApi,
        config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError>;
}

/// Every collector the binary can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectorKind {
    #[default]
    InventoryStats,
    AssetLimit,
    Inventories,
    Users,
    SuggestionCount,
    Suggestions,
    TxtRecords,
    UserActionLogs,
    ConnectionCheck,
}

impl CollectorKind {
    pub const ALL: [CollectorKind; 9] = [
        CollectorKind::InventoryStats,
        CollectorKind::AssetLimit,
        CollectorKind::Inventories,
        CollectorKind::Users,
        CollectorKind::SuggestionCount,
        CollectorKind::Suggestions,
        CollectorKind::TxtRecords,
        CollectorKind::UserActionLogs,
        CollectorKind::ConnectionCheck,
    ];

    pub fn collector(self) -> Box<dyn Collector> {
        match self {
            CollectorKind::InventoryStats => Box::new(InventoryStatsCollector),
            CollectorKind::AssetLimit => Box::new(AssetLimitCollector),
            CollectorKind::Inventories => Box::new(InventoriesCollector),
            CollectorKind::Users => Box::new(UsersCollector),
            CollectorKind::SuggestionCount => Box::new(SuggestionCountCollector),
            CollectorKind::Suggestions => Box::new(SuggestionsCollector),
            CollectorKind::TxtRecords => Box::new(TxtRecordsCollector),
            CollectorKind::UserActionLogs => Box::new(UserActionLogsCollector),
            CollectorKind::ConnectionCheck => Box::new(ConnectionCheckCollector),
        }
    }
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collector().name())
    }
}

/// The response body as an object; anything else is a shape error.
pub(crate) fn expect_object<'a>(
    payload: &'a Value,
    endpoint: &str,
) -> Result<&'a Map<String, Value>, CollectorError> {
    payload
        .as_object()
        .ok_or_else(|| CollectorError::shape(format!("{} did not return a JSON object", endpoint)))
}

/// Object items of `payload[key]`.
///
/// A missing or null key counts as an empty list. A key holding anything
/// other than an array is a shape error. Non-object items are skipped.
pub(crate) fn object_items<'a>(
    payload: &'a Value,
    key: &str,
    endpoint: &str,
) -> Result<Vec<&'a Map<String, Value>>, CollectorError> {
    match expect_object(payload, endpoint)?.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().filter_map(Value::as_object).collect()),
        Some(_) => Err(CollectorError::shape(format!(
            "'{}' in {} response is not a list",
            key, endpoint
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_kind_has_distinct_names() {
        let mut names: Vec<_> = CollectorKind::ALL
            .iter()
            .map(|kind| kind.collector().name())
            .collect();
        let mut error_types: Vec<_> = CollectorKind::ALL
            .iter()
            .map(|kind| kind.collector().error_event_type())
            .collect();
        names.sort();
        names.dedup();
        error_types.sort();
        error_types.dedup();

        assert_eq!(names.len(), CollectorKind::ALL.len());
        assert_eq!(error_types.len(), CollectorKind::ALL.len());
    }

    #[test]
    fn test_default_kind_is_inventory_stats() {
        assert_eq!(CollectorKind::default(), CollectorKind::InventoryStats);
        assert_eq!(CollectorKind::default().to_string(), "inventory-stats");
    }

    #[test]
    fn test_object_items() {
        let payload = json!({"list": [{"a": 1}, 7, {"b": 2}]});
        let items = object_items(&payload, "list", "test").unwrap();
        assert_eq!(items.len(), 2);

        assert!(object_items(&json!({}), "list", "test").unwrap().is_empty());
        assert!(object_items(&json!({"list": null}), "list", "test").unwrap().is_empty());
        assert!(matches!(
            object_items(&json!({"list": "nope"}), "list", "test"),
            Err(CollectorError::Shape(_))
        ));
        assert!(matches!(
            object_items(&json!([1, 2]), "list", "test"),
            Err(CollectorError::Shape(_))
        ));
    }
}
