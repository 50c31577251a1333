use super::{Collector, object_items};
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::events::{field, is_truthy, unix_now};
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

pub const INVENTORIES_PATH: &str = "/api/1.0/inventories/list";

/// One event per inventory. The inventory's own API key is reduced to a
/// presence flag and never emitted.
#[derive(Debug, Serialize)]
struct InventoryEvent {
    event_type: &'static str,
    inventory_id: Value,
    inventory_name: Value,
    current_asset_count: Value,
    source_suggestions: Value,
    business_id: Value,
    users_total: Value,
    api_key_present: bool,
    enumeration_wordlist: Value,
    has_custom_wordlist: Value,
    retrieved_at: i64,
}

impl InventoryEvent {
    fn from_item(item: &Map<String, Value>, retrieved_at: i64) -> Self {
        Self {
            event_type: "asm_inventory",
            inventory_id: field(item, "inventory_id"),
            inventory_name: field(item, "inventory_name"),
            current_asset_count: field(item, "current_asset_count"),
            source_suggestions: field(item, "source_suggestions"),
            business_id: field(item, "business_id"),
            users_total: field(item, "users_total"),
            api_key_present: item.get("api_key").is_some_and(is_truthy),
            enumeration_wordlist: field(item, "enumeration_wordlist"),
            has_custom_wordlist: field(item, "has_custom_wordlist"),
            retrieved_at,
        }
    }
}

pub struct InventoriesCollector;

#[async_trait]
impl Collector for InventoriesCollector {
    fn name(&self) -> &'static str {
        "inventories"
    }

    fn error_event_type(&self) -> &'static str {
        "asm_inventory_error"
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        _config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let payload = api.get(INVENTORIES_PATH, &[]).await?;
        let now = unix_now();

        let events = object_items(&payload, "list", INVENTORIES_PATH)?
            .into_iter()
            .map(|item| serde_json::to_value(InventoryEvent::from_item(item, now)))
            .collect::<Result<Vec<_>, _>>()?;

        info!("Collected {} inventories", events.len());
        Ok(events)
    }
}
