//! Inventory statistics: asset totals for the account's inventory.

use super::{Collector, expect_object};
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::events::{lookup, unix_now};
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

pub const INVENTORY_STATS_PATH: &str = "/api/1.0/inventory";
pub const EVENT_TYPE: &str = "asm_inventory_stats";
pub const ERROR_EVENT_TYPE: &str = "asm_inventory_stats_error";

/// Success event. Metric values are copied verbatim from the response;
/// absent fields are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryStatsEvent {
    pub event_type: String,
    pub total_assets: Value,
    pub domains: Value,
    pub subdomains: Value,
    pub hosts: Value,
    pub ips: Value,
    pub hidden_count: Value,
    pub free_limit_reached: Value,
    pub retrieved_at: i64,
}

impl InventoryStatsEvent {
    pub fn from_payload(payload: &Value, retrieved_at: i64) -> Result<Self, CollectorError> {
        expect_object(payload, INVENTORY_STATS_PATH)?;

        Ok(Self {
            event_type: EVENT_TYPE.to_string(),
            total_assets: lookup(payload, &["stats", "total"]),
            domains: lookup(payload, &["stats", "domaincount"]),
            subdomains: lookup(payload, &["stats", "subdomaincount"]),
            hosts: lookup(payload, &["stats", "hostcount"]),
            ips: lookup(payload, &["stats", "ipcount"]),
            hidden_count: lookup(payload, &["hiddenCount"]),
            free_limit_reached: lookup(payload, &["freeLimitReached"]),
            retrieved_at,
        })
    }
}

pub struct InventoryStatsCollector;

#[async_trait]
impl Collector for InventoryStatsCollector {
    fn name(&self) -> &'static str {
        "inventory-stats"
    }

    fn error_event_type(&self) -> &'static str {
        ERROR_EVENT_TYPE
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        _config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let payload = api.post(INVENTORY_STATS_PATH, &[], Some(json!({}))).await?;
        let event = InventoryStatsEvent::from_payload(&payload, unix_now())?;

        info!(
            "Inventory stats: total={} domains={} hosts={} ips={}",
            event.total_assets, event.domains, event.hosts, event.ips
        );

        Ok(vec![serde_json::to_value(event)?])
    }
}
