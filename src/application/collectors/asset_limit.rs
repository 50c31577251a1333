use super::{Collector, expect_object};
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::events::{field, unix_now};
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub const ASSET_LIMIT_PATH: &str = "/api/1.0/asset-limit";

#[derive(Debug, Serialize)]
struct AssetLimitEvent {
    event_type: &'static str,
    asset_limit: Value,
    limit_reached: Value,
    retrieved_at: i64,
}

/// Current asset limit and whether the account has reached it.
pub struct AssetLimitCollector;

#[async_trait]
impl Collector for AssetLimitCollector {
    fn name(&self) -> &'static str {
        "asset-limit"
    }

    fn error_event_type(&self) -> &'static str {
        "asm_asset_limit_error"
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        _config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let payload = api.get(ASSET_LIMIT_PATH, &[]).await?;
        let data = expect_object(&payload, ASSET_LIMIT_PATH)?;

        let event = AssetLimitEvent {
            event_type: "asm_asset_limit",
            asset_limit: field(data, "asset_limit"),
            limit_reached: field(data, "limit_reached"),
            retrieved_at: unix_now(),
        };

        Ok(vec![serde_json::to_value(event)?])
    }
}
