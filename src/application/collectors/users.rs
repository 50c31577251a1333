use super::{Collector, object_items};
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::events::{field, is_truthy, unix_now};
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

pub const USERS_PATH: &str = "/api/1.0/admin/users";

#[derive(Debug, Serialize)]
struct UserEvent {
    event_type: &'static str,
    user_id: Value,
    email: Value,
    authid: Value,
    access_level: Value,
    created_at: Value,
    first_login: Value,
    mfa: Value,
    ext_user_id: Value,
    workspace: Value,
    business_id: Value,
    user_inventories_limit: Value,
    companies: Vec<Value>,
    retrieved_at: i64,
}

impl UserEvent {
    fn from_item(user: &Map<String, Value>, retrieved_at: i64) -> Self {
        Self {
            event_type: "asm_user",
            user_id: field(user, "id"),
            email: field(user, "email"),
            authid: field(user, "authid"),
            access_level: field(user, "access_level"),
            created_at: field(user, "created_at"),
            first_login: field(user, "first_login"),
            mfa: field(user, "mfa"),
            ext_user_id: field(user, "ext_user_id"),
            workspace: field(user, "workspace"),
            business_id: field(user, "business_id"),
            user_inventories_limit: field(user, "user_inventories_limit"),
            companies: company_names(user.get("companies")),
            retrieved_at,
        }
    }
}

/// Names of the user's companies, skipping entries without a usable name.
fn company_names(companies: Option<&Value>) -> Vec<Value> {
    companies
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|company| company.get("name"))
                .filter(|name| is_truthy(name))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

pub struct UsersCollector;

#[async_trait]
impl Collector for UsersCollector {
    fn name(&self) -> &'static str {
        "users"
    }

    fn error_event_type(&self) -> &'static str {
        "asm_user_error"
    }

    async fn collect(
        &self,
        api: &dyn AsmApi,
        _config: &AsmConfig,
    ) -> Result<Vec<Value>, CollectorError> {
        let payload = api.get(USERS_PATH, &[]).await?;
        let now = unix_now();

        let events = object_items(&payload, "list", USERS_PATH)?
            .into_iter()
            .map(|user| serde_json::to_value(UserEvent::from_item(user, now)))
            .collect::<Result<Vec<_>, _>>()?;

        info!("Collected {} users", events.len());
        Ok(events)
    }
}
