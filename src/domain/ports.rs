use crate::domain::errors::CollectorError;
use async_trait::async_trait;
use serde_json::Value;

/// Read-only view over the app's settings stanza.
pub trait SettingsSource: Send + Sync {
    /// Raw value for `key`, untrimmed. `None` when the key is not set.
    fn get(&self, key: &str) -> Option<String>;
}

/// Authenticated access to the ASM REST API.
///
/// Implementations return the decoded JSON body of a 2xx response and map
/// everything else onto [`CollectorError`].
#[async_trait]
pub trait AsmApi: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CollectorError>;

    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, CollectorError>;

    /// Whether requests are routed through a proxy.
    fn proxy_used(&self) -> bool {
        false
    }
}
