use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Proxy, RequestBuilder};
use serde_json::Value;
use std::error::Error as StdError;
use tracing::debug;

/// reqwest-backed ASM client. One instance lives for one run.
pub struct AsmHttpClient {
    client: Client,
    base_url: String,
    proxy_used: bool,
}

impl AsmHttpClient {
    pub fn new(config: &AsmConfig) -> Result<Self, CollectorError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // Tenable expects the raw key, no scheme prefix.
        let mut auth = HeaderValue::from_str(&config.api_key).map_err(|_| {
            CollectorError::config("api_key contains characters not allowed in an HTTP header")
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("asm-collector/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy_url) = &config.proxy {
            let proxy = Proxy::all(proxy_url.as_str())
                .map_err(|e| CollectorError::config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| CollectorError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            proxy_used: config.proxy.is_some(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<Value, CollectorError> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status();
        debug!("ASM responded {} for {}", status, url);

        if !status.is_success() {
            return Err(CollectorError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, &e))?;

        serde_json::from_slice(&body).map_err(|error| CollectorError::Payload {
            url: url.to_string(),
            error,
        })
    }
}

#[async_trait]
impl AsmApi for AsmHttpClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CollectorError> {
        let url = self.url(path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request, &url).await
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, CollectorError> {
        let url = self.url(path);
        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }
        self.execute(request, &url).await
    }

    fn proxy_used(&self) -> bool {
        self.proxy_used
    }
}

/// reqwest's top-level message is generic ("error sending request"); the
/// useful part (timeout, DNS, TLS, proxy refusal) is in the source chain.
fn transport_error(url: &str, error: &reqwest::Error) -> CollectorError {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    if error.is_timeout() && !message.contains("timed out") {
        message.push_str(" (timed out)");
    }
    CollectorError::Transport {
        url: url.to_string(),
        message,
    }
}
