use crate::domain::errors::CollectorError;
use crate::domain::ports::AsmApi;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// One request seen by [`MockAsmApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

type Responder = Box<dyn Fn(&RecordedCall) -> Result<Value, CollectorError> + Send + Sync>;

/// In-process [`AsmApi`] with scripted responses.
///
/// Queued responses are consumed first, in order. Once the queue is empty
/// the fallback responder (if any) answers; otherwise the call fails with a
/// 404 HTTP error.
#[derive(Default)]
pub struct MockAsmApi {
    queue: Mutex<VecDeque<Result<Value, CollectorError>>>,
    fallback: Option<Responder>,
    calls: Mutex<Vec<RecordedCall>>,
    proxy_used: bool,
}

impl MockAsmApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, body: Value) -> Self {
        self.push(Ok(body));
        self
    }

    pub fn with_error(self, error: CollectorError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&RecordedCall) -> Result<Value, CollectorError> + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(responder));
        self
    }

    pub fn with_proxy(mut self) -> Self {
        self.proxy_used = true;
        self
    }

    pub fn push(&self, response: Result<Value, CollectorError>) {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn respond(&self, call: RecordedCall) -> Result<Value, CollectorError> {
        debug!("MockAsmApi: {} {}", call.method, call.path);
        let queued = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        let result = match queued {
            Some(response) => response,
            None => match &self.fallback {
                Some(responder) => responder(&call),
                None => Err(CollectorError::Http {
                    status: 404,
                    reason: "Not Found".to_string(),
                    url: call.path.clone(),
                }),
            },
        };

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
        result
    }
}

fn owned_query(query: &[(&str, String)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[async_trait]
impl AsmApi for MockAsmApi {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CollectorError> {
        self.respond(RecordedCall {
            method: "GET",
            path: path.to_string(),
            query: owned_query(query),
            body: None,
        })
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, CollectorError> {
        self.respond(RecordedCall {
            method: "POST",
            path: path.to_string(),
            query: owned_query(query),
            body,
        })
    }

    fn proxy_used(&self) -> bool {
        self.proxy_used
    }
}
