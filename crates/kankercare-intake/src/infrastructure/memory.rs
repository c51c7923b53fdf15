//! In-memory sinks for tests and dry runs

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::WebhookPayload;
use crate::ports::outbound::{DocumentStore, SinkError, WebhookSink};

/// Records every delivered payload
#[derive(Debug, Default)]
pub struct InMemoryWebhook {
    delivered: Mutex<Vec<WebhookPayload>>,
    attempts: Mutex<usize>,
    failure: Mutex<Option<String>>,
}

impl InMemoryWebhook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that rejects every call with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        let sink = Self::default();
        sink.fail_with(reason);
        sink
    }

    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock() = Some(reason.into());
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn delivered(&self) -> Vec<WebhookPayload> {
        self.delivered.lock().clone()
    }

    /// Calls made, failed ones included
    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }
}

#[async_trait]
impl WebhookSink for InMemoryWebhook {
    async fn post(&self, payload: &WebhookPayload) -> Result<(), SinkError> {
        *self.attempts.lock() += 1;
        if let Some(reason) = self.failure.lock().clone() {
            return Err(SinkError::Unavailable(reason));
        }
        self.delivered.lock().push(payload.clone());
        Ok(())
    }
}

/// Documents grouped by path, in push order
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<BTreeMap<String, Vec<(String, serde_json::Value)>>>,
    attempts: Mutex<usize>,
    failure: Mutex<Option<String>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        let store = Self::default();
        store.fail_with(reason);
        store
    }

    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock() = Some(reason.into());
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn documents(&self, path: &str) -> Vec<serde_json::Value> {
        self.documents
            .lock()
            .get(path)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, path: &str, key: &str) -> Option<serde_json::Value> {
        self.documents
            .lock()
            .get(path)?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, doc)| doc.clone())
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn push(&self, path: &str, document: serde_json::Value) -> Result<String, SinkError> {
        *self.attempts.lock() += 1;
        if let Some(reason) = self.failure.lock().clone() {
            return Err(SinkError::Unavailable(reason));
        }
        let key = Uuid::new_v4().simple().to_string();
        self.documents
            .lock()
            .entry(path.trim_matches('/').to_string())
            .or_default()
            .push((key.clone(), document));
        Ok(key)
    }
}
