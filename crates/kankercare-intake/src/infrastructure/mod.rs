//! Infrastructure layer
//!
//! Sink adapters: HTTP for production, in-memory for tests and dry runs.

pub mod memory;
pub mod realtime_db;
pub mod webhook;

use async_trait::async_trait;

use crate::domain::WebhookPayload;
use crate::ports::outbound::{DocumentStore, SinkError, WebhookSink};

pub use memory::{InMemoryDocumentStore, InMemoryWebhook};
pub use realtime_db::RealtimeDatabase;
pub use webhook::HttpWebhookSink;

/// Stand-in for a sink whose endpoint was never configured. Every call fails
/// with [`SinkError::NotConfigured`] so the submission still reports it.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured(pub &'static str);

#[async_trait]
impl WebhookSink for Unconfigured {
    async fn post(&self, _payload: &WebhookPayload) -> Result<(), SinkError> {
        Err(SinkError::NotConfigured(self.0))
    }
}

#[async_trait]
impl DocumentStore for Unconfigured {
    async fn push(&self, _path: &str, _document: serde_json::Value) -> Result<String, SinkError> {
        Err(SinkError::NotConfigured(self.0))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::PatientIntakeRecord;

    #[tokio::test]
    async fn test_unconfigured_names_missing_setting() {
        let sink = Unconfigured("webhook.url");
        let payload = WebhookPayload::new(&PatientIntakeRecord::default(), &[], Utc::now());
        let err = sink.post(&payload).await.unwrap_err();
        assert!(matches!(err, SinkError::NotConfigured("webhook.url")));

        let err = sink.push("patients", serde_json::json!({})).await.unwrap_err();
        assert!(err.to_string().contains("webhook.url"));
    }
}
