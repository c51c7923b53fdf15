//! Outbound ports
//!
//! The two sinks a submission fans out to. Adapters live in
//! `crate::infrastructure`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::WebhookPayload;

/// Database path of patient submissions
pub const PATIENTS_PATH: &str = "patients";

/// Database path of consultation bookings
pub const CONSULTATIONS_PATH: &str = "konsultasi";

/// Workflow-automation webhook
#[async_trait]
pub trait WebhookSink: Send + Sync {
    /// POST the flattened submission. Non-2xx responses are failures.
    async fn post(&self, payload: &WebhookPayload) -> Result<(), SinkError>;
}

/// Document database with push semantics
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append `document` under `path` and return its generated key
    async fn push(&self, path: &str, document: serde_json::Value) -> Result<String, SinkError>;
}

/// Sink failure. Reported per sink, never retried.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Request could not be sent or the response not read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Sink answered with a non-success status
    #[error("sink responded with status {0}")]
    Status(u16),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Response body did not have the expected shape
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Sink refused the write without an HTTP exchange
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    /// No endpoint configured for the sink
    #[error("{0} endpoint is not configured")]
    NotConfigured(&'static str),
}
