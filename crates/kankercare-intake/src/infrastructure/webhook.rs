//! Workflow webhook over HTTP

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::domain::WebhookPayload;
use crate::ports::outbound::{SinkError, WebhookSink};

/// Posts submissions as JSON to a fixed URL. No authentication headers.
#[derive(Debug, Clone)]
pub struct HttpWebhookSink {
    http: reqwest::Client,
    url: Url,
}

impl HttpWebhookSink {
    /// `timeout` of `None` keeps the HTTP client's default behaviour
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, SinkError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl WebhookSink for HttpWebhookSink {
    async fn post(&self, payload: &WebhookPayload) -> Result<(), SinkError> {
        let resp = self.http.post(self.url.clone()).json(payload).send().await?;

        let status = resp.status();
        if status.is_success() {
            tracing::info!(endpoint = %origin(&self.url), status = status.as_u16(), "webhook delivered");
            Ok(())
        } else {
            tracing::error!(
                endpoint = %origin(&self.url),
                status = status.as_u16(),
                "webhook rejected submission"
            );
            Err(SinkError::Status(status.as_u16()))
        }
    }
}

/// Scheme, host and port only; webhook paths may embed a secret
fn origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}
