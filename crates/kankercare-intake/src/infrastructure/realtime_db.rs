//! Firebase Realtime Database over its REST interface
//!
//! A push is `POST {base}/{path}.json[?auth=<token>]` with the document as
//! the body; the database answers `{"name": "<generated key>"}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::ports::outbound::{DocumentStore, SinkError};

#[derive(Debug, Clone)]
pub struct RealtimeDatabase {
    http: reqwest::Client,
    base: Url,
    auth: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

impl RealtimeDatabase {
    pub fn new(mut base: Url, auth: Option<String>, timeout: Option<Duration>) -> Result<Self, SinkError> {
        // join() replaces the last segment unless the base ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
            auth: auth.filter(|token| !token.is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SinkError> {
        let mut url = self.base.join(&format!("{}.json", path.trim_matches('/')))?;
        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }
        Ok(url)
    }
}

#[async_trait]
impl DocumentStore for RealtimeDatabase {
    async fn push(&self, path: &str, document: serde_json::Value) -> Result<String, SinkError> {
        let url = self.endpoint(path)?;
        let resp = self.http.post(url).json(&document).send().await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!(path, status = status.as_u16(), "database push rejected");
            return Err(SinkError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let pushed: PushResponse = serde_json::from_slice(&body)
            .map_err(|e| SinkError::UnexpectedResponse(e.to_string()))?;

        tracing::info!(path, key = %pushed.name, "database push stored");
        Ok(pushed.name)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn database(server: &MockServer, auth: Option<&str>) -> RealtimeDatabase {
        let base = Url::parse(&server.uri()).unwrap();
        RealtimeDatabase::new(base, auth.map(String::from), None).unwrap()
    }

    #[tokio::test]
    async fn test_push_returns_generated_key() {
        let server = MockServer::start().await;
        let doc = serde_json::json!({"fullName": "Budi"});
        Mock::given(method("POST"))
            .and(path("/patients.json"))
            .and(query_param("auth", "secret"))
            .and(body_json(&doc))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "-NxKey1"})))
            .expect(1)
            .mount(&server)
            .await;

        let key = database(&server, Some("secret")).push("patients", doc).await.unwrap();
        assert_eq!(key, "-NxKey1");
    }

    #[tokio::test]
    async fn test_nested_base_path_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant/konsultasi.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "k1"})))
            .expect(1)
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/tenant", server.uri())).unwrap();
        let db = RealtimeDatabase::new(base, Some(String::new()), None).unwrap();
        assert_eq!(db.push("/konsultasi/", serde_json::json!({})).await.unwrap(), "k1");
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = database(&server, None)
            .push("patients", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Status(401)));
    }

    #[tokio::test]
    async fn test_unexpected_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let err = database(&server, None)
            .push("patients", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::UnexpectedResponse(_)));
    }
}
