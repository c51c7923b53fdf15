//! Submission fan-out
//!
//! A validated intake record goes to two sinks concurrently: the workflow
//! webhook and the document database. Both calls run to completion
//! regardless of the other's outcome and each is reported on its own.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinError;

use crate::domain::{PatientDocument, PatientIntakeRecord, UploadedFile, WebhookPayload};
use crate::notify::{messages, Notification, Notifier};
use crate::ports::outbound::{DocumentStore, SinkError, WebhookSink, PATIENTS_PATH};
use crate::sanitize::Sanitize;
use crate::validation::{schemas, FieldErrors};

/// Why one sink did not accept the submission
#[derive(Error, Debug)]
pub enum SinkFailure {
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The sink task panicked or was aborted
    #[error("sink task did not complete: {0}")]
    Aborted(String),
}

impl From<JoinError> for SinkFailure {
    fn from(e: JoinError) -> Self {
        SinkFailure::Aborted(e.to_string())
    }
}

/// Outcome of one submission attempt
#[derive(Debug)]
pub enum SubmissionReport {
    /// Validation failed; no sink was contacted
    Rejected(FieldErrors),
    /// Both sinks were called
    Dispatched {
        webhook: Result<(), SinkFailure>,
        /// Generated document key on success
        database: Result<String, SinkFailure>,
    },
}

impl SubmissionReport {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmissionReport::Rejected(_))
    }

    /// Both sinks accepted the submission
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            SubmissionReport::Dispatched {
                webhook: Ok(()),
                database: Ok(_),
            }
        )
    }
}

/// Fans a patient submission out to the webhook and the document database
#[derive(Clone)]
pub struct SubmissionService {
    webhook: Arc<dyn WebhookSink>,
    database: Arc<dyn DocumentStore>,
}

impl SubmissionService {
    pub fn new(webhook: Arc<dyn WebhookSink>, database: Arc<dyn DocumentStore>) -> Self {
        Self { webhook, database }
    }

    /// Sanitize, re-validate the whole record, then dispatch to both sinks
    pub async fn submit(
        &self,
        record: &PatientIntakeRecord,
        uploads: &[UploadedFile],
        notifier: &dyn Notifier,
    ) -> SubmissionReport {
        let record = match schemas::intake().validate(record.sanitized()) {
            Ok(valid) => valid.into_inner(),
            Err(errors) => {
                tracing::warn!(fields = %errors, "submission rejected by validation");
                notifier.notify(Notification::failure(
                    messages::SUBMIT_INVALID_TITLE,
                    messages::SUBMIT_INVALID_BODY,
                ));
                return SubmissionReport::Rejected(errors);
            }
        };

        let submitted_at = Utc::now();
        let payload = WebhookPayload::new(&record, uploads, submitted_at);
        let document = PatientDocument::new(record, uploads, submitted_at);

        tracing::info!(uploads = uploads.len(), "dispatching submission");

        let webhook = Arc::clone(&self.webhook);
        let webhook_task = tokio::spawn(async move { webhook.post(&payload).await });

        let database = Arc::clone(&self.database);
        let database_task = tokio::spawn(async move {
            let document = serde_json::to_value(&document)?;
            database.push(PATIENTS_PATH, document).await
        });

        let (webhook, database) = tokio::join!(webhook_task, database_task);
        let webhook = flatten(webhook);
        let database = flatten(database);

        notify_webhook(&webhook, notifier);
        notify_database(&database, notifier);

        SubmissionReport::Dispatched { webhook, database }
    }
}

fn flatten<T>(joined: Result<Result<T, SinkError>, JoinError>) -> Result<T, SinkFailure> {
    joined?.map_err(SinkFailure::from)
}

fn notify_webhook(outcome: &Result<(), SinkFailure>, notifier: &dyn Notifier) {
    match outcome {
        Ok(()) => {
            tracing::info!("webhook accepted submission");
            notifier.notify(Notification::success(messages::WEBHOOK_OK_TITLE, messages::WEBHOOK_OK_BODY));
        }
        Err(SinkFailure::Sink(e)) => {
            tracing::error!(error = %e, "webhook delivery failed");
            notifier.notify(Notification::failure(messages::WEBHOOK_FAILED_TITLE, e.to_string()));
        }
        Err(e @ SinkFailure::Aborted(_)) => notify_unexpected("webhook", e, notifier),
    }
}

fn notify_database(outcome: &Result<String, SinkFailure>, notifier: &dyn Notifier) {
    match outcome {
        Ok(key) => {
            tracing::info!(key = %key, "patient record stored");
            notifier.notify(Notification::success(messages::DATABASE_OK_TITLE, messages::DATABASE_OK_BODY));
        }
        Err(SinkFailure::Sink(e)) => {
            tracing::error!(error = %e, "database write failed");
            notifier.notify(Notification::failure(messages::DATABASE_FAILED_TITLE, e.to_string()));
        }
        Err(e @ SinkFailure::Aborted(_)) => notify_unexpected("database", e, notifier),
    }
}

fn notify_unexpected(sink: &str, error: &SinkFailure, notifier: &dyn Notifier) {
    tracing::error!(sink, error = %error, "unexpected error during submission");
    notifier.notify(Notification::failure(
        messages::UNEXPECTED_TITLE,
        messages::UNEXPECTED_SUBMIT_BODY,
    ));
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::application::fixtures::valid_record;
    use crate::infrastructure::{InMemoryDocumentStore, InMemoryWebhook};
    use crate::notify::RecordingNotifier;

    struct PanickingWebhook;

    #[async_trait]
    impl WebhookSink for PanickingWebhook {
        async fn post(&self, _payload: &WebhookPayload) -> Result<(), SinkError> {
            panic!("webhook adapter bug");
        }
    }

    #[tokio::test]
    async fn test_valid_submission_reaches_both_sinks_once() {
        let webhook = Arc::new(InMemoryWebhook::new());
        let database = Arc::new(InMemoryDocumentStore::new());
        let service = SubmissionService::new(webhook.clone(), database.clone());
        let notifier = RecordingNotifier::new();
        let uploads = vec![UploadedFile::new("ct.pdf", "application/pdf", 1024)];

        let report = service.submit(&valid_record(), &uploads, &notifier).await;

        assert!(report.is_complete());
        assert_eq!(webhook.attempts(), 1);
        assert_eq!(database.attempts(), 1);

        let delivered = webhook.delivered().remove(0);
        assert_eq!(delivered.symptoms, "Batuk kronis, Kelelahan kronis");
        assert_eq!(delivered.uploaded_file_names, "ct.pdf");

        let stored = database.documents(PATIENTS_PATH).remove(0);
        assert_eq!(stored["uploadedFileNames"], serde_json::json!(["ct.pdf"]));
        assert_eq!(stored["fullName"], "Budi Santoso");
        assert!(stored["submittedAt"].is_string());

        assert_eq!(notifier.successes(), 2);
        assert_eq!(notifier.failures(), 0);
    }

    #[tokio::test]
    async fn test_webhook_failure_does_not_stop_database() {
        let webhook = Arc::new(InMemoryWebhook::failing("network down"));
        let database = Arc::new(InMemoryDocumentStore::new());
        let service = SubmissionService::new(webhook.clone(), database.clone());
        let notifier = RecordingNotifier::new();

        let report = service.submit(&valid_record(), &[], &notifier).await;

        match report {
            SubmissionReport::Dispatched { webhook, database } => {
                assert!(matches!(webhook, Err(SinkFailure::Sink(SinkError::Unavailable(_)))));
                assert!(database.is_ok());
            }
            other => panic!("unexpected report: {other:?}"),
        }
        assert_eq!(notifier.failures(), 1);
        assert_eq!(notifier.successes(), 1);

        let failure = notifier
            .notifications()
            .into_iter()
            .find(|n| n.is_failure())
            .unwrap();
        assert_eq!(failure.title, messages::WEBHOOK_FAILED_TITLE);
    }

    #[tokio::test]
    async fn test_invalid_record_contacts_no_sink() {
        let webhook = Arc::new(InMemoryWebhook::new());
        let database = Arc::new(InMemoryDocumentStore::new());
        let service = SubmissionService::new(webhook.clone(), database.clone());
        let notifier = RecordingNotifier::new();

        let mut record = valid_record();
        record.age = "0".into();
        let report = service.submit(&record, &[], &notifier).await;

        match report {
            SubmissionReport::Rejected(errors) => assert!(errors.contains("age")),
            other => panic!("unexpected report: {other:?}"),
        }
        assert_eq!(webhook.attempts(), 0);
        assert_eq!(database.attempts(), 0);
        assert_eq!(notifier.failures(), 1);
    }

    #[tokio::test]
    async fn test_panicking_sink_is_reported_as_unexpected() {
        let database = Arc::new(InMemoryDocumentStore::new());
        let service = SubmissionService::new(Arc::new(PanickingWebhook), database.clone());
        let notifier = RecordingNotifier::new();

        let report = service.submit(&valid_record(), &[], &notifier).await;

        match report {
            SubmissionReport::Dispatched { webhook, database } => {
                assert!(matches!(webhook, Err(SinkFailure::Aborted(_))));
                assert!(database.is_ok());
            }
            other => panic!("unexpected report: {other:?}"),
        }
        let titles: Vec<_> = notifier.notifications().into_iter().map(|n| n.title).collect();
        assert!(titles.contains(&messages::UNEXPECTED_TITLE.to_string()));
        assert!(titles.contains(&messages::DATABASE_OK_TITLE.to_string()));
    }
}
