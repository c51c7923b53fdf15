//! KankerCare patient intake pipeline
//!
//! Client-side form pipeline of the KankerCare oncology information service:
//! input sanitization, schema validation, rate limiting, an obfuscating
//! session store, the four-step patient intake wizard and the submission
//! fan-out to a workflow webhook and a document database.
//!
//! ## Architecture
//!
//! - **Domain Layer**: record shapes, typed field access, uploads, payloads
//! - **Validation**: declarative rule sets with Indonesian messages
//! - **Ports Layer**: sink traits the submission depends on
//! - **Infrastructure Layer**: HTTP and in-memory sink adapters
//! - **Application Layer**: wizard, submission fan-out, consultation
//!   booking, mock authentication
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use kankercare_intake::application::{IntakeWizard, SubmissionService};
//! use kankercare_intake::domain::IntakeField;
//! use kankercare_intake::infrastructure::{InMemoryDocumentStore, InMemoryWebhook};
//! use kankercare_intake::notify::TracingNotifier;
//!
//! # async fn run() {
//! let service = SubmissionService::new(
//!     Arc::new(InMemoryWebhook::new()),
//!     Arc::new(InMemoryDocumentStore::new()),
//! );
//! let mut wizard = IntakeWizard::new(service, Arc::new(TracingNotifier));
//!
//! wizard.edit_field(IntakeField::FullName, "Budi Santoso");
//! if !wizard.advance() {
//!     for (path, message) in wizard.errors().iter() {
//!         println!("{path}: {message}");
//!     }
//! }
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod notify;
pub mod ports;
pub mod rate_limit;
pub mod sanitize;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use application::{AuthService, ConsultationDesk, IntakeWizard, SubmissionReport, SubmissionService};
pub use config::IntakeConfig;
pub use domain::{
    ConsultationRecord, IntakeField, LoginRecord, PatientIntakeRecord, RegisterRecord, UploadedFile,
};
pub use error::{ConfigError, StorageError};
pub use notify::{Notification, Notifier, Variant};
pub use ports::outbound::{DocumentStore, SinkError, WebhookSink};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use sanitize::{sanitize, sanitize_record, Sanitize};
pub use storage::{AuthStorage, SecureStorage};
pub use validation::{FieldErrors, RuleSet, Valid};
