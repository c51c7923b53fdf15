//! CLI Commands

pub mod auth;
pub mod catalog;
pub mod config;
pub mod consult;
pub mod intake;
pub mod validate;

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use kankercare_intake::infrastructure::{HttpWebhookSink, RealtimeDatabase, Unconfigured};
use kankercare_intake::ports::outbound::{DocumentStore, WebhookSink};
use kankercare_intake::storage::{AuthStorage, FileStore, SecureStorage};
use kankercare_intake::{sanitize_record, IntakeConfig};
use serde::de::DeserializeOwned;

use crate::output::{ConsoleNotifier, OutputFormat};
use crate::{Cli, Commands};

/// How a command ended when it did not error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    /// The pipeline refused the input (validation, rate limit, sink failure)
    Declined,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Done => ExitCode::SUCCESS,
            Status::Declined => ExitCode::from(2),
        }
    }
}

/// Everything a command needs besides its own arguments
pub struct Context {
    pub config: IntakeConfig,
    pub profile: Option<String>,
    pub format: OutputFormat,
    pub notifier: Arc<ConsoleNotifier>,
}

impl Context {
    /// Config file for the profile, with flag and environment overrides applied
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = IntakeConfig::load(cli.profile.as_deref())?;
        if let Some(url) = &cli.webhook_url {
            config.webhook.url = Some(url.clone());
        }
        if let Some(url) = &cli.database_url {
            config.database.url = Some(url.clone());
        }
        if let Some(auth) = &cli.database_auth {
            config.database.auth = Some(auth.clone());
        }

        Ok(Self {
            config,
            profile: cli.profile.clone(),
            format: cli.format,
            notifier: Arc::new(ConsoleNotifier::new(cli.format)),
        })
    }

    pub fn webhook(&self) -> Result<Arc<dyn WebhookSink>> {
        let timeout = self.config.webhook.timeout_secs.map(Duration::from_secs);
        Ok(match self.config.webhook_url()? {
            Some(url) => Arc::new(HttpWebhookSink::new(url, timeout)?),
            None => {
                tracing::warn!("webhook.url not set, webhook delivery will fail");
                Arc::new(Unconfigured("webhook.url"))
            }
        })
    }

    pub fn database(&self) -> Result<Arc<dyn DocumentStore>> {
        let timeout = self.config.database.timeout_secs.map(Duration::from_secs);
        Ok(match self.config.database_url()? {
            Some(url) => Arc::new(RealtimeDatabase::new(url, self.config.database.auth.clone(), timeout)?),
            None => {
                tracing::warn!("database.url not set, database writes will fail");
                Arc::new(Unconfigured("database.url"))
            }
        })
    }

    /// Session store persisted under the configured storage directory
    pub fn auth_storage(&self) -> Result<AuthStorage> {
        let dir = self.config.storage_dir()?;
        Ok(AuthStorage::new(SecureStorage::new(Arc::new(FileStore::in_dir(dir)))))
    }
}

pub async fn run(cli: Cli) -> Result<Status> {
    let ctx = Context::new(&cli)?;

    match cli.command {
        Commands::Intake { file, uploads, dry_run } => intake::handle(&ctx, &file, &uploads, dry_run).await,
        Commands::Validate { form, file } => validate::handle(&ctx, form, &file),
        Commands::Login {
            email,
            password,
            remember_me,
        } => auth::login(&ctx, email, password, remember_me).await,
        Commands::Register {
            full_name,
            email,
            phone,
            password,
            confirm_password,
            agree_terms,
        } => {
            let form = kankercare_intake::RegisterRecord {
                full_name,
                email,
                phone,
                password,
                confirm_password,
                agree_terms,
            };
            auth::register(&ctx, form).await
        }
        Commands::Logout => auth::logout(&ctx),
        Commands::Session => auth::session(&ctx),
        Commands::Consult {
            file,
            doctor,
            date,
            time,
            dry_run,
        } => consult::handle(&ctx, &file, doctor, date, time, dry_run).await,
        Commands::Doctors => catalog::doctors(&ctx),
        Commands::Options => catalog::options(&ctx),
        Commands::Config { action } => config::handle(&ctx, action),
    }
}

/// Read a JSON form, sanitizing every field before it is typed
pub fn read_form<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))?;
    let Some(object) = value.as_object() else {
        bail!("{} must hold a JSON object", path.display());
    };
    let form = serde_json::from_value(serde_json::Value::Object(sanitize_record(object)))
        .with_context(|| format!("{} does not match the form", path.display()))?;
    Ok(form)
}

#[cfg(test)]
mod tests {
    use kankercare_intake::PatientIntakeRecord;

    use super::*;

    #[test]
    fn test_read_form_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pasien.json");
        fs::write(
            &path,
            r#"{"fullName": "  <script>alert(1)</script>Budi Santoso ", "age": "52", "symptoms": ["javascript:Batuk"]}"#,
        )
        .unwrap();

        let record: PatientIntakeRecord = read_form(&path).unwrap();
        assert_eq!(record.full_name, "Budi Santoso");
        assert_eq!(record.age, "52");
        assert_eq!(record.symptoms, vec!["Batuk".to_string()]);
    }

    #[test]
    fn test_read_form_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = read_form::<PatientIntakeRecord>(&path).unwrap_err();
        assert!(err.to_string().contains("must hold a JSON object"));
    }
}
