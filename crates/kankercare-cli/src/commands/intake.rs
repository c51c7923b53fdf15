//! Patient intake command

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use kankercare_intake::application::{IntakeWizard, Step, SubmissionReport, SubmissionService};
use kankercare_intake::domain::{guess_mime_type, PatientIntakeRecord, Record, UploadedFile};
use kankercare_intake::infrastructure::{InMemoryDocumentStore, InMemoryWebhook};
use kankercare_intake::ports::outbound::PATIENTS_PATH;
use serde_json::json;

use super::{read_form, Context, Status};
use crate::output::render_errors;

const FORM_STEPS: [Step; 3] = [Step::PersonalData, Step::CancerDetails, Step::MedicalHistory];

pub async fn handle(ctx: &Context, file: &Path, uploads: &[PathBuf], dry_run: bool) -> Result<Status> {
    let record: PatientIntakeRecord = read_form(file)?;
    let files = uploads
        .iter()
        .map(|path| describe_upload(path))
        .collect::<Result<Vec<_>>>()?;

    let dry = dry_run.then(|| (Arc::new(InMemoryWebhook::new()), Arc::new(InMemoryDocumentStore::new())));
    let service = match &dry {
        Some((webhook, database)) => SubmissionService::new(webhook.clone(), database.clone()),
        None => SubmissionService::new(ctx.webhook()?, ctx.database()?),
    };
    let mut wizard = IntakeWizard::new(service, ctx.notifier.clone());

    // Fill and gate each form step the way the wizard would
    for step in FORM_STEPS {
        for &field in step.fields() {
            wizard.edit_field(field, record.field(field).to_value());
        }
        if !wizard.advance() {
            let errors = wizard.errors().clone();
            if ctx.format.is_json() {
                ctx.format.print(&json!({
                    "status": "invalid",
                    "step": step.number(),
                    "errors": errors,
                    "notifications": ctx.notifier.drain(),
                }));
            } else {
                println!(
                    "{} {}",
                    format!("Langkah {}/{} ({})", step.number(), Step::COUNT, step.title()).bold(),
                    "belum valid:".yellow()
                );
                println!("{}", render_errors(&errors));
            }
            return Ok(Status::Declined);
        }
    }

    wizard.upload_files(files);
    let uploaded = wizard.state().uploads.len();
    let report = wizard.submit().await?;

    let status = if report.is_complete() {
        Status::Done
    } else {
        Status::Declined
    };

    if ctx.format.is_json() {
        let mut out = report_json(&report);
        out["uploads"] = json!(uploaded);
        out["notifications"] = json!(ctx.notifier.drain());
        if let Some((webhook, database)) = &dry {
            out["dryRun"] = json!({
                "webhook": webhook.delivered(),
                "database": database.documents(PATIENTS_PATH),
            });
        }
        ctx.format.print(&out);
    } else {
        print_report(&report);
        if let Some((webhook, _)) = &dry {
            for payload in webhook.delivered() {
                println!("{}", "Dry run, webhook payload:".dimmed());
                ctx.format.print(&payload);
            }
        }
    }

    Ok(status)
}

/// Metadata of a local file as the upload control would report it
fn describe_upload(path: &Path) -> Result<UploadedFile> {
    let meta = fs::metadata(path).with_context(|| format!("cannot read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = guess_mime_type(&name);
    Ok(UploadedFile::new(name, mime, meta.len()))
}

fn report_json(report: &SubmissionReport) -> serde_json::Value {
    match report {
        SubmissionReport::Rejected(errors) => json!({ "status": "rejected", "errors": errors }),
        SubmissionReport::Dispatched { webhook, database } => {
            let status = if report.is_complete() { "submitted" } else { "partial" };
            let webhook = match webhook {
                Ok(()) => json!({ "ok": true }),
                Err(e) => json!({ "ok": false, "error": e.to_string() }),
            };
            let database = match database {
                Ok(key) => json!({ "ok": true, "key": key }),
                Err(e) => json!({ "ok": false, "error": e.to_string() }),
            };
            json!({ "status": status, "webhook": webhook, "database": database })
        }
    }
}

fn print_report(report: &SubmissionReport) {
    match report {
        SubmissionReport::Rejected(errors) => println!("{}", render_errors(errors)),
        SubmissionReport::Dispatched { database: Ok(key), .. } => {
            println!("{} {}", "Patient record key:".bold(), key);
        }
        SubmissionReport::Dispatched { .. } => {}
    }
}
