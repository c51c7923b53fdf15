//! Consultation booking command

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use kankercare_intake::application::{BookingOutcome, ConsultationDesk, ConsultationRequest};
use kankercare_intake::domain::ConsultationRecord;
use kankercare_intake::infrastructure::InMemoryDocumentStore;
use kankercare_intake::ports::outbound::{DocumentStore, CONSULTATIONS_PATH};
use serde_json::json;

use super::{read_form, Context, Status};
use crate::output::render_errors;

pub async fn handle(
    ctx: &Context,
    file: &Path,
    doctor: Option<String>,
    date: Option<NaiveDate>,
    time: Option<String>,
    dry_run: bool,
) -> Result<Status> {
    let form: ConsultationRecord = read_form(file)?;
    let request = ConsultationRequest {
        form,
        doctor,
        date,
        time,
    };

    let dry = dry_run.then(|| Arc::new(InMemoryDocumentStore::new()));
    let store: Arc<dyn DocumentStore> = match &dry {
        Some(store) => store.clone(),
        None => ctx.database()?,
    };
    let desk = ConsultationDesk::new(store, ctx.notifier.clone());
    let booking = desk.book(request).await;

    if ctx.format.is_json() {
        let mut out = match &booking.outcome {
            BookingOutcome::Incomplete => json!({ "status": "incomplete" }),
            BookingOutcome::Rejected(errors) => json!({ "status": "rejected", "errors": errors }),
            BookingOutcome::Booked { key } => json!({ "status": "booked", "key": key }),
            BookingOutcome::Failed(e) => json!({ "status": "failed", "error": e.to_string() }),
        };
        out["notifications"] = json!(ctx.notifier.drain());
        if let Some(store) = &dry {
            out["dryRun"] = json!(store.documents(CONSULTATIONS_PATH));
        }
        ctx.format.print(&out);
    } else {
        match &booking.outcome {
            BookingOutcome::Rejected(errors) => println!("{}", render_errors(errors)),
            BookingOutcome::Booked { key } => println!("{} {}", "Consultation key:".bold(), key),
            BookingOutcome::Incomplete | BookingOutcome::Failed(_) => {}
        }
    }

    Ok(match booking.outcome {
        BookingOutcome::Booked { .. } => Status::Done,
        _ => Status::Declined,
    })
}
