//! Form validation command

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use kankercare_intake::domain::{ConsultationRecord, LoginRecord, PatientIntakeRecord, RegisterRecord};
use kankercare_intake::validation::{schemas, FieldErrors};
use serde_json::json;

use super::{read_form, Context, Status};
use crate::output::render_errors;
use crate::FormKind;

pub fn handle(ctx: &Context, form: FormKind, file: &Path) -> Result<Status> {
    let result = check(form, file)?;

    if ctx.format.is_json() {
        match &result {
            Ok(()) => ctx.format.print(&json!({ "valid": true })),
            Err(errors) => ctx.format.print(&json!({ "valid": false, "errors": errors })),
        }
    } else {
        match &result {
            Ok(()) => println!("{} {}", "✔".green(), "Form is valid".green()),
            Err(errors) => {
                println!("{} {} invalid field(s)", "✖".red(), errors.len());
                println!("{}", render_errors(errors));
            }
        }
    }

    Ok(match result {
        Ok(()) => Status::Done,
        Err(_) => Status::Declined,
    })
}

fn check(form: FormKind, file: &Path) -> Result<Result<(), FieldErrors>> {
    Ok(match form {
        FormKind::Login => schemas::login().check(&read_form::<LoginRecord>(file)?),
        FormKind::Register => schemas::register().check(&read_form::<RegisterRecord>(file)?),
        FormKind::Intake => schemas::intake().check(&read_form::<PatientIntakeRecord>(file)?),
        FormKind::Consultation => schemas::consultation().check(&read_form::<ConsultationRecord>(file)?),
    })
}
