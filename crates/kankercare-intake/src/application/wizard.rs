//! Four-step patient intake wizard
//!
//! [`WizardState`] is a plain value. Every user action is a transition that
//! consumes the current state and returns the next one together with the
//! notifications it produced; [`IntakeWizard`] owns the state between
//! actions and runs the final submission.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{FieldKey, FieldValue, IntakeField, LabMarker, PatientIntakeRecord, UploadedFile};
use crate::notify::{messages, Notification, Notifier};
use crate::sanitize::sanitize;
use crate::validation::{schemas, FieldErrors};

use super::submission::{SubmissionReport, SubmissionService};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    #[default]
    PersonalData,
    CancerDetails,
    MedicalHistory,
    Review,
}

impl Step {
    pub const COUNT: u8 = 4;

    /// 1-based position
    pub fn number(self) -> u8 {
        match self {
            Step::PersonalData => 1,
            Step::CancerDetails => 2,
            Step::MedicalHistory => 3,
            Step::Review => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::PersonalData => "Data Pribadi",
            Step::CancerDetails => "Detail Kanker",
            Step::MedicalHistory => "Riwayat Medis",
            Step::Review => "Review Data",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Step::PersonalData => Step::CancerDetails,
            Step::CancerDetails => Step::MedicalHistory,
            Step::MedicalHistory | Step::Review => Step::Review,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Step::PersonalData | Step::CancerDetails => Step::PersonalData,
            Step::MedicalHistory => Step::CancerDetails,
            Step::Review => Step::MedicalHistory,
        }
    }

    /// Fields gated by this step
    pub fn fields(self) -> &'static [IntakeField] {
        match self {
            Step::PersonalData => &[
                IntakeField::FullName,
                IntakeField::Age,
                IntakeField::Gender,
                IntakeField::Phone,
                IntakeField::Email,
            ],
            Step::CancerDetails => &[
                IntakeField::CancerType,
                IntakeField::Stage,
                IntakeField::DiagnosisDate,
                IntakeField::Symptoms,
                IntakeField::OtherSymptoms,
            ],
            Step::MedicalHistory => &[
                IntakeField::FamilyHistory,
                IntakeField::Allergies,
                IntakeField::PreviousTreatment,
                IntakeField::Lab(LabMarker::Ca125),
                IntakeField::Lab(LabMarker::Psa),
                IntakeField::Lab(LabMarker::Cea),
                IntakeField::Lab(LabMarker::Other),
            ],
            Step::Review => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub step: Step,
    pub record: PatientIntakeRecord,
    /// Errors of the latest validation, by field path
    pub errors: FieldErrors,
    /// Accepted uploads in acceptance order
    pub uploads: Vec<UploadedFile>,
}

/// Result of applying one action to a state
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: WizardState,
    pub notifications: Vec<Notification>,
}

impl Transition {
    fn quiet(state: WizardState) -> Self {
        Self {
            state,
            notifications: Vec::new(),
        }
    }
}

impl WizardState {
    /// Sanitize and store one field, clearing its error
    pub fn edit_field(mut self, field: IntakeField, value: FieldValue) -> Transition {
        let value = match value {
            FieldValue::Text(text) => FieldValue::Text(sanitize(&text)),
            FieldValue::List(items) => FieldValue::List(
                items
                    .iter()
                    .map(|s| sanitize(s))
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            flag @ FieldValue::Flag(_) => flag,
        };

        // A mismatched kind leaves the record untouched
        match self.record.set(field, value) {
            Ok(()) => {
                self.errors.remove(field.path());
            }
            Err(e) => tracing::warn!(error = %e, "ignoring edit of the wrong kind"),
        }
        Transition::quiet(self)
    }

    pub fn toggle_symptom(mut self, symptom: &str) -> Transition {
        let symptom = sanitize(symptom);
        if symptom.is_empty() {
            tracing::debug!("ignoring symptom that is empty once sanitized");
            return Transition::quiet(self);
        }
        self.record.toggle_symptom(&symptom);
        self.errors.remove(IntakeField::Symptoms.path());
        Transition::quiet(self)
    }

    /// Validate the current step's fields against today's date and move on
    pub fn advance(self) -> Transition {
        self.advance_on(Local::now().date_naive())
    }

    pub fn advance_on(mut self, today: NaiveDate) -> Transition {
        match schemas::intake().check_fields_on(&self.record, self.step.fields(), today) {
            Ok(()) => {
                let from = self.step;
                self.step = from.next();
                self.errors = FieldErrors::new();
                tracing::debug!(from = from.number(), to = self.step.number(), "wizard advanced");
                Transition::quiet(self)
            }
            Err(errors) => {
                tracing::debug!(step = self.step.number(), fields = %errors, "step validation failed");
                self.errors = errors;
                Transition {
                    state: self,
                    notifications: vec![Notification::failure(
                        messages::VALIDATION_FAILED_TITLE,
                        messages::VALIDATION_FAILED_BODY,
                    )],
                }
            }
        }
    }

    /// Back one step without validating
    pub fn retreat(mut self) -> Transition {
        self.step = self.step.previous();
        Transition::quiet(self)
    }

    /// Accept each file that passes the type and size checks
    pub fn upload_files(mut self, files: Vec<UploadedFile>) -> Transition {
        let mut notifications = Vec::new();
        for file in files {
            match file.validate() {
                Ok(()) => {
                    tracing::debug!(file = %file.name, size = file.size, "upload accepted");
                    self.uploads.push(file);
                }
                Err(reason) => {
                    tracing::warn!(file = %file.name, %reason, "upload rejected");
                    notifications.push(Notification::failure(
                        messages::file_rejected_title(&file.name),
                        reason.to_string(),
                    ));
                }
            }
        }
        Transition {
            state: self,
            notifications,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardError {
    /// Submission is only offered on the review step
    #[error("cannot submit from step {0}, submission happens on step 4")]
    NotOnReview(u8),
}

/// Owns the wizard state and forwards notifications
pub struct IntakeWizard {
    state: WizardState,
    submission: SubmissionService,
    notifier: Arc<dyn Notifier>,
}

impl IntakeWizard {
    pub fn new(submission: SubmissionService, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: WizardState::default(),
            submission,
            notifier,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    pub fn edit_field(&mut self, field: IntakeField, value: impl Into<FieldValue>) {
        self.apply(|s| s.edit_field(field, value.into()));
    }

    pub fn toggle_symptom(&mut self, symptom: &str) {
        self.apply(|s| s.toggle_symptom(symptom));
    }

    /// Returns whether the wizard moved forward
    pub fn advance(&mut self) -> bool {
        let before = self.state.step;
        self.apply(WizardState::advance);
        self.state.step != before || before == Step::Review
    }

    pub fn retreat(&mut self) {
        self.apply(WizardState::retreat);
    }

    pub fn upload_files(&mut self, files: Vec<UploadedFile>) {
        self.apply(|s| s.upload_files(files));
    }

    /// Submit from the review step. Rejection returns to step 1 keeping the
    /// entered data; any dispatch resets the wizard to a blank state.
    pub async fn submit(&mut self) -> Result<SubmissionReport, WizardError> {
        if self.state.step != Step::Review {
            return Err(WizardError::NotOnReview(self.state.step.number()));
        }

        let report = self
            .submission
            .submit(&self.state.record, &self.state.uploads, self.notifier.as_ref())
            .await;

        self.state = match &report {
            SubmissionReport::Rejected(errors) => WizardState {
                step: Step::PersonalData,
                errors: errors.clone(),
                ..std::mem::take(&mut self.state)
            },
            SubmissionReport::Dispatched { .. } => WizardState::default(),
        };
        Ok(report)
    }

    fn apply(&mut self, action: impl FnOnce(WizardState) -> Transition) {
        let transition = action(std::mem::take(&mut self.state));
        self.state = transition.state;
        for notification in transition.notifications {
            self.notifier.notify(notification);
        }
    }
}
