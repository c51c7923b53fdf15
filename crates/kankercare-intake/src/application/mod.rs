//! Application layer
//!
//! Use cases driving the domain: the intake wizard, the submission fan-out,
//! consultation booking and the mock authentication flows.

pub mod auth;
pub mod consultation;
pub mod submission;
pub mod wizard;

pub use auth::{AuthOutcome, AuthService};
pub use consultation::{Booking, BookingOutcome, ConsultationDesk, ConsultationRequest};
pub use submission::{SinkFailure, SubmissionReport, SubmissionService};
pub use wizard::{IntakeWizard, Step, Transition, WizardError, WizardState};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::PatientIntakeRecord;

    /// Intake record that passes every rule, with one symptom needing sanitization
    pub fn valid_record() -> PatientIntakeRecord {
        PatientIntakeRecord {
            full_name: "Budi Santoso".into(),
            age: "52".into(),
            gender: "laki-laki".into(),
            phone: "08123456789".into(),
            cancer_type: "Kanker Paru-paru".into(),
            symptoms: vec!["Batuk kronis".into(), "<script>x</script>Kelelahan kronis".into()],
            ..Default::default()
        }
    }
}
