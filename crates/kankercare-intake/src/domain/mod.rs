//! Domain module
//!
//! Record shapes, typed field access, option catalogues, uploads and
//! outbound payloads.

pub mod catalog;
pub mod fields;
pub mod payload;
pub mod records;
pub mod upload;

pub use catalog::{find_doctor, Doctor, DOCTORS};
pub use fields::{FieldKey, FieldKindMismatch, FieldRef, FieldValue, Record, ValueKind};
pub use payload::{PatientDocument, WebhookPayload};
pub use records::{
    ConsultationField, ConsultationRecord, IntakeField, LabMarker, LabResults, LoginField,
    LoginRecord, PatientIntakeRecord, RegisterField, RegisterRecord,
};
pub use upload::{guess_mime_type, FileRejection, UploadedFile, ALLOWED_MIME_TYPES, MAX_UPLOAD_BYTES};
