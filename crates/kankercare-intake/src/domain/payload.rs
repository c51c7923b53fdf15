//! Outbound payload shapes of a patient submission

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::records::PatientIntakeRecord;
use super::upload::UploadedFile;

/// Separator of the comma-joined display strings
pub const LIST_SEPARATOR: &str = ", ";

/// Flattened record posted to the workflow webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub full_name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub cancer_type: String,
    pub stage: String,
    pub diagnosis_date: String,
    pub symptoms: String,
    pub other_symptoms: String,
    pub family_history: String,
    pub allergies: String,
    pub previous_treatment: String,
    pub ca125: String,
    pub psa: String,
    pub cea: String,
    pub other_lab_marker: String,
    pub uploaded_file_names: String,
    pub submitted_at: String,
}

impl WebhookPayload {
    /// `symptoms` is taken as already sanitized
    pub fn new(record: &PatientIntakeRecord, files: &[UploadedFile], submitted_at: DateTime<Utc>) -> Self {
        let labs = &record.lab_results;
        Self {
            full_name: record.full_name.clone(),
            age: record.age.clone(),
            gender: record.gender.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            cancer_type: record.cancer_type.clone(),
            stage: record.stage.clone(),
            diagnosis_date: record.diagnosis_date.clone(),
            symptoms: record.symptoms.join(LIST_SEPARATOR),
            other_symptoms: record.other_symptoms.clone(),
            family_history: record.family_history.clone(),
            allergies: record.allergies.clone(),
            previous_treatment: record.previous_treatment.clone(),
            ca125: labs.ca125.clone(),
            psa: labs.psa.clone(),
            cea: labs.cea.clone(),
            other_lab_marker: labs.other.clone(),
            uploaded_file_names: file_names(files).join(LIST_SEPARATOR),
            submitted_at: timestamp(submitted_at),
        }
    }
}

/// Record written to the document database under `patients`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDocument {
    #[serde(flatten)]
    pub record: PatientIntakeRecord,
    pub submitted_at: String,
    pub uploaded_file_names: Vec<String>,
}

impl PatientDocument {
    pub fn new(record: PatientIntakeRecord, files: &[UploadedFile], submitted_at: DateTime<Utc>) -> Self {
        Self {
            record,
            submitted_at: timestamp(submitted_at),
            uploaded_file_names: file_names(files),
        }
    }
}

fn file_names(files: &[UploadedFile]) -> Vec<String> {
    files.iter().map(|f| f.name.clone()).collect()
}

/// RFC 3339 with millisecond precision, `Z` suffix
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    }

    fn record() -> PatientIntakeRecord {
        let mut record = PatientIntakeRecord {
            full_name: "Budi Santoso".into(),
            symptoms: vec!["Batuk kronis".into(), "Kelelahan kronis".into()],
            ..Default::default()
        };
        record.lab_results.other = "AFP: 12".into();
        record
    }

    #[test]
    fn test_webhook_payload_flattens() {
        let files = vec![
            UploadedFile::new("ct.pdf", "application/pdf", 1024),
            UploadedFile::new("lab.png", "image/png", 2048),
        ];
        let payload = WebhookPayload::new(&record(), &files, submitted_at());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["symptoms"], "Batuk kronis, Kelelahan kronis");
        assert_eq!(json["uploadedFileNames"], "ct.pdf, lab.png");
        assert_eq!(json["otherLabMarker"], "AFP: 12");
        assert_eq!(json["submittedAt"], "2024-06-01T08:30:00.000Z");
        assert!(json.get("labResults").is_none());
    }

    #[test]
    fn test_patient_document_keeps_record_shape() {
        let files = vec![UploadedFile::new("ct.pdf", "application/pdf", 1024)];
        let doc = PatientDocument::new(record(), &files, submitted_at());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["fullName"], "Budi Santoso");
        assert_eq!(json["labResults"]["other"], "AFP: 12");
        assert_eq!(json["symptoms"][1], "Kelelahan kronis");
        assert_eq!(json["uploadedFileNames"], serde_json::json!(["ct.pdf"]));
        assert_eq!(json["submittedAt"], "2024-06-01T08:30:00.000Z");
    }
}
