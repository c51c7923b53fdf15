//! Record shapes collected by the front-end forms

use serde::{Deserialize, Serialize};

use super::fields::{FieldKey, FieldKindMismatch, FieldRef, FieldValue, Record};
use crate::sanitize::{clean_list, clean_text, Sanitize};

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRecord {
    pub email: String,
    pub password: String,
    pub remember_me: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginField {
    Email,
    Password,
    RememberMe,
}

impl FieldKey for LoginField {
    fn path(&self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
            LoginField::RememberMe => "rememberMe",
        }
    }
}

impl Record for LoginRecord {
    type Field = LoginField;

    fn field(&self, field: LoginField) -> FieldRef<'_> {
        match field {
            LoginField::Email => FieldRef::Text(&self.email),
            LoginField::Password => FieldRef::Text(&self.password),
            LoginField::RememberMe => FieldRef::Flag(self.remember_me.unwrap_or(false)),
        }
    }
}

impl Sanitize for LoginRecord {
    fn sanitized(&self) -> Self {
        Self {
            email: clean_text(&self.email),
            password: clean_text(&self.password),
            remember_me: self.remember_me,
        }
    }
}

// =============================================================================
// Register
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRecord {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_terms: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterField {
    FullName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
    AgreeTerms,
}

impl FieldKey for RegisterField {
    fn path(&self) -> &'static str {
        match self {
            RegisterField::FullName => "fullName",
            RegisterField::Email => "email",
            RegisterField::Phone => "phone",
            RegisterField::Password => "password",
            RegisterField::ConfirmPassword => "confirmPassword",
            RegisterField::AgreeTerms => "agreeTerms",
        }
    }
}

impl Record for RegisterRecord {
    type Field = RegisterField;

    fn field(&self, field: RegisterField) -> FieldRef<'_> {
        match field {
            RegisterField::FullName => FieldRef::Text(&self.full_name),
            RegisterField::Email => FieldRef::Text(&self.email),
            RegisterField::Phone => FieldRef::Text(&self.phone),
            RegisterField::Password => FieldRef::Text(&self.password),
            RegisterField::ConfirmPassword => FieldRef::Text(&self.confirm_password),
            RegisterField::AgreeTerms => FieldRef::Flag(self.agree_terms),
        }
    }
}

impl Sanitize for RegisterRecord {
    fn sanitized(&self) -> Self {
        Self {
            full_name: clean_text(&self.full_name),
            email: clean_text(&self.email),
            phone: clean_text(&self.phone),
            password: clean_text(&self.password),
            confirm_password: clean_text(&self.confirm_password),
            agree_terms: self.agree_terms,
        }
    }
}

// =============================================================================
// Patient intake
// =============================================================================

/// Tumour-marker lab values, each optional and numeric-as-string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabResults {
    pub ca125: String,
    pub psa: String,
    pub cea: String,
    pub other: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabMarker {
    Ca125,
    Psa,
    Cea,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientIntakeRecord {
    // Personal data
    pub full_name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub email: String,

    // Cancer details
    pub cancer_type: String,
    pub stage: String,
    pub diagnosis_date: String,

    // Symptoms
    pub symptoms: Vec<String>,
    pub other_symptoms: String,

    // Medical history
    pub family_history: String,
    pub allergies: String,
    pub previous_treatment: String,

    pub lab_results: LabResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntakeField {
    FullName,
    Age,
    Gender,
    Phone,
    Email,
    CancerType,
    Stage,
    DiagnosisDate,
    Symptoms,
    OtherSymptoms,
    FamilyHistory,
    Allergies,
    PreviousTreatment,
    Lab(LabMarker),
}

impl IntakeField {
    pub const ALL: [IntakeField; 17] = [
        IntakeField::FullName,
        IntakeField::Age,
        IntakeField::Gender,
        IntakeField::Phone,
        IntakeField::Email,
        IntakeField::CancerType,
        IntakeField::Stage,
        IntakeField::DiagnosisDate,
        IntakeField::Symptoms,
        IntakeField::OtherSymptoms,
        IntakeField::FamilyHistory,
        IntakeField::Allergies,
        IntakeField::PreviousTreatment,
        IntakeField::Lab(LabMarker::Ca125),
        IntakeField::Lab(LabMarker::Psa),
        IntakeField::Lab(LabMarker::Cea),
        IntakeField::Lab(LabMarker::Other),
    ];

    /// Resolve a dot-joined path back to its field
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.path() == path)
    }
}

impl FieldKey for IntakeField {
    fn path(&self) -> &'static str {
        match self {
            IntakeField::FullName => "fullName",
            IntakeField::Age => "age",
            IntakeField::Gender => "gender",
            IntakeField::Phone => "phone",
            IntakeField::Email => "email",
            IntakeField::CancerType => "cancerType",
            IntakeField::Stage => "stage",
            IntakeField::DiagnosisDate => "diagnosisDate",
            IntakeField::Symptoms => "symptoms",
            IntakeField::OtherSymptoms => "otherSymptoms",
            IntakeField::FamilyHistory => "familyHistory",
            IntakeField::Allergies => "allergies",
            IntakeField::PreviousTreatment => "previousTreatment",
            IntakeField::Lab(LabMarker::Ca125) => "labResults.ca125",
            IntakeField::Lab(LabMarker::Psa) => "labResults.psa",
            IntakeField::Lab(LabMarker::Cea) => "labResults.cea",
            IntakeField::Lab(LabMarker::Other) => "labResults.other",
        }
    }
}

impl Record for PatientIntakeRecord {
    type Field = IntakeField;

    fn field(&self, field: IntakeField) -> FieldRef<'_> {
        match field {
            IntakeField::FullName => FieldRef::Text(&self.full_name),
            IntakeField::Age => FieldRef::Text(&self.age),
            IntakeField::Gender => FieldRef::Text(&self.gender),
            IntakeField::Phone => FieldRef::Text(&self.phone),
            IntakeField::Email => FieldRef::Text(&self.email),
            IntakeField::CancerType => FieldRef::Text(&self.cancer_type),
            IntakeField::Stage => FieldRef::Text(&self.stage),
            IntakeField::DiagnosisDate => FieldRef::Text(&self.diagnosis_date),
            IntakeField::Symptoms => FieldRef::List(&self.symptoms),
            IntakeField::OtherSymptoms => FieldRef::Text(&self.other_symptoms),
            IntakeField::FamilyHistory => FieldRef::Text(&self.family_history),
            IntakeField::Allergies => FieldRef::Text(&self.allergies),
            IntakeField::PreviousTreatment => FieldRef::Text(&self.previous_treatment),
            IntakeField::Lab(LabMarker::Ca125) => FieldRef::Text(&self.lab_results.ca125),
            IntakeField::Lab(LabMarker::Psa) => FieldRef::Text(&self.lab_results.psa),
            IntakeField::Lab(LabMarker::Cea) => FieldRef::Text(&self.lab_results.cea),
            IntakeField::Lab(LabMarker::Other) => FieldRef::Text(&self.lab_results.other),
        }
    }
}

impl PatientIntakeRecord {
    fn text_slot_mut(&mut self, field: IntakeField) -> Option<&mut String> {
        let slot = match field {
            IntakeField::FullName => &mut self.full_name,
            IntakeField::Age => &mut self.age,
            IntakeField::Gender => &mut self.gender,
            IntakeField::Phone => &mut self.phone,
            IntakeField::Email => &mut self.email,
            IntakeField::CancerType => &mut self.cancer_type,
            IntakeField::Stage => &mut self.stage,
            IntakeField::DiagnosisDate => &mut self.diagnosis_date,
            IntakeField::OtherSymptoms => &mut self.other_symptoms,
            IntakeField::FamilyHistory => &mut self.family_history,
            IntakeField::Allergies => &mut self.allergies,
            IntakeField::PreviousTreatment => &mut self.previous_treatment,
            IntakeField::Lab(LabMarker::Ca125) => &mut self.lab_results.ca125,
            IntakeField::Lab(LabMarker::Psa) => &mut self.lab_results.psa,
            IntakeField::Lab(LabMarker::Cea) => &mut self.lab_results.cea,
            IntakeField::Lab(LabMarker::Other) => &mut self.lab_results.other,
            IntakeField::Symptoms => return None,
        };
        Some(slot)
    }

    /// Replace one field's value
    pub fn set(&mut self, field: IntakeField, value: FieldValue) -> Result<(), FieldKindMismatch> {
        match (field, value) {
            (IntakeField::Symptoms, FieldValue::List(items)) => {
                self.symptoms = items;
                Ok(())
            }
            (field, FieldValue::Text(text)) if field != IntakeField::Symptoms => {
                if let Some(slot) = self.text_slot_mut(field) {
                    *slot = text;
                }
                Ok(())
            }
            (field, value) => Err(FieldKindMismatch {
                path: field.path(),
                expected: self.field(field).kind(),
                actual: value.kind(),
            }),
        }
    }

    /// Add the symptom if absent, remove it if present
    pub fn toggle_symptom(&mut self, symptom: &str) {
        if let Some(pos) = self.symptoms.iter().position(|s| s == symptom) {
            self.symptoms.remove(pos);
        } else {
            self.symptoms.push(symptom.to_string());
        }
    }
}

impl Sanitize for PatientIntakeRecord {
    fn sanitized(&self) -> Self {
        Self {
            full_name: clean_text(&self.full_name),
            age: clean_text(&self.age),
            gender: clean_text(&self.gender),
            phone: clean_text(&self.phone),
            email: clean_text(&self.email),
            cancer_type: clean_text(&self.cancer_type),
            stage: clean_text(&self.stage),
            diagnosis_date: clean_text(&self.diagnosis_date),
            symptoms: clean_list(&self.symptoms),
            other_symptoms: clean_text(&self.other_symptoms),
            family_history: clean_text(&self.family_history),
            allergies: clean_text(&self.allergies),
            previous_treatment: clean_text(&self.previous_treatment),
            lab_results: LabResults {
                ca125: clean_text(&self.lab_results.ca125),
                psa: clean_text(&self.lab_results.psa),
                cea: clean_text(&self.lab_results.cea),
                other: clean_text(&self.lab_results.other),
            },
        }
    }
}

// =============================================================================
// Consultation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsultationRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub consultation_type: String,
    pub complaint: String,
    pub urgency: String,
}

impl Default for ConsultationRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            consultation_type: String::new(),
            complaint: String::new(),
            urgency: "normal".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsultationField {
    Name,
    Email,
    Phone,
    ConsultationType,
    Complaint,
    Urgency,
}

impl FieldKey for ConsultationField {
    fn path(&self) -> &'static str {
        match self {
            ConsultationField::Name => "name",
            ConsultationField::Email => "email",
            ConsultationField::Phone => "phone",
            ConsultationField::ConsultationType => "consultationType",
            ConsultationField::Complaint => "complaint",
            ConsultationField::Urgency => "urgency",
        }
    }
}

impl Record for ConsultationRecord {
    type Field = ConsultationField;

    fn field(&self, field: ConsultationField) -> FieldRef<'_> {
        FieldRef::Text(match field {
            ConsultationField::Name => &self.name,
            ConsultationField::Email => &self.email,
            ConsultationField::Phone => &self.phone,
            ConsultationField::ConsultationType => &self.consultation_type,
            ConsultationField::Complaint => &self.complaint,
            ConsultationField::Urgency => &self.urgency,
        })
    }
}

impl Sanitize for ConsultationRecord {
    fn sanitized(&self) -> Self {
        Self {
            name: clean_text(&self.name),
            email: clean_text(&self.email),
            phone: clean_text(&self.phone),
            consultation_type: clean_text(&self.consultation_type),
            complaint: clean_text(&self.complaint),
            urgency: clean_text(&self.urgency),
        }
    }
}
