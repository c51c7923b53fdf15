//! Rule sets of the four forms

use std::sync::LazyLock;

use super::patterns::NAME_CHARS;
use super::{Check, FieldRules, RuleSet};
use crate::domain::catalog::{CONSULTATION_TYPES, GENDERS, URGENCY_LEVELS};
use crate::domain::{
    ConsultationField, ConsultationRecord, FieldKey, IntakeField, LabMarker, LoginField, LoginRecord,
    PatientIntakeRecord, RegisterField, RegisterRecord,
};

pub const PASSWORD_MISMATCH: &str = "Password dan konfirmasi password tidak sama";

static LOGIN: LazyLock<RuleSet<LoginRecord>> = LazyLock::new(|| {
    RuleSet::<LoginRecord>::new()
        .field(email_rules(LoginField::Email))
        .field(password_rules(LoginField::Password))
        .field(FieldRules::optional(LoginField::RememberMe))
});

static REGISTER: LazyLock<RuleSet<RegisterRecord>> = LazyLock::new(|| {
    RuleSet::<RegisterRecord>::new()
        .field(full_name_rules(RegisterField::FullName))
        .field(email_rules(RegisterField::Email))
        .field(phone_rules(RegisterField::Phone))
        .field(password_rules(RegisterField::Password))
        .field(FieldRules::checked(RegisterField::ConfirmPassword))
        .field(
            FieldRules::checked(RegisterField::AgreeTerms)
                .check(Check::MustBeTrue("Anda harus menyetujui syarat dan ketentuan")),
        )
        .refine(RegisterField::ConfirmPassword, PASSWORD_MISMATCH, |r| {
            r.password == r.confirm_password
        })
});

static INTAKE: LazyLock<RuleSet<PatientIntakeRecord>> = LazyLock::new(|| {
    RuleSet::<PatientIntakeRecord>::new()
        // Personal data
        .field(full_name_rules(IntakeField::FullName))
        .field(
            FieldRules::required(IntakeField::Age, "Usia harus diisi").check(Check::IntegerRange {
                min: 1,
                max: 150,
                message: "Usia harus antara 1-150 tahun",
            }),
        )
        .field(
            FieldRules::checked(IntakeField::Gender)
                .check(Check::OneOf(&GENDERS, "Jenis kelamin harus dipilih")),
        )
        .field(phone_rules(IntakeField::Phone))
        .field(
            FieldRules::optional(IntakeField::Email)
                .check(Check::Email("Format email tidak valid"))
                .check(Check::MaxChars(255, "Email terlalu panjang")),
        )
        // Cancer details
        .field(FieldRules::required(IntakeField::CancerType, "Jenis kanker harus dipilih"))
        .field(FieldRules::optional(IntakeField::Stage))
        .field(
            FieldRules::optional(IntakeField::DiagnosisDate)
                .check(Check::IsoDate("Format tanggal diagnosa tidak valid"))
                .check(Check::NotInFuture("Tanggal diagnosa tidak boleh di masa depan")),
        )
        .field(FieldRules::optional(IntakeField::Symptoms))
        .field(max_chars(IntakeField::OtherSymptoms, 1000, "Deskripsi gejala terlalu panjang"))
        // Medical history
        .field(max_chars(IntakeField::FamilyHistory, 1000, "Riwayat keluarga terlalu panjang"))
        .field(max_chars(IntakeField::Allergies, 500, "Deskripsi alergi terlalu panjang"))
        .field(max_chars(
            IntakeField::PreviousTreatment,
            1000,
            "Deskripsi pengobatan terlalu panjang",
        ))
        // Lab results
        .field(lab_value(LabMarker::Ca125, "Nilai CA-125 harus berupa angka positif"))
        .field(lab_value(LabMarker::Psa, "Nilai PSA harus berupa angka positif"))
        .field(lab_value(LabMarker::Cea, "Nilai CEA harus berupa angka positif"))
        .field(max_chars(
            IntakeField::Lab(LabMarker::Other),
            200,
            "Deskripsi marker lainnya terlalu panjang",
        ))
});

static CONSULTATION: LazyLock<RuleSet<ConsultationRecord>> = LazyLock::new(|| {
    RuleSet::<ConsultationRecord>::new()
        .field(
            FieldRules::required(ConsultationField::Name, "Nama harus diisi")
                .check(Check::MaxChars(100, "Nama terlalu panjang")),
        )
        .field(
            FieldRules::optional(ConsultationField::Email)
                .check(Check::Email("Format email tidak valid"))
                .check(Check::MaxChars(255, "Email terlalu panjang")),
        )
        .field(phone_rules(ConsultationField::Phone))
        .field(
            FieldRules::checked(ConsultationField::ConsultationType)
                .check(Check::OneOf(&CONSULTATION_TYPES, "Jenis konsultasi harus dipilih")),
        )
        .field(
            FieldRules::checked(ConsultationField::Urgency)
                .check(Check::OneOf(&URGENCY_LEVELS, "Tingkat urgensi tidak valid")),
        )
        .field(
            FieldRules::required(ConsultationField::Complaint, "Keluhan harus diisi")
                .check(Check::MaxChars(1000, "Deskripsi keluhan terlalu panjang")),
        )
});

pub fn login() -> &'static RuleSet<LoginRecord> {
    &LOGIN
}

pub fn register() -> &'static RuleSet<RegisterRecord> {
    &REGISTER
}

pub fn intake() -> &'static RuleSet<PatientIntakeRecord> {
    &INTAKE
}

pub fn consultation() -> &'static RuleSet<ConsultationRecord> {
    &CONSULTATION
}

fn email_rules<F: FieldKey>(field: F) -> FieldRules<F> {
    FieldRules::required(field, "Email harus diisi")
        .check(Check::Email("Format email tidak valid"))
        .check(Check::MaxChars(255, "Email terlalu panjang"))
}

fn password_rules<F: FieldKey>(field: F) -> FieldRules<F> {
    FieldRules::checked(field)
        .check(Check::MinChars(8, "Password minimal 8 karakter"))
        .check(Check::MaxChars(128, "Password terlalu panjang"))
        .check(Check::PasswordComplexity(
            "Password harus mengandung huruf besar, huruf kecil, dan angka",
        ))
}

fn full_name_rules<F: FieldKey>(field: F) -> FieldRules<F> {
    FieldRules::checked(field)
        .check(Check::MinChars(2, "Nama minimal 2 karakter"))
        .check(Check::MaxChars(100, "Nama terlalu panjang"))
        .check(Check::Matches(&NAME_CHARS, "Nama hanya boleh mengandung huruf dan spasi"))
}

fn phone_rules<F: FieldKey>(field: F) -> FieldRules<F> {
    FieldRules::required(field, "Nomor telepon harus diisi")
        .check(Check::Phone("Format nomor telepon tidak valid"))
}

fn max_chars(field: IntakeField, max: usize, message: &'static str) -> FieldRules<IntakeField> {
    FieldRules::optional(field).check(Check::MaxChars(max, message))
}

fn lab_value(marker: LabMarker, message: &'static str) -> FieldRules<IntakeField> {
    FieldRules::optional(IntakeField::Lab(marker)).check(Check::NonNegativeNumber(message))
}
