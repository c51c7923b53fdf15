//! Consultation booking

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::find_doctor;
use crate::domain::payload::timestamp;
use crate::domain::{ConsultationRecord, Doctor};
use crate::notify::{messages, Notification, Notifier};
use crate::ports::outbound::{DocumentStore, SinkError, CONSULTATIONS_PATH};
use crate::sanitize::Sanitize;
use crate::validation::{schemas, FieldErrors, DATE_FORMAT};

const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// Consultation form plus the doctor, date and slot picked for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsultationRequest {
    #[serde(flatten)]
    pub form: ConsultationRecord,
    pub doctor: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

impl ConsultationRequest {
    fn selection(&self) -> Option<(&str, NaiveDate, &str)> {
        let doctor = self.doctor.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let time = self.time.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((doctor, self.date?, time))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConsultationDocument<'a> {
    #[serde(flatten)]
    form: &'a ConsultationRecord,
    doctor: &'a str,
    date: String,
    time: &'a str,
    created_at: String,
}

#[derive(Debug)]
pub enum BookingOutcome {
    /// Doctor, date or time slot not chosen; nothing written
    Incomplete,
    Rejected(FieldErrors),
    Booked { key: String },
    Failed(SinkError),
}

/// Booking result plus the form state to show next
#[derive(Debug)]
pub struct Booking {
    pub outcome: BookingOutcome,
    /// Blank after a successful booking, otherwise the submitted request
    pub form: ConsultationRequest,
}

pub struct ConsultationDesk {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl ConsultationDesk {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn book(&self, request: ConsultationRequest) -> Booking {
        self.book_on(request, Local::now().date_naive()).await
    }

    pub async fn book_on(&self, request: ConsultationRequest, today: NaiveDate) -> Booking {
        let Some((doctor_id, date, time)) = request.selection() else {
            tracing::warn!("consultation booking without doctor, date or time");
            self.notifier.notify(Notification::failure(
                messages::CONSULT_INCOMPLETE_TITLE,
                messages::CONSULT_INCOMPLETE_BODY,
            ));
            return Booking {
                outcome: BookingOutcome::Incomplete,
                form: request,
            };
        };

        let form = request.form.sanitized();
        let doctor = match check_booking(&form, doctor_id, date, time, today) {
            Ok(doctor) => doctor,
            Err(errors) => {
                tracing::warn!(fields = %errors, "consultation booking rejected");
                self.notifier.notify(Notification::failure(
                    messages::VALIDATION_FAILED_TITLE,
                    messages::VALIDATION_FAILED_BODY,
                ));
                return Booking {
                    outcome: BookingOutcome::Rejected(errors),
                    form: request,
                };
            }
        };

        let document = ConsultationDocument {
            form: &form,
            doctor: doctor.id,
            date: date.format(DATE_FORMAT).to_string(),
            time,
            created_at: timestamp(Utc::now()),
        };

        let pushed = match serde_json::to_value(&document) {
            Ok(value) => self.store.push(CONSULTATIONS_PATH, value).await,
            Err(e) => Err(SinkError::from(e)),
        };

        match pushed {
            Ok(key) => {
                tracing::info!(key = %key, doctor = doctor.id, %date, "consultation booked");
                self.notifier.notify(Notification::success(
                    messages::CONSULT_OK_TITLE,
                    format!(
                        "Konsultasi dengan {} pada {} pukul {}.",
                        doctor.name,
                        format_date_id(date),
                        time
                    ),
                ));
                Booking {
                    outcome: BookingOutcome::Booked { key },
                    form: ConsultationRequest::default(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "consultation write failed");
                self.notifier
                    .notify(Notification::failure(messages::CONSULT_FAILED_TITLE, e.to_string()));
                Booking {
                    outcome: BookingOutcome::Failed(e),
                    form: request,
                }
            }
        }
    }
}

/// Form rules plus doctor, slot and calendar constraints
fn check_booking(
    form: &ConsultationRecord,
    doctor_id: &str,
    date: NaiveDate,
    time: &str,
    today: NaiveDate,
) -> Result<&'static Doctor, FieldErrors> {
    let mut errors = schemas::consultation().check(form).err().unwrap_or_default();

    let doctor = find_doctor(doctor_id);
    match doctor {
        None => {
            errors.insert("doctor", "Dokter tidak ditemukan");
        }
        Some(d) if !d.offers(time) => {
            errors.insert("time", "Jadwal tidak tersedia untuk dokter ini");
        }
        Some(_) => {}
    }

    // Same-day and Sunday bookings are not offered
    if date <= today {
        errors.insert("date", "Tanggal konsultasi harus setelah hari ini");
    } else if date.weekday() == Weekday::Sun {
        errors.insert("date", "Konsultasi tidak tersedia pada hari Minggu");
    }

    match doctor {
        Some(d) if errors.is_empty() => Ok(d),
        _ => Err(errors),
    }
}

/// `dd MMMM yyyy` with Indonesian month names
pub fn format_date_id(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryDocumentStore;
    use crate::notify::RecordingNotifier;

    fn today() -> NaiveDate {
        // Saturday
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn request() -> ConsultationRequest {
        ConsultationRequest {
            form: ConsultationRecord {
                name: "Ani Wijaya".into(),
                phone: "081234567890".into(),
                consultation_type: "Second Opinion".into(),
                complaint: "Hasil biopsi <script>x</script>perlu dibahas".into(),
                ..Default::default()
            },
            doctor: Some("dr-amanda".into()),
            date: Some(monday()),
            time: Some("10:00".into()),
        }
    }

    fn desk() -> (ConsultationDesk, Arc<InMemoryDocumentStore>, Arc<RecordingNotifier>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        (ConsultationDesk::new(store.clone(), notifier.clone()), store, notifier)
    }

    #[tokio::test]
    async fn test_missing_time_slot_writes_nothing() {
        let (desk, store, notifier) = desk();
        let mut req = request();
        req.time = Some(" ".into());

        let booking = desk.book_on(req.clone(), today()).await;

        assert!(matches!(booking.outcome, BookingOutcome::Incomplete));
        assert_eq!(booking.form, req);
        assert_eq!(store.attempts(), 0);
        let seen = notifier.notifications();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "Data belum lengkap");
    }

    #[tokio::test]
    async fn test_booking_is_written_under_konsultasi() {
        let (desk, store, notifier) = desk();

        let booking = desk.book_on(request(), today()).await;

        assert!(matches!(booking.outcome, BookingOutcome::Booked { .. }));
        assert_eq!(booking.form, ConsultationRequest::default());

        let doc = store.documents(CONSULTATIONS_PATH).remove(0);
        assert_eq!(doc["name"], "Ani Wijaya");
        assert_eq!(doc["complaint"], "Hasil biopsi perlu dibahas");
        assert_eq!(doc["urgency"], "normal");
        assert_eq!(doc["doctor"], "dr-amanda");
        assert_eq!(doc["date"], "2024-06-03");
        assert_eq!(doc["time"], "10:00");
        assert!(doc["createdAt"].is_string());

        let seen = notifier.notifications();
        assert_eq!(seen[0].title, messages::CONSULT_OK_TITLE);
        assert_eq!(
            seen[0].description,
            "Konsultasi dengan Dr. Amanda Sari, Sp.Onk pada 03 Juni 2024 pukul 10:00."
        );
    }

    #[tokio::test]
    async fn test_slot_doctor_and_calendar_checks() {
        let (desk, store, _) = desk();

        let mut req = request();
        req.time = Some("16:00".into());
        req.date = Some(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        let booking = desk.book_on(req, today()).await;
        match booking.outcome {
            BookingOutcome::Rejected(errors) => {
                assert_eq!(errors.get("time"), Some("Jadwal tidak tersedia untuk dokter ini"));
                assert_eq!(errors.get("date"), Some("Konsultasi tidak tersedia pada hari Minggu"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let mut req = request();
        req.doctor = Some("dr-house".into());
        req.date = Some(today());
        req.form.consultation_type = String::new();
        let booking = desk.book_on(req, today()).await;
        match booking.outcome {
            BookingOutcome::Rejected(errors) => {
                assert!(errors.contains("doctor"));
                assert!(errors.contains("consultationType"));
                assert_eq!(errors.get("date"), Some("Tanggal konsultasi harus setelah hari ini"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(store.attempts(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_form() {
        let store = Arc::new(InMemoryDocumentStore::failing("permission denied"));
        let notifier = Arc::new(RecordingNotifier::new());
        let desk = ConsultationDesk::new(store, notifier.clone());

        let booking = desk.book_on(request(), today()).await;

        assert!(matches!(booking.outcome, BookingOutcome::Failed(_)));
        assert_eq!(booking.form, request());
        let seen = notifier.notifications();
        assert_eq!(seen[0].title, messages::CONSULT_FAILED_TITLE);
        assert_eq!(seen[0].description, "sink unavailable: permission denied");
    }

    #[test]
    fn test_format_date_id() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 9).unwrap();
        assert_eq!(format_date_id(date), "09 Desember 2025");
    }
}
