//! User-facing notifications (toasts)

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Visual variant of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

/// A toast shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Sink for notifications produced by the pipeline
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => tracing::info!(title = %notification.title, "{}", notification.description),
            Variant::Destructive => tracing::warn!(title = %notification.title, "{}", notification.description),
        }
    }
}

/// Keeps every notification in order; used by tests and by front-ends that
/// render the whole batch after an action completes.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock())
    }

    pub fn failures(&self) -> usize {
        self.seen.lock().iter().filter(|n| n.is_failure()).count()
    }

    pub fn successes(&self) -> usize {
        self.seen.lock().iter().filter(|n| !n.is_failure()).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().push(notification);
    }
}

/// Indonesian message catalogue shared by the application services
pub(crate) mod messages {
    pub const VALIDATION_FAILED_TITLE: &str = "Data belum valid";
    pub const VALIDATION_FAILED_BODY: &str = "Mohon periksa kembali isian yang ditandai.";

    pub const SUBMIT_INVALID_TITLE: &str = "Gagal mengirim data";
    pub const SUBMIT_INVALID_BODY: &str = "Mohon lengkapi semua data yang wajib diisi dengan benar.";

    pub const WEBHOOK_OK_TITLE: &str = "Data terkirim";
    pub const WEBHOOK_OK_BODY: &str = "Data pasien telah diteruskan ke tim medis.";
    pub const WEBHOOK_FAILED_TITLE: &str = "Gagal mengirim ke webhook";

    pub const DATABASE_OK_TITLE: &str = "Data berhasil disimpan!";
    pub const DATABASE_OK_BODY: &str =
        "Informasi pasien telah tersimpan dengan aman. Tim medis akan menghubungi Anda segera.";
    pub const DATABASE_FAILED_TITLE: &str = "Gagal menyimpan ke database";

    pub const UNEXPECTED_TITLE: &str = "Error";
    pub const UNEXPECTED_SUBMIT_BODY: &str = "Terjadi kesalahan saat mengirim data. Silakan coba lagi.";

    pub const RATE_LIMITED_TITLE: &str = "Terlalu banyak percobaan";

    pub const LOGIN_OK_TITLE: &str = "Login Berhasil";
    pub const LOGIN_OK_BODY: &str = "Selamat datang kembali di KankerCare";
    pub const REGISTER_OK_TITLE: &str = "Registrasi Berhasil";
    pub const REGISTER_OK_BODY: &str = "Akun Anda telah berhasil dibuat. Silakan login.";

    pub const CONSULT_INCOMPLETE_TITLE: &str = "Data belum lengkap";
    pub const CONSULT_INCOMPLETE_BODY: &str = "Mohon pilih tanggal, waktu, dan dokter konsultasi.";
    pub const CONSULT_OK_TITLE: &str = "Konsultasi berhasil dikirim!";
    pub const CONSULT_FAILED_TITLE: &str = "Gagal mengirim data";

    pub fn file_rejected_title(name: &str) -> String {
        format!("File ditolak: {name}")
    }

    pub fn retry_in(minutes: u64) -> String {
        format!("Coba lagi dalam {minutes} menit")
    }
}
