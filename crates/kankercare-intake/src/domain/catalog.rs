//! Fixed option lists offered by the forms

/// Values of the intake form's gender select
pub const GENDERS: [&str; 2] = ["laki-laki", "perempuan"];

pub const CANCER_TYPES: [&str; 9] = [
    "Kanker Payudara",
    "Kanker Paru-paru",
    "Kanker Prostat",
    "Kanker Serviks",
    "Kanker Kolorektal",
    "Kanker Darah (Leukemia)",
    "Kanker Hati",
    "Kanker Lambung",
    "Lainnya",
];

pub const STAGES: [&str; 4] = ["Stadium I", "Stadium II", "Stadium III", "Stadium IV"];

/// Symptoms offered as checkboxes on the intake form
pub const COMMON_SYMPTOMS: [&str; 10] = [
    "Benjolan atau massa abnormal",
    "Penurunan berat badan drastis",
    "Kelelahan kronis",
    "Demam berkepanjangan",
    "Nyeri yang tidak kunjung hilang",
    "Perubahan pada kulit",
    "Batuk kronis",
    "Kesulitan menelan",
    "Perdarahan abnormal",
    "Perubahan kebiasaan buang air",
];

pub const CONSULTATION_TYPES: [&str; 5] = [
    "Konsultasi Umum",
    "Second Opinion",
    "Follow-up Pengobatan",
    "Diskusi Hasil Lab",
    "Konsultasi Darurat",
];

pub const URGENCY_LEVELS: [&str; 3] = ["normal", "urgent", "emergency"];

/// A specialist that can be booked for a consultation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doctor {
    pub id: &'static str,
    pub name: &'static str,
    pub specialty: &'static str,
    pub hospital: &'static str,
    pub available: &'static [&'static str],
}

impl Doctor {
    pub fn offers(&self, slot: &str) -> bool {
        self.available.contains(&slot)
    }
}

pub static DOCTORS: [Doctor; 3] = [
    Doctor {
        id: "dr-amanda",
        name: "Dr. Amanda Sari, Sp.Onk",
        specialty: "Onkologi",
        hospital: "RS Kanker Dharmais",
        available: &["09:00", "10:00", "11:00", "14:00", "15:00"],
    },
    Doctor {
        id: "dr-michael",
        name: "Dr. Michael Tan, Sp.Rad.Onk",
        specialty: "Radioterapi",
        hospital: "RS Cipto Mangunkusumo",
        available: &["08:00", "09:00", "13:00", "14:00", "16:00"],
    },
    Doctor {
        id: "dr-lisa",
        name: "Dr. Lisa Wijaya, Sp.PD-KHOM",
        specialty: "Hematologi Onkologi",
        hospital: "RS Persahabatan",
        available: &["10:00", "11:00", "14:00", "15:00", "16:00"],
    },
];

pub fn find_doctor(id: &str) -> Option<&'static Doctor> {
    DOCTORS.iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_doctor() {
        let doctor = find_doctor("dr-lisa").unwrap();
        assert!(doctor.offers("16:00"));
        assert!(!doctor.offers("09:00"));
        assert!(find_doctor("dr-unknown").is_none());
    }
}
