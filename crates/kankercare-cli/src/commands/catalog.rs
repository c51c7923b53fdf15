//! Option listings: doctors and the fixed form choices

use anyhow::Result;
use colored::Colorize;
use kankercare_intake::domain::catalog::{
    CANCER_TYPES, COMMON_SYMPTOMS, CONSULTATION_TYPES, GENDERS, STAGES, URGENCY_LEVELS,
};
use kankercare_intake::domain::{Doctor, DOCTORS};
use serde::Serialize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{Context, Status};

#[derive(Debug, Serialize, Tabled)]
struct DoctorRow {
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "Nama")]
    name: &'static str,
    #[tabled(rename = "Spesialisasi")]
    specialty: &'static str,
    #[tabled(rename = "Rumah Sakit")]
    hospital: &'static str,
    #[tabled(rename = "Jadwal")]
    slots: String,
}

impl From<&Doctor> for DoctorRow {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            specialty: doctor.specialty,
            hospital: doctor.hospital,
            slots: doctor.available.join(", "),
        }
    }
}

pub fn doctors(ctx: &Context) -> Result<Status> {
    let rows: Vec<DoctorRow> = DOCTORS.iter().map(DoctorRow::from).collect();
    if ctx.format.is_json() {
        ctx.format.print(&rows);
    } else {
        println!("{}", Table::new(rows).with(Style::rounded()));
    }
    Ok(Status::Done)
}

pub fn options(ctx: &Context) -> Result<Status> {
    let lists: [(&str, &[&str]); 6] = [
        ("gender", &GENDERS),
        ("cancerType", &CANCER_TYPES),
        ("stage", &STAGES),
        ("symptoms", &COMMON_SYMPTOMS),
        ("consultationType", &CONSULTATION_TYPES),
        ("urgency", &URGENCY_LEVELS),
    ];

    if ctx.format.is_json() {
        let map: serde_json::Map<_, _> = lists
            .iter()
            .map(|(name, values)| (name.to_string(), json!(values)))
            .collect();
        ctx.format.print(&map);
    } else {
        for (name, values) in lists {
            println!("{}", name.bold());
            for value in values {
                println!("  - {value}");
            }
        }
    }
    Ok(Status::Done)
}
