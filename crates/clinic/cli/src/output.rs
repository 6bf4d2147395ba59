use anyhow::{anyhow, Result};
use clinic_api::{
    appointment::{Appointment, EnrichedAppointment},
    doctor::Doctor,
    medical_history::MedicalHistory,
    patient::Patient,
    time::format_rfc3339,
    timetable::Workday,
};
use serde::Serialize;

/// A value printable as one table row.
pub(crate) trait Row: Serialize {
    const HEADER: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl Row for Appointment {
    const HEADER: &'static [&'static str] = &["ID", "PATIENT", "DOCTOR", "DATE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.patient_id.to_string(),
            self.doctor_id.to_string(),
            format_rfc3339(&self.date_time),
        ]
    }
}

impl Row for EnrichedAppointment {
    const HEADER: &'static [&'static str] = &[
        "ID",
        "PATIENT",
        "PATIENT NAME",
        "DOCTOR",
        "DOCTOR NAME",
        "SPECIALIZATION",
        "DATE",
    ];

    fn cells(&self) -> Vec<String> {
        let Self {
            appointment,
            patient_name,
            doctor_name,
            doctor_specialization,
        } = self;
        let or_blank = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());

        vec![
            appointment.id.to_string(),
            appointment.patient_id.to_string(),
            or_blank(patient_name),
            appointment.doctor_id.to_string(),
            or_blank(doctor_name),
            or_blank(doctor_specialization),
            format_rfc3339(&appointment.date_time),
        ]
    }
}

impl Row for Doctor {
    const HEADER: &'static [&'static str] = &["ID", "NAME", "SPECIALIZATION", "PHONE", "EMAIL"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.fio.clone(),
            self.specialization.clone(),
            self.phone_number.clone(),
            self.email.clone(),
        ]
    }
}

impl Row for Patient {
    const HEADER: &'static [&'static str] = &["ID", "NAME", "INSURANCE", "PHONE", "EMAIL"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.fio.clone(),
            self.insurance.clone(),
            self.phone_number.clone(),
            self.email.clone(),
        ]
    }
}

impl Row for MedicalHistory {
    const HEADER: &'static [&'static str] = &[
        "ID",
        "PATIENT",
        "CHRONIC DISEASES",
        "ALLERGIES",
        "BLOOD TYPE",
        "VACCINATION",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.patient_id.to_string(),
            self.form.chronic_diseases.clone(),
            self.form.allergies.clone(),
            self.form.blood_type.clone(),
            self.form.vaccination.clone(),
        ]
    }
}

impl Row for Workday {
    const HEADER: &'static [&'static str] = &["ID", "DOCTOR", "OFFICE", "WEEKDAY"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.doctor_id.to_string(),
            self.office_id.to_string(),
            self.work_day.to_string(),
        ]
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Output {
    json: bool,
}

impl Output {
    pub(crate) const fn new(json: bool) -> Self {
        Self { json }
    }

    pub(crate) fn print_one<T>(&self, row: &T) -> Result<()>
    where
        T: Row,
    {
        self.print_all(::std::slice::from_ref(row))
    }

    pub(crate) fn print_all<T>(&self, rows: &[T]) -> Result<()>
    where
        T: Row,
    {
        if self.json {
            for row in rows {
                let row = ::serde_json::to_string(row)
                    .map_err(|error| anyhow!("failed to serialize row to JSON format: {error}"))?;
                println!("{row}");
            }
        } else {
            let cells: Vec<_> = rows.iter().map(Row::cells).collect();
            print!("{}", render_table(T::HEADER, &cells));
        }
        Ok(())
    }

    pub(crate) fn print_done(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }
}

fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = header.iter().map(|cell| cell.to_string()).collect::<Vec<_>>();
    ::std::iter::once(&header)
        .chain(rows)
        .map(|row| {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            format!("{}\n", line.trim_end())
        })
        .collect()
}
