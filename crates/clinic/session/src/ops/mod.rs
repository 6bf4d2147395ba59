//! Operation screens of every role.

pub mod admin;
pub mod doctor;
pub mod patient;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use clinic_api::{
    appointment::AppointmentRequest,
    id::{DoctorId, PatientId},
    time::AppointmentClock,
};

use crate::error::{ClinicError, Result};

/// Appointment details picked by an admin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AppointmentForm {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    /// Wall-clock time, as picked.
    pub at: NaiveDateTime,
}

impl AppointmentForm {
    fn into_request(self, clock: &AppointmentClock) -> Result<AppointmentRequest> {
        Ok(AppointmentRequest {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            date_time: label(clock, self.at)?,
        })
    }
}

/// Appointment details picked by a patient for themselves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MyAppointmentForm {
    pub doctor_id: DoctorId,
    /// Wall-clock time, as picked.
    pub at: NaiveDateTime,
}

impl MyAppointmentForm {
    fn into_request(self, patient_id: PatientId, clock: &AppointmentClock) -> Result<AppointmentRequest> {
        AppointmentForm {
            patient_id,
            doctor_id: self.doctor_id,
            at: self.at,
        }
        .into_request(clock)
    }
}

fn label(clock: &AppointmentClock, at: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
    clock
        .label(at)
        .ok_or_else(|| ClinicError::validation(format!("{at} is not a valid appointment time")))
}
