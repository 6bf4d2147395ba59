use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{
    doctor::Doctor,
    id::{AppointmentId, DoctorId, PatientId},
    patient::Patient,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    #[serde(with = "crate::time::rfc3339")]
    pub date_time: DateTime<FixedOffset>,
}

/// Body of both the create and the edit calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    #[serde(with = "crate::time::rfc3339")]
    pub date_time: DateTime<FixedOffset>,
}

impl AppointmentRequest {
    pub fn into_appointment(self, id: AppointmentId) -> Appointment {
        let Self {
            patient_id,
            doctor_id,
            date_time,
        } = self;

        Appointment {
            id,
            patient_id,
            doctor_id,
            date_time,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentFilter {
    Doctor(DoctorId),
    Patient(PatientId),
}

impl AppointmentFilter {
    pub fn query(&self) -> [(&'static str, i64); 1] {
        match *self {
            Self::Doctor(DoctorId(id)) => [("doctor_id", id)],
            Self::Patient(PatientId(id)) => [("patient_id", id)],
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        match *self {
            Self::Doctor(id) => appointment.doctor_id == id,
            Self::Patient(id) => appointment.patient_id == id,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created<Id> {
    pub id: Id,
}

/// An appointment joined with display-only names. Never sent back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedAppointment {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_specialization: Option<String>,
}

impl From<Appointment> for EnrichedAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            appointment,
            patient_name: None,
            doctor_name: None,
            doctor_specialization: None,
        }
    }
}

impl EnrichedAppointment {
    pub fn with_doctor(mut self, doctor: Option<Doctor>) -> Self {
        if let Some(Doctor {
            fio,
            specialization,
            ..
        }) = doctor
        {
            self.doctor_name = Some(fio);
            self.doctor_specialization = Some(specialization);
        }
        self
    }

    pub fn with_patient(mut self, patient: Option<Patient>) -> Self {
        if let Some(Patient { fio, .. }) = patient {
            self.patient_name = Some(fio);
        }
        self
    }
}
