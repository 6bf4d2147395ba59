mod http;

use async_trait::async_trait;
use clinic_api::{
    appointment::{Appointment, AppointmentFilter, AppointmentRequest},
    auth::{LoginRequest, LoginResponse, RegisterRequest},
    doctor::Doctor,
    id::{AppointmentId, DoctorId, PatientId},
    medical_history::{MedicalHistory, MedicalHistoryForm},
    patient::Patient,
    timetable::Workday,
    token::SessionToken,
};
use thiserror::Error;

pub use self::http::{ClinicClient, ClinicClientArgs};

pub type Result<T, E = ApiError> = ::core::result::Result<T, E>;

/// The clinic backend, as seen by the client.
///
/// Every authenticated call takes the bearer token explicitly: the client
/// keeps no session of its own.
#[async_trait]
pub trait ClinicApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    async fn register(&self, request: &RegisterRequest) -> Result<()>;

    async fn create_appointment(
        &self,
        token: &SessionToken,
        request: &AppointmentRequest,
    ) -> Result<AppointmentId>;

    async fn get_appointment(
        &self,
        token: &SessionToken,
        id: AppointmentId,
    ) -> Result<Appointment>;

    async fn list_appointments(
        &self,
        token: &SessionToken,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>>;

    async fn edit_appointment(
        &self,
        token: &SessionToken,
        id: AppointmentId,
        request: &AppointmentRequest,
    ) -> Result<()>;

    async fn delete_appointment(&self, token: &SessionToken, id: AppointmentId) -> Result<()>;

    async fn list_doctors(&self, token: &SessionToken) -> Result<Vec<Doctor>>;

    async fn get_doctor(&self, token: &SessionToken, id: DoctorId) -> Result<Doctor>;

    async fn list_doctor_workdays(
        &self,
        token: &SessionToken,
        id: DoctorId,
    ) -> Result<Vec<Workday>>;

    async fn list_patients(&self, token: &SessionToken) -> Result<Vec<Patient>>;

    async fn get_patient(&self, token: &SessionToken, id: PatientId) -> Result<Patient>;

    async fn get_medical_history(
        &self,
        token: &SessionToken,
        patient_id: PatientId,
    ) -> Result<MedicalHistory>;

    async fn create_medical_history(
        &self,
        token: &SessionToken,
        patient_id: PatientId,
        form: &MedicalHistoryForm,
    ) -> Result<()>;

    async fn update_medical_history(
        &self,
        token: &SessionToken,
        patient_id: PatientId,
        form: &MedicalHistoryForm,
    ) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build the request url: {0}")]
    Url(#[from] ::url::ParseError),
    #[error("failed to reach the clinic server: {0}")]
    Transport(#[from] ::reqwest::Error),
    #[error("the clinic server rejected the request ({status}): {message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}
