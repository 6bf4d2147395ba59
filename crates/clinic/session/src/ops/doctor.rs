use clinic_api::{
    appointment::{Appointment, AppointmentFilter, EnrichedAppointment},
    id::PatientId,
    medical_history::{MedicalHistory, MedicalHistoryForm},
};
use clinic_client::ClinicApi;
use futures::TryFutureExt;
use tracing::{info, instrument, Level};

use crate::{
    context::{DoctorSession, RoleSession},
    enrich::enrich_all,
    error::{ClinicError, Result},
    nav::InOperation,
    router::DoctorOperation,
    screen::ScreenEnv,
};

impl InOperation<DoctorSession> {
    /// The doctor's own appointments, each joined with its patient's name.
    pub async fn list_appointments<A>(
        &self,
        env: &ScreenEnv<'_, A>,
    ) -> Result<Vec<EnrichedAppointment>>
    where
        A: ?Sized + ClinicApi,
    {
        let future = list_appointments(env, self.session());
        self.perform(env, DoctorOperation::ListAppointments, future).await
    }

    pub async fn get_history<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        patient_id: PatientId,
    ) -> Result<MedicalHistory>
    where
        A: ?Sized + ClinicApi,
    {
        let future = env
            .api
            .get_medical_history(self.session().token(), patient_id)
            .map_err(ClinicError::from);
        self.perform(env, DoctorOperation::GetHistory, future).await
    }

    pub async fn create_history<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        patient_id: PatientId,
        form: MedicalHistoryForm,
    ) -> Result<()>
    where
        A: ?Sized + ClinicApi,
    {
        let future = create_history(env, self.session(), patient_id, form);
        self.perform(env, DoctorOperation::CreateHistory, future).await
    }

    pub async fn update_history<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        patient_id: PatientId,
        form: MedicalHistoryForm,
    ) -> Result<()>
    where
        A: ?Sized + ClinicApi,
    {
        let future = update_history(env, self.session(), patient_id, form);
        self.perform(env, DoctorOperation::UpdateHistory, future).await
    }
}

#[instrument(level = Level::INFO, skip_all, fields(doctor_id = %session.doctor_id()), err(Display))]
async fn list_appointments<A>(
    env: &ScreenEnv<'_, A>,
    session: &DoctorSession,
) -> Result<Vec<EnrichedAppointment>>
where
    A: ?Sized + ClinicApi,
{
    let token = session.token();
    let filter = AppointmentFilter::Doctor(session.doctor_id());
    let appointments = env.api.list_appointments(token, filter).await?;

    let rows = enrich_all(appointments, env.enrich, |appointment: &Appointment| {
        env.api.get_patient(token, appointment.patient_id)
    })
    .await?;
    Ok(rows
        .into_iter()
        .map(|(appointment, patient)| EnrichedAppointment::from(appointment).with_patient(patient))
        .collect())
}

#[instrument(level = Level::INFO, skip(env, session, form), err(Display))]
async fn create_history<A>(
    env: &ScreenEnv<'_, A>,
    session: &DoctorSession,
    patient_id: PatientId,
    form: MedicalHistoryForm,
) -> Result<()>
where
    A: ?Sized + ClinicApi,
{
    env.api
        .create_medical_history(session.token(), patient_id, &form)
        .await?;
    info!("created the medical history");
    Ok(())
}

#[instrument(level = Level::INFO, skip(env, session, form), err(Display))]
async fn update_history<A>(
    env: &ScreenEnv<'_, A>,
    session: &DoctorSession,
    patient_id: PatientId,
    form: MedicalHistoryForm,
) -> Result<()>
where
    A: ?Sized + ClinicApi,
{
    env.api
        .update_medical_history(session.token(), patient_id, &form)
        .await?;
    info!("updated the medical history");
    Ok(())
}
