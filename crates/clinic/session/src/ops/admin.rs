use clinic_api::{
    appointment::{Appointment, EnrichedAppointment},
    doctor::Doctor,
    id::AppointmentId,
    patient::Patient,
};
use clinic_client::ClinicApi;
use futures::TryFutureExt;
use tracing::{info, instrument, Level};

use crate::{
    context::{AdminSession, RoleSession},
    enrich::enrich_pair,
    error::{ClinicError, Result},
    nav::InOperation,
    router::AdminOperation,
    screen::ScreenEnv,
};

use super::AppointmentForm;

impl InOperation<AdminSession> {
    pub async fn add_appointment<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        form: AppointmentForm,
    ) -> Result<Appointment>
    where
        A: ?Sized + ClinicApi,
    {
        let future = add_appointment(env, self.session(), form);
        self.perform(env, AdminOperation::AddAppointment, future).await
    }

    pub async fn cancel_appointment<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        id: AppointmentId,
    ) -> Result<()>
    where
        A: ?Sized + ClinicApi,
    {
        let future = cancel_appointment(env, self.session(), id);
        self.perform(env, AdminOperation::CancelAppointment, future).await
    }

    pub async fn edit_appointment<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        id: AppointmentId,
        form: AppointmentForm,
    ) -> Result<Appointment>
    where
        A: ?Sized + ClinicApi,
    {
        let future = edit_appointment(env, self.session(), id, form);
        self.perform(env, AdminOperation::EditAppointment, future).await
    }

    pub async fn get_appointment<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        id: AppointmentId,
    ) -> Result<EnrichedAppointment>
    where
        A: ?Sized + ClinicApi,
    {
        let future = get_appointment(env, self.session(), id);
        self.perform(env, AdminOperation::GetAppointment, future).await
    }

    pub async fn list_doctors<A>(&self, env: &ScreenEnv<'_, A>) -> Result<Vec<Doctor>>
    where
        A: ?Sized + ClinicApi,
    {
        let future = env.api.list_doctors(self.session().token());
        let future = future.map_err(ClinicError::from);
        self.perform(env, AdminOperation::ListDoctors, future).await
    }

    pub async fn list_patients<A>(&self, env: &ScreenEnv<'_, A>) -> Result<Vec<Patient>>
    where
        A: ?Sized + ClinicApi,
    {
        let future = env.api.list_patients(self.session().token());
        let future = future.map_err(ClinicError::from);
        self.perform(env, AdminOperation::ListPatients, future).await
    }
}

#[instrument(level = Level::INFO, skip(env, session), err(Display))]
async fn add_appointment<A>(
    env: &ScreenEnv<'_, A>,
    session: &AdminSession,
    form: AppointmentForm,
) -> Result<Appointment>
where
    A: ?Sized + ClinicApi,
{
    let request = form.into_request(&env.clock)?;
    let id = env.api.create_appointment(session.token(), &request).await?;
    info!(%id, "created the appointment");
    Ok(request.into_appointment(id))
}

#[instrument(level = Level::INFO, skip(env, session), err(Display))]
async fn cancel_appointment<A>(
    env: &ScreenEnv<'_, A>,
    session: &AdminSession,
    id: AppointmentId,
) -> Result<()>
where
    A: ?Sized + ClinicApi,
{
    env.api.delete_appointment(session.token(), id).await?;
    info!("cancelled the appointment");
    Ok(())
}

#[instrument(level = Level::INFO, skip(env, session), err(Display))]
async fn edit_appointment<A>(
    env: &ScreenEnv<'_, A>,
    session: &AdminSession,
    id: AppointmentId,
    form: AppointmentForm,
) -> Result<Appointment>
where
    A: ?Sized + ClinicApi,
{
    let request = form.into_request(&env.clock)?;
    env.api.edit_appointment(session.token(), id, &request).await?;
    info!("edited the appointment");
    Ok(request.into_appointment(id))
}

#[instrument(level = Level::INFO, skip(env, session), err(Display))]
async fn get_appointment<A>(
    env: &ScreenEnv<'_, A>,
    session: &AdminSession,
    id: AppointmentId,
) -> Result<EnrichedAppointment>
where
    A: ?Sized + ClinicApi,
{
    let token = session.token();
    let appointment = env.api.get_appointment(token, id).await?;

    let (doctor, patient) = enrich_pair(
        env.enrich,
        env.api.get_doctor(token, appointment.doctor_id),
        env.api.get_patient(token, appointment.patient_id),
    )
    .await?;

    Ok(EnrichedAppointment::from(appointment)
        .with_doctor(doctor)
        .with_patient(patient))
}
