use chrono::NaiveDateTime;
use clinic_api::{
    appointment::{Appointment, AppointmentFilter, EnrichedAppointment},
    doctor::Doctor,
    id::{AppointmentId, DoctorId},
    medical_history::MedicalHistory,
    timetable::{is_work_day, Workday},
    token::SessionToken,
};
use clinic_client::ClinicApi;
use futures::TryFutureExt;
use tracing::{info, instrument, Level};

use crate::{
    context::{PatientSession, RoleSession},
    enrich::enrich_all,
    error::{ClinicError, Result},
    nav::InOperation,
    router::PatientOperation,
    screen::ScreenEnv,
};

use super::MyAppointmentForm;

impl InOperation<PatientSession> {
    pub async fn cancel_appointment<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        id: AppointmentId,
    ) -> Result<()>
    where
        A: ?Sized + ClinicApi,
    {
        let future = cancel_appointment(env, self.session(), id);
        self.perform(env, PatientOperation::CancelAppointment, future).await
    }

    pub async fn edit_appointment<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        id: AppointmentId,
        form: MyAppointmentForm,
    ) -> Result<Appointment>
    where
        A: ?Sized + ClinicApi,
    {
        let future = edit_appointment(env, self.session(), id, form);
        self.perform(env, PatientOperation::EditAppointment, future).await
    }

    pub async fn add_appointment<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        form: MyAppointmentForm,
    ) -> Result<Appointment>
    where
        A: ?Sized + ClinicApi,
    {
        let future = add_appointment(env, self.session(), form);
        self.perform(env, PatientOperation::AddAppointment, future).await
    }

    /// The patient's own appointments, each joined with its doctor.
    pub async fn list_appointments<A>(
        &self,
        env: &ScreenEnv<'_, A>,
    ) -> Result<Vec<EnrichedAppointment>>
    where
        A: ?Sized + ClinicApi,
    {
        let future = list_appointments(env, self.session());
        self.perform(env, PatientOperation::ListAppointments, future).await
    }

    pub async fn get_history<A>(&self, env: &ScreenEnv<'_, A>) -> Result<MedicalHistory>
    where
        A: ?Sized + ClinicApi,
    {
        let session = self.session();
        let future = env
            .api
            .get_medical_history(session.token(), session.patient_id())
            .map_err(ClinicError::from);
        self.perform(env, PatientOperation::GetHistory, future).await
    }

    /// Doctors to pick from.
    pub async fn doctors<A>(&self, env: &ScreenEnv<'_, A>) -> Result<Vec<Doctor>>
    where
        A: ?Sized + ClinicApi,
    {
        let future = env
            .api
            .list_doctors(self.session().token())
            .map_err(ClinicError::from);
        self.lookup(env, future).await
    }

    /// Weekdays a doctor can be booked on.
    pub async fn workdays<A>(
        &self,
        env: &ScreenEnv<'_, A>,
        doctor_id: DoctorId,
    ) -> Result<Vec<Workday>>
    where
        A: ?Sized + ClinicApi,
    {
        let future = env
            .api
            .list_doctor_workdays(self.session().token(), doctor_id)
            .map_err(ClinicError::from);
        self.lookup(env, future).await
    }

    /// Own appointments to pick from, each joined with its doctor.
    pub async fn my_appointments<A>(
        &self,
        env: &ScreenEnv<'_, A>,
    ) -> Result<Vec<EnrichedAppointment>>
    where
        A: ?Sized + ClinicApi,
    {
        let future = list_appointments(env, self.session());
        self.lookup(env, future).await
    }
}

#[instrument(level = Level::INFO, skip(env, session), err(Display))]
async fn cancel_appointment<A>(
    env: &ScreenEnv<'_, A>,
    session: &PatientSession,
    id: AppointmentId,
) -> Result<()>
where
    A: ?Sized + ClinicApi,
{
    ensure_owner(env.api, session, id).await?;
    env.api.delete_appointment(session.token(), id).await?;
    info!("cancelled the appointment");
    Ok(())
}

#[instrument(level = Level::INFO, skip(env, session), err(Display))]
async fn edit_appointment<A>(
    env: &ScreenEnv<'_, A>,
    session: &PatientSession,
    id: AppointmentId,
    form: MyAppointmentForm,
) -> Result<Appointment>
where
    A: ?Sized + ClinicApi,
{
    let request = form.into_request(session.patient_id(), &env.clock)?;
    ensure_owner(env.api, session, id).await?;
    ensure_work_day(env.api, session.token(), form.doctor_id, form.at).await?;

    env.api
        .edit_appointment(session.token(), id, &request)
        .await?;
    info!("edited the appointment");
    Ok(request.into_appointment(id))
}

#[instrument(level = Level::INFO, skip(env, session), err(Display))]
async fn add_appointment<A>(
    env: &ScreenEnv<'_, A>,
    session: &PatientSession,
    form: MyAppointmentForm,
) -> Result<Appointment>
where
    A: ?Sized + ClinicApi,
{
    let request = form.into_request(session.patient_id(), &env.clock)?;
    ensure_work_day(env.api, session.token(), form.doctor_id, form.at).await?;

    let id = env
        .api
        .create_appointment(session.token(), &request)
        .await?;
    info!(%id, "created the appointment");
    Ok(request.into_appointment(id))
}

#[instrument(level = Level::INFO, skip_all, fields(patient_id = %session.patient_id()), err(Display))]
async fn list_appointments<A>(
    env: &ScreenEnv<'_, A>,
    session: &PatientSession,
) -> Result<Vec<EnrichedAppointment>>
where
    A: ?Sized + ClinicApi,
{
    let token = session.token();
    let filter = AppointmentFilter::Patient(session.patient_id());
    let appointments = env.api.list_appointments(token, filter).await?;

    let rows = enrich_all(appointments, env.enrich, |appointment: &Appointment| {
        env.api.get_doctor(token, appointment.doctor_id)
    })
    .await?;
    Ok(rows
        .into_iter()
        .map(|(appointment, doctor)| EnrichedAppointment::from(appointment).with_doctor(doctor))
        .collect())
}

/// Fetches the appointment and checks that it is the patient's own.
async fn ensure_owner<A>(
    api: &A,
    session: &PatientSession,
    id: AppointmentId,
) -> Result<Appointment>
where
    A: ?Sized + ClinicApi,
{
    let appointment = api.get_appointment(session.token(), id).await?;
    if appointment.patient_id == session.patient_id() {
        Ok(appointment)
    } else {
        Err(ClinicError::NotOwner {
            appointment: id,
            patient: session.patient_id(),
        })
    }
}

async fn ensure_work_day<A>(
    api: &A,
    token: &SessionToken,
    doctor_id: DoctorId,
    at: NaiveDateTime,
) -> Result<()>
where
    A: ?Sized + ClinicApi,
{
    let workdays = api.list_doctor_workdays(token, doctor_id).await?;
    let date = at.date();
    if is_work_day(&workdays, date) {
        Ok(())
    } else {
        Err(ClinicError::validation(format!(
            "doctor {doctor_id} does not work on {}",
            date.format("%A, %Y-%m-%d"),
        )))
    }
}
