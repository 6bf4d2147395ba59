#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, FixedOffset};
use clinic_api::{
    appointment::{Appointment, AppointmentFilter, AppointmentRequest},
    auth::{LoginRequest, LoginResponse, LoginUser, RegisterRequest},
    doctor::Doctor,
    id::{AppointmentId, DoctorId, HistoryId, OfficeId, PatientId, TimetableId, UserId},
    medical_history::{MedicalHistory, MedicalHistoryForm},
    patient::Patient,
    timetable::Workday,
    token::SessionToken,
};
use clinic_client::{ApiError, ClinicApi, Result};
use clinic_session::screen::ScreenEnv;

/// 2030-01-01T00:00:00Z
const FAR_FUTURE: i64 = 1_893_456_000;

/// 2020-09-13T12:26:40Z
const LONG_AGO: i64 = 1_600_000_000;

pub fn issue(role: i64, exp: i64) -> SessionToken {
    let engine = ::base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(format!(r#"{{"role":{role},"exp":{exp}}}"#));
    SessionToken::new(format!("{header}.{payload}.signature"))
}

pub fn at(input: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(input).expect("invalid test timestamp")
}

struct Account {
    password: String,
    response: LoginResponse,
}

#[derive(Default)]
struct State {
    accounts: BTreeMap<String, Account>,
    registered: Vec<RegisterRequest>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    doctors: BTreeMap<DoctorId, Doctor>,
    patients: BTreeMap<PatientId, Patient>,
    workdays: Vec<Workday>,
    histories: BTreeMap<PatientId, MedicalHistory>,
    next_id: i64,
}

/// An in-memory clinic backend that records every request it serves.
#[derive(Default)]
pub struct FakeClinic {
    state: Mutex<State>,
    requests: Mutex<Vec<String>>,
    failures: Mutex<Vec<(String, u16)>>,
    hangs: Mutex<Vec<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("poisoned test state")
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} not found"),
    }
}

impl FakeClinic {
    /// Two doctors, two patients and three appointments.
    ///
    /// - admin/admin: admin
    /// - house/secret: doctor 7
    /// - ivan/secret: patient 42
    /// - ghost/secret: a token with an unknown role
    /// - late/secret: an expired patient token
    pub fn seeded() -> Self {
        let clinic = Self::default();
        {
            let mut state = lock(&clinic.state);
            state.next_id = 100;

            let accounts = [
                ("admin", 0, FAR_FUTURE, 1, None, None),
                ("house", 2, FAR_FUTURE, 2, Some(7), None),
                ("ivan", 1, FAR_FUTURE, 3, None, Some(42)),
                ("ghost", 9, FAR_FUTURE, 4, None, None),
                ("late", 1, LONG_AGO, 5, None, Some(43)),
            ];
            for (login, role, exp, user, doctor, patient) in accounts {
                state.accounts.insert(
                    login.into(),
                    Account {
                        password: "secret".into(),
                        response: LoginResponse {
                            jwt_token: issue(role, exp),
                            user: LoginUser {
                                id: UserId(user),
                                doctor_id: doctor.map(DoctorId),
                                patient_id: patient.map(PatientId),
                            },
                        },
                    },
                );
            }

            for (id, fio, specialization) in [(7, "Gregory House", "diagnostics"), (8, "John Watson", "surgery")] {
                state.doctors.insert(
                    DoctorId(id),
                    Doctor {
                        id: DoctorId(id),
                        fio: fio.into(),
                        phone_number: "+7 900 000-00-00".into(),
                        email: format!("{id}@clinic.test"),
                        specialization: specialization.into(),
                    },
                );
            }

            for (id, fio) in [(42, "Ivan Petrov"), (43, "Anna Smirnova")] {
                state.patients.insert(
                    PatientId(id),
                    Patient {
                        id: PatientId(id),
                        fio: fio.into(),
                        phone_number: "+7 900 111-11-11".into(),
                        email: format!("{id}@mail.test"),
                        insurance: format!("INS-{id}"),
                    },
                );
            }

            let appointments = [
                (1, 42, 7, "2024-01-01T10:00:00+03:00"),
                (2, 43, 7, "2024-01-02T11:00:00+03:00"),
                (3, 42, 8, "2024-01-03T12:00:00+03:00"),
            ];
            for (id, patient, doctor, date_time) in appointments {
                state.appointments.insert(
                    AppointmentId(id),
                    Appointment {
                        id: AppointmentId(id),
                        patient_id: PatientId(patient),
                        doctor_id: DoctorId(doctor),
                        date_time: at(date_time),
                    },
                );
            }

            // doctor 7 works on mondays and tuesdays, doctor 8 on wednesdays
            for (id, doctor, work_day) in [(1, 7, 1), (2, 7, 2), (3, 8, 3)] {
                state.workdays.push(Workday {
                    id: TimetableId(id),
                    doctor_id: DoctorId(doctor),
                    office_id: OfficeId(doctor * 100),
                    work_day,
                });
            }

            state.histories.insert(
                PatientId(42),
                MedicalHistory {
                    id: HistoryId(1),
                    patient_id: PatientId(42),
                    form: MedicalHistoryForm {
                        chronic_diseases: "none".into(),
                        allergies: "penicillin".into(),
                        blood_type: "A+".into(),
                        vaccination: "measles".into(),
                    },
                },
            );
        }
        clinic
    }

    pub fn env<'a>(&'a self, reporter: &'a dyn clinic_session::report::FailureReporter) -> ScreenEnv<'a, Self> {
        ScreenEnv::new(self, reporter)
    }

    /// Fails every request starting with the given line.
    pub fn fail(&self, prefix: &str, status: u16) {
        lock(&self.failures).push((prefix.into(), status))
    }

    /// Never answers requests starting with the given line.
    pub fn hang(&self, prefix: &str) {
        lock(&self.hangs).push(prefix.into())
    }

    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear()
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        lock(&self.state).appointments.values().cloned().collect()
    }

    pub fn appointment(&self, id: AppointmentId) -> Option<Appointment> {
        lock(&self.state).appointments.get(&id).cloned()
    }

    pub fn registered(&self) -> Vec<RegisterRequest> {
        lock(&self.state).registered.clone()
    }

    async fn serve(&self, request: String) -> Result<()> {
        lock(&self.requests).push(request.clone());

        let hangs = lock(&self.hangs).iter().any(|prefix| request.starts_with(prefix));
        if hangs {
            ::futures::future::pending::<()>().await;
        }

        let failure = lock(&self.failures)
            .iter()
            .find(|(prefix, _)| request.starts_with(prefix))
            .map(|(_, status)| *status);
        match failure {
            Some(status) => Err(ApiError::Status {
                status,
                message: "injected failure".into(),
            }),
            None => Ok(()),
        }
    }

    fn allocate(&self) -> i64 {
        let mut state = lock(&self.state);
        state.next_id += 1;
        state.next_id
    }
}

#[async_trait]
impl ClinicApi for FakeClinic {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.serve("POST /auth/login".into()).await?;
        lock(&self.state)
            .accounts
            .get(&request.login)
            .filter(|account| account.password == request.password)
            .map(|account| account.response.clone())
            .ok_or_else(|| ApiError::Status {
                status: 401,
                message: "invalid login or password".into(),
            })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.serve("POST /auth/register".into()).await?;
        lock(&self.state).registered.push(request.clone());
        Ok(())
    }

    async fn create_appointment(
        &self,
        _token: &SessionToken,
        request: &AppointmentRequest,
    ) -> Result<AppointmentId> {
        self.serve("POST /appointments".into()).await?;
        let id = AppointmentId(self.allocate());
        lock(&self.state)
            .appointments
            .insert(id, request.clone().into_appointment(id));
        Ok(id)
    }

    async fn get_appointment(&self, _token: &SessionToken, id: AppointmentId) -> Result<Appointment> {
        self.serve(format!("GET /appointments/{id}")).await?;
        self.appointment(id).ok_or_else(|| not_found("appointment"))
    }

    async fn list_appointments(
        &self,
        _token: &SessionToken,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>> {
        let [(key, value)] = filter.query();
        self.serve(format!("GET /appointments?{key}={value}")).await?;
        Ok(self
            .appointments()
            .into_iter()
            .filter(|appointment| filter.matches(appointment))
            .collect())
    }

    async fn edit_appointment(
        &self,
        _token: &SessionToken,
        id: AppointmentId,
        request: &AppointmentRequest,
    ) -> Result<()> {
        self.serve(format!("PATCH /appointments/{id}")).await?;
        let mut state = lock(&self.state);
        let appointment = state
            .appointments
            .get_mut(&id)
            .ok_or_else(|| not_found("appointment"))?;
        *appointment = request.clone().into_appointment(id);
        Ok(())
    }

    async fn delete_appointment(&self, _token: &SessionToken, id: AppointmentId) -> Result<()> {
        self.serve(format!("DELETE /appointments/{id}")).await?;
        lock(&self.state)
            .appointments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("appointment"))
    }

    async fn list_doctors(&self, _token: &SessionToken) -> Result<Vec<Doctor>> {
        self.serve("GET /doctors".into()).await?;
        Ok(lock(&self.state).doctors.values().cloned().collect())
    }

    async fn get_doctor(&self, _token: &SessionToken, id: DoctorId) -> Result<Doctor> {
        self.serve(format!("GET /doctors/{id}")).await?;
        lock(&self.state)
            .doctors
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("doctor"))
    }

    async fn list_doctor_workdays(
        &self,
        _token: &SessionToken,
        id: DoctorId,
    ) -> Result<Vec<Workday>> {
        self.serve(format!("GET /doctors/{id}/workdays")).await?;
        Ok(lock(&self.state)
            .workdays
            .iter()
            .filter(|workday| workday.doctor_id == id)
            .cloned()
            .collect())
    }

    async fn list_patients(&self, _token: &SessionToken) -> Result<Vec<Patient>> {
        self.serve("GET /patients".into()).await?;
        Ok(lock(&self.state).patients.values().cloned().collect())
    }

    async fn get_patient(&self, _token: &SessionToken, id: PatientId) -> Result<Patient> {
        self.serve(format!("GET /patients/{id}")).await?;
        lock(&self.state)
            .patients
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("patient"))
    }

    async fn get_medical_history(
        &self,
        _token: &SessionToken,
        patient_id: PatientId,
    ) -> Result<MedicalHistory> {
        self.serve(format!("GET /patients/{patient_id}/medical_history"))
            .await?;
        lock(&self.state)
            .histories
            .get(&patient_id)
            .cloned()
            .ok_or_else(|| not_found("medical history"))
    }

    async fn create_medical_history(
        &self,
        _token: &SessionToken,
        patient_id: PatientId,
        form: &MedicalHistoryForm,
    ) -> Result<()> {
        self.serve(format!("POST /patients/{patient_id}/medical_history"))
            .await?;
        let id = HistoryId(self.allocate());
        lock(&self.state).histories.insert(
            patient_id,
            MedicalHistory {
                id,
                patient_id,
                form: form.clone(),
            },
        );
        Ok(())
    }

    async fn update_medical_history(
        &self,
        _token: &SessionToken,
        patient_id: PatientId,
        form: &MedicalHistoryForm,
    ) -> Result<()> {
        self.serve(format!("PATCH /patients/{patient_id}/medical_history"))
            .await?;
        let mut state = lock(&self.state);
        let history = state
            .histories
            .get_mut(&patient_id)
            .ok_or_else(|| not_found("medical history"))?;
        history.form = form.clone();
        Ok(())
    }
}
