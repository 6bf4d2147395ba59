mod common;

use chrono::NaiveDate;
use clinic_api::{
    id::{AppointmentId, DoctorId, PatientId},
    medical_history::MedicalHistoryForm,
    role::Role,
};
use clinic_session::{
    auth::Credentials,
    context::{AdminSession, DoctorSession, PatientSession},
    enrich::EnrichPolicy,
    error::ClinicError,
    nav::{Landing, Navigator, Unauthenticated},
    ops::{AppointmentForm, MyAppointmentForm},
    report::{Action, RecordingReporter},
    router::{AdminOperation, DoctorOperation, OperationId, PatientOperation, RoleOperation},
};

use self::common::{at, FakeClinic};

async fn login(clinic: &FakeClinic, name: &str) -> Navigator {
    let reporter = RecordingReporter::default();
    Unauthenticated
        .login(&clinic.env(&reporter), Credentials::new(name, "secret"))
        .await
        .expect("failed to log in")
}

async fn admin(clinic: &FakeClinic) -> Landing<AdminSession> {
    match login(clinic, "admin").await {
        Navigator::Admin(landing) => landing,
        other => panic!("expected the admin landing screen, got {other:?}"),
    }
}

async fn doctor(clinic: &FakeClinic) -> Landing<DoctorSession> {
    match login(clinic, "house").await {
        Navigator::Doctor(landing) => landing,
        other => panic!("expected the doctor landing screen, got {other:?}"),
    }
}

async fn patient(clinic: &FakeClinic) -> Landing<PatientSession> {
    match login(clinic, "ivan").await {
        Navigator::Patient(landing) => landing,
        other => panic!("expected the patient landing screen, got {other:?}"),
    }
}

fn wall_clock(date: (i32, u32, u32), hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("invalid test date")
}

#[tokio::test]
async fn doctor_lists_appointments_with_patient_names() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let landing = doctor(&clinic).await;
    clinic.clear_requests();

    let screen = landing.enter(DoctorOperation::ListAppointments);
    let rows = screen
        .list_appointments(&env)
        .await
        .expect("failed to list appointments");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].appointment.id, AppointmentId(1));
    assert_eq!(rows[0].patient_name.as_deref(), Some("Ivan Petrov"));
    assert_eq!(rows[1].appointment.id, AppointmentId(2));
    assert_eq!(rows[1].patient_name.as_deref(), Some("Anna Smirnova"));

    let mut requests = clinic.requests();
    assert_eq!(requests.remove(0), "GET /appointments?doctor_id=7");
    requests.sort();
    assert_eq!(requests, ["GET /patients/42", "GET /patients/43"]);

    let landing = screen.complete();
    assert_eq!(landing.session().doctor_id(), DoctorId(7));
}

#[tokio::test]
async fn reads_are_idempotent() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let screen = patient(&clinic)
        .await
        .enter(PatientOperation::ListAppointments);
    let before = clinic.appointments();

    let first = screen.list_appointments(&env).await.expect("first read");
    let second = screen.list_appointments(&env).await.expect("second read");
    assert_eq!(first, second);
    assert_eq!(clinic.appointments(), before);

    assert_eq!(first.len(), 2);
    assert_eq!(first[0].doctor_name.as_deref(), Some("Gregory House"));
    assert_eq!(first[0].doctor_specialization.as_deref(), Some("diagnostics"));
    assert_eq!(first[1].doctor_name.as_deref(), Some("John Watson"));
}

#[tokio::test]
async fn medical_history_round_trip() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let form = MedicalHistoryForm {
        chronic_diseases: "asthma".into(),
        allergies: "none".into(),
        blood_type: "0-".into(),
        vaccination: "flu".into(),
    };

    let landing = doctor(&clinic).await;
    let screen = landing.enter(DoctorOperation::CreateHistory);
    screen
        .create_history(&env, PatientId(43), form.clone())
        .await
        .expect("failed to create the history");

    let screen = screen.complete().enter(DoctorOperation::GetHistory);
    let history = screen
        .get_history(&env, PatientId(43))
        .await
        .expect("failed to get the history");
    assert_eq!(history.patient_id, PatientId(43));
    assert_eq!(history.form, form);

    let updated = MedicalHistoryForm {
        allergies: "pollen".into(),
        ..form
    };
    let screen = screen.complete().enter(DoctorOperation::UpdateHistory);
    screen
        .update_history(&env, PatientId(43), updated.clone())
        .await
        .expect("failed to update the history");

    let screen = screen.complete().enter(DoctorOperation::GetHistory);
    let history = screen
        .get_history(&env, PatientId(43))
        .await
        .expect("failed to get the history");
    assert_eq!(history.form, updated);
}

#[tokio::test]
async fn patient_context_survives_every_operation() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let mut landing = patient(&clinic).await;
    assert_eq!(landing.operations(), PatientOperation::ALL);

    for &operation in PatientOperation::ALL {
        let screen = landing.enter(operation);
        match operation {
            PatientOperation::CancelAppointment => {
                screen
                    .cancel_appointment(&env, AppointmentId(3))
                    .await
                    .expect("failed to cancel");
            }
            PatientOperation::EditAppointment => {
                let form = MyAppointmentForm {
                    doctor_id: DoctorId(7),
                    at: wall_clock((2024, 1, 2), 15),
                };
                screen
                    .edit_appointment(&env, AppointmentId(1), form)
                    .await
                    .expect("failed to edit");
            }
            PatientOperation::AddAppointment => {
                let form = MyAppointmentForm {
                    doctor_id: DoctorId(7),
                    at: wall_clock((2024, 1, 8), 9),
                };
                let appointment = screen
                    .add_appointment(&env, form)
                    .await
                    .expect("failed to add");
                assert_eq!(appointment.patient_id, PatientId(42));
            }
            PatientOperation::ListAppointments => {
                let rows = screen.list_appointments(&env).await.expect("failed to list");
                assert!(rows
                    .iter()
                    .all(|row| row.appointment.patient_id == PatientId(42)));
            }
            PatientOperation::GetHistory => {
                let history = screen.get_history(&env).await.expect("failed to get");
                assert_eq!(history.patient_id, PatientId(42));
            }
        }
        landing = screen.complete();
        assert_eq!(landing.session().patient_id(), PatientId(42));
    }

    assert!(reporter.reports().is_empty());
    assert!(clinic
        .requests()
        .iter()
        .filter(|request| request.contains("patient"))
        .all(|request| request.contains("42")));
}

#[tokio::test]
async fn dates_are_labelled_without_shifting() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let screen = admin(&clinic).await.enter(AdminOperation::AddAppointment);
    let form = AppointmentForm {
        patient_id: PatientId(43),
        doctor_id: DoctorId(8),
        at: wall_clock((2024, 1, 1), 10),
    };
    let created = screen
        .add_appointment(&env, form)
        .await
        .expect("failed to add");

    let stored = clinic.appointment(created.id).expect("not stored");
    assert_eq!(stored, created);
    assert_eq!(stored.date_time, at("2024-01-01T10:00:00+03:00"));
    assert_eq!(stored.date_time.to_rfc3339(), "2024-01-01T10:00:00+03:00");
}

#[tokio::test]
async fn admin_gets_an_enriched_appointment() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let screen = admin(&clinic).await.enter(AdminOperation::GetAppointment);
    let row = screen
        .get_appointment(&env, AppointmentId(2))
        .await
        .expect("failed to get");
    assert_eq!(row.patient_name.as_deref(), Some("Anna Smirnova"));
    assert_eq!(row.doctor_name.as_deref(), Some("Gregory House"));

    let screen = screen.complete().enter(AdminOperation::EditAppointment);
    let form = AppointmentForm {
        patient_id: PatientId(43),
        doctor_id: DoctorId(8),
        at: wall_clock((2024, 2, 7), 13),
    };
    let edited = screen
        .edit_appointment(&env, AppointmentId(2), form)
        .await
        .expect("failed to edit");
    assert_eq!(clinic.appointment(AppointmentId(2)), Some(edited));

    let screen = screen.complete().enter(AdminOperation::CancelAppointment);
    screen
        .cancel_appointment(&env, AppointmentId(2))
        .await
        .expect("failed to cancel");
    assert_eq!(clinic.appointment(AppointmentId(2)), None);

    let screen = screen.complete().enter(AdminOperation::ListDoctors);
    assert_eq!(screen.list_doctors(&env).await.expect("doctors").len(), 2);
    let screen = screen.complete().enter(AdminOperation::ListPatients);
    assert_eq!(screen.list_patients(&env).await.expect("patients").len(), 2);
}

#[tokio::test]
async fn reject_appointments_off_workdays() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let screen = patient(&clinic).await.enter(PatientOperation::AddAppointment);
    let workdays = screen
        .workdays(&env, DoctorId(7))
        .await
        .expect("failed to get workdays");
    assert_eq!(workdays.len(), 2);
    clinic.clear_requests();

    // a sunday
    let form = MyAppointmentForm {
        doctor_id: DoctorId(7),
        at: wall_clock((2024, 1, 7), 10),
    };
    let result = screen.add_appointment(&env, form).await;
    assert!(matches!(result, Err(ClinicError::Validation(_))));
    assert_eq!(clinic.requests(), ["GET /doctors/7/workdays"]);
    assert_eq!(
        reporter.actions(),
        [Action::Operation(PatientOperation::AddAppointment.into())],
    );
}

#[tokio::test]
async fn patients_only_touch_their_own_appointments() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let screen = patient(&clinic).await.enter(PatientOperation::CancelAppointment);
    let mine = screen.my_appointments(&env).await.expect("failed to list");
    assert_eq!(mine.len(), 2);
    assert!(mine
        .iter()
        .all(|row| row.appointment.patient_id == PatientId(42)));
    assert_eq!(mine[0].doctor_name.as_deref(), Some("Gregory House"));
    assert_eq!(mine[1].doctor_specialization.as_deref(), Some("surgery"));

    let result = screen.cancel_appointment(&env, AppointmentId(2)).await;
    assert!(matches!(
        result,
        Err(ClinicError::NotOwner {
            appointment: AppointmentId(2),
            patient: PatientId(42),
        }),
    ));
    assert!(clinic.appointment(AppointmentId(2)).is_some());
    assert!(!clinic
        .requests()
        .iter()
        .any(|request| request.starts_with("DELETE")));
}

#[tokio::test]
async fn fail_fast_enrichment_fails_the_screen() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);
    clinic.fail("GET /patients/43", 500);

    let screen = doctor(&clinic).await.enter(DoctorOperation::ListAppointments);
    match screen.list_appointments(&env).await {
        Err(ClinicError::Api(error)) => assert_eq!(error.status(), Some(500)),
        other => panic!("expected a server error, got {other:?}"),
    }

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].0,
        Action::Operation(DoctorOperation::ListAppointments.into()),
    );
    assert_eq!(reports[0].0.failure_message(), "failed to get the appointments");
}

#[tokio::test]
async fn fail_fast_does_not_wait_on_hung_lookups() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);
    clinic.hang("GET /patients/42");
    clinic.fail("GET /patients/43", 500);

    let screen = doctor(&clinic).await.enter(DoctorOperation::ListAppointments);
    let result = ::tokio::time::timeout(
        ::std::time::Duration::from_millis(500),
        screen.list_appointments(&env),
    )
    .await
    .expect("the failed lookup of patient 43 should end the screen");
    match result {
        Err(ClinicError::Api(error)) => assert_eq!(error.status(), Some(500)),
        other => panic!("expected a server error, got {other:?}"),
    }
    assert!(!screen.is_busy());
    assert_eq!(reporter.reports().len(), 1);
}

#[tokio::test]
async fn best_effort_enrichment_leaves_gaps() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter).with_enrich(EnrichPolicy::BestEffort);
    clinic.fail("GET /patients/43", 500);

    let screen = doctor(&clinic).await.enter(DoctorOperation::ListAppointments);
    let rows = screen
        .list_appointments(&env)
        .await
        .expect("best effort enrichment");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].patient_name.as_deref(), Some("Ivan Petrov"));
    assert_eq!(rows[1].patient_name, None);
    assert!(reporter.reports().is_empty());
}

#[tokio::test]
async fn screens_only_run_their_own_operation() {
    let clinic = FakeClinic::seeded();
    let reporter = RecordingReporter::default();
    let env = clinic.env(&reporter);

    let landing = doctor(&clinic).await;
    let history = OperationId::from(DoctorOperation::GetHistory);
    assert_eq!(landing.resolve(history).ok(), Some(DoctorOperation::GetHistory));

    let foreign = OperationId::from(PatientOperation::GetHistory);
    assert!(matches!(
        landing.resolve(foreign),
        Err(ClinicError::Forbidden {
            role: Role::Doctor,
            ..
        }),
    ));

    let screen = landing.enter(DoctorOperation::GetHistory);
    let result = screen.list_appointments(&env).await;
    assert!(matches!(result, Err(ClinicError::WrongScreen { .. })));
    assert!(clinic
        .requests()
        .iter()
        .all(|request| !request.starts_with("GET /appointments")));
    assert_eq!(reporter.reports().len(), 1);
}
