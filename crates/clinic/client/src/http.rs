use async_trait::async_trait;
use clap::Parser;
use clinic_api::{
    appointment::{Appointment, AppointmentFilter, AppointmentRequest, Created},
    auth::{LoginRequest, LoginResponse, RegisterRequest},
    consts,
    doctor::Doctor,
    error::ErrorBody,
    id::{AppointmentId, DoctorId, PatientId},
    medical_history::{MedicalHistory, MedicalHistoryForm},
    patient::Patient,
    timetable::Workday,
    token::SessionToken,
};
use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument, Level};
use url::Url;

use crate::{ApiError, ClinicApi, Result};

#[derive(Clone)]
pub struct ClinicClient {
    args: ClinicClientArgs,
    session: ::reqwest::Client,
}

impl ClinicClient {
    pub fn try_new(args: ClinicClientArgs) -> Result<Self> {
        Ok(Self {
            args,
            session: ::reqwest::ClientBuilder::new().build()?,
        })
    }

    pub fn args(&self) -> &ClinicClientArgs {
        &self.args
    }
}

#[async_trait]
impl ClinicApi for ClinicClient {
    #[instrument(level = Level::INFO, skip(self, request), fields(login = %request.login), err(Display))]
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let request = Request {
            method: Method::POST,
            scope: Scope::Auth,
            rel_url: "login",
            query: None,
            token: None,
            payload: Some(request),
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, request), fields(login = %request.login), err(Display))]
    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let request = Request {
            method: Method::POST,
            scope: Scope::Auth,
            rel_url: "register",
            query: None,
            token: None,
            payload: Some(request),
        };
        self.execute_unit(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn create_appointment(
        &self,
        token: &SessionToken,
        request: &AppointmentRequest,
    ) -> Result<AppointmentId> {
        let request = Request {
            method: Method::POST,
            scope: Scope::Api,
            rel_url: "appointments",
            query: None,
            token: Some(token),
            payload: Some(request),
        };
        self.execute(request)
            .await
            .map(|Created { id }: Created<AppointmentId>| id)
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn get_appointment(
        &self,
        token: &SessionToken,
        id: AppointmentId,
    ) -> Result<Appointment> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            scope: Scope::Api,
            rel_url: &format!("appointments/{id}"),
            query: None,
            token: Some(token),
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn list_appointments(
        &self,
        token: &SessionToken,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            scope: Scope::Api,
            rel_url: "appointments",
            query: Some(filter.query()),
            token: Some(token),
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn edit_appointment(
        &self,
        token: &SessionToken,
        id: AppointmentId,
        request: &AppointmentRequest,
    ) -> Result<()> {
        let request = Request {
            method: Method::PATCH,
            scope: Scope::Api,
            rel_url: &format!("appointments/{id}"),
            query: None,
            token: Some(token),
            payload: Some(request),
        };
        self.execute_unit(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn delete_appointment(&self, token: &SessionToken, id: AppointmentId) -> Result<()> {
        let request = RequestWithoutPayload {
            method: Method::DELETE,
            scope: Scope::Api,
            rel_url: &format!("appointments/{id}"),
            query: None,
            token: Some(token),
            payload: None,
        };
        self.execute_unit(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn list_doctors(&self, token: &SessionToken) -> Result<Vec<Doctor>> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            scope: Scope::Api,
            rel_url: "doctors",
            query: None,
            token: Some(token),
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn get_doctor(&self, token: &SessionToken, id: DoctorId) -> Result<Doctor> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            scope: Scope::Api,
            rel_url: &format!("doctors/{id}"),
            query: None,
            token: Some(token),
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn list_doctor_workdays(
        &self,
        token: &SessionToken,
        id: DoctorId,
    ) -> Result<Vec<Workday>> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            scope: Scope::Api,
            rel_url: &format!("doctors/{id}/workdays"),
            query: None,
            token: Some(token),
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn list_patients(&self, token: &SessionToken) -> Result<Vec<Patient>> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            scope: Scope::Api,
            rel_url: "patients",
            query: None,
            token: Some(token),
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn get_patient(&self, token: &SessionToken, id: PatientId) -> Result<Patient> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            scope: Scope::Api,
            rel_url: &format!("patients/{id}"),
            query: None,
            token: Some(token),
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token), err(Display))]
    async fn get_medical_history(
        &self,
        token: &SessionToken,
        patient_id: PatientId,
    ) -> Result<MedicalHistory> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            scope: Scope::Api,
            rel_url: &format!("patients/{patient_id}/medical_history"),
            query: None,
            token: Some(token),
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token, form), err(Display))]
    async fn create_medical_history(
        &self,
        token: &SessionToken,
        patient_id: PatientId,
        form: &MedicalHistoryForm,
    ) -> Result<()> {
        let request = Request {
            method: Method::POST,
            scope: Scope::Api,
            rel_url: &format!("patients/{patient_id}/medical_history"),
            query: None,
            token: Some(token),
            payload: Some(form),
        };
        self.execute_unit(request).await
    }

    #[instrument(level = Level::INFO, skip(self, token, form), err(Display))]
    async fn update_medical_history(
        &self,
        token: &SessionToken,
        patient_id: PatientId,
        form: &MedicalHistoryForm,
    ) -> Result<()> {
        let request = Request {
            method: Method::PATCH,
            scope: Scope::Api,
            rel_url: &format!("patients/{patient_id}/medical_history"),
            query: None,
            token: Some(token),
            payload: Some(form),
        };
        self.execute_unit(request).await
    }
}

impl ClinicClient {
    async fn execute<T, R>(&self, request: Request<'_, T>) -> Result<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(Into::into)
    }

    async fn execute_unit<T>(&self, request: Request<'_, T>) -> Result<()>
    where
        T: Serialize,
    {
        self.send(request).await.map(|_| ())
    }

    #[instrument(level = Level::DEBUG, skip(self, request), fields(method = %request.method, url = %request.rel_url))]
    async fn send<T>(&self, request: Request<'_, T>) -> Result<Response>
    where
        T: Serialize,
    {
        let Request {
            method,
            scope,
            rel_url,
            query,
            token,
            payload,
        } = request;

        let url = self.get_url(scope, rel_url)?;
        let mut request = self.session.request(method, url);
        if let Some(query) = query {
            request = request.query(&query);
        }
        if let Some(token) = token {
            request = request.header(self.args.header_auth.as_str(), token.bearer());
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("the clinic server responded {status}: {body}");

        let message = match ::serde_json::from_str::<ErrorBody>(&body) {
            Ok(ErrorBody { error }) => error,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            Err(_) => body,
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn get_url(&self, scope: Scope, rel_url: &str) -> Result<Url> {
        self.args
            .endpoint
            .join(scope.base())?
            .join(rel_url)
            .map_err(Into::into)
    }
}

#[derive(Copy, Clone, Debug)]
enum Scope {
    Api,
    Auth,
}

impl Scope {
    const fn base(self) -> &'static str {
        match self {
            Self::Api => consts::API_BASE,
            Self::Auth => consts::AUTH_BASE,
        }
    }
}

type RequestWithoutPayload<'a> = Request<'a, ()>;

struct Request<'a, T> {
    method: Method,
    scope: Scope,
    rel_url: &'a str,
    query: Option<[(&'static str, i64); 1]>,
    token: Option<&'a SessionToken>,
    payload: Option<&'a T>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Parser)]
#[clap(rename_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub struct ClinicClientArgs {
    #[arg(
        long,
        env = "CLINIC_ENDPOINT",
        value_name = "URL",
        default_value = ClinicClientArgs::default_endpoint_str(),
    )]
    #[serde(default = "ClinicClientArgs::default_endpoint")]
    pub endpoint: Url,

    #[arg(
        long,
        env = "CLINIC_AUTH_HEADER",
        value_name = "NAME",
        default_value = ClinicClientArgs::default_header_auth_str(),
    )]
    #[serde(default = "ClinicClientArgs::default_header_auth")]
    pub header_auth: String,
}

impl Default for ClinicClientArgs {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            header_auth: Self::default_header_auth(),
        }
    }
}

impl ClinicClientArgs {
    const fn default_endpoint_str() -> &'static str {
        consts::DEFAULT_ENDPOINT
    }

    fn default_endpoint() -> Url {
        Self::default_endpoint_str().parse().unwrap()
    }

    const fn default_header_auth_str() -> &'static str {
        consts::DEFAULT_HEADER_AUTH
    }

    fn default_header_auth() -> String {
        Self::default_header_auth_str().into()
    }
}
