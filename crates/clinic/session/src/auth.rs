use std::fmt;

use chrono::Utc;
use clinic_api::auth::{LoginRequest, RegisterRequest};
use clinic_client::ClinicApi;
use tracing::{info, instrument, Level};

use crate::{
    context::SessionContext,
    error::{ClinicError, Result},
    nav::{Navigator, Unauthenticated},
    report::{report_failure, Action},
    screen::ScreenEnv,
};

/// What the user types on the login screen.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl Unauthenticated {
    /// Logs in and lands on the role's landing screen.
    ///
    /// On failure nothing changes: the user stays on the login screen.
    #[instrument(level = Level::INFO, skip_all, fields(login = %credentials.login), err(Display))]
    pub async fn login<A>(&self, env: &ScreenEnv<'_, A>, credentials: Credentials) -> Result<Navigator>
    where
        A: ?Sized + ClinicApi,
    {
        let result = try_login(env.api, credentials).await;
        report_failure(env.reporter, Action::Login, &result);
        result
    }

    /// Creates an account. The user stays on the login screen either way.
    #[instrument(level = Level::INFO, skip_all, fields(login = %request.login, role = %request.role), err(Display))]
    pub async fn register<A>(&self, env: &ScreenEnv<'_, A>, request: RegisterRequest) -> Result<()>
    where
        A: ?Sized + ClinicApi,
    {
        let result = try_register(env.api, request).await;
        report_failure(env.reporter, Action::Register, &result);
        result
    }
}

async fn try_login<A>(api: &A, credentials: Credentials) -> Result<Navigator>
where
    A: ?Sized + ClinicApi,
{
    let Credentials { login, password } = credentials;
    require("login", &login)?;
    require("password", &password)?;

    let request = LoginRequest {
        login: login.clone(),
        password,
    };
    let response = api.login(&request).await?;
    drop(request);

    let context = SessionContext::from_login(login, response, Utc::now())?;
    info!(role = %context.role(), "logged in");
    Ok(context.into())
}

async fn try_register<A>(api: &A, request: RegisterRequest) -> Result<()>
where
    A: ?Sized + ClinicApi,
{
    require("fio", &request.fio)?;
    require("phone number", &request.phone_number)?;
    require("email", &request.email)?;
    require("login", &request.login)?;
    require("password", &request.password)?;

    api.register(&request).await.map_err(Into::into)
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ClinicError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}
