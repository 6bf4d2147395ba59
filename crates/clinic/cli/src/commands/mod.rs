mod admin;
mod doctor;
mod patient;
mod register;
mod routes;

use std::{convert::Infallible, future::Future};

use anyhow::Result;
use clap::{Parser, Subcommand};
use clinic_api::time::AppointmentClock;
use clinic_client::ClinicClient;
use clinic_session::{
    auth::Credentials,
    context::RoleSession,
    enrich::EnrichPolicy,
    guard::CancelHandle,
    nav::{InOperation, Unauthenticated},
    screen::ScreenEnv,
};
use tracing::{info, instrument, warn, Level};

use crate::{output::Output, reporter::ConsoleReporter};

pub(crate) struct Context {
    pub(crate) client: ClinicClient,
    pub(crate) clock: AppointmentClock,
    pub(crate) enrich: EnrichPolicy,
    pub(crate) output: Output,
    pub(crate) reporter: ConsoleReporter,
}

impl Context {
    pub(crate) fn env(&self) -> ScreenEnv<'_, ClinicClient> {
        ScreenEnv::new(&self.client, &self.reporter)
            .with_clock(self.clock)
            .with_enrich(self.enrich)
    }

    /// Logs in and enters the operation screen.
    async fn open<S>(&self, credentials: CredentialsArgs, operation: S::Operation) -> Result<InOperation<S>>
    where
        S: RoleSession,
    {
        let navigator = Unauthenticated
            .login(&self.env(), credentials.into())
            .await?;
        info!(
            login = navigator.identity().login(),
            screen = %navigator.screen(),
            "landed"
        );

        navigator
            .enter::<S, _>(&self.env(), operation)
            .map_err(|(navigator, error)| {
                navigator.logout();
                error.into()
            })
    }
}

/// Cancels the screen on Ctrl-C.
async fn until_interrupted<F>(handle: CancelHandle, future: F) -> F::Output
where
    F: Future,
{
    let interrupt = async move {
        match ::tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupted; cancelling the running operation");
                handle.cancel();
            }
            Err(error) => warn!("failed to listen for Ctrl-C: {error}"),
        }
        ::std::future::pending::<Infallible>().await
    };

    ::tokio::select! {
        result = future => result,
        never = interrupt => match never {},
    }
}

#[derive(Clone, Debug, Parser)]
pub(crate) struct CredentialsArgs {
    /// Login name
    #[arg(long, env = "CLINIC_LOGIN", value_name = "LOGIN")]
    login: String,

    /// Password
    #[arg(long, env = "CLINIC_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    password: String,
}

impl From<CredentialsArgs> for Credentials {
    fn from(CredentialsArgs { login, password }: CredentialsArgs) -> Self {
        Self { login, password }
    }
}

#[derive(Clone, Debug, Subcommand)]
pub(crate) enum Command {
    /// Create an account
    Register(self::register::RegisterArgs),

    /// Print the screens reachable by each role
    Routes(self::routes::RoutesArgs),

    /// Run an operation as an admin
    Admin(self::admin::AdminArgs),

    /// Run an operation as a doctor
    Doctor(self::doctor::DoctorArgs),

    /// Run an operation as a patient
    Patient(self::patient::PatientArgs),
}

impl Command {
    #[instrument(level = Level::INFO, skip_all, err(Display))]
    pub(crate) async fn run(self, context: &Context) -> Result<()> {
        match self {
            Self::Register(command) => command.run(context).await,
            Self::Routes(command) => command.run(context),
            Self::Admin(command) => command.run(context).await,
            Self::Doctor(command) => command.run(context).await,
            Self::Patient(command) => command.run(context).await,
        }
    }
}
