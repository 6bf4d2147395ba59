use anyhow::Result;
use clap::Parser;
use clinic_api::{auth::RegisterRequest, role::Role};
use clinic_session::{auth::Credentials, nav::Unauthenticated};
use tracing::{instrument, Level};

use super::{Context, CredentialsArgs};

#[derive(Clone, Debug, Parser)]
pub(crate) struct RegisterArgs {
    #[command(flatten)]
    credentials: CredentialsArgs,

    /// One of "admin", "patient" or "doctor"
    #[arg(long, value_name = "ROLE")]
    role: Role,

    /// Full name
    #[arg(long, value_name = "NAME")]
    fio: String,

    #[arg(long, value_name = "PHONE")]
    phone_number: String,

    #[arg(long, value_name = "EMAIL")]
    email: String,

    /// Insurance policy number, for patients
    #[arg(long, default_value = "")]
    insurance: String,

    /// Medical specialization, for doctors
    #[arg(long, default_value = "")]
    specialization: String,
}

impl RegisterArgs {
    #[instrument(level = Level::INFO, skip_all, fields(role = %self.role), err(Display))]
    pub(crate) async fn run(self, context: &Context) -> Result<()> {
        let Self {
            credentials,
            role,
            fio,
            phone_number,
            email,
            insurance,
            specialization,
        } = self;
        let credentials = Credentials::from(credentials);

        let request = RegisterRequest {
            fio,
            phone_number,
            email,
            insurance,
            specialization,
            login: credentials.login,
            password: credentials.password,
            role,
        };
        let login = request.login.clone();

        Unauthenticated.register(&context.env(), request).await?;
        context
            .output
            .print_done(&format!("registered {login} as {role}; log in to continue"));
        Ok(())
    }
}
