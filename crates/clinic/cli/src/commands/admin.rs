use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use clinic_api::{
    id::{AppointmentId, DoctorId, PatientId},
    time::parse_wall_clock,
};
use clinic_session::{
    context::AdminSession, nav::InOperation, ops::AppointmentForm, router::AdminOperation,
};
use tracing::{instrument, Level};

use super::{until_interrupted, Context, CredentialsArgs};

#[derive(Clone, Debug, Parser)]
pub(crate) struct AdminArgs {
    #[command(flatten)]
    credentials: CredentialsArgs,

    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Clone, Debug, Subcommand)]
enum AdminCommand {
    /// Book an appointment for any patient
    AddAppointment(AppointmentFormArgs),

    /// Cancel any appointment
    CancelAppointment {
        #[arg(value_name = "ID")]
        id: AppointmentId,
    },

    /// Move or reassign any appointment
    EditAppointment {
        #[arg(value_name = "ID")]
        id: AppointmentId,

        #[command(flatten)]
        form: AppointmentFormArgs,
    },

    /// Show an appointment with its doctor and patient
    GetAppointment {
        #[arg(value_name = "ID")]
        id: AppointmentId,
    },

    /// List every doctor
    ListDoctors,

    /// List every patient
    ListPatients,
}

impl AdminCommand {
    const fn operation(&self) -> AdminOperation {
        match self {
            Self::AddAppointment(_) => AdminOperation::AddAppointment,
            Self::CancelAppointment { .. } => AdminOperation::CancelAppointment,
            Self::EditAppointment { .. } => AdminOperation::EditAppointment,
            Self::GetAppointment { .. } => AdminOperation::GetAppointment,
            Self::ListDoctors => AdminOperation::ListDoctors,
            Self::ListPatients => AdminOperation::ListPatients,
        }
    }

    async fn run(self, context: &Context, screen: &InOperation<AdminSession>) -> Result<()> {
        let env = context.env();
        let output = context.output;

        match self {
            Self::AddAppointment(form) => {
                let appointment = screen.add_appointment(&env, form.into()).await?;
                output.print_one(&appointment)
            }
            Self::CancelAppointment { id } => {
                screen.cancel_appointment(&env, id).await?;
                output.print_done(&format!("cancelled appointment {id}"));
                Ok(())
            }
            Self::EditAppointment { id, form } => {
                let appointment = screen.edit_appointment(&env, id, form.into()).await?;
                output.print_one(&appointment)
            }
            Self::GetAppointment { id } => {
                let appointment = screen.get_appointment(&env, id).await?;
                output.print_one(&appointment)
            }
            Self::ListDoctors => output.print_all(&screen.list_doctors(&env).await?),
            Self::ListPatients => output.print_all(&screen.list_patients(&env).await?),
        }
    }
}

#[derive(Clone, Debug, Parser)]
struct AppointmentFormArgs {
    #[arg(long, value_name = "ID")]
    patient_id: PatientId,

    #[arg(long, value_name = "ID")]
    doctor_id: DoctorId,

    /// Local wall-clock time, e.g. "2024-01-01 10:00"
    #[arg(long, value_name = "DATETIME", value_parser = parse_wall_clock)]
    at: NaiveDateTime,
}

impl From<AppointmentFormArgs> for AppointmentForm {
    fn from(AppointmentFormArgs { patient_id, doctor_id, at }: AppointmentFormArgs) -> Self {
        Self {
            patient_id,
            doctor_id,
            at,
        }
    }
}

impl AdminArgs {
    #[instrument(level = Level::INFO, skip_all, fields(operation = %self.command.operation()), err(Display))]
    pub(crate) async fn run(self, context: &Context) -> Result<()> {
        let Self {
            credentials,
            command,
        } = self;

        let screen = context
            .open::<AdminSession>(credentials, command.operation())
            .await?;
        let result = until_interrupted(screen.cancel_handle(), command.run(context, &screen)).await;
        screen.logout();
        result
    }
}
