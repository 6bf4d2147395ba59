use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use clinic_api::{
    id::{AppointmentId, DoctorId},
    time::parse_wall_clock,
};
use clinic_session::{
    context::PatientSession, nav::InOperation, ops::MyAppointmentForm, router::PatientOperation,
};
use tracing::{instrument, Level};

use super::{until_interrupted, Context, CredentialsArgs};

#[derive(Clone, Debug, Parser)]
pub(crate) struct PatientArgs {
    #[command(flatten)]
    credentials: CredentialsArgs,

    #[command(subcommand)]
    command: PatientCommand,
}

#[derive(Clone, Debug, Subcommand)]
enum PatientCommand {
    /// Cancel one of my appointments
    CancelAppointment {
        #[arg(value_name = "ID")]
        id: AppointmentId,
    },

    /// Move one of my appointments
    EditAppointment {
        #[arg(value_name = "ID")]
        id: AppointmentId,

        #[command(flatten)]
        form: MyAppointmentArgs,
    },

    /// Book an appointment on one of the doctor's workdays
    AddAppointment(MyAppointmentArgs),

    /// List my appointments with doctor names
    ListAppointments,

    /// Show my medical history
    GetHistory,

    /// List the doctors I can book
    Doctors,

    /// List the appointments I can cancel or move
    MyAppointments,

    /// List the weekdays a doctor works on (0 is Sunday)
    Workdays {
        #[arg(long, value_name = "ID")]
        doctor_id: DoctorId,
    },
}

impl PatientCommand {
    /// Pickers run on the screen they feed.
    const fn operation(&self) -> PatientOperation {
        match self {
            Self::CancelAppointment { .. } => PatientOperation::CancelAppointment,
            Self::EditAppointment { .. } => PatientOperation::EditAppointment,
            Self::AddAppointment(_) | Self::Doctors | Self::Workdays { .. } => {
                PatientOperation::AddAppointment
            }
            Self::MyAppointments => PatientOperation::CancelAppointment,
            Self::ListAppointments => PatientOperation::ListAppointments,
            Self::GetHistory => PatientOperation::GetHistory,
        }
    }

    async fn run(self, context: &Context, screen: &InOperation<PatientSession>) -> Result<()> {
        let env = context.env();
        let output = context.output;

        match self {
            Self::CancelAppointment { id } => {
                screen.cancel_appointment(&env, id).await?;
                output.print_done(&format!("cancelled appointment {id}"));
                Ok(())
            }
            Self::EditAppointment { id, form } => {
                let appointment = screen.edit_appointment(&env, id, form.into()).await?;
                output.print_one(&appointment)
            }
            Self::AddAppointment(form) => {
                let appointment = screen.add_appointment(&env, form.into()).await?;
                output.print_one(&appointment)
            }
            Self::ListAppointments => output.print_all(&screen.list_appointments(&env).await?),
            Self::GetHistory => output.print_one(&screen.get_history(&env).await?),
            Self::Doctors => output.print_all(&screen.doctors(&env).await?),
            Self::MyAppointments => output.print_all(&screen.my_appointments(&env).await?),
            Self::Workdays { doctor_id } => {
                output.print_all(&screen.workdays(&env, doctor_id).await?)
            }
        }
    }
}

#[derive(Clone, Debug, Parser)]
struct MyAppointmentArgs {
    #[arg(long, value_name = "ID")]
    doctor_id: DoctorId,

    /// Local wall-clock time, e.g. "2024-01-01 10:00"
    #[arg(long, value_name = "DATETIME", value_parser = parse_wall_clock)]
    at: NaiveDateTime,
}

impl From<MyAppointmentArgs> for MyAppointmentForm {
    fn from(MyAppointmentArgs { doctor_id, at }: MyAppointmentArgs) -> Self {
        Self { doctor_id, at }
    }
}

impl PatientArgs {
    #[instrument(level = Level::INFO, skip_all, fields(operation = %self.command.operation()), err(Display))]
    pub(crate) async fn run(self, context: &Context) -> Result<()> {
        let Self {
            credentials,
            command,
        } = self;

        let screen = context
            .open::<PatientSession>(credentials, command.operation())
            .await?;
        let result = until_interrupted(screen.cancel_handle(), command.run(context, &screen)).await;
        screen.logout();
        result
    }
}
