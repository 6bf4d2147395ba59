use anyhow::Result;
use clap::{Parser, Subcommand};
use clinic_api::{id::PatientId, medical_history::MedicalHistoryForm};
use clinic_session::{context::DoctorSession, nav::InOperation, router::DoctorOperation};
use tracing::{instrument, Level};

use super::{until_interrupted, Context, CredentialsArgs};

#[derive(Clone, Debug, Parser)]
pub(crate) struct DoctorArgs {
    #[command(flatten)]
    credentials: CredentialsArgs,

    #[command(subcommand)]
    command: DoctorCommand,
}

#[derive(Clone, Debug, Subcommand)]
enum DoctorCommand {
    /// List my appointments with patient names
    ListAppointments,

    /// Show a patient's medical history
    GetHistory {
        #[arg(long, value_name = "ID")]
        patient_id: PatientId,
    },

    /// Open a patient's medical history
    CreateHistory(HistoryArgs),

    /// Replace a patient's medical history
    UpdateHistory(HistoryArgs),
}

impl DoctorCommand {
    const fn operation(&self) -> DoctorOperation {
        match self {
            Self::ListAppointments => DoctorOperation::ListAppointments,
            Self::GetHistory { .. } => DoctorOperation::GetHistory,
            Self::CreateHistory(_) => DoctorOperation::CreateHistory,
            Self::UpdateHistory(_) => DoctorOperation::UpdateHistory,
        }
    }

    async fn run(self, context: &Context, screen: &InOperation<DoctorSession>) -> Result<()> {
        let env = context.env();
        let output = context.output;

        match self {
            Self::ListAppointments => output.print_all(&screen.list_appointments(&env).await?),
            Self::GetHistory { patient_id } => {
                output.print_one(&screen.get_history(&env, patient_id).await?)
            }
            Self::CreateHistory(args) => {
                let patient_id = args.patient_id;
                screen.create_history(&env, patient_id, args.into()).await?;
                output.print_done(&format!("created the medical history of patient {patient_id}"));
                Ok(())
            }
            Self::UpdateHistory(args) => {
                let patient_id = args.patient_id;
                screen.update_history(&env, patient_id, args.into()).await?;
                output.print_done(&format!("updated the medical history of patient {patient_id}"));
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, Parser)]
struct HistoryArgs {
    #[arg(long, value_name = "ID")]
    patient_id: PatientId,

    #[arg(long, default_value = "")]
    chronic_diseases: String,

    #[arg(long, default_value = "")]
    allergies: String,

    #[arg(long, default_value = "")]
    blood_type: String,

    #[arg(long, default_value = "")]
    vaccination: String,
}

impl From<HistoryArgs> for MedicalHistoryForm {
    fn from(args: HistoryArgs) -> Self {
        Self {
            chronic_diseases: args.chronic_diseases,
            allergies: args.allergies,
            blood_type: args.blood_type,
            vaccination: args.vaccination,
        }
    }
}

impl DoctorArgs {
    #[instrument(level = Level::INFO, skip_all, fields(operation = %self.command.operation()), err(Display))]
    pub(crate) async fn run(self, context: &Context) -> Result<()> {
        let Self {
            credentials,
            command,
        } = self;

        let screen = context
            .open::<DoctorSession>(credentials, command.operation())
            .await?;
        let result = until_interrupted(screen.cancel_handle(), command.run(context, &screen)).await;
        screen.logout();
        result
    }
}
