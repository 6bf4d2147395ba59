use anyhow::{anyhow, Result};
use clap::{value_parser, ArgAction, Parser};
use clinic_api::time::AppointmentClock;
use clinic_client::{ClinicClient, ClinicClientArgs};
use clinic_session::enrich::EnrichPolicy;
use tracing::debug;

use crate::{commands::Context, output::Output, reporter::ConsoleReporter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    #[command(flatten)]
    common: ArgsCommon,

    #[command(subcommand)]
    command: crate::commands::Command,
}

impl Args {
    pub(crate) async fn run(self) -> Result<()> {
        let context = self.common.try_into_context()?;
        self.command.run(&context).await
    }
}

#[derive(Parser)]
pub(crate) struct ArgsCommon {
    /// Turn debugging information on
    #[arg(short, long, global = true, env = "CLINIC_DEBUG", action = ArgAction::Count)]
    #[arg(value_parser = value_parser!(u8).range(..=3))]
    debug: u8,

    #[command(flatten)]
    client: ClinicClientArgs,

    /// UTC offset, in hours, attached to picked appointment times
    #[arg(
        long,
        global = true,
        env = "CLINIC_APPOINTMENT_UTC_OFFSET",
        value_name = "HOURS",
        default_value_t = AppointmentClock::DEFAULT_OFFSET_HOURS,
        allow_negative_numbers = true,
    )]
    utc_offset: i32,

    /// How to handle failed name lookups in listings
    #[arg(
        long,
        global = true,
        env = "CLINIC_ENRICH",
        value_name = "POLICY",
        default_value_t = EnrichPolicy::FailFast,
    )]
    enrich: EnrichPolicy,

    /// Print one JSON object per line instead of a table
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    json: bool,
}

impl ArgsCommon {
    fn try_into_context(self) -> Result<Context> {
        ::clinic_core::tracer::init_once_with_level_int(self.debug);

        let clock = AppointmentClock::with_offset_hours(self.utc_offset)
            .ok_or_else(|| anyhow!("invalid UTC offset: {} hours", self.utc_offset))?;
        let client = ClinicClient::try_new(self.client)
            .map_err(|error| anyhow!("failed to init the clinic client: {error}"))?;
        debug!(
            endpoint = %client.args().endpoint,
            offset = %clock.offset(),
            enrich = %self.enrich,
            "initialized the clinic client"
        );

        Ok(Context {
            client,
            clock,
            enrich: self.enrich,
            output: Output::new(self.json),
            reporter: ConsoleReporter,
        })
    }
}
