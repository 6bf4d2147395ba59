mod args;
mod commands;
mod output;
mod reporter;

use std::process::ExitCode;

use clap::Parser;
use clinic_session::error::ClinicError;

#[tokio::main]
async fn main() -> ExitCode {
    match self::args::Args::parse().run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // the reporter has already shown failed actions
            let reported = error
                .downcast_ref::<ClinicError>()
                .is_some_and(ClinicError::is_reportable);
            if !reported {
                eprintln!("Error: {error:?}");
            }
            ExitCode::FAILURE
        }
    }
}
