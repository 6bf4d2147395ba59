use clinic_session::{
    error::ClinicError,
    report::{Action, FailureReporter},
};
use tracing::debug;

/// Shows failures on the terminal.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct ConsoleReporter;

impl FailureReporter for ConsoleReporter {
    fn report(&self, action: Action, error: &ClinicError) {
        debug!(%action, kind = %error.kind(), "reporting failure");
        eprintln!("error: {}: {error}", action.failure_message());
    }
}
