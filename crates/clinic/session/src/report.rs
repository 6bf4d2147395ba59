use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

use tracing::{debug, error};

use crate::{error::ClinicError, router::OperationId};

/// A user action that can fail.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Login,
    Register,
    Operation(OperationId),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Register => f.write_str("register"),
            Self::Operation(operation) => operation.fmt(f),
        }
    }
}

impl From<OperationId> for Action {
    fn from(operation: OperationId) -> Self {
        Self::Operation(operation)
    }
}

impl Action {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Login => "failed to log in",
            Self::Register => "failed to register",
            Self::Operation(operation) => operation.failure_message(),
        }
    }
}

/// Shows failed actions to the user.
///
/// Called once per failed action.
pub trait FailureReporter: Send + Sync {
    fn report(&self, action: Action, error: &ClinicError);
}

/// Reports failures as `tracing` events.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, action: Action, error: &ClinicError) {
        error!(%action, kind = %error.kind(), "{}: {error}", action.failure_message())
    }
}

/// Keeps every reported failure, for inspection.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(Action, String)>>,
}

impl FailureReporter for RecordingReporter {
    fn report(&self, action: Action, error: &ClinicError) {
        debug!(%action, "recording failure: {error}");
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((action, error.to_string()))
    }
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<(Action, String)> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.reports().into_iter().map(|(action, _)| action).collect()
    }
}

/// Reports an action's failure unless it is a flow error.
pub(crate) fn report_failure<T>(
    reporter: &dyn FailureReporter,
    action: Action,
    result: &Result<T, ClinicError>,
) {
    match result {
        Err(error) if error.is_reportable() => reporter.report(action, error),
        Err(error) => debug!(%action, "{error}"),
        Ok(_) => (),
    }
}
