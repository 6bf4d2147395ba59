use clinic_api::{
    id::{AppointmentId, PatientId},
    role::{Role, UnknownRole},
    token::TokenError,
};
use clinic_client::ApiError;
use strum::Display;
use thiserror::Error;

use crate::router::OperationId;

pub type Result<T, E = ClinicError> = ::core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClinicError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
    #[error("invalid session token: {0}")]
    Token(#[from] TokenError),
    #[error("{operation} is not available to the {role} role")]
    Forbidden { role: Role, operation: OperationId },
    #[error("appointment {appointment} does not belong to patient {patient}")]
    NotOwner {
        appointment: AppointmentId,
        patient: PatientId,
    },
    #[error("{actual} screen cannot run {expected}")]
    WrongScreen {
        expected: OperationId,
        actual: OperationId,
    },
    #[error("{0} is already in progress")]
    InFlight(OperationId),
    #[error("{0} was cancelled")]
    Cancelled(OperationId),
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    NetworkOrServer,
    Validation,
    Authorization,
    Flow,
}

impl ClinicError {
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation(message.to_string())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(_) => ErrorKind::NetworkOrServer,
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnknownRole(_)
            | Self::Token(_)
            | Self::Forbidden { .. }
            | Self::NotOwner { .. }
            | Self::WrongScreen { .. } => ErrorKind::Authorization,
            Self::InFlight(_) | Self::Cancelled(_) => ErrorKind::Flow,
        }
    }

    /// Flow errors come from the user leaving or double-triggering a screen
    /// and are not shown.
    pub const fn is_reportable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Flow)
    }
}
