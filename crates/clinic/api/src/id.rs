use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("not an integer: {0}")]
    NotInteger(#[from] ParseIntError),
    #[error("identifiers are positive, but given {0}")]
    NotPositive(i64),
}

macro_rules! define_id {
    ( $( $(#[$meta:meta])* $name:ident ),* $(,)? ) => {
        $(
            $(#[$meta])*
            #[derive(
                Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub i64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl FromStr for $name {
                type Err = IdParseError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    match s.trim().parse()? {
                        id if id > 0 => Ok(Self(id)),
                        id => Err(IdParseError::NotPositive(id)),
                    }
                }
            }

            impl From<$name> for i64 {
                fn from(value: $name) -> Self {
                    value.0
                }
            }
        )*
    };
}

define_id!(
    AppointmentId,
    DoctorId,
    /// Medical history record
    HistoryId,
    OfficeId,
    PatientId,
    /// Timetable row of a doctor's workday
    TimetableId,
    /// Login account, distinct from the doctor or patient it belongs to
    UserId,
);
