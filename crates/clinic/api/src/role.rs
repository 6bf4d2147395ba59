use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Account role, encoded by the backend as an integer claim.
#[derive(
    Copy, Clone, Debug, Display, EnumString, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Patient,
    Doctor,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Admin, Self::Patient, Self::Doctor];

    pub const fn code(self) -> i64 {
        match self {
            Self::Admin => 0,
            Self::Patient => 1,
            Self::Doctor => 2,
        }
    }
}

impl TryFrom<i64> for Role {
    type Error = UnknownRole;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|role| role.code() == code)
            .ok_or(UnknownRole(code))
    }
}

impl From<Role> for i64 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub i64);
