use std::fmt;

use chrono::{DateTime, Utc};
use clinic_api::{
    auth::LoginResponse,
    id::{DoctorId, PatientId, UserId},
    role::Role,
    token::SessionToken,
};

use crate::{
    error::ClinicError,
    router::{AdminOperation, DoctorOperation, PatientOperation, RoleOperation},
};

/// Who is logged in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    login: String,
    user_id: UserId,
}

impl Identity {
    pub fn login(&self) -> &str {
        &self.login
    }

    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// A role-specific session record.
///
/// Records are only built by a successful login and are moved through
/// navigation, so every screen sees exactly what the login produced.
pub trait RoleSession: Clone + fmt::Debug + Send + Sync + 'static {
    type Operation: RoleOperation;

    fn identity(&self) -> &Identity;

    fn token(&self) -> &SessionToken;

    fn into_context(self) -> SessionContext;

    /// Gives the context back when it belongs to another role.
    fn from_context(context: SessionContext) -> Result<Self, SessionContext>;

    fn role() -> Role {
        <Self::Operation as RoleOperation>::ROLE
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSession {
    identity: Identity,
    token: SessionToken,
}

impl RoleSession for AdminSession {
    type Operation = AdminOperation;

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn token(&self) -> &SessionToken {
        &self.token
    }

    fn into_context(self) -> SessionContext {
        SessionContext::Admin(self)
    }

    fn from_context(context: SessionContext) -> Result<Self, SessionContext> {
        match context {
            SessionContext::Admin(session) => Ok(session),
            context => Err(context),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoctorSession {
    identity: Identity,
    token: SessionToken,
    doctor_id: DoctorId,
}

impl DoctorSession {
    pub const fn doctor_id(&self) -> DoctorId {
        self.doctor_id
    }
}

impl RoleSession for DoctorSession {
    type Operation = DoctorOperation;

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn token(&self) -> &SessionToken {
        &self.token
    }

    fn into_context(self) -> SessionContext {
        SessionContext::Doctor(self)
    }

    fn from_context(context: SessionContext) -> Result<Self, SessionContext> {
        match context {
            SessionContext::Doctor(session) => Ok(session),
            context => Err(context),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientSession {
    identity: Identity,
    token: SessionToken,
    patient_id: PatientId,
}

impl PatientSession {
    pub const fn patient_id(&self) -> PatientId {
        self.patient_id
    }
}

impl RoleSession for PatientSession {
    type Operation = PatientOperation;

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn token(&self) -> &SessionToken {
        &self.token
    }

    fn into_context(self) -> SessionContext {
        SessionContext::Patient(self)
    }

    fn from_context(context: SessionContext) -> Result<Self, SessionContext> {
        match context {
            SessionContext::Patient(session) => Ok(session),
            context => Err(context),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionContext {
    Admin(AdminSession),
    Doctor(DoctorSession),
    Patient(PatientSession),
}

impl SessionContext {
    /// Builds the role's record from a login response.
    ///
    /// The role comes from the token claims; the role-specific id must be
    /// present in the user object or the login is rejected.
    pub(crate) fn from_login(
        login: String,
        response: LoginResponse,
        now: DateTime<Utc>,
    ) -> Result<Self, ClinicError> {
        let LoginResponse { jwt_token, user } = response;

        let claims = jwt_token.claims()?;
        claims.check_expiry(now)?;
        let role = claims.role()?;

        let identity = Identity {
            login,
            user_id: user.id,
        };
        match role {
            Role::Admin => Ok(Self::Admin(AdminSession {
                identity,
                token: jwt_token,
            })),
            Role::Doctor => {
                let doctor_id = user.doctor_id.ok_or_else(|| {
                    ClinicError::validation("the login response has no doctor id")
                })?;
                Ok(Self::Doctor(DoctorSession {
                    identity,
                    token: jwt_token,
                    doctor_id,
                }))
            }
            Role::Patient => {
                let patient_id = user.patient_id.ok_or_else(|| {
                    ClinicError::validation("the login response has no patient id")
                })?;
                Ok(Self::Patient(PatientSession {
                    identity,
                    token: jwt_token,
                    patient_id,
                }))
            }
        }
    }

    pub const fn role(&self) -> Role {
        match self {
            Self::Admin(_) => Role::Admin,
            Self::Doctor(_) => Role::Doctor,
            Self::Patient(_) => Role::Patient,
        }
    }

    pub fn identity(&self) -> &Identity {
        match self {
            Self::Admin(session) => session.identity(),
            Self::Doctor(session) => session.identity(),
            Self::Patient(session) => session.identity(),
        }
    }

    pub fn token(&self) -> &SessionToken {
        match self {
            Self::Admin(session) => session.token(),
            Self::Doctor(session) => session.token(),
            Self::Patient(session) => session.token(),
        }
    }

    pub const fn doctor_id(&self) -> Option<DoctorId> {
        match self {
            Self::Doctor(session) => Some(session.doctor_id),
            _ => None,
        }
    }

    pub const fn patient_id(&self) -> Option<PatientId> {
        match self {
            Self::Patient(session) => Some(session.patient_id),
            _ => None,
        }
    }
}
