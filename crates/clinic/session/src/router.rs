use std::{fmt, hash::Hash, str::FromStr};

use clinic_api::role::Role;
use strum::{Display, EnumString};

use crate::error::{ClinicError, Result};

/// An operation reachable from one role's landing screen.
pub trait RoleOperation:
    Copy + fmt::Debug + fmt::Display + FromStr + Eq + Hash + Send + Sync + Into<OperationId> + 'static
{
    const ROLE: Role;

    /// Every operation of the role, in menu order.
    const ALL: &'static [Self];

    fn from_id(operation: OperationId) -> Option<Self>;

    /// The last path segment of the operation's route.
    fn screen(self) -> &'static str;

    fn failure_message(self) -> &'static str;
}

#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub enum AdminOperation {
    AddAppointment,
    CancelAppointment,
    EditAppointment,
    GetAppointment,
    ListDoctors,
    ListPatients,
}

impl RoleOperation for AdminOperation {
    const ROLE: Role = Role::Admin;

    const ALL: &'static [Self] = &[
        Self::AddAppointment,
        Self::CancelAppointment,
        Self::EditAppointment,
        Self::GetAppointment,
        Self::ListDoctors,
        Self::ListPatients,
    ];

    fn from_id(operation: OperationId) -> Option<Self> {
        match operation {
            OperationId::Admin(operation) => Some(operation),
            _ => None,
        }
    }

    fn screen(self) -> &'static str {
        match self {
            Self::AddAppointment => "appointment_add",
            Self::CancelAppointment => "appointment_delete",
            Self::EditAppointment => "appointment_edit",
            Self::GetAppointment => "appointment_get",
            Self::ListDoctors => "doctors_get",
            Self::ListPatients => "patients_get",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::AddAppointment => "failed to create the appointment",
            Self::CancelAppointment => "failed to cancel the appointment",
            Self::EditAppointment => "failed to edit the appointment",
            Self::GetAppointment => "failed to get the appointment",
            Self::ListDoctors => "failed to get the list of doctors",
            Self::ListPatients => "failed to get the list of patients",
        }
    }
}

#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub enum DoctorOperation {
    ListAppointments,
    GetHistory,
    CreateHistory,
    UpdateHistory,
}

impl RoleOperation for DoctorOperation {
    const ROLE: Role = Role::Doctor;

    const ALL: &'static [Self] = &[
        Self::ListAppointments,
        Self::GetHistory,
        Self::CreateHistory,
        Self::UpdateHistory,
    ];

    fn from_id(operation: OperationId) -> Option<Self> {
        match operation {
            OperationId::Doctor(operation) => Some(operation),
            _ => None,
        }
    }

    fn screen(self) -> &'static str {
        match self {
            Self::ListAppointments => "appointment_get",
            Self::GetHistory => "medhistory_get",
            Self::CreateHistory => "medhistory_create",
            Self::UpdateHistory => "medhistory_update",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::ListAppointments => "failed to get the appointments",
            Self::GetHistory => "failed to get the medical history",
            Self::CreateHistory => "failed to create the medical history",
            Self::UpdateHistory => "failed to update the medical history",
        }
    }
}

#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub enum PatientOperation {
    CancelAppointment,
    EditAppointment,
    AddAppointment,
    ListAppointments,
    GetHistory,
}

impl RoleOperation for PatientOperation {
    const ROLE: Role = Role::Patient;

    const ALL: &'static [Self] = &[
        Self::CancelAppointment,
        Self::EditAppointment,
        Self::AddAppointment,
        Self::ListAppointments,
        Self::GetHistory,
    ];

    fn from_id(operation: OperationId) -> Option<Self> {
        match operation {
            OperationId::Patient(operation) => Some(operation),
            _ => None,
        }
    }

    fn screen(self) -> &'static str {
        match self {
            Self::CancelAppointment => "appointment_delete",
            Self::EditAppointment => "appointment_edit",
            Self::AddAppointment => "appointment_add",
            Self::ListAppointments => "appointments_get",
            Self::GetHistory => "medhistory_get",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::CancelAppointment => "failed to cancel the appointment",
            Self::EditAppointment => "failed to edit the appointment",
            Self::AddAppointment => "failed to create the appointment",
            Self::ListAppointments => "failed to get the appointments",
            Self::GetHistory => "failed to get the medical history",
        }
    }
}

/// Any operation of any role.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperationId {
    Admin(AdminOperation),
    Doctor(DoctorOperation),
    Patient(PatientOperation),
}

impl From<AdminOperation> for OperationId {
    fn from(operation: AdminOperation) -> Self {
        Self::Admin(operation)
    }
}

impl From<DoctorOperation> for OperationId {
    fn from(operation: DoctorOperation) -> Self {
        Self::Doctor(operation)
    }
}

impl From<PatientOperation> for OperationId {
    fn from(operation: PatientOperation) -> Self {
        Self::Patient(operation)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.role(), self.name())
    }
}

impl OperationId {
    /// Parses a command name (e.g. `list-appointments`) in the scope of a role.
    pub fn parse(role: Role, name: &str) -> Option<Self> {
        match role {
            Role::Admin => name.parse::<AdminOperation>().ok().map(Into::into),
            Role::Doctor => name.parse::<DoctorOperation>().ok().map(Into::into),
            Role::Patient => name.parse::<PatientOperation>().ok().map(Into::into),
        }
    }

    pub const fn role(self) -> Role {
        match self {
            Self::Admin(_) => Role::Admin,
            Self::Doctor(_) => Role::Doctor,
            Self::Patient(_) => Role::Patient,
        }
    }

    /// The stable command name, unique within the role.
    pub fn name(self) -> String {
        match self {
            Self::Admin(operation) => operation.to_string(),
            Self::Doctor(operation) => operation.to_string(),
            Self::Patient(operation) => operation.to_string(),
        }
    }

    pub fn screen(self) -> &'static str {
        match self {
            Self::Admin(operation) => operation.screen(),
            Self::Doctor(operation) => operation.screen(),
            Self::Patient(operation) => operation.screen(),
        }
    }

    pub fn route(self) -> String {
        format!("{}/{}", route(self.role()).landing, self.screen())
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Admin(operation) => operation.failure_message(),
            Self::Doctor(operation) => operation.failure_message(),
            Self::Patient(operation) => operation.failure_message(),
        }
    }
}

/// One row of the role routing table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleRoute {
    pub role: Role,
    pub landing: &'static str,
    pub operations: &'static [OperationId],
}

impl RoleRoute {
    pub fn contains(&self, operation: OperationId) -> bool {
        self.operations.contains(&operation)
    }
}

const ADMIN_ROUTE: RoleRoute = RoleRoute {
    role: Role::Admin,
    landing: "/api/admin",
    operations: &[
        OperationId::Admin(AdminOperation::AddAppointment),
        OperationId::Admin(AdminOperation::CancelAppointment),
        OperationId::Admin(AdminOperation::EditAppointment),
        OperationId::Admin(AdminOperation::GetAppointment),
        OperationId::Admin(AdminOperation::ListDoctors),
        OperationId::Admin(AdminOperation::ListPatients),
    ],
};

const DOCTOR_ROUTE: RoleRoute = RoleRoute {
    role: Role::Doctor,
    landing: "/api/doctor",
    operations: &[
        OperationId::Doctor(DoctorOperation::ListAppointments),
        OperationId::Doctor(DoctorOperation::GetHistory),
        OperationId::Doctor(DoctorOperation::CreateHistory),
        OperationId::Doctor(DoctorOperation::UpdateHistory),
    ],
};

const PATIENT_ROUTE: RoleRoute = RoleRoute {
    role: Role::Patient,
    landing: "/api/patient",
    operations: &[
        OperationId::Patient(PatientOperation::CancelAppointment),
        OperationId::Patient(PatientOperation::EditAppointment),
        OperationId::Patient(PatientOperation::AddAppointment),
        OperationId::Patient(PatientOperation::ListAppointments),
        OperationId::Patient(PatientOperation::GetHistory),
    ],
};

pub const fn route(role: Role) -> &'static RoleRoute {
    match role {
        Role::Admin => &ADMIN_ROUTE,
        Role::Doctor => &DOCTOR_ROUTE,
        Role::Patient => &PATIENT_ROUTE,
    }
}

/// Checks that the operation is reachable from the role's landing screen.
///
/// This only guards the client flow; the backend enforces authorization.
pub fn authorize(role: Role, operation: OperationId) -> Result<()> {
    if route(role).contains(operation) {
        Ok(())
    } else {
        Err(ClinicError::Forbidden { role, operation })
    }
}

/// A navigable client location.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Landing(Role),
    Operation(OperationId),
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Screen {
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/".into(),
            Self::Register => "/register".into(),
            Self::Landing(role) => route(*role).landing.into(),
            Self::Operation(operation) => operation.route(),
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => return Some(Self::Login),
            path => path,
        };
        if path == "/register" {
            return Some(Self::Register);
        }

        Role::ALL.into_iter().map(route).find_map(|route| {
            let rest = path.strip_prefix(route.landing)?;
            if rest.is_empty() {
                return Some(Self::Landing(route.role));
            }
            let screen = rest.strip_prefix('/')?;
            route
                .operations
                .iter()
                .find(|operation| operation.screen() == screen)
                .copied()
                .map(Self::Operation)
        })
    }
}
