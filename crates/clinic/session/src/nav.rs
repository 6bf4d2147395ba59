use std::future::Future;

use clinic_api::role::Role;
use tracing::{debug, info};

use crate::{
    context::{AdminSession, DoctorSession, Identity, PatientSession, RoleSession, SessionContext},
    error::{ClinicError, Result},
    guard::{CancelHandle, ScreenGuard},
    report::{report_failure, Action, FailureReporter},
    router::{authorize, route, OperationId, RoleOperation, Screen},
    screen::ScreenEnv,
};

/// The login screen. Nobody is logged in and no token is held.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Unauthenticated;

impl Unauthenticated {
    pub const fn screen(&self) -> Screen {
        Screen::Login
    }
}

/// A role's landing screen, listing the role's operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Landing<S> {
    session: S,
}

impl<S> Landing<S>
where
    S: RoleSession,
{
    pub(crate) const fn new(session: S) -> Self {
        Self { session }
    }

    pub const fn session(&self) -> &S {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        Screen::Landing(S::role())
    }

    pub fn operations(&self) -> &'static [S::Operation] {
        <S::Operation as RoleOperation>::ALL
    }

    /// Resolves an operation picked at runtime, e.g. from a command line.
    pub fn resolve(&self, operation: OperationId) -> Result<S::Operation> {
        authorize(S::role(), operation)?;
        <S::Operation as RoleOperation>::from_id(operation).ok_or(ClinicError::Forbidden {
            role: S::role(),
            operation,
        })
    }

    pub fn enter(self, operation: S::Operation) -> InOperation<S> {
        let id: OperationId = operation.into();
        debug!(operation = %id, "entering operation screen");
        InOperation {
            session: self.session,
            operation,
            guard: ScreenGuard::default(),
        }
    }

    /// Discards the session and its token.
    pub fn logout(self) -> Unauthenticated {
        info!(login = self.session.identity().login(), "logged out");
        Unauthenticated
    }
}

/// An operation screen of a role.
///
/// Leaving the screen, by completing, cancelling or dropping it, aborts the
/// action still running on it.
#[derive(Debug)]
pub struct InOperation<S>
where
    S: RoleSession,
{
    session: S,
    operation: S::Operation,
    guard: ScreenGuard,
}

impl<S> InOperation<S>
where
    S: RoleSession,
{
    pub const fn session(&self) -> &S {
        &self.session
    }

    pub fn operation(&self) -> S::Operation {
        self.operation
    }

    pub fn screen(&self) -> Screen {
        Screen::Operation(self.operation.into())
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.guard.cancel_handle()
    }

    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Returns to the landing screen after the operation is done.
    pub fn complete(self) -> Landing<S> {
        let Self { session, guard, .. } = self;
        drop(guard);
        Landing::new(session)
    }

    /// Returns to the landing screen without finishing the operation.
    pub fn cancel(self) -> Landing<S> {
        let id: OperationId = self.operation.into();
        debug!(operation = %id, "leaving operation screen");
        self.complete()
    }

    /// Leaves the screen and discards the session, aborting any running action.
    pub fn logout(self) -> Unauthenticated {
        self.complete().logout()
    }

    /// Runs the screen's own action.
    pub(crate) async fn perform<A, F, T>(
        &self,
        env: &ScreenEnv<'_, A>,
        operation: S::Operation,
        future: F,
    ) -> Result<T>
    where
        A: ?Sized,
        F: Future<Output = Result<T>>,
    {
        let result = if operation == self.operation {
            self.guard.run(operation.into(), future).await
        } else {
            Err(ClinicError::WrongScreen {
                expected: operation.into(),
                actual: self.operation.into(),
            })
        };
        report_failure(env.reporter, Action::Operation(self.operation.into()), &result);
        result
    }

    /// Runs a lookup that feeds the screen's inputs, such as a picker.
    pub(crate) async fn lookup<A, F, T>(&self, env: &ScreenEnv<'_, A>, future: F) -> Result<T>
    where
        A: ?Sized,
        F: Future<Output = Result<T>>,
    {
        let result = self.guard.run(self.operation.into(), future).await;
        report_failure(env.reporter, Action::Operation(self.operation.into()), &result);
        result
    }
}

/// The landing screen of whoever is logged in, for front ends that pick
/// screens at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigator {
    Admin(Landing<AdminSession>),
    Doctor(Landing<DoctorSession>),
    Patient(Landing<PatientSession>),
}

impl From<SessionContext> for Navigator {
    fn from(context: SessionContext) -> Self {
        match context {
            SessionContext::Admin(session) => Self::Admin(Landing::new(session)),
            SessionContext::Doctor(session) => Self::Doctor(Landing::new(session)),
            SessionContext::Patient(session) => Self::Patient(Landing::new(session)),
        }
    }
}

impl Navigator {
    pub const fn role(&self) -> Role {
        match self {
            Self::Admin(_) => Role::Admin,
            Self::Doctor(_) => Role::Doctor,
            Self::Patient(_) => Role::Patient,
        }
    }

    pub fn screen(&self) -> Screen {
        Screen::Landing(self.role())
    }

    pub fn identity(&self) -> &Identity {
        match self {
            Self::Admin(landing) => landing.session().identity(),
            Self::Doctor(landing) => landing.session().identity(),
            Self::Patient(landing) => landing.session().identity(),
        }
    }

    pub fn context(&self) -> SessionContext {
        self.clone().into_context()
    }

    pub fn into_context(self) -> SessionContext {
        match self {
            Self::Admin(landing) => landing.session.into_context(),
            Self::Doctor(landing) => landing.session.into_context(),
            Self::Patient(landing) => landing.session.into_context(),
        }
    }

    pub fn operations(&self) -> &'static [OperationId] {
        route(self.role()).operations
    }

    pub fn authorize(&self, operation: OperationId) -> Result<()> {
        authorize(self.role(), operation)
    }

    /// Enters an operation screen of the logged-in role.
    ///
    /// A mismatched role is reported once and the navigator is given back
    /// unchanged.
    pub fn enter<S, A>(
        self,
        env: &ScreenEnv<'_, A>,
        operation: S::Operation,
    ) -> Result<InOperation<S>, (Self, ClinicError)>
    where
        S: RoleSession,
        A: ?Sized,
    {
        let role = self.role();
        let id: OperationId = operation.into();
        let result = match self.authorize(id) {
            Ok(()) => S::from_context(self.into_context()).map_err(|context| {
                let error = ClinicError::Forbidden {
                    role,
                    operation: id,
                };
                (Self::from(context), error)
            }),
            Err(error) => Err((self, error)),
        };

        match result {
            Ok(session) => Ok(Landing::new(session).enter(operation)),
            Err((navigator, error)) => {
                env.reporter.report(Action::Operation(id), &error);
                Err((navigator, error))
            }
        }
    }

    pub fn logout(self) -> Unauthenticated {
        match self {
            Self::Admin(landing) => landing.logout(),
            Self::Doctor(landing) => landing.logout(),
            Self::Patient(landing) => landing.logout(),
        }
    }
}
