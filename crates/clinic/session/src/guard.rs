use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use futures::future::{AbortHandle, Abortable, Aborted};
use tracing::debug;

use crate::{
    error::{ClinicError, Result},
    router::OperationId,
};

#[derive(Debug, Default)]
struct GuardState {
    busy: AtomicBool,
    closed: AtomicBool,
    running: Mutex<Option<AbortHandle>>,
}

impl GuardState {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let running = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = running {
            debug!("aborting the running operation");
            handle.abort();
        }
    }
}

/// Serializes the actions of one operation screen.
///
/// At most one action runs at a time. Closing the guard aborts the running
/// action and refuses new ones.
#[derive(Debug, Default)]
pub(crate) struct ScreenGuard {
    state: Arc<GuardState>,
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        self.state.close()
    }
}

impl ScreenGuard {
    pub(crate) fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            state: self.state.clone(),
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::SeqCst)
    }

    pub(crate) async fn run<F, T>(&self, operation: OperationId, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.state.closed.load(Ordering::SeqCst) {
            return Err(ClinicError::Cancelled(operation));
        }
        if self.state.busy.swap(true, Ordering::SeqCst) {
            return Err(ClinicError::InFlight(operation));
        }
        let _busy = Busy(&self.state);

        let (handle, registration) = AbortHandle::new_pair();
        *self
            .state
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle.clone());
        // closed between the check and the registration
        if self.state.closed.load(Ordering::SeqCst) {
            handle.abort();
        }

        match Abortable::new(future, registration).await {
            Ok(result) => result,
            Err(Aborted) => Err(ClinicError::Cancelled(operation)),
        }
    }
}

struct Busy<'a>(&'a GuardState);

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.0.busy.store(false, Ordering::SeqCst);
    }
}

/// Aborts an operation screen from outside, e.g. on Ctrl-C.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    state: Arc<GuardState>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.state.close()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}
