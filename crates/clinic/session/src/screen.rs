use std::future::Future;

use clinic_api::time::AppointmentClock;

use crate::{enrich::EnrichPolicy, error::Result, report::FailureReporter};

/// What every screen needs besides the session: the backend, the failure
/// reporter and the client-side policies.
pub struct ScreenEnv<'a, A: ?Sized> {
    pub api: &'a A,
    pub reporter: &'a dyn FailureReporter,
    pub clock: AppointmentClock,
    pub enrich: EnrichPolicy,
}

impl<A: ?Sized> Clone for ScreenEnv<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ?Sized> Copy for ScreenEnv<'_, A> {}

impl<'a, A: ?Sized> ScreenEnv<'a, A> {
    pub fn new(api: &'a A, reporter: &'a dyn FailureReporter) -> Self {
        Self {
            api,
            reporter,
            clock: AppointmentClock::default(),
            enrich: EnrichPolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: AppointmentClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_enrich(mut self, enrich: EnrichPolicy) -> Self {
        self.enrich = enrich;
        self
    }
}

/// The last successfully rendered data of a screen.
///
/// A failed refresh keeps the previous data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View<T> {
    data: Option<T>,
}

impl<T> Default for View<T> {
    fn default() -> Self {
        Self { data: None }
    }
}

impl<T> View<T> {
    pub fn get(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.data
    }

    pub async fn refresh<F>(&mut self, future: F) -> Result<&T>
    where
        F: Future<Output = Result<T>>,
    {
        let data = future.await?;
        Ok(&*self.data.insert(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClinicError;

    #[tokio::test]
    async fn keep_data_on_failure() {
        let mut view = View::default();
        view.refresh(async { Ok(vec![1, 2]) })
            .await
            .expect("failed to refresh");

        let result = view
            .refresh(async { Err(ClinicError::validation("bad input")) })
            .await;
        assert!(result.is_err());
        assert_eq!(view.get(), Some(&vec![1, 2]));
    }
}
