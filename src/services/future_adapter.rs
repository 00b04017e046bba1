use super::capability::{FetchCapability, OnComplete};
use super::error_handling::FetchError;
use super::sample_service::SampleService;
use crate::domain::sample::{Sample, SampleQuery};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Default capability: runs a future-returning fetch on the tokio runtime and
/// forwards its single outcome into the completion callback.
pub struct FutureAdapter<F> {
    fetch: F,
    runtime: Handle,
    service: &'static str,
    timeout: Option<Duration>,
}

impl<F> FutureAdapter<F> {
    pub fn new(service: &'static str, runtime: Handle, fetch: F) -> Self {
        Self {
            fetch,
            runtime,
            service,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl<O, R, F, Fut> FetchCapability<O, R> for FutureAdapter<F>
where
    F: Fn(O) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    R: Send + 'static,
{
    fn invoke(&self, options: O, on_complete: OnComplete<R>) {
        let service = self.service;
        let timeout = self.timeout;
        let fetch = (self.fetch)(options);

        // The fetch runs in its own task so a panic inside it still reaches
        // the callback as `Aborted`.
        let task = self.runtime.spawn(async move {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, fetch).await {
                    Ok(outcome) => outcome.map_err(|e| FetchError::from_service(service, &e)),
                    Err(_) => Err(FetchError::timed_out(limit)),
                },
                None => fetch.await.map_err(|e| FetchError::from_service(service, &e)),
            }
        });

        self.runtime.spawn(async move {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(FetchError::Aborted {
                    reason: join_error.to_string(),
                }),
            };
            match &outcome {
                Ok(_) => debug!(service = %service, "Fetch resolved"),
                Err(error) => debug!(service = %service, error = %error, "Fetch failed"),
            }
            on_complete(outcome);
        });
    }
}

pub type SampleFuture = Pin<Box<dyn Future<Output = anyhow::Result<Vec<Sample>>> + Send>>;

/// Adapter pre-bound to `SampleService::get_samples`.
pub fn sample_adapter(
    service: Arc<dyn SampleService>,
    runtime: Handle,
) -> FutureAdapter<impl Fn(SampleQuery) -> SampleFuture + Send + Sync> {
    FutureAdapter::new("samples", runtime, move |query: SampleQuery| -> SampleFuture {
        let service = service.clone();
        Box::pin(async move { service.get_samples(&query).await })
    })
}
