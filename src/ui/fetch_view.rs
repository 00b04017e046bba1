use super::display_state::DisplayState;
use crate::config::ServiceConfig;
use crate::domain::sample::{Sample, SampleQuery};
use crate::services::error_handling::{FetchError, LogHelper};
use crate::services::future_adapter::sample_adapter;
use crate::services::sample_service::HttpSampleService;
use crate::services::{FetchCapability, OnComplete, SharedCapability};
use anyhow::{Context, Result};
use parking_lot::{Mutex, MutexGuard};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::debug;
use uuid::Uuid;

/// Called after a completion changed the display state, so the host can
/// schedule a re-render. The state is already updated when it runs.
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

struct Shared<R> {
    state: Mutex<DisplayState<R>>,
    changed: Notify,
}

impl<R> Shared<R> {
    fn apply(&self, view_id: Uuid, token: u64, outcome: Result<R, FetchError>) -> bool {
        let mut state = self.state.lock();
        if token < state.last_applied() {
            debug!(
                %view_id,
                token,
                newest = state.last_applied(),
                failed = outcome.is_err(),
                "Discarding stale result"
            );
            return false;
        }
        if let Err(error) = &outcome {
            LogHelper::log_fetch_failure(view_id, token, error);
        }
        state.apply(token, outcome)
    }
}

/// A view element that fetches through an injected capability on each user
/// action and keeps the newest result for display.
///
/// The completion handed to the capability applies its outcome straight to
/// the display state. It only holds a weak reference, so once the view is
/// dropped late completions are discarded.
pub struct FetchView<O, R> {
    id: Uuid,
    capability: SharedCapability<O, R>,
    options: O,
    shared: Arc<Shared<R>>,
    next_token: u64,
    repaint: Option<RepaintHook>,
}

pub type SamplesView = FetchView<SampleQuery, Vec<Sample>>;

impl<O, R> FetchView<O, R>
where
    O: Clone,
    R: Send + 'static,
{
    pub fn new(options: O, capability: SharedCapability<O, R>) -> Self {
        Self {
            id: Uuid::new_v4(),
            capability,
            options,
            shared: Arc::new(Shared {
                state: Mutex::new(DisplayState::default()),
                changed: Notify::new(),
            }),
            next_token: 0,
            repaint: None,
        }
    }

    pub fn with_repaint(mut self, repaint: RepaintHook) -> Self {
        self.repaint = Some(repaint);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current display state. Do not hold the guard across `trigger`.
    pub fn state(&self) -> MutexGuard<'_, DisplayState<R>> {
        self.shared.state.lock()
    }

    pub fn options(&self) -> &O {
        &self.options
    }

    /// Options used by subsequent triggers; in-flight fetches keep theirs.
    pub fn set_options(&mut self, options: O) {
        self.options = options;
    }

    /// The user action. Issues exactly one new invocation and returns its
    /// token. A capability that completes synchronously is reflected in the
    /// state by the time this returns.
    pub fn trigger(&mut self) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.shared.state.lock().mark_issued(token);

        let view_id = self.id;
        let shared: Weak<Shared<R>> = Arc::downgrade(&self.shared);
        let repaint = self.repaint.clone();
        let on_complete: OnComplete<R> = Box::new(move |outcome| {
            let Some(shared) = shared.upgrade() else {
                debug!(%view_id, token, "View dropped before fetch completed, discarding");
                return;
            };
            if !shared.apply(view_id, token, outcome) {
                return;
            }
            shared.changed.notify_one();
            if let Some(repaint) = repaint {
                repaint();
            }
        });

        debug!(view_id = %self.id, token, "Issuing fetch");
        self.capability.invoke(self.options.clone(), on_complete);
        token
    }

    /// Waits until the newest invocation has delivered. Never resolves if
    /// the capability never calls back; wrap in a timeout when that matters.
    pub async fn settled(&self) {
        while self.shared.state.lock().is_pending() {
            self.shared.changed.notified().await;
        }
    }

    /// `settled` bounded by `limit`. Returns false if still pending.
    pub async fn settled_within(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.settled()).await.is_ok()
    }
}

impl SamplesView {
    /// Builds a samples view. Without an injected capability, fetches go
    /// through the HTTP sample service on the current tokio runtime.
    pub fn create(
        query: SampleQuery,
        capability: Option<SharedCapability<SampleQuery, Vec<Sample>>>,
        config: &ServiceConfig,
    ) -> Result<Self> {
        let capability: SharedCapability<SampleQuery, Vec<Sample>> = match capability {
            Some(capability) => capability,
            None => {
                let runtime =
                    Handle::try_current().context("Default sample adapter needs a tokio runtime")?;
                let service = Arc::new(HttpSampleService::new(config)?);
                Arc::new(
                    sample_adapter(service, runtime)
                        .with_timeout(Duration::from_secs(config.timeout_seconds)),
                )
            }
        };
        Ok(Self::new(query, capability))
    }
}
