use crate::services::FetchError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing requested yet
    Idle,
    /// The newest invocation has not delivered
    Pending,
    Displayed,
    Failed,
}

/// State a fetch view renders from. Only the owning view mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState<R> {
    result: Option<R>,
    error: Option<FetchError>,
    issued: u64,
    applied: u64,
}

impl<R> Default for DisplayState<R> {
    fn default() -> Self {
        Self {
            result: None,
            error: None,
            issued: 0,
            applied: 0,
        }
    }
}

impl<R> DisplayState<R> {
    /// Most recently applied result. Kept while a newer fetch is pending or
    /// after a later fetch failed.
    pub fn result(&self) -> Option<&R> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn phase(&self) -> FetchPhase {
        if self.issued > self.applied {
            FetchPhase::Pending
        } else if self.error.is_some() {
            FetchPhase::Failed
        } else if self.result.is_some() {
            FetchPhase::Displayed
        } else {
            FetchPhase::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.phase() == FetchPhase::Pending
    }

    pub fn last_issued(&self) -> u64 {
        self.issued
    }

    pub fn last_applied(&self) -> u64 {
        self.applied
    }

    pub(crate) fn mark_issued(&mut self, token: u64) {
        self.issued = token;
    }

    /// Applies the outcome of invocation `token`. Returns false, leaving the
    /// state untouched, when a newer invocation was already applied.
    pub(crate) fn apply(&mut self, token: u64, outcome: Result<R, FetchError>) -> bool {
        if token < self.applied {
            return false;
        }
        self.applied = token;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(error) => self.error = Some(error),
        }
        true
    }
}
