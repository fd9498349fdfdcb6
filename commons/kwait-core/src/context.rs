use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ContextError;

/// Cancellation handle with an optional deadline, passed down to event
/// sources.
///
/// Deadline expiry is observed lazily through [`WaitContext::done`] and
/// [`WaitContext::err`]; no timer task is spawned.
#[derive(Clone, Debug)]
pub struct WaitContext {
    token: CancellationToken,
    deadline: Option<Instant>,
    cause: Arc<OnceLock<ContextError>>,
}

impl Default for WaitContext {
    fn default() -> Self {
        Self::background()
    }
}

impl WaitContext {
    /// A context that never expires on its own.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
            cause: Arc::new(OnceLock::new()),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::background()
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that is cancelled with this one but can be
    /// cancelled on its own without affecting this one. The deadline is
    /// inherited.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
            cause: Arc::new(OnceLock::new()),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        let cause = if self.deadline_passed() {
            ContextError::DeadlineExceeded
        } else {
            ContextError::Canceled
        };
        let _ = self.cause.set(cause);
        self.token.cancel();
    }

    /// `None` while the context is live.
    pub fn err(&self) -> Option<ContextError> {
        if let Some(cause) = self.cause.get() {
            return Some(*cause);
        }
        if self.deadline_passed() {
            return Some(ContextError::DeadlineExceeded);
        }
        if self.token.is_cancelled() {
            return Some(ContextError::Canceled);
        }
        None
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
