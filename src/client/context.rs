//! Per-call deadline and cancellation.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a call under a [`RequestContext`] was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Cancelled {
    /// The context's cancellation token fired.
    #[error("request canceled")]
    Canceled,
    /// The context's deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// Deadline and cancellation signal bound to one or more API calls.
///
/// Every network call made with a context aborts as soon as the deadline passes
/// or the token is cancelled; the in-flight HTTP exchange is dropped, which
/// releases its connection. Cloning shares the token.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl RequestContext {
    /// A context with no deadline and a fresh token.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline(Instant::now() + timeout)
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::new().deadline(deadline)
    }

    /// A context driven by an existing cancellation token.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            deadline: None,
            token,
        }
    }

    /// Set or tighten the deadline. An earlier existing deadline is kept.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Replace the cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn deadline_at(&self) -> Option<Instant> {
        self.deadline
    }

    /// The token; cancelling it aborts every call running under this context.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancel the token.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// `Err` if the context is already cancelled or past its deadline.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.token.is_cancelled() {
            return Err(Cancelled::Canceled);
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Err(Cancelled::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `future` to completion unless the context ends first, in which
    /// case `future` is dropped.
    pub(crate) async fn run<F>(&self, future: F) -> Result<F::Output, Cancelled>
    where
        F: Future,
    {
        self.check()?;

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Cancelled::Canceled),
            () = expired => Err(Cancelled::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}
