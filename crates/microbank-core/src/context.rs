//! Per-operation cancellation: one token plus an optional deadline, threaded
//! through every attempt, send, receive and backoff sleep of a logical call.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a call stopped before the remote produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller fired the cancellation token.
    Token,
    /// The operation deadline elapsed.
    Deadline,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Token => write!(f, "cancelled by caller"),
            CancelReason::Deadline => write!(f, "deadline elapsed"),
        }
    }
}

/// Cancellation scope for one logical operation (including all its retries).
///
/// Clones share the same token, so cancelling any clone cancels them all.
#[derive(Debug, Clone)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CallContext {
    /// A context with no deadline; only the token can stop it.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_in(timeout)
    }

    /// Wrap an existing token (e.g. one cancelled by a Ctrl-C handler).
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set (or replace) the deadline to `timeout` from now.
    pub fn deadline_in(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Time left before the deadline; `None` when the context has no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Reason the context is already done, if it is.
    pub fn done(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            return Some(CancelReason::Token);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::Deadline),
            _ => None,
        }
    }

    /// Resolves once the token fires or the deadline passes.
    pub async fn cancelled(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => CancelReason::Token,
                _ = tokio::time::sleep_until(deadline) => CancelReason::Deadline,
            },
            None => {
                self.token.cancelled().await;
                CancelReason::Token
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deadline_fires_after_timeout() {
        let ctx = CallContext::with_timeout(Duration::from_secs(3));
        let start = Instant::now();
        assert_eq!(ctx.cancelled().await, CancelReason::Deadline);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(ctx.done(), Some(CancelReason::Deadline));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn token_wins_over_later_deadline() {
        let ctx = CallContext::with_timeout(Duration::from_secs(60));
        let clone = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            clone.cancel();
        });
        assert_eq!(ctx.cancelled().await, CancelReason::Token);
        assert_eq!(ctx.done(), Some(CancelReason::Token));
    }

    #[tokio::test(start_paused = true)]
    async fn external_token_cancels_context_with_deadline() {
        let token = CancellationToken::new();
        let ctx = CallContext::with_token(token.clone()).deadline_in(Duration::from_secs(30));
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(30)));
        assert!(ctx.done().is_none());

        token.cancel();
        assert_eq!(ctx.cancelled().await, CancelReason::Token);
        assert_eq!(ctx.done(), Some(CancelReason::Token));
    }

    #[test]
    fn fresh_context_is_not_done() {
        let ctx = CallContext::new();
        assert!(ctx.done().is_none());
        assert!(ctx.remaining().is_none());
    }
}
