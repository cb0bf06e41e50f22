//! Retry loop: run an async attempt until success, a terminal status,
//! exhaustion, or cancellation.

use std::future::Future;

use tonic::Status;

use super::classify::{classify, RetryClass};
use super::error::CallError;
use super::policy::{RetryDecision, RetryPolicies, RetryPolicy};
use crate::context::CallContext;

/// Runs `attempt` until it succeeds or the retry policy says to stop.
///
/// On a retry-eligible failure, emits a warning event and sleeps for the
/// backoff delay before trying again. The context is watched during both the
/// in-flight attempt and the sleep; if it fires, the loop stops at once with
/// [`CallError::Cancelled`].
pub async fn run_with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    ctx: &CallContext,
    method: &str,
    mut attempt: F,
) -> Result<T, CallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    let mut n = 1u32;
    loop {
        let result = tokio::select! {
            biased;
            reason = ctx.cancelled() => return Err(CallError::cancelled(method, reason)),
            result = attempt() => result,
        };
        let status = match result {
            Ok(value) => return Ok(value),
            Err(status) => status,
        };

        let class = classify(&status);
        match policy.decide(n, class) {
            RetryDecision::NoRetry => {
                return Err(match class {
                    RetryClass::Transient => CallError::RetriesExhausted {
                        method: method.to_string(),
                        attempts: n,
                        status,
                    },
                    RetryClass::Terminal => CallError::terminal(method, status),
                });
            }
            RetryDecision::RetryAfter(delay) => {
                tracing::warn!(
                    method,
                    attempt = n,
                    delay_ms = delay.as_millis() as u64,
                    code = ?status.code(),
                    error = %status.message(),
                    "attempt failed, retrying"
                );
                tokio::select! {
                    biased;
                    reason = ctx.cancelled() => return Err(CallError::cancelled(method, reason)),
                    _ = tokio::time::sleep(delay) => {}
                }
                n += 1;
            }
        }
    }
}

impl RetryPolicies {
    /// Retry a single-shot (unary) call with the exponential policy.
    pub async fn wrap_unary<F, Fut, T>(
        &self,
        ctx: &CallContext,
        method: &str,
        attempt: F,
    ) -> Result<T, CallError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Status>>,
    {
        run_with_retry(&self.unary, ctx, method, attempt).await
    }

    /// Retry opening a stream with the linear policy. Only establishment is
    /// wrapped; messages on an open stream are never resent.
    pub async fn wrap_stream_establishment<F, Fut, T>(
        &self,
        ctx: &CallContext,
        method: &str,
        attempt: F,
    ) -> Result<T, CallError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Status>>,
    {
        run_with_retry(&self.stream, ctx, method, attempt).await
    }
}
