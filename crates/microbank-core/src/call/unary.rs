//! Unary driver: idle -> awaiting-response -> completed | failed.

use std::future::Future;

use tonic::Status;

use super::state::{CallShape, CallState, CallTrace};
use crate::context::CallContext;
use crate::retry::{CallError, RetryPolicies};

/// Run a unary call under the unary retry policy.
///
/// `attempt` issues one request; it is invoked again only for retry-eligible
/// failures, and never after `ctx` fires.
pub async fn invoke<F, Fut, T>(
    retry: &RetryPolicies,
    ctx: &CallContext,
    method: &str,
    attempt: F,
) -> Result<T, CallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Status>>,
{
    let mut trace = CallTrace::new(CallShape::Unary, method);
    trace.advance(CallState::AwaitingResponse);
    match retry.wrap_unary(ctx, method, attempt).await {
        Ok(response) => {
            trace.advance(CallState::Completed);
            Ok(response)
        }
        Err(err) => Err(trace.fail(err)),
    }
}
