//! Server-streaming driver: idle -> open -> receiving* -> completed | failed.

use std::future::Future;

use tonic::Status;

use super::handle::BoxInbound;
use super::state::{CallShape, CallState, CallTrace};
use crate::context::CallContext;
use crate::retry::{CallError, RetryPolicies};

/// Open the stream under the stream-establishment policy, then deliver every
/// message to `on_message` as it arrives. Returns the number delivered.
///
/// Messages already delivered are never retracted; a mid-stream error is
/// returned as [`CallError::Receive`] without reopening the stream.
pub async fn invoke<F, Fut, T, M>(
    retry: &RetryPolicies,
    ctx: &CallContext,
    method: &str,
    open: F,
    on_message: M,
) -> Result<usize, CallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<BoxInbound<T>, Status>>,
    M: FnMut(T),
{
    let mut trace = CallTrace::new(CallShape::ServerStream, method);
    let inbound = match retry.wrap_stream_establishment(ctx, method, open).await {
        Ok(inbound) => inbound,
        Err(err) => return Err(trace.fail(err)),
    };
    trace.advance(CallState::Open);
    receive_loop(&mut trace, ctx, inbound, on_message).await
}

/// Drain an already-open stream.
pub async fn drain<T, M>(
    ctx: &CallContext,
    method: &str,
    inbound: BoxInbound<T>,
    on_message: M,
) -> Result<usize, CallError>
where
    M: FnMut(T),
{
    let mut trace = CallTrace::opened(CallShape::ServerStream, method);
    receive_loop(&mut trace, ctx, inbound, on_message).await
}

async fn receive_loop<T, M>(
    trace: &mut CallTrace<'_>,
    ctx: &CallContext,
    mut inbound: BoxInbound<T>,
    mut on_message: M,
) -> Result<usize, CallError>
where
    M: FnMut(T),
{
    let method = trace.method();
    let mut received = 0usize;
    loop {
        let next = tokio::select! {
            biased;
            reason = ctx.cancelled() => return Err(trace.fail(CallError::cancelled(method, reason))),
            next = inbound.recv() => next,
        };
        match next {
            Ok(Some(message)) => {
                if received == 0 {
                    trace.advance(CallState::Receiving);
                }
                received += 1;
                tracing::debug!(method, received, "stream message");
                on_message(message);
            }
            Ok(None) => {
                trace.advance(CallState::Completed);
                tracing::debug!(method, received, "stream completed");
                return Ok(received);
            }
            Err(status) => {
                return Err(trace.fail(CallError::Receive {
                    method: method.to_string(),
                    received,
                    status,
                }));
            }
        }
    }
}
