//! Bidirectional-streaming driver:
//! idle -> open -> {sending || receiving} -> completed | failed.
//!
//! The send side and the receive side are two concurrently progressing
//! futures over one stream, joined by a barrier: the call completes only
//! after the send direction is closed *and* the receive direction has
//! observed end-of-stream (or failed).

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tonic::Status;

use super::handle::BidiStream;
use super::state::{CallShape, CallState, CallTrace};
use crate::context::CallContext;
use crate::retry::{CallError, RetryPolicies};

/// Outcome of a completed bidirectional exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidiSummary {
    /// Requests accepted by the stream.
    pub sent: usize,
    /// Responses delivered to the caller.
    pub received: usize,
    /// Requests never sent because the remote finished the call first.
    pub unsent: usize,
}

/// Open the stream under the stream-establishment policy, then exchange
/// `requests` for responses delivered to `on_response` as they arrive.
pub async fn invoke<F, Fut, Req, Resp, M>(
    retry: &RetryPolicies,
    ctx: &CallContext,
    method: &str,
    open: F,
    requests: Vec<Req>,
    on_response: M,
) -> Result<BidiSummary, CallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<BidiStream<Req, Resp>, Status>>,
    M: FnMut(Resp),
{
    let mut trace = CallTrace::new(CallShape::Bidi, method);
    let stream = match retry.wrap_stream_establishment(ctx, method, open).await {
        Ok(stream) => stream,
        Err(err) => return Err(trace.fail(err)),
    };
    trace.advance(CallState::Open);
    exchange_inner(&mut trace, ctx, stream, requests, on_response).await
}

/// Drive an already-open bidirectional stream.
pub async fn exchange<Req, Resp, M>(
    ctx: &CallContext,
    method: &str,
    stream: BidiStream<Req, Resp>,
    requests: Vec<Req>,
    on_response: M,
) -> Result<BidiSummary, CallError>
where
    M: FnMut(Resp),
{
    let mut trace = CallTrace::opened(CallShape::Bidi, method);
    exchange_inner(&mut trace, ctx, stream, requests, on_response).await
}

struct SendFailure {
    index: usize,
    status: Status,
}

async fn exchange_inner<Req, Resp, M>(
    trace: &mut CallTrace<'_>,
    ctx: &CallContext,
    stream: BidiStream<Req, Resp>,
    requests: Vec<Req>,
    mut on_response: M,
) -> Result<BidiSummary, CallError>
where
    M: FnMut(Resp),
{
    let method = trace.method();
    let total = requests.len();
    let (mut outbound, mut inbound) = stream.split();
    // Fired by the receive side when it fails, so the send side stops early.
    let stop_sending = CancellationToken::new();
    trace.advance(CallState::Exchanging);

    let send_side = async {
        let mut sent = 0usize;
        let mut failure = None;
        for (index, request) in requests.into_iter().enumerate() {
            let result = tokio::select! {
                biased;
                _ = stop_sending.cancelled() => break,
                result = outbound.send(request) => result,
            };
            match result {
                Ok(()) => {
                    sent += 1;
                    tracing::debug!(method, index, total, "request sent");
                }
                Err(status) => {
                    failure = Some(SendFailure { index, status });
                    break;
                }
            }
        }
        outbound.close_send();
        (sent, failure)
    };

    let receive_side = async {
        let mut received = 0usize;
        loop {
            match inbound.recv().await {
                Ok(Some(response)) => {
                    received += 1;
                    tracing::debug!(method, received, "response received");
                    on_response(response);
                }
                Ok(None) => break Ok(received),
                Err(status) => {
                    stop_sending.cancel();
                    break Err(CallError::Receive {
                        method: method.to_string(),
                        received,
                        status,
                    });
                }
            }
        }
    };

    let ((sent, send_failure), received) = tokio::select! {
        biased;
        reason = ctx.cancelled() => return Err(trace.fail(CallError::cancelled(method, reason))),
        joined = async { tokio::join!(send_side, receive_side) } => joined,
    };

    let received = match received {
        Ok(received) => received,
        Err(err) => return Err(trace.fail(err)),
    };
    let unsent = total - sent;
    if let Some(SendFailure { index, status }) = send_failure {
        // The receive side ended cleanly, so the remote closed the call with
        // OK before taking every request.
        tracing::warn!(
            method,
            index,
            unsent,
            code = ?status.code(),
            error = %status.message(),
            "remote finished before all requests were sent"
        );
    }
    trace.advance(CallState::Completed);
    Ok(BidiSummary {
        sent,
        received,
        unsent,
    })
}
