//! Client-streaming driver:
//! idle -> open -> sending -> closing -> awaiting-summary -> completed | failed.

use std::future::Future;

use tonic::Status;

use super::handle::BoxClientStream;
use super::state::{CallShape, CallState, CallTrace};
use crate::context::CallContext;
use crate::retry::{CallError, RetryPolicies};

/// Open the stream under the stream-establishment policy, send every record
/// in order, close the send direction and await the summary.
///
/// Records are handed over only after establishment succeeds, so a retried
/// open never duplicates them.
pub async fn invoke<F, Fut, Req, Resp>(
    retry: &RetryPolicies,
    ctx: &CallContext,
    method: &str,
    open: F,
    records: Vec<Req>,
) -> Result<Resp, CallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<BoxClientStream<Req, Resp>, Status>>,
{
    let mut trace = CallTrace::new(CallShape::ClientStream, method);
    let stream = match retry.wrap_stream_establishment(ctx, method, open).await {
        Ok(stream) => stream,
        Err(err) => return Err(trace.fail(err)),
    };
    trace.advance(CallState::Open);
    send_and_summarize(&mut trace, ctx, stream, records).await
}

/// Drive an already-open client stream.
pub async fn send_all<Req, Resp>(
    ctx: &CallContext,
    method: &str,
    stream: BoxClientStream<Req, Resp>,
    records: Vec<Req>,
) -> Result<Resp, CallError> {
    let mut trace = CallTrace::opened(CallShape::ClientStream, method);
    send_and_summarize(&mut trace, ctx, stream, records).await
}

/// A failed send closes the send direction and reports immediately: the
/// remaining records are not sent and no summary is requested for a partial
/// sequence.
async fn send_and_summarize<Req, Resp>(
    trace: &mut CallTrace<'_>,
    ctx: &CallContext,
    mut stream: BoxClientStream<Req, Resp>,
    records: Vec<Req>,
) -> Result<Resp, CallError> {
    let method = trace.method();
    let total = records.len();
    trace.advance(CallState::Sending);

    for (index, record) in records.into_iter().enumerate() {
        tokio::select! {
            biased;
            reason = ctx.cancelled() => {
                stream.close_send();
                return Err(trace.fail(CallError::cancelled(method, reason)));
            }
            sent = stream.send(record) => {
                if let Err(status) = sent {
                    stream.close_send();
                    tracing::warn!(method, index, total, code = ?status.code(), "record send failed, abandoning stream");
                    return Err(trace.fail(CallError::Send {
                        method: method.to_string(),
                        index,
                        status,
                    }));
                }
            }
        }
        tracing::debug!(method, index, total, "record sent");
    }

    trace.advance(CallState::Closing);
    stream.close_send();

    trace.advance(CallState::AwaitingSummary);
    let summary = tokio::select! {
        biased;
        reason = ctx.cancelled() => return Err(trace.fail(CallError::cancelled(method, reason))),
        summary = stream.close_and_recv() => summary,
    };
    match summary {
        Ok(summary) => {
            trace.advance(CallState::Completed);
            Ok(summary)
        }
        Err(status) => Err(trace.fail(CallError::terminal(method, status))),
    }
}
