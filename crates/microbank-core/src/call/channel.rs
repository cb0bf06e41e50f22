//! Channel-backed stream handles (`tokio::sync::mpsc`).
//!
//! The gRPC transport feeds request streams and forwards responses through
//! these, and in-process fakes build handles from them directly. A handle that
//! owns the task driving its call aborts that task when dropped, so every
//! exit path releases the stream.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tonic::Status;

use super::handle::{ClientStream, Inbound, Outbound};

fn send_after_close() -> Status {
    Status::failed_precondition("send direction already closed")
}

fn remote_closed() -> Status {
    Status::unavailable("stream closed by remote")
}

fn early_completion() -> Status {
    Status::aborted("remote completed the call before all records were sent")
}

/// Outbound half over an mpsc sender. Dropping the sender closes the direction.
pub struct ChannelOutbound<T> {
    tx: Option<mpsc::Sender<T>>,
}

impl<T> ChannelOutbound<T> {
    pub fn new(tx: mpsc::Sender<T>) -> Self {
        Self { tx: Some(tx) }
    }
}

#[async_trait]
impl<T: Send + 'static> Outbound<T> for ChannelOutbound<T> {
    async fn send(&mut self, message: T) -> Result<(), Status> {
        let tx = self.tx.as_ref().ok_or_else(send_after_close)?;
        tx.send(message).await.map_err(|_| remote_closed())
    }

    fn close_send(&mut self) {
        self.tx = None;
    }

    fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

/// Inbound half over an mpsc receiver of results. A closed channel is
/// end-of-stream, unless the attached driving task failed.
pub struct ChannelInbound<T> {
    rx: mpsc::Receiver<Result<T, Status>>,
    task: Option<JoinHandle<()>>,
}

impl<T> ChannelInbound<T> {
    pub fn new(rx: mpsc::Receiver<Result<T, Status>>) -> Self {
        Self { rx, task: None }
    }

    /// Tie the lifetime of the task feeding this channel to the handle.
    pub fn attach(mut self, task: JoinHandle<()>) -> Self {
        self.task = Some(task);
        self
    }
}

impl<T> Drop for ChannelInbound<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Inbound<T> for ChannelInbound<T> {
    async fn recv(&mut self) -> Result<Option<T>, Status> {
        match self.rx.recv().await {
            Some(Ok(message)) => Ok(Some(message)),
            Some(Err(status)) => Err(status),
            None => {
                if let Some(task) = self.task.take() {
                    if let Err(err) = task.await {
                        return Err(Status::internal(format!("stream task failed: {err}")));
                    }
                }
                Ok(None)
            }
        }
    }
}

/// Sender/receiver pair for an outbound direction.
pub fn outbound_channel<T>(buffer: usize) -> (ChannelOutbound<T>, mpsc::Receiver<T>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (ChannelOutbound::new(tx), rx)
}

/// Sender/receiver pair for an inbound direction.
pub fn inbound_channel<T>(buffer: usize) -> (mpsc::Sender<Result<T, Status>>, ChannelInbound<T>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (tx, ChannelInbound::new(rx))
}

enum Summary<Resp> {
    Pending(JoinHandle<Result<Resp, Status>>),
    Finished(Result<Resp, Status>),
    Taken,
}

enum SendStep<Resp> {
    Sent,
    Refused(Status),
    CallEnded(Result<Resp, Status>),
}

fn joined<Resp>(
    result: Result<Result<Resp, Status>, tokio::task::JoinError>,
) -> Result<Resp, Status> {
    result.unwrap_or_else(|err| Err(Status::internal(format!("call task failed: {err}"))))
}

/// Client stream whose records go into an mpsc channel consumed by the task
/// that runs the call; the task's output is the summary.
pub struct ChannelClientStream<Req, Resp> {
    outbound: ChannelOutbound<Req>,
    summary: Summary<Resp>,
}

impl<Req, Resp> ChannelClientStream<Req, Resp> {
    pub fn new(tx: mpsc::Sender<Req>, call: JoinHandle<Result<Resp, Status>>) -> Self {
        Self {
            outbound: ChannelOutbound::new(tx),
            summary: Summary::Pending(call),
        }
    }

    async fn finish(&mut self) -> Result<Resp, Status> {
        match std::mem::replace(&mut self.summary, Summary::Taken) {
            Summary::Pending(call) => joined(call.await),
            Summary::Finished(outcome) => outcome,
            Summary::Taken => Err(Status::failed_precondition("summary already received")),
        }
    }

    /// Record the call outcome and turn it into the status a failed send reports.
    fn ended(&mut self, outcome: Result<Resp, Status>) -> Status {
        let status = match &outcome {
            Err(status) => status.clone(),
            Ok(_) => early_completion(),
        };
        self.summary = Summary::Finished(outcome);
        status
    }
}

impl<Req, Resp> Drop for ChannelClientStream<Req, Resp> {
    fn drop(&mut self) {
        if let Summary::Pending(call) = &self.summary {
            call.abort();
        }
    }
}

#[async_trait]
impl<Req, Resp> Outbound<Req> for ChannelClientStream<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    async fn send(&mut self, message: Req) -> Result<(), Status> {
        if self.outbound.is_closed() {
            return Err(send_after_close());
        }
        let step = match &mut self.summary {
            Summary::Pending(call) => tokio::select! {
                biased;
                sent = self.outbound.send(message) => match sent {
                    Ok(()) => SendStep::Sent,
                    Err(status) => SendStep::Refused(status),
                },
                result = call => SendStep::CallEnded(joined(result)),
            },
            Summary::Finished(Err(status)) => return Err(status.clone()),
            Summary::Finished(Ok(_)) | Summary::Taken => return Err(early_completion()),
        };
        match step {
            SendStep::Sent => Ok(()),
            // The remote went away; its final status explains why.
            SendStep::Refused(refused) => {
                tracing::debug!(code = ?refused.code(), "send refused, awaiting call outcome");
                let outcome = self.finish().await;
                Err(self.ended(outcome))
            }
            SendStep::CallEnded(outcome) => Err(self.ended(outcome)),
        }
    }

    fn close_send(&mut self) {
        self.outbound.close_send();
    }

    fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

#[async_trait]
impl<Req, Resp> ClientStream<Req, Resp> for ChannelClientStream<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    async fn close_and_recv(&mut self) -> Result<Resp, Status> {
        self.outbound.close_send();
        self.finish().await
    }
}
