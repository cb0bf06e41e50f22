//! In-process stream handles standing in for a remote peer.

use std::future::Future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use microbank_core::call::{
    inbound_channel, outbound_channel, BidiStream, BoxInbound, ClientStream, Outbound,
};
use tokio::sync::mpsc;
use tonic::Status;

/// Inbound handle that yields `messages` then either a clean end-of-stream
/// or `error`.
pub fn inbound_of<T: Send + 'static>(messages: Vec<T>, error: Option<Status>) -> BoxInbound<T> {
    let (tx, inbound) = inbound_channel(messages.len() + 1);
    for message in messages {
        tx.try_send(Ok(message)).unwrap();
    }
    if let Some(status) = error {
        tx.try_send(Err(status)).unwrap();
    }
    Box::new(inbound)
}

/// What a [`RecordingClientStream`] observed.
#[derive(Debug)]
pub struct ClientStreamLog<Req> {
    pub sent: Vec<Req>,
    pub send_attempts: usize,
    pub close_send_calls: usize,
    pub close_and_recv_calls: usize,
}

impl<Req> Default for ClientStreamLog<Req> {
    fn default() -> Self {
        Self {
            sent: Vec::new(),
            send_attempts: 0,
            close_send_calls: 0,
            close_and_recv_calls: 0,
        }
    }
}

/// Client stream that records every interaction, fails the send of record
/// `fail_at` (0-based) if set, and answers `close_and_recv` with `summary`.
pub struct RecordingClientStream<Req, Resp> {
    log: Arc<Mutex<ClientStreamLog<Req>>>,
    fail_at: Option<usize>,
    summary: Option<Resp>,
    closed: bool,
}

impl<Req, Resp> RecordingClientStream<Req, Resp> {
    pub fn new(fail_at: Option<usize>, summary: Resp) -> (Self, Arc<Mutex<ClientStreamLog<Req>>>) {
        let log = Arc::new(Mutex::new(ClientStreamLog::default()));
        let stream = Self {
            log: Arc::clone(&log),
            fail_at,
            summary: Some(summary),
            closed: false,
        };
        (stream, log)
    }
}

#[async_trait]
impl<Req: Send + 'static, Resp: Send + 'static> Outbound<Req> for RecordingClientStream<Req, Resp> {
    async fn send(&mut self, message: Req) -> Result<(), Status> {
        if self.closed {
            return Err(Status::failed_precondition("send after close"));
        }
        let mut log = self.log.lock().unwrap();
        let index = log.send_attempts;
        log.send_attempts += 1;
        if self.fail_at == Some(index) {
            return Err(Status::unavailable("connection reset"));
        }
        log.sent.push(message);
        Ok(())
    }

    fn close_send(&mut self) {
        self.closed = true;
        self.log.lock().unwrap().close_send_calls += 1;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl<Req: Send + 'static, Resp: Send + 'static> ClientStream<Req, Resp>
    for RecordingClientStream<Req, Resp>
{
    async fn close_and_recv(&mut self) -> Result<Resp, Status> {
        self.closed = true;
        self.log.lock().unwrap().close_and_recv_calls += 1;
        self.summary
            .take()
            .ok_or_else(|| Status::failed_precondition("summary already taken"))
    }
}

/// Bidirectional stream whose remote end is `server`, running on its own
/// task with the request receiver and the response sender.
pub fn bidi_with_server<Req, Resp, F, Fut>(server: F) -> BidiStream<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
    F: FnOnce(mpsc::Receiver<Req>, mpsc::Sender<Result<Resp, Status>>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (outbound, requests) = outbound_channel(1);
    let (responses, inbound) = inbound_channel(1);
    let task = tokio::spawn(server(requests, responses));
    BidiStream::new(Box::new(outbound), Box::new(inbound.attach(task)))
}
