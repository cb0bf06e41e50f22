//! Stream handle abstractions the drivers are written against.
//!
//! The transport (or a test fake) supplies these; the drivers depend only on
//! "send one message", "receive one message or end-of-stream", "close the send
//! direction" and "await the final summary".

use async_trait::async_trait;
use tonic::Status;

/// Receive direction of an open stream.
#[async_trait]
pub trait Inbound<T>: Send {
    /// Next message; `Ok(None)` is a clean end-of-stream.
    async fn recv(&mut self) -> Result<Option<T>, Status>;
}

/// Send direction of an open stream.
///
/// Once [`Outbound::close_send`] has been called no further sends are
/// permitted; the receive direction stays open until the remote finishes.
#[async_trait]
pub trait Outbound<T>: Send {
    async fn send(&mut self, message: T) -> Result<(), Status>;

    /// Close the send direction. Idempotent.
    fn close_send(&mut self);

    fn is_closed(&self) -> bool;
}

/// Client-streaming call: send records, then close and await one summary.
#[async_trait]
pub trait ClientStream<Req, Resp>: Outbound<Req> {
    /// Close the send direction (if still open) and wait for the summary.
    async fn close_and_recv(&mut self) -> Result<Resp, Status>;
}

pub type BoxInbound<T> = Box<dyn Inbound<T>>;
pub type BoxOutbound<T> = Box<dyn Outbound<T>>;
pub type BoxClientStream<Req, Resp> = Box<dyn ClientStream<Req, Resp>>;

/// Bidirectional stream as two independently owned halves, so the send and
/// receive sides can progress concurrently while writes stay serialised by
/// ownership of the single send half.
pub struct BidiStream<Req, Resp> {
    pub outbound: BoxOutbound<Req>,
    pub inbound: BoxInbound<Resp>,
}

impl<Req, Resp> BidiStream<Req, Resp> {
    pub fn new(outbound: BoxOutbound<Req>, inbound: BoxInbound<Resp>) -> Self {
        Self { outbound, inbound }
    }

    pub fn split(self) -> (BoxOutbound<Req>, BoxInbound<Resp>) {
        (self.outbound, self.inbound)
    }
}

#[async_trait]
impl<T: Send + 'static> Inbound<T> for tonic::Streaming<T> {
    async fn recv(&mut self) -> Result<Option<T>, Status> {
        self.message().await
    }
}
