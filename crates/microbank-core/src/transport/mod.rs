//! gRPC implementation of the RPC ports over one shared channel.
//!
//! A `tonic::transport::Channel` multiplexes calls over a single HTTP/2
//! connection and is cheap to clone; each logical call clones it, opens its
//! own stream, and releases that stream on every exit path.

mod bank;
mod resiliency;

pub use bank::GrpcBankClient;
pub use resiliency::GrpcResiliencyClient;

use anyhow::{Context, Result};
use tokio_stream::wrappers::ReceiverStream;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Status};

use crate::call::{
    inbound_channel, outbound_channel, BidiStream, BoxClientStream, BoxInbound,
    ChannelClientStream,
};
use crate::config::MicrobankConfig;
use crate::context::CallContext;

/// Records buffered between the send side and the HTTP/2 stream.
const STREAM_BUFFER: usize = 16;

/// Build the shared channel. Connection happens lazily on the first call, so
/// an unreachable server shows up as a call status rather than here.
pub fn channel(cfg: &MicrobankConfig) -> Result<Channel> {
    let uri = cfg.endpoint_uri();
    let endpoint = Endpoint::from_shared(uri.clone())
        .with_context(|| format!("invalid endpoint {uri}"))?
        .connect_timeout(cfg.connect_timeout());
    tracing::debug!(%uri, "gRPC channel configured");
    Ok(endpoint.connect_lazy())
}

/// Thin layer over `tonic::client::Grpc` that speaks the handle types of
/// [`crate::call`]. Every request carries the context's remaining time as
/// its `grpc-timeout`.
#[derive(Clone)]
pub(crate) struct GrpcCaller {
    inner: Grpc<Channel>,
}

fn request<T>(ctx: &CallContext, message: T) -> Request<T> {
    let mut request = Request::new(message);
    if let Some(remaining) = ctx.remaining() {
        request.set_timeout(remaining);
    }
    request
}

impl GrpcCaller {
    pub(crate) fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    /// Clone the client and wait until the channel can take a call.
    async fn ready(&self) -> Result<Grpc<Channel>, Status> {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|e| Status::unavailable(format!("service was not ready: {e}")))?;
        Ok(grpc)
    }

    pub(crate) async fn unary<Req, Resp>(
        &self,
        ctx: &CallContext,
        path: &'static str,
        message: Req,
    ) -> Result<Resp, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.ready().await?;
        let codec = ProstCodec::<Req, Resp>::default();
        let response = grpc
            .unary(request(ctx, message), PathAndQuery::from_static(path), codec)
            .await?;
        Ok(response.into_inner())
    }

    pub(crate) async fn server_streaming<Req, Resp>(
        &self,
        ctx: &CallContext,
        path: &'static str,
        message: Req,
    ) -> Result<BoxInbound<Resp>, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.ready().await?;
        let codec = ProstCodec::<Req, Resp>::default();
        let response = grpc
            .server_streaming(request(ctx, message), PathAndQuery::from_static(path), codec)
            .await?;
        Ok(Box::new(response.into_inner()))
    }

    /// The call runs on its own task, fed from the returned handle's send
    /// direction; its result is the summary.
    pub(crate) async fn client_streaming<Req, Resp>(
        &self,
        ctx: &CallContext,
        path: &'static str,
    ) -> Result<BoxClientStream<Req, Resp>, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.ready().await?;
        let (tx, rx) = tokio::sync::mpsc::channel(STREAM_BUFFER);
        let request = request(ctx, ReceiverStream::new(rx));
        let call = tokio::spawn(async move {
            let codec = ProstCodec::<Req, Resp>::default();
            grpc.client_streaming(request, PathAndQuery::from_static(path), codec)
                .await
                .map(tonic::Response::into_inner)
        });
        Ok(Box::new(ChannelClientStream::new(tx, call)))
    }

    /// The call runs on its own task, which forwards every response (and a
    /// final error, if any) into the receive half.
    pub(crate) async fn streaming<Req, Resp>(
        &self,
        ctx: &CallContext,
        path: &'static str,
    ) -> Result<BidiStream<Req, Resp>, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.ready().await?;
        let (outbound, rx) = outbound_channel(STREAM_BUFFER);
        let (responses, inbound) = inbound_channel(STREAM_BUFFER);
        let request = request(ctx, ReceiverStream::new(rx));
        let task = tokio::spawn(async move {
            let codec = ProstCodec::<Req, Resp>::default();
            let mut stream = match grpc
                .streaming(request, PathAndQuery::from_static(path), codec)
                .await
            {
                Ok(response) => response.into_inner(),
                Err(status) => {
                    let _ = responses.send(Err(status)).await;
                    return;
                }
            };
            loop {
                match stream.message().await {
                    Ok(Some(message)) => {
                        if responses.send(Ok(message)).await.is_err() {
                            return;
                        }
                    }
                    Ok(None) => return,
                    Err(status) => {
                        let _ = responses.send(Err(status)).await;
                        return;
                    }
                }
            }
        });
        Ok(BidiStream::new(
            Box::new(outbound),
            Box::new(inbound.attach(task)),
        ))
    }
}
