use async_trait::async_trait;
use tonic::transport::Channel;
use tonic::Status;

use super::GrpcCaller;
use crate::call::{BidiStream, BoxClientStream, BoxInbound};
use crate::context::CallContext;
use crate::port::ResiliencyPort;
use crate::wire::resiliency::{ResilliencyRequest, ResilliencyResponse};

// Method names as registered by the server, spelling included.
const UNARY: &str = "/resilliency.ResilliencyService/Unaryresilliency";
const SERVER_STREAMING: &str = "/resilliency.ResilliencyService/ServerStreamingResilliency";
const CLIENT_STREAMING: &str = "/resilliency.ResilliencyService/ClientStreamingResilliency";
const BIDI_STREAMING: &str =
    "/resilliency.ResilliencyService/BidirectionalStreamingResilliency";

/// `resilliency.ResilliencyService` client.
#[derive(Clone)]
pub struct GrpcResiliencyClient {
    caller: GrpcCaller,
}

impl GrpcResiliencyClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            caller: GrpcCaller::new(channel),
        }
    }
}

#[async_trait]
impl ResiliencyPort for GrpcResiliencyClient {
    async fn unary(
        &self,
        ctx: &CallContext,
        request: ResilliencyRequest,
    ) -> Result<ResilliencyResponse, Status> {
        self.caller.unary(ctx, UNARY, request).await
    }

    async fn server_stream(
        &self,
        ctx: &CallContext,
        request: ResilliencyRequest,
    ) -> Result<BoxInbound<ResilliencyResponse>, Status> {
        self.caller.server_streaming(ctx, SERVER_STREAMING, request).await
    }

    async fn client_stream(
        &self,
        ctx: &CallContext,
    ) -> Result<BoxClientStream<ResilliencyRequest, ResilliencyResponse>, Status> {
        self.caller.client_streaming(ctx, CLIENT_STREAMING).await
    }

    async fn bidi_stream(
        &self,
        ctx: &CallContext,
    ) -> Result<BidiStream<ResilliencyRequest, ResilliencyResponse>, Status> {
        self.caller.streaming(ctx, BIDI_STREAMING).await
    }
}
