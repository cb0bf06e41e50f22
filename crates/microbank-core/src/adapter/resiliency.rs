use std::sync::Arc;

use tonic::transport::Channel;

use super::log_failure;
use crate::call::{bidi, client_stream, server_stream, unary, BidiSummary};
use crate::context::CallContext;
use crate::domain::FaultParams;
use crate::port::ResiliencyPort;
use crate::retry::{CallError, RetryPolicies};
use crate::transport::GrpcResiliencyClient;

/// Fault-injection operations: every call shape, driven with the same
/// delay bounds and candidate status codes so the server can delay or fail
/// any of them.
#[derive(Clone)]
pub struct ResiliencyAdapter {
    client: Arc<dyn ResiliencyPort>,
    retry: RetryPolicies,
}

impl ResiliencyAdapter {
    pub fn new(client: Arc<dyn ResiliencyPort>, retry: RetryPolicies) -> Self {
        Self { client, retry }
    }

    pub fn connect(channel: Channel, retry: RetryPolicies) -> Self {
        Self::new(Arc::new(GrpcResiliencyClient::new(channel)), retry)
    }

    pub async fn unary(&self, ctx: &CallContext, params: &FaultParams) -> Result<String, CallError> {
        const METHOD: &str = "Unaryresilliency";
        let request = params.to_wire();
        let response = unary::invoke(&self.retry, ctx, METHOD, || {
            self.client.unary(ctx, request.clone())
        })
        .await
        .inspect_err(|err| log_failure(METHOD, err))?;
        Ok(response.dummy_string)
    }

    pub async fn server_stream(
        &self,
        ctx: &CallContext,
        params: &FaultParams,
        mut on_message: impl FnMut(String),
    ) -> Result<usize, CallError> {
        const METHOD: &str = "ServerStreamingResilliency";
        let request = params.to_wire();
        server_stream::invoke(
            &self.retry,
            ctx,
            METHOD,
            || self.client.server_stream(ctx, request.clone()),
            |response| on_message(response.dummy_string),
        )
        .await
        .inspect_err(|err| log_failure(METHOD, err))
    }

    /// Send `count` copies of the request, then return the summary string.
    pub async fn client_stream(
        &self,
        ctx: &CallContext,
        params: &FaultParams,
        count: usize,
    ) -> Result<String, CallError> {
        const METHOD: &str = "ClientStreamingResilliency";
        let records = vec![params.to_wire(); count];
        let response = client_stream::invoke(
            &self.retry,
            ctx,
            METHOD,
            || self.client.client_stream(ctx),
            records,
        )
        .await
        .inspect_err(|err| log_failure(METHOD, err))?;
        Ok(response.dummy_string)
    }

    /// Send `count` copies of the request while receiving responses.
    pub async fn bidi(
        &self,
        ctx: &CallContext,
        params: &FaultParams,
        count: usize,
        mut on_message: impl FnMut(String),
    ) -> Result<BidiSummary, CallError> {
        const METHOD: &str = "BidirectionalStreamingResilliency";
        let requests = vec![params.to_wire(); count];
        bidi::invoke(
            &self.retry,
            ctx,
            METHOD,
            || self.client.bidi_stream(ctx),
            requests,
            |response| on_message(response.dummy_string),
        )
        .await
        .inspect_err(|err| log_failure(METHOD, err))
    }
}
