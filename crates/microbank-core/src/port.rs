//! RPC client interfaces the service adapters are written against.
//!
//! One method per call shape per service. Unary methods return the response;
//! streaming methods return an open stream handle. [`crate::transport`]
//! implements both over a shared gRPC channel; tests supply in-process fakes.

use async_trait::async_trait;
use tonic::Status;

use crate::call::{BidiStream, BoxClientStream, BoxInbound};
use crate::context::CallContext;
use crate::wire::bank::{
    CurrentBalanceRequest, CurrentBalanceResponse, ExchangeRateRequest, ExchangeRateResponse,
    Transaction, TransactionSummary, TransferRequest, TransferResponse,
};
use crate::wire::resiliency::{ResilliencyRequest, ResilliencyResponse};

#[async_trait]
pub trait BankClientPort: Send + Sync {
    async fn get_current_balance(
        &self,
        ctx: &CallContext,
        request: CurrentBalanceRequest,
    ) -> Result<CurrentBalanceResponse, Status>;

    async fn fetch_exchange_rates(
        &self,
        ctx: &CallContext,
        request: ExchangeRateRequest,
    ) -> Result<BoxInbound<ExchangeRateResponse>, Status>;

    async fn summarize_transactions(
        &self,
        ctx: &CallContext,
    ) -> Result<BoxClientStream<Transaction, TransactionSummary>, Status>;

    async fn transfer_multiple(
        &self,
        ctx: &CallContext,
    ) -> Result<BidiStream<TransferRequest, TransferResponse>, Status>;
}

#[async_trait]
pub trait ResiliencyPort: Send + Sync {
    async fn unary(
        &self,
        ctx: &CallContext,
        request: ResilliencyRequest,
    ) -> Result<ResilliencyResponse, Status>;

    async fn server_stream(
        &self,
        ctx: &CallContext,
        request: ResilliencyRequest,
    ) -> Result<BoxInbound<ResilliencyResponse>, Status>;

    async fn client_stream(
        &self,
        ctx: &CallContext,
    ) -> Result<BoxClientStream<ResilliencyRequest, ResilliencyResponse>, Status>;

    async fn bidi_stream(
        &self,
        ctx: &CallContext,
    ) -> Result<BidiStream<ResilliencyRequest, ResilliencyResponse>, Status>;
}
