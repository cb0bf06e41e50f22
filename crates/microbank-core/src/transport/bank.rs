use async_trait::async_trait;
use tonic::transport::Channel;
use tonic::Status;

use super::GrpcCaller;
use crate::call::{BidiStream, BoxClientStream, BoxInbound};
use crate::context::CallContext;
use crate::port::BankClientPort;
use crate::wire::bank::{
    CurrentBalanceRequest, CurrentBalanceResponse, ExchangeRateRequest, ExchangeRateResponse,
    Transaction, TransactionSummary, TransferRequest, TransferResponse,
};

const GET_CURRENT_BALANCE: &str = "/bank.BankService/GetCurrentBalance";
const FETCH_EXCHANGE_RATES: &str = "/bank.BankService/FetchExchangeRates";
const SUMMARIZE_TRANSACTIONS: &str = "/bank.BankService/SummarizeTransactions";
const TRANSFER_MULTIPLE: &str = "/bank.BankService/TransferMultiple";

/// `bank.BankService` client.
#[derive(Clone)]
pub struct GrpcBankClient {
    caller: GrpcCaller,
}

impl GrpcBankClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            caller: GrpcCaller::new(channel),
        }
    }
}

#[async_trait]
impl BankClientPort for GrpcBankClient {
    async fn get_current_balance(
        &self,
        ctx: &CallContext,
        request: CurrentBalanceRequest,
    ) -> Result<CurrentBalanceResponse, Status> {
        self.caller.unary(ctx, GET_CURRENT_BALANCE, request).await
    }

    async fn fetch_exchange_rates(
        &self,
        ctx: &CallContext,
        request: ExchangeRateRequest,
    ) -> Result<BoxInbound<ExchangeRateResponse>, Status> {
        self.caller
            .server_streaming(ctx, FETCH_EXCHANGE_RATES, request)
            .await
    }

    async fn summarize_transactions(
        &self,
        ctx: &CallContext,
    ) -> Result<BoxClientStream<Transaction, TransactionSummary>, Status> {
        self.caller.client_streaming(ctx, SUMMARIZE_TRANSACTIONS).await
    }

    async fn transfer_multiple(
        &self,
        ctx: &CallContext,
    ) -> Result<BidiStream<TransferRequest, TransferResponse>, Status> {
        self.caller.streaming(ctx, TRANSFER_MULTIPLE).await
    }
}
