use std::sync::Arc;

use tonic::transport::Channel;

use super::log_failure;
use crate::call::{bidi, client_stream, server_stream, unary, BidiSummary};
use crate::context::CallContext;
use crate::domain::{
    Balance, DomainError, ExchangeRate, Transaction, TransactionSummary, TransferOutcome,
    TransferTransaction,
};
use crate::port::BankClientPort;
use crate::retry::{CallError, RetryPolicies};
use crate::transport::GrpcBankClient;
use crate::wire::bank::{CurrentBalanceRequest, ExchangeRateRequest};

/// Banking operations: balance lookup (unary), exchange-rate subscription
/// (server stream), transaction summary (client stream) and multi-transfer
/// (bidirectional stream).
#[derive(Clone)]
pub struct BankAdapter {
    client: Arc<dyn BankClientPort>,
    retry: RetryPolicies,
}

impl BankAdapter {
    pub fn new(client: Arc<dyn BankClientPort>, retry: RetryPolicies) -> Self {
        Self { client, retry }
    }

    /// Adapter over the gRPC bank client on a shared channel.
    pub fn connect(channel: Channel, retry: RetryPolicies) -> Self {
        Self::new(Arc::new(GrpcBankClient::new(channel)), retry)
    }

    pub async fn get_balance(
        &self,
        ctx: &CallContext,
        account_number: &str,
    ) -> Result<Balance, CallError> {
        const METHOD: &str = "GetCurrentBalance";
        let response = unary::invoke(&self.retry, ctx, METHOD, || {
            self.client.get_current_balance(
                ctx,
                CurrentBalanceRequest {
                    account_number: account_number.to_string(),
                },
            )
        })
        .await
        .inspect_err(|err| log_failure(METHOD, err))?;
        Ok(Balance::from_wire(account_number, response))
    }

    /// Subscribe to rate updates for a currency pair. Each rate is handed to
    /// `on_rate` as it arrives; returns how many were delivered.
    pub async fn stream_exchange_rates(
        &self,
        ctx: &CallContext,
        from_currency: &str,
        to_currency: &str,
        mut on_rate: impl FnMut(ExchangeRate),
    ) -> Result<usize, CallError> {
        const METHOD: &str = "FetchExchangeRates";
        let request = ExchangeRateRequest {
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
        };
        server_stream::invoke(
            &self.retry,
            ctx,
            METHOD,
            || self.client.fetch_exchange_rates(ctx, request.clone()),
            |rate| on_rate(ExchangeRate::from(rate)),
        )
        .await
        .inspect_err(|err| log_failure(METHOD, err))
    }

    /// Stream `transactions` for `account_number` in order, then return the
    /// server's summary.
    pub async fn summarize_transactions(
        &self,
        ctx: &CallContext,
        account_number: &str,
        transactions: &[Transaction],
    ) -> Result<TransactionSummary, CallError> {
        const METHOD: &str = "SummarizeTransactions";
        let records = transactions
            .iter()
            .map(|tx| tx.to_wire(account_number))
            .collect();
        let summary = client_stream::invoke(
            &self.retry,
            ctx,
            METHOD,
            || self.client.summarize_transactions(ctx),
            records,
        )
        .await
        .inspect_err(|err| log_failure(METHOD, err))?;
        Ok(TransactionSummary::from(summary))
    }

    /// Send every transfer while receiving per-transfer outcomes. Responses
    /// with an unrecognised status reach `on_outcome` as errors.
    pub async fn transfer_multiple(
        &self,
        ctx: &CallContext,
        transfers: &[TransferTransaction],
        mut on_outcome: impl FnMut(Result<TransferOutcome, DomainError>),
    ) -> Result<BidiSummary, CallError> {
        const METHOD: &str = "TransferMultiple";
        let requests = transfers.iter().map(TransferTransaction::to_wire).collect();
        bidi::invoke(
            &self.retry,
            ctx,
            METHOD,
            || self.client.transfer_multiple(ctx),
            requests,
            |response| on_outcome(TransferOutcome::try_from(response)),
        )
        .await
        .inspect_err(|err| log_failure(METHOD, err))
    }
}
