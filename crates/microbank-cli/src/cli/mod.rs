//! CLI for the micro-bank test harness.

mod commands;
mod parse;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use microbank_core::adapter::{BankAdapter, ResiliencyAdapter};
use microbank_core::config::{self, MicrobankConfig};
use microbank_core::domain::{FaultParams, Transaction, TransferTransaction};
use microbank_core::retry::{ErrorDetails, RetryPolicies};
use microbank_core::{transport, CallContext, CallError};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use commands::{run_balance, run_rates, run_resiliency, run_summarize, run_transfer};

/// Top-level CLI for the micro-bank test harness.
#[derive(Debug, Parser)]
#[command(name = "microbank")]
#[command(about = "Resilient gRPC client for the micro-bank and fault-injection services", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/microbank/config.toml, created if missing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Deadline in seconds for the whole operation, retries included.
    #[arg(long, global = true, value_name = "SECS")]
    pub deadline: Option<u64>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// RPC shape exercised by `microbank resiliency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    Unary,
    ServerStream,
    ClientStream,
    Bidi,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the current balance of an account (unary).
    Balance {
        /// Account number.
        account: String,
    },

    /// Follow exchange-rate updates for a currency pair (server stream).
    Rates {
        /// Source currency code, e.g. USD.
        from: String,
        /// Target currency code, e.g. IDR.
        to: String,
    },

    /// Stream transactions for an account and print the summary (client stream).
    Summarize {
        /// Account number.
        account: String,
        /// Transaction to send, in order. Repeatable.
        #[arg(long = "tx", value_name = "TYPE:AMOUNT[:NOTE]", required = true, value_parser = parse::transaction)]
        transactions: Vec<Transaction>,
    },

    /// Send transfers and print each outcome as it arrives (bidirectional stream).
    Transfer {
        /// Transfer to send, in order. Repeatable.
        #[arg(long = "transfer", value_name = "FROM:TO:CURRENCY:AMOUNT", required = true, value_parser = parse::transfer)]
        transfers: Vec<TransferTransaction>,
    },

    /// Drive one call shape against the fault-injection service.
    ///
    /// The deadline is extended so that every attempt may stall for
    /// --max-delay seconds and every backoff sleep still fits.
    Resiliency {
        #[arg(value_enum)]
        shape: Shape,
        /// Lower bound of the server's artificial delay, in seconds.
        #[arg(long, default_value = "0", value_name = "SECS")]
        min_delay: u32,
        /// Upper bound of the server's artificial delay, in seconds.
        #[arg(long, default_value = "0", value_name = "SECS")]
        max_delay: u32,
        /// Status code the server may answer with. Repeatable.
        #[arg(long = "status-code", value_name = "CODE")]
        status_codes: Vec<u32>,
        /// Requests to send on client and bidirectional streams.
        #[arg(long, default_value = "5", value_name = "N")]
        count: usize,
    },
}

impl Cli {
    fn load_config(&self) -> Result<MicrobankConfig> {
        match &self.config {
            Some(path) => config::load_from_path(path),
            None => config::load_or_init(),
        }
    }
}

/// Structured server diagnostics behind a failed command, if any.
pub fn error_details(err: &anyhow::Error) -> Option<ErrorDetails> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CallError>())
        .and_then(CallError::details)
}

/// Extra deadline for a fault-injection run: each attempt allowed by the
/// shape's policy may stall for the upper delay bound, plus all backoff sleeps.
pub(crate) fn fault_budget(shape: Shape, retry: &RetryPolicies, params: &FaultParams) -> Duration {
    let policy = match shape {
        Shape::Unary => &retry.unary,
        Shape::ServerStream | Shape::ClientStream | Shape::Bidi => &retry.stream,
    };
    params
        .worst_case_latency()
        .saturating_mul(policy.max_attempts.max(1))
        .saturating_add(policy.worst_case_backoff())
}

/// One context per command. Ctrl-C cancels it.
fn command_context(deadline: Duration) -> CallContext {
    let token = CancellationToken::new();
    let ctx = CallContext::with_token(token.clone()).deadline_in(deadline);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling");
            token.cancel();
        }
    });
    ctx
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = cli.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let deadline = cli
            .deadline
            .map(Duration::from_secs)
            .unwrap_or_else(|| cfg.deadline());

        let channel = transport::channel(&cfg)?;
        let retry = cfg.retry_policies();

        match cli.command {
            CliCommand::Balance { account } => {
                let bank = BankAdapter::connect(channel, retry);
                run_balance(&bank, &command_context(deadline), &account).await?;
            }
            CliCommand::Rates { from, to } => {
                let bank = BankAdapter::connect(channel, retry);
                run_rates(&bank, &command_context(deadline), &from, &to).await?;
            }
            CliCommand::Summarize {
                account,
                transactions,
            } => {
                let bank = BankAdapter::connect(channel, retry);
                run_summarize(&bank, &command_context(deadline), &account, &transactions).await?;
            }
            CliCommand::Transfer { transfers } => {
                let bank = BankAdapter::connect(channel, retry);
                run_transfer(&bank, &command_context(deadline), &transfers).await?;
            }
            CliCommand::Resiliency {
                shape,
                min_delay,
                max_delay,
                status_codes,
                count,
            } => {
                let params = FaultParams::new(min_delay, max_delay, status_codes)?;
                let budget = fault_budget(shape, &retry, &params);
                tracing::debug!(?budget, "deadline extended for injected faults");
                let ctx = command_context(deadline.saturating_add(budget));
                let resiliency = ResiliencyAdapter::connect(channel, retry);
                run_resiliency(&resiliency, &ctx, shape, &params, count).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
