//! `microbank rates` – print exchange-rate updates until the server ends the stream.

use anyhow::Result;
use microbank_core::adapter::BankAdapter;
use microbank_core::domain::ExchangeRate;
use microbank_core::CallContext;
use std::time::SystemTime;

fn unix_secs(at: Option<SystemTime>) -> String {
    at.and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_rate(rate: ExchangeRate) {
    println!(
        "Exchange rate from {} to {} is {:.4} (valid {}..{})",
        rate.from_currency,
        rate.to_currency,
        rate.rate,
        unix_secs(rate.valid_from),
        unix_secs(rate.valid_to)
    );
}

pub async fn run_rates(bank: &BankAdapter, ctx: &CallContext, from: &str, to: &str) -> Result<()> {
    let received = bank.stream_exchange_rates(ctx, from, to, print_rate).await?;
    println!("{received} rate update(s) received");
    Ok(())
}
