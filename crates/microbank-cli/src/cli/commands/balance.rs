//! `microbank balance` – current balance of one account.

use anyhow::Result;
use microbank_core::adapter::BankAdapter;
use microbank_core::currency::format_rupiah;
use microbank_core::CallContext;

pub async fn run_balance(bank: &BankAdapter, ctx: &CallContext, account: &str) -> Result<()> {
    let balance = bank.get_balance(ctx, account).await?;
    println!(
        "Current balance for account {} is {} (as of {})",
        balance.account_number,
        format_rupiah(balance.amount),
        balance.current_date
    );
    Ok(())
}
