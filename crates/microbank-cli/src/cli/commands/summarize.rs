//! `microbank summarize` – stream transactions, print the server's summary.

use anyhow::Result;
use microbank_core::adapter::BankAdapter;
use microbank_core::currency::format_rupiah;
use microbank_core::domain::Transaction;
use microbank_core::CallContext;

pub async fn run_summarize(
    bank: &BankAdapter,
    ctx: &CallContext,
    account: &str,
    transactions: &[Transaction],
) -> Result<()> {
    for tx in transactions {
        println!(
            "{:<4} {:>20}  {}",
            tx.transaction_type,
            format_rupiah(tx.amount),
            tx.notes
        );
    }
    let summary = bank.summarize_transactions(ctx, account, transactions).await?;
    println!(
        "Account {}: in {}, out {}, total {}",
        summary.account_number,
        format_rupiah(summary.sum_in),
        format_rupiah(summary.sum_out),
        format_rupiah(summary.sum_total)
    );
    Ok(())
}
