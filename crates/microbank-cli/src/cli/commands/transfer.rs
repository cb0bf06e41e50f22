//! `microbank transfer` – send transfers and print each outcome as it arrives.

use anyhow::Result;
use microbank_core::adapter::BankAdapter;
use microbank_core::currency::format_rupiah;
use microbank_core::domain::{TransferStatus, TransferTransaction};
use microbank_core::CallContext;

pub async fn run_transfer(
    bank: &BankAdapter,
    ctx: &CallContext,
    transfers: &[TransferTransaction],
) -> Result<()> {
    let summary = bank
        .transfer_multiple(ctx, transfers, |outcome| match outcome {
            Ok(outcome) => {
                let status = match outcome.status {
                    TransferStatus::Success => "SUCCESS",
                    TransferStatus::Failed => "FAILED",
                };
                println!(
                    "{status:<7} {} -> {} {} {}",
                    outcome.from_account,
                    outcome.to_account,
                    outcome.currency,
                    format_rupiah(outcome.amount)
                );
            }
            Err(err) => println!("INVALID {err}"),
        })
        .await?;
    println!(
        "{} transfer(s) sent, {} outcome(s) received",
        summary.sent, summary.received
    );
    if summary.unsent > 0 {
        println!("{} transfer(s) not sent: server closed the stream early", summary.unsent);
    }
    Ok(())
}
