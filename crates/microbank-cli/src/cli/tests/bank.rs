//! Tests for the bank subcommands and their record flags.

use super::{parse, parse_cli};
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use microbank_core::domain::TransactionType;
use std::path::Path;

#[test]
fn cli_parse_balance() {
    match parse(&["microbank", "balance", "7835697001"]) {
        CliCommand::Balance { account } => assert_eq!(account, "7835697001"),
        other => panic!("expected Balance, got {other:?}"),
    }
}

#[test]
fn cli_parse_global_flags_after_subcommand() {
    let cli = parse_cli(&[
        "microbank",
        "rates",
        "USD",
        "IDR",
        "--deadline",
        "5",
        "--config",
        "/tmp/mb.toml",
    ]);
    assert_eq!(cli.deadline, Some(5));
    assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/mb.toml")));
    match cli.command {
        CliCommand::Rates { from, to } => assert_eq!((from.as_str(), to.as_str()), ("USD", "IDR")),
        other => panic!("expected Rates, got {other:?}"),
    }
}

#[test]
fn cli_parse_summarize_keeps_order_and_notes() {
    match parse(&[
        "microbank",
        "summarize",
        "7835697001",
        "--tx",
        "IN:150000:salary: march",
        "--tx",
        "out:25000",
    ]) {
        CliCommand::Summarize {
            account,
            transactions,
        } => {
            assert_eq!(account, "7835697001");
            assert_eq!(transactions.len(), 2);
            assert_eq!(transactions[0].transaction_type, TransactionType::In);
            assert_eq!(transactions[0].amount, 150_000.0);
            assert_eq!(transactions[0].notes, "salary: march");
            assert_eq!(transactions[1].transaction_type, TransactionType::Out);
            assert!(transactions[1].notes.is_empty());
        }
        other => panic!("expected Summarize, got {other:?}"),
    }
}

#[test]
fn cli_summarize_rejects_bad_records() {
    for bad in ["SIDEWAYS:10", "IN", "IN:abc", "OUT:-5"] {
        assert!(
            Cli::try_parse_from(["microbank", "summarize", "1", "--tx", bad]).is_err(),
            "{bad} should be rejected"
        );
    }
    assert!(Cli::try_parse_from(["microbank", "summarize", "1"]).is_err());
}

#[test]
fn cli_parse_transfer() {
    match parse(&[
        "microbank",
        "transfer",
        "--transfer",
        "7835697001:7835697002:idr:25000.5",
        "--transfer",
        "7835697002:7835697001:USD:10",
    ]) {
        CliCommand::Transfer { transfers } => {
            assert_eq!(transfers.len(), 2);
            assert_eq!(transfers[0].from_account, "7835697001");
            assert_eq!(transfers[0].to_account, "7835697002");
            assert_eq!(transfers[0].currency, "IDR");
            assert_eq!(transfers[0].amount, 25_000.5);
            assert_eq!(transfers[1].currency, "USD");
        }
        other => panic!("expected Transfer, got {other:?}"),
    }
}

#[test]
fn cli_transfer_rejects_malformed() {
    for bad in ["a:b:IDR", "a:b:IDR:1:extra", ":b:IDR:1", "a:b:IDR:NaN"] {
        assert!(
            Cli::try_parse_from(["microbank", "transfer", "--transfer", bad]).is_err(),
            "{bad} should be rejected"
        );
    }
}
