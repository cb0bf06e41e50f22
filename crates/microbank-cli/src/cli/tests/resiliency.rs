//! Tests for the resiliency subcommand.

use super::parse;
use crate::cli::{fault_budget, Cli, CliCommand, Shape};
use clap::Parser;
use microbank_core::domain::FaultParams;
use microbank_core::retry::{Backoff, RetryPolicies, RetryPolicy};
use std::time::Duration;

#[test]
fn cli_parse_resiliency_defaults() {
    match parse(&["microbank", "resiliency", "unary"]) {
        CliCommand::Resiliency {
            shape,
            min_delay,
            max_delay,
            status_codes,
            count,
        } => {
            assert_eq!(shape, Shape::Unary);
            assert_eq!((min_delay, max_delay), (0, 0));
            assert!(status_codes.is_empty());
            assert_eq!(count, 5);
        }
        other => panic!("expected Resiliency, got {other:?}"),
    }
}

#[test]
fn cli_parse_resiliency_shapes_and_faults() {
    match parse(&[
        "microbank",
        "resiliency",
        "server-stream",
        "--min-delay",
        "1",
        "--max-delay",
        "3",
        "--status-code",
        "2",
        "--status-code",
        "13",
    ]) {
        CliCommand::Resiliency {
            shape,
            min_delay,
            max_delay,
            status_codes,
            ..
        } => {
            assert_eq!(shape, Shape::ServerStream);
            assert_eq!((min_delay, max_delay), (1, 3));
            assert_eq!(status_codes, vec![2, 13]);
        }
        other => panic!("expected Resiliency, got {other:?}"),
    }

    for (name, expected) in [
        ("client-stream", Shape::ClientStream),
        ("bidi", Shape::Bidi),
    ] {
        match parse(&["microbank", "resiliency", name, "--count", "3"]) {
            CliCommand::Resiliency { shape, count, .. } => {
                assert_eq!(shape, expected);
                assert_eq!(count, 3);
            }
            other => panic!("expected Resiliency, got {other:?}"),
        }
    }
}

#[test]
fn cli_resiliency_rejects_unknown_shape() {
    assert!(Cli::try_parse_from(["microbank", "resiliency", "broadcast"]).is_err());
}

#[test]
fn fault_budget_covers_every_attempt_and_backoff() {
    let retry = RetryPolicies::default();
    let params = FaultParams::new(1, 3, vec![13]).unwrap();

    // 4 attempts x 3s stall, plus 2 + 4 + 8 s of backoff.
    assert_eq!(
        fault_budget(Shape::Unary, &retry, &params),
        Duration::from_secs(12 + 14)
    );
    // 4 attempts x 3s stall, plus 3 + 6 + 9 s of backoff.
    for shape in [Shape::ServerStream, Shape::ClientStream, Shape::Bidi] {
        assert_eq!(
            fault_budget(shape, &retry, &params),
            Duration::from_secs(12 + 18),
            "{shape:?}"
        );
    }
}

#[test]
fn fault_budget_without_retries_is_one_stall() {
    let retry = RetryPolicies {
        unary: RetryPolicy::new(1, Backoff::Exponential { base: Duration::from_secs(2) }),
        stream: RetryPolicy::new(1, Backoff::Linear { base: Duration::from_secs(3) }),
    };
    let params = FaultParams::new(0, 5, vec![]).unwrap();
    assert_eq!(fault_budget(Shape::Bidi, &retry, &params), Duration::from_secs(5));
    assert_eq!(
        fault_budget(Shape::Unary, &retry, &FaultParams::default()),
        Duration::ZERO
    );
}
