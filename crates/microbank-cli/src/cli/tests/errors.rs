//! Tests for surfacing server diagnostics on failed commands.

use crate::cli::error_details;
use anyhow::Context;
use microbank_core::retry::{ErrorDetails, PreconditionViolation};
use microbank_core::{CallError, CancelReason};
use tonic::Status;

fn frozen_account() -> CallError {
    CallError::Status {
        method: "bank.BankService/GetCurrentBalance".to_string(),
        status: Status::failed_precondition("rejected"),
        details: Some(ErrorDetails {
            precondition_violations: vec![PreconditionViolation {
                kind: "ACCOUNT".to_string(),
                subject: "7835697001".to_string(),
                description: "account is frozen".to_string(),
            }],
            ..Default::default()
        }),
    }
}

#[test]
fn details_found_beneath_context() {
    let err = Err::<(), _>(frozen_account())
        .context("balance lookup failed")
        .unwrap_err();
    let details = error_details(&err).expect("details");
    assert_eq!(details.to_string(), "ACCOUNT 7835697001: account is frozen");
}

#[test]
fn no_details_for_cancellation_or_plain_errors() {
    let cancelled = anyhow::Error::new(CallError::cancelled("m", CancelReason::Deadline));
    assert!(error_details(&cancelled).is_none());
    assert!(error_details(&anyhow::anyhow!("config missing")).is_none());
}
