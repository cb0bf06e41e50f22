//! Retry and backoff policy.
//!
//! This module encapsulates status classification (retry-eligible vs
//! terminal, plus structured error details), the exponential and linear
//! backoff schedules, and the async retry loop wrapped around call
//! establishment, so that the call-shape drivers share one consistent policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{
    classify, classify_code, extract_details, ErrorDetails, ErrorInfo, PreconditionViolation,
    RetryClass, RETRYABLE_CODES,
};
pub use error::CallError;
pub use policy::{Backoff, RetryDecision, RetryPolicies, RetryPolicy};
pub use run::run_with_retry;
