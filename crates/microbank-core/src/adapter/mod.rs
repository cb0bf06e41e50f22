//! Service adapters: domain-level operations composed from a call-shape
//! driver and payload translation. Retry and concurrency live entirely in
//! [`crate::call`] and [`crate::retry`].
//!
//! Each adapter holds its RPC port behind an `Arc`, so one transport channel
//! is shared by every call made through it.

mod bank;
mod resiliency;

pub use bank::BankAdapter;
pub use resiliency::ResiliencyAdapter;

use crate::retry::CallError;

fn log_failure(method: &str, err: &CallError) {
    if err.is_cancelled() {
        tracing::warn!(method, error = %err, "call cancelled");
    } else {
        tracing::error!(method, code = ?err.code(), error = %err, "call failed");
    }
}
