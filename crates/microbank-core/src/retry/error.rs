//! Error taxonomy for a logical call: terminal remote status, exhausted
//! retries, caller cancellation, and mid-stream send/receive failures.

use thiserror::Error;
use tonic::{Code, Status};

use super::classify::{extract_details, ErrorDetails};
use crate::context::CancelReason;

/// Failure of one logical call, returned by the retry loop and the call-shape drivers.
#[derive(Debug, Error)]
pub enum CallError {
    /// Terminal remote status (not retry-eligible), with any structured details attached.
    #[error("{method}: {code:?}: {message}", code = .status.code(), message = .status.message())]
    Status {
        method: String,
        #[source]
        status: Status,
        details: Option<ErrorDetails>,
    },

    /// Every attempt failed with a retry-eligible status; `status` is the last one.
    #[error("{method}: retries exhausted after {attempts} attempt(s): {code:?}: {message}", code = .status.code(), message = .status.message())]
    RetriesExhausted {
        method: String,
        attempts: u32,
        #[source]
        status: Status,
    },

    /// The caller's token or deadline fired. Never a remote status.
    #[error("{method}: {reason}")]
    Cancelled { method: String, reason: CancelReason },

    /// Sending record `index` (0-based) on an already-open stream failed.
    /// Records after `index` were not sent.
    #[error("{method}: send of record {index} failed: {code:?}: {message}", code = .status.code(), message = .status.message())]
    Send {
        method: String,
        index: usize,
        #[source]
        status: Status,
    },

    /// The receive direction failed after `received` messages were delivered.
    #[error("{method}: stream failed after {received} message(s): {code:?}: {message}", code = .status.code(), message = .status.message())]
    Receive {
        method: String,
        received: usize,
        #[source]
        status: Status,
    },
}

impl CallError {
    /// Terminal status error with best-effort detail extraction.
    pub fn terminal(method: &str, status: Status) -> Self {
        let details = extract_details(&status);
        CallError::Status {
            method: method.to_string(),
            status,
            details,
        }
    }

    pub fn cancelled(method: &str, reason: CancelReason) -> Self {
        CallError::Cancelled {
            method: method.to_string(),
            reason,
        }
    }

    /// The remote status behind this error, if any.
    pub fn status(&self) -> Option<&Status> {
        match self {
            CallError::Status { status, .. }
            | CallError::RetriesExhausted { status, .. }
            | CallError::Send { status, .. }
            | CallError::Receive { status, .. } => Some(status),
            CallError::Cancelled { .. } => None,
        }
    }

    pub fn code(&self) -> Option<Code> {
        self.status().map(Status::code)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CallError::Cancelled { .. })
    }

    /// Structured details; extracted on demand for mid-stream errors.
    pub fn details(&self) -> Option<ErrorDetails> {
        match self {
            CallError::Status { details, .. } => details.clone(),
            other => other.status().and_then(extract_details),
        }
    }
}
