//! Classify remote gRPC statuses for retry decisions and pull structured
//! details (precondition violations, reason/domain metadata) out of them.

use std::collections::BTreeMap;
use std::fmt;

use prost::Message;
use tonic::{Code, Status};

use crate::wire::rpc_status::{self, PreconditionFailure, RpcStatus};

/// Status codes a failed attempt may be retried on. Every other code,
/// including `DeadlineExceeded` and explicit application failures, is terminal.
pub const RETRYABLE_CODES: &[Code] = &[Code::Unknown, Code::Internal];

/// High-level classification of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Transient remote failure; another attempt may succeed.
    Transient,
    /// Terminal failure; surfaced to the caller immediately.
    Terminal,
}

/// Classify a bare status code.
pub fn classify_code(code: Code) -> RetryClass {
    if RETRYABLE_CODES.contains(&code) {
        RetryClass::Transient
    } else {
        RetryClass::Terminal
    }
}

/// Classify a status returned by a completed attempt.
pub fn classify(status: &Status) -> RetryClass {
    classify_code(status.code())
}

/// One failed precondition reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreconditionViolation {
    pub kind: String,
    pub subject: String,
    pub description: String,
}

/// Reason/domain pair with free-form metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub reason: String,
    pub domain: String,
    pub metadata: BTreeMap<String, String>,
}

/// Structured diagnostics carried in the binary status details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetails {
    pub precondition_violations: Vec<PreconditionViolation>,
    pub error_info: Vec<ErrorInfo>,
}

impl ErrorDetails {
    pub fn is_empty(&self) -> bool {
        self.precondition_violations.is_empty() && self.error_info.is_empty()
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for v in &self.precondition_violations {
            write!(f, "{sep}{} {}: {}", v.kind, v.subject, v.description)?;
            sep = "; ";
        }
        for info in &self.error_info {
            write!(f, "{sep}{} ({})", info.reason, info.domain)?;
            for (key, value) in &info.metadata {
                write!(f, " {key}={value}")?;
            }
            sep = "; ";
        }
        Ok(())
    }
}

/// Best-effort extraction of structured details.
///
/// Missing, undecodable or unrecognised payloads yield `None` (or are skipped);
/// extraction never fails the classification.
pub fn extract_details(status: &Status) -> Option<ErrorDetails> {
    let raw = status.details();
    if raw.is_empty() {
        return None;
    }
    let decoded = match RpcStatus::decode(raw) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(error = %err, "status details are not a google.rpc.Status");
            return None;
        }
    };

    let mut details = ErrorDetails::default();
    for any in decoded.details {
        match any.type_url.as_str() {
            rpc_status::PRECONDITION_FAILURE_TYPE_URL => {
                if let Ok(failure) = PreconditionFailure::decode(any.value.as_slice()) {
                    details
                        .precondition_violations
                        .extend(failure.violations.into_iter().map(|v| PreconditionViolation {
                            kind: v.r#type,
                            subject: v.subject,
                            description: v.description,
                        }));
                }
            }
            rpc_status::ERROR_INFO_TYPE_URL => {
                if let Ok(info) = rpc_status::ErrorInfo::decode(any.value.as_slice()) {
                    details.error_info.push(ErrorInfo {
                        reason: info.reason,
                        domain: info.domain,
                        metadata: info.metadata.into_iter().collect(),
                    });
                }
            }
            other => tracing::trace!(type_url = other, "skipping unrecognised status detail"),
        }
    }

    (!details.is_empty()).then_some(details)
}
