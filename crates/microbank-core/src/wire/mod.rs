//! Protobuf messages for the bank and fault-injection services, plus the
//! `google.rpc` status detail messages.
//!
//! Checked in by hand so the build does not need `protoc`.

pub mod bank;
pub mod resiliency;
pub mod rpc_status;
