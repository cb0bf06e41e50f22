pub mod config;
pub mod logging;

// Resilient RPC core
pub mod adapter;
pub mod call;
pub mod context;
pub mod currency;
pub mod domain;
pub mod port;
pub mod retry;
pub mod transport;
pub mod wire;

pub use context::{CallContext, CancelReason};
pub use retry::CallError;
