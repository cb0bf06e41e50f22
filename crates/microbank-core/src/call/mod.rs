//! Call-shape drivers.
//!
//! One driver per RPC shape owns that shape's concurrency protocol:
//!
//! - [`unary`]: one request, one response.
//! - [`server_stream`]: receive loop until end-of-stream or error.
//! - [`client_stream`]: send every record, close, then await the summary.
//! - [`bidi`]: send and receive concurrently over one stream, completing only
//!   when both directions are done.
//!
//! Retry applies to establishment only (see [`crate::retry`]); an error on an
//! already-open stream is surfaced as-is and nothing is resent.

pub mod bidi;
mod channel;
pub mod client_stream;
mod handle;
pub mod server_stream;
mod state;
pub mod unary;

pub use bidi::BidiSummary;
pub use channel::{
    inbound_channel, outbound_channel, ChannelClientStream, ChannelInbound, ChannelOutbound,
};
pub use handle::{
    BidiStream, BoxClientStream, BoxInbound, BoxOutbound, ClientStream, Inbound, Outbound,
};
pub use state::{CallShape, CallState, CallTrace};
